//! Resource definitions for the `instancetype.kubevirt.io` API group.
//!
//! - `v1beta1`: hub version, `VirtualMachineInstancetype` and
//!   `VirtualMachineClusterInstancetype` custom resources
//! - `v1alpha`: spec shape served under `v1alpha1` and `v1alpha2`
//! - `quantity`: int-or-string quantity deserialization

pub mod quantity;
pub mod v1alpha;
pub mod v1beta1;

pub use v1beta1::{
    CpuInstancetype, Hugepages, MemoryInstancetype, VirtualMachineClusterInstancetype,
    VirtualMachineClusterInstancetypeSpec, VirtualMachineInstancetype,
    VirtualMachineInstancetypeSpec,
};

use serde::Deserialize;

/// API group shared by both instance type kinds.
pub const GROUP: &str = "instancetype.kubevirt.io";

/// Plural resource name of the namespaced kind.
pub const PLURAL_RESOURCE_NAME: &str = "virtualmachineinstancetypes";

/// Plural resource name of the cluster-scoped kind.
pub const CLUSTER_PLURAL_RESOURCE_NAME: &str = "virtualmachineclusterinstancetypes";

/// Which of the two instance type kinds a request targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstancetypeKind {
    /// `VirtualMachineInstancetype`
    Namespaced,
    /// `VirtualMachineClusterInstancetype`
    Cluster,
}

impl InstancetypeKind {
    /// Plural resource name used in admission requests.
    pub fn plural(&self) -> &'static str {
        match self {
            InstancetypeKind::Namespaced => PLURAL_RESOURCE_NAME,
            InstancetypeKind::Cluster => CLUSTER_PLURAL_RESOURCE_NAME,
        }
    }

    /// Kind name as it appears in `TypeMeta`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            InstancetypeKind::Namespaced => "VirtualMachineInstancetype",
            InstancetypeKind::Cluster => "VirtualMachineClusterInstancetype",
        }
    }

    /// Resolve a plural resource name.
    pub fn from_plural(plural: &str) -> Option<Self> {
        match plural {
            PLURAL_RESOURCE_NAME => Some(InstancetypeKind::Namespaced),
            CLUSTER_PLURAL_RESOURCE_NAME => Some(InstancetypeKind::Cluster),
            _ => None,
        }
    }
}

impl std::fmt::Display for InstancetypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Object wrapper used by the per-version decoders. Only `spec` matters for
/// validation; an object without one decodes as the default spec.
#[derive(Deserialize)]
#[serde(bound(deserialize = "S: Deserialize<'de> + Default"))]
pub(crate) struct SpecEnvelope<S> {
    #[serde(default)]
    pub spec: S,
}
