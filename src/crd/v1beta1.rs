//! `instancetype.kubevirt.io/v1beta1` resource definitions.
//!
//! v1beta1 is the hub version: every other served version converts into
//! [`VirtualMachineInstancetypeSpec`] before validation runs.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::SpecEnvelope;

/// VirtualMachineInstancetype is a namespaced CPU/memory sizing profile.
///
/// Example:
/// ```yaml
/// apiVersion: instancetype.kubevirt.io/v1beta1
/// kind: VirtualMachineInstancetype
/// metadata:
///   name: small
/// spec:
///   cpu:
///     guest: 1
///   memory:
///     guest: 128M
///     overcommitPercent: 15
/// ```
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "instancetype.kubevirt.io",
    version = "v1beta1",
    kind = "VirtualMachineInstancetype",
    plural = "virtualmachineinstancetypes",
    shortname = "vminstancetype",
    namespaced,
    printcolumn = r#"{"name":"CPU", "type":"integer", "jsonPath":".spec.cpu.guest"}"#,
    printcolumn = r#"{"name":"Memory", "type":"string", "jsonPath":".spec.memory.guest"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstancetypeSpec {
    /// CPU resources exposed to the guest.
    pub cpu: CpuInstancetype,

    /// Memory resources exposed to the guest.
    pub memory: MemoryInstancetype,
}

/// VirtualMachineClusterInstancetype is the cluster-scoped counterpart of
/// [`VirtualMachineInstancetype`]. Both kinds share one spec shape.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "instancetype.kubevirt.io",
    version = "v1beta1",
    kind = "VirtualMachineClusterInstancetype",
    plural = "virtualmachineclusterinstancetypes",
    shortname = "vmclusterinstancetype",
    printcolumn = r#"{"name":"CPU", "type":"integer", "jsonPath":".spec.cpu.guest"}"#,
    printcolumn = r#"{"name":"Memory", "type":"string", "jsonPath":".spec.memory.guest"}"#,
    printcolumn = r#"{"name":"Age", "type":"date", "jsonPath":".metadata.creationTimestamp"}"#
)]
pub struct VirtualMachineClusterInstancetypeSpec {
    #[serde(flatten)]
    pub instancetype: VirtualMachineInstancetypeSpec,
}

impl From<VirtualMachineInstancetypeSpec> for VirtualMachineClusterInstancetypeSpec {
    fn from(instancetype: VirtualMachineInstancetypeSpec) -> Self {
        Self { instancetype }
    }
}

/// CPU section of an instance type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CpuInstancetype {
    /// Number of vCPUs exposed to the guest.
    pub guest: u32,
}

/// Memory section of an instance type.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInstancetype {
    /// Amount of memory exposed to the guest.
    #[serde(deserialize_with = "super::quantity::deserialize")]
    pub guest: Quantity,

    /// Static hugepage backing for guest memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hugepages: Option<Hugepages>,

    /// Percentage by which guest-visible memory may exceed the memory
    /// requested for the virtual machine (default 0).
    #[serde(default, skip_serializing_if = "is_zero")]
    pub overcommit_percent: i32,

    /// Upper bound for memory hotplug.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "super::quantity::deserialize_option"
    )]
    pub max_guest: Option<Quantity>,
}

/// Hugepage backing configuration.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hugepages {
    /// Hugepage size, e.g. `2Mi` or `1Gi`.
    pub page_size: String,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Decode a v1beta1 object into the hub spec.
pub fn decode_spec(
    object: serde_json::Value,
) -> Result<VirtualMachineInstancetypeSpec, serde_json::Error> {
    serde_json::from_value::<SpecEnvelope<VirtualMachineInstancetypeSpec>>(object)
        .map(|envelope| envelope.spec)
}
