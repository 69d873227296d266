//! Spec shape served under `v1alpha1` and `v1alpha2`.
//!
//! Both alpha versions carry the same instance type fields; neither has
//! `memory.maxGuest`. Objects are converted into the v1beta1 hub spec.

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};

use super::SpecEnvelope;
use super::v1beta1;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualMachineInstancetypeSpec {
    pub cpu: CpuInstancetype,
    pub memory: MemoryInstancetype,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CpuInstancetype {
    pub guest: u32,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInstancetype {
    #[serde(deserialize_with = "super::quantity::deserialize")]
    pub guest: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hugepages: Option<v1beta1::Hugepages>,
    #[serde(default)]
    pub overcommit_percent: i32,
}

impl From<VirtualMachineInstancetypeSpec> for v1beta1::VirtualMachineInstancetypeSpec {
    fn from(spec: VirtualMachineInstancetypeSpec) -> Self {
        Self {
            cpu: v1beta1::CpuInstancetype {
                guest: spec.cpu.guest,
            },
            memory: v1beta1::MemoryInstancetype {
                guest: spec.memory.guest,
                hugepages: spec.memory.hugepages,
                overcommit_percent: spec.memory.overcommit_percent,
                max_guest: None,
            },
        }
    }
}

/// Decode a v1alpha1/v1alpha2 object and convert it into the hub spec.
pub fn decode_spec(
    object: serde_json::Value,
) -> Result<v1beta1::VirtualMachineInstancetypeSpec, serde_json::Error> {
    serde_json::from_value::<SpecEnvelope<VirtualMachineInstancetypeSpec>>(object)
        .map(|envelope| envelope.spec.into())
}
