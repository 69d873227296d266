//! Instance type admitters.
//!
//! [`InstancetypeAdmitter`] and [`ClusterInstancetypeAdmitter`] only differ in
//! the kind they decode; both delegate to [`admit_instancetype`].

use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, Operation};
use tracing::{debug, info, warn};

use super::codec::{self, UNPROCESSABLE_ENTITY};
use super::policies::validate_all;
use crate::crd::InstancetypeKind;

/// Validates admission requests for one instance type kind.
pub trait Admitter: Send + Sync {
    /// Kind this admitter decodes
    fn kind(&self) -> InstancetypeKind;

    /// Decide whether the request is admitted.
    fn admit(&self, request: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
        admit_instancetype(self.kind(), request)
    }
}

/// Admitter for the namespaced `VirtualMachineInstancetype`.
#[derive(Clone, Copy, Debug, Default)]
pub struct InstancetypeAdmitter;

impl Admitter for InstancetypeAdmitter {
    fn kind(&self) -> InstancetypeKind {
        InstancetypeKind::Namespaced
    }
}

/// Admitter for the cluster-scoped `VirtualMachineClusterInstancetype`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClusterInstancetypeAdmitter;

impl Admitter for ClusterInstancetypeAdmitter {
    fn kind(&self) -> InstancetypeKind {
        InstancetypeKind::Cluster
    }
}

/// Decode the request as `kind`, run the validation policies and encode the
/// verdict. Every failure ends in a 422 denial.
pub fn admit_instancetype(
    kind: InstancetypeKind,
    request: &AdmissionRequest<DynamicObject>,
) -> AdmissionResponse {
    let uid = &request.uid;
    debug!(
        uid = %uid,
        kind = %kind,
        operation = ?request.operation,
        version = %request.resource.version,
        name = %request.name,
        namespace = ?request.namespace,
        "Processing admission request"
    );

    // Nothing to validate on removal
    if matches!(request.operation, Operation::Delete | Operation::Connect) {
        info!(uid = %uid, kind = %kind, operation = ?request.operation, "Admission request allowed");
        return codec::allow(request);
    }

    let spec = match codec::decode(request, kind) {
        Ok(spec) => spec,
        Err(e) => {
            warn!(uid = %uid, kind = %kind, error = %e, "Admission request denied: decode failed");
            return codec::deny(request, UNPROCESSABLE_ENTITY, e);
        }
    };

    let violations = validate_all(&spec);
    let Some(first) = violations.first() else {
        info!(uid = %uid, kind = %kind, "Admission request allowed");
        return codec::allow(request);
    };

    warn!(
        uid = %uid,
        kind = %kind,
        reason = first.reason,
        violations = violations.len(),
        message = %first.message,
        "Admission request denied"
    );
    codec::deny(request, UNPROCESSABLE_ENTITY, first)
}
