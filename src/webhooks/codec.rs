//! Translation between admission envelopes and the instance type hub spec.
//!
//! Decoding picks a per-version decode function from [`DECODERS`]; every
//! served version converts into [`VirtualMachineInstancetypeSpec`], so the
//! policies never branch on the API version.

use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse};
use thiserror::Error;

use crate::crd::{GROUP, InstancetypeKind, VirtualMachineInstancetypeSpec, v1alpha, v1beta1};

/// HTTP-style status code attached to every denial.
pub const UNPROCESSABLE_ENTITY: u16 = 422;

/// Decodes a raw object of one API version into the hub spec.
pub type DecodeFn =
    fn(serde_json::Value) -> Result<VirtualMachineInstancetypeSpec, serde_json::Error>;

/// Served API versions and their decoders.
pub const DECODERS: &[(&str, DecodeFn)] = &[
    ("v1alpha1", v1alpha::decode_spec),
    ("v1alpha2", v1alpha::decode_spec),
    ("v1beta1", v1beta1::decode_spec),
];

/// Errors that can occur while decoding an admission request
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Request targets a resource this admitter does not handle
    #[error("unexpected resource {group}/{resource}, expected {expected_group}/{expected}")]
    UnexpectedResource {
        group: String,
        resource: String,
        expected_group: &'static str,
        expected: &'static str,
    },

    /// Declared API version has no decoder
    #[error("unsupported API version {version:?} for {group}")]
    UnsupportedVersion {
        group: &'static str,
        version: String,
    },

    /// Request carries no object
    #[error("admission request does not contain an object")]
    MissingObject,

    /// Object is not well-formed for its declared version
    #[error("could not decode {version} object: {source}")]
    Malformed {
        version: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Look up the decoder for an API version.
pub fn decoder_for(version: &str) -> Option<DecodeFn> {
    DECODERS
        .iter()
        .find(|(served, _)| *served == version)
        .map(|(_, decode)| *decode)
}

/// Decode the request object into the hub spec, checking that the request
/// targets `kind`.
pub fn decode(
    request: &AdmissionRequest<DynamicObject>,
    kind: InstancetypeKind,
) -> Result<VirtualMachineInstancetypeSpec, DecodeError> {
    let resource = &request.resource;

    if resource.group != GROUP || resource.resource != kind.plural() {
        return Err(DecodeError::UnexpectedResource {
            group: resource.group.clone(),
            resource: resource.resource.clone(),
            expected_group: GROUP,
            expected: kind.plural(),
        });
    }

    let decode = decoder_for(&resource.version)
        .ok_or_else(|| DecodeError::UnsupportedVersion {
            group: GROUP,
            version: resource.version.clone(),
        })?;

    let object = request.object.as_ref().ok_or(DecodeError::MissingObject)?;

    decode(object.data.clone()).map_err(|source| DecodeError::Malformed {
        version: resource.version.clone(),
        source,
    })
}

/// Build an allowing response.
pub fn allow(request: &AdmissionRequest<DynamicObject>) -> AdmissionResponse {
    AdmissionResponse::from(request)
}

/// Build a denying response carrying `code` and `message`.
pub fn deny(
    request: &AdmissionRequest<DynamicObject>,
    code: u16,
    message: impl ToString,
) -> AdmissionResponse {
    let mut response = AdmissionResponse::from(request).deny(message);
    response.result.code = code;
    response
}
