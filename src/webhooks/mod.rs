//! Webhook module for validating instance type admission requests.
//!
//! - `codec`: envelope decoding (per API version) and verdict encoding
//! - `policies`: pure validation rules over the decoded spec
//! - `admitter`: one admitter per instance type kind
//! - `server`: HTTPS endpoints serving the admitters

pub mod admitter;
pub mod codec;
pub mod policies;
mod server;

pub use admitter::{Admitter, ClusterInstancetypeAdmitter, InstancetypeAdmitter};
pub use codec::DecodeError;
pub use policies::Violation;
pub use server::{
    CLUSTER_INSTANCETYPE_VALIDATE_PATH, INSTANCETYPE_VALIDATE_PATH, WebhookError,
    bind_webhook_listener, create_webhook_router, load_tls_config, run_webhook_server,
};

// Re-export kube-rs admission types for contract testing
pub use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation};
