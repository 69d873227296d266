//! instancetype-webhook library crate
//!
//! Validating admission for `VirtualMachineInstancetype` and
//! `VirtualMachineClusterInstancetype` resources: resource definitions,
//! validation policies, admitters and the servers that expose them.

pub mod config;
pub mod crd;
pub mod health;
pub mod webhooks;

pub use config::WebhookConfig;
pub use health::HealthState;
pub use webhooks::{
    Admitter, ClusterInstancetypeAdmitter, InstancetypeAdmitter, WebhookError,
    bind_webhook_listener, load_tls_config, run_webhook_server,
};
