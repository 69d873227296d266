//! Admission webhook server.
//!
//! Provides HTTPS endpoints for the instance type admitters.
//!
//! To enable the webhook:
//! 1. Issue a serving certificate (e.g. with cert-manager)
//! 2. Mount the certificate secret at /etc/webhook/certs/
//! 3. Register a ValidatingWebhookConfiguration pointing CREATE and UPDATE of
//!    both instance type resources at the paths below

use std::net::{SocketAddr, TcpListener};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post};
use axum_server::tls_rustls::RustlsConfig;
use kube::core::DynamicObject;
use kube::core::admission::{AdmissionRequest, AdmissionResponse, AdmissionReview};
use thiserror::Error;
use tracing::{error, info};

use super::admitter::{Admitter, ClusterInstancetypeAdmitter, InstancetypeAdmitter};
use crate::health::HealthState;

/// Path served by the namespaced instance type admitter
pub const INSTANCETYPE_VALIDATE_PATH: &str = "/virtualmachineinstancetypes-validate";
/// Path served by the cluster-scoped instance type admitter
pub const CLUSTER_INSTANCETYPE_VALIDATE_PATH: &str = "/virtualmachineclusterinstancetypes-validate";

/// Create the webhook router
pub fn create_webhook_router(state: Arc<HealthState>) -> Router {
    Router::new()
        .route(
            INSTANCETYPE_VALIDATE_PATH,
            post(validate::<InstancetypeAdmitter>),
        )
        .route(
            CLUSTER_INSTANCETYPE_VALIDATE_PATH,
            post(validate::<ClusterInstancetypeAdmitter>),
        )
        .with_state(state)
}

/// Admission handler shared by both routes
async fn validate<A: Admitter + Default + 'static>(
    State(state): State<Arc<HealthState>>,
    Json(review): Json<AdmissionReview<DynamicObject>>,
) -> impl IntoResponse {
    let (status, review) = review_with(&A::default(), &state, review);
    (status, Json(review))
}

/// Convert the review, run the admitter and record the outcome.
fn review_with<A: Admitter>(
    admitter: &A,
    state: &HealthState,
    review: AdmissionReview<DynamicObject>,
) -> (StatusCode, AdmissionReview<DynamicObject>) {
    let request: AdmissionRequest<DynamicObject> = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, kind = %admitter.kind(), "Failed to extract admission request");
            return (
                StatusCode::BAD_REQUEST,
                AdmissionResponse::invalid(format!("Invalid AdmissionReview: {}", e)).into_review(),
            );
        }
    };

    let start = Instant::now();
    let response = admitter.admit(&request);
    state.metrics.record_admission(
        admitter.kind(),
        &request.operation,
        response.allowed,
        start.elapsed().as_secs_f64(),
    );

    (StatusCode::OK, response.into_review())
}

/// Errors that can occur when running the webhook server
#[derive(Error, Debug)]
pub enum WebhookError {
    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),
    /// Listener could not be bound
    #[error("Failed to bind webhook port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: std::io::Error,
    },
    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),
}

/// Load the serving certificate and key (PEM format).
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, WebhookError> {
    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .map_err(|e| WebhookError::TlsConfig(e.to_string()))
}

/// Bind the webhook listener on 0.0.0.0:`port`.
pub fn bind_webhook_listener(port: u16) -> Result<TcpListener, WebhookError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).map_err(|source| WebhookError::Bind { port, source })?;
    listener
        .set_nonblocking(true)
        .map_err(|source| WebhookError::Bind { port, source })?;
    Ok(listener)
}

/// Run the webhook server with TLS
///
/// Serves both validation endpoints on an already bound listener, so callers
/// can report readiness only once the certificate loaded and the port is held.
///
/// # Arguments
/// * `state` - Shared health state, used for admission metrics
/// * `listener` - Listener from [`bind_webhook_listener`]
/// * `tls` - Serving configuration from [`load_tls_config`]
pub async fn run_webhook_server(
    state: Arc<HealthState>,
    listener: TcpListener,
    tls: RustlsConfig,
) -> Result<(), WebhookError> {
    let app = create_webhook_router(state);

    let port = listener
        .local_addr()
        .map(|addr| addr.port())
        .map_err(|e| WebhookError::Server(e.to_string()))?;
    info!(port, "Webhook server listening with TLS");

    axum_server::from_tcp_rustls(listener, tls)
        .serve(app.into_make_service())
        .await
        .map_err(|e| WebhookError::Server(e.to_string()))?;

    Ok(())
}
