//! instancetype-webhook - validating admission webhook for instance types.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Loads configuration from the environment
//! - Starts the health server and the TLS webhook server

use std::sync::Arc;

use tokio::signal;
use tracing::{error, info, warn};

use instancetype_webhook::health::{HealthState, run_health_server};
use instancetype_webhook::{
    WebhookConfig, bind_webhook_listener, load_tls_config, run_webhook_server,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("instancetype_webhook=info".parse()?),
        )
        .json()
        .init();

    info!("Starting instancetype-webhook");

    if rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .is_err()
    {
        warn!("A rustls crypto provider was already installed");
    }

    let config = WebhookConfig::from_env()?;
    info!(
        cert_path = %config.cert_path.display(),
        key_path = %config.key_path.display(),
        webhook_port = config.webhook_port,
        health_port = config.health_port,
        "Loaded configuration"
    );

    if !config.tls_files_present() {
        error!("Webhook TLS certificate or key not found");
        return Err("webhook TLS certificate or key not found".into());
    }

    // Create shared health state
    let health_state = Arc::new(HealthState::new());

    // Start health server immediately so liveness probes work during startup
    let health_handle = {
        let health_state = health_state.clone();
        let port = config.health_port;
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state, port).await {
                error!("Health server error: {}", e);
            }
        })
    };

    // Load TLS and hold the port before reporting ready
    let tls = load_tls_config(&config.cert_path, &config.key_path).await?;
    let listener = bind_webhook_listener(config.webhook_port)?;

    let webhook_handle = {
        let health_state = health_state.clone();
        tokio::spawn(async move {
            if let Err(e) = run_webhook_server(health_state, listener, tls).await {
                error!("Webhook server error: {}", e);
            }
        })
    };

    health_state.set_ready(true).await;

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = webhook_handle => {
            if let Err(e) = result {
                error!("Webhook server task panicked: {}", e);
            }
        }
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Stop receiving new admission requests
            health_state.set_ready(false).await;
            info!("Marked webhook as not ready");
        }
    }

    info!("Webhook stopped");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the webhook cannot shut down
/// gracefully without them.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
