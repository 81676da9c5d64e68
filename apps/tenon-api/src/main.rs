//! Tenon API server.
//!
//! A small HTTP backend gluing three external services: a document store
//! (Cosmos DB) for record CRUD, an identity provider (Auth0) for tenant
//! provisioning, and a CI platform (GitHub Actions) for deploy triggers.

mod config;
mod health;
mod logging;
mod state;

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};

use config::Config;
use health::health_handler;
use state::AppState;
use tenon_api_onboarding::onboarding_router;
use tenon_api_records::records_router;
use tenon_ci::DispatchClient;
use tenon_docstore::DocStoreClient;
use tenon_idp::{ManagementClient, ProvisioningWorkflow};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        env = %config.app_env,
        "Starting tenon API"
    );

    if let Err(e) = config.validate_security_config() {
        error!("{e}");
        std::process::exit(1);
    }

    let store = match DocStoreClient::new(config.docstore.clone()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("Failed to create document store client: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = store.ensure_container().await {
        error!("Failed to prepare document container: {e}");
        std::process::exit(1);
    }

    let management = match ManagementClient::new(config.idp.clone()) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create identity management client: {e}");
            std::process::exit(1);
        }
    };
    let workflow = Arc::new(ProvisioningWorkflow::new(Arc::new(management)));
    let ci = Arc::new(DispatchClient::new(config.ci.clone()));

    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(AppState::new())
        .merge(records_router(store))
        .merge(onboarding_router(workflow, ci))
        .layer(build_cors_layer(&config.cors_allowed_origins));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };
    info!(addr = %addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {e}");
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// CORS layer from the configured origin list; `*` means any origin.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }
    let origins: Vec<axum::http::HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Resolve on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
