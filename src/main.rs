use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use webhookmail::config::AppConfig;
use webhookmail::services::provider::LocalIdentityProvider;
use webhookmail::services::realtime::RealtimeHub;
use webhookmail::services::session_sync::{SessionSyncStore, TracingDiagnostics};
use webhookmail::{routes, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().expect("invalid configuration");
    let port = config.port;
    tracing::info!(alias_domain = %config.alias_domain, bucket = %config.attachments_bucket, "configuration loaded");

    let provider = Arc::new(LocalIdentityProvider::new());
    let realtime = Arc::new(RealtimeHub::new());
    let (sessions, sync) = SessionSyncStore::start(provider.clone(), realtime.clone(), Arc::new(TracingDiagnostics))
        .await
        .expect("session store init failed");

    let state = state::AppState::new(config, sessions, provider);
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "webhookmail listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server failed");

    sync.shutdown().await;
    realtime.close();
    tracing::info!("shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
