use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use courtslot::config::Config;
use courtslot::engine::Engine;
use courtslot::http::{create_router, AppState};
use courtslot::registry::Registry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    courtslot::observability::init(config.metrics_port)?;

    let registry = match &config.seed_file {
        Some(path) => Registry::from_file(path)?,
        None => Registry::builtin()?,
    };
    metrics::gauge!(courtslot::observability::RESOURCES_LOADED).set(registry.len() as f64);
    let resource_count = registry.len();

    let engine = Arc::new(Engine::new(registry, config.duration_policy));
    let app = create_router(AppState::new(Arc::clone(&engine)));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("courtslot listening on {addr}");
    info!(
        "  seed: {}",
        config
            .seed_file
            .as_ref()
            .map_or("built-in".to_string(), |p| p.display().to_string())
    );
    info!("  resources: {resource_count}");
    info!("  duration policy: {}", engine.policy());
    info!(
        "  metrics: {}",
        config
            .metrics_port
            .map_or("disabled".to_string(), |p| format!("http://0.0.0.0:{p}/metrics"))
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("courtslot stopped");
    Ok(())
}

/// Resolves on SIGTERM or ctrl-c; in-flight requests are allowed to finish.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(e) => {
                tracing::warn!("failed to register SIGTERM handler: {e}");
                ctrl_c.await.ok();
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
    }
    info!("shutdown signal received, draining in-flight requests");
}
