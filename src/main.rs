use anyhow::{Context, Result};
use axum::Router;
use std::io::ErrorKind;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod testing;
mod utils;
mod validators;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting objects-api with config: {:?}", cfg);

    if cfg.objecttypes.is_empty() {
        tracing::warn!(
            "No objecttypes API configured; set OBJECTS_OBJECTTYPES_API_ROOTS or --objecttypes-api-root"
        );
    }
    for service in &cfg.objecttypes {
        tracing::debug!(
            "Objecttypes API {} (token: {})",
            service.api_root,
            if service.auth_token.is_some() { "set" } else { "none" }
        );
    }

    // --- Initialize core service ---
    let objecttypes =
        services::objecttypes::ObjectTypesClient::new(cfg.objecttypes.clone(), cfg.request_timeout)
            .context("building objecttypes HTTP client")?;
    let service = services::object_service::ObjectService::new(objecttypes);

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(service);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
