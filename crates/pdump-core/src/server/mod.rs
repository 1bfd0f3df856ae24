//! Host pipeline: an HTTP server that runs every configured dump as middleware
//! (in configuration order) and then answers with the static responder.

mod dump_layer;

pub use dump_layer::{dump, DumpRoute};

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{middleware, Router};

use crate::config::PdumpConfig;
use crate::error::ConfigError;

/// Build the router for `cfg`. Fails if any dump entry is invalid.
pub fn build_router(cfg: &PdumpConfig) -> Result<Router, ConfigError> {
    let status = StatusCode::from_u16(cfg.respond.status)
        .map_err(|_| ConfigError::InvalidStatus(cfg.respond.status))?;

    let routes = cfg
        .dump
        .iter()
        .enumerate()
        .map(|(index, dump)| DumpRoute::new(dump).map_err(|e| e.in_dump(index)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut router: Router = Router::new()
        .fallback(respond)
        .with_state(Arc::new(Responder {
            status,
            body: cfg.respond.body.clone(),
        }));

    // The last layer added runs first, so add them in reverse to keep config order.
    for route in routes.into_iter().rev() {
        router = router.layer(middleware::from_fn_with_state(Arc::new(route), dump));
    }
    Ok(router)
}

struct Responder {
    status: StatusCode,
    body: String,
}

async fn respond(State(responder): State<Arc<Responder>>) -> impl IntoResponse {
    (responder.status, responder.body.clone())
}

/// Bind `cfg.listen` and serve until `shutdown` resolves.
pub async fn serve<F>(cfg: &PdumpConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = cfg.listen_addr()?;
    let router = build_router(cfg)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!(
        listen = %listener.local_addr().unwrap_or(addr),
        dumps = cfg.dump.len(),
        "pdump listening"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .context("http server failed")?;

    tracing::info!("pdump server stopped");
    Ok(())
}

/// Resolves on Ctrl-C.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("could not listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
}
