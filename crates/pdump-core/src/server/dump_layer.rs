//! Middleware that runs one `ContentEmitter` for every matching request.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::config::DumpConfig;
use crate::emitter::ContentEmitter;
use crate::error::ConfigError;
use crate::placeholder::Replacer;

/// A configured dump instance plus its request matcher.
#[derive(Debug)]
pub struct DumpRoute {
    path_prefix: Option<String>,
    emitter: Arc<ContentEmitter>,
}

impl DumpRoute {
    pub fn new(cfg: &DumpConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            path_prefix: cfg.path.clone(),
            emitter: Arc::new(ContentEmitter::new(&cfg.emitter)?),
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.path_prefix
            .as_deref()
            .map_or(true, |prefix| path.starts_with(prefix))
    }

    pub fn emitter(&self) -> &ContentEmitter {
        &self.emitter
    }
}

/// Emit for matching requests, then always hand the request to `next`.
pub async fn dump(State(route): State<Arc<DumpRoute>>, req: Request, next: Next) -> Response {
    if route.matches(req.uri().path()) {
        let remote = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let repl = Replacer::from_request(&req, remote);
        let emitter = Arc::clone(&route.emitter);
        if let Err(e) = tokio::task::spawn_blocking(move || emitter.handle(&repl)).await {
            tracing::error!("placeholder dump task failed: {}", e);
        }
    }
    next.run(req).await
}
