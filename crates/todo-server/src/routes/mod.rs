pub mod todo;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::request_log::RequestLog;
use crate::store::TaskStore;

pub const DEFAULT_PAGE_SIZE: u64 = 3;

pub struct InnerAppState {
    pub store: TaskStore,
    pub page_size: u64,
    /// Only set when a caller wants to inspect traffic (tests).
    pub requests: Option<RequestLog>,
}

pub type AppState = Arc<InnerAppState>;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(todo::routes())
        .layer(middleware::from_fn_with_state(state.clone(), record_request))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn record_request(State(state): State<AppState>, request: Request, next: Next) -> Response {
    debug!(method = %request.method(), uri = %request.uri(), "request");
    if let Some(log) = &state.requests {
        log.record(request.method(), request.uri());
    }
    next.run(request).await
}
