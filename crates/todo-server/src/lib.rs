pub mod request_log;
mod routes;
pub mod store;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;

pub use request_log::{RecordedRequest, RequestLog};
pub use routes::DEFAULT_PAGE_SIZE;

use routes::InnerAppState;
use store::TaskStore;

/// Build the API router over an empty store. Pass a `RequestLog` to record
/// every request the router sees.
pub fn app(page_size: u64, requests: Option<RequestLog>) -> Router {
    let state = Arc::new(InnerAppState {
        store: TaskStore::new(),
        page_size,
        requests,
    });
    routes::build_router(state)
}

pub async fn serve(listener: TcpListener, page_size: u64) -> Result<()> {
    axum::serve(listener, app(page_size, None)).await?;
    Ok(())
}
