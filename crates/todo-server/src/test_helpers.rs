use tokio::net::TcpListener;

use crate::{RequestLog, DEFAULT_PAGE_SIZE};

/// A running test server with base_url, request log and background task handle.
pub struct TestServer {
    pub base_url: String,
    pub requests: RequestLog,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port with the default page size.
/// Returns the TestServer with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with_page_size(DEFAULT_PAGE_SIZE).await
}

pub async fn spawn_test_server_with_page_size(page_size: u64) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let requests = RequestLog::new();
    let app = crate::app(page_size, Some(requests.clone()));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        requests,
        _handle: handle,
    }
}
