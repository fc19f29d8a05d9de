use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use todo_core::{PageResponse, Summary, Task, TaskInput, TaskPage, API_PATH};
use tracing::debug;

use crate::{ServiceError, TodoService};

/// Async HTTP client implementation of TodoService.
pub struct HttpService {
    base_url: String,
    client: Client,
}

impl HttpService {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}{API_PATH}", self.base_url)
    }

    fn detail_url(&self, id: i64) -> String {
        format!("{}{API_PATH}{id}/", self.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ServiceError> {
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn post_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        debug!(%url, "POST");
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn put_json<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ServiceError> {
        debug!(%url, "PUT");
        let resp = self
            .client
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        handle_response(resp).await
    }

    async fn delete_req(&self, url: &str) -> Result<(), ServiceError> {
        debug!(%url, "DELETE");
        let resp = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(parse_error(resp).await)
        }
    }
}

async fn handle_response<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    if status.is_success() {
        resp.json::<T>()
            .await
            .map_err(|e| ServiceError::Internal(format!("json decode: {e}")))
    } else {
        Err(parse_error_with_status(status, resp).await)
    }
}

async fn parse_error(resp: reqwest::Response) -> ServiceError {
    let status = resp.status();
    parse_error_with_status(status, resp).await
}

async fn parse_error_with_status(status: StatusCode, resp: reqwest::Response) -> ServiceError {
    let body = resp.text().await.unwrap_or_default();
    // Field errors come back as an object keyed by field; keep the raw body.
    let msg = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v["detail"].as_str().map(String::from))
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        ServiceError::NotFound(msg)
    } else if status == StatusCode::BAD_REQUEST {
        ServiceError::InvalidInput(msg)
    } else {
        ServiceError::Internal(format!("{status}: {msg}"))
    }
}

#[async_trait]
impl TodoService for HttpService {
    async fn list_tasks(&self, page: u64) -> Result<TaskPage, ServiceError> {
        let url = format!("{}?page={page}", self.collection_url());
        let body: PageResponse = self.get_json(&url).await?;
        Ok(body.into_task_page())
    }

    async fn get_task(&self, id: i64) -> Result<Task, ServiceError> {
        self.get_json(&self.detail_url(id)).await
    }

    async fn create_task(&self, input: &TaskInput) -> Result<Task, ServiceError> {
        self.post_json(&self.collection_url(), input).await
    }

    async fn update_task(&self, input: &TaskInput, id: i64) -> Result<Task, ServiceError> {
        self.put_json(&self.detail_url(id), input).await
    }

    async fn delete_task(&self, id: i64) -> Result<(), ServiceError> {
        self.delete_req(&self.detail_url(id)).await
    }

    async fn get_summary(&self) -> Result<Summary, ServiceError> {
        self.get_json(&format!("{}summary/", self.collection_url()))
            .await
    }
}
