use todo_core::{Summary, Task, TaskInput, TaskPage};
use tokio::runtime::Runtime;

use crate::{HttpService, ServiceError, TodoService};

/// Blocking wrapper around the async `HttpService`.
///
/// Creates an internal tokio runtime and uses `block_on()` for each call.
/// Designed for sync callers like the TUI.
pub struct BlockingHttpService {
    inner: HttpService,
    rt: Runtime,
}

impl BlockingHttpService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        let rt = Runtime::new()
            .map_err(|e| ServiceError::Internal(format!("failed to create tokio runtime: {e}")))?;
        Ok(Self {
            inner: HttpService::new(base_url),
            rt,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }

    pub fn list_tasks(&self, page: u64) -> Result<TaskPage, ServiceError> {
        self.rt.block_on(self.inner.list_tasks(page))
    }

    pub fn get_task(&self, id: i64) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.get_task(id))
    }

    pub fn create_task(&self, input: &TaskInput) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.create_task(input))
    }

    pub fn update_task(&self, input: &TaskInput, id: i64) -> Result<Task, ServiceError> {
        self.rt.block_on(self.inner.update_task(input, id))
    }

    pub fn delete_task(&self, id: i64) -> Result<(), ServiceError> {
        self.rt.block_on(self.inner.delete_task(id))
    }

    pub fn get_summary(&self) -> Result<Summary, ServiceError> {
        self.rt.block_on(self.inner.get_summary())
    }
}
