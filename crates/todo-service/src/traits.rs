use async_trait::async_trait;
use thiserror::Error;
use todo_core::{Summary, Task, TaskInput, TaskPage};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Operations the TODO backend offers. Each call maps to exactly one HTTP
/// request; nothing is cached or retried.
#[async_trait]
pub trait TodoService: Send + Sync {
    /// Fetch one page (1-based) of tasks.
    async fn list_tasks(&self, page: u64) -> Result<TaskPage, ServiceError>;
    async fn get_task(&self, id: i64) -> Result<Task, ServiceError>;
    async fn create_task(&self, input: &TaskInput) -> Result<Task, ServiceError>;
    async fn update_task(&self, input: &TaskInput, id: i64) -> Result<Task, ServiceError>;
    async fn delete_task(&self, id: i64) -> Result<(), ServiceError>;
    async fn get_summary(&self) -> Result<Summary, ServiceError>;
}
