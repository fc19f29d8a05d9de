pub mod datetime;
pub mod error;
pub mod form;
pub mod page;
pub mod task;

pub use datetime::DisplayZone;
pub use error::TodoError;
pub use page::{PageResponse, Summary, TaskPage};
pub use task::{Priority, Status, Task, TaskInput};

/// Collection path of the TODO API, relative to the server origin.
pub const API_PATH: &str = "/api/todo/";
