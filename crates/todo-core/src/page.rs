use serde::{Deserialize, Serialize};

use crate::Task;

/// Paginated list body as the backend sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse {
    pub count: u64,
    #[serde(default)]
    pub page_size: Option<u64>,
    pub results: Vec<Task>,
    #[serde(default)]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageLinks {
    pub next: Option<String>,
    pub previous: Option<String>,
}

impl PageResponse {
    pub fn into_task_page(self) -> TaskPage {
        let total_pages = total_pages(self.count, self.page_size, self.results.len());
        TaskPage {
            tasks: self.results,
            total_pages,
        }
    }
}

/// One page of tasks plus the page count derived from the response.
#[derive(Debug, Clone, Default)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub total_pages: u64,
}

/// `ceil(count / page_size)`. Without a page size the length of the
/// returned page stands in for it; a zero page size yields zero pages.
pub fn total_pages(count: u64, page_size: Option<u64>, results_len: usize) -> u64 {
    let page_size = match page_size {
        Some(size) if size > 0 => size,
        _ => results_len as u64,
    };
    if page_size == 0 {
        return 0;
    }
    count.div_ceil(page_size)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "total_tasks")]
    pub total: u64,
    #[serde(rename = "completed_tasks")]
    pub completed: u64,
}
