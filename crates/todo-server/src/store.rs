//! In-memory task table with the paging and ordering rules of the API.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use chrono::Utc;
use thiserror::Error;
use todo_core::{Summary, Task, TaskInput};

pub const TITLE_MAX_CHARS: usize = 255;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found.")]
    NotFound,

    #[error("Invalid page.")]
    InvalidPage,

    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: &'static str,
    },
}

/// A slice of the ordered collection.
#[derive(Debug, Clone)]
pub struct PageSlice {
    pub count: u64,
    pub tasks: Vec<Task>,
    pub has_next: bool,
    pub has_previous: bool,
}

#[derive(Default)]
struct Inner {
    tasks: BTreeMap<i64, Task>,
    next_id: i64,
}

#[derive(Default)]
pub struct TaskStore {
    inner: Mutex<Inner>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Page `page` (1-based) of tasks ordered by due date, undated last,
    /// ties by id. Page 1 always exists, even when the table is empty.
    pub fn list_page(&self, page: u64, page_size: u64) -> Result<PageSlice, StoreError> {
        if page == 0 || page_size == 0 {
            return Err(StoreError::InvalidPage);
        }
        let inner = self.lock();
        let mut ordered: Vec<&Task> = inner.tasks.values().collect();
        ordered.sort_by_key(|t| (t.due_date.is_none(), t.due_date, t.id));

        let count = ordered.len() as u64;
        let pages = count.div_ceil(page_size).max(1);
        if page > pages {
            return Err(StoreError::InvalidPage);
        }

        let start = ((page - 1) * page_size) as usize;
        let tasks = ordered
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();
        Ok(PageSlice {
            count,
            tasks,
            has_next: page < pages,
            has_previous: page > 1,
        })
    }

    pub fn get(&self, id: i64) -> Result<Task, StoreError> {
        self.lock().tasks.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    pub fn create(&self, input: &TaskInput) -> Result<Task, StoreError> {
        validate(input)?;
        let now = Utc::now().fixed_offset();
        let mut inner = self.lock();
        inner.next_id += 1;
        let task = Task {
            id: inner.next_id,
            title: input.title.clone(),
            description: input.description.clone(),
            status: input.status,
            priority: input.priority,
            due_date: input.due_date,
            created_at: now,
            updated_at: now,
        };
        inner.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    pub fn update(&self, id: i64, input: &TaskInput) -> Result<Task, StoreError> {
        let mut inner = self.lock();
        let task = inner.tasks.get_mut(&id).ok_or(StoreError::NotFound)?;
        validate(input)?;
        task.title = input.title.clone();
        task.description = input.description.clone();
        task.status = input.status;
        task.priority = input.priority;
        task.due_date = input.due_date;
        task.updated_at = Utc::now().fixed_offset();
        Ok(task.clone())
    }

    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.lock()
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    pub fn summary(&self) -> Summary {
        let inner = self.lock();
        Summary {
            total: inner.tasks.len() as u64,
            completed: inner.tasks.values().filter(|t| t.is_completed()).count() as u64,
        }
    }
}

fn validate(input: &TaskInput) -> Result<(), StoreError> {
    if input.title.trim().is_empty() {
        return Err(StoreError::Invalid {
            field: "title",
            message: "This field may not be blank.",
        });
    }
    if input.title.chars().count() > TITLE_MAX_CHARS {
        return Err(StoreError::Invalid {
            field: "title",
            message: "Ensure this field has no more than 255 characters.",
        });
    }
    Ok(())
}
