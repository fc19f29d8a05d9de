use crate::datetime::DisplayZone;
use crate::task::{Priority, Status, Task, TaskInput};

pub const TITLE_REQUIRED: &str = "題名は必須です。";
pub const DESCRIPTION_REQUIRED: &str = "詳細は必須です。";
pub const DUE_DATE_INVALID: &str = "期限は YYYY-MM-DDTHH:MM の形式で入力してください。";

/// Raw contents of the create/edit form. `due_date` holds the local-input
/// representation, empty when the task has no due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    pub due_date: String,
}

/// Per-field messages; a field is valid when its entry is `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub title: Option<&'static str>,
    pub description: Option<&'static str>,
    pub due_date: Option<&'static str>,
}

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }
}

impl TaskDraft {
    pub fn from_task(task: &Task, zone: &DisplayZone) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status,
            priority: task.priority,
            due_date: task
                .due_date
                .as_ref()
                .map(|d| zone.format_date_to_local(d))
                .unwrap_or_default(),
        }
    }

    /// Check the draft and build the request body. All field errors are
    /// collected, not just the first.
    pub fn validate(&self, zone: &DisplayZone) -> Result<TaskInput, FormErrors> {
        let mut errors = FormErrors::default();

        if self.title.trim().is_empty() {
            errors.title = Some(TITLE_REQUIRED);
        }
        if self.description.trim().is_empty() {
            errors.description = Some(DESCRIPTION_REQUIRED);
        }

        let due_date = if self.due_date.trim().is_empty() {
            None
        } else {
            match zone.parse_local_input(&self.due_date) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.due_date = Some(DUE_DATE_INVALID);
                    None
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(TaskInput {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            due_date,
        })
    }
}
