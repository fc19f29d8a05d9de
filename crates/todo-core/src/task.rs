use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::TodoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: &[Status] = &[Status::NotStarted, Status::InProgress, Status::Done];

    pub fn as_u8(&self) -> u8 {
        match self {
            Status::NotStarted => 0,
            Status::InProgress => 1,
            Status::Done => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Status::NotStarted => "未実施",
            Status::InProgress => "実施中",
            Status::Done => "完了",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Status::NotStarted),
            1 => Some(Status::InProgress),
            2 => Some(Status::Done),
            _ => None,
        }
    }

    /// Cycle forward through the lookup table, wrapping at the end.
    pub fn next(&self) -> Self {
        match self {
            Status::NotStarted => Status::InProgress,
            Status::InProgress => Status::Done,
            Status::Done => Status::NotStarted,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Status::NotStarted => Status::Done,
            Status::InProgress => Status::NotStarted,
            Status::Done => Status::InProgress,
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = TodoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Status::from_u8(value)
            .ok_or_else(|| TodoError::InvalidInput(format!("unknown status: {value}")))
    }
}

impl From<Status> for u8 {
    fn from(status: Status) -> Self {
        status.as_u8()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: &[Priority] = &[Priority::Low, Priority::Medium, Priority::High];

    pub fn as_u8(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "低",
            Priority::Medium => "中",
            Priority::High => "高",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Priority::Low),
            1 => Some(Priority::Medium),
            2 => Some(Priority::High),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = TodoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::from_u8(value)
            .ok_or_else(|| TodoError::InvalidInput(format!("unknown priority: {value}")))
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        priority.as_u8()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A task as the backend returns it. `id` and the timestamps are
/// server-assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub status: Status,
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<FixedOffset>>,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == Status::Done
    }

    /// The writable part of the task, as sent back on update.
    pub fn to_input(&self) -> TaskInput {
        TaskInput {
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
        }
    }
}

/// Request body for create (`POST`) and full update (`PUT`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<FixedOffset>>,
}

// The backend stores a nullable description.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
