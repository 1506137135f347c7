//! Task entity and its append-only history ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::core::identity::TaskId;
use crate::reconcile::Actor;

/// Processing status of a transport work item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Open,
    InProgress,
    Done,
    Blocked,
    Cancelled,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Open => write!(f, "open"),
            TaskStatus::InProgress => write!(f, "in-progress"),
            TaskStatus::Done => write!(f, "done"),
            TaskStatus::Blocked => write!(f, "blocked"),
            TaskStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // External exports spell these with spaces, underscores, or dashes
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "open" => Ok(TaskStatus::Open),
            "in-progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            "blocked" => Ok(TaskStatus::Blocked),
            "cancelled" | "canceled" => Ok(TaskStatus::Cancelled),
            _ => Err(format!("Unknown status: {}", s)),
        }
    }
}

/// Resolution workflow status for tasks flagged for follow-up
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStatus {
    #[default]
    Pending,
    InReview,
    Resolved,
    Dismissed,
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolutionStatus::Pending => write!(f, "pending"),
            ResolutionStatus::InReview => write!(f, "in-review"),
            ResolutionStatus::Resolved => write!(f, "resolved"),
            ResolutionStatus::Dismissed => write!(f, "dismissed"),
        }
    }
}

impl std::str::FromStr for ResolutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "pending" => Ok(ResolutionStatus::Pending),
            "in-review" | "inreview" => Ok(ResolutionStatus::InReview),
            "resolved" => Ok(ResolutionStatus::Resolved),
            "dismissed" => Ok(ResolutionStatus::Dismissed),
            _ => Err(format!("Unknown resolution status: {}", s)),
        }
    }
}

/// One field-level change recorded in a history entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeDetail {
    /// Field name, or the synthetic "import" marker
    pub field: String,

    /// Human label for the field (the import source tag for "import")
    pub field_label: String,

    /// Value before the change (null for import markers and new fields)
    pub old_value: serde_json::Value,

    /// Value after the change
    pub new_value: serde_json::Value,
}

/// One entry in a task's append-only history ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    pub user_name: String,
    pub changes: Vec<ChangeDetail>,
}

impl HistoryEntry {
    /// Record a new entry on behalf of the given actor
    pub fn record(actor: &Actor, changes: Vec<ChangeDetail>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            timestamp: Utc::now(),
            user_id: actor.user_id.clone(),
            user_name: actor.user_name.clone(),
            changes,
        }
    }
}

/// A tracked transport work item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, never reassigned
    pub id: TaskId,

    /// External/business reference key used to match incoming rows
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_reference: Option<String>,

    /// Current processing status
    #[serde(default)]
    pub status: TaskStatus,

    /// Person handling the order
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub assignee: String,

    /// Mode of transport (road, rail, air, sea, ...)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub transport_mode: String,

    /// Free-form comments
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comments: String,

    /// Administrator handling the resolution, if any
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub resolution_admin: String,

    /// Delivery delay in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_days: Option<f64>,

    /// Net invoice amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub net_amount: Option<f64>,

    /// Time to resolution in days
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_time_days: Option<f64>,

    /// Resolution workflow status
    #[serde(default)]
    pub resolution_status: ResolutionStatus,

    /// Creation timestamp, set once and never overwritten
    pub created: DateTime<Utc>,

    /// Author (who first recorded this task)
    pub author: String,

    /// Revision number, compared by the store at write time
    #[serde(default = "default_revision")]
    pub revision: u32,

    /// Append-only history ledger
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<HistoryEntry>,
}

fn default_revision() -> u32 {
    1
}

impl Task {
    /// Create a new empty task with the given author
    pub fn new(author: String) -> Self {
        Self {
            id: TaskId::new(),
            task_reference: None,
            status: TaskStatus::default(),
            assignee: String::new(),
            transport_mode: String::new(),
            comments: String::new(),
            resolution_admin: String::new(),
            delay_days: None,
            net_amount: None,
            resolution_time_days: None,
            resolution_status: ResolutionStatus::default(),
            created: Utc::now(),
            author,
            revision: 1,
            history: Vec::new(),
        }
    }
}
