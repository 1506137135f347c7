//! Field catalog and typed field registry
//!
//! Every field a task can carry is declared here once, with its label,
//! human description, kind, and required flag. All access by field name
//! goes through the [`Field`] enum, so there is no stringly-typed record
//! mutation anywhere in the import path.

pub mod aliases;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::entities::{ResolutionStatus, Task, TaskStatus};

/// The closed set of importable task fields
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    TaskReference,
    Status,
    Assignee,
    DelayDays,
    NetAmount,
    TransportMode,
    Comments,
    ResolutionAdmin,
    ResolutionStatus,
    ResolutionTimeDays,
}

/// Value shape of a field, driving coercion and diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, empty when absent
    Text,
    /// Float, None on empty or unparseable input
    Number,
    /// Member of the task status set, default member otherwise
    Status,
    /// Member of the resolution status set, default member otherwise
    Resolution,
}

impl FieldKind {
    /// Coerce a raw CSV cell into a typed value
    pub fn coerce(&self, raw: &str) -> FieldValue {
        let raw = raw.trim();
        match self {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Number => {
                FieldValue::Number(raw.parse::<f64>().ok().filter(|v| v.is_finite()))
            }
            FieldKind::Status => FieldValue::Status(raw.parse().unwrap_or_default()),
            FieldKind::Resolution => FieldValue::Resolution(raw.parse().unwrap_or_default()),
        }
    }

    /// Rebuild a typed value from its JSON form (history entries, update calls)
    pub fn from_json(&self, value: &Value) -> FieldValue {
        match self {
            FieldKind::Text => FieldValue::Text(value.as_str().unwrap_or_default().to_string()),
            FieldKind::Number => FieldValue::Number(value.as_f64().filter(|v| v.is_finite())),
            FieldKind::Status => FieldValue::Status(
                value
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
            ),
            FieldKind::Resolution => FieldValue::Resolution(
                value
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_default(),
            ),
        }
    }
}

/// A typed field value, comparable for diffing
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(Option<f64>),
    Status(TaskStatus),
    Resolution(ResolutionStatus),
}

impl FieldValue {
    /// JSON form used by history entries and the single-update API
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Number(None) => Value::Null,
            FieldValue::Number(Some(v)) => serde_json::Number::from_f64(*v)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            FieldValue::Status(s) => Value::String(s.to_string()),
            FieldValue::Resolution(r) => Value::String(r.to_string()),
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Number(Some(v)) => write!(f, "{}", v),
            FieldValue::Number(None) => Ok(()),
            FieldValue::Status(s) => write!(f, "{}", s),
            FieldValue::Resolution(r) => write!(f, "{}", r),
        }
    }
}

/// Catalog entry for one field
#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub field: Field,
    pub label: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// The field catalog. Order drives display only, not semantics.
pub const CATALOG: &[FieldDef] = &[
    FieldDef {
        field: Field::TaskReference,
        label: "TO Ref.",
        description: "transport order reference",
        required: true,
    },
    FieldDef {
        field: Field::Status,
        label: "TO Status",
        description: "current processing status",
        required: false,
    },
    FieldDef {
        field: Field::Assignee,
        label: "Assignee",
        description: "person handling the order",
        required: false,
    },
    FieldDef {
        field: Field::DelayDays,
        label: "Delay (days)",
        description: "delivery delay in days",
        required: false,
    },
    FieldDef {
        field: Field::NetAmount,
        label: "Net Amount",
        description: "net invoice amount",
        required: false,
    },
    FieldDef {
        field: Field::TransportMode,
        label: "Transport Mode",
        description: "mode of transport",
        required: false,
    },
    FieldDef {
        field: Field::Comments,
        label: "Comments",
        description: "free-form comments",
        required: false,
    },
    FieldDef {
        field: Field::ResolutionAdmin,
        label: "Resolution Admin",
        description: "administrator resolving the issue",
        required: false,
    },
    FieldDef {
        field: Field::ResolutionStatus,
        label: "Resolution Status",
        description: "issue resolution status",
        required: false,
    },
    FieldDef {
        field: Field::ResolutionTimeDays,
        label: "Resolution Time (days)",
        description: "time to resolution in days",
        required: false,
    },
];

impl Field {
    /// Get the string representation of the field name
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::TaskReference => "task_reference",
            Field::Status => "status",
            Field::Assignee => "assignee",
            Field::DelayDays => "delay_days",
            Field::NetAmount => "net_amount",
            Field::TransportMode => "transport_mode",
            Field::Comments => "comments",
            Field::ResolutionAdmin => "resolution_admin",
            Field::ResolutionStatus => "resolution_status",
            Field::ResolutionTimeDays => "resolution_time_days",
        }
    }

    /// Get all fields, in catalog order
    pub fn all() -> &'static [Field] {
        &[
            Field::TaskReference,
            Field::Status,
            Field::Assignee,
            Field::DelayDays,
            Field::NetAmount,
            Field::TransportMode,
            Field::Comments,
            Field::ResolutionAdmin,
            Field::ResolutionStatus,
            Field::ResolutionTimeDays,
        ]
    }

    /// Value kind for this field
    pub fn kind(&self) -> FieldKind {
        match self {
            Field::Status => FieldKind::Status,
            Field::ResolutionStatus => FieldKind::Resolution,
            Field::DelayDays | Field::NetAmount | Field::ResolutionTimeDays => FieldKind::Number,
            _ => FieldKind::Text,
        }
    }

    /// The catalog entry for this field
    pub fn def(&self) -> &'static FieldDef {
        // the catalog coverage test pins this invariant
        CATALOG
            .iter()
            .find(|d| d.field == *self)
            .expect("catalog covers every field")
    }

    /// Human label for tables and history entries
    pub fn label(&self) -> &'static str {
        self.def().label
    }

    /// Read this field's current value from a task
    pub fn get(&self, task: &Task) -> FieldValue {
        match self {
            Field::TaskReference => {
                FieldValue::Text(task.task_reference.clone().unwrap_or_default())
            }
            Field::Status => FieldValue::Status(task.status),
            Field::Assignee => FieldValue::Text(task.assignee.clone()),
            Field::DelayDays => FieldValue::Number(task.delay_days),
            Field::NetAmount => FieldValue::Number(task.net_amount),
            Field::TransportMode => FieldValue::Text(task.transport_mode.clone()),
            Field::Comments => FieldValue::Text(task.comments.clone()),
            Field::ResolutionAdmin => FieldValue::Text(task.resolution_admin.clone()),
            Field::ResolutionStatus => FieldValue::Resolution(task.resolution_status),
            Field::ResolutionTimeDays => FieldValue::Number(task.resolution_time_days),
        }
    }

    /// Write a value to this field on a task
    pub fn set(&self, task: &mut Task, value: FieldValue) {
        match (self, value) {
            (Field::TaskReference, FieldValue::Text(s)) => {
                task.task_reference = (!s.is_empty()).then_some(s);
            }
            (Field::Status, FieldValue::Status(s)) => task.status = s,
            (Field::Assignee, FieldValue::Text(s)) => task.assignee = s,
            (Field::DelayDays, FieldValue::Number(n)) => task.delay_days = n,
            (Field::NetAmount, FieldValue::Number(n)) => task.net_amount = n,
            (Field::TransportMode, FieldValue::Text(s)) => task.transport_mode = s,
            (Field::Comments, FieldValue::Text(s)) => task.comments = s,
            (Field::ResolutionAdmin, FieldValue::Text(s)) => task.resolution_admin = s,
            (Field::ResolutionStatus, FieldValue::Resolution(r)) => task.resolution_status = r,
            (Field::ResolutionTimeDays, FieldValue::Number(n)) => task.resolution_time_days = n,
            // coerce() and from_json() always build the declared kind
            (_, _) => {}
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Field {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "task_reference" => Ok(Field::TaskReference),
            "status" => Ok(Field::Status),
            "assignee" => Ok(Field::Assignee),
            "delay_days" => Ok(Field::DelayDays),
            "net_amount" => Ok(Field::NetAmount),
            "transport_mode" => Ok(Field::TransportMode),
            "comments" => Ok(Field::Comments),
            "resolution_admin" => Ok(Field::ResolutionAdmin),
            "resolution_status" => Ok(Field::ResolutionStatus),
            "resolution_time_days" => Ok(Field::ResolutionTimeDays),
            _ => Err(CatalogError::UnknownField(s.to_string())),
        }
    }
}

/// Errors raised by field name resolution
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown field '{0}' (valid: task_reference, status, assignee, delay_days, net_amount, transport_mode, comments, resolution_admin, resolution_status, resolution_time_days)")]
    UnknownField(String),
}
