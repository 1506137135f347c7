//! Persistent entity types for the task register

pub mod task;

pub use task::{ChangeDetail, HistoryEntry, ResolutionStatus, Task, TaskStatus};
