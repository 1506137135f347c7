//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};

use crate::core::identity::TaskId;
use crate::core::store::TaskStore;
use crate::entities::Task;

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Resolve a task by full id, id prefix, or business reference
pub fn resolve_task(store: &dyn TaskStore, query: &str) -> Result<Task> {
    if let Ok(id) = query.parse::<TaskId>() {
        return store
            .get(&id)
            .into_diagnostic()?
            .ok_or_else(|| miette::miette!("task '{}' not found", query));
    }

    let upper = query.to_uppercase();
    let mut matches: Vec<Task> = store
        .get_all()
        .into_diagnostic()?
        .into_iter()
        .filter(|t| {
            t.task_reference.as_deref() == Some(query) || t.id.to_string().starts_with(&upper)
        })
        .collect();

    match matches.len() {
        0 => Err(miette::miette!("task '{}' not found", query)),
        1 => Ok(matches.remove(0)),
        n => Err(miette::miette!(
            "'{}' is ambiguous: {} tasks match; use the full TASK- id",
            query,
            n
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::MemoryStore;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("a very long string", 10), "a very ...");
    }

    #[test]
    fn test_resolve_task_by_reference() {
        let mut store = MemoryStore::new();
        let mut task = Task::new("test".to_string());
        task.task_reference = Some("ABC-1".to_string());
        let id = task.id.clone();
        store.upsert_batch(&[task]).unwrap();

        assert_eq!(resolve_task(&store, "ABC-1").unwrap().id, id);
        assert_eq!(resolve_task(&store, &id.to_string()).unwrap().id, id);
        assert!(resolve_task(&store, "NOPE").is_err());
    }
}
