//! Task reconciliation engine
//!
//! Merges candidate records into the task store: match by id, then by
//! business reference; diff field by field; merge candidate values over the
//! existing record; append one history entry per processed candidate; and
//! upsert the result. A store failure mid-batch aborts the remaining
//! candidates and surfaces the counts accumulated so far.

use thiserror::Error;

use crate::catalog::Field;
use crate::core::identity::TaskId;
use crate::core::store::{StoreError, TaskStore};
use crate::entities::{ChangeDetail, HistoryEntry, Task};
use crate::ingest::{CandidateRecord, ImportSource};

/// History field name used for the synthetic per-candidate import marker
pub const IMPORT_FIELD: &str = "import";

/// Who is performing a reconciliation or update
///
/// Always passed explicitly; there is no ambient current-user state.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
}

/// Aggregate counts for one reconciliation pass
#[derive(Debug, Clone, Default)]
pub struct ReconcileSummary {
    /// Candidates examined, including skipped ones
    pub processed: usize,
    /// New tasks created
    pub created: usize,
    /// Existing tasks merged
    pub updated: usize,
    /// Candidates rejected (e.g. ambiguous reference), never merged
    pub skipped: usize,
    /// Non-fatal per-candidate notes for the caller to surface
    pub warnings: Vec<String>,
}

/// Errors raised by reconciliation
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error(
        "store failure after {} candidate(s) ({} created, {} updated): {source}",
        .summary.processed,
        .summary.created,
        .summary.updated
    )]
    Store {
        summary: ReconcileSummary,
        source: StoreError,
    },
}

/// Reconcile a batch of candidates against the store, in input order
pub fn reconcile(
    store: &mut dyn TaskStore,
    candidates: &[CandidateRecord],
    actor: &Actor,
    source: ImportSource,
) -> Result<ReconcileSummary, ReconcileError> {
    let mut summary = ReconcileSummary::default();

    for candidate in candidates {
        summary.processed += 1;

        let existing = match find_match(store, candidate) {
            Ok(Found::One(task)) => Some(task),
            Ok(Found::None) => None,
            Ok(Found::Ambiguous { reference, count }) => {
                summary.skipped += 1;
                summary.warnings.push(format!(
                    "row {}: reference '{}' matches {} existing tasks; skipped",
                    candidate.row + 1,
                    reference,
                    count
                ));
                continue;
            }
            Err(source) => return Err(ReconcileError::Store { summary, source }),
        };

        let is_update = existing.is_some();
        let task = match existing {
            Some(existing) => {
                let mut task = existing;
                let diffs = apply_candidate(&mut task, candidate);
                let mut changes = vec![import_change(candidate, source)];
                changes.extend(diffs);
                task.history.push(HistoryEntry::record(actor, changes));
                task
            }
            None => {
                let mut task = Task::new(actor.user_name.clone());
                if let Some(id) = &candidate.id {
                    task.id = id.clone();
                }
                apply_candidate(&mut task, candidate);
                task.history
                    .push(HistoryEntry::record(actor, vec![import_change(candidate, source)]));
                task
            }
        };

        // a failing candidate stays counted in processed, but nothing was
        // written for it, so it never reaches the create/update counts
        if let Err(source) = store.upsert_batch(std::slice::from_ref(&task)) {
            return Err(ReconcileError::Store { summary, source });
        }
        if is_update {
            summary.updated += 1;
        } else {
            summary.created += 1;
        }
    }

    Ok(summary)
}

enum Found {
    One(Task),
    None,
    Ambiguous { reference: String, count: usize },
}

/// Match step: internal id first, business reference second
fn find_match(store: &dyn TaskStore, candidate: &CandidateRecord) -> Result<Found, StoreError> {
    if let Some(id) = &candidate.id {
        return Ok(match store.get(id)? {
            Some(task) => Found::One(task),
            None => Found::None,
        });
    }
    let Some(reference) = candidate.reference() else {
        return Ok(Found::None);
    };
    let mut hits = store.find_by_reference(reference)?;
    Ok(match hits.len() {
        0 => Found::None,
        1 => Found::One(hits.remove(0)),
        count => Found::Ambiguous {
            reference: reference.to_string(),
            count,
        },
    })
}

/// Write candidate fields onto the task, returning one diff per changed field
///
/// Untouched fields, the id, and the creation timestamp are preserved.
fn apply_candidate(task: &mut Task, candidate: &CandidateRecord) -> Vec<ChangeDetail> {
    let mut diffs = Vec::new();
    for (field, value) in &candidate.fields {
        let old = field.get(task);
        if old != *value {
            diffs.push(ChangeDetail {
                field: field.as_str().to_string(),
                field_label: field.label().to_string(),
                old_value: old.to_json(),
                new_value: value.to_json(),
            });
            field.set(task, value.clone());
        }
    }
    diffs
}

/// The always-recorded import marker for one candidate
fn import_change(candidate: &CandidateRecord, source: ImportSource) -> ChangeDetail {
    let mut fields = serde_json::Map::new();
    for (field, value) in &candidate.fields {
        fields.insert(field.as_str().to_string(), value.to_json());
    }
    ChangeDetail {
        field: IMPORT_FIELD.to_string(),
        field_label: source.to_string(),
        old_value: serde_json::Value::Null,
        new_value: serde_json::json!({
            "token": candidate.token,
            "row": candidate.row,
            "fields": fields,
        }),
    }
}

/// Apply caller-supplied changes to a single task, with the same log contract
///
/// Used by interactive edits outside bulk import. The change details carry
/// the old and new values as decided by the caller; no diff is re-derived.
pub fn update_task(
    store: &mut dyn TaskStore,
    id: &TaskId,
    changes: Vec<ChangeDetail>,
    actor: &Actor,
) -> Result<Task, ReconcileError> {
    let mut task = store
        .get(id)
        .map_err(|source| ReconcileError::Store {
            summary: ReconcileSummary::default(),
            source,
        })?
        .ok_or_else(|| ReconcileError::TaskNotFound(id.to_string()))?;

    if changes.is_empty() {
        return Ok(task);
    }

    for change in &changes {
        if let Ok(field) = change.field.parse::<Field>() {
            field.set(&mut task, field.kind().from_json(&change.new_value));
        }
    }
    task.history.push(HistoryEntry::record(actor, changes));

    store
        .upsert_batch(std::slice::from_ref(&task))
        .map_err(|source| ReconcileError::Store {
            summary: ReconcileSummary::default(),
            source,
        })?;

    // return the stored state, including the bumped revision
    store
        .get(id)
        .map_err(|source| ReconcileError::Store {
            summary: ReconcileSummary::default(),
            source,
        })
        .map(|stored| stored.unwrap_or(task))
}
