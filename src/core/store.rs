//! Task store abstraction and implementations
//!
//! The reconciliation engine only ever talks to the [`TaskStore`] trait.
//! The on-disk implementation keeps one YAML file per task and rejects
//! writes whose revision token no longer matches the stored record, so
//! concurrent writers fail loudly instead of losing updates.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::identity::TaskId;
use crate::core::project::Project;
use crate::entities::Task;

/// Abstract persistent mapping from task id to task record
pub trait TaskStore {
    /// Load every task
    fn get_all(&self) -> Result<Vec<Task>, StoreError>;

    /// Load one task by internal id
    fn get(&self, id: &TaskId) -> Result<Option<Task>, StoreError>;

    /// Load all tasks carrying the given business reference
    fn find_by_reference(&self, reference: &str) -> Result<Vec<Task>, StoreError>;

    /// Insert or update tasks, one at a time, in order
    ///
    /// Each task's `revision` must equal the stored revision (new tasks
    /// excepted); the store bumps the revision as it writes.
    fn upsert_batch(&mut self, tasks: &[Task]) -> Result<(), StoreError>;
}

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed task file {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_yml::Error,
    },

    #[error("failed to encode task {id}: {source}")]
    Encode {
        id: TaskId,
        source: serde_yml::Error,
    },

    #[error("revision conflict on {id}: wrote at revision {expected}, store has {found}")]
    RevisionConflict {
        id: TaskId,
        expected: u32,
        found: u32,
    },
}

/// File extension for task records
const TASK_FILE_SUFFIX: &str = ".trt.yaml";

/// One-YAML-file-per-task store rooted in a project's tasks directory
#[derive(Debug)]
pub struct YamlStore {
    dir: PathBuf,
}

impl YamlStore {
    /// Create a store over an arbitrary directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Create a store over a project's tasks directory
    pub fn open(project: &Project) -> Self {
        Self::new(project.tasks_dir())
    }

    fn task_path(&self, id: &TaskId) -> PathBuf {
        self.dir.join(format!("{}{}", id, TASK_FILE_SUFFIX))
    }

    fn load_file(path: &Path) -> Result<Task, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&content).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl TaskStore for YamlStore {
    fn get_all(&self) -> Result<Vec<Task>, StoreError> {
        let mut tasks = Vec::new();
        if !self.dir.exists() {
            return Ok(tasks);
        }

        for entry in walkdir::WalkDir::new(&self.dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().to_string_lossy().ends_with(TASK_FILE_SUFFIX))
        {
            tasks.push(Self::load_file(entry.path())?);
        }

        tasks.sort_by_key(|t| t.id.to_string());
        Ok(tasks)
    }

    fn get(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        let path = self.task_path(id);
        if !path.exists() {
            return Ok(None);
        }
        Self::load_file(&path).map(Some)
    }

    fn find_by_reference(&self, reference: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.task_reference.as_deref() == Some(reference))
            .collect())
    }

    fn upsert_batch(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        for task in tasks {
            let path = self.task_path(&task.id);
            let mut stored = task.clone();

            if path.exists() {
                let current = Self::load_file(&path)?;
                if current.revision != task.revision {
                    return Err(StoreError::RevisionConflict {
                        id: task.id.clone(),
                        expected: task.revision,
                        found: current.revision,
                    });
                }
                stored.revision = task.revision + 1;
            }

            let yaml = serde_yml::to_string(&stored).map_err(|source| StoreError::Encode {
                id: task.id.clone(),
                source,
            })?;
            std::fs::write(&path, yaml).map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// In-memory store for engine tests and tooling
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: BTreeMap<String, Task>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<Task>, StoreError> {
        Ok(self.tasks.values().cloned().collect())
    }

    fn get(&self, id: &TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.tasks.get(&id.to_string()).cloned())
    }

    fn find_by_reference(&self, reference: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self
            .tasks
            .values()
            .filter(|t| t.task_reference.as_deref() == Some(reference))
            .cloned()
            .collect())
    }

    fn upsert_batch(&mut self, tasks: &[Task]) -> Result<(), StoreError> {
        for task in tasks {
            let key = task.id.to_string();
            let mut stored = task.clone();
            if let Some(current) = self.tasks.get(&key) {
                if current.revision != task.revision {
                    return Err(StoreError::RevisionConflict {
                        id: task.id.clone(),
                        expected: task.revision,
                        found: current.revision,
                    });
                }
                stored.revision = task.revision + 1;
            }
            self.tasks.insert(key, stored);
        }
        Ok(())
    }
}
