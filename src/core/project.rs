//! Project discovery and structure

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Represents a TRT project
#[derive(Debug)]
pub struct Project {
    /// Root directory of the project (parent of .trt/)
    root: PathBuf,
}

impl Project {
    /// Find project root by walking up from the current directory
    pub fn discover() -> Result<Self, ProjectError> {
        let current =
            std::env::current_dir().map_err(|e| ProjectError::IoError(e.to_string()))?;
        Self::discover_from(&current)
    }

    /// Find project root by walking up from the given directory
    pub fn discover_from(start: &Path) -> Result<Self, ProjectError> {
        let mut current = start
            .canonicalize()
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        loop {
            let trt_dir = current.join(".trt");
            if trt_dir.is_dir() {
                return Ok(Self { root: current });
            }

            if !current.pop() {
                return Err(ProjectError::NotFound {
                    searched_from: start.to_path_buf(),
                });
            }
        }
    }

    /// Create a new project structure at the given path
    pub fn init(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        let trt_dir = root.join(".trt");
        if trt_dir.exists() {
            return Err(ProjectError::AlreadyExists(root.clone()));
        }

        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    /// Force initialization even if .trt/ exists
    pub fn init_force(path: &Path) -> Result<Self, ProjectError> {
        let root = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self::write_structure(&root)?;
        Ok(Self { root })
    }

    fn write_structure(root: &Path) -> Result<(), ProjectError> {
        let trt_dir = root.join(".trt");
        std::fs::create_dir_all(&trt_dir).map_err(|e| ProjectError::IoError(e.to_string()))?;

        let config_path = trt_dir.join("config.yaml");
        std::fs::write(&config_path, Self::default_config())
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        std::fs::create_dir_all(root.join("tasks"))
            .map_err(|e| ProjectError::IoError(e.to_string()))?;

        Ok(())
    }

    fn default_config() -> &'static str {
        r#"# TRT Project Configuration

# Default author recorded on imported and edited tasks
# author: ""

# External mapping-suggestion command. It receives a JSON request on stdin
# and must print a JSON response on stdout. Leave unset to disable the
# suggestion pass; unresolved columns are then mapped manually.
# suggest:
#   command: ""
"#
    }

    /// Get the project root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the .trt configuration directory
    pub fn trt_dir(&self) -> PathBuf {
        self.root.join(".trt")
    }

    /// Get the task register directory
    pub fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }
}

/// Errors that can occur during project operations
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("not a TRT project (searched from {searched_from:?}). Run 'trt init' to create one.")]
    NotFound { searched_from: PathBuf },

    #[error("TRT project already exists at {0:?}")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    IoError(String),
}
