//! World read from a JSON task description on disk.

use std::path::{Path, PathBuf};

use waypoint_kernel::task::{Task, TaskError};

use crate::contract::PlanningWorld;

/// Why a task file could not be loaded.
#[derive(Debug, thiserror::Error)]
pub enum TaskFileError {
    #[error("cannot read task file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed task file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A task loaded once from a file; `world_id` is the file stem.
#[derive(Debug, Clone)]
pub struct TaskFileWorld {
    world_id: String,
    task: Task,
}

impl TaskFileWorld {
    /// Read and validate the task at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskFileError`] if the file is unreadable, is not valid
    /// JSON, or describes an invalid task.
    pub fn load(path: &Path) -> Result<Self, TaskFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| TaskFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let task: Task = serde_json::from_str(&text).map_err(|source| TaskFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let world_id = path
            .file_stem()
            .map_or_else(|| "task".to_string(), |stem| stem.to_string_lossy().into_owned());
        Ok(Self { world_id, task })
    }
}

impl PlanningWorld for TaskFileWorld {
    fn world_id(&self) -> &str {
        &self.world_id
    }

    fn task(&self) -> Result<Task, TaskError> {
        Ok(self.task.clone())
    }
}
