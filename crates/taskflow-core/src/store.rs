use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::task::Task;

const STORE_FILE: &str = "tasks.json";

/// Durable round-trip of the task collection to one JSON file.
///
/// The file holds the full collection as a JSON array in the wire layout of
/// [`Task`]; every save rewrites the whole array. Collections here are
/// personal task lists, so the simplicity of a full overwrite wins over
/// incremental writes. If two processes share the file, last writer wins.
#[derive(Debug)]
pub struct Store {
    pub data_dir: PathBuf,
    pub tasks_path: PathBuf,
}

impl Store {
    #[tracing::instrument(skip(data_dir))]
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let data_dir = data_dir.to_path_buf();
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create {}", data_dir.display()))?;

        let tasks_path = data_dir.join(STORE_FILE);
        if !tasks_path.exists() {
            fs::write(&tasks_path, "[]\n")
                .with_context(|| format!("failed to seed {}", tasks_path.display()))?;
        }

        info!(
            data_dir = %data_dir.display(),
            tasks = %tasks_path.display(),
            "opened store"
        );

        Ok(Self {
            data_dir,
            tasks_path,
        })
    }

    /// Loads the stored collection.
    ///
    /// A missing or empty file is the normal never-used-before state and
    /// yields an empty collection. Anything unreadable or undecodable is
    /// treated as corrupt: logged and replaced by an empty collection, so
    /// startup never fails because of bad storage.
    #[tracing::instrument(skip(self))]
    pub fn load(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(err) => {
                warn!(
                    file = %self.tasks_path.display(),
                    error = %format!("{err:#}"),
                    "failed to load tasks, starting from an empty list"
                );
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> anyhow::Result<Vec<Task>> {
        if !self.tasks_path.exists() {
            debug!(file = %self.tasks_path.display(), "store file absent");
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.tasks_path)
            .with_context(|| format!("failed reading {}", self.tasks_path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tasks: Vec<Task> = serde_json::from_str(&raw)
            .with_context(|| format!("failed parsing {}", self.tasks_path.display()))?;
        debug!(count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Persists the full collection, atomically replacing the store file.
    ///
    /// A failed write is logged and absorbed: the in-memory collection is
    /// still the truth for the running session, only the durability of this
    /// particular update is lost.
    #[tracing::instrument(skip(self, tasks))]
    pub fn save(&self, tasks: &[Task]) {
        if let Err(err) = self.try_save(tasks) {
            warn!(
                file = %self.tasks_path.display(),
                error = %format!("{err:#}"),
                "failed to save tasks, this update will not survive a restart"
            );
        }
    }

    fn try_save(&self, tasks: &[Task]) -> anyhow::Result<()> {
        debug!(
            file = %self.tasks_path.display(),
            count = tasks.len(),
            "saving tasks atomically"
        );

        let dir = self.tasks_path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = NamedTempFile::new_in(dir)?;
        let serialized = serde_json::to_string_pretty(tasks)?;
        temp.write_all(serialized.as_bytes())?;
        temp.write_all(b"\n")?;
        temp.flush()?;

        temp.persist(&self.tasks_path)
            .map_err(|err| anyhow!("failed to persist {}: {}", self.tasks_path.display(), err))?;

        Ok(())
    }
}
