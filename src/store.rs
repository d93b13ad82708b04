//! Flat JSON task store.
//!
//! The whole collection is one serialized array: every mutation reads the
//! full file, changes one entry, and writes the full file back. A single
//! in-process writer lock is held across each read-modify-write cycle so
//! concurrent callers cannot lose updates to each other. Unreadable or
//! non-JSON state loads as an empty collection — the demo stays usable
//! even when the file is damaged by hand.

use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::NudgeError;
use crate::types::Task;

pub struct TaskStore {
    path: PathBuf,
    writer: Mutex<()>,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection. Missing file → empty; malformed file → empty
    /// with a warning, never an error.
    pub fn load(&self) -> Vec<Task> {
        if !self.path.exists() {
            return Vec::new();
        }
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("failed to read {}: {e}. Treating as empty.", self.path.display());
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(tasks) => tasks,
            Err(e) => {
                log::warn!("failed to parse {}: {e}. Treating as empty.", self.path.display());
                Vec::new()
            }
        }
    }

    /// Serialize and write the full collection.
    pub fn save(&self, tasks: &[Task]) -> Result<(), NudgeError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(tasks)
            .map_err(|e| NudgeError::parse("task collection", e))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Run one read-modify-write cycle under the writer lock.
    ///
    /// The closure's return value is handed back after the write lands, so
    /// callers can report on what they changed without a second read.
    pub fn update<T>(&self, f: impl FnOnce(&mut Vec<Task>) -> T) -> Result<T, NudgeError> {
        let _guard = self.writer.lock();
        let mut tasks = self.load();
        let result = f(&mut tasks);
        self.save(&tasks)?;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Confidence, Priority, Source, TaskStatus};

    fn sample_task(description: &str) -> Task {
        Task {
            task: description.to_string(),
            owner: "You".to_string(),
            deadline: Some("Friday".to_string()),
            priority: Priority::High,
            suggestion: format!("Action item from email: {description}"),
            status: TaskStatus::Pending,
            source: Source::Email,
            confidence: Confidence::High,
            source_email: None,
            reminder: None,
            reminder_hours: None,
            reminder_triggered: false,
            completed_date: None,
            chat_completion: None,
            comments: None,
            agent_notes: None,
        }
    }

    fn temp_store() -> (tempfile::TempDir, TaskStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::new(dir.path().join("tasks.json"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_round_trip_preserves_fields() {
        let (_dir, store) = temp_store();
        let tasks = vec![sample_task("Send the revised document"), sample_task("Check server logs")];
        store.save(&tasks).expect("save");
        assert_eq!(store.load(), tasks);
    }

    #[test]
    fn test_malformed_file_loads_empty() {
        let (_dir, store) = temp_store();
        fs::write(store.path(), "{{ not json").expect("write");
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_update_applies_and_persists() {
        let (_dir, store) = temp_store();
        store.save(&[sample_task("Process invoice/payment/billing")]).expect("save");

        let count = store
            .update(|tasks| {
                tasks[0].owner = "Priya".to_string();
                tasks.len()
            })
            .expect("update");

        assert_eq!(count, 1);
        assert_eq!(store.load()[0].owner, "Priya");
    }
}
