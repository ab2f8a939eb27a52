use crate::error::StoreError;
use crate::model::Task;
use crate::sort::{self, SortKey};
use crate::storage::json_store;
use std::path::{Path, PathBuf};

/// The authoritative in-memory task list plus the file it is synchronized
/// with. Every mutation rewrites the whole file; a failed write leaves the
/// in-memory state in place and is reported through the returned error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
}

/// Result of opening a store. Loading never fails: malformed or unreadable
/// content resets to an empty store and the diagnostic is carried alongside
/// for the caller to report.
#[derive(Debug)]
pub struct StoreLoad {
    pub store: TaskStore,
    pub error: Option<StoreError>,
}

impl TaskStore {
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            tasks: Vec::new(),
        }
    }

    /// Read the persistence file. Any parse failure discards the whole file
    /// content rather than recovering individual records.
    pub fn load(path: &Path) -> StoreLoad {
        match json_store::load_tasks(path) {
            Ok(tasks) => StoreLoad {
                store: Self {
                    path: path.to_path_buf(),
                    tasks,
                },
                error: None,
            },
            Err(err) => StoreLoad {
                store: Self::empty(path),
                error: Some(err),
            },
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Append a task and persist. The task must carry a non-blank title and
    /// an id not already in the store; both are checked before mutating.
    pub fn add(&mut self, task: Task) -> Result<&Task, StoreError> {
        if task.title.trim().is_empty() {
            return Err(StoreError::invalid_input("title is required"));
        }
        if self.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(StoreError::invalid_input(format!(
                "duplicate task id '{}'",
                task.id
            )));
        }

        self.tasks.push(task);
        let index = self.tasks.len() - 1;
        self.persist()?;

        Ok(&self.tasks[index])
    }

    /// Remove every record matching `id` (expected zero or one) and persist.
    /// An unknown id is not an error and leaves the file untouched; the
    /// first removed task is returned.
    pub fn remove(&mut self, id: &str) -> Result<Option<Task>, StoreError> {
        let mut removed = None;
        let mut index = 0;
        while index < self.tasks.len() {
            if self.tasks[index].id == id {
                let task = self.tasks.remove(index);
                if removed.is_none() {
                    removed = Some(task);
                }
            } else {
                index += 1;
            }
        }

        if removed.is_some() {
            self.persist()?;
        }
        Ok(removed)
    }

    /// Flip the completion flag on the matching task and persist. An unknown
    /// id is a no-op that skips the write.
    pub fn toggle_complete(&mut self, id: &str) -> Result<Option<&Task>, StoreError> {
        let mut found = None;
        for (index, task) in self.tasks.iter_mut().enumerate() {
            if task.id == id {
                task.completed = !task.completed;
                found = Some(index);
                break;
            }
        }

        let Some(index) = found else {
            return Ok(None);
        };

        self.persist()?;
        Ok(Some(&self.tasks[index]))
    }

    /// Display ordering for the current store contents. Read-only; never
    /// touches the file.
    pub fn sorted_view(&self, key: SortKey) -> Vec<Task> {
        sort::sorted(&self.tasks, key)
    }

    /// Serialize the entire store to disk, overwriting the file. Failures
    /// are returned, not retried, and the in-memory state is kept as is.
    pub fn persist(&self) -> Result<(), StoreError> {
        json_store::save_tasks(&self.path, &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::TaskStore;
    use crate::model::{Priority, Task};
    use crate::sort::SortKey;
    use crate::storage::json_store;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("tasklist-{nanos}-{file_name}"))
    }

    fn task(id: &str, title: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            completed: false,
        }
    }

    #[test]
    fn load_missing_file_is_empty_without_error() {
        let path = temp_path("missing.json");
        let loaded = TaskStore::load(&path);

        assert!(loaded.store.is_empty());
        assert!(loaded.error.is_none());
    }

    #[test]
    fn load_invalid_json_resets_to_empty_with_diagnostic() {
        let path = temp_path("corrupt.json");
        fs::write(&path, "{ not an array ").unwrap();

        let loaded = TaskStore::load(&path);
        fs::remove_file(&path).ok();

        assert!(loaded.store.is_empty());
        assert_eq!(loaded.error.map(|err| err.code()), Some("corrupt_store"));
    }

    #[test]
    fn one_malformed_record_discards_the_whole_file() {
        let path = temp_path("partial.json");
        fs::write(
            &path,
            "[{\"id\": \"1\", \"title\": \"ok\"}, {\"id\": \"2\"}]",
        )
        .unwrap();

        let loaded = TaskStore::load(&path);
        fs::remove_file(&path).ok();

        assert!(loaded.store.is_empty());
        assert!(loaded.error.is_some());
    }

    #[test]
    fn add_persists_and_round_trips() {
        let path = temp_path("add.json");
        let mut store = TaskStore::empty(&path);

        store.add(task("1", "first")).unwrap();
        store.add(task("2", "second")).unwrap();

        let reloaded = TaskStore::load(&path);
        fs::remove_file(&path).ok();

        assert!(reloaded.error.is_none());
        assert_eq!(reloaded.store.tasks(), store.tasks());
    }

    #[test]
    fn add_rejects_blank_title_without_mutating() {
        let path = temp_path("blank.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "first")).unwrap();

        let err = store.add(task("2", "   ")).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn add_rejects_duplicate_id_without_mutating() {
        let path = temp_path("dup.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "first")).unwrap();

        let err = store.add(task("1", "again")).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_input");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_undoes_add() {
        let path = temp_path("inverse.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "keep")).unwrap();
        let before = store.tasks().to_vec();

        store.add(task("2", "extra")).unwrap();
        let removed = store.remove("2").unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(removed.map(|task| task.id), Some("2".to_string()));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn remove_unknown_id_is_not_an_error() {
        let path = temp_path("remove-missing.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "only")).unwrap();

        let removed = store.remove("99").unwrap();
        fs::remove_file(&path).ok();

        assert!(removed.is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn toggle_twice_restores_original_flag() {
        let path = temp_path("toggle.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "flip me")).unwrap();

        let first = store.toggle_complete("1").unwrap().map(|t| t.completed);
        assert_eq!(first, Some(true));

        let second = store.toggle_complete("1").unwrap().map(|t| t.completed);
        fs::remove_file(&path).ok();

        assert_eq!(second, Some(false));
    }

    #[test]
    fn toggle_unknown_id_is_a_noop() {
        let path = temp_path("toggle-missing.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "only")).unwrap();

        let toggled = store.toggle_complete("99").unwrap();
        assert!(toggled.is_none());

        fs::remove_file(&path).ok();
        assert!(!store.tasks()[0].completed);
    }

    #[test]
    fn toggle_is_persisted() {
        let path = temp_path("toggle-persist.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "flip me")).unwrap();
        store.toggle_complete("1").unwrap();

        let loaded = json_store::load_tasks(&path).unwrap();
        fs::remove_file(&path).ok();

        assert!(loaded[0].completed);
    }

    #[test]
    fn replay_of_persisted_output_matches_memory() {
        let path = temp_path("replay.json");
        let mut store = TaskStore::empty(&path);

        store.add(task("1", "first")).unwrap();
        store.add(task("2", "second")).unwrap();
        store.toggle_complete("1").unwrap();
        store.remove("2").unwrap();
        store.add(task("3", "third")).unwrap();

        let replayed = TaskStore::load(&path);
        fs::remove_file(&path).ok();

        assert!(replayed.error.is_none());
        assert_eq!(replayed.store.tasks(), store.tasks());
    }

    // A path whose parent is a regular file makes every write fail, for any
    // user, without touching permissions.
    fn unwritable_path(file_name: &str) -> (PathBuf, PathBuf) {
        let blocker = temp_path(file_name);
        fs::write(&blocker, "blocks directory creation").unwrap();
        (blocker.join("tasks.json"), blocker)
    }

    #[test]
    fn add_keeps_memory_when_persist_fails() {
        let (path, blocker) = unwritable_path("add-io");
        let mut store = TaskStore::empty(&path);

        let err = store.add(task("1", "kept")).unwrap_err();
        fs::remove_file(&blocker).ok();

        assert_eq!(err.code(), "io_error");
        assert_eq!(store.len(), 1);
        assert_eq!(store.tasks()[0].id, "1");
    }

    #[test]
    fn remove_keeps_memory_when_persist_fails() {
        let (path, blocker) = unwritable_path("remove-io");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "doomed")).ok();

        let err = store.remove("1").unwrap_err();
        fs::remove_file(&blocker).ok();

        assert_eq!(err.code(), "io_error");
        assert!(store.is_empty());
    }

    #[test]
    fn toggle_keeps_memory_when_persist_fails() {
        let (path, blocker) = unwritable_path("toggle-io");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "flip me")).ok();

        let err = store.toggle_complete("1").unwrap_err();
        fs::remove_file(&blocker).ok();

        assert_eq!(err.code(), "io_error");
        assert!(store.tasks()[0].completed);
    }

    #[test]
    fn noop_remove_skips_the_write() {
        let path = temp_path("noop-remove.json");
        let mut store = TaskStore::empty(&path);

        let removed = store.remove("99").unwrap();

        assert!(removed.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn noop_toggle_skips_the_write() {
        let path = temp_path("noop-toggle.json");
        let mut store = TaskStore::empty(&path);

        let toggled = store.toggle_complete("99").unwrap();

        assert!(toggled.is_none());
        assert!(!path.exists());
    }

    #[test]
    fn sorted_view_does_not_touch_the_file() {
        let path = temp_path("view.json");
        let mut store = TaskStore::empty(&path);
        store.add(task("1", "only")).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let _ = store.sorted_view(SortKey::Name);
        let after = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(written, after);
    }
}
