use crate::error::StoreError;
use crate::model::Task;
use std::path::{Path, PathBuf};

const STORE_FILE_NAME: &str = "tasks.json";
const STORE_ENV_VAR: &str = "TASKLIST_STORE_PATH";

/// Location of the persistence file: env override first, then the per-user
/// application directory.
pub fn store_path() -> Result<PathBuf, StoreError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    app_dir().map(|dir| dir.join(STORE_FILE_NAME))
}

pub(crate) fn app_dir() -> Result<PathBuf, StoreError> {
    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| StoreError::io("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("tasklist"))
    } else {
        let home = std::env::var("HOME").map_err(|_| StoreError::io("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("tasklist"))
    }
}

/// Read the full task list. A missing file is an empty list; unreadable or
/// malformed content is an error the caller may turn into a reset.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>, StoreError> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = std::fs::read_to_string(path).map_err(|err| StoreError::io(err.to_string()))?;
    let tasks: Vec<Task> =
        serde_json::from_str(&content).map_err(|err| StoreError::corrupt(err.to_string()))?;

    Ok(tasks)
}

/// Overwrite the persistence file with the full task list.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| StoreError::io(err.to_string()))?;
    }

    let content = serde_json::to_string_pretty(tasks)
        .map_err(|err| StoreError::corrupt(err.to_string()))?;
    std::fs::write(path, content).map_err(|err| StoreError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|err| StoreError::io(err.to_string()))?;
    }

    Ok(())
}
