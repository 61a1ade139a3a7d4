use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::{SettingsFile, TasksFile};

/// The single storage key holding the task list.
pub const TASKS_KEY: &str = "tasks";
const SETTINGS_KEY: &str = "settings";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(err) => write!(f, "io error: {err}"),
            StorageError::Json(err) => write!(f, "json error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(err) => Some(err),
            StorageError::Json(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(value: std::io::Error) -> Self {
        StorageError::Io(value)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Json(value)
    }
}

/// Key-value store where every key is one JSON document under `root`.
pub struct Storage {
    root: PathBuf,
}

impl Storage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure_dirs(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// `Ok(None)` when nothing has been stored yet.
    pub fn load_tasks(&self) -> Result<Option<TasksFile>, StorageError> {
        self.load_json(self.path_for(TASKS_KEY))
    }

    pub fn load_settings(&self) -> Result<Option<SettingsFile>, StorageError> {
        self.load_json(self.path_for(SETTINGS_KEY))
    }

    /// Overwrites the whole record.
    pub fn save_tasks(&self, data: &TasksFile) -> Result<(), StorageError> {
        self.write_atomic(self.path_for(TASKS_KEY), data)
    }

    pub fn save_settings(&self, data: &SettingsFile) -> Result<(), StorageError> {
        self.write_atomic(self.path_for(SETTINGS_KEY), data)
    }

    /// Moves an unreadable tasks record aside so the next save does not overwrite it.
    /// Earlier quarantined copies are never replaced.
    pub fn quarantine_tasks(&self) -> Result<PathBuf, StorageError> {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S%3f").to_string();
        let mut target = self.root.join(format!("{TASKS_KEY}.corrupt-{timestamp}.json"));
        let mut attempt = 1;
        while target.exists() {
            target = self
                .root
                .join(format!("{TASKS_KEY}.corrupt-{timestamp}-{attempt}.json"));
            attempt += 1;
        }
        fs::rename(self.path_for(TASKS_KEY), &target)?;
        Ok(target)
    }

    fn load_json<T: DeserializeOwned>(&self, path: PathBuf) -> Result<Option<T>, StorageError> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;
        // Bytes that are not UTF-8 surface as a JSON error, same as any other corruption.
        Ok(Some(serde_json::from_slice(&buf)?))
    }

    fn write_atomic<T: Serialize>(&self, path: PathBuf, data: &T) -> Result<(), StorageError> {
        let temp_path = path.with_extension("tmp");
        let json = serde_json::to_vec_pretty(data)?;
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&json)?;
            file.sync_all()?;
        }
        fs::rename(temp_path, path)?;
        Ok(())
    }
}
