//! Data directory resolution.
//!
//! Order: explicit path (the `--data-dir` flag), then `TODO_LIST_DATA_DIR`,
//! then `dirs::data_dir()/todo-list` (`~/.local/share/todo-list` on Linux).

use std::path::{Path, PathBuf};

pub const DATA_DIR_ENV: &str = "TODO_LIST_DATA_DIR";
const APP_DIR_NAME: &str = "todo-list";

#[must_use]
pub fn data_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(override_dir) = std::env::var_os(DATA_DIR_ENV).filter(|value| !value.is_empty()) {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DIR_NAME))
}
