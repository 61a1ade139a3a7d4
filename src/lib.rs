//! Todo list with optional due dates, urgency marks and due-window filters.
//!
//! [`state::TaskState`] is the only source of truth; [`view`] projects it for
//! display and [`commands::dispatch`] applies one [`commands::Command`] at a
//! time, writing the full snapshot through [`storage::Storage`] after every
//! mutation.

pub mod commands;
pub mod filter;
pub mod logging;
pub mod models;
pub mod paths;
pub mod shell;
pub mod state;
pub mod storage;
pub mod urgency;
pub mod view;

pub use commands::{
    dispatch, load_settings, load_state, AppCtx, Command, CommandCtx, CommandError, Outcome,
};
pub use models::{DueWindow, Settings, Task, Urgency};
pub use state::TaskState;
pub use storage::{Storage, StorageError};
