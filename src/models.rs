use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unix epoch seconds.
pub type Timestamp = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Task {
    pub id: String,
    pub text: String,
    pub created: Timestamp,
    #[serde(default)]
    pub due: Option<Timestamp>,
    #[serde(default)]
    pub completed: bool,
}

/// Visibility window selected by the filter control.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DueWindow {
    #[default]
    All,
    Today,
    Tomorrow,
    Week,
}

impl DueWindow {
    pub const ALL: [DueWindow; 4] = [
        DueWindow::All,
        DueWindow::Today,
        DueWindow::Tomorrow,
        DueWindow::Week,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DueWindow::All => "all",
            DueWindow::Today => "today",
            DueWindow::Tomorrow => "tomorrow",
            DueWindow::Week => "week",
        }
    }
}

impl fmt::Display for DueWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDueWindow(pub String);

impl fmt::Display for UnknownDueWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown filter `{}` (expected all, today, tomorrow or week)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDueWindow {}

impl FromStr for DueWindow {
    type Err = UnknownDueWindow;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        DueWindow::ALL
            .into_iter()
            .find(|window| window.as_str() == normalized)
            .ok_or_else(|| UnknownDueWindow(value.to_string()))
    }
}

/// Derived from the due date at render time; never persisted.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Urgent,
    DueSoon,
}

impl Urgency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::Urgent => "urgent",
            Urgency::DueSoon => "due-soon",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub default_filter: DueWindow,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            default_filter: DueWindow::All,
        }
    }
}

fn default_locale() -> String {
    "auto".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TasksFile {
    pub schema_version: u32,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SettingsFile {
    pub schema_version: u32,
    pub settings: Settings,
}
