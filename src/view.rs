use std::fmt::Display;

use chrono::{DateTime, Locale, TimeZone};
use serde::Serialize;
use sys_locale::get_locale;

use crate::filter::matches_window;
use crate::models::{DueWindow, Task, Timestamp, Urgency};
use crate::state::TaskState;
use crate::urgency::classify;

pub const DUE_NOT_SET: &str = "Not set";
pub const LABEL_COMPLETE: &str = "Complete";
pub const LABEL_UNDO: &str = "Undo";

const DISPLAY_FORMAT: &str = "%a, %b %-d, %Y, %I:%M %p";

/// One rendered row. Recomputed from the model on every render.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskView {
    pub id: String,
    pub text: String,
    pub created_display: String,
    pub due_display: String,
    pub urgency: Option<Urgency>,
    pub completed: bool,
    pub action_label: &'static str,
    pub visible: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatePayload {
    pub filter: DueWindow,
    pub tasks: Vec<TaskView>,
    pub visible_count: usize,
}

impl StatePayload {
    pub fn visible(&self) -> impl Iterator<Item = &TaskView> {
        self.tasks.iter().filter(|view| view.visible)
    }
}

/// `auto` asks the OS; anything unrecognized falls back to `en_US`.
pub fn resolve_locale(tag: &str) -> Locale {
    let normalized = tag.trim();
    let requested = if normalized.is_empty() || normalized.eq_ignore_ascii_case("auto") {
        get_locale().unwrap_or_default()
    } else {
        normalized.to_string()
    };
    parse_locale(&requested).unwrap_or(Locale::en_US)
}

fn parse_locale(tag: &str) -> Option<Locale> {
    // "en-US.UTF-8" -> "en_US"
    let base = tag.split(['.', '@']).next().unwrap_or_default().replace('-', "_");
    if let Ok(locale) = Locale::try_from(base.as_str()) {
        return Some(locale);
    }
    if !base.contains('_') && !base.is_empty() {
        let guess = format!("{}_{}", base.to_lowercase(), base.to_uppercase());
        return Locale::try_from(guess.as_str()).ok();
    }
    None
}

/// Converted with the zone's rules for `ts` itself, not the offset in force at `now`.
pub fn format_timestamp<Tz>(ts: Timestamp, now: &DateTime<Tz>, locale: Locale) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match now.timezone().timestamp_opt(ts, 0).single() {
        Some(local) => local.format_localized(DISPLAY_FORMAT, locale).to_string(),
        None => ts.to_string(),
    }
}

pub fn task_view<Tz>(
    task: &Task,
    filter: DueWindow,
    now: &DateTime<Tz>,
    locale: Locale,
) -> TaskView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    TaskView {
        id: task.id.clone(),
        text: task.text.clone(),
        created_display: format_timestamp(task.created, now, locale),
        due_display: task
            .due
            .map(|due| format_timestamp(due, now, locale))
            .unwrap_or_else(|| DUE_NOT_SET.to_string()),
        urgency: classify(task.due, now.timestamp()),
        completed: task.completed,
        action_label: if task.completed {
            LABEL_UNDO
        } else {
            LABEL_COMPLETE
        },
        visible: matches_window(filter, task.due, now),
    }
}

pub fn project<Tz>(state: &TaskState, now: &DateTime<Tz>, locale: Locale) -> StatePayload
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let filter = state.filter();
    let tasks: Vec<TaskView> = state
        .tasks()
        .iter()
        .map(|task| task_view(task, filter, now, locale))
        .collect();
    let visible_count = tasks.iter().filter(|view| view.visible).count();
    StatePayload {
        filter,
        tasks,
        visible_count,
    }
}

pub fn render_line(position: usize, view: &TaskView) -> String {
    let mark = if view.completed { "[x]" } else { "[ ]" };
    let urgency = view
        .urgency
        .map(|urgency| format!("  !{}", urgency.as_str()))
        .unwrap_or_default();
    format!(
        "#{position} {mark} {text}{urgency}\n    Created: {created}  Due: {due}  [{label}]  id={id}",
        text = view.text,
        created = view.created_display,
        due = view.due_display,
        label = view.action_label,
        id = view.id,
    )
}
