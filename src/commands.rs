use chrono::{DateTime, Local, TimeZone};

use crate::filter::{parse_due_input, InvalidDueInput};
use crate::models::{DueWindow, Settings, SettingsFile, Task};
use crate::state::{TaskState, SCHEMA_VERSION};
use crate::storage::{Storage, StorageError};

/// User actions, each processed to completion before the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddTask { text: String, due: String },
    ToggleComplete(String),
    Delete(String),
    SetFilter(DueWindow),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added(Task),
    Toggled(Task),
    Deleted(Task),
    FilterChanged(DueWindow),
    /// Blank task text; nothing happened.
    Ignored,
}

impl Outcome {
    /// Whether the inputs of the add form should be cleared.
    pub fn clears_input(&self) -> bool {
        matches!(self, Outcome::Added(_))
    }
}

#[derive(Debug)]
pub enum CommandError {
    TaskNotFound(String),
    InvalidDue(InvalidDueInput),
    Storage(StorageError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::TaskNotFound(id) => write!(f, "task not found: {id}"),
            CommandError::InvalidDue(err) => write!(f, "{err}"),
            CommandError::Storage(err) => write!(f, "storage error: {err}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::TaskNotFound(_) => None,
            CommandError::InvalidDue(err) => Some(err),
            CommandError::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for CommandError {
    fn from(value: StorageError) -> Self {
        CommandError::Storage(value)
    }
}

impl From<InvalidDueInput> for CommandError {
    fn from(value: InvalidDueInput) -> Self {
        CommandError::InvalidDue(value)
    }
}

/// What the controller needs from its host.
pub trait CommandCtx {
    /// Zone whose rules read due input and place tasks on calendar days.
    type Tz: TimeZone;

    fn now(&self) -> DateTime<Self::Tz>;
    fn storage(&self) -> &Storage;
}

/// Production context: wall clock in the local time zone and a data directory.
pub struct AppCtx {
    storage: Storage,
}

impl AppCtx {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }
}

impl CommandCtx for AppCtx {
    type Tz = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn storage(&self) -> &Storage {
        &self.storage
    }
}

fn persist(ctx: &impl CommandCtx, state: &TaskState) -> Result<(), StorageError> {
    let storage = ctx.storage();
    storage.ensure_dirs()?;
    storage.save_tasks(&state.tasks_file())?;
    log::debug!("persisted tasks count={}", state.len());
    Ok(())
}

/// Missing settings are seeded with defaults so there is a file to edit;
/// unreadable settings fall back to defaults and are left untouched.
pub fn load_settings(storage: &Storage) -> Settings {
    match storage.load_settings() {
        Ok(Some(file)) => file.settings,
        Ok(None) => {
            let settings = Settings::default();
            let seeded = SettingsFile {
                schema_version: SCHEMA_VERSION,
                settings: settings.clone(),
            };
            if let Err(error) = storage
                .ensure_dirs()
                .and_then(|_| storage.save_settings(&seeded))
            {
                log::warn!("failed to write default settings: {error}");
            }
            settings
        }
        Err(error) => {
            log::warn!("failed to read settings, using defaults: {error}");
            Settings::default()
        }
    }
}

/// Missing data starts empty. Unreadable data is logged, moved aside when
/// possible, and also starts empty.
pub fn load_state(ctx: &impl CommandCtx, settings: &Settings) -> TaskState {
    let storage = ctx.storage();
    let tasks = match storage.load_tasks() {
        Ok(Some(file)) => {
            log::info!(
                "loaded tasks count={} schema_version={}",
                file.tasks.len(),
                file.schema_version
            );
            file.tasks
        }
        Ok(None) => {
            log::info!("no stored tasks under {}", storage.root().display());
            Vec::new()
        }
        Err(StorageError::Json(error)) => {
            log::warn!("stored tasks are corrupt, starting empty: {error}");
            match storage.quarantine_tasks() {
                Ok(path) => log::warn!("corrupt tasks moved to {}", path.display()),
                Err(error) => log::error!("failed to move corrupt tasks aside: {error}"),
            }
            Vec::new()
        }
        Err(error) => {
            log::error!("failed to read stored tasks, starting empty: {error}");
            Vec::new()
        }
    };
    TaskState::new(
        tasks
            .into_iter()
            .filter(|task| !task.text.trim().is_empty())
            .collect(),
        settings.default_filter,
    )
}

pub fn dispatch(
    ctx: &impl CommandCtx,
    state: &mut TaskState,
    command: Command,
) -> Result<Outcome, CommandError> {
    log::debug!("dispatch command={command:?}");
    match command {
        Command::AddTask { text, due } => add_task_impl(ctx, state, &text, &due),
        Command::ToggleComplete(task_id) => toggle_task_impl(ctx, state, &task_id),
        Command::Delete(task_id) => delete_task_impl(ctx, state, &task_id),
        Command::SetFilter(window) => {
            state.set_filter(window);
            Ok(Outcome::FilterChanged(window))
        }
    }
}

/// Runs `mutate`, then persists; a failed write restores the previous tasks.
fn mutate_and_persist<T>(
    ctx: &impl CommandCtx,
    state: &mut TaskState,
    mutate: impl FnOnce(&mut TaskState) -> Result<T, CommandError>,
) -> Result<T, CommandError> {
    let previous = state.snapshot();
    let result = mutate(state)?;
    if let Err(error) = persist(ctx, state) {
        log::error!("persist failed, rolling back: {error}");
        state.restore(previous);
        return Err(error.into());
    }
    Ok(result)
}

fn add_task_impl(
    ctx: &impl CommandCtx,
    state: &mut TaskState,
    text: &str,
    due: &str,
) -> Result<Outcome, CommandError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Outcome::Ignored);
    }
    let now = ctx.now();
    let due = parse_due_input(due, &now)?;

    mutate_and_persist(ctx, state, |state| {
        let task = Task {
            id: state.next_task_id(now.timestamp_millis()),
            text: text.to_string(),
            created: now.timestamp(),
            due,
            completed: false,
        };
        state.add_task(task.clone());
        log::info!("task added id={} due={:?}", task.id, task.due);
        Ok(Outcome::Added(task))
    })
}

fn toggle_task_impl(
    ctx: &impl CommandCtx,
    state: &mut TaskState,
    task_id: &str,
) -> Result<Outcome, CommandError> {
    mutate_and_persist(ctx, state, |state| {
        let task = state
            .toggle_task(task_id)
            .ok_or_else(|| CommandError::TaskNotFound(task_id.to_string()))?;
        log::info!("task toggled id={} completed={}", task.id, task.completed);
        Ok(Outcome::Toggled(task))
    })
}

fn delete_task_impl(
    ctx: &impl CommandCtx,
    state: &mut TaskState,
    task_id: &str,
) -> Result<Outcome, CommandError> {
    mutate_and_persist(ctx, state, |state| {
        let task = state
            .remove_task(task_id)
            .ok_or_else(|| CommandError::TaskNotFound(task_id.to_string()))?;
        log::info!("task deleted id={}", task.id);
        Ok(Outcome::Deleted(task))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::TASKS_KEY;
    use crate::view::{project, LABEL_COMPLETE, LABEL_UNDO};
    use chrono::{Locale, Timelike};
    use chrono_tz::America::New_York;
    use chrono_tz::Asia::Shanghai;
    use chrono_tz::Tz;
    use std::cell::RefCell;
    use std::fs;

    const HOUR: i64 = 60 * 60;
    const DAY: i64 = 24 * HOUR;

    struct TestCtx {
        _root: tempfile::TempDir,
        storage: Storage,
        now: RefCell<DateTime<Tz>>,
    }

    impl TestCtx {
        fn new() -> Self {
            Self::at(Shanghai.with_ymd_and_hms(2026, 10, 16, 15, 30, 0).unwrap())
        }

        fn at(now: DateTime<Tz>) -> Self {
            let root = tempfile::tempdir().unwrap();
            let storage = Storage::new(root.path().join("data"));
            Self {
                _root: root,
                storage,
                now: RefCell::new(now),
            }
        }

        fn with_unwritable_storage() -> Self {
            let ctx = Self::new();
            fs::write(ctx.storage.root(), "not a directory").unwrap();
            ctx
        }

        fn advance(&self, seconds: i64) {
            let next = self.now() + chrono::Duration::seconds(seconds);
            *self.now.borrow_mut() = next;
        }

        fn stored_ids(&self) -> Vec<String> {
            self.storage
                .load_tasks()
                .unwrap()
                .map(|file| file.tasks.into_iter().map(|t| t.id).collect())
                .unwrap_or_default()
        }
    }

    impl CommandCtx for TestCtx {
        type Tz = chrono_tz::Tz;

        fn now(&self) -> DateTime<Tz> {
            self.now.borrow().clone()
        }

        fn storage(&self) -> &Storage {
            &self.storage
        }
    }

    fn add(ctx: &TestCtx, state: &mut TaskState, text: &str, due: &str) -> Outcome {
        dispatch(
            ctx,
            state,
            Command::AddTask {
                text: text.to_string(),
                due: due.to_string(),
            },
        )
        .unwrap()
    }

    fn added_id(outcome: Outcome) -> String {
        match outcome {
            Outcome::Added(task) => task.id,
            other => panic!("expected Added, got {other:?}"),
        }
    }

    #[test]
    fn add_appends_trimmed_task_and_persists() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        add(&ctx, &mut state, "first", "");

        let outcome = add(&ctx, &mut state, "  Buy milk  ", "");
        assert!(outcome.clears_input());
        let Outcome::Added(task) = outcome else {
            panic!("expected Added");
        };
        assert_eq!(task.text, "Buy milk");
        assert_eq!(task.created, ctx.now().timestamp());
        assert_eq!(task.due, None);
        assert!(!task.completed);

        assert_eq!(state.len(), 2);
        assert_eq!(state.tasks().last().unwrap().id, task.id);
        assert_eq!(ctx.stored_ids(), vec![state.tasks()[0].id.clone(), task.id]);
    }

    #[test]
    fn blank_text_is_ignored_without_write() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        for text in ["", "   ", "\t\n"] {
            let outcome = add(&ctx, &mut state, text, "2026-10-17T09:00");
            assert_eq!(outcome, Outcome::Ignored);
            assert!(!outcome.clears_input());
        }
        assert!(state.is_empty());
        assert!(!ctx.storage.path_for(TASKS_KEY).exists());
    }

    #[test]
    fn ids_stay_unique_within_the_same_tick() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        let first = added_id(add(&ctx, &mut state, "a", ""));
        let second = added_id(add(&ctx, &mut state, "b", ""));
        let third = added_id(add(&ctx, &mut state, "c", ""));
        assert_eq!(first, ctx.now().timestamp_millis().to_string());
        assert_ne!(first, second);
        assert_ne!(second, third);
        assert_ne!(first, third);
    }

    #[test]
    fn invalid_due_is_rejected_without_creating_a_task() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        let err = dispatch(
            &ctx,
            &mut state,
            Command::AddTask {
                text: "call mom".to_string(),
                due: "someday".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::InvalidDue(_)));
        assert!(err.to_string().contains("someday"));
        assert!(state.is_empty());
    }

    #[test]
    fn toggle_twice_restores_flag_and_label() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        let id = added_id(add(&ctx, &mut state, "task", ""));
        let label = |state: &TaskState| project(state, &ctx.now(), Locale::en_US).tasks[0].action_label;
        assert_eq!(label(&state), LABEL_COMPLETE);

        let toggled = dispatch(&ctx, &mut state, Command::ToggleComplete(id.clone())).unwrap();
        assert!(matches!(toggled, Outcome::Toggled(ref task) if task.completed));
        assert_eq!(label(&state), LABEL_UNDO);
        let stored = ctx.storage.load_tasks().unwrap().unwrap();
        assert!(stored.tasks[0].completed);

        dispatch(&ctx, &mut state, Command::ToggleComplete(id)).unwrap();
        assert!(!state.tasks()[0].completed);
        assert_eq!(label(&state), LABEL_COMPLETE);
        let stored = ctx.storage.load_tasks().unwrap().unwrap();
        assert!(!stored.tasks[0].completed);
    }

    #[test]
    fn delete_removes_exactly_one_and_keeps_order() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        let a = added_id(add(&ctx, &mut state, "a", ""));
        let b = added_id(add(&ctx, &mut state, "b", ""));
        let c = added_id(add(&ctx, &mut state, "c", ""));

        let outcome = dispatch(&ctx, &mut state, Command::Delete(b.clone())).unwrap();
        assert!(matches!(outcome, Outcome::Deleted(ref task) if task.id == b));
        let ids: Vec<String> = state.tasks().iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec![a.clone(), c.clone()]);
        assert_eq!(ctx.stored_ids(), vec![a, c]);
    }

    #[test]
    fn unknown_ids_report_not_found() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        add(&ctx, &mut state, "a", "");

        let err = dispatch(&ctx, &mut state, Command::ToggleComplete("nope".into())).unwrap_err();
        assert!(matches!(err, CommandError::TaskNotFound(ref id) if id == "nope"));
        let err = dispatch(&ctx, &mut state, Command::Delete("nope".into())).unwrap_err();
        assert_eq!(err.to_string(), "task not found: nope");
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn failed_write_rolls_back_mutation() {
        let ctx = TestCtx::with_unwritable_storage();
        let mut state = TaskState::new(
            vec![Task {
                id: "a".to_string(),
                text: "keep".to_string(),
                created: 1,
                due: None,
                completed: false,
            }],
            DueWindow::All,
        );

        let err = dispatch(
            &ctx,
            &mut state,
            Command::AddTask {
                text: "new".to_string(),
                due: String::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CommandError::Storage(_)));
        assert_eq!(state.len(), 1);

        assert!(dispatch(&ctx, &mut state, Command::ToggleComplete("a".into())).is_err());
        assert!(!state.tasks()[0].completed);

        assert!(dispatch(&ctx, &mut state, Command::Delete("a".into())).is_err());
        assert_eq!(state.len(), 1);
    }

    #[test]
    fn set_filter_changes_visibility_without_writing() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        add(&ctx, &mut state, "Buy milk", "");
        let written = fs::read_to_string(ctx.storage.path_for(TASKS_KEY)).unwrap();

        for window in [DueWindow::Today, DueWindow::Tomorrow, DueWindow::Week] {
            let outcome = dispatch(&ctx, &mut state, Command::SetFilter(window)).unwrap();
            assert_eq!(outcome, Outcome::FilterChanged(window));
            let payload = project(&state, &ctx.now(), Locale::en_US);
            assert_eq!(payload.visible_count, 0, "{window}");
            assert_eq!(payload.tasks[0].due_display, "Not set");
        }
        dispatch(&ctx, &mut state, Command::SetFilter(DueWindow::All)).unwrap();
        assert_eq!(project(&state, &ctx.now(), Locale::en_US).visible_count, 1);

        let after = fs::read_to_string(ctx.storage.path_for(TASKS_KEY)).unwrap();
        assert_eq!(written, after);
        let stored = ctx.storage.load_tasks().unwrap().unwrap();
        assert_eq!(stored.tasks[0].due, None);
    }

    #[test]
    fn today_and_week_filters_follow_due_dates() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        let today = added_id(add(&ctx, &mut state, "today", "2026-10-16T08:00"));
        let five = added_id(add(&ctx, &mut state, "five days", "2026-10-21T15:30"));
        add(&ctx, &mut state, "ten days", "2026-10-26T15:30");

        dispatch(&ctx, &mut state, Command::SetFilter(DueWindow::Today)).unwrap();
        let payload = project(&state, &ctx.now(), Locale::en_US);
        let visible: Vec<&str> = payload.visible().map(|v| v.id.as_str()).collect();
        assert_eq!(visible, vec![today.as_str()]);

        dispatch(&ctx, &mut state, Command::SetFilter(DueWindow::Tomorrow)).unwrap();
        assert_eq!(project(&state, &ctx.now(), Locale::en_US).visible_count, 0);

        dispatch(&ctx, &mut state, Command::SetFilter(DueWindow::Week)).unwrap();
        let payload = project(&state, &ctx.now(), Locale::en_US);
        let visible: Vec<&str> = payload.visible().map(|v| v.id.as_str()).collect();
        assert_eq!(visible, vec![five.as_str()]);
    }

    #[test]
    fn off_filter_add_is_stored_but_hidden() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        dispatch(&ctx, &mut state, Command::SetFilter(DueWindow::Today)).unwrap();

        let id = added_id(add(&ctx, &mut state, "later", "2026-10-30T10:00"));
        assert_eq!(ctx.stored_ids(), vec![id]);
        let payload = project(&state, &ctx.now(), Locale::en_US);
        assert_eq!(payload.tasks.len(), 1);
        assert_eq!(payload.visible_count, 0);
    }

    #[test]
    fn save_then_load_round_trips_text_completion_and_order() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        add(&ctx, &mut state, "a", "2026-10-17T09:00");
        let b = added_id(add(&ctx, &mut state, "b", ""));
        add(&ctx, &mut state, "c", "2026-10-30T18:45");
        dispatch(&ctx, &mut state, Command::ToggleComplete(b)).unwrap();

        let reloaded = load_state(&ctx, &Settings::default());
        assert_eq!(reloaded.tasks(), state.tasks());
        let before = project(&state, &ctx.now(), Locale::en_US);
        let after = project(&reloaded, &ctx.now(), Locale::en_US);
        assert_eq!(before.tasks, after.tasks);
    }

    #[test]
    fn load_recomputes_urgency_at_load_time() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        add(&ctx, &mut state, "soon", "2026-10-18T09:00");
        let payload = project(&state, &ctx.now(), Locale::en_US);
        assert_eq!(payload.tasks[0].urgency, Some(crate::models::Urgency::DueSoon));

        ctx.advance(DAY);
        let reloaded = load_state(&ctx, &Settings::default());
        let payload = project(&reloaded, &ctx.now(), Locale::en_US);
        assert_eq!(payload.tasks[0].urgency, Some(crate::models::Urgency::Urgent));
    }

    #[test]
    fn load_without_data_starts_empty_with_default_filter() {
        let ctx = TestCtx::new();
        let settings = Settings {
            default_filter: DueWindow::Week,
            ..Settings::default()
        };
        let state = load_state(&ctx, &settings);
        assert!(state.is_empty());
        assert_eq!(state.filter(), DueWindow::Week);
    }

    #[test]
    fn load_of_corrupt_data_starts_empty_and_preserves_file() {
        let ctx = TestCtx::new();
        ctx.storage.ensure_dirs().unwrap();
        fs::write(ctx.storage.path_for(TASKS_KEY), "{\"tasks\": [oops").unwrap();

        let mut state = load_state(&ctx, &Settings::default());
        assert!(state.is_empty());

        let quarantined: Vec<_> = fs::read_dir(ctx.storage.root())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains("corrupt"))
            .collect();
        assert_eq!(quarantined.len(), 1);

        // The next mutation writes a fresh snapshot next to the preserved one.
        add(&ctx, &mut state, "fresh", "");
        assert_eq!(ctx.stored_ids().len(), 1);
    }

    #[test]
    fn load_of_non_utf8_data_preserves_file_before_next_save() {
        let ctx = TestCtx::new();
        ctx.storage.ensure_dirs().unwrap();
        let original: &[u8] =
            b"{\"schema_version\":1,\"tasks\":[{\"id\":\"1\",\"text\":\"caf\xe9\",\"created\":1}]}";
        fs::write(ctx.storage.path_for(TASKS_KEY), original).unwrap();

        let mut state = load_state(&ctx, &Settings::default());
        assert!(state.is_empty());
        add(&ctx, &mut state, "fresh", "");

        let quarantined: Vec<_> = fs::read_dir(ctx.storage.root())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                let name = path.file_name().unwrap().to_string_lossy();
                name.starts_with("tasks.corrupt-") && name.ends_with(".json")
            })
            .collect();
        assert_eq!(quarantined.len(), 1);
        assert_eq!(fs::read(&quarantined[0]).unwrap(), original);
        assert_eq!(ctx.stored_ids().len(), 1);
    }

    #[test]
    fn load_drops_blank_tasks_from_stored_data() {
        let ctx = TestCtx::new();
        ctx.storage.ensure_dirs().unwrap();
        fs::write(
            ctx.storage.path_for(TASKS_KEY),
            r#"{"schema_version":1,"tasks":[
                {"id":"1","text":"  ","created":1,"due":null,"completed":false},
                {"id":"2","text":"real","created":1,"due":null,"completed":true}
            ]}"#,
        )
        .unwrap();
        let state = load_state(&ctx, &Settings::default());
        assert_eq!(state.len(), 1);
        assert_eq!(state.tasks()[0].id, "2");
        assert!(state.tasks()[0].completed);
    }

    #[test]
    fn load_settings_seeds_defaults_and_reads_back_edits() {
        let ctx = TestCtx::new();
        assert_eq!(load_settings(&ctx.storage), Settings::default());
        assert!(ctx.storage.load_settings().unwrap().is_some());

        fs::write(
            ctx.storage.root().join("settings.json"),
            r#"{"schema_version":1,"settings":{"locale":"de-DE","default_filter":"today"}}"#,
        )
        .unwrap();
        let settings = load_settings(&ctx.storage);
        assert_eq!(settings.locale, "de-DE");
        assert_eq!(settings.default_filter, DueWindow::Today);

        fs::write(ctx.storage.root().join("settings.json"), "garbage").unwrap();
        assert_eq!(load_settings(&ctx.storage), Settings::default());
        assert_eq!(
            fs::read_to_string(ctx.storage.root().join("settings.json")).unwrap(),
            "garbage"
        );
    }

    #[test]
    fn due_input_is_read_in_local_offset_and_classified() {
        let ctx = TestCtx::new();
        let mut state = TaskState::default();
        let now = ctx.now().timestamp();
        let Outcome::Added(task) = add(&ctx, &mut state, "half day", "2026-10-17T03:30") else {
            panic!("expected Added");
        };
        assert_eq!(task.due, Some(now + 12 * HOUR));
        let payload = project(&state, &ctx.now(), Locale::en_US);
        assert_eq!(payload.tasks[0].urgency, Some(crate::models::Urgency::Urgent));
    }

    #[test]
    fn due_picked_before_dst_change_keeps_its_wall_clock_time() {
        let ctx = TestCtx::at(New_York.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap());
        let mut state = TaskState::default();
        let Outcome::Added(task) = add(&ctx, &mut state, "dentist", "2026-11-10T09:00") else {
            panic!("expected Added");
        };
        let due = New_York.timestamp_opt(task.due.unwrap(), 0).unwrap();
        assert_eq!(due.hour(), 9);

        ctx.advance(30 * DAY);
        let reloaded = load_state(&ctx, &Settings::default());
        let payload = project(&reloaded, &ctx.now(), Locale::en_US);
        assert_eq!(payload.tasks[0].due_display, "Tue, Nov 10, 2026, 09:00 AM");
        assert_eq!(payload.tasks[0].created_display, "Fri, Oct 16, 2026, 12:00 PM");
    }
}
