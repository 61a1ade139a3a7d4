use crate::models::{DueWindow, Task, TasksFile};

pub const SCHEMA_VERSION: u32 = 1;

/// The owned, ordered task collection plus the active filter window.
#[derive(Debug, Clone, Default)]
pub struct TaskState {
    tasks: Vec<Task>,
    filter: DueWindow,
}

impl TaskState {
    pub fn new(tasks: Vec<Task>, filter: DueWindow) -> Self {
        let mut state = Self {
            tasks: Vec::with_capacity(tasks.len()),
            filter,
        };
        // Stored data may predate the uniqueness rule; keep the first occurrence.
        for task in tasks {
            if state.find(&task.id).is_some() {
                log::warn!("dropping task with duplicate id={}", task.id);
                continue;
            }
            state.tasks.push(task);
        }
        state
    }

    pub fn tasks_file(&self) -> TasksFile {
        TasksFile {
            schema_version: SCHEMA_VERSION,
            tasks: self.tasks.clone(),
        }
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

    pub fn filter(&self) -> DueWindow {
        self.filter
    }

    pub fn set_filter(&mut self, filter: DueWindow) {
        self.filter = filter;
    }

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Ids derive from the creation time in milliseconds, bumped past any id already held.
    pub fn next_task_id(&self, now_millis: i64) -> String {
        let mut candidate = now_millis;
        while self.find(&candidate.to_string()).is_some() {
            candidate += 1;
        }
        candidate.to_string()
    }

    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn toggle_task(&mut self, task_id: &str) -> Option<Task> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        task.completed = !task.completed;
        Some(task.clone())
    }

    pub fn remove_task(&mut self, task_id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == task_id)?;
        Some(self.tasks.remove(index))
    }

    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn restore(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }
}
