use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use todo_list_lib::shell::{parse_line, ShellCommand, HELP};
use todo_list_lib::view::{project, render_line, resolve_locale, StatePayload};
use todo_list_lib::{
    dispatch, load_settings, load_state, logging, paths, AppCtx, Command, CommandCtx, DueWindow,
    Outcome, Storage, TaskState,
};

#[derive(Parser)]
#[command(name = "todo-list", version)]
#[command(about = "Todo list with due dates and due-window filters")]
struct Cli {
    /// Directory holding tasks.json, settings.json and the log files
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    /// Locale for dates, e.g. en-US or de-DE ("auto" asks the OS)
    #[arg(long, value_name = "TAG")]
    locale: Option<String>,
    /// Initial due window: all, today, tomorrow or week
    #[arg(long, value_name = "WINDOW")]
    filter: Option<DueWindow>,
    #[command(subcommand)]
    command: Option<Action>,
}

#[derive(Subcommand)]
enum Action {
    /// Add a task
    Add {
        /// Due date, e.g. 2026-10-17T09:00 or 2026-10-17
        #[arg(long, default_value = "")]
        due: String,
        /// Task description
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Mark a task complete, or undo a completion
    Toggle {
        /// Task id, or #N for the N-th visible row
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task id, or #N for the N-th visible row
        id: String,
    },
    /// Show tasks in a due window
    List {
        #[arg(long, value_name = "WINDOW")]
        filter: Option<DueWindow>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = paths::data_dir(cli.data_dir.as_deref());
    let _logger = logging::init_logging(&data_dir).context("failed to initialize logging")?;

    let storage = Storage::new(data_dir);
    storage
        .ensure_dirs()
        .with_context(|| format!("cannot create data directory {}", storage.root().display()))?;

    let mut settings = load_settings(&storage);
    if let Some(locale) = cli.locale {
        settings.locale = locale;
    }
    if let Some(filter) = cli.filter {
        settings.default_filter = filter;
    }

    let ctx = AppCtx::new(storage);
    let state = load_state(&ctx, &settings);
    let mut app = App {
        ctx,
        state,
        locale: resolve_locale(&settings.locale),
    };
    log::info!(
        "started tasks={} filter={} locale={:?}",
        app.state.len(),
        app.state.filter(),
        app.locale
    );

    match cli.command {
        Some(action) => app.run_once(action),
        None => app.run_shell(),
    }
}

struct App {
    ctx: AppCtx,
    state: TaskState,
    locale: chrono::Locale,
}

impl App {
    fn payload(&self) -> StatePayload {
        project(&self.state, &self.ctx.now(), self.locale)
    }

    fn print_list(&self) {
        let payload = self.payload();
        println!(
            "Filter: {} ({} of {} shown)",
            payload.filter,
            payload.visible_count,
            payload.tasks.len()
        );
        if payload.visible_count == 0 {
            println!("  (no tasks)");
        }
        for (index, view) in payload.visible().enumerate() {
            println!("{}", render_line(index + 1, view));
        }
    }

    /// `#N` refers to the N-th row of the current visible list.
    fn resolve_id(&self, token: &str) -> Result<String> {
        let Some(position) = token.strip_prefix('#') else {
            return Ok(token.to_string());
        };
        let position: usize = position
            .parse()
            .map_err(|_| anyhow!("invalid row reference `{token}`"))?;
        self.payload()
            .visible()
            .nth(position.wrapping_sub(1))
            .map(|view| view.id.clone())
            .ok_or_else(|| anyhow!("no visible row {token}"))
    }

    fn execute(&mut self, command: Command) -> Result<()> {
        let outcome = dispatch(&self.ctx, &mut self.state, command)?;
        match outcome {
            Outcome::Added(task) => println!("Added: {}", task.text),
            Outcome::Toggled(task) if task.completed => println!("Completed: {}", task.text),
            Outcome::Toggled(task) => println!("Reopened: {}", task.text),
            Outcome::Deleted(task) => println!("Deleted: {}", task.text),
            Outcome::FilterChanged(_) | Outcome::Ignored => {}
        }
        Ok(())
    }

    fn run_once(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Add { due, text } => self.execute(Command::AddTask {
                text: text.join(" "),
                due,
            }),
            Action::Toggle { id } => {
                let id = self.resolve_id(&id)?;
                self.execute(Command::ToggleComplete(id))
            }
            Action::Delete { id } => {
                let id = self.resolve_id(&id)?;
                self.execute(Command::Delete(id))
            }
            Action::List { filter } => {
                if let Some(window) = filter {
                    self.execute(Command::SetFilter(window))?;
                }
                self.print_list();
                Ok(())
            }
        }
    }

    fn run_shell(&mut self) -> Result<()> {
        println!("todo-list: type `help` for commands, `quit` to leave");
        self.print_list();

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("> ");
            io::stdout().flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;

            let parsed = match parse_line(&line) {
                Ok(Some(parsed)) => parsed,
                Ok(None) => continue,
                Err(err) => {
                    eprintln!("error: {err}");
                    continue;
                }
            };

            let result = match parsed {
                ShellCommand::Quit => break,
                ShellCommand::Help => {
                    println!("{HELP}");
                    continue;
                }
                ShellCommand::List => Ok(()),
                ShellCommand::Add { text, due } => self.execute(Command::AddTask { text, due }),
                ShellCommand::Toggle(id) => self
                    .resolve_id(&id)
                    .and_then(|id| self.execute(Command::ToggleComplete(id))),
                ShellCommand::Delete(id) => self
                    .resolve_id(&id)
                    .and_then(|id| self.execute(Command::Delete(id))),
                ShellCommand::Filter(window) => self.execute(Command::SetFilter(window)),
            };
            if let Err(err) = result {
                log::warn!("command failed: {err:#}");
                eprintln!("error: {err:#}");
            }
            self.print_list();
        }
        log::info!("shell closed tasks={}", self.state.len());
        Ok(())
    }
}
