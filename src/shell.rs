//! Line grammar of the interactive shell.
//!
//! Only the command word and an optional leading `--due VALUE` are split off;
//! the task text after them is kept as typed, so runs of spaces survive and a
//! single pair of surrounding quotes is dropped.

use std::fmt;

use crate::models::{DueWindow, UnknownDueWindow};

pub const HELP: &str = "\
commands:
  add [--due 2026-10-17T09:00] TEXT   add a task (text is kept as typed)
  toggle|done|undo ID|#N              complete a task, or undo a completion
  delete|rm ID|#N                     delete a task
  filter all|today|tomorrow|week      switch the due window
  list|ls                             show the visible tasks
  help                                show this text
  quit|exit                           leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add { text: String, due: String },
    Toggle(String),
    Delete(String),
    Filter(DueWindow),
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellError {
    UnknownCommand(String),
    MissingArgument {
        command: &'static str,
        what: &'static str,
    },
    UnexpectedArgument {
        command: &'static str,
        extra: String,
    },
    UnclosedQuote(char),
    Window(UnknownDueWindow),
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::UnknownCommand(word) => {
                write!(f, "unknown command `{word}` (type `help`)")
            }
            ShellError::MissingArgument { command, what } => {
                write!(f, "`{command}` needs {what}")
            }
            ShellError::UnexpectedArgument { command, extra } => {
                write!(f, "`{command}` does not take `{extra}`")
            }
            ShellError::UnclosedQuote(quote) => write!(f, "missing closing {quote}"),
            ShellError::Window(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ShellError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShellError::Window(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UnknownDueWindow> for ShellError {
    fn from(value: UnknownDueWindow) -> Self {
        ShellError::Window(value)
    }
}

/// `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, ShellError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = split_word(line);
    let command = match word.to_lowercase().as_str() {
        "add" => parse_add(rest)?,
        "toggle" | "done" | "undo" => ShellCommand::Toggle(single_arg("toggle", "an id", rest)?),
        "delete" | "rm" => ShellCommand::Delete(single_arg("delete", "an id", rest)?),
        "filter" => ShellCommand::Filter(single_arg("filter", "a window", rest)?.parse()?),
        "list" | "ls" => {
            no_args("list", rest)?;
            ShellCommand::List
        }
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => {
            no_args("quit", rest)?;
            ShellCommand::Quit
        }
        _ => return Err(ShellError::UnknownCommand(word.to_string())),
    };
    Ok(Some(command))
}

fn parse_add(rest: &str) -> Result<ShellCommand, ShellError> {
    let (due, text) = if let Some(after) = rest.strip_prefix("--due=") {
        take_value(after)?
    } else {
        match split_word(rest) {
            ("--due", after) => {
                let (due, text) = take_value(after)?;
                if due.is_empty() {
                    return Err(ShellError::MissingArgument {
                        command: "add --due",
                        what: "a date",
                    });
                }
                (due, text)
            }
            _ => ("", rest),
        }
    };
    if text.is_empty() {
        return Err(ShellError::MissingArgument {
            command: "add",
            what: "task text",
        });
    }
    Ok(ShellCommand::Add {
        text: unquote(text).to_string(),
        due: due.to_string(),
    })
}

fn single_arg(
    command: &'static str,
    what: &'static str,
    rest: &str,
) -> Result<String, ShellError> {
    let (arg, extra) = split_word(rest);
    if arg.is_empty() {
        return Err(ShellError::MissingArgument { command, what });
    }
    no_args(command, extra)?;
    Ok(arg.to_string())
}

fn no_args(command: &'static str, rest: &str) -> Result<(), ShellError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(ShellError::UnexpectedArgument {
            command,
            extra: rest.to_string(),
        })
    }
}

/// Splits at the first whitespace run; the remainder is trimmed at both ends only.
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.find(char::is_whitespace) {
        Some(at) => (&input[..at], input[at..].trim()),
        None => (input, ""),
    }
}

/// Like `split_word`, but a value opening with a quote runs to the matching quote.
fn take_value(input: &str) -> Result<(&str, &str), ShellError> {
    let input = input.trim();
    let Some(quote) = input.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return Ok(split_word(input));
    };
    let body = &input[1..];
    let end = body.find(quote).ok_or(ShellError::UnclosedQuote(quote))?;
    Ok((&body[..end], body[end + 1..].trim()))
}

fn unquote(text: &str) -> &str {
    let mut chars = text.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if first == last && (first == '"' || first == '\'') => {
            &text[1..text.len() - 1]
        }
        _ => text,
    }
}
