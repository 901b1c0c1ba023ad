//! Turns one line of user input into a validated [`Command`].
//!
//! Parsing never touches the task list or the backing file; indices are checked
//! against the current list size so a returned command is always safe to run.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::codec::DELIMITER;
use crate::models::Task;
use crate::utils::parse_date_time;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0}")]
    Argument(String),
    #[error(
        "Invalid date-time format. Please provide the date-time in 'yyyy-MM-dd HH:mm' format. Time should be in 24 hours format."
    )]
    DateFormat(String),
    #[error("Invalid index provided, please provide proper index.")]
    Index,
    #[error("OOPS!!! I'm sorry, but I don't know what that means :-(")]
    UnknownCommand(String),
}

/// A parsed command. Indices are 0-based and already bounds-checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Task),
    Mark(usize),
    Unmark(usize),
    Prioritise(usize),
    Deprioritise(usize),
    Delete(usize),
    List,
    Priority,
    Find(String),
    Bye,
}

/// Parse `input` against a list currently holding `size` tasks
pub fn parse(input: &str, size: usize) -> Result<Command, CommandError> {
    let (word, rest) = input.split_once(' ').unwrap_or((input, ""));
    match word {
        "todo" => parse_todo(rest).map(Command::Add),
        "deadline" => parse_deadline(rest).map(Command::Add),
        "event" => parse_event(rest).map(Command::Add),
        "mark" => parse_index(rest, size).map(Command::Mark),
        "unmark" => parse_index(rest, size).map(Command::Unmark),
        "prioritise" => parse_index(rest, size).map(Command::Prioritise),
        "deprioritise" => parse_index(rest, size).map(Command::Deprioritise),
        "delete" => parse_index(rest, size).map(Command::Delete),
        "list" => Ok(Command::List),
        "priority" => Ok(Command::Priority),
        "find" => parse_keyword(rest).map(Command::Find),
        "bye" => Ok(Command::Bye),
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn parse_todo(rest: &str) -> Result<Task, CommandError> {
    let description = require_description(rest, "todo")?;
    Ok(Task::todo(description))
}

fn parse_deadline(rest: &str) -> Result<Task, CommandError> {
    let parts: Vec<&str> = rest.split("/by").collect();
    if parts.len() != 2 {
        return Err(CommandError::Argument(
            "Deadline command must contain '/by' followed by a date-time.".to_string(),
        ));
    }
    let description = require_description(parts[0], "deadline")?;
    let by = parse_time(parts[1])?;
    Ok(Task::deadline(description, by))
}

fn parse_event(rest: &str) -> Result<Task, CommandError> {
    let from_parts: Vec<&str> = rest.split("/from").collect();
    if from_parts.len() != 2 {
        return Err(CommandError::Argument(
            "Event command must contain '/from' followed by a start date-time.".to_string(),
        ));
    }
    // `/to` must follow `/from`, and only once
    let to_parts: Vec<&str> = from_parts[1].split("/to").collect();
    if to_parts.len() != 2 || from_parts[0].contains("/to") {
        return Err(CommandError::Argument(
            "Event command must contain '/to' followed by an end date-time.".to_string(),
        ));
    }
    let description = require_description(from_parts[0], "event")?;
    let start = parse_time(to_parts[0])?;
    let end = parse_time(to_parts[1])?;
    Ok(Task::event(description, start, end))
}

fn require_description(text: &str, command: &str) -> Result<String, CommandError> {
    let description = text.trim();
    if description.is_empty() {
        return Err(CommandError::Argument(format!(
            "Description for '{command}' cannot be empty."
        )));
    }
    if description.contains(DELIMITER) {
        return Err(CommandError::Argument(format!(
            "Description for '{command}' cannot contain '{}'.",
            DELIMITER.trim()
        )));
    }
    Ok(description.to_string())
}

fn parse_time(text: &str) -> Result<NaiveDateTime, CommandError> {
    let text = text.trim();
    parse_date_time(text).map_err(|_| CommandError::DateFormat(text.to_string()))
}

/// Convert a 1-based user index into a checked 0-based one
fn parse_index(rest: &str, size: usize) -> Result<usize, CommandError> {
    let index: i64 = rest.trim().parse().map_err(|_| CommandError::Index)?;
    if index < 1 || index as u64 > size as u64 {
        return Err(CommandError::Index);
    }
    Ok(index as usize - 1)
}

fn parse_keyword(rest: &str) -> Result<String, CommandError> {
    let keyword = rest.trim();
    if keyword.is_empty() {
        return Err(CommandError::Argument("Please provide a keyword".to_string()));
    }
    Ok(keyword.to_string())
}
