//! Conversion between a [`Task`] and its single persisted line.
//!
//! Layout: `priority | type | done | description [| time...]`, where deadlines
//! carry one time field and events carry two.

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::{Task, TaskKind};
use crate::utils::{format_storage, parse_date_time};

pub const DELIMITER: &str = " | ";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid task format: {0}")]
    Format(String),
    #[error("Invalid date-time in saved task: {0}")]
    DateFormat(String),
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

/// Encode a task as a persisted line (without the trailing newline)
pub fn encode(task: &Task) -> String {
    let mut fields = vec![
        flag(task.high_priority).to_string(),
        task.type_tag().to_string(),
        flag(task.done).to_string(),
        task.description.clone(),
    ];
    match &task.kind {
        TaskKind::Todo => {}
        TaskKind::Deadline { by } => fields.push(format_storage(by)),
        TaskKind::Event { start, end } => {
            fields.push(format_storage(start));
            fields.push(format_storage(end));
        }
    }
    fields.join(DELIMITER)
}

/// Decode a persisted line back into a task
pub fn decode(line: &str) -> Result<Task, CodecError> {
    let parts: Vec<&str> = line.split(DELIMITER).collect();
    if parts.len() < 4 {
        return Err(CodecError::Format(format!(
            "expected at least 4 fields, found {} in `{line}`",
            parts.len()
        )));
    }

    let high_priority = parts[0] == "1";
    let done = parts[2] == "1";
    let description = parts[3].to_string();

    let kind = match parts[1] {
        "T" => TaskKind::Todo,
        "D" => {
            expect_fields(&parts, 5, "deadline")?;
            TaskKind::Deadline {
                by: decode_time(parts[4])?,
            }
        }
        "E" => {
            expect_fields(&parts, 6, "event")?;
            TaskKind::Event {
                start: decode_time(parts[4])?,
                end: decode_time(parts[5])?,
            }
        }
        other => {
            return Err(CodecError::Format(format!("unknown task type `{other}`")));
        }
    };

    Ok(Task {
        description,
        kind,
        done,
        high_priority,
    })
}

fn expect_fields(parts: &[&str], count: usize, what: &str) -> Result<(), CodecError> {
    if parts.len() != count {
        return Err(CodecError::Format(format!(
            "{what} needs {count} fields, found {}",
            parts.len()
        )));
    }
    Ok(())
}

/// Swap the embedded `T` separator back to a space before parsing.
fn decode_time(field: &str) -> Result<NaiveDateTime, CodecError> {
    let (date, time) = field
        .split_once('T')
        .ok_or_else(|| CodecError::DateFormat(field.to_string()))?;
    parse_date_time(&format!("{date} {time}"))
        .map_err(|_| CodecError::DateFormat(field.to_string()))
}
