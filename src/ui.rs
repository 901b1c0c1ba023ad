//! User-facing text. Everything the assistant says goes through a [`Sink`].

use crate::models::Task;

pub const GREETING: &str = "Hello! I'm Duker\nWhat can I do for you?";

/// Destination for printed lines
pub trait Sink {
    fn line(&mut self, text: &str);
}

/// Collects lines newline-terminated, like console output
impl Sink for String {
    fn line(&mut self, text: &str) {
        self.push_str(text);
        self.push('\n');
    }
}

pub fn greet() -> &'static str {
    GREETING
}

pub fn bye(out: &mut impl Sink) {
    out.line("Bye. Hope to see you again soon!");
}

pub fn added(out: &mut impl Sink, task: &Task, total: usize) {
    out.line("Got it. I've added this task: ");
    out.line(&task.to_string());
    count(out, total);
}

pub fn deleted(out: &mut impl Sink, task: &Task, total: usize) {
    out.line("Noted. I've removed this task:");
    out.line(&task.to_string());
    count(out, total);
}

fn count(out: &mut impl Sink, total: usize) {
    out.line(&format!("Now you have {total} tasks in the list."));
}

pub fn marked(out: &mut impl Sink, task: &Task) {
    out.line("Nice! I've marked this task as done:");
    out.line(&task.to_string());
}

pub fn unmarked(out: &mut impl Sink, task: &Task) {
    out.line("Ok! I've marked this task as not done yet:");
    out.line(&task.to_string());
}

pub fn prioritised(out: &mut impl Sink, task: &Task) {
    out.line("Alright! I've marked this task as high priority:");
    out.line(&task.to_string());
}

pub fn deprioritised(out: &mut impl Sink, task: &Task) {
    out.line("Ok! I've removed the high priority mark from this task:");
    out.line(&task.to_string());
}

/// Print `tasks` numbered from 1 under `heading`
pub fn numbered<'a>(out: &mut impl Sink, heading: &str, tasks: impl IntoIterator<Item = &'a Task>) {
    out.line(heading);
    for (i, task) in tasks.into_iter().enumerate() {
        out.line(&format!("{}.{}", i + 1, task));
    }
}

pub fn list<'a>(out: &mut impl Sink, tasks: impl IntoIterator<Item = &'a Task>) {
    numbered(out, "Here are the tasks in your list:", tasks);
}

pub fn matches<'a>(out: &mut impl Sink, tasks: impl IntoIterator<Item = &'a Task>) {
    numbered(out, "Here are the matching tasks in your list:", tasks);
}

pub fn priorities<'a>(out: &mut impl Sink, tasks: impl IntoIterator<Item = &'a Task>) {
    numbered(out, "Here are the high priority tasks in your list:", tasks);
}

pub fn error(out: &mut impl Sink, message: &dyn std::fmt::Display) {
    out.line(&message.to_string());
}

pub fn save_failed(out: &mut impl Sink, message: &dyn std::fmt::Display) {
    out.line(&format!("Could not save changes: {message}"));
}
