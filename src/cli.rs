use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::session::Session;

#[derive(Parser)]
#[command(name = "duker")]
#[command(about = "Duker - a small task assistant for todos, deadlines and events")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding the task file (overrides the config)
    #[arg(long)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with Duker interactively (default if no subcommand)
    Chat,
    /// Run a single command, e.g. `duker run todo read book`
    Run {
        /// Command words
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        words: Vec<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Terminal error: {0}")]
    IoError(#[from] io::Error),
}

/// Report saved lines that were skipped while loading
pub fn report_rejected(session: &Session, err: &mut impl Write) -> Result<(), CliError> {
    for rejected in session.rejected_lines() {
        writeln!(
            err,
            "Skipped line {} of saved tasks: {}",
            rejected.line_number, rejected.error
        )?;
    }
    Ok(())
}

/// Handle the interactive chat loop until `bye` or end of input
pub fn handle_chat(session: &mut Session) -> Result<(), CliError> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    report_rejected(session, &mut io::stderr())?;
    writeln!(stdout, "{}", session.greeting())?;

    for line in stdin.lock().lines() {
        let line = line?;
        write!(stdout, "{}", session.respond(line.trim_end()))?;
        stdout.flush()?;
        if !session.is_online() {
            break;
        }
    }
    Ok(())
}

/// Handle the run command
pub fn handle_run(words: Vec<String>, session: &mut Session) -> Result<(), CliError> {
    report_rejected(session, &mut io::stderr())?;
    let input = words.join(" ");
    print!("{}", session.respond(&input));
    Ok(())
}
