use clap::Parser;
use color_eyre::Result;
use duker::{Config, Session, cli::{Cli, Commands}};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let cli = Cli::parse();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(Path::new(path))?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    // Logs go to stderr so stdout only carries Duker's replies
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level)?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut session = Session::open(config.storage())?;

    match cli.command {
        None | Some(Commands::Chat) => {
            duker::cli::handle_chat(&mut session)?;
        }
        Some(Commands::Run { words }) => {
            duker::cli::handle_run(words, &mut session)?;
        }
    }

    Ok(())
}
