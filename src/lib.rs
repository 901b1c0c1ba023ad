pub mod cli;
pub mod codec;
pub mod config;
pub mod models;
pub mod parser;
pub mod session;
pub mod storage;
pub mod task_list;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use models::{Task, TaskKind};
pub use session::Session;
pub use storage::Storage;
pub use task_list::TaskList;
