use tracing::{debug, warn};

use crate::parser::{self, Command};
use crate::storage::{RejectedLine, Storage, StorageError};
use crate::task_list::TaskList;
use crate::ui::{self, Sink};

/// One running assistant: owns the task list and its backing storage
pub struct Session {
    tasks: TaskList,
    storage: Storage,
    rejected: Vec<RejectedLine>,
    online: bool,
}

impl Session {
    /// Replay the backing file into a fresh task list
    pub fn open(storage: Storage) -> Result<Self, StorageError> {
        let loaded = storage.load_all()?;
        let mut tasks = TaskList::new();
        for task in loaded.tasks {
            tasks.load(task);
        }
        Ok(Self {
            tasks,
            storage,
            rejected: loaded.rejected,
            online: true,
        })
    }

    pub fn greeting(&self) -> &'static str {
        ui::greet()
    }

    /// Saved lines skipped at startup because they could not be decoded
    pub fn rejected_lines(&self) -> &[RejectedLine] {
        &self.rejected
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Run one line of input and return everything it printed
    pub fn respond(&mut self, input: &str) -> String {
        let mut out = String::new();
        self.execute(input, &mut out);
        out
    }

    /// Run one line of input, writing its output to `out`
    pub fn execute(&mut self, input: &str, out: &mut impl Sink) {
        let command = match parser::parse(input, self.tasks.size()) {
            Ok(command) => command,
            Err(e) => {
                debug!(input, error = %e, "rejected command");
                ui::error(out, &e);
                return;
            }
        };
        debug!(?command, "executing command");

        let synced = match command {
            Command::Add(task) => {
                let synced = self.tasks.add(task, &self.storage);
                let total = self.tasks.size();
                ui::added(out, self.tasks.get(total - 1), total);
                synced
            }
            Command::Delete(index) => {
                let (task, synced) = match self.tasks.delete(index, &self.storage) {
                    Ok(task) => (task, Ok(())),
                    Err((task, e)) => (task, Err(e)),
                };
                ui::deleted(out, &task, self.tasks.size());
                synced
            }
            Command::Mark(index) => {
                let synced = self.tasks.mark(index, &self.storage);
                ui::marked(out, self.tasks.get(index));
                synced
            }
            Command::Unmark(index) => {
                let synced = self.tasks.unmark(index, &self.storage);
                ui::unmarked(out, self.tasks.get(index));
                synced
            }
            Command::Prioritise(index) => {
                let synced = self.tasks.prioritise(index, &self.storage);
                ui::prioritised(out, self.tasks.get(index));
                synced
            }
            Command::Deprioritise(index) => {
                let synced = self.tasks.deprioritise(index, &self.storage);
                ui::deprioritised(out, self.tasks.get(index));
                synced
            }
            Command::List => {
                ui::list(out, self.tasks.iter());
                Ok(())
            }
            Command::Priority => {
                ui::priorities(out, self.tasks.high_priority());
                Ok(())
            }
            Command::Find(keyword) => {
                ui::matches(out, self.tasks.find_by_keyword(&keyword));
                Ok(())
            }
            Command::Bye => {
                ui::bye(out);
                self.online = false;
                Ok(())
            }
        };

        if let Err(e) = synced {
            warn!(path = %self.storage.path().display(), error = %e, "task list and file may differ");
            ui::save_failed(out, &e);
        }
    }
}
