use crate::models::Task;
use crate::storage::{Storage, StorageError};

/// Ordered tasks for the current session, kept in the same order as the
/// lines of the backing file.
///
/// Index-taking methods expect a 0-based index already checked by the parser
/// and panic otherwise. Mutations update memory first and then the file; a
/// storage failure is returned but never rolls memory back.
#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append without touching storage, used while replaying the file
    pub fn load(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn add(&mut self, task: Task, storage: &Storage) -> Result<(), StorageError> {
        self.tasks.push(task);
        storage.append(&self.tasks[self.tasks.len() - 1])
    }

    /// Remove the task at `index`. The removed task is handed back even when
    /// the file update fails.
    pub fn delete(&mut self, index: usize, storage: &Storage) -> Result<Task, (Task, StorageError)> {
        let task = self.tasks.remove(index);
        match storage.delete_line(index) {
            Ok(()) => Ok(task),
            Err(e) => Err((task, e)),
        }
    }

    pub fn mark(&mut self, index: usize, storage: &Storage) -> Result<(), StorageError> {
        self.update(index, storage, Task::mark_done)
    }

    pub fn unmark(&mut self, index: usize, storage: &Storage) -> Result<(), StorageError> {
        self.update(index, storage, Task::unmark_done)
    }

    pub fn prioritise(&mut self, index: usize, storage: &Storage) -> Result<(), StorageError> {
        self.update(index, storage, Task::mark_high_priority)
    }

    pub fn deprioritise(&mut self, index: usize, storage: &Storage) -> Result<(), StorageError> {
        self.update(index, storage, Task::unmark_high_priority)
    }

    fn update(
        &mut self,
        index: usize,
        storage: &Storage,
        change: fn(&mut Task),
    ) -> Result<(), StorageError> {
        let task = &mut self.tasks[index];
        change(task);
        storage.replace_line(index, task)
    }

    pub fn get(&self, index: usize) -> &Task {
        &self.tasks[index]
    }

    pub fn size(&self) -> usize {
        self.tasks.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Tasks whose description contains `keyword` (case-sensitive), in list order
    pub fn find_by_keyword(&self, keyword: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.description.contains(keyword))
            .collect()
    }

    pub fn high_priority(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.high_priority).collect()
    }
}
