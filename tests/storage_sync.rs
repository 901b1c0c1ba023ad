use chrono::NaiveDate;
use duker::codec::CodecError;
use duker::storage::StorageError;
use duker::{Storage, Task, TaskList};
use std::fs;
use tempfile::TempDir;

fn storage_in(dir: &TempDir) -> Storage {
    Storage::in_dir(dir.path().join("data"), "duker.txt")
}

fn file_lines(storage: &Storage) -> Vec<String> {
    fs::read_to_string(storage.path())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn load_creates_missing_directory_and_file() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    let loaded = storage.load_all().unwrap();
    assert!(loaded.tasks.is_empty());
    assert!(loaded.rejected.is_empty());
    assert!(storage.path().exists());
}

#[test]
fn load_skips_bad_lines_and_keeps_the_rest() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
    fs::write(
        storage.path(),
        "0 | T | 1 | first\n\
         garbage\n\
         0 | D | 0 | report | someday\n\
         1 | E | 0 | trip | 2024-03-02T08:00 | 2024-03-03T20:15\n",
    )
    .unwrap();

    let loaded = storage.load_all().unwrap();
    let descriptions: Vec<&str> = loaded.tasks.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(descriptions, vec!["first", "trip"]);
    assert!(loaded.tasks[0].done);
    assert!(loaded.tasks[1].high_priority);

    assert_eq!(loaded.rejected.len(), 2);
    assert_eq!(loaded.rejected[0].line_number, 2);
    assert!(matches!(loaded.rejected[0].error, CodecError::Format(_)));
    assert_eq!(loaded.rejected[1].line_number, 3);
    assert!(matches!(loaded.rejected[1].error, CodecError::DateFormat(_)));
}

#[test]
fn load_compacts_the_file_and_keeps_bad_lines_aside() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
    fs::write(
        storage.path(),
        "garbage
0 | T | 0 | a
0 | D | 0 | old | 2024/03/01 18:00
0 | T | 0 | b
",
    )
    .unwrap();

    let loaded = storage.load_all().unwrap();
    assert_eq!(loaded.tasks.len(), 2);
    assert_eq!(loaded.rejected[0].text, "garbage");
    assert_eq!(file_lines(&storage), vec!["0 | T | 0 | a", "0 | T | 0 | b"]);

    let aside: Vec<String> = fs::read_to_string(storage.rejected_path())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(aside, vec!["garbage", "0 | D | 0 | old | 2024/03/01 18:00"]);

    // Line indices now line up with the loaded tasks
    let mut list = TaskList::new();
    for task in loaded.tasks {
        list.load(task);
    }
    list.mark(0, &storage).unwrap();
    assert_eq!(file_lines(&storage), vec!["0 | T | 1 | a", "0 | T | 0 | b"]);
    assert!(storage.load_all().unwrap().rejected.is_empty());
}

#[test]
fn clean_file_is_not_rewritten_on_load() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();
    storage.append(&Task::todo("a")).unwrap();

    storage.load_all().unwrap();
    assert!(!storage.rejected_path().exists());
    assert_eq!(file_lines(&storage), vec!["0 | T | 0 | a"]);
}

#[test]
fn add_appends_without_touching_existing_lines() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();

    let mut list = TaskList::new();
    list.add(Task::todo("a"), &storage).unwrap();
    let by = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(18, 0, 0)
        .unwrap();
    list.add(Task::deadline("b", by), &storage).unwrap();

    assert_eq!(list.size(), 2);
    assert_eq!(list.get(list.size() - 1).description, "b");
    assert_eq!(
        file_lines(&storage),
        vec!["0 | T | 0 | a", "0 | D | 0 | b | 2024-03-01T18:00"]
    );
}

#[test]
fn delete_shifts_tasks_and_drops_one_line() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();

    let mut list = TaskList::new();
    for d in ["a", "b", "c", "d"] {
        list.add(Task::todo(d), &storage).unwrap();
    }

    let removed = list.delete(1, &storage).unwrap();
    assert_eq!(removed.description, "b");
    assert_eq!(list.get(1).description, "c");
    assert_eq!(list.get(2).description, "d");
    assert_eq!(
        file_lines(&storage),
        vec!["0 | T | 0 | a", "0 | T | 0 | c", "0 | T | 0 | d"]
    );
}

#[test]
fn flag_changes_rewrite_only_their_line() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();

    let mut list = TaskList::new();
    for d in ["a", "b", "c"] {
        list.add(Task::todo(d), &storage).unwrap();
    }

    list.mark(1, &storage).unwrap();
    list.prioritise(2, &storage).unwrap();
    assert_eq!(
        file_lines(&storage),
        vec!["0 | T | 0 | a", "0 | T | 1 | b", "1 | T | 0 | c"]
    );

    list.unmark(1, &storage).unwrap();
    list.deprioritise(2, &storage).unwrap();
    assert_eq!(
        file_lines(&storage),
        vec!["0 | T | 0 | a", "0 | T | 0 | b", "0 | T | 0 | c"]
    );
    assert!(!storage.path().with_file_name("duker.txt.tmp").exists());
}

#[test]
fn marking_twice_leaves_the_same_line() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();

    let mut list = TaskList::new();
    list.add(Task::todo("a"), &storage).unwrap();
    list.mark(0, &storage).unwrap();
    let once = file_lines(&storage);
    list.mark(0, &storage).unwrap();

    assert_eq!(file_lines(&storage), once);
    assert!(list.get(0).done);
}

#[test]
fn reload_reproduces_the_list() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();

    let start = NaiveDate::from_ymd_opt(2024, 5, 4)
        .unwrap()
        .and_hms_opt(9, 15, 0)
        .unwrap();
    let end = start + chrono::Duration::hours(3);

    let mut list = TaskList::new();
    list.add(Task::todo("a"), &storage).unwrap();
    list.add(Task::event("conference", start, end), &storage).unwrap();
    list.mark(1, &storage).unwrap();

    let reloaded = storage.load_all().unwrap();
    let expected: Vec<Task> = list.iter().cloned().collect();
    assert_eq!(reloaded.tasks, expected);
}

#[test]
fn rewrite_of_a_missing_line_is_reported() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();
    storage.append(&Task::todo("only")).unwrap();

    let err = storage.replace_line(3, &Task::todo("ghost")).unwrap_err();
    assert!(matches!(err, StorageError::MissingLine { index: 3, lines: 1 }));
    assert_eq!(file_lines(&storage), vec!["0 | T | 0 | only"]);
    assert!(!storage.path().with_file_name("duker.txt.tmp").exists());
}

#[test]
fn failed_delete_still_returns_the_task() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    storage.load_all().unwrap();

    let mut list = TaskList::new();
    list.add(Task::todo("a"), &storage).unwrap();
    list.add(Task::todo("b"), &storage).unwrap();
    fs::remove_file(storage.path()).unwrap();

    let (removed, err) = list.delete(0, &storage).unwrap_err();
    assert_eq!(removed.description, "a");
    assert!(matches!(err, StorageError::Io { .. }));
    assert_eq!(list.size(), 1);
    assert!(!storage.path().with_file_name("duker.txt.tmp").exists());
}

#[test]
fn storage_failure_keeps_memory_updated() {
    let dir = TempDir::new().unwrap();
    // The data directory is never created, so every write fails
    let storage = Storage::in_dir(dir.path().join("missing"), "duker.txt");

    let mut list = TaskList::new();
    let result = list.add(Task::todo("a"), &storage);
    assert!(matches!(result, Err(StorageError::Io { .. })));
    assert_eq!(list.size(), 1);
}

#[test]
fn read_failure_mid_rewrite_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
    // The second line is not valid UTF-8, so copying fails after the temp file exists
    let original: &[u8] = b"0 | T | 0 | a\n\xff\xfe\n0 | T | 0 | b\n";
    fs::write(storage.path(), original).unwrap();

    let err = storage.replace_line(2, &Task::todo("c")).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
    assert!(!storage.path().with_file_name("duker.txt.tmp").exists());
    assert_eq!(fs::read(storage.path()).unwrap(), original);
}
