use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use taskdesk::error::TaskError;
use taskdesk::models::{Deadline, Priority};
use taskdesk::storage::{db_path, read_tasks, write_tasks, TaskRecord, DEFAULT_FILE, PATH_ENV};
use taskdesk::store::TaskStore;
use tempfile::TempDir;

// Serialises tests that touch TASKS_DB.
static TEST_MUTEX: Mutex<()> = Mutex::new(());

type Fields = (String, String, Deadline, Priority, bool);

fn fields(store: &TaskStore) -> Vec<Fields> {
    store
        .tasks()
        .iter()
        .map(|t| (t.description.clone(), t.category.clone(), t.deadline, t.priority, t.status))
        .collect()
}

fn scratch() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.txt");
    (dir, path)
}

#[test]
fn test_save_clear_load_round_trip() {
    let (_dir, path) = scratch();
    let mut store = TaskStore::new();
    store.add("Buy milk", "shop", "2024-05-01", "high").unwrap();
    store.add("Call mom", "", "", "").unwrap();
    store.toggle_status(2).unwrap();
    let before = fields(&store);

    let msg = store.save(&path).unwrap();
    assert!(msg.starts_with("Tasks saved successfully to"));
    assert_eq!(store.delete_all(), "All tasks have been deleted.");

    store.load(&path).unwrap();
    assert_eq!(store.len(), 2);
    assert_eq!(fields(&store), before);
}

#[test]
fn test_round_trip_keeps_priority_listing_order() {
    let (_dir, path) = scratch();
    let mut store = TaskStore::new();
    store.add("Low one", "", "2024-01-01", "low").unwrap();
    store.add("High one", "", "2024-06-01", "high").unwrap();
    store.list_by_priority();
    let before = fields(&store);

    store.save(&path).unwrap();
    let mut other = TaskStore::new();
    other.load(&path).unwrap();
    assert_eq!(fields(&other), before);
}

#[test]
fn test_file_format() {
    let (_dir, path) = scratch();
    let mut store = TaskStore::new();
    store.add("Buy milk", "", "2024-01-15", "medium").unwrap();
    store.toggle_status(1).unwrap();
    store.save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\n    {"), "records are indented by four spaces");

    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "Description": "Buy milk",
            "Category": "none",
            "Deadline": "2024-01-15",
            "Priority": "MEDIUM",
            "Status": "[✔]"
        }])
    );
}

#[test]
fn test_reads_escaped_glyph_and_lowercase_priority() {
    let (_dir, path) = scratch();
    fs::write(
        &path,
        r#"[{"Description": "Walk dog", "Category": "none", "Deadline": "none", "Priority": "low", "Status": "[\u2714]"}]"#,
    )
    .unwrap();

    let tasks = read_tasks(&path).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].priority, Priority::Low);
    assert_eq!(tasks[0].deadline, Deadline::Unset);
    assert!(tasks[0].status);
}

#[test]
fn test_load_replaces_collection() {
    let (_dir, path) = scratch();
    let mut saved = TaskStore::new();
    saved.add("From file", "", "", "").unwrap();
    saved.save(&path).unwrap();

    let mut store = TaskStore::new();
    store.add("In memory", "", "", "").unwrap();
    store.add("Also in memory", "", "", "").unwrap();
    store.load(&path).unwrap();

    assert_eq!(store.len(), 1);
    assert_eq!(store.tasks()[0].description, "From file");
}

fn assert_load_fails_untouched(contents: Option<&str>) -> TaskError {
    let (_dir, path) = scratch();
    if let Some(c) = contents {
        fs::write(&path, c).unwrap();
    }
    let mut store = TaskStore::new();
    store.add("Keep me", "", "", "").unwrap();

    let err = store.load(&path).unwrap_err();
    assert_eq!(store.len(), 1);
    assert_eq!(store.tasks()[0].description, "Keep me");
    err
}

#[test]
fn test_load_missing_file() {
    let err = assert_load_fails_untouched(None);
    assert!(matches!(err, TaskError::Io { .. }));
}

#[test]
fn test_load_malformed_json() {
    let err = assert_load_fails_untouched(Some("[{\"Description\": "));
    assert!(matches!(err, TaskError::Format(_)));
}

#[test]
fn test_load_unknown_priority() {
    let err = assert_load_fails_untouched(Some(
        r#"[{"Description": "A", "Category": "none", "Deadline": "none", "Priority": "URGENT", "Status": "[ ]"}]"#,
    ));
    assert!(matches!(err, TaskError::InvalidPriority(_)));
}

#[test]
fn test_load_blank_priority() {
    let err = assert_load_fails_untouched(Some(
        r#"[{"Description": "A", "Category": "none", "Deadline": "none", "Priority": "", "Status": "[ ]"}]"#,
    ));
    assert!(matches!(err, TaskError::InvalidPriority(_)));

    let err = assert_load_fails_untouched(Some(
        r#"[{"Description": "A", "Category": "none", "Deadline": "none", "Priority": " HIGH", "Status": "[ ]"}]"#,
    ));
    assert!(matches!(err, TaskError::InvalidPriority(_)));
}

#[test]
fn test_load_blank_deadline() {
    for deadline in ["", "NONE", " 2024-01-15"] {
        let contents = format!(
            r#"[{{"Description": "A", "Category": "none", "Deadline": "{}", "Priority": "NONE", "Status": "[ ]"}}]"#,
            deadline
        );
        let err = assert_load_fails_untouched(Some(&contents));
        assert!(matches!(err, TaskError::InvalidDeadline(_)), "deadline {:?}", deadline);
    }
}

#[test]
fn test_load_bad_status_glyph() {
    let err = assert_load_fails_untouched(Some(
        r#"[{"Description": "A", "Category": "none", "Deadline": "none", "Priority": "NONE", "Status": "done"}]"#,
    ));
    assert!(matches!(err, TaskError::InvalidStatus(_)));
}

#[test]
fn test_load_bad_deadline() {
    let err = assert_load_fails_untouched(Some(
        r#"[{"Description": "A", "Category": "none", "Deadline": "31/12/2024", "Priority": "NONE", "Status": "[ ]"}]"#,
    ));
    assert!(matches!(err, TaskError::InvalidDeadline(_)));
}

#[test]
fn test_save_to_unwritable_path() {
    let (dir, _) = scratch();
    let path = dir.path().join("missing").join("tasks.txt");
    let store = TaskStore::new();
    assert!(matches!(store.save(&path), Err(TaskError::Io { .. })));
}

#[test]
fn test_open_missing_file_is_empty() {
    let (_dir, path) = scratch();
    let store = TaskStore::open(&path).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_write_then_read_records() {
    let (_dir, path) = scratch();
    let mut store = TaskStore::new();
    store.add("One", "a", "2024-02-02", "high").unwrap();
    write_tasks(&path, store.tasks()).unwrap();

    let tasks = read_tasks(&path).unwrap();
    let record = TaskRecord::from(&tasks[0]);
    assert_eq!(record.description, "One");
    assert_eq!(record.priority, "HIGH");
    assert_eq!(record.status, "[ ]");
}

#[test]
fn test_loaded_tasks_equal_saved_ones() {
    let (_dir, path) = scratch();
    let mut store = TaskStore::new();
    store.add("Buy milk", "shop", "2024-05-01", "high").unwrap();
    store.add("Call mom", "", "", "").unwrap();
    store.save(&path).unwrap();

    let mut other = TaskStore::new();
    other.add("Pad the ids", "", "", "").unwrap();
    other.load(&path).unwrap();

    assert_ne!(other.tasks()[0].id, store.tasks()[0].id);
    assert_eq!(other.tasks(), store.tasks());
}

#[test]
fn test_explicit_path_wins() {
    let _guard = TEST_MUTEX.lock().unwrap();
    env::remove_var(PATH_ENV);

    let explicit = PathBuf::from("/tmp/elsewhere.json");
    assert_eq!(db_path(Some(explicit.clone())), explicit);
    assert_eq!(db_path(None), PathBuf::from(DEFAULT_FILE));
}

#[test]
fn test_env_path_used_without_flag() {
    let _guard = TEST_MUTEX.lock().unwrap();
    let (_dir, from_env) = scratch();
    env::set_var(PATH_ENV, &from_env);

    let resolved = db_path(None);
    let flagged = db_path(Some(PathBuf::from("/tmp/flag.json")));
    env::remove_var(PATH_ENV);

    assert_eq!(resolved, from_env);
    assert_eq!(flagged, PathBuf::from("/tmp/flag.json"));
}
