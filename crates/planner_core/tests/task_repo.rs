use planner_core::db::open_db_in_memory;
use planner_core::{
    parse_timestamp, DirectoryRepository, RepoError, SqliteDirectoryRepository,
    SqliteTaskRepository, Subject, Task, TaskRepository,
};
use rusqlite::Connection;
use uuid::Uuid;

fn seeded_conn() -> Connection {
    let conn = open_db_in_memory().unwrap();
    let directory = SqliteDirectoryRepository::try_new(&conn).unwrap();
    for student in ["SV001", "SV002"] {
        directory.ensure_student(student).unwrap();
    }
    directory.ensure_subject("MH01").unwrap();
    conn
}

fn deadline(student: &str, title: &str, score: Option<f64>) -> Task {
    let mut task = Task::new_deadline(
        student,
        "MH01",
        title,
        parse_timestamp("2026-03-01 09:15:00").unwrap(),
        parse_timestamp("2026-03-03 17:00:00").unwrap(),
        4,
    );
    task.priority_score = score;
    task
}

#[test]
fn create_and_get_roundtrip() {
    let conn = seeded_conn();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = deadline("SV001", "Essay", Some(48.25));
    let id = repo.create_task(&task).unwrap();

    let loaded = repo.get_task(id).unwrap().unwrap();
    assert_eq!(loaded, task);
}

#[test]
fn get_missing_returns_none() {
    let conn = seeded_conn();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();
    assert!(repo.get_task(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn null_score_survives_roundtrip() {
    let conn = seeded_conn();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = deadline("SV001", "Unscored", None);
    repo.create_task(&task).unwrap();
    assert_eq!(repo.get_task(task.id).unwrap().unwrap().priority_score, None);
}

#[test]
fn list_is_scoped_to_student_and_sorted_by_due_then_insertion() {
    let conn = seeded_conn();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    for (title, due) in [
        ("late", "2026-03-20 08:00:00"),
        ("early", "2026-03-05 08:00:00"),
        ("late twin", "2026-03-20 08:00:00"),
    ] {
        let mut task = deadline("SV001", title, Some(1.0));
        task.due_time = parse_timestamp(due).unwrap();
        repo.create_task(&task).unwrap();
    }
    repo.create_task(&deadline("SV002", "other", Some(1.0)))
        .unwrap();

    let listed = repo.list_tasks_for_student("SV001").unwrap();
    let listed_titles = listed
        .iter()
        .map(|task| task.title.as_str())
        .collect::<Vec<_>>();
    assert_eq!(listed_titles, ["early", "late", "late twin"]);
    assert!(repo.list_tasks_for_student("SV404").unwrap().is_empty());
}

#[test]
fn delete_removes_row_and_reports_missing() {
    let conn = seeded_conn();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = deadline("SV001", "Quiz", Some(20.0));
    repo.create_task(&task).unwrap();
    repo.delete_task(task.id).unwrap();
    assert!(repo.get_task(task.id).unwrap().is_none());

    let err = repo.delete_task(task.id).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == task.id));
}

#[test]
fn validation_failure_blocks_create() {
    let conn = seeded_conn();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = deadline("SV001", "", Some(1.0));
    assert!(matches!(
        repo.create_task(&task).unwrap_err(),
        RepoError::Validation(_)
    ));
}

#[test]
fn read_rejects_corrupted_timestamp() {
    let conn = seeded_conn();
    let repo = SqliteTaskRepository::try_new(&conn).unwrap();

    let task = deadline("SV001", "Corrupt", Some(1.0));
    repo.create_task(&task).unwrap();
    conn.execute(
        "UPDATE tasks SET due_time = 'tomorrow' WHERE task_id = ?1;",
        [task.id.to_string()],
    )
    .unwrap();

    let err = repo.get_task(task.id).unwrap_err();
    match err {
        RepoError::InvalidData(message) => assert!(message.contains("tasks.due_time")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn subjects_keep_explicit_difficulty_over_autocreate() {
    let conn = seeded_conn();
    let directory = SqliteDirectoryRepository::try_new(&conn).unwrap();

    directory
        .upsert_subject(&Subject {
            id: "MH02".to_string(),
            name: "Discrete Maths".to_string(),
            difficulty: 4.5,
        })
        .unwrap();
    let ensured = directory.ensure_subject("MH02").unwrap();
    assert!(!ensured.created);
    assert_eq!(ensured.record.difficulty, 4.5);

    let fresh = directory.ensure_subject("MH03").unwrap();
    assert!(fresh.created);
    assert_eq!(fresh.record.difficulty, 3.0);
    assert_eq!(fresh.record.name, "Subject MH03");

    let ids = directory
        .list_subjects()
        .unwrap()
        .into_iter()
        .map(|subject| subject.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["MH01", "MH02", "MH03"]);
}
