use planner_core::db::{open_db, open_db_in_memory, schema_version, DbError, SCHEMA_VERSION};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_current_schema() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), SCHEMA_VERSION);
    for table in ["students", "subjects", "tasks"] {
        assert_table_exists(&conn, table);
    }
    assert_column_exists(&conn, "tasks", "seq");
}

#[test]
fn foreign_keys_are_enforced() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO tasks (task_id, seq, student_id, subject_id, title, event_type, start_time, due_time, importance)
         VALUES ('t1', 1, 'nobody', 'nothing', 'x', 'DEADLINE', '2026-03-01 00:00:00', '2026-03-02 00:00:00', 3);",
        [],
    );
    let err = result.unwrap_err();
    assert!(
        err.to_string().contains("FOREIGN KEY"),
        "unexpected error: {err}"
    );
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("planner.sqlite3");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first).unwrap(), SCHEMA_VERSION);
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), SCHEMA_VERSION);
    assert_table_exists(&conn_second, "tasks");
}

#[test]
fn tasks_index_covers_due_time_listing() {
    let conn = open_db_in_memory().unwrap();
    let columns = conn
        .prepare("SELECT name FROM pragma_index_info('idx_tasks_student_due') ORDER BY seqno;")
        .unwrap()
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(columns, vec!["student_id", "due_time", "seq"]);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}

fn assert_column_exists(conn: &Connection, table_name: &str, column: &str) {
    let count: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM pragma_table_info('{table_name}') WHERE name = ?1;"),
            [column],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1, "column {table_name}.{column} does not exist");
}
