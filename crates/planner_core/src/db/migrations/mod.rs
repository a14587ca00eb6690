//! Planner schema steps.
//!
//! The schema version lives in `PRAGMA user_version`. Opening a database runs
//! every step above that version inside one transaction, so a file is either
//! fully upgraded or left exactly as it was.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;

/// Schema version written by this build.
pub const SCHEMA_VERSION: u32 = 1;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "planner_schema",
    sql: include_str!("0001_planner_schema.sql"),
}];

/// Versions before and after an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaUpgrade {
    pub from: u32,
    pub to: u32,
}

impl SchemaUpgrade {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// Reads the schema version stamped on `conn`; `0` for a fresh file.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Brings `conn` up to [`SCHEMA_VERSION`].
///
/// # Errors
/// - [`DbError::SchemaTooNew`] for files written by a newer build.
/// - [`DbError::Migration`] naming the step that failed.
pub(crate) fn upgrade(conn: &mut Connection) -> DbResult<SchemaUpgrade> {
    run_steps(conn, STEPS, SCHEMA_VERSION)
}

fn run_steps(conn: &mut Connection, steps: &[SchemaStep], target: u32) -> DbResult<SchemaUpgrade> {
    let found = schema_version(conn)?;
    if found > target {
        return Err(DbError::SchemaTooNew {
            found,
            supported: target,
        });
    }

    let upgrade = SchemaUpgrade { from: found, to: target };
    if upgrade.is_noop() {
        return Ok(upgrade);
    }

    let tx = conn.transaction()?;
    for step in steps.iter().skip_while(|step| step.version <= found) {
        tx.execute_batch(step.sql)
            .and_then(|()| tx.pragma_update(None, "user_version", step.version))
            .map_err(|source| {
                error!(
                    "event=db_migrate module=db status=error step={} version={} error={}",
                    step.name, step.version, source
                );
                DbError::Migration {
                    version: step.version,
                    name: step.name,
                    source,
                }
            })?;
        info!(
            "event=db_migrate module=db status=ok step={} version={}",
            step.name, step.version
        );
    }
    tx.commit()?;
    Ok(upgrade)
}

#[cfg(test)]
mod tests {
    use super::{run_steps, schema_version, SchemaStep, SCHEMA_VERSION, STEPS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn steps_are_increasing_and_end_at_schema_version() {
        assert!(STEPS.windows(2).all(|pair| pair[0].version < pair[1].version));
        assert_eq!(STEPS.last().map(|step| step.version), Some(SCHEMA_VERSION));
    }

    #[test]
    fn failing_step_rolls_back_earlier_steps() {
        let steps = [
            SchemaStep {
                version: 1,
                name: "create_marker",
                sql: "CREATE TABLE marker (id INTEGER);",
            },
            SchemaStep {
                version: 2,
                name: "broken",
                sql: "CREATE TABLE marker (id INTEGER);",
            },
        ];
        let mut conn = Connection::open_in_memory().unwrap();

        let err = run_steps(&mut conn, &steps, 2).unwrap_err();
        assert!(matches!(
            err,
            DbError::Migration {
                version: 2,
                name: "broken",
                ..
            }
        ));
        assert_eq!(schema_version(&conn).unwrap(), 0);
        let marker_tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'marker';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(marker_tables, 0);
    }

    #[test]
    fn only_steps_above_current_version_run() {
        let steps = [
            SchemaStep {
                version: 1,
                name: "already_applied",
                sql: "CREATE TABLE first (id INTEGER);",
            },
            SchemaStep {
                version: 2,
                name: "pending",
                sql: "CREATE TABLE second (id INTEGER);",
            },
        ];
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE first (id INTEGER); PRAGMA user_version = 1;")
            .unwrap();

        let upgrade = run_steps(&mut conn, &steps, 2).unwrap();
        assert_eq!((upgrade.from, upgrade.to), (1, 2));
        assert_eq!(schema_version(&conn).unwrap(), 2);
    }
}
