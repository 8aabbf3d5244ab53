//! Embedded schema migrations for the inventory database.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps compiled into the binary.
//! - Bring a connection up to the newest schema, one step per transaction.
//!
//! # Invariants
//! - Step versions start at 1 and grow by exactly one.
//! - `PRAGMA user_version` always names the last fully applied step.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "racks_and_slot_occupancy",
    sql: include_str!("0001_init.sql"),
}];

/// Newest schema version this build knows how to create.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies every step newer than the connection's recorded version.
///
/// Fails with `UnsupportedSchemaVersion` when the file was written by a
/// newer build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let recorded = current_user_version(conn)?;
    let latest = latest_version();
    if recorded > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: recorded,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS.iter().filter(|step| step.version > recorded) {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            migration.version, migration.name
        );
    }
    Ok(())
}

/// Schema version recorded in `PRAGMA user_version`.
pub fn current_user_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
