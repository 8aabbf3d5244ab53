//! Connection bootstrap for the inventory database.
//!
//! # Responsibility
//! - Open file-backed or in-memory SQLite connections.
//! - Turn on the pragmas inventory writes depend on, then migrate.
//!
//! # Invariants
//! - Returned connections enforce foreign keys, so slot rows cannot outlive
//!   or precede their rack.
//! - Returned connections are at `migrations::latest_version()`.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

enum Target<'a> {
    File(&'a Path),
    Memory,
}

impl Target<'_> {
    fn label(&self) -> String {
        match self {
            Self::File(path) => format!("file path={}", path.display()),
            Self::Memory => "memory".to_string(),
        }
    }

    fn connect(&self) -> rusqlite::Result<Connection> {
        match self {
            Self::File(path) => Connection::open(path),
            Self::Memory => Connection::open_in_memory(),
        }
    }
}

/// Opens (creating if needed) the database file at `path`.
///
/// Emits one `db_open` event with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open(Target::File(path.as_ref()))
}

/// Opens a private in-memory database, mainly for tests.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open(Target::Memory)
}

fn open(target: Target<'_>) -> DbResult<Connection> {
    let started_at = Instant::now();
    let result = target
        .connect()
        .map_err(DbError::from)
        .and_then(|mut conn| configure(&mut conn).map(|()| conn));

    let duration_ms = started_at.elapsed().as_millis();
    match &result {
        Ok(_) => info!(
            "event=db_open module=db status=ok mode={} duration_ms={duration_ms}",
            target.label()
        ),
        Err(err) => error!(
            "event=db_open module=db status=error mode={} duration_ms={duration_ms} error={err}",
            target.label()
        ),
    }
    result
}

fn configure(conn: &mut Connection) -> DbResult<()> {
    conn.pragma_update(None, "foreign_keys", true)?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}
