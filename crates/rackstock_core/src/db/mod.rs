//! SQLite storage bootstrap, schema migrations and units of work.
//!
//! # Responsibility
//! - Open and configure SQLite connections for rack inventory storage.
//! - Apply schema migrations in deterministic order.
//! - Scope multi-row mutations to one explicit unit of work.
//! - Classify SQLite constraint failures into stable categories.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write inventory data before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod unit_of_work;

pub use open::{open_db, open_db_in_memory};
pub use unit_of_work::{with_unit_of_work, UnitOfWork};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns the constraint category when this error is a classified
    /// SQLite constraint violation.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Sqlite(err) => constraint_kind(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Distinguishable constraint categories signalled by the storage engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// UNIQUE or PRIMARY KEY violation.
    Unique,
    /// FOREIGN KEY violation (referenced parent row missing).
    ForeignKey,
}

/// Classifies a SQLite error by extended result code.
///
/// Returns `None` for anything that is not a unique/foreign-key violation,
/// including CHECK and trigger aborts.
pub fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
    let rusqlite::Error::SqliteFailure(failure, _) = err else {
        return None;
    };
    if failure.code != rusqlite::ErrorCode::ConstraintViolation {
        return None;
    }
    match failure.extended_code {
        rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
            Some(ConstraintKind::Unique)
        }
        rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{constraint_kind, ConstraintKind};
    use rusqlite::Connection;

    fn conn_with_constraints() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             CREATE TABLE parent (id INTEGER PRIMARY KEY, name TEXT NOT NULL UNIQUE);
             CREATE TABLE child (
                parent_id INTEGER NOT NULL REFERENCES parent(id),
                qty INTEGER CHECK (qty >= 0)
             );
             INSERT INTO parent (id, name) VALUES (1, 'a');",
        )
        .unwrap();
        conn
    }

    #[test]
    fn classifies_unique_violation() {
        let conn = conn_with_constraints();
        let err = conn
            .execute("INSERT INTO parent (id, name) VALUES (2, 'a');", [])
            .unwrap_err();
        assert_eq!(constraint_kind(&err), Some(ConstraintKind::Unique));
    }

    #[test]
    fn classifies_foreign_key_violation() {
        let conn = conn_with_constraints();
        let err = conn
            .execute("INSERT INTO child (parent_id, qty) VALUES (9, 1);", [])
            .unwrap_err();
        assert_eq!(constraint_kind(&err), Some(ConstraintKind::ForeignKey));
    }

    #[test]
    fn check_violation_is_unclassified() {
        let conn = conn_with_constraints();
        let err = conn
            .execute("INSERT INTO child (parent_id, qty) VALUES (1, -1);", [])
            .unwrap_err();
        assert_eq!(constraint_kind(&err), None);
    }
}
