//! Repository layer abstractions and SQLite persistence implementations.
//!
//! # Responsibility
//! - Define data access contracts for racks and slot occupancy.
//! - Isolate SQL details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`RackNotFound`, `SlotNotFound`)
//!   in addition to DB transport errors.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::{ConstraintKind, DbError};
use crate::model::rack::RackId;
use crate::model::slot::SlotId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod rack_repo;
pub mod slot_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for rack and slot persistence.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Target rack row does not exist.
    RackNotFound(RackId),
    /// No occupancy row exists for the key.
    SlotNotFound { rack_id: RackId, slot_id: SlotId },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Connection was opened without `PRAGMA foreign_keys = ON`.
    ForeignKeysDisabled,
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
}

impl RepoError {
    /// Constraint category when this error is a storage constraint violation.
    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::Db(err) => err.constraint_kind(),
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::RackNotFound(id) => write!(f, "rack not found: {id}"),
            Self::SlotNotFound { rack_id, slot_id } => {
                write!(f, "slot not found: rack {rack_id} slot {slot_id}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "rack repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "rack repository requires table `{table}`")
            }
            Self::ForeignKeysDisabled => {
                write!(f, "rack repository requires foreign key enforcement")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted rack data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Verifies that `conn` is migrated and enforces foreign keys.
pub fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in ["racks", "slot_occupancy"] {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    let foreign_keys: i64 = conn.query_row("PRAGMA foreign_keys;", [], |row| row.get(0))?;
    if foreign_keys != 1 {
        return Err(RepoError::ForeignKeysDisabled);
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
