//! Explicit per-operation unit of work.
//!
//! # Responsibility
//! - Wrap exactly one SQLite transaction for one engine operation.
//! - Guarantee release (commit or rollback) on every exit path.
//!
//! # Invariants
//! - Transactions are `IMMEDIATE`: the write lock is taken before the first
//!   read so read-then-write sequences see a stable snapshot.
//! - A unit of work is never shared between operations.
//! - Dropping an unfinished unit of work rolls back.

use super::{DbError, DbResult};
use log::{debug, error, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::ops::Deref;
use std::time::Instant;

/// One open transaction scoped to a named operation.
pub struct UnitOfWork<'conn> {
    tx: Transaction<'conn>,
    op: &'static str,
    started_at: Instant,
}

impl<'conn> UnitOfWork<'conn> {
    /// Begins a new unit of work on `conn`.
    ///
    /// Fails when a transaction is already active on the connection.
    pub fn begin(conn: &'conn Connection, op: &'static str) -> DbResult<Self> {
        let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
        debug!("event=uow_begin module=db status=ok op={op}");
        Ok(Self {
            tx,
            op,
            started_at: Instant::now(),
        })
    }

    /// Commits all writes made through this unit of work.
    pub fn commit(self) -> DbResult<()> {
        let op = self.op;
        let started_at = self.started_at;
        match self.tx.commit() {
            Ok(()) => {
                debug!(
                    "event=uow_commit module=db status=ok op={op} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=uow_commit module=db status=error op={op} duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(DbError::Sqlite(err))
            }
        }
    }

    /// Rolls back all writes. Best-effort: a failed rollback is logged and
    /// otherwise ignored so it never masks the error that triggered it.
    pub fn rollback(self) {
        let op = self.op;
        let started_at = self.started_at;
        match self.tx.rollback() {
            Ok(()) => debug!(
                "event=uow_rollback module=db status=ok op={op} duration_ms={}",
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=uow_rollback module=db status=error op={op} duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
    }
}

impl Deref for UnitOfWork<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.tx
    }
}

/// Runs `f` inside a fresh unit of work.
///
/// Commits when `f` returns `Ok`; rolls back before surfacing the error when
/// `f` returns `Err`. A commit failure is converted into `E`.
pub fn with_unit_of_work<T, E, F>(conn: &Connection, op: &'static str, f: F) -> Result<T, E>
where
    E: From<DbError>,
    F: FnOnce(&UnitOfWork<'_>) -> Result<T, E>,
{
    let uow = UnitOfWork::begin(conn, op)?;
    match f(&uow) {
        Ok(value) => {
            uow.commit()?;
            Ok(value)
        }
        Err(err) => {
            uow.rollback();
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{with_unit_of_work, UnitOfWork};
    use crate::db::DbError;
    use rusqlite::Connection;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v INTEGER NOT NULL);")
            .unwrap();
        conn
    }

    fn count(conn: &Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM t;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn ok_result_commits() {
        let conn = setup();
        let value: Result<i64, DbError> = with_unit_of_work(&conn, "test", |uow| {
            uow.execute("INSERT INTO t (v) VALUES (1);", [])?;
            Ok(7)
        });
        assert_eq!(value.unwrap(), 7);
        assert_eq!(count(&conn), 1);
    }

    #[test]
    fn err_result_rolls_back_earlier_writes() {
        let conn = setup();
        let result: Result<(), DbError> = with_unit_of_work(&conn, "test", |uow| {
            uow.execute("INSERT INTO t (v) VALUES (1);", [])?;
            uow.execute("INSERT INTO t (v) VALUES (NULL);", [])?;
            Ok(())
        });
        assert!(result.is_err());
        assert_eq!(count(&conn), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn dropped_unit_of_work_rolls_back() {
        let conn = setup();
        {
            let uow = UnitOfWork::begin(&conn, "dropped").unwrap();
            uow.execute("INSERT INTO t (v) VALUES (1);", []).unwrap();
        }
        assert_eq!(count(&conn), 0);
        assert!(conn.is_autocommit());
    }

    #[test]
    fn nested_begin_is_rejected() {
        let conn = setup();
        let _outer = UnitOfWork::begin(&conn, "outer").unwrap();
        assert!(UnitOfWork::begin(&conn, "inner").is_err());
    }
}
