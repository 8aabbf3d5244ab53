//! Rack repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/delete over the `racks` table.
//!
//! # Invariants
//! - Listing is ordered by `rack_id ASC`.
//! - Deleting a rack row does not touch `slot_occupancy`; callers remove
//!   dependent rows first inside the same unit of work.

use crate::model::rack::{NewRack, Rack, RackId};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const RACK_SELECT_SQL: &str = "SELECT
    rack_id,
    rack_name,
    rows,
    cols
FROM racks";

/// Repository interface for rack definitions.
pub trait RackRepository {
    /// Inserts a rack and returns it with its generated identity.
    fn create_rack(&self, rack: &NewRack) -> RepoResult<Rack>;
    /// Loads one rack by id.
    fn get_rack(&self, id: RackId) -> RepoResult<Option<Rack>>;
    /// Lists every rack ordered by id.
    fn list_racks(&self) -> RepoResult<Vec<Rack>>;
    /// Deletes one rack row.
    fn delete_rack(&self, id: RackId) -> RepoResult<()>;
}

/// SQLite-backed rack repository.
pub struct SqliteRackRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRackRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RackRepository for SqliteRackRepository<'_> {
    fn create_rack(&self, rack: &NewRack) -> RepoResult<Rack> {
        self.conn.execute(
            "INSERT INTO racks (rack_name, rows, cols) VALUES (?1, ?2, ?3);",
            params![rack.name(), rack.rows(), rack.cols()],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_rack(id)?.ok_or(RepoError::RackNotFound(id))
    }

    fn get_rack(&self, id: RackId) -> RepoResult<Option<Rack>> {
        let rack = self
            .conn
            .query_row(
                &format!("{RACK_SELECT_SQL} WHERE rack_id = ?1;"),
                [id],
                parse_rack_row,
            )
            .optional()?;
        Ok(rack)
    }

    fn list_racks(&self) -> RepoResult<Vec<Rack>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RACK_SELECT_SQL} ORDER BY rack_id ASC;"))?;
        let racks = stmt
            .query_map([], parse_rack_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(racks)
    }

    fn delete_rack(&self, id: RackId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM racks WHERE rack_id = ?1;", [id])?;
        if changed == 0 {
            return Err(RepoError::RackNotFound(id));
        }
        Ok(())
    }
}

fn parse_rack_row(row: &Row<'_>) -> rusqlite::Result<Rack> {
    Ok(Rack {
        id: row.get("rack_id")?,
        name: row.get("rack_name")?,
        rows: row.get("rows")?,
        cols: row.get("cols")?,
    })
}
