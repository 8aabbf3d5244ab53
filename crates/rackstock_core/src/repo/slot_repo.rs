//! Slot occupancy repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist the mapping `(rack, slot identifier) -> occupancy payload`.
//! - Provide upsert, insert, update, clear and point lookup primitives that
//!   the inventory engine composes inside one unit of work.
//!
//! # Invariants
//! - `(rack_id, slot_identifier)` is unique; slot rows reference a rack.
//! - Clearing nulls every payload field but keeps the row.
//! - Identifiers are stored in canonical `SlotId` form.

use crate::model::rack::RackId;
use crate::model::slot::{SlotId, SlotOccupancy, SlotRecord};
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const SLOT_SELECT_SQL: &str = "SELECT
    rack_id,
    slot_identifier,
    part_name,
    part_model_number,
    quantity,
    color_code
FROM slot_occupancy";

/// Repository interface for slot occupancy rows.
pub trait SlotRepository {
    /// Loads one occupancy row, `None` when no row exists.
    fn get_slot(&self, rack_id: RackId, slot_id: SlotId) -> RepoResult<Option<SlotRecord>>;
    /// Lists every persisted row of one rack.
    fn list_rack_slots(&self, rack_id: RackId) -> RepoResult<Vec<SlotRecord>>;
    /// Inserts or fully replaces the row for the key.
    fn upsert_slot(
        &self,
        rack_id: RackId,
        slot_id: SlotId,
        occupancy: &SlotOccupancy,
    ) -> RepoResult<SlotRecord>;
    /// Inserts a new row; fails on an existing key.
    fn insert_slot(
        &self,
        rack_id: RackId,
        slot_id: SlotId,
        occupancy: &SlotOccupancy,
    ) -> RepoResult<SlotRecord>;
    /// Overwrites the payload of an existing row.
    fn update_slot(
        &self,
        rack_id: RackId,
        slot_id: SlotId,
        occupancy: &SlotOccupancy,
    ) -> RepoResult<SlotRecord>;
    /// Sets only the quantity of an existing row.
    fn set_quantity(&self, rack_id: RackId, slot_id: SlotId, quantity: i64) -> RepoResult<()>;
    /// Nulls every payload field of an existing row.
    fn clear_slot(&self, rack_id: RackId, slot_id: SlotId) -> RepoResult<()>;
    /// Deletes every row of one rack and returns the deleted row count.
    fn delete_rack_slots(&self, rack_id: RackId) -> RepoResult<usize>;
}

/// SQLite-backed slot occupancy repository.
pub struct SqliteSlotRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSlotRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl SlotRepository for SqliteSlotRepository<'_> {
    fn get_slot(&self, rack_id: RackId, slot_id: SlotId) -> RepoResult<Option<SlotRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SLOT_SELECT_SQL}
             WHERE rack_id = ?1
               AND slot_identifier = ?2;"
        ))?;
        let mut rows = stmt.query(params![rack_id, slot_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_slot_row(row)?));
        }
        Ok(None)
    }

    fn list_rack_slots(&self, rack_id: RackId) -> RepoResult<Vec<SlotRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "{SLOT_SELECT_SQL}
             WHERE rack_id = ?1
             ORDER BY slot_identifier ASC;"
        ))?;
        let mut rows = stmt.query([rack_id])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_slot_row(row)?);
        }
        Ok(records)
    }

    fn upsert_slot(
        &self,
        rack_id: RackId,
        slot_id: SlotId,
        occupancy: &SlotOccupancy,
    ) -> RepoResult<SlotRecord> {
        self.conn.execute(
            "INSERT INTO slot_occupancy (
                rack_id,
                slot_identifier,
                part_name,
                part_model_number,
                quantity,
                color_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT (rack_id, slot_identifier) DO UPDATE SET
                part_name = excluded.part_name,
                part_model_number = excluded.part_model_number,
                quantity = excluded.quantity,
                color_code = excluded.color_code;",
            params![
                rack_id,
                slot_id.to_string(),
                occupancy.part_name.as_deref(),
                occupancy.part_model_number.as_deref(),
                occupancy.quantity,
                occupancy.color_code.as_deref(),
            ],
        )?;
        Ok(record(rack_id, slot_id, occupancy))
    }

    fn insert_slot(
        &self,
        rack_id: RackId,
        slot_id: SlotId,
        occupancy: &SlotOccupancy,
    ) -> RepoResult<SlotRecord> {
        self.conn.execute(
            "INSERT INTO slot_occupancy (
                rack_id,
                slot_identifier,
                part_name,
                part_model_number,
                quantity,
                color_code
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                rack_id,
                slot_id.to_string(),
                occupancy.part_name.as_deref(),
                occupancy.part_model_number.as_deref(),
                occupancy.quantity,
                occupancy.color_code.as_deref(),
            ],
        )?;
        Ok(record(rack_id, slot_id, occupancy))
    }

    fn update_slot(
        &self,
        rack_id: RackId,
        slot_id: SlotId,
        occupancy: &SlotOccupancy,
    ) -> RepoResult<SlotRecord> {
        let changed = self.conn.execute(
            "UPDATE slot_occupancy
             SET
                part_name = ?3,
                part_model_number = ?4,
                quantity = ?5,
                color_code = ?6
             WHERE rack_id = ?1
               AND slot_identifier = ?2;",
            params![
                rack_id,
                slot_id.to_string(),
                occupancy.part_name.as_deref(),
                occupancy.part_model_number.as_deref(),
                occupancy.quantity,
                occupancy.color_code.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::SlotNotFound { rack_id, slot_id });
        }
        Ok(record(rack_id, slot_id, occupancy))
    }

    fn set_quantity(&self, rack_id: RackId, slot_id: SlotId, quantity: i64) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE slot_occupancy
             SET quantity = ?3
             WHERE rack_id = ?1
               AND slot_identifier = ?2;",
            params![rack_id, slot_id.to_string(), quantity],
        )?;
        if changed == 0 {
            return Err(RepoError::SlotNotFound { rack_id, slot_id });
        }
        Ok(())
    }

    fn clear_slot(&self, rack_id: RackId, slot_id: SlotId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE slot_occupancy
             SET
                part_name = NULL,
                part_model_number = NULL,
                quantity = NULL,
                color_code = NULL
             WHERE rack_id = ?1
               AND slot_identifier = ?2;",
            params![rack_id, slot_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::SlotNotFound { rack_id, slot_id });
        }
        Ok(())
    }

    fn delete_rack_slots(&self, rack_id: RackId) -> RepoResult<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM slot_occupancy WHERE rack_id = ?1;", [rack_id])?;
        Ok(deleted)
    }
}

fn record(rack_id: RackId, slot_id: SlotId, occupancy: &SlotOccupancy) -> SlotRecord {
    SlotRecord {
        rack_id,
        slot_id,
        occupancy: occupancy.clone(),
    }
}

fn parse_slot_row(row: &Row<'_>) -> RepoResult<SlotRecord> {
    let slot_text: String = row.get("slot_identifier")?;
    let slot_id = SlotId::parse(&slot_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid slot identifier `{slot_text}` in slot_occupancy.slot_identifier"
        ))
    })?;

    let quantity: Option<i64> = row.get("quantity")?;
    if let Some(value) = quantity.filter(|value| *value < 0) {
        return Err(RepoError::InvalidData(format!(
            "negative quantity `{value}` in slot_occupancy.quantity for slot {slot_id}"
        )));
    }

    Ok(SlotRecord {
        rack_id: row.get("rack_id")?,
        slot_id,
        occupancy: SlotOccupancy {
            part_name: row.get("part_name")?,
            part_model_number: row.get("part_model_number")?,
            quantity,
            color_code: row.get("color_code")?,
        },
    })
}

