//! Rack registry, grid projection and rack lifecycle.
//!
//! # Responsibility
//! - Create, load and list rack definitions.
//! - Serve the dense rack view (every coordinate, occupied or empty).
//! - Delete a rack together with all of its slot occupancy.
//!
//! # Invariants
//! - Rack deletion removes dependent occupancy rows before the rack row,
//!   inside one unit of work.

use crate::db::{with_unit_of_work, ConstraintKind};
use crate::error::{InventoryError, InventoryResult};
use crate::model::grid::RackView;
use crate::model::rack::{checked_extents, NewRack, Rack, RackId};
use crate::repo::{ensure_connection_ready, RepoError};
use crate::repo::rack_repo::{RackRepository, SqliteRackRepository};
use crate::repo::slot_repo::{SlotRepository, SqliteSlotRepository};
use crate::service::observed;
use rusqlite::Connection;
use serde::Serialize;

/// Result of a rack deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RackDeletion {
    #[serde(flatten)]
    pub rack: Rack,
    /// Number of occupancy rows removed with the rack.
    pub removed_slot_rows: usize,
}

/// Rack-level use-case service.
pub struct RackService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> RackService<'conn> {
    /// Creates a service from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> InventoryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Creates a rack after validating name and dimensions.
    ///
    /// A taken name is reported as `DuplicateRackName`.
    pub fn create_rack(&self, name: &str, rows: i64, cols: i64) -> InventoryResult<Rack> {
        observed(
            "rack_create",
            "rack",
            format!("rows={rows} cols={cols}"),
            || {
                let new_rack = NewRack::new(name, rows, cols)?;
                SqliteRackRepository::new(self.conn)
                    .create_rack(&new_rack)
                    .map_err(|err| match err.constraint_kind() {
                        Some(ConstraintKind::Unique) => {
                            InventoryError::DuplicateRackName(new_rack.name().to_string())
                        }
                        _ => err.into(),
                    })
            },
        )
    }

    pub fn get_rack(&self, rack_id: RackId) -> InventoryResult<Rack> {
        SqliteRackRepository::new(self.conn)
            .get_rack(rack_id)?
            .ok_or(InventoryError::RackNotFound(rack_id))
    }

    /// Lists racks ordered by id ascending.
    pub fn list_racks(&self) -> InventoryResult<Vec<Rack>> {
        Ok(SqliteRackRepository::new(self.conn).list_racks()?)
    }

    /// Returns the rack with every slot coordinate resolved to its occupancy
    /// or empty.
    pub fn rack_view(&self, rack_id: RackId) -> InventoryResult<RackView> {
        let rack = self.get_rack(rack_id)?;
        checked_extents(i64::from(rack.rows), i64::from(rack.cols))
            .map_err(|err| RepoError::InvalidData(format!("rack {rack_id}: {err}")))?;
        let records = SqliteSlotRepository::new(self.conn).list_rack_slots(rack_id)?;
        Ok(RackView::project(rack, records))
    }

    /// Deletes a rack and all its slot occupancy as one unit of work.
    pub fn delete_rack(&self, rack_id: RackId) -> InventoryResult<RackDeletion> {
        observed("rack_delete", "rack", format!("rack_id={rack_id}"), || {
            with_unit_of_work(self.conn, "rack_delete", |uow| -> InventoryResult<RackDeletion> {
                let racks = SqliteRackRepository::new(uow);
                let slots = SqliteSlotRepository::new(uow);

                let rack = racks
                    .get_rack(rack_id)?
                    .ok_or(InventoryError::RackNotFound(rack_id))?;
                let removed_slot_rows = slots.delete_rack_slots(rack_id)?;
                racks.delete_rack(rack_id)?;

                Ok(RackDeletion {
                    rack,
                    removed_slot_rows,
                })
            })
        })
    }
}
