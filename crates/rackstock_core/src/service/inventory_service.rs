//! Inventory mutation engine and slot occupancy store operations.
//!
//! # Responsibility
//! - Place, update, consume and move parts between slots.
//! - Expose the raw occupancy store primitives (upsert, clear, lookup).
//!
//! # Invariants
//! - Every mutation runs in exactly one unit of work; any failure rolls the
//!   whole operation back before the error is returned.
//! - No write leaves a quantity <= 0; depletion clears the slot instead.
//! - `move_part` never clears the source unless the destination write
//!   succeeded.
//! - Writes only target slots inside the rack's extents.

use crate::db::{with_unit_of_work, ConstraintKind, UnitOfWork};
use crate::error::{InventoryError, InventoryResult};
use crate::model::input::{MovePlan, MoveRequest, PlacementInput};
use crate::model::rack::RackId;
use crate::model::slot::{SlotId, SlotOccupancy, SlotRecord};
use crate::model::validation::ValidationError;
use crate::repo::ensure_connection_ready;
use crate::repo::rack_repo::{RackRepository, SqliteRackRepository};
use crate::repo::slot_repo::{SlotRepository, SqliteSlotRepository};
use crate::repo::RepoError;
use crate::service::observed;
use rusqlite::Connection;
use serde::Serialize;

/// Result of consuming stock from one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsumeOutcome {
    pub rack_id: RackId,
    #[serde(rename = "slot_identifier")]
    pub slot_id: SlotId,
    pub consumed: i64,
    pub remaining_quantity: i64,
    /// True when the slot was depleted and cleared.
    pub cleared: bool,
}

/// Result of a part transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveOutcome {
    /// Source slot after the move (always empty).
    pub from: SlotRecord,
    /// Destination slot holding the moved part.
    pub to: SlotRecord,
}

/// Slot-level use-case service.
pub struct InventoryService<'conn> {
    conn: &'conn Connection,
}

impl<'conn> InventoryService<'conn> {
    /// Creates a service from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> InventoryResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Returns the slot payload; a missing row reads as empty.
    pub fn get_slot(&self, rack_id: RackId, slot_identifier: &str) -> InventoryResult<SlotOccupancy> {
        let slot_id = SlotId::parse(slot_identifier)?;
        let record = SqliteSlotRepository::new(self.conn).get_slot(rack_id, slot_id)?;
        Ok(record.map(|record| record.occupancy).unwrap_or_default())
    }

    /// Inserts or fully replaces the occupancy row for the key.
    ///
    /// Fields are stored as given (no presence rules); a written quantity
    /// must still be positive.
    pub fn upsert_slot(
        &self,
        rack_id: RackId,
        slot_identifier: &str,
        occupancy: SlotOccupancy,
    ) -> InventoryResult<SlotRecord> {
        observed(
            "slot_upsert",
            "inventory",
            format!("rack_id={rack_id} slot={slot_identifier}"),
            || {
                let slot_id = SlotId::parse(slot_identifier)?;
                if let Some(quantity) = occupancy.quantity.filter(|quantity| *quantity <= 0) {
                    return Err(ValidationError::NonPositiveQuantity(quantity).into());
                }
                ensure_within_rack(self.conn, rack_id, slot_id)?;
                SqliteSlotRepository::new(self.conn)
                    .upsert_slot(rack_id, slot_id, &occupancy)
                    .map_err(|err| missing_parent_rack(err, rack_id))
            },
        )
    }

    /// Nulls every payload field of an existing row.
    ///
    /// Fails with `SlotNotFound` when no row exists for the key.
    pub fn clear_slot(&self, rack_id: RackId, slot_identifier: &str) -> InventoryResult<()> {
        observed(
            "slot_clear",
            "inventory",
            format!("rack_id={rack_id} slot={slot_identifier}"),
            || {
                let slot_id = SlotId::parse(slot_identifier)?;
                Ok(SqliteSlotRepository::new(self.conn).clear_slot(rack_id, slot_id)?)
            },
        )
    }

    /// Places (or replaces) a part in a slot.
    ///
    /// Every payload field must be provided; a missing rack surfaces as
    /// `MissingParentRack` from the storage foreign key.
    pub fn place(
        &self,
        rack_id: RackId,
        slot_identifier: &str,
        input: PlacementInput,
    ) -> InventoryResult<SlotRecord> {
        observed(
            "slot_place",
            "inventory",
            format!("rack_id={rack_id} slot={slot_identifier}"),
            || {
                let slot_id = SlotId::parse(slot_identifier)?;
                let occupancy = input.into_occupancy()?;
                with_unit_of_work(self.conn, "slot_place", |uow| -> InventoryResult<SlotRecord> {
                    ensure_within_rack(uow, rack_id, slot_id)?;
                    SqliteSlotRepository::new(uow)
                        .upsert_slot(rack_id, slot_id, &occupancy)
                        .map_err(|err| missing_parent_rack(err, rack_id))
                })
            },
        )
    }

    /// Patches the payload of an existing occupancy row.
    ///
    /// Never creates a row: a missing key fails with `SlotNotFound`.
    pub fn update(
        &self,
        rack_id: RackId,
        slot_identifier: &str,
        input: PlacementInput,
    ) -> InventoryResult<SlotRecord> {
        observed(
            "slot_update",
            "inventory",
            format!("rack_id={rack_id} slot={slot_identifier}"),
            || {
                let slot_id = SlotId::parse(slot_identifier)?;
                with_unit_of_work(self.conn, "slot_update", |uow| -> InventoryResult<SlotRecord> {
                    ensure_within_rack(uow, rack_id, slot_id)?;
                    let slots = SqliteSlotRepository::new(uow);
                    let current = slots
                        .get_slot(rack_id, slot_id)?
                        .ok_or(InventoryError::SlotNotFound { rack_id, slot_id })?;
                    let merged = input.apply_to(&current.occupancy)?;
                    Ok(slots.update_slot(rack_id, slot_id, &merged)?)
                })
            },
        )
    }

    /// Takes `amount` units out of a slot and returns the remaining stock.
    ///
    /// Depleting the slot clears it and reports a remainder of `0`.
    pub fn consume(
        &self,
        rack_id: RackId,
        slot_identifier: &str,
        amount: i64,
    ) -> InventoryResult<ConsumeOutcome> {
        observed(
            "slot_consume",
            "inventory",
            format!("rack_id={rack_id} slot={slot_identifier} amount={amount}"),
            || {
                let slot_id = SlotId::parse(slot_identifier)?;
                if amount <= 0 {
                    return Err(ValidationError::NonPositiveAmount(amount).into());
                }
                with_unit_of_work(self.conn, "slot_consume", |uow| {
                    consume_in(uow, rack_id, slot_id, amount)
                })
            },
        )
    }

    /// Moves the whole part payload from one slot to another.
    ///
    /// The destination row is updated when it exists and is empty, inserted
    /// when absent; the source is cleared afterwards. All steps share one
    /// unit of work.
    pub fn move_part(&self, request: &MoveRequest) -> InventoryResult<MoveOutcome> {
        observed(
            "slot_move",
            "inventory",
            format!(
                "from_rack_id={} from_slot={} to_rack_id={} to_slot={}",
                or_dash(request.from_rack_id),
                or_dash(request.from_slot_identifier.as_deref()),
                or_dash(request.to_rack_id),
                or_dash(request.to_slot_identifier.as_deref())
            ),
            || {
                let plan = request.validate()?;
                with_unit_of_work(self.conn, "slot_move", |uow| move_in(uow, plan))
            },
        )
    }
}

fn consume_in(
    uow: &UnitOfWork<'_>,
    rack_id: RackId,
    slot_id: SlotId,
    amount: i64,
) -> InventoryResult<ConsumeOutcome> {
    let slots = SqliteSlotRepository::new(uow);
    let record = slots
        .get_slot(rack_id, slot_id)?
        .ok_or(InventoryError::SlotNotFound { rack_id, slot_id })?;
    if !record.occupancy.has_part() {
        return Err(InventoryError::SlotEmpty { rack_id, slot_id });
    }

    let available = record.occupancy.quantity.unwrap_or(0);
    if amount > available {
        return Err(InventoryError::InsufficientStock {
            rack_id,
            slot_id,
            available,
            requested: amount,
        });
    }

    let remaining_quantity = available - amount;
    let cleared = remaining_quantity <= 0;
    if cleared {
        slots.clear_slot(rack_id, slot_id)?;
    } else {
        slots.set_quantity(rack_id, slot_id, remaining_quantity)?;
    }

    Ok(ConsumeOutcome {
        rack_id,
        slot_id,
        consumed: amount,
        remaining_quantity,
        cleared,
    })
}

fn move_in(uow: &UnitOfWork<'_>, plan: MovePlan) -> InventoryResult<MoveOutcome> {
    let slots = SqliteSlotRepository::new(uow);
    let MovePlan {
        from_rack_id,
        from_slot,
        to_rack_id,
        to_slot,
    } = plan;

    let source = slots
        .get_slot(from_rack_id, from_slot)?
        .ok_or(InventoryError::SlotNotFound {
            rack_id: from_rack_id,
            slot_id: from_slot,
        })?;
    if !source.occupancy.has_part() {
        return Err(InventoryError::SourceEmpty {
            rack_id: from_rack_id,
            slot_id: from_slot,
        });
    }

    ensure_within_rack(uow, to_rack_id, to_slot)?;
    let to = match slots.get_slot(to_rack_id, to_slot)? {
        Some(destination) if !destination.occupancy.is_empty() => {
            return Err(InventoryError::DestinationOccupied {
                rack_id: to_rack_id,
                slot_id: to_slot,
            });
        }
        Some(_) => slots.update_slot(to_rack_id, to_slot, &source.occupancy)?,
        None => slots
            .insert_slot(to_rack_id, to_slot, &source.occupancy)
            .map_err(|err| match err.constraint_kind() {
                Some(ConstraintKind::ForeignKey) => {
                    InventoryError::DestinationRackNotFound(to_rack_id)
                }
                Some(ConstraintKind::Unique) => InventoryError::SlotConflict {
                    rack_id: to_rack_id,
                    slot_id: to_slot,
                },
                None => err.into(),
            })?,
    };

    slots.clear_slot(from_rack_id, from_slot)?;

    Ok(MoveOutcome {
        from: SlotRecord {
            rack_id: from_rack_id,
            slot_id: from_slot,
            occupancy: SlotOccupancy::empty(),
        },
        to,
    })
}

/// Rejects slots outside an existing rack's extents.
///
/// A missing rack passes; the storage foreign key reports it on write.
fn ensure_within_rack(conn: &Connection, rack_id: RackId, slot_id: SlotId) -> InventoryResult<()> {
    match SqliteRackRepository::new(conn).get_rack(rack_id)? {
        Some(rack) if !rack.contains(slot_id) => Err(ValidationError::SlotOutOfRange {
            slot: slot_id.to_string(),
            rows: rack.rows,
            cols: rack.cols,
        }
        .into()),
        _ => Ok(()),
    }
}

fn missing_parent_rack(err: RepoError, rack_id: RackId) -> InventoryError {
    match err.constraint_kind() {
        Some(ConstraintKind::ForeignKey) => InventoryError::MissingParentRack(rack_id),
        _ => err.into(),
    }
}

fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |value| value.to_string())
}
