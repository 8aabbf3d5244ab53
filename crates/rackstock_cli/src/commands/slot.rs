//! Raw slot occupancy commands
//!
//! Usage: rackstock slot <get|upsert|clear> <RACK_ID> <SLOT> [PAYLOAD]
//!
//! `upsert` stores the payload as given and replaces the whole row; keys left
//! out are written as null.

use super::{emit, parse_payload, CommandResult};
use clap::{Args, Subcommand};
use rackstock_core::{InventoryService, RackId, SlotOccupancy};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Args)]
pub struct SlotArgs {
    #[command(subcommand)]
    pub command: SlotCommand,
}

#[derive(Debug, Subcommand)]
pub enum SlotCommand {
    /// Show the occupancy of one slot (empty when no row exists)
    Get(SlotTarget),
    /// Insert or replace the occupancy row of a slot
    Upsert(UpsertArgs),
    /// Null every payload field of an existing slot row
    Clear(SlotTarget),
}

#[derive(Debug, Args)]
pub struct SlotTarget {
    pub rack_id: RackId,
    /// Slot identifier such as `A-1`
    pub slot: String,
}

#[derive(Debug, Args)]
pub struct UpsertArgs {
    #[command(flatten)]
    pub target: SlotTarget,
    /// JSON object with part_name, part_model_number, quantity, color_code
    pub payload: String,
}

#[derive(Debug, Serialize)]
struct SlotReport<'a> {
    rack_id: RackId,
    slot_identifier: &'a str,
    #[serde(flatten)]
    occupancy: SlotOccupancy,
}

/// Execute slot command
pub fn execute(args: SlotArgs, conn: &Connection) -> CommandResult<()> {
    let inventory = InventoryService::try_new(conn)?;
    match args.command {
        SlotCommand::Get(target) => {
            let occupancy = inventory.get_slot(target.rack_id, &target.slot)?;
            emit(&SlotReport {
                rack_id: target.rack_id,
                slot_identifier: target.slot.trim(),
                occupancy,
            })
        }
        SlotCommand::Upsert(upsert) => {
            let occupancy: SlotOccupancy = parse_payload(&upsert.payload)?;
            let record =
                inventory.upsert_slot(upsert.target.rack_id, &upsert.target.slot, occupancy)?;
            emit(&record)
        }
        SlotCommand::Clear(target) => {
            inventory.clear_slot(target.rack_id, &target.slot)?;
            emit(&SlotReport {
                rack_id: target.rack_id,
                slot_identifier: target.slot.trim(),
                occupancy: SlotOccupancy::empty(),
            })
        }
    }
}
