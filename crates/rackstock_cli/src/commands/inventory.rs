//! Inventory mutation commands
//!
//! Usage:
//!   rackstock place <RACK_ID> <SLOT> <PAYLOAD>
//!   rackstock update <RACK_ID> <SLOT> <PAYLOAD>
//!   rackstock consume <RACK_ID> <SLOT> <AMOUNT>
//!   rackstock move <FROM_RACK_ID> <FROM_SLOT> <TO_RACK_ID> <TO_SLOT>

use super::{emit, parse_payload, CommandResult};
use clap::Args;
use rackstock_core::{InventoryService, MoveRequest, PlacementInput, RackId};
use rusqlite::Connection;

#[derive(Debug, Args)]
pub struct PayloadArgs {
    pub rack_id: RackId,
    /// Slot identifier such as `A-1`
    pub slot: String,
    /// JSON object; absent keys and explicit nulls are kept apart
    pub payload: String,
}

#[derive(Debug, Args)]
pub struct ConsumeArgs {
    pub rack_id: RackId,
    pub slot: String,
    #[arg(allow_negative_numbers = true)]
    pub amount: i64,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub from_rack_id: RackId,
    pub from_slot: String,
    pub to_rack_id: RackId,
    pub to_slot: String,
}

pub fn execute_place(args: PayloadArgs, conn: &Connection) -> CommandResult<()> {
    let input: PlacementInput = parse_payload(&args.payload)?;
    let inventory = InventoryService::try_new(conn)?;
    emit(&inventory.place(args.rack_id, &args.slot, input)?)
}

pub fn execute_update(args: PayloadArgs, conn: &Connection) -> CommandResult<()> {
    let input: PlacementInput = parse_payload(&args.payload)?;
    let inventory = InventoryService::try_new(conn)?;
    emit(&inventory.update(args.rack_id, &args.slot, input)?)
}

pub fn execute_consume(args: ConsumeArgs, conn: &Connection) -> CommandResult<()> {
    let inventory = InventoryService::try_new(conn)?;
    emit(&inventory.consume(args.rack_id, &args.slot, args.amount)?)
}

pub fn execute_move(args: MoveArgs, conn: &Connection) -> CommandResult<()> {
    let inventory = InventoryService::try_new(conn)?;
    let request = MoveRequest::new(
        args.from_rack_id,
        args.from_slot,
        args.to_rack_id,
        args.to_slot,
    );
    emit(&inventory.move_part(&request)?)
}
