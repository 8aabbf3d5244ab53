//! Rack registry commands
//!
//! Usage: rackstock rack <create|get|list|view|delete>

use super::{emit, CommandResult};
use clap::{Args, Subcommand};
use rackstock_core::{RackId, RackService};
use rusqlite::Connection;

#[derive(Debug, Args)]
pub struct RackArgs {
    #[command(subcommand)]
    pub command: RackCommand,
}

#[derive(Debug, Subcommand)]
pub enum RackCommand {
    /// Register a new rack
    Create(CreateArgs),
    /// Show one rack
    Get(RackIdArg),
    /// List every rack
    List,
    /// Show the full slot grid of a rack
    View(RackIdArg),
    /// Delete a rack and all of its slot rows
    Delete(RackIdArg),
}

#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Unique rack name
    pub name: String,
    /// Number of rows (labelled A, B, ...)
    #[arg(allow_negative_numbers = true)]
    pub rows: i64,
    /// Number of columns (numbered from 1)
    #[arg(allow_negative_numbers = true)]
    pub cols: i64,
}

#[derive(Debug, Args)]
pub struct RackIdArg {
    pub rack_id: RackId,
}

/// Execute rack command
pub fn execute(args: RackArgs, conn: &Connection) -> CommandResult<()> {
    let racks = RackService::try_new(conn)?;
    match args.command {
        RackCommand::Create(create) => {
            emit(&racks.create_rack(&create.name, create.rows, create.cols)?)
        }
        RackCommand::Get(target) => emit(&racks.get_rack(target.rack_id)?),
        RackCommand::List => emit(&racks.list_racks()?),
        RackCommand::View(target) => emit(&racks.rack_view(target.rack_id)?),
        RackCommand::Delete(target) => emit(&racks.delete_rack(target.rack_id)?),
    }
}
