//! Rackstock CLI
//!
//! Command-line surface over the rack inventory engine. Every command prints
//! its result as JSON on stdout; failures print a JSON error object on stderr
//! and exit with status 1.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

use commands::{CommandError, CommandResult};

#[derive(Debug, Parser)]
#[command(name = "rackstock")]
#[command(about = "Rackstock - rack and slot inventory", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database file
    #[arg(long, env = "RACKSTOCK_DB", default_value = "rackstock.sqlite3")]
    db: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RACKSTOCK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Directory for rotated log files; logging is off when unset
    #[arg(long, env = "RACKSTOCK_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rack registry operations
    Rack(commands::rack::RackArgs),
    /// Raw slot occupancy operations
    Slot(commands::slot::SlotArgs),
    /// Place a part into a slot (all payload keys required)
    Place(commands::inventory::PayloadArgs),
    /// Patch the part held by an existing slot
    Update(commands::inventory::PayloadArgs),
    /// Take stock out of a slot
    Consume(commands::inventory::ConsumeArgs),
    /// Move a part from one slot to another
    Move(commands::inventory::MoveArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("{}", err.to_json());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CommandResult<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| rackstock_core::default_log_level());
        let log_dir = absolute_dir(log_dir)?;
        rackstock_core::init_logging(level, &log_dir).map_err(CommandError::Logging)?;
    }

    let conn =
        rackstock_core::db::open_db(&cli.db).map_err(rackstock_core::InventoryError::from)?;
    log::debug!(
        "event=cli_start module=cli status=ok db={} core_version={}",
        cli.db.display(),
        rackstock_core::core_version()
    );

    match cli.command {
        Commands::Rack(args) => commands::rack::execute(args, &conn),
        Commands::Slot(args) => commands::slot::execute(args, &conn),
        Commands::Place(args) => commands::inventory::execute_place(args, &conn),
        Commands::Update(args) => commands::inventory::execute_update(args, &conn),
        Commands::Consume(args) => commands::inventory::execute_consume(args, &conn),
        Commands::Move(args) => commands::inventory::execute_move(args, &conn),
    }
}

/// Resolves a relative `--log-dir` against the working directory.
fn absolute_dir(dir: &str) -> CommandResult<String> {
    let path = std::path::Path::new(dir);
    if path.is_absolute() {
        return Ok(dir.to_string());
    }
    let cwd = std::env::current_dir()
        .map_err(|err| CommandError::Logging(format!("cannot resolve log dir: {err}")))?;
    Ok(cwd.join(path).to_string_lossy().into_owned())
}
