//! Command implementations and shared output plumbing.

pub mod inventory;
pub mod rack;
pub mod slot;

use rackstock_core::{ErrorKind, InventoryError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{Display, Formatter};

pub type CommandResult<T> = Result<T, CommandError>;

/// Failure of one CLI invocation.
#[derive(Debug)]
pub enum CommandError {
    Inventory(InventoryError),
    /// The JSON payload argument could not be read.
    Payload(serde_json::Error),
    Output(serde_json::Error),
    Logging(String),
}

impl CommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Inventory(err) => err.kind(),
            Self::Payload(_) => ErrorKind::Validation,
            Self::Output(_) | Self::Logging(_) => ErrorKind::Storage,
        }
    }

    /// Renders the error object written to stderr.
    pub fn to_json(&self) -> String {
        let kind = self.kind();
        serde_json::json!({
            "status": kind.status_code(),
            "kind": kind.as_str(),
            "error": self.to_string(),
        })
        .to_string()
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inventory(err) => write!(f, "{err}"),
            Self::Payload(err) => write!(f, "invalid JSON payload: {err}"),
            Self::Output(err) => write!(f, "failed to render output: {err}"),
            Self::Logging(message) => write!(f, "logging setup failed: {message}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<InventoryError> for CommandError {
    fn from(value: InventoryError) -> Self {
        Self::Inventory(value)
    }
}

/// Parses a JSON object argument.
pub fn parse_payload<T: DeserializeOwned>(raw: &str) -> CommandResult<T> {
    serde_json::from_str(raw).map_err(CommandError::Payload)
}

/// Prints `value` as pretty JSON on stdout.
pub fn emit<T: Serialize>(value: &T) -> CommandResult<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(CommandError::Output)?;
    println!("{rendered}");
    Ok(())
}
