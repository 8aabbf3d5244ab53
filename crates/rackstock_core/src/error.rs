//! Caller-facing error taxonomy for rack inventory operations.
//!
//! # Responsibility
//! - Classify every failure into one of five tagged kinds.
//! - Map kinds to the status codes of the caller-facing surface.
//!
//! # Invariants
//! - `ForeignKey` (storage-detected missing parent) and `NotFound`
//!   (engine-detected via a prior read) stay distinct tags.
//! - Messages are human readable and carry no internal stack detail.

use crate::db::DbError;
use crate::model::rack::RackId;
use crate::model::slot::SlotId;
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type InventoryResult<T> = Result<T, InventoryError>;

/// Taxonomy tag of an [`InventoryError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    ForeignKey,
    Storage,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::ForeignKey => "foreign_key",
            Self::Storage => "storage",
        }
    }

    /// HTTP-style status code for the caller-facing surface.
    pub fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::NotFound | Self::ForeignKey => 404,
            Self::Conflict => 409,
            Self::Storage => 500,
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classified failure of a rack inventory operation.
#[derive(Debug)]
pub enum InventoryError {
    /// Malformed or missing caller input.
    Validation(ValidationError),
    /// Referenced rack does not exist.
    RackNotFound(RackId),
    /// No occupancy row exists for the slot.
    SlotNotFound { rack_id: RackId, slot_id: SlotId },
    /// Slot has no part to consume.
    SlotEmpty { rack_id: RackId, slot_id: SlotId },
    /// Move destination rack vanished (storage foreign-key violation).
    DestinationRackNotFound(RackId),
    /// Rack name already taken.
    DuplicateRackName(String),
    /// Consumed amount exceeds current stock.
    InsufficientStock {
        rack_id: RackId,
        slot_id: SlotId,
        available: i64,
        requested: i64,
    },
    /// Move source row exists but holds no part.
    SourceEmpty { rack_id: RackId, slot_id: SlotId },
    /// Move destination already holds a part.
    DestinationOccupied { rack_id: RackId, slot_id: SlotId },
    /// Slot row was created by a concurrent writer between read and insert.
    SlotConflict { rack_id: RackId, slot_id: SlotId },
    /// Storage rejected a write because the referenced rack does not exist.
    MissingParentRack(RackId),
    /// Any other backend failure.
    Storage(RepoError),
}

impl InventoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::RackNotFound(_)
            | Self::SlotNotFound { .. }
            | Self::SlotEmpty { .. }
            | Self::DestinationRackNotFound(_) => ErrorKind::NotFound,
            Self::DuplicateRackName(_)
            | Self::InsufficientStock { .. }
            | Self::SourceEmpty { .. }
            | Self::DestinationOccupied { .. }
            | Self::SlotConflict { .. } => ErrorKind::Conflict,
            Self::MissingParentRack(_) => ErrorKind::ForeignKey,
            Self::Storage(_) => ErrorKind::Storage,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }
}

impl Display for InventoryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::RackNotFound(id) => write!(f, "rack not found: {id}"),
            Self::SlotNotFound { rack_id, slot_id } => {
                write!(f, "slot not found: rack {rack_id} slot {slot_id}")
            }
            Self::SlotEmpty { rack_id, slot_id } => {
                write!(f, "no part in slot: rack {rack_id} slot {slot_id}")
            }
            Self::DestinationRackNotFound(id) => write!(f, "destination rack not found: {id}"),
            Self::DuplicateRackName(name) => write!(f, "rack_name already exists: `{name}`"),
            Self::InsufficientStock {
                rack_id,
                slot_id,
                available,
                requested,
            } => write!(
                f,
                "insufficient stock in rack {rack_id} slot {slot_id}: available {available}, requested {requested}"
            ),
            Self::SourceEmpty { rack_id, slot_id } => {
                write!(f, "source is empty: rack {rack_id} slot {slot_id}")
            }
            Self::DestinationOccupied { rack_id, slot_id } => {
                write!(f, "destination occupied: rack {rack_id} slot {slot_id}")
            }
            Self::SlotConflict { rack_id, slot_id } => {
                write!(f, "slot was written concurrently: rack {rack_id} slot {slot_id}")
            }
            Self::MissingParentRack(id) => write!(f, "referenced rack does not exist: {id}"),
            Self::Storage(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for InventoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for InventoryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for InventoryError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::RackNotFound(id) => Self::RackNotFound(id),
            RepoError::SlotNotFound { rack_id, slot_id } => Self::SlotNotFound { rack_id, slot_id },
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for InventoryError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}
