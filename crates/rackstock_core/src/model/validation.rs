//! Caller input validation errors.
//!
//! Validation failures are detected before any storage access.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Malformed or missing caller input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Rack name is blank after trim.
    BlankRackName,
    /// Rack rows/cols is zero or negative.
    NonPositiveDimension { field: &'static str, value: i64 },
    /// Rack rows/cols does not fit the supported range.
    DimensionTooLarge { field: &'static str, value: i64 },
    /// Rack rows * cols exceeds the supported slot count.
    TooManySlots { slots: u64, max: u64 },
    /// Rack id in a request is zero or negative.
    NonPositiveRackId { field: &'static str, value: i64 },
    /// Slot identifier lies outside the rack's rows or columns.
    SlotOutOfRange { slot: String, rows: u32, cols: u32 },
    /// Required field was absent or explicitly null.
    MissingField(&'static str),
    /// Required text field is blank after trim.
    BlankField(&'static str),
    /// Slot identifier is not in canonical `{row-label}-{column}` form.
    InvalidSlotIdentifier(String),
    /// Written quantity must be positive.
    NonPositiveQuantity(i64),
    /// Consumed amount must be positive.
    NonPositiveAmount(i64),
    /// Move source and destination are the same slot.
    SameSourceAndDestination,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankRackName => write!(f, "rack_name is required"),
            Self::NonPositiveDimension { field, value } => {
                write!(f, "{field} must be a positive integer, got {value}")
            }
            Self::DimensionTooLarge { field, value } => {
                write!(f, "{field} is too large: {value}")
            }
            Self::TooManySlots { slots, max } => {
                write!(f, "rack would have {slots} slots; at most {max} are supported")
            }
            Self::NonPositiveRackId { field, value } => {
                write!(f, "{field} must be a positive integer, got {value}")
            }
            Self::SlotOutOfRange { slot, rows, cols } => {
                write!(f, "slot `{slot}` is outside the rack ({rows} rows x {cols} cols)")
            }
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::InvalidSlotIdentifier(value) => {
                write!(f, "invalid slot identifier `{value}`; expected e.g. `A-1`")
            }
            Self::NonPositiveQuantity(value) => {
                write!(f, "quantity must be a positive integer, got {value}")
            }
            Self::NonPositiveAmount(value) => {
                write!(f, "amount to consume must be a positive integer, got {value}")
            }
            Self::SameSourceAndDestination => {
                write!(f, "source and destination must be different slots")
            }
        }
    }
}

impl Error for ValidationError {}
