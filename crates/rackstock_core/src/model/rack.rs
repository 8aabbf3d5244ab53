//! Rack definitions.
//!
//! # Invariants
//! - `name` is unique and non-blank.
//! - `rows` and `cols` are positive; dimensions are immutable after creation.
//! - `rows <= MAX_ROWS`, `cols <= MAX_COLS` and `rows * cols <= MAX_SLOTS`,
//!   so the dense rack view stays small enough to build in memory.

use crate::model::slot::SlotId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};

/// Storage-generated rack identity.
pub type RackId = i64;

/// Highest row count; the last row is labelled `ZZ`.
pub const MAX_ROWS: u32 = 702;
/// Highest column count.
pub const MAX_COLS: u32 = 1_000;
/// Highest number of addressable slots in one rack.
pub const MAX_SLOTS: u64 = 50_000;

/// Persisted rack definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rack {
    #[serde(rename = "rack_id")]
    pub id: RackId,
    #[serde(rename = "rack_name")]
    pub name: String,
    pub rows: u32,
    pub cols: u32,
}

impl Rack {
    /// Every slot coordinate of this rack, rows outer and columns inner.
    pub fn slot_ids(&self) -> impl Iterator<Item = SlotId> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |row| (1..=cols).filter_map(move |col| SlotId::new(row, col)))
    }

    /// Returns whether `slot_id` lies inside this rack's extents.
    pub fn contains(&self, slot_id: SlotId) -> bool {
        slot_id.row_index() < self.rows && slot_id.column() <= self.cols
    }
}

/// Validated input for rack creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRack {
    name: String,
    rows: u32,
    cols: u32,
}

impl NewRack {
    /// Validates and normalizes rack creation input.
    ///
    /// The name is trimmed; `rows`/`cols` must be positive and within the
    /// extent limits.
    pub fn new(name: &str, rows: i64, cols: i64) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::BlankRackName);
        }
        let (rows, cols) = checked_extents(rows, cols)?;
        Ok(Self {
            name: name.to_string(),
            rows,
            cols,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }
}

/// Checks rack extents against the positivity and size limits.
pub fn checked_extents(rows: i64, cols: i64) -> Result<(u32, u32), ValidationError> {
    let rows = bounded_dimension("rows", rows, MAX_ROWS)?;
    let cols = bounded_dimension("cols", cols, MAX_COLS)?;
    let slots = u64::from(rows) * u64::from(cols);
    if slots > MAX_SLOTS {
        return Err(ValidationError::TooManySlots {
            slots,
            max: MAX_SLOTS,
        });
    }
    Ok((rows, cols))
}

fn bounded_dimension(field: &'static str, value: i64, max: u32) -> Result<u32, ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveDimension { field, value });
    }
    u32::try_from(value)
        .ok()
        .filter(|value| *value <= max)
        .ok_or(ValidationError::DimensionTooLarge { field, value })
}

#[cfg(test)]
mod tests {
    use super::{NewRack, Rack, MAX_COLS, MAX_ROWS, MAX_SLOTS};
    use crate::model::validation::ValidationError;

    #[test]
    fn new_rack_trims_name() {
        let rack = NewRack::new("  Rack1 ", 2, 3).unwrap();
        assert_eq!(rack.name(), "Rack1");
        assert_eq!((rack.rows(), rack.cols()), (2, 3));
    }

    #[test]
    fn new_rack_rejects_blank_name_and_bad_dimensions() {
        assert_eq!(
            NewRack::new("   ", 1, 1).unwrap_err(),
            ValidationError::BlankRackName
        );
        assert_eq!(
            NewRack::new("r", 0, 1).unwrap_err(),
            ValidationError::NonPositiveDimension {
                field: "rows",
                value: 0
            }
        );
        assert_eq!(
            NewRack::new("r", 1, -4).unwrap_err(),
            ValidationError::NonPositiveDimension {
                field: "cols",
                value: -4
            }
        );
        assert!(matches!(
            NewRack::new("r", i64::from(u32::MAX) + 1, 1).unwrap_err(),
            ValidationError::DimensionTooLarge { field: "rows", .. }
        ));
    }

    #[test]
    fn new_rack_enforces_extent_limits() {
        assert!(NewRack::new("r", i64::from(MAX_ROWS), 1).is_ok());
        assert!(NewRack::new("r", 1, i64::from(MAX_COLS)).is_ok());
        assert_eq!(
            NewRack::new("r", i64::from(MAX_ROWS) + 1, 1).unwrap_err(),
            ValidationError::DimensionTooLarge {
                field: "rows",
                value: i64::from(MAX_ROWS) + 1
            }
        );
        assert_eq!(
            NewRack::new("r", 1, i64::from(MAX_COLS) + 1).unwrap_err(),
            ValidationError::DimensionTooLarge {
                field: "cols",
                value: i64::from(MAX_COLS) + 1
            }
        );
        assert_eq!(
            NewRack::new("r", 100_000, 100_000).unwrap_err(),
            ValidationError::DimensionTooLarge {
                field: "rows",
                value: 100_000
            }
        );
        assert_eq!(
            NewRack::new("r", 500, 500).unwrap_err(),
            ValidationError::TooManySlots {
                slots: 250_000,
                max: MAX_SLOTS
            }
        );
    }

    #[test]
    fn contains_checks_both_extents() {
        let rack = Rack {
            id: 1,
            name: "Rack1".to_string(),
            rows: 2,
            cols: 3,
        };
        assert!(rack.contains("B-3".parse().unwrap()));
        assert!(!rack.contains("C-1".parse().unwrap()));
        assert!(!rack.contains("A-4".parse().unwrap()));
    }

    #[test]
    fn slot_ids_iterate_rows_outer_columns_inner() {
        let rack = Rack {
            id: 1,
            name: "Rack1".to_string(),
            rows: 2,
            cols: 3,
        };
        let ids: Vec<String> = rack.slot_ids().map(|id| id.to_string()).collect();
        assert_eq!(ids, ["A-1", "A-2", "A-3", "B-1", "B-2", "B-3"]);
    }
}
