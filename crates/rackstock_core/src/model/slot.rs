//! Slot coordinates and occupancy payloads.
//!
//! # Responsibility
//! - Map row indexes to letter labels and back.
//! - Format and parse canonical slot identifiers (`"{row-label}-{column}"`).
//! - Define the optional occupancy payload held by one slot.
//!
//! # Invariants
//! - Row labels are bijective base-26: `A..Z`, then `AA, AB, ..`.
//! - Columns are 1-based.
//! - `SlotId::parse(id.to_string()) == Ok(id)` for every `SlotId`.

use crate::model::rack::RackId;
use crate::model::validation::ValidationError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static SLOT_IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)-([1-9][0-9]*)$").expect("valid slot identifier regex"));

const ALPHABET_LEN: u64 = 26;

/// One addressable slot coordinate within a rack.
///
/// Ordering is row-major (row label, then ascending column), which is the
/// iteration order of the dense rack view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId {
    row_index: u32,
    column: u32,
}

impl SlotId {
    /// Creates a coordinate from a 0-based row index and 1-based column.
    ///
    /// Returns `None` for column `0`.
    pub fn new(row_index: u32, column: u32) -> Option<Self> {
        (column > 0).then_some(Self { row_index, column })
    }

    /// Parses a canonical slot identifier such as `B-12`.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidSlotIdentifier(value.to_string());
        let captures = SLOT_IDENTIFIER_RE.captures(value).ok_or_else(invalid)?;
        let row_index = parse_row_label(&captures[1]).ok_or_else(invalid)?;
        let column = captures[2].parse::<u32>().map_err(|_| invalid())?;
        Ok(Self { row_index, column })
    }

    pub fn row_index(&self) -> u32 {
        self.row_index
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn row_label(&self) -> String {
        row_label(self.row_index)
    }
}

impl Display for SlotId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", row_label(self.row_index), self.column)
    }
}

impl FromStr for SlotId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl Serialize for SlotId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Maps a 0-based row index to its letter label.
pub fn row_label(index: u32) -> String {
    let mut remaining = u64::from(index) + 1;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        letters.push(char::from(b'A' + (remaining % ALPHABET_LEN) as u8));
        remaining /= ALPHABET_LEN;
    }
    letters.iter().rev().collect()
}

/// Inverse of [`row_label`]. Returns `None` on non `A-Z` input or overflow.
pub fn parse_row_label(label: &str) -> Option<u32> {
    if label.is_empty() {
        return None;
    }
    let mut value: u64 = 0;
    for byte in label.bytes() {
        if !byte.is_ascii_uppercase() {
            return None;
        }
        value = value
            .checked_mul(ALPHABET_LEN)?
            .checked_add(u64::from(byte - b'A') + 1)?;
        if value > u64::from(u32::MAX) + 1 {
            return None;
        }
    }
    u32::try_from(value - 1).ok()
}

/// Optional part payload held by one slot.
///
/// All fields null means the slot is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOccupancy {
    pub part_name: Option<String>,
    pub part_model_number: Option<String>,
    pub quantity: Option<i64>,
    pub color_code: Option<String>,
}

impl SlotOccupancy {
    /// Occupancy with every payload field null.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when every payload field is null.
    pub fn is_empty(&self) -> bool {
        self.part_name.is_none()
            && self.part_model_number.is_none()
            && self.quantity.is_none()
            && self.color_code.is_none()
    }

    /// True when a part is recorded in the slot.
    pub fn has_part(&self) -> bool {
        self.part_name.is_some()
    }
}

/// One persisted occupancy row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotRecord {
    pub rack_id: RackId,
    #[serde(rename = "slot_identifier")]
    pub slot_id: SlotId,
    #[serde(flatten)]
    pub occupancy: SlotOccupancy,
}

#[cfg(test)]
mod tests {
    use super::{parse_row_label, row_label, SlotId, SlotOccupancy};
    use crate::model::validation::ValidationError;

    #[test]
    fn row_labels_cover_single_and_multi_letter_ranges() {
        assert_eq!(row_label(0), "A");
        assert_eq!(row_label(25), "Z");
        assert_eq!(row_label(26), "AA");
        assert_eq!(row_label(27), "AB");
        assert_eq!(row_label(51), "AZ");
        assert_eq!(row_label(52), "BA");
        assert_eq!(row_label(701), "ZZ");
        assert_eq!(row_label(702), "AAA");
    }

    #[test]
    fn parse_row_label_inverts_row_label() {
        for index in [0, 1, 25, 26, 51, 700, 701, 702, 18_277, u32::MAX] {
            assert_eq!(parse_row_label(&row_label(index)), Some(index));
        }
        assert_eq!(parse_row_label(""), None);
        assert_eq!(parse_row_label("a"), None);
        assert_eq!(parse_row_label("ZZZZZZZZ"), None);
    }

    #[test]
    fn slot_id_parses_canonical_identifiers() {
        let id = SlotId::parse("B-12").unwrap();
        assert_eq!(id.row_index(), 1);
        assert_eq!(id.column(), 12);
        assert_eq!(id.row_label(), "B");
        assert_eq!(id.to_string(), "B-12");
        assert_eq!("AA-3".parse::<SlotId>().unwrap().row_index(), 26);
    }

    #[test]
    fn slot_id_rejects_malformed_identifiers() {
        for value in ["", "A", "A-0", "a-1", "A1", "A-01", "-1", "A--1", " A-1", "A-99999999999"] {
            assert_eq!(
                SlotId::parse(value).unwrap_err(),
                ValidationError::InvalidSlotIdentifier(value.to_string()),
                "`{value}` should be rejected"
            );
        }
    }

    #[test]
    fn slot_ids_order_row_major() {
        let mut ids: Vec<SlotId> = ["B-1", "A-10", "A-2", "AA-1", "Z-3"]
            .iter()
            .map(|value| SlotId::parse(value).unwrap())
            .collect();
        ids.sort();
        let ordered: Vec<String> = ids.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, ["A-2", "A-10", "B-1", "Z-3", "AA-1"]);
    }

    #[test]
    fn occupancy_emptiness_and_part_presence() {
        let empty = SlotOccupancy::empty();
        assert!(empty.is_empty());
        assert!(!empty.has_part());

        let color_only = SlotOccupancy {
            color_code: Some("#FF5733".to_string()),
            ..SlotOccupancy::empty()
        };
        assert!(!color_only.is_empty());
        assert!(!color_only.has_part());
    }
}
