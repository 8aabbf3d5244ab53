//! Explicit caller input structures for inventory mutations.
//!
//! # Responsibility
//! - Keep the "absent" vs "explicitly null" distinction of caller payloads.
//! - Turn payloads into validated occupancy for `place` (full write) and
//!   `update` (patch over an existing row).
//!
//! # Invariants
//! - Validated occupancy always carries a part name, a model number and a
//!   positive quantity.

use crate::model::rack::RackId;
use crate::model::slot::{SlotId, SlotOccupancy};
use crate::model::validation::ValidationError;
use serde::{Deserialize, Deserializer};

/// Tri-state field value: absent, explicitly null, or set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldInput<T> {
    /// Key was not provided.
    #[default]
    Missing,
    /// Key was provided with an explicit null.
    Null,
    /// Key was provided with a value.
    Value(T),
}

impl<T> FieldInput<T> {
    /// Resolves this field against the currently stored value.
    ///
    /// `Missing` keeps `current`, `Null` clears, `Value` replaces.
    pub fn apply(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Missing => current,
            Self::Null => None,
            Self::Value(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for FieldInput<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Value(value),
            None => Self::Null,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldInput<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Absent keys never reach here; the container's `#[serde(default)]`
        // yields `Missing` for them.
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

/// Part payload for `place` and `update`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlacementInput {
    pub part_name: FieldInput<String>,
    pub part_model_number: FieldInput<String>,
    pub quantity: FieldInput<i64>,
    pub color_code: FieldInput<String>,
}

impl PlacementInput {
    /// Fully specified payload.
    pub fn new(
        part_name: impl Into<String>,
        part_model_number: impl Into<String>,
        quantity: i64,
        color_code: Option<String>,
    ) -> Self {
        Self {
            part_name: FieldInput::Value(part_name.into()),
            part_model_number: FieldInput::Value(part_model_number.into()),
            quantity: FieldInput::Value(quantity),
            color_code: color_code.into(),
        }
    }

    /// Validates a complete write.
    ///
    /// Part name, model number and quantity must be set; the color code must
    /// be present but may be null.
    pub fn into_occupancy(self) -> Result<SlotOccupancy, ValidationError> {
        let part_name = required(self.part_name, "part_name")?;
        let part_model_number = required(self.part_model_number, "part_model_number")?;
        let quantity = required(self.quantity, "quantity")?;
        let color_code = match self.color_code {
            FieldInput::Missing => return Err(ValidationError::MissingField("color_code")),
            other => other.apply(None),
        };
        validated(SlotOccupancy {
            part_name: Some(part_name),
            part_model_number: Some(part_model_number),
            quantity: Some(quantity),
            color_code,
        })
    }

    /// Applies this payload as a patch over `current` and validates the
    /// merged occupancy.
    pub fn apply_to(self, current: &SlotOccupancy) -> Result<SlotOccupancy, ValidationError> {
        let current = current.clone();
        validated(SlotOccupancy {
            part_name: self.part_name.apply(current.part_name),
            part_model_number: self.part_model_number.apply(current.part_model_number),
            quantity: self.quantity.apply(current.quantity),
            color_code: self.color_code.apply(current.color_code),
        })
    }
}

/// Identifiers of a part transfer between two slots.
///
/// Fields are optional so that callers can hand over partially filled
/// requests; missing identifiers are reported as validation errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MoveRequest {
    pub from_rack_id: Option<RackId>,
    pub from_slot_identifier: Option<String>,
    pub to_rack_id: Option<RackId>,
    pub to_slot_identifier: Option<String>,
}

/// Fully validated transfer endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub from_rack_id: RackId,
    pub from_slot: SlotId,
    pub to_rack_id: RackId,
    pub to_slot: SlotId,
}

impl MoveRequest {
    pub fn new(
        from_rack_id: RackId,
        from_slot_identifier: impl Into<String>,
        to_rack_id: RackId,
        to_slot_identifier: impl Into<String>,
    ) -> Self {
        Self {
            from_rack_id: Some(from_rack_id),
            from_slot_identifier: Some(from_slot_identifier.into()),
            to_rack_id: Some(to_rack_id),
            to_slot_identifier: Some(to_slot_identifier.into()),
        }
    }

    /// Checks presence and format of every identifier and rejects
    /// same-slot transfers.
    pub fn validate(&self) -> Result<MovePlan, ValidationError> {
        let from_rack_id = required_rack_id(self.from_rack_id, "from_rack_id")?;
        let from_slot = required_slot(
            self.from_slot_identifier.as_deref(),
            "from_slot_identifier",
        )?;
        let to_rack_id = required_rack_id(self.to_rack_id, "to_rack_id")?;
        let to_slot = required_slot(self.to_slot_identifier.as_deref(), "to_slot_identifier")?;

        if from_rack_id == to_rack_id && from_slot == to_slot {
            return Err(ValidationError::SameSourceAndDestination);
        }
        Ok(MovePlan {
            from_rack_id,
            from_slot,
            to_rack_id,
            to_slot,
        })
    }
}

fn required<T>(field: FieldInput<T>, name: &'static str) -> Result<T, ValidationError> {
    match field {
        FieldInput::Value(value) => Ok(value),
        FieldInput::Missing | FieldInput::Null => Err(ValidationError::MissingField(name)),
    }
}

fn required_rack_id(value: Option<RackId>, name: &'static str) -> Result<RackId, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField(name)),
        Some(value) if value <= 0 => Err(ValidationError::NonPositiveRackId { field: name, value }),
        Some(value) => Ok(value),
    }
}

fn required_slot(value: Option<&str>, name: &'static str) -> Result<SlotId, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Err(ValidationError::MissingField(name)),
        Some(value) => SlotId::parse(value),
    }
}

fn validated(occupancy: SlotOccupancy) -> Result<SlotOccupancy, ValidationError> {
    let part_name = required_text(occupancy.part_name, "part_name")?;
    let part_model_number = required_text(occupancy.part_model_number, "part_model_number")?;
    let quantity = occupancy
        .quantity
        .ok_or(ValidationError::MissingField("quantity"))?;
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity(quantity));
    }
    Ok(SlotOccupancy {
        part_name: Some(part_name),
        part_model_number: Some(part_model_number),
        quantity: Some(quantity),
        color_code: occupancy.color_code,
    })
}

fn required_text(value: Option<String>, name: &'static str) -> Result<String, ValidationError> {
    let value = value.ok_or(ValidationError::MissingField(name))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(name));
    }
    Ok(trimmed.to_string())
}
