//! Dense rack view projected from sparse occupancy rows.
//!
//! # Responsibility
//! - Generate every slot coordinate of a rack exactly once.
//! - Overlay persisted occupancy onto the generated coordinates.
//!
//! # Invariants
//! - The view has exactly `rows * cols` entries.
//! - Persisted rows outside the rack extents are not part of the view.
//! - A persisted row with an all-null payload is reported as empty.

use crate::model::rack::Rack;
use crate::model::slot::{SlotId, SlotOccupancy, SlotRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Rack metadata plus one entry per slot coordinate (`None` = empty).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RackView {
    #[serde(flatten)]
    pub rack: Rack,
    pub occupied_count: usize,
    pub slots: BTreeMap<SlotId, Option<SlotOccupancy>>,
}

impl RackView {
    /// Projects `records` onto the full coordinate grid of `rack`.
    pub fn project(rack: Rack, records: impl IntoIterator<Item = SlotRecord>) -> Self {
        let mut slots: BTreeMap<SlotId, Option<SlotOccupancy>> =
            rack.slot_ids().map(|slot_id| (slot_id, None)).collect();

        for record in records {
            if record.occupancy.is_empty() {
                continue;
            }
            if let Some(entry) = slots.get_mut(&record.slot_id) {
                *entry = Some(record.occupancy);
            }
        }

        let occupied_count = slots.values().filter(|entry| entry.is_some()).count();
        Self {
            rack,
            occupied_count,
            slots,
        }
    }

    /// Looks up one slot by identifier.
    ///
    /// Returns `None` when the identifier is malformed or outside the rack,
    /// `Some(None)` for an empty slot.
    pub fn slot(&self, slot_identifier: &str) -> Option<Option<&SlotOccupancy>> {
        let slot_id = SlotId::parse(slot_identifier).ok()?;
        self.slots.get(&slot_id).map(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RackView;
    use crate::model::rack::Rack;
    use crate::model::slot::{SlotId, SlotOccupancy, SlotRecord};

    fn rack(rows: u32, cols: u32) -> Rack {
        Rack {
            id: 7,
            name: "Rack1".to_string(),
            rows,
            cols,
        }
    }

    fn record(slot: &str, part_name: Option<&str>, quantity: Option<i64>) -> SlotRecord {
        SlotRecord {
            rack_id: 7,
            slot_id: SlotId::parse(slot).unwrap(),
            occupancy: SlotOccupancy {
                part_name: part_name.map(str::to_string),
                part_model_number: part_name.map(|_| "M-1".to_string()),
                quantity,
                color_code: None,
            },
        }
    }

    #[test]
    fn empty_rack_projects_every_coordinate_as_empty() {
        let view = RackView::project(rack(2, 3), Vec::new());
        let keys: Vec<String> = view.slots.keys().map(ToString::to_string).collect();
        assert_eq!(keys, ["A-1", "A-2", "A-3", "B-1", "B-2", "B-3"]);
        assert!(view.slots.values().all(Option::is_none));
        assert_eq!(view.occupied_count, 0);
    }

    #[test]
    fn persisted_rows_override_defaults() {
        let view = RackView::project(
            rack(2, 2),
            vec![
                record("B-2", Some("Widget"), Some(5)),
                record("A-1", None, None),
                record("C-9", Some("Ghost"), Some(1)),
            ],
        );
        assert_eq!(view.len(), 4);
        assert_eq!(view.occupied_count, 1);
        let widget = view.slot("B-2").unwrap().unwrap();
        assert_eq!(widget.part_name.as_deref(), Some("Widget"));
        assert_eq!(view.slot("A-1"), Some(None));
        assert_eq!(view.slot("C-9"), None);
        assert_eq!(view.slot("not-a-slot"), None);
    }

    #[test]
    fn rows_beyond_alphabet_use_multi_letter_labels() {
        let view = RackView::project(rack(28, 1), Vec::new());
        assert_eq!(view.len(), 28);
        assert!(view.slot("Z-1").is_some());
        assert!(view.slot("AA-1").is_some());
        assert!(view.slot("AB-1").is_some());
        assert!(view.slot("AC-1").is_none());
    }

    #[test]
    fn serializes_slots_as_keyed_map_with_null_for_empty() {
        let view = RackView::project(rack(1, 2), vec![record("A-2", Some("Widget"), Some(3))]);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["rack_id"], 7);
        assert_eq!(json["rack_name"], "Rack1");
        assert!(json["slots"]["A-1"].is_null());
        assert_eq!(json["slots"]["A-2"]["part_name"], "Widget");
        assert_eq!(json["slots"]["A-2"]["quantity"], 3);
    }
}
