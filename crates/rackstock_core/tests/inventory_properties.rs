use proptest::prelude::*;
use rackstock_core::db::open_db_in_memory;
use rackstock_core::{
    row_label, ErrorKind, InventoryError, InventoryService, PlacementInput, RackService, SlotId,
};

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        ..ProptestConfig::default()
    })]

    /// Every rack view lists exactly rows x cols distinct slots.
    #[test]
    fn empty_view_covers_every_slot(rows in 1i64..30, cols in 1i64..12) {
        let conn = open_db_in_memory().unwrap();
        let racks = RackService::try_new(&conn).unwrap();
        let rack = racks.create_rack("Prop", rows, cols).unwrap();

        let view = racks.rack_view(rack.id).unwrap();
        prop_assert_eq!(view.len() as i64, rows * cols);
        prop_assert_eq!(view.occupied_count, 0);
        prop_assert!(view.slots.values().all(Option::is_none));

        let last = format!("{}-{}", row_label(rows as u32 - 1), cols);
        prop_assert_eq!(view.slot(&last), Some(None));
        prop_assert_eq!(view.slots.keys().next_back().map(ToString::to_string), Some(last));
    }

    /// Slot identifiers survive a display/parse trip for any position.
    #[test]
    fn slot_identifier_parse_inverts_display(row in 0u32..20_000, column in 1u32..10_000) {
        let slot_id = SlotId::new(row, column).unwrap();
        prop_assert_eq!(SlotId::parse(&slot_id.to_string()), Ok(slot_id));
    }

    /// Consuming never leaves a non-positive quantity behind.
    #[test]
    fn consume_keeps_quantity_positive_or_clears(stock in 1i64..500, amount in 1i64..600) {
        let conn = open_db_in_memory().unwrap();
        let rack = RackService::try_new(&conn)
            .unwrap()
            .create_rack("Prop", 1, 1)
            .unwrap();
        let inventory = InventoryService::try_new(&conn).unwrap();
        inventory
            .place(rack.id, "A-1", PlacementInput::new("Widget", "W-100", stock, None))
            .unwrap();

        let result = inventory.consume(rack.id, "A-1", amount);
        let slot = inventory.get_slot(rack.id, "A-1").unwrap();
        if amount > stock {
            let err = result.unwrap_err();
            prop_assert_eq!(err.kind(), ErrorKind::Conflict);
            prop_assert!(matches!(err, InventoryError::InsufficientStock { .. }), "expected InsufficientStock, got {:?}", err);
            prop_assert_eq!(slot.quantity, Some(stock));
        } else if amount == stock {
            prop_assert!(result.unwrap().cleared);
            prop_assert!(slot.is_empty());
        } else {
            prop_assert_eq!(result.unwrap().remaining_quantity, stock - amount);
            prop_assert_eq!(slot.quantity, Some(stock - amount));
        }
    }
}
