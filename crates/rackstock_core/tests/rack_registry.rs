use rackstock_core::db::open_db_in_memory;
use rackstock_core::{
    ErrorKind, InventoryError, InventoryService, PlacementInput, RackService, SlotOccupancy,
    ValidationError,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn create_and_get_rack_roundtrip() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();

    let created = racks.create_rack("  Rack1  ", 2, 3).unwrap();
    assert!(created.id > 0);
    assert_eq!(created.name, "Rack1");
    assert_eq!((created.rows, created.cols), (2, 3));

    let loaded = racks.get_rack(created.id).unwrap();
    assert_eq!(loaded, created);
}

#[test]
fn create_rack_rejects_invalid_input_before_storage() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();

    let err = racks.create_rack("   ", 1, 1).unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::BlankRackName)
    ));
    assert_eq!(err.status_code(), 400);

    let err = racks.create_rack("Rack1", 0, 1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = racks.create_rack("Rack1", 1, -2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(racks.list_racks().unwrap().is_empty());
}

#[test]
fn duplicate_rack_name_is_conflict() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();

    racks.create_rack("Rack1", 1, 1).unwrap();
    let err = racks.create_rack(" Rack1", 4, 4).unwrap_err();
    assert!(matches!(err, InventoryError::DuplicateRackName(ref name) if name == "Rack1"));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(racks.list_racks().unwrap().len(), 1);
}

#[test]
fn get_missing_rack_is_not_found() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();

    let err = racks.get_rack(42).unwrap_err();
    assert!(matches!(err, InventoryError::RackNotFound(42)));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn list_racks_is_ordered_by_id() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();

    let c = racks.create_rack("C", 1, 1).unwrap();
    let a = racks.create_rack("A", 1, 1).unwrap();
    let b = racks.create_rack("B", 1, 1).unwrap();

    let ids: Vec<i64> = racks.list_racks().unwrap().iter().map(|rack| rack.id).collect();
    assert_eq!(ids, [c.id, a.id, b.id]);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn new_rack_view_lists_every_slot_as_empty() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();
    let rack = racks.create_rack("Rack1", 2, 3).unwrap();

    let view = racks.rack_view(rack.id).unwrap();
    let keys: Vec<String> = view.slots.keys().map(ToString::to_string).collect();
    assert_eq!(keys, ["A-1", "A-2", "A-3", "B-1", "B-2", "B-3"]);
    assert!(view.slots.values().all(Option::is_none));
    assert_eq!(view.rack, rack);
}

#[test]
fn rack_view_overlays_occupancy_and_ignores_cleared_rows() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();
    let inventory = InventoryService::try_new(&conn).unwrap();
    let rack = racks.create_rack("Rack1", 2, 2).unwrap();

    inventory
        .place(rack.id, "B-2", PlacementInput::new("Widget", "W-100", 5, None))
        .unwrap();
    inventory
        .place(rack.id, "A-1", PlacementInput::new("Bolt", "B-8", 1, None))
        .unwrap();
    inventory.clear_slot(rack.id, "A-1").unwrap();

    let view = racks.rack_view(rack.id).unwrap();
    assert_eq!(view.len(), 4);
    assert_eq!(view.occupied_count, 1);
    assert_eq!(view.slot("A-1"), Some(None));
    let widget = view.slot("B-2").unwrap().unwrap();
    assert_eq!(widget.quantity, Some(5));
}

#[test]
fn oversized_rack_is_rejected_before_storage() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();

    let err = racks.create_rack("Huge", 100_000, 100_000).unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::DimensionTooLarge { field: "rows", .. })
    ));
    assert_eq!(err.status_code(), 400);

    let err = racks.create_rack("Wide", 400, 400).unwrap_err();
    assert!(matches!(
        err,
        InventoryError::Validation(ValidationError::TooManySlots { .. })
    ));
    assert!(racks.list_racks().unwrap().is_empty());
}

#[test]
fn rack_view_refuses_persisted_rack_beyond_limits() {
    let conn = setup();
    conn.execute(
        "INSERT INTO racks (rack_name, rows, cols) VALUES ('Huge', 100000, 100000);",
        [],
    )
    .unwrap();
    let rack_id = conn.last_insert_rowid();

    let err = RackService::try_new(&conn)
        .unwrap()
        .rack_view(rack_id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
}

#[test]
fn rack_view_of_missing_rack_is_not_found() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();
    assert!(matches!(
        racks.rack_view(7).unwrap_err(),
        InventoryError::RackNotFound(7)
    ));
}

#[test]
fn delete_rack_removes_occupancy_and_rack() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();
    let inventory = InventoryService::try_new(&conn).unwrap();
    let rack = racks.create_rack("Rack1", 2, 2).unwrap();
    let other = racks.create_rack("Rack2", 1, 1).unwrap();

    inventory
        .place(rack.id, "A-1", PlacementInput::new("Widget", "W-100", 5, None))
        .unwrap();
    inventory
        .place(rack.id, "B-2", PlacementInput::new("Bolt", "B-8", 2, None))
        .unwrap();
    inventory
        .place(other.id, "A-1", PlacementInput::new("Nut", "N-1", 9, None))
        .unwrap();

    let deletion = racks.delete_rack(rack.id).unwrap();
    assert_eq!(deletion.rack, rack);
    assert_eq!(deletion.removed_slot_rows, 2);

    assert!(matches!(
        racks.get_rack(rack.id).unwrap_err(),
        InventoryError::RackNotFound(id) if id == rack.id
    ));
    assert_eq!(slot_rows(&conn, rack.id), 0);
    assert_eq!(slot_rows(&conn, other.id), 1);
    assert_eq!(
        inventory.get_slot(rack.id, "A-1").unwrap(),
        SlotOccupancy::empty()
    );
}

#[test]
fn delete_missing_rack_is_not_found() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();
    let err = racks.delete_rack(99).unwrap_err();
    assert!(matches!(err, InventoryError::RackNotFound(99)));
    assert!(conn.is_autocommit());
}

#[test]
fn failed_rack_delete_keeps_occupancy_rows() {
    let conn = setup();
    let racks = RackService::try_new(&conn).unwrap();
    let inventory = InventoryService::try_new(&conn).unwrap();
    let rack = racks.create_rack("Rack1", 1, 2).unwrap();
    inventory
        .place(rack.id, "A-2", PlacementInput::new("Widget", "W-100", 5, None))
        .unwrap();

    conn.execute_batch(
        "CREATE TRIGGER block_rack_delete
         BEFORE DELETE ON racks
         BEGIN
            SELECT RAISE(ABORT, 'injected rack delete failure');
         END;",
    )
    .unwrap();

    let err = racks.delete_rack(rack.id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Storage);
    assert!(conn.is_autocommit());
    assert_eq!(slot_rows(&conn, rack.id), 1);
    assert_eq!(
        inventory.get_slot(rack.id, "A-2").unwrap().quantity,
        Some(5)
    );
}

fn slot_rows(conn: &Connection, rack_id: i64) -> i64 {
    conn.query_row(
        "SELECT COUNT(*) FROM slot_occupancy WHERE rack_id = ?1;",
        [rack_id],
        |row| row.get(0),
    )
    .unwrap()
}
