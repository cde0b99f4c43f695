use hotel_core::{BackendKind, HotelStore, ServiceError, StoreConfig};
use serde::Serialize;
use serde_json::{json, Value};

/// Records each step as `{"ok": ...}` or `{"err": <status>, "message": ...}`.
fn outcome<T: Serialize>(result: Result<T, ServiceError>) -> Value {
    match result {
        Ok(value) => json!({ "ok": value }),
        Err(err) => json!({ "err": err.http_status(), "message": err.to_string() }),
    }
}

fn run_script(store: &HotelStore) -> Vec<Value> {
    let guests = store.guests().unwrap();
    let rooms = store.rooms().unwrap();
    let bookings = store.bookings().unwrap();
    let mut log = Vec::new();

    log.push(outcome(rooms.create(&json!({
        "room_number": "101", "floor": "1", "status": "available"
    }))));
    log.push(outcome(rooms.create(&json!({
        "room_number": "102", "floor": "1", "status": "occupied"
    }))));
    log.push(outcome(rooms.create(&json!({
        "room_number": "103", "floor": "1", "status": "clean"
    }))));
    log.push(outcome(rooms.update(2, &json!({ "status": "maintenance" }))));
    log.push(outcome(rooms.update(9, &json!({ "floor": "3" }))));
    log.push(outcome(rooms.delete(2)));
    log.push(outcome(rooms.delete(2)));
    log.push(outcome(rooms.create(&json!({
        "room_number": "104", "floor": "2", "status": "available"
    }))));
    log.push(outcome(rooms.list()));

    log.push(outcome(guests.create(&json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "email": "ada@example.com",
        "cleaned_at": "2024-05-02T11:30:00+02:00"
    }))));
    log.push(outcome(guests.update(1, &json!({
        "phone": "555-0100",
        "room_n": "101"
    }))));
    log.push(outcome(guests.update(1, &json!({ "phone": null }))));
    log.push(outcome(guests.update(1, &json!({}))));
    log.push(outcome(guests.get_by_id(1)));

    log.push(outcome(bookings.create(&json!({
        "guest_id": 1,
        "room_id": 1,
        "check_in_date": "2024-05-01",
        "check_out_date": "2024-05-03",
        "num_guests": 2,
        "status": "reserved"
    }))));
    log.push(outcome(bookings.update(1, &json!({
        "status": "checked_in",
        "check_out_date": "2024-05-05"
    }))));
    log.push(outcome(bookings.update(1, &json!({ "num_guests": -1 }))));
    log.push(outcome(bookings.get_by_id(2)));
    log.push(outcome(bookings.list()));

    log
}

#[test]
fn json_and_sqlite_backends_produce_identical_results() {
    let dir = tempfile::tempdir().unwrap();
    let json_store = HotelStore::open(&StoreConfig::new(BackendKind::Json, dir.path())).unwrap();
    let sqlite_store = HotelStore::open_in_memory().unwrap();

    let json_log = run_script(&json_store);
    let sqlite_log = run_script(&sqlite_store);

    assert_eq!(json_log.len(), sqlite_log.len());
    for (step, (from_json, from_sqlite)) in json_log.iter().zip(&sqlite_log).enumerate() {
        assert_eq!(from_json, from_sqlite, "backends diverge at step {step}");
    }
}

#[test]
fn script_outcomes_match_expected_shape() {
    let store = HotelStore::open_in_memory().unwrap();
    let log = run_script(&store);

    assert_eq!(log[0]["ok"]["id"], 1);
    assert_eq!(log[2]["err"], 400);
    assert_eq!(log[4]["err"], 404);
    assert_eq!(log[6]["message"], "room not found: 2");
    assert_eq!(log[7]["ok"]["id"], 3);
    assert_eq!(log[9]["ok"]["cleaned_at"], "2024-05-02T09:30:00Z");
    assert_eq!(log[11]["ok"]["phone"], Value::Null);
    assert_eq!(log[11]["ok"]["room_n"], "101");
    assert_eq!(log[12], log[13]);
    assert_eq!(log[15]["ok"]["check_out_date"], "2024-05-05");
    assert_eq!(log[15]["ok"]["num_guests"], 2);
    assert_eq!(log[16]["err"], 400);
    assert_eq!(log[18]["ok"].as_array().unwrap().len(), 1);
}
