use chrono::{NaiveDate, TimeZone, Utc};
use hotel_core::db::{open_db, open_db_in_memory};
use hotel_core::{
    Booking, BookingPatch, BookingStatus, Guest, GuestPatch, NewBooking, NewGuest, NewRoom,
    RepoError, Repository, Room, RoomPatch, RoomStatus, SqliteRepository,
};
use rusqlite::Connection;

fn room(number: &str, status: RoomStatus) -> NewRoom {
    NewRoom {
        room_number: number.to_string(),
        floor: "1".to_string(),
        status,
    }
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteRepository::<Room>::try_new(&conn)
        .err()
        .expect("bare connection must be rejected");

    match err {
        RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        } => {
            assert_eq!(expected_version, hotel_core::db::migrations::latest_version());
            assert_eq!(actual_version, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn try_new_rejects_missing_table() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch("DROP TABLE bookings;").unwrap();

    assert!(SqliteRepository::<Room>::try_new(&conn).is_ok());
    assert!(matches!(
        SqliteRepository::<Booking>::try_new(&conn),
        Err(RepoError::MissingRequiredTable("bookings"))
    ));
}

#[test]
fn create_assigns_ids_from_one_and_after_current_max() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();

    assert_eq!(repo.create(&room("101", RoomStatus::Available)).unwrap().id, 1);

    conn.execute_batch(
        "INSERT INTO rooms (id, room_number, floor, status) VALUES (3, '103', '1', 'available');
         INSERT INTO rooms (id, room_number, floor, status) VALUES (7, '107', '1', 'occupied');",
    )
    .unwrap();

    let created = repo.create(&room("108", RoomStatus::Maintenance)).unwrap();
    assert_eq!(created.id, 8);
    assert_eq!(repo.get_by_id(8).unwrap(), Some(created));
}

#[test]
fn list_returns_rows_in_ascending_id_order() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "INSERT INTO rooms (id, room_number, floor, status) VALUES (5, '105', '1', 'available');
         INSERT INTO rooms (id, room_number, floor, status) VALUES (2, '102', '1', 'available');
         INSERT INTO rooms (id, room_number, floor, status) VALUES (9, '109', '2', 'occupied');",
    )
    .unwrap();

    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|room| room.id).collect();
    assert_eq!(ids, vec![2, 5, 9]);
}

#[test]
fn update_changes_only_patched_columns() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Booking>::try_new(&conn).unwrap();
    let created = repo
        .create(&NewBooking {
            guest_id: 4,
            room_id: 12,
            check_in_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
            num_guests: 2,
            status: BookingStatus::Reserved,
        })
        .unwrap();

    let updated = repo
        .update(
            created.id,
            &BookingPatch {
                status: Some(BookingStatus::CheckedIn),
                ..BookingPatch::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(
        updated,
        Booking {
            status: BookingStatus::CheckedIn,
            ..created
        }
    );

    let stored: String = conn
        .query_row("SELECT status FROM bookings WHERE id = 1;", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(stored, "checked_in");
}

#[test]
fn empty_patch_returns_current_record() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
    let created = repo.create(&room("101", RoomStatus::Available)).unwrap();

    assert_eq!(
        repo.update(created.id, &RoomPatch::default()).unwrap(),
        Some(created)
    );
    assert_eq!(repo.update(99, &RoomPatch::default()).unwrap(), None);
}

#[test]
fn guest_nullable_columns_round_trip_and_clear() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Guest>::try_new(&conn).unwrap();
    let cleaned_at = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();
    let mut draft = NewGuest::new("Grace", "Hopper", "grace@example.com");
    draft.phone = Some("555-0199".to_string());
    draft.cleaned_at = Some(cleaned_at);

    let created = repo.create(&draft).unwrap();
    let fetched = repo.get_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.cleaned_at, Some(cleaned_at));
    assert_eq!(fetched.room_n, None);

    let cleared = repo
        .update(
            created.id,
            &GuestPatch {
                phone: Some(None),
                room_n: Some(Some("204".to_string())),
                ..GuestPatch::default()
            },
        )
        .unwrap()
        .unwrap();
    assert_eq!(cleared.phone, None);
    assert_eq!(cleared.room_n.as_deref(), Some("204"));
    assert_eq!(cleared.cleaned_at, Some(cleaned_at));
}

#[test]
fn absent_ids_report_none_and_false() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();

    assert_eq!(repo.get_by_id(1).unwrap(), None);
    assert_eq!(
        repo.update(
            1,
            &RoomPatch {
                floor: Some("3".to_string()),
                ..RoomPatch::default()
            }
        )
        .unwrap(),
        None
    );
    assert!(!repo.delete(1).unwrap());
}

#[test]
fn delete_removes_only_target_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
    repo.create(&room("101", RoomStatus::Available)).unwrap();
    repo.create(&room("102", RoomStatus::Available)).unwrap();

    assert!(repo.delete(1).unwrap());
    let ids: Vec<_> = repo.list().unwrap().into_iter().map(|room| room.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn deleted_max_id_is_not_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
    repo.create(&room("101", RoomStatus::Available)).unwrap();
    let second = repo.create(&room("102", RoomStatus::Available)).unwrap();

    assert!(repo.delete(second.id).unwrap());
    let third = repo.create(&room("103", RoomStatus::Available)).unwrap();
    assert_eq!(third.id, 3);
    assert_eq!(repo.get_by_id(second.id).unwrap(), None);
}

#[test]
fn deleted_ids_stay_retired_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hotel.sqlite3");
    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
        for number in ["101", "102", "103"] {
            repo.create(&room(number, RoomStatus::Available)).unwrap();
        }
        assert!(repo.delete(3).unwrap());
        assert!(repo.delete(2).unwrap());
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
    assert_eq!(repo.create(&room("104", RoomStatus::Available)).unwrap().id, 4);
}

#[test]
fn exhausted_id_space_is_an_error_not_a_wrap() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO rooms (id, room_number, floor, status) VALUES (?1, '999', '9', 'available');",
        [i64::MAX],
    )
    .unwrap();

    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
    let err = repo
        .create(&room("100", RoomStatus::Available))
        .unwrap_err();
    match err {
        RepoError::InvalidData(message) => assert_eq!(message, "id space exhausted"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[test]
fn unknown_status_in_row_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "PRAGMA ignore_check_constraints = ON;
         INSERT INTO rooms (id, room_number, floor, status) VALUES (1, '101', '1', 'clean');
         PRAGMA ignore_check_constraints = OFF;",
    )
    .unwrap();

    let repo = SqliteRepository::<Room>::try_new(&conn).unwrap();
    let err = repo.get_by_id(1).unwrap_err();
    match err {
        RepoError::InvalidData(message) => assert!(message.contains("clean")),
        other => panic!("unexpected error: {other}"),
    }
}
