use hotel_core::db::migrations::latest_version;
use hotel_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "guests");
    assert_table_exists(&conn, "rooms");
    assert_table_exists(&conn, "bookings");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hotel.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO rooms (id, room_number, floor, status) VALUES (1, '101', '1', 'available');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let rooms: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM rooms;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rooms, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn status_columns_reject_unknown_literals() {
    let conn = open_db_in_memory().unwrap();

    let room_err = conn.execute(
        "INSERT INTO rooms (id, room_number, floor, status) VALUES (1, '101', '1', 'clean');",
        [],
    );
    assert!(room_err.is_err());

    let booking_err = conn.execute(
        "INSERT INTO bookings (id, guest_id, room_id, check_in_date, check_out_date, num_guests, status)
         VALUES (1, 1, 1, '2024-05-01', '2024-05-02', 0, 'reserved');",
        [],
    );
    assert!(booking_err.is_err());
}

#[test]
fn bookings_do_not_enforce_guest_or_room_references() {
    let conn = open_db_in_memory().unwrap();

    conn.execute(
        "INSERT INTO bookings (id, guest_id, room_id, check_in_date, check_out_date, num_guests, status)
         VALUES (1, 42, 77, '2024-05-01', '2024-05-02', 1, 'reserved');",
        [],
    )
    .unwrap();
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
