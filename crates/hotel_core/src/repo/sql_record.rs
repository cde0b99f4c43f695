//! Row mapping between entity structs and SQLite tables.
//!
//! # Invariants
//! - Table name equals `Entity::COLLECTION`; the key column is always `id`.
//! - `patch_values` yields only the columns present in the patch.
//! - Enum and date columns are stored as their canonical text literals.

use super::{RepoError, RepoResult};
use crate::model::booking::{Booking, BookingPatch, BookingStatus, NewBooking};
use crate::model::guest::{Guest, GuestPatch, NewGuest};
use crate::model::room::{NewRoom, Room, RoomPatch, RoomStatus};
use crate::model::Entity;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::types::Value;
use rusqlite::Row;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Entity that can be stored in an SQLite table.
pub trait SqlRecord: Entity {
    /// Non-id columns, in insert order.
    const COLUMNS: &'static [&'static str];

    /// Values for `COLUMNS`, in the same order.
    fn draft_values(draft: &Self::Draft) -> Vec<Value>;

    /// `(column, value)` pairs for every field present in `patch`.
    fn patch_values(patch: &Self::Patch) -> Vec<(&'static str, Value)>;

    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

impl SqlRecord for Guest {
    const COLUMNS: &'static [&'static str] = &[
        "first_name",
        "last_name",
        "email",
        "phone",
        "room_n",
        "cleaned_at",
    ];

    fn draft_values(draft: &NewGuest) -> Vec<Value> {
        vec![
            text(&draft.first_name),
            text(&draft.last_name),
            text(&draft.email),
            optional_text(draft.phone.as_deref()),
            optional_text(draft.room_n.as_deref()),
            optional_timestamp(draft.cleaned_at),
        ]
    }

    fn patch_values(patch: &GuestPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        if let Some(first_name) = &patch.first_name {
            values.push(("first_name", text(first_name)));
        }
        if let Some(last_name) = &patch.last_name {
            values.push(("last_name", text(last_name)));
        }
        if let Some(email) = &patch.email {
            values.push(("email", text(email)));
        }
        if let Some(phone) = &patch.phone {
            values.push(("phone", optional_text(phone.as_deref())));
        }
        if let Some(room_n) = &patch.room_n {
            values.push(("room_n", optional_text(room_n.as_deref())));
        }
        if let Some(cleaned_at) = patch.cleaned_at {
            values.push(("cleaned_at", optional_timestamp(cleaned_at)));
        }
        values
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let cleaned_at = match row.get::<_, Option<String>>("cleaned_at")? {
            Some(value) => Some(parse_timestamp(&value, "guests.cleaned_at")?),
            None => None,
        };

        Ok(Self {
            id: row.get("id")?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            room_n: row.get("room_n")?,
            cleaned_at,
        })
    }
}

impl SqlRecord for Room {
    const COLUMNS: &'static [&'static str] = &["room_number", "floor", "status"];

    fn draft_values(draft: &NewRoom) -> Vec<Value> {
        vec![
            text(&draft.room_number),
            text(&draft.floor),
            text(draft.status.as_str()),
        ]
    }

    fn patch_values(patch: &RoomPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        if let Some(room_number) = &patch.room_number {
            values.push(("room_number", text(room_number)));
        }
        if let Some(floor) = &patch.floor {
            values.push(("floor", text(floor)));
        }
        if let Some(status) = patch.status {
            values.push(("status", text(status.as_str())));
        }
        values
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let status_text: String = row.get("status")?;
        let status = RoomStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid room status `{status_text}` in rooms.status"))
        })?;

        Ok(Self {
            id: row.get("id")?,
            room_number: row.get("room_number")?,
            floor: row.get("floor")?,
            status,
        })
    }
}

impl SqlRecord for Booking {
    const COLUMNS: &'static [&'static str] = &[
        "guest_id",
        "room_id",
        "check_in_date",
        "check_out_date",
        "num_guests",
        "status",
    ];

    fn draft_values(draft: &NewBooking) -> Vec<Value> {
        vec![
            Value::Integer(draft.guest_id),
            Value::Integer(draft.room_id),
            date(draft.check_in_date),
            date(draft.check_out_date),
            Value::Integer(i64::from(draft.num_guests)),
            text(draft.status.as_str()),
        ]
    }

    fn patch_values(patch: &BookingPatch) -> Vec<(&'static str, Value)> {
        let mut values = Vec::new();
        if let Some(guest_id) = patch.guest_id {
            values.push(("guest_id", Value::Integer(guest_id)));
        }
        if let Some(room_id) = patch.room_id {
            values.push(("room_id", Value::Integer(room_id)));
        }
        if let Some(check_in_date) = patch.check_in_date {
            values.push(("check_in_date", date(check_in_date)));
        }
        if let Some(check_out_date) = patch.check_out_date {
            values.push(("check_out_date", date(check_out_date)));
        }
        if let Some(num_guests) = patch.num_guests {
            values.push(("num_guests", Value::Integer(i64::from(num_guests))));
        }
        if let Some(status) = patch.status {
            values.push(("status", text(status.as_str())));
        }
        values
    }

    fn from_row(row: &Row<'_>) -> RepoResult<Self> {
        let status_text: String = row.get("status")?;
        let status = BookingStatus::parse(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!(
                "invalid booking status `{status_text}` in bookings.status"
            ))
        })?;
        let check_in_text: String = row.get("check_in_date")?;
        let check_out_text: String = row.get("check_out_date")?;
        let num_guests: i64 = row.get("num_guests")?;
        let num_guests = u32::try_from(num_guests).map_err(|_| {
            RepoError::InvalidData(format!(
                "invalid num_guests `{num_guests}` in bookings.num_guests"
            ))
        })?;

        Ok(Self {
            id: row.get("id")?,
            guest_id: row.get("guest_id")?,
            room_id: row.get("room_id")?,
            check_in_date: parse_date(&check_in_text, "bookings.check_in_date")?,
            check_out_date: parse_date(&check_out_text, "bookings.check_out_date")?,
            num_guests,
            status,
        })
    }
}

fn text(value: &str) -> Value {
    Value::Text(value.to_string())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}

fn date(value: NaiveDate) -> Value {
    Value::Text(value.format(DATE_FORMAT).to_string())
}

fn optional_timestamp(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |value| {
        Value::Text(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    })
}

fn parse_date(value: &str, column: &str) -> RepoResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid date `{value}` in {column}")))
}

fn parse_timestamp(value: &str, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|_| RepoError::InvalidData(format!("invalid timestamp `{value}` in {column}")))
}
