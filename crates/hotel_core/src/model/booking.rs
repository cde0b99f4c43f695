//! Booking domain model.
//!
//! # Invariants
//! - `status` is always one of `BookingStatus::LITERALS`.
//! - `num_guests` is at least 1.
//! - `guest_id`/`room_id` are referential hints only. Nothing checks that the
//!   referenced guest or room exists, and deleting them does not cascade.
//! - No ordering is enforced between `check_in_date` and `check_out_date`.

use super::schema::{FieldKind, FieldRule};
use super::{Entity, EntityId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Reserved,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

impl BookingStatus {
    pub const LITERALS: &'static [&'static str] =
        &["reserved", "checked_in", "checked_out", "cancelled"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reserved => "reserved",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "reserved" => Some(Self::Reserved),
            "checked_in" => Some(Self::CheckedIn),
            "checked_out" => Some(Self::CheckedOut),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// Stored booking record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub id: EntityId,
    pub guest_id: EntityId,
    pub room_id: EntityId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub num_guests: u32,
    pub status: BookingStatus,
}

/// Create payload for a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBooking {
    pub guest_id: EntityId,
    pub room_id: EntityId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub num_guests: u32,
    pub status: BookingStatus,
}

/// Merge patch for a booking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BookingPatch {
    pub guest_id: Option<EntityId>,
    pub room_id: Option<EntityId>,
    pub check_in_date: Option<NaiveDate>,
    pub check_out_date: Option<NaiveDate>,
    pub num_guests: Option<u32>,
    pub status: Option<BookingStatus>,
}

const BOOKING_FIELDS: &[FieldRule] = &[
    FieldRule::required("guest_id", FieldKind::Integer { min: 1 }),
    FieldRule::required("room_id", FieldKind::Integer { min: 1 }),
    FieldRule::required("check_in_date", FieldKind::Date),
    FieldRule::required("check_out_date", FieldKind::Date),
    FieldRule::required("num_guests", FieldKind::Integer { min: 1 }),
    FieldRule::required("status", FieldKind::Enum(BookingStatus::LITERALS)),
];

impl Entity for Booking {
    type Draft = NewBooking;
    type Patch = BookingPatch;

    const NAME: &'static str = "booking";
    const COLLECTION: &'static str = "bookings";
    const FIELD_RULES: &'static [FieldRule] = BOOKING_FIELDS;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: NewBooking) -> Self {
        Self {
            id,
            guest_id: draft.guest_id,
            room_id: draft.room_id,
            check_in_date: draft.check_in_date,
            check_out_date: draft.check_out_date,
            num_guests: draft.num_guests,
            status: draft.status,
        }
    }

    fn apply_patch(&mut self, patch: &BookingPatch) {
        if let Some(guest_id) = patch.guest_id {
            self.guest_id = guest_id;
        }
        if let Some(room_id) = patch.room_id {
            self.room_id = room_id;
        }
        if let Some(check_in_date) = patch.check_in_date {
            self.check_in_date = check_in_date;
        }
        if let Some(check_out_date) = patch.check_out_date {
            self.check_out_date = check_out_date;
        }
        if let Some(num_guests) = patch.num_guests {
            self.num_guests = num_guests;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}
