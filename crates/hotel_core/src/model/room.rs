//! Room domain model.
//!
//! # Invariants
//! - `status` is always one of `RoomStatus::LITERALS`.
//! - `room_number` and `floor` are kept as text (`"101"`, `"1"`).

use super::schema::{FieldKind, FieldRule};
use super::{Entity, EntityId};
use serde::{Deserialize, Serialize};

/// Occupancy state of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// Ready for a new guest.
    Available,
    /// A guest is staying in the room.
    Occupied,
    /// Out of service.
    Maintenance,
}

impl RoomStatus {
    pub const LITERALS: &'static [&'static str] = &["available", "occupied", "maintenance"];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

/// Stored room record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: EntityId,
    pub room_number: String,
    pub floor: String,
    pub status: RoomStatus,
}

/// Create payload for a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRoom {
    pub room_number: String,
    pub floor: String,
    pub status: RoomStatus,
}

/// Merge patch for a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RoomPatch {
    pub room_number: Option<String>,
    pub floor: Option<String>,
    pub status: Option<RoomStatus>,
}

const ROOM_FIELDS: &[FieldRule] = &[
    FieldRule::required("room_number", FieldKind::Text),
    FieldRule::required("floor", FieldKind::Text),
    FieldRule::required("status", FieldKind::Enum(RoomStatus::LITERALS)),
];

impl Entity for Room {
    type Draft = NewRoom;
    type Patch = RoomPatch;

    const NAME: &'static str = "room";
    const COLLECTION: &'static str = "rooms";
    const FIELD_RULES: &'static [FieldRule] = ROOM_FIELDS;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: NewRoom) -> Self {
        Self {
            id,
            room_number: draft.room_number,
            floor: draft.floor,
            status: draft.status,
        }
    }

    fn apply_patch(&mut self, patch: &RoomPatch) {
        if let Some(room_number) = &patch.room_number {
            self.room_number = room_number.clone();
        }
        if let Some(floor) = &patch.floor {
            self.floor = floor.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}
