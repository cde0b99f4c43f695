//! Guest domain model.
//!
//! # Invariants
//! - `first_name`, `last_name` and `email` are always set.
//! - `phone`, `room_n` and `cleaned_at` are nullable.
//! - `room_n` is a weak reference to a room number; it is never checked.

use super::schema::{FieldKind, FieldRule};
use super::{present, Entity, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which fields a guest create payload must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GuestCreatePolicy {
    /// Only `first_name`, `last_name` and `email` are required.
    #[default]
    Lenient,
    /// All six guest fields are required.
    Strict,
}

impl GuestCreatePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lenient => "lenient",
            Self::Strict => "strict",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "lenient" => Some(Self::Lenient),
            "strict" => Some(Self::Strict),
            _ => None,
        }
    }

    /// Field rules applied to guest payloads under this policy.
    pub fn field_rules(self) -> &'static [FieldRule] {
        match self {
            Self::Lenient => GUEST_FIELDS,
            Self::Strict => GUEST_FIELDS_STRICT,
        }
    }
}

/// Stored guest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guest {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub room_n: Option<String>,
    pub cleaned_at: Option<DateTime<Utc>>,
}

/// Create payload for a guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGuest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub room_n: Option<String>,
    #[serde(default)]
    pub cleaned_at: Option<DateTime<Utc>>,
}

impl NewGuest {
    /// Creates a payload with only the always-required fields set.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: None,
            room_n: None,
            cleaned_at: None,
        }
    }
}

/// Merge patch for a guest.
///
/// Nullable fields use `Option<Option<_>>`: `None` leaves the stored value,
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuestPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub room_n: Option<Option<String>>,
    #[serde(deserialize_with = "present")]
    pub cleaned_at: Option<Option<DateTime<Utc>>>,
}

const PHONE: FieldRule = FieldRule::optional("phone", FieldKind::Text);
const ROOM_N: FieldRule = FieldRule::optional("room_n", FieldKind::Text);
const CLEANED_AT: FieldRule = FieldRule::optional("cleaned_at", FieldKind::Timestamp);

const GUEST_FIELDS: &[FieldRule] = &[
    FieldRule::required("first_name", FieldKind::Text),
    FieldRule::required("last_name", FieldKind::Text),
    FieldRule::required("email", FieldKind::Text),
    PHONE,
    ROOM_N,
    CLEANED_AT,
];

const GUEST_FIELDS_STRICT: &[FieldRule] = &[
    FieldRule::required("first_name", FieldKind::Text),
    FieldRule::required("last_name", FieldKind::Text),
    FieldRule::required("email", FieldKind::Text),
    PHONE.required_on_create(),
    ROOM_N.required_on_create(),
    CLEANED_AT.required_on_create(),
];

impl Entity for Guest {
    type Draft = NewGuest;
    type Patch = GuestPatch;

    const NAME: &'static str = "guest";
    const COLLECTION: &'static str = "guests";
    const FIELD_RULES: &'static [FieldRule] = GUEST_FIELDS;

    fn id(&self) -> EntityId {
        self.id
    }

    fn from_draft(id: EntityId, draft: NewGuest) -> Self {
        Self {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            room_n: draft.room_n,
            cleaned_at: draft.cleaned_at,
        }
    }

    fn apply_patch(&mut self, patch: &GuestPatch) {
        if let Some(first_name) = &patch.first_name {
            self.first_name = first_name.clone();
        }
        if let Some(last_name) = &patch.last_name {
            self.last_name = last_name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
        if let Some(phone) = &patch.phone {
            self.phone = phone.clone();
        }
        if let Some(room_n) = &patch.room_n {
            self.room_n = room_n.clone();
        }
        if let Some(cleaned_at) = patch.cleaned_at {
            self.cleaned_at = cleaned_at;
        }
    }
}
