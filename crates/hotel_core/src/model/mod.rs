//! Domain model for guests, rooms and bookings.
//!
//! # Responsibility
//! - Define the stored record, create payload and merge patch per entity.
//! - Publish per-entity field rules as data for the service layer.
//!
//! # Invariants
//! - Every record is identified by a repository-assigned `EntityId`.
//! - `Entity::apply_patch` never touches `id`.
//! - Deletion is physical; there are no tombstones.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Debug;

pub mod booking;
pub mod guest;
pub mod room;
pub mod schema;

use schema::FieldRule;

/// Numeric identity assigned by repositories, never by clients.
pub type EntityId = i64;

/// Contract shared by every persisted record type.
///
/// Repositories and services are written once against this trait; each
/// entity only describes its shapes, names and merge rule.
pub trait Entity: Debug + Clone + PartialEq + Serialize + DeserializeOwned {
    /// Every field except `id`, as accepted by `create`.
    type Draft: Debug + Clone + PartialEq + Serialize + DeserializeOwned;
    /// Every field optional, as accepted by `update`.
    type Patch: Debug + Clone + Default + PartialEq + DeserializeOwned;

    /// Singular name used in logs and not-found messages.
    const NAME: &'static str;
    /// Collection key in the JSON document and SQLite table name.
    const COLLECTION: &'static str;
    /// Declarative field rules applied by the service layer.
    const FIELD_RULES: &'static [FieldRule];

    fn id(&self) -> EntityId;

    /// Builds the stored record for a freshly assigned id.
    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;

    /// Overwrites each field present in `patch`, keeping all others.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Deserializes a present key (including `null`) as `Some(..)`.
///
/// Used with `#[serde(default)]` so patches can tell "absent" from "null".
pub(crate) fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
