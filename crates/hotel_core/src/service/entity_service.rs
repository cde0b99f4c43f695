//! Generic entity use-case service.
//!
//! # Responsibility
//! - Validate create/update bodies against the entity's field rules.
//! - Delegate persistence to a `Repository<E>`.
//! - Turn repository absence into `ServiceError::NotFound`.
//!
//! # Invariants
//! - A rejected body never reaches the repository.
//! - Repository errors pass through unchanged as `Persistence`.
//! - No cross-entity checks: booking `guest_id`/`room_id` are not resolved.

use super::validation::{validate_payload, PayloadMode};
use crate::model::booking::Booking;
use crate::model::guest::{Guest, GuestCreatePolicy};
use crate::model::room::Room;
use crate::model::schema::FieldRule;
use crate::model::{Entity, EntityId};
use crate::repo::{RepoError, Repository};
use log::{debug, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced to the controller boundary.
#[derive(Debug)]
pub enum ServiceError {
    /// Bad or missing input; the caller's fault.
    Validation(String),
    /// No record with this id.
    NotFound { entity: &'static str, id: EntityId },
    /// Storage failure.
    Persistence(RepoError),
}

impl ServiceError {
    /// Conventional HTTP status for this error class.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound { .. } => 404,
            Self::Persistence(_) => 500,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Validation gate and not-found translation over one repository.
pub struct EntityService<E: Entity, R: Repository<E>> {
    repo: R,
    rules: &'static [FieldRule],
    _entity: PhantomData<fn() -> E>,
}

pub type GuestService<R> = EntityService<Guest, R>;
pub type RoomService<R> = EntityService<Room, R>;
pub type BookingService<R> = EntityService<Booking, R>;

impl<E: Entity, R: Repository<E>> EntityService<E, R> {
    /// Creates a service using the entity's default field rules.
    pub fn new(repo: R) -> Self {
        Self::with_rules(repo, E::FIELD_RULES)
    }

    /// Creates a service using an explicit field rule table.
    pub fn with_rules(repo: R, rules: &'static [FieldRule]) -> Self {
        Self {
            repo,
            rules,
            _entity: PhantomData,
        }
    }

    pub fn list(&self) -> ServiceResult<Vec<E>> {
        Ok(self.repo.list()?)
    }

    pub fn get_by_id(&self, id: EntityId) -> ServiceResult<E> {
        self.repo
            .get_by_id(id)?
            .ok_or_else(|| self.not_found("get", id))
    }

    /// Validates a JSON body and creates the record.
    ///
    /// # Contract
    /// - Fails with `Validation` before touching storage when a required
    ///   field is missing or any field is malformed.
    /// - Returns the stored record including its assigned id.
    pub fn create(&self, body: &Value) -> ServiceResult<E> {
        let fields = validate_payload(self.rules, body, PayloadMode::Create)
            .map_err(|message| self.rejected("create", message))?;
        let draft: E::Draft = serde_json::from_value(Value::Object(fields))
            .map_err(|err| self.rejected("create", err.to_string()))?;
        Ok(self.repo.create(&draft)?)
    }

    /// Creates a record from a typed payload, applying the same rules.
    pub fn create_from(&self, draft: &E::Draft) -> ServiceResult<E> {
        let body = serde_json::to_value(draft)
            .map_err(|err| self.rejected("create", err.to_string()))?;
        self.create(&body)
    }

    /// Validates a partial JSON body and merges it over record `id`.
    ///
    /// # Contract
    /// - Only keys present in `body` change; `id` in the body is ignored.
    /// - Fails with `NotFound` when no record has `id`.
    pub fn update(&self, id: EntityId, body: &Value) -> ServiceResult<E> {
        let fields = validate_payload(self.rules, body, PayloadMode::Update)
            .map_err(|message| self.rejected("update", message))?;
        let patch: E::Patch = serde_json::from_value(Value::Object(fields))
            .map_err(|err| self.rejected("update", err.to_string()))?;
        self.repo
            .update(id, &patch)?
            .ok_or_else(|| self.not_found("update", id))
    }

    pub fn delete(&self, id: EntityId) -> ServiceResult<()> {
        if self.repo.delete(id)? {
            Ok(())
        } else {
            Err(self.not_found("delete", id))
        }
    }

    fn rejected(&self, operation: &str, message: String) -> ServiceError {
        warn!(
            "event=service_validate module=service entity={} op={} status=rejected reason=\"{}\"",
            E::NAME,
            operation,
            message
        );
        ServiceError::Validation(message)
    }

    fn not_found(&self, operation: &str, id: EntityId) -> ServiceError {
        debug!(
            "event=service_lookup module=service entity={} op={} status=not_found id={}",
            E::NAME,
            operation,
            id
        );
        ServiceError::NotFound {
            entity: E::NAME,
            id,
        }
    }
}

impl<R: Repository<Guest>> EntityService<Guest, R> {
    /// Creates a guest service enforcing the given create policy.
    pub fn with_policy(repo: R, policy: GuestCreatePolicy) -> Self {
        Self::with_rules(repo, policy.field_rules())
    }
}
