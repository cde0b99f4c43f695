//! Repository layer: one CRUD contract, one implementation per backend.
//!
//! # Responsibility
//! - Own id assignment, record (de)serialization and merge-update semantics.
//! - Keep JSON-file and SQLite details behind `Repository<E>`.
//!
//! # Invariants
//! - New ids are `max(existing ids) + 1`, or `1` for an empty collection.
//! - Ids are never reused: a deleted maximum stays retired.
//! - A missing id is reported as `None`/`false`, never as an error.
//! - Updates merge over a fresh read of the stored record.
//! - Repositories only fail with `RepoError` (storage failures); validation
//!   and not-found errors belong to the service layer.

use crate::db::DbError;
use crate::model::{Entity, EntityId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_repo;
pub mod sql_record;
pub mod sqlite_repo;

pub use json_repo::JsonFileRepository;
pub use sql_record::SqlRecord;
pub use sqlite_repo::SqliteRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence error raised by any repository backend.
#[derive(Debug)]
pub enum RepoError {
    /// SQLite failure.
    Db(DbError),
    /// Reading or writing a collection document failed.
    Io { path: PathBuf, source: std::io::Error },
    /// A collection document is not valid JSON for its record type.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// Persisted data cannot be converted to a valid record.
    InvalidData(String),
    /// Connection schema version does not match this binary.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Required column is missing from expected table.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "invalid collection document {}: {source}", path.display())
            }
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => write!(
                f,
                "repository requires column `{column}` in table `{table}`"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidData(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::MissingRequiredTable(_) => None,
            Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Uniform CRUD contract over one entity collection.
pub trait Repository<E: Entity> {
    /// Returns every record in storage-native order.
    fn list(&self) -> RepoResult<Vec<E>>;
    /// Returns `None` when no record has `id`.
    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E>>;
    /// Assigns the next id, persists, and returns the stored record.
    fn create(&self, draft: &E::Draft) -> RepoResult<E>;
    /// Merges `patch` over the stored record; `None` when `id` is unknown.
    fn update(&self, id: EntityId, patch: &E::Patch) -> RepoResult<Option<E>>;
    /// Returns `false` when no record had `id`.
    fn delete(&self, id: EntityId) -> RepoResult<bool>;
}

impl<E: Entity, R: Repository<E> + ?Sized> Repository<E> for Box<R> {
    fn list(&self) -> RepoResult<Vec<E>> {
        (**self).list()
    }

    fn get_by_id(&self, id: EntityId) -> RepoResult<Option<E>> {
        (**self).get_by_id(id)
    }

    fn create(&self, draft: &E::Draft) -> RepoResult<E> {
        (**self).create(draft)
    }

    fn update(&self, id: EntityId, patch: &E::Patch) -> RepoResult<Option<E>> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: EntityId) -> RepoResult<bool> {
        (**self).delete(id)
    }
}

/// Next id after `high_water`, the largest id ever assigned (0 when none).
pub(crate) fn next_id(high_water: EntityId) -> RepoResult<EntityId> {
    high_water
        .max(0)
        .checked_add(1)
        .ok_or_else(|| RepoError::InvalidData("id space exhausted".to_string()))
}

#[cfg(test)]
mod tests {
    use super::{next_id, RepoError};
    use crate::model::EntityId;

    #[test]
    fn next_id_starts_at_one() {
        assert_eq!(next_id(0).unwrap(), 1);
    }

    #[test]
    fn next_id_follows_high_water_mark() {
        assert_eq!(next_id(7).unwrap(), 8);
    }

    #[test]
    fn next_id_reports_exhausted_id_space() {
        let err = next_id(EntityId::MAX).unwrap_err();
        assert!(matches!(err, RepoError::InvalidData(message) if message == "id space exhausted"));
    }
}
