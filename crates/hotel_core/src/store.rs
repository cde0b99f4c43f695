//! Process-wide store owning the configured backend.
//!
//! # Responsibility
//! - Open the JSON data directory or the SQLite database once.
//! - Hand out repositories and services that borrow from the store.
//!
//! # Invariants
//! - There is no ambient state: every repository reaches storage through a
//!   `HotelStore` reference.
//! - SQLite stores are migrated before the first repository is built.

use crate::config::{BackendKind, StoreConfig};
use crate::db::{open_db, open_db_in_memory};
use crate::model::booking::Booking;
use crate::model::guest::{Guest, GuestCreatePolicy};
use crate::model::room::Room;
use crate::repo::{
    JsonFileRepository, RepoError, RepoResult, Repository, SqlRecord, SqliteRepository,
};
use crate::service::entity_service::{BookingService, GuestService, RoomService};
use log::info;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// SQLite database file name inside the data directory.
pub const SQLITE_FILE_NAME: &str = "hotel.sqlite3";

/// Repository handle borrowed from a store.
pub type StoreRepository<'store, E> = Box<dyn Repository<E> + 'store>;

enum Backend {
    Json { data_dir: PathBuf },
    Sqlite { conn: Connection },
}

/// Owner of the storage backend for one process.
pub struct HotelStore {
    backend: Backend,
    guest_policy: GuestCreatePolicy,
}

impl HotelStore {
    /// Opens the backend described by `config`, creating the data directory.
    pub fn open(config: &StoreConfig) -> RepoResult<Self> {
        std::fs::create_dir_all(&config.data_dir).map_err(|source| RepoError::Io {
            path: config.data_dir.clone(),
            source,
        })?;

        let backend = match config.backend {
            BackendKind::Json => Backend::Json {
                data_dir: config.data_dir.clone(),
            },
            BackendKind::Sqlite => Backend::Sqlite {
                conn: open_db(config.data_dir.join(SQLITE_FILE_NAME))?,
            },
        };

        info!(
            "event=store_open module=store status=ok backend={} data_dir={} guest_policy={}",
            config.backend.as_str(),
            config.data_dir.display(),
            config.guest_policy.as_str()
        );
        Ok(Self {
            backend,
            guest_policy: config.guest_policy,
        })
    }

    /// Opens a throwaway in-memory SQLite store.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self {
            backend: Backend::Sqlite {
                conn: open_db_in_memory()?,
            },
            guest_policy: GuestCreatePolicy::default(),
        })
    }

    pub fn backend_kind(&self) -> BackendKind {
        match self.backend {
            Backend::Json { .. } => BackendKind::Json,
            Backend::Sqlite { .. } => BackendKind::Sqlite,
        }
    }

    /// Data directory for JSON stores.
    pub fn data_dir(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Json { data_dir } => Some(data_dir),
            Backend::Sqlite { .. } => None,
        }
    }

    /// Builds the repository for entity `E` on this store's backend.
    pub fn repository<E: SqlRecord + 'static>(&self) -> RepoResult<StoreRepository<'_, E>> {
        match &self.backend {
            Backend::Json { data_dir } => Ok(Box::new(JsonFileRepository::<E>::in_dir(data_dir))),
            Backend::Sqlite { conn } => Ok(Box::new(SqliteRepository::<E>::try_new(conn)?)),
        }
    }

    /// Guest service honoring the configured create policy.
    pub fn guests(&self) -> RepoResult<GuestService<StoreRepository<'_, Guest>>> {
        Ok(GuestService::with_policy(
            self.repository::<Guest>()?,
            self.guest_policy,
        ))
    }

    pub fn rooms(&self) -> RepoResult<RoomService<StoreRepository<'_, Room>>> {
        Ok(RoomService::new(self.repository::<Room>()?))
    }

    pub fn bookings(&self) -> RepoResult<BookingService<StoreRepository<'_, Booking>>> {
        Ok(BookingService::new(self.repository::<Booking>()?))
    }
}
