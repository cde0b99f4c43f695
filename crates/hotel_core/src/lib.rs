//! Core domain logic for the hotel backend.
//!
//! Guests, rooms and bookings share one repository contract with two
//! interchangeable backends (JSON files, SQLite) and one validating service.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{BackendKind, ConfigError, LoggingConfig, StoreConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::booking::{Booking, BookingPatch, BookingStatus, NewBooking};
pub use model::guest::{Guest, GuestCreatePolicy, GuestPatch, NewGuest};
pub use model::room::{NewRoom, Room, RoomPatch, RoomStatus};
pub use model::{Entity, EntityId};
pub use repo::{
    JsonFileRepository, RepoError, RepoResult, Repository, SqlRecord, SqliteRepository,
};
pub use service::entity_service::{
    BookingService, EntityService, GuestService, RoomService, ServiceError, ServiceResult,
};
pub use store::HotelStore;

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
