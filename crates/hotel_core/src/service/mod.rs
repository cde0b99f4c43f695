//! Domain services.
//!
//! # Responsibility
//! - Validate input from declarative field rules before persistence.
//! - Convert repository absence into explicit not-found errors.
//! - Keep callers decoupled from the storage backend.

pub mod entity_service;
pub mod validation;
