//! User and customer persistence.
//!
//! `domain` holds the entities and the store ports; `outbound` provides an
//! in-memory adapter and Diesel-backed PostgreSQL adapters; `config` loads
//! the connection settings.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::StoreSettings;
