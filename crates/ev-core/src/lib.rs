//! ev-core - Core library for evstore
//!
//! This crate provides the event domain types, the external identifier
//! newtype and generator capability, and YAML configuration shared by the
//! storage layer.

pub mod config;
pub mod error;
pub mod event;
pub mod external_id;

pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use event::{Event, EventCreate};
pub use external_id::{ExternalId, ExternalIdGenerator, UuidV4Generator};
