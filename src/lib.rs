//! Append-only persistence for license-status events.
//!
//! Records state-changing events (registration, renewal, return, revocation)
//! against a license status record and derives two read-models from the log:
//! the most recent status of a device and the listing of devices registered
//! to a license.
//!
//! The log is backed by a single SQLite table reached through a shared
//! [`sqlx::SqlitePool`]; the status-code vocabulary is owned elsewhere and
//! injected as a [`StatusVocabulary`].

pub mod error;
pub mod models;
pub mod store;
pub mod vocabulary;

pub use error::Error;
pub use models::{Device, Event, RegisteredDevicesList};
pub use store::{EventStore, StoreConfig};
pub use vocabulary::StatusVocabulary;
