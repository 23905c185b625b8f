use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

// ============================================================================
// Domain Models
// ============================================================================

/// An immutable fact about a license/device interaction.
///
/// Events are created exclusively through [`EventStore::append`] and never
/// updated or deleted afterwards; `id` is assigned by storage and stable.
///
/// [`EventStore::append`]: crate::store::EventStore::append
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    /// Storage-assigned primary key. Internal; not serialized.
    #[serde(skip)]
    pub id: i64,
    #[serde(rename = "name")]
    pub device_name: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Vocabulary-mapped name of the stored type code. Read-side only:
    /// the append path sources the type column from its explicit code
    /// argument and ignores this field.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(rename = "id")]
    pub device_id: Option<String>,
    /// Owning license status record. Internal; not serialized.
    #[serde(skip)]
    pub license_status_id: i64,
}

/// Projection of a registration event: one device as seen at the time it
/// registered. Never stored; always computed from the event log.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Device {
    #[serde(rename = "id")]
    pub device_id: Option<String>,
    #[serde(rename = "name")]
    pub device_name: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// A license status identifier paired with the devices registered to it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RegisteredDevicesList {
    pub id: String,
    pub devices: Vec<Device>,
}
