use futures_util::stream::BoxStream;
use futures_util::{StreamExt, TryStreamExt};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::error::Error;
use crate::models::{Device, Event, RegisteredDevicesList};
use crate::store::config::StoreConfig;
use crate::vocabulary::StatusVocabulary;

// ============================================================================
// Event Store - Append-Only License Event Log
// ============================================================================
//
// Responsibilities:
// 1. Append events to the event table (append-only, storage-assigned ids)
// 2. Point lookup by event id
// 3. Per-license event history as a lazy stream
// 4. Device status (most recent event wins)
// 5. Registered-device listing (one entry per registration event)
//
// Queries are built per call and cached by the pool's prepared-statement
// cache; the store itself holds no statement state.
//
// ============================================================================

const TABLE_DEF: &str = "CREATE TABLE IF NOT EXISTS event (
    id INTEGER PRIMARY KEY,
    device_name VARCHAR(255) DEFAULT NULL,
    timestamp DATETIME NOT NULL,
    type INT NOT NULL,
    device_id VARCHAR(255) DEFAULT NULL,
    license_status_fk INT NOT NULL )";

pub struct EventStore {
    pool: SqlitePool,
    vocabulary: StatusVocabulary,
}

impl EventStore {
    /// Open the store over an existing pool, creating the event table if it
    /// does not exist yet. Safe to call more than once against the same
    /// database; existing rows are untouched.
    pub async fn open(pool: SqlitePool, vocabulary: StatusVocabulary) -> Result<Self, Error> {
        sqlx::query(TABLE_DEF)
            .execute(&pool)
            .await
            .map_err(Error::Unavailable)?;

        Ok(Self { pool, vocabulary })
    }

    /// Build a pool from config and open the store on it.
    pub async fn connect(config: &StoreConfig, vocabulary: StatusVocabulary) -> Result<Self, Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(Error::Unavailable)?;

        Self::open(pool, vocabulary).await
    }

    /// Fetch a single event by primary key.
    ///
    /// Returns [`Error::NotFound`] when no row matches the id.
    pub async fn get(&self, id: i64) -> Result<Event, Error> {
        let row = sqlx::query(
            "SELECT id, device_name, timestamp, type, device_id, license_status_fk \
             FROM event WHERE id = ?1 LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => self.event_from_row(&row),
            None => Err(Error::NotFound),
        }
    }

    /// Insert one immutable event row and return its storage-assigned id.
    ///
    /// The type column is sourced only from `type_code`; `event.type_name`
    /// is a read-side field and is ignored here. No validation is performed
    /// beyond what the schema enforces; callers supply well-formed
    /// timestamps and a valid type code.
    pub async fn append(&self, event: &Event, type_code: i64) -> Result<i64, Error> {
        let result = sqlx::query(
            "INSERT INTO event (device_name, timestamp, type, device_id, license_status_fk) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(event.device_name.as_deref())
        .bind(event.timestamp)
        .bind(type_code)
        .bind(event.device_id.as_deref())
        .bind(event.license_status_id)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();

        tracing::debug!(
            event_id = id,
            license_status_id = event.license_status_id,
            type_code,
            "appended license event"
        );

        Ok(id)
    }

    /// Lazy, single-pass stream of every event recorded for a license, in
    /// storage-chosen order.
    ///
    /// The query executes on the first poll, so setup failures also surface
    /// on the first poll rather than at creation. Dropping the stream closes
    /// the underlying cursor, drained or not.
    pub fn events_for_license(
        &self,
        license_status_id: i64,
    ) -> BoxStream<'_, Result<Event, Error>> {
        sqlx::query(
            "SELECT id, device_name, timestamp, type, device_id, license_status_fk \
             FROM event WHERE license_status_fk = ?1",
        )
        .bind(license_status_id)
        .fetch(&self.pool)
        .map(move |row| match row {
            Ok(row) => self.event_from_row(&row),
            Err(err) => Err(Error::Storage(err)),
        })
        .boxed()
    }

    /// Most recent action taken by a device against a license: the type of
    /// the latest matching event by timestamp, mapped to its status name.
    ///
    /// Returns [`Error::NotFound`] when the pair has no events at all.
    /// Equal timestamps tie-break however the storage engine orders equal
    /// keys; callers supply sufficiently fine-grained timestamps.
    pub async fn device_status(
        &self,
        license_status_id: i64,
        device_id: &str,
    ) -> Result<String, Error> {
        let code: Option<i64> = sqlx::query_scalar(
            "SELECT type FROM event WHERE license_status_fk = ?1 AND device_id = ?2 \
             ORDER BY timestamp DESC LIMIT 1",
        )
        .bind(license_status_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        match code {
            Some(code) => Ok(self.vocabulary.name(code).unwrap_or_default().to_owned()),
            None => Err(Error::NotFound),
        }
    }

    /// Lazy stream of [`Device`] projections for a license, filtered
    /// server-side to registration events.
    ///
    /// One entry per past registration event: no deduplication, and devices
    /// that later returned or were revoked are still listed. Same stream
    /// contract as [`EventStore::events_for_license`].
    pub fn registered_devices(
        &self,
        license_status_id: i64,
    ) -> BoxStream<'_, Result<Device, Error>> {
        sqlx::query(
            "SELECT device_id, device_name, timestamp FROM event \
             WHERE license_status_fk = ?1 AND type = ?2",
        )
        .bind(license_status_id)
        .bind(self.vocabulary.registered_code())
        .fetch(&self.pool)
        .map(|row| {
            let row = row?;
            Ok(Device {
                device_id: row.try_get("device_id")?,
                device_name: row.try_get("device_name")?,
                timestamp: row.try_get("timestamp")?,
            })
        })
        .boxed()
    }

    /// Drain [`EventStore::registered_devices`] into the caller-facing
    /// listing view.
    pub async fn registered_devices_list(
        &self,
        license_status_id: i64,
    ) -> Result<RegisteredDevicesList, Error> {
        let devices = self.registered_devices(license_status_id).try_collect().await?;

        Ok(RegisteredDevicesList {
            id: license_status_id.to_string(),
            devices,
        })
    }

    fn event_from_row(&self, row: &SqliteRow) -> Result<Event, Error> {
        let code: i64 = row.try_get("type")?;

        Ok(Event {
            id: row.try_get("id")?,
            device_name: row.try_get("device_name")?,
            timestamp: row.try_get("timestamp")?,
            type_name: self.vocabulary.name(code).unwrap_or_default().to_owned(),
            device_id: row.try_get("device_id")?,
            license_status_id: row.try_get("license_status_fk")?,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    async fn memory_store() -> EventStore {
        EventStore::connect(&StoreConfig::in_memory(), StatusVocabulary::default())
            .await
            .expect("open in-memory store")
    }

    fn ts(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, secs).unwrap()
    }

    fn event(license_status_id: i64, device_id: &str, device_name: &str, timestamp: DateTime<Utc>) -> Event {
        Event {
            id: 0,
            device_name: Some(device_name.to_string()),
            timestamp,
            type_name: String::new(),
            device_id: Some(device_id.to_string()),
            license_status_id,
        }
    }

    #[tokio::test]
    async fn append_assigns_an_id_and_get_round_trips_every_field() {
        let store = memory_store().await;

        let appended = event(7, "dev-1", "Kindle", ts(0));
        let id = store.append(&appended, 1).await.unwrap();

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.id, id);
        assert_eq!(fetched.device_name, appended.device_name);
        assert_eq!(fetched.timestamp, appended.timestamp);
        assert_eq!(fetched.device_id, appended.device_id);
        assert_eq!(fetched.license_status_id, appended.license_status_id);
        assert_eq!(fetched.type_name, "register");
    }

    #[tokio::test]
    async fn append_ignores_the_events_type_name() {
        let store = memory_store().await;

        let mut appended = event(7, "dev-1", "Kindle", ts(0));
        appended.type_name = "revoke".to_string();
        let id = store.append(&appended, 2).await.unwrap();

        // The type column came from the code argument, not the field.
        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.type_name, "renew");
    }

    #[tokio::test]
    async fn get_for_a_missing_id_is_not_found() {
        let store = memory_store().await;

        let err = store.get(12345).await.unwrap_err();
        assert!(matches!(err, Error::NotFound));
    }

    #[tokio::test]
    async fn unknown_type_codes_read_back_with_an_empty_name() {
        let store = memory_store().await;

        let id = store.append(&event(7, "dev-1", "Kindle", ts(0)), 99).await.unwrap();

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.type_name, "");
    }

    #[tokio::test]
    async fn opening_twice_keeps_existing_rows() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let store = EventStore::open(pool.clone(), StatusVocabulary::default())
            .await
            .unwrap();
        let id = store.append(&event(7, "dev-1", "Kindle", ts(0)), 1).await.unwrap();

        let reopened = EventStore::open(pool, StatusVocabulary::default())
            .await
            .unwrap();
        let fetched = reopened.get(id).await.unwrap();
        assert_eq!(fetched.device_id, Some("dev-1".to_string()));
    }
}
