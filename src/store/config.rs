use serde::{Deserialize, Serialize};

/// Connection settings for the event store pool.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// sqlx database URL, e.g. `sqlite:license_events.sqlite?mode=rwc`.
    pub database_url: String,
    pub max_connections: u32,
}

impl StoreConfig {
    /// Load settings from the environment, falling back to an on-disk
    /// database next to the process.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("LICENSE_EVENTS_DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:license_events.sqlite?mode=rwc".into()),
            max_connections: std::env::var("LICENSE_EVENTS_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".into())
                .parse()?,
        })
    }

    /// In-memory database for tests and demos. A pooled `:memory:`
    /// connection owns its own database, so the pool is pinned to a single
    /// connection.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            max_connections: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_config_pins_the_pool_to_one_connection() {
        let config = StoreConfig::in_memory();

        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.max_connections, 1);
    }
}
