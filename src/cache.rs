//! Redis client used for health-check reachability.
//!
//! Session and throttling bookkeeping live entirely in Redis-side
//! infrastructure; the application only needs a connection it can
//! round-trip a value through.

use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::env;
use std::time::Duration;
use tracing::{debug, error};

#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub redis_url: String,
    pub default_ttl_seconds: u64,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            default_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
        }
    }
}

/// Error type for cache operations.
#[derive(Debug)]
pub enum CacheError {
    Connection(redis::RedisError),
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "Redis connection error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::Connection(err)
    }
}

/// Redis cache client backed by a multiplexed connection manager.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
    default_ttl: Duration,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl RedisCache {
    pub async fn new(redis_url: &str, default_ttl: Duration) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn, default_ttl })
    }

    /// Sets a string value with the default TTL.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Sets a string value with an explicit TTL.
    pub async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()).await?;
        debug!(cache.key = %key, "Cache set");
        Ok(())
    }

    /// Gets a string value by key; `None` on miss.
    pub async fn get(&self, key: &str) -> Option<String> {
        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(key).await {
            Ok(value) => value,
            Err(e) => {
                error!(cache.key = %key, error = %e, "Cache get failed");
                None
            }
        }
    }

    /// Write-then-read round-trip used by the health endpoint.
    pub async fn check_reachable(&self) -> bool {
        let key = "health_check";
        if self
            .set_with_ttl(key, "ok", Duration::from_secs(10))
            .await
            .is_err()
        {
            return false;
        }
        self.get(key).await.as_deref() == Some("ok")
    }
}
