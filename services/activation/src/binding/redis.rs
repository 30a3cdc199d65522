//! Redis-backed binding store.
//!
//! `bind_if_absent` runs as one server-side script, so the existence check and
//! the write are atomic across every service instance sharing the database.
//! Requires Redis 6.2+ for `SET ... PXAT`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, RedisError, Script};
use rust_common::PlatformError;
use tracing::debug;

use super::model::{Binding, binding_key};
use super::store::{BindOutcome, BindingStore};

/// KEYS[1] = binding key, ARGV[1] = binding JSON, ARGV[2] = expiry epoch-ms.
/// Returns the existing value, or nil after writing ARGV[1].
const BIND_IF_ABSENT_LUA: &str = r"
local existing = redis.call('GET', KEYS[1])
if existing then
  return existing
end
redis.call('SET', KEYS[1], ARGV[1], 'PXAT', ARGV[2])
return false
";

/// Binding store on a shared Redis database.
pub struct RedisBindingStore {
    conn: ConnectionManager,
    bind_script: Script,
}

impl RedisBindingStore {
    /// Open a multiplexed connection to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the server is unreachable.
    pub async fn connect(redis_url: &str) -> Result<Self, PlatformError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| PlatformError::invalid_input(format!("REDIS_URL: {}", e)))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| map_redis_error("connect", e))?;

        Ok(RedisBindingStore {
            conn,
            bind_script: Script::new(BIND_IF_ABSENT_LUA),
        })
    }

    // The manager multiplexes one connection; clones share it without locking.
    fn connection(&self) -> ConnectionManager {
        self.conn.clone()
    }
}

#[async_trait]
impl BindingStore for RedisBindingStore {
    async fn get(&self, code: &str) -> Result<Option<Binding>, PlatformError> {
        let mut conn = self.connection();
        let value: Option<String> = conn
            .get(binding_key(code))
            .await
            .map_err(|e| map_redis_error("GET", e))?;

        value
            .map(|v| serde_json::from_str(&v).map_err(PlatformError::from))
            .transpose()
    }

    async fn set(&self, code: &str, binding: &Binding) -> Result<(), PlatformError> {
        let mut conn = self.connection();
        let value = serde_json::to_string(binding)?;

        conn.set::<_, _, ()>(binding_key(code), value)
            .await
            .map_err(|e| map_redis_error("SET", e))
    }

    async fn expire_at(&self, code: &str, at: DateTime<Utc>) -> Result<(), PlatformError> {
        let mut conn = self.connection();
        let key = binding_key(code);

        let applied: i64 = redis::cmd("EXPIREAT")
            .arg(&key)
            .arg(at.timestamp())
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("EXPIREAT", e))?;

        if applied == 0 {
            debug!(key = %key, "EXPIREAT on missing key");
        }
        Ok(())
    }

    async fn delete(&self, code: &str) -> Result<bool, PlatformError> {
        let mut conn = self.connection();
        let removed: i64 = conn
            .del(binding_key(code))
            .await
            .map_err(|e| map_redis_error("DEL", e))?;
        Ok(removed > 0)
    }

    async fn bind_if_absent(&self, code: &str, binding: &Binding) -> Result<BindOutcome, PlatformError> {
        let mut conn = self.connection();
        let value = serde_json::to_string(binding)?;

        let existing: Option<String> = self
            .bind_script
            .key(binding_key(code))
            .arg(value)
            .arg(binding.expires_at.timestamp_millis())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("EVALSHA", e))?;

        match existing {
            None => Ok(BindOutcome::Bound),
            Some(raw) => Ok(BindOutcome::Existing(serde_json::from_str(&raw)?)),
        }
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

/// Translate a client error into the platform taxonomy.
fn map_redis_error(operation: &str, err: RedisError) -> PlatformError {
    if err.is_timeout() {
        PlatformError::timeout(format!("redis {}: {}", operation, err))
    } else if err.is_connection_refusal() || err.is_connection_dropped() || err.is_io_error() {
        PlatformError::unavailable(format!("redis {}: {}", operation, err))
    } else if err.kind() == redis::ErrorKind::TypeError {
        PlatformError::unexpected_response("redis", format!("{}: {}", operation, err))
    } else {
        PlatformError::unavailable(format!("redis {}: {}", operation, err))
    }
}
