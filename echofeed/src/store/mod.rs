//! Document store adapter.
//!
//! Documents are RedisJSON values; reaction fields are native sets next
//! to each document; every collection keeps a sorted-set recency index.
//! Multi-step mutations run as Lua scripts so the read-modify-write
//! happens inside Redis and concurrent actors cannot lose updates.

mod collection;
pub mod scripts;

pub use collection::Collection;

use redis::aio::ConnectionManager;
use serde_json::Value;

use crate::errors::StoreError;
use crate::keys::KeyContext;
use crate::model::{Document, FOLLOWERS, FOLLOWING, USERS, UserProfile};

/// Outcome of an atomic vote toggle, as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteStatus {
    pub upvoted: bool,
    pub downvoted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    pub(crate) fn as_arg(self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }
}

/// Entry point for store operations. Construct once and pass explicitly;
/// nothing in this crate reaches for an ambient connection.
#[derive(Clone)]
pub struct Client {
    conn: ConnectionManager,
    keys: KeyContext,
}

impl Client {
    pub fn new(conn: ConnectionManager, prefix: impl Into<String>) -> Self {
        Self {
            conn,
            keys: KeyContext::new(prefix),
        }
    }

    /// Create a client from a Redis connection URL.
    pub async fn connect(url: &str, prefix: impl Into<String>) -> Result<Self, redis::RedisError> {
        let redis_client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(redis_client).await?;
        Ok(Self::new(conn, prefix))
    }

    /// Typed handle for one collection.
    pub fn collection<T: Document>(&self) -> Collection<T> {
        Collection::new(self.conn.clone(), self.keys.clone())
    }

    pub fn keys(&self) -> &KeyContext {
        &self.keys
    }

    /// Resolve a unique field value (e.g. a username) to the owning
    /// entity id, or `None` if unclaimed.
    pub async fn lookup_unique(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<String>, StoreError> {
        let mut conn = self.conn.clone();
        let key = self.keys.unique(collection, field, value);
        let holder: Option<String> = redis::cmd("GET").arg(&key).query_async(&mut conn).await?;
        Ok(holder)
    }

    /// Atomic symmetric follow toggle across both users' sets. Returns
    /// whether the actor is following the target afterwards.
    pub async fn toggle_follow(&self, actor_id: &str, target_id: &str) -> Result<bool, StoreError> {
        let mut conn = self.conn.clone();
        let following_key = self.keys.reaction(USERS, FOLLOWING, actor_id);
        let followers_key = self.keys.reaction(USERS, FOLLOWERS, target_id);

        let raw: String = scripts::FOLLOW_TOGGLE_SCRIPT
            .key(&following_key)
            .key(&followers_key)
            .arg(actor_id)
            .arg(target_id)
            .invoke_async(&mut conn)
            .await?;
        let reply = decode_reply(&raw)?;
        Ok(reply.get("following").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Whether `actor_id` currently follows `target_id`.
    pub async fn is_following(&self, actor_id: &str, target_id: &str) -> Result<bool, StoreError> {
        self.collection::<UserProfile>()
            .set_contains(actor_id, FOLLOWING, target_id)
            .await
    }
}

/// Decodes a script reply, mapping structured error codes onto
/// [`StoreError`] variants.
pub(crate) fn decode_reply(raw: &str) -> Result<Value, StoreError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|err| StoreError::other(format!("failed to parse lua response: {err}")))?;

    let Some(error) = value.get("error") else {
        return Ok(value);
    };

    let Some(code) = error.as_str() else {
        return Err(StoreError::other("lua_error"));
    };

    match code {
        "version_conflict" => {
            let expected = value.get("expected").and_then(Value::as_i64);
            let actual = value.get("actual").and_then(Value::as_i64);
            Err(StoreError::VersionConflict { expected, actual })
        }
        "entity_not_found" => {
            let entity_id = value
                .get("entity_id")
                .and_then(Value::as_str)
                .map(|s| s.to_string());
            Err(StoreError::NotFound { entity_id })
        }
        "entity_exists" => {
            let entity_id = value.get("entity_id").and_then(Value::as_str).unwrap_or_default();
            Err(StoreError::InvalidRequest {
                message: format!("entity '{entity_id}' already exists"),
            })
        }
        "unique_constraint_violation" => {
            let field = value
                .get("field")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let taken = value
                .get("value")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let existing_entity_id = value
                .get("existing_entity_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Err(StoreError::UniqueConstraintViolation {
                field,
                value: taken,
                existing_entity_id,
            })
        }
        other => Err(StoreError::other(other.to_string())),
    }
}
