use std::collections::HashSet;
use std::marker::PhantomData;

use redis::aio::ConnectionManager;
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::StoreError;
use crate::keys::KeyContext;
use crate::model::Document;
use crate::store::{VoteDirection, VoteStatus, decode_reply, scripts};

/// Type-safe handle for one document collection.
///
/// Handles are cheap to create; each one clones the shared connection
/// manager, so methods take `&mut self` without contending on a lock.
pub struct Collection<T> {
    conn: ConnectionManager,
    keys: KeyContext,
    _marker: PhantomData<T>,
}

impl<T: Document> Collection<T> {
    pub(crate) fn new(conn: ConnectionManager, keys: KeyContext) -> Self {
        Self {
            conn,
            keys,
            _marker: PhantomData,
        }
    }

    pub fn entity_key(&self, entity_id: &str) -> String {
        self.keys.entity(T::COLLECTION, entity_id)
    }

    pub fn reaction_key(&self, field: &str, entity_id: &str) -> String {
        self.keys.reaction(T::COLLECTION, field, entity_id)
    }

    fn index_key(&self, partition: Option<&str>) -> String {
        match partition {
            Some(p) => self.keys.partitioned_index(T::COLLECTION, p),
            None => self.keys.index(T::COLLECTION),
        }
    }

    /// Read one document. Reaction sets are not filled in; use
    /// [`Collection::get_with_reactions`] when membership matters.
    pub async fn get(&mut self, entity_id: &str) -> Result<Option<T>, StoreError> {
        let key = self.entity_key(entity_id);
        let raw: Option<String> = redis::cmd("JSON.GET").arg(&key).query_async(&mut self.conn).await?;
        match raw {
            Some(json) => {
                let value = serde_json::from_str::<T>(&json)
                    .map_err(|err| StoreError::other(format!("failed to deserialize entity: {err}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    pub async fn get_or_error(&mut self, entity_id: &str) -> Result<T, StoreError> {
        self.get(entity_id).await?.ok_or_else(|| StoreError::NotFound {
            entity_id: Some(entity_id.to_string()),
        })
    }

    /// Read one document and populate its reaction set fields.
    pub async fn get_with_reactions(&mut self, entity_id: &str) -> Result<Option<T>, StoreError> {
        let Some(mut doc) = self.get(entity_id).await? else {
            return Ok(None);
        };
        for field in T::REACTION_FIELDS {
            let members = self.set_members(entity_id, field).await?;
            doc.set_reaction_members(field, members.into_iter().collect());
        }
        Ok(Some(doc))
    }

    /// Create a new document and register it in the recency index.
    pub async fn create(&mut self, doc: &T) -> Result<(), StoreError> {
        self.create_inner(doc, None).await
    }

    /// Create a document while atomically claiming a unique field value
    /// (e.g. a username). Fails with `UniqueConstraintViolation` when
    /// the value belongs to another entity.
    pub async fn create_unique(&mut self, doc: &T, field: &str, value: &str) -> Result<(), StoreError> {
        self.create_inner(doc, Some((field, value))).await
    }

    async fn create_inner(&mut self, doc: &T, unique: Option<(&str, &str)>) -> Result<(), StoreError> {
        let json = serde_json::to_string(doc)
            .map_err(|err| StoreError::other(format!("failed to serialize entity: {err}")))?;
        let score = doc.created_at().timestamp_millis();

        let mut invocation = scripts::DOCUMENT_CREATE_SCRIPT.prepare_invoke();
        invocation
            .key(self.entity_key(doc.id()))
            .key(self.index_key(doc.index_partition()));
        if let Some((field, value)) = unique {
            invocation.key(self.keys.unique(T::COLLECTION, field, value));
        }
        invocation.arg(doc.id()).arg(json).arg(score);
        if let Some((field, value)) = unique {
            invocation.arg(field).arg(value);
        }

        let raw: String = invocation.invoke_async(&mut self.conn).await?;
        decode_reply(&raw)?;
        debug!(collection = T::COLLECTION, id = doc.id(), "created document");
        Ok(())
    }

    /// Delete a document together with its index entry and reaction sets.
    pub async fn delete(&mut self, entity_id: &str) -> Result<(), StoreError> {
        let doc = self.get_or_error(entity_id).await?;

        let mut invocation = scripts::DOCUMENT_DELETE_SCRIPT.prepare_invoke();
        invocation
            .key(self.entity_key(entity_id))
            .key(self.index_key(doc.index_partition()));
        for field in T::REACTION_FIELDS {
            invocation.key(self.reaction_key(field, entity_id));
        }
        invocation.arg(entity_id);

        let raw: String = invocation.invoke_async(&mut self.conn).await?;
        decode_reply(&raw)?;
        debug!(collection = T::COLLECTION, id = entity_id, "deleted document");
        Ok(())
    }

    /// Version-guarded field patch. Passing `expected_version: None`
    /// skips the guard (used for fields nobody edits concurrently, such
    /// as a notification's read flag). Returns the new version.
    pub async fn patch(
        &mut self,
        entity_id: &str,
        expected_version: Option<i64>,
        fields: Map<String, Value>,
    ) -> Result<i64, StoreError> {
        let expected = expected_version.map(|v| v.to_string()).unwrap_or_default();

        let mut invocation = scripts::DOCUMENT_PATCH_SCRIPT.prepare_invoke();
        invocation.key(self.entity_key(entity_id)).arg(entity_id).arg(expected);
        // Field values travel pre-encoded and are written through
        // untouched, so empty arrays stay arrays.
        for (name, value) in &fields {
            let encoded = serde_json::to_string(value)
                .map_err(|err| StoreError::other(format!("failed to serialize patch: {err}")))?;
            invocation.arg(name).arg(encoded);
        }

        let raw: String = invocation.invoke_async(&mut self.conn).await?;
        let reply = decode_reply(&raw)?;
        Ok(reply.get("version").and_then(Value::as_i64).unwrap_or_default())
    }

    /// Atomic username-style rename: claims the new unique value,
    /// releases the old one, and rewrites the field, all under the
    /// version guard.
    pub async fn rename_unique(
        &mut self,
        entity_id: &str,
        expected_version: i64,
        field: &str,
        old_value: &str,
        new_value: &str,
    ) -> Result<i64, StoreError> {
        let raw: String = scripts::USERNAME_RENAME_SCRIPT
            .key(self.entity_key(entity_id))
            .key(self.keys.unique(T::COLLECTION, field, new_value))
            .key(self.keys.unique(T::COLLECTION, field, old_value))
            .arg(entity_id)
            .arg(new_value)
            .arg(expected_version)
            .invoke_async(&mut self.conn)
            .await?;
        let reply = decode_reply(&raw)?;
        Ok(reply.get("version").and_then(Value::as_i64).unwrap_or_default())
    }

    /// Newest documents first, one bounded page from the global index.
    pub async fn recent(&mut self, limit: usize) -> Result<Vec<T>, StoreError> {
        let index = self.index_key(None);
        self.read_page(&index, limit).await
    }

    /// Newest documents first from a partitioned index (e.g. one
    /// recipient's notifications).
    pub async fn recent_in(&mut self, partition: &str, limit: usize) -> Result<Vec<T>, StoreError> {
        let index = self.index_key(Some(partition));
        self.read_page(&index, limit).await
    }

    async fn read_page(&mut self, index_key: &str, limit: usize) -> Result<Vec<T>, StoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = redis::cmd("ZREVRANGE")
            .arg(index_key)
            .arg(0)
            .arg(limit as isize - 1)
            .query_async(&mut self.conn)
            .await?;
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        for id in &ids {
            pipe.cmd("JSON.GET").arg(self.entity_key(id));
        }
        let raw: Vec<Option<String>> = pipe.query_async(&mut self.conn).await?;

        // Index entries whose document vanished mid-read are skipped.
        let mut docs = Vec::with_capacity(raw.len());
        for json in raw.into_iter().flatten() {
            let doc = serde_json::from_str::<T>(&json)
                .map_err(|err| StoreError::other(format!("failed to deserialize entity: {err}")))?;
            docs.push(doc);
        }
        Ok(docs)
    }

    pub async fn set_members(&mut self, entity_id: &str, field: &str) -> Result<HashSet<String>, StoreError> {
        let key = self.reaction_key(field, entity_id);
        let members: Vec<String> = redis::cmd("SMEMBERS").arg(&key).query_async(&mut self.conn).await?;
        Ok(members.into_iter().collect())
    }

    pub async fn set_size(&mut self, entity_id: &str, field: &str) -> Result<u64, StoreError> {
        let key = self.reaction_key(field, entity_id);
        let size: u64 = redis::cmd("SCARD").arg(&key).query_async(&mut self.conn).await?;
        Ok(size)
    }

    pub async fn set_contains(&mut self, entity_id: &str, field: &str, member: &str) -> Result<bool, StoreError> {
        let key = self.reaction_key(field, entity_id);
        let found: bool = redis::cmd("SISMEMBER")
            .arg(&key)
            .arg(member)
            .query_async(&mut self.conn)
            .await?;
        Ok(found)
    }

    /// Atomic membership flip. Returns whether the member is present
    /// afterwards.
    pub async fn toggle_set_member(&mut self, entity_id: &str, field: &str, member: &str) -> Result<bool, StoreError> {
        let raw: String = scripts::SET_TOGGLE_SCRIPT
            .key(self.reaction_key(field, entity_id))
            .arg(member)
            .invoke_async(&mut self.conn)
            .await?;
        let reply = decode_reply(&raw)?;
        Ok(reply.get("member").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Atomic mutually-exclusive vote toggle across the upvote and
    /// downvote sets.
    pub async fn toggle_vote(
        &mut self,
        entity_id: &str,
        actor_id: &str,
        direction: VoteDirection,
    ) -> Result<VoteStatus, StoreError> {
        let raw: String = scripts::VOTE_TOGGLE_SCRIPT
            .key(self.reaction_key(crate::model::UPVOTES, entity_id))
            .key(self.reaction_key(crate::model::DOWNVOTES, entity_id))
            .arg(actor_id)
            .arg(direction.as_arg())
            .invoke_async(&mut self.conn)
            .await?;
        let reply = decode_reply(&raw)?;
        Ok(VoteStatus {
            upvoted: reply.get("upvoted").and_then(Value::as_bool).unwrap_or(false),
            downvoted: reply.get("downvoted").and_then(Value::as_bool).unwrap_or(false),
        })
    }

    /// Append one element to a JSON array field (embedded comments).
    /// The append itself is a single atomic command.
    pub async fn append_array<V: serde::Serialize>(
        &mut self,
        entity_id: &str,
        path: &str,
        value: &V,
    ) -> Result<(), StoreError> {
        let key = self.entity_key(entity_id);
        let exists: bool = redis::cmd("EXISTS").arg(&key).query_async(&mut self.conn).await?;
        if !exists {
            return Err(StoreError::NotFound {
                entity_id: Some(entity_id.to_string()),
            });
        }
        let json = serde_json::to_string(value)
            .map_err(|err| StoreError::other(format!("failed to serialize element: {err}")))?;
        let _: redis::Value = redis::cmd("JSON.ARRAPPEND")
            .arg(&key)
            .arg(format!("$.{path}"))
            .arg(json)
            .query_async(&mut self.conn)
            .await?;
        Ok(())
    }

    /// Atomically increment a numeric JSON field (the share counter).
    /// Returns the new value.
    pub async fn increment(&mut self, entity_id: &str, path: &str) -> Result<i64, StoreError> {
        let key = self.entity_key(entity_id);
        let raw: String = redis::cmd("JSON.NUMINCRBY")
            .arg(&key)
            .arg(format!("$.{path}"))
            .arg(1)
            .query_async(&mut self.conn)
            .await?;
        let values: Vec<i64> = serde_json::from_str(&raw)
            .map_err(|err| StoreError::other(format!("failed to parse counter reply: {err}")))?;
        values
            .first()
            .copied()
            .ok_or_else(|| StoreError::other("counter path missing"))
    }
}
