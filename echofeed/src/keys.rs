/// Key-construction helpers shared by the store layer.
///
/// Every key is namespaced under a caller-chosen prefix so multiple
/// deployments (and tests) can share one Redis instance.
#[derive(Debug, Clone)]
pub struct KeyContext {
    prefix: String,
}

impl KeyContext {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// JSON document key.
    pub fn entity(&self, collection: &str, entity_id: &str) -> String {
        format!("{}:{}:{}", self.prefix, collection, entity_id)
    }

    /// Reaction set key (upvotes, downvotes, likes, followers, following).
    pub fn reaction(&self, collection: &str, field: &str, entity_id: &str) -> String {
        format!("{}:{}:rx:{}:{}", self.prefix, collection, field, entity_id)
    }

    /// Sorted-set recency index for a collection, scored by creation time.
    pub fn index(&self, collection: &str) -> String {
        format!("{}:{}:by_created", self.prefix, collection)
    }

    /// Recency index partitioned by an owning entity (notifications per recipient).
    pub fn partitioned_index(&self, collection: &str, partition: &str) -> String {
        format!("{}:{}:by_created:{}", self.prefix, collection, partition)
    }

    /// Unique-value claim key. The stored value is the owning entity id.
    /// Values are lowercased so claims are case-insensitive.
    pub fn unique(&self, collection: &str, field: &str, value: &str) -> String {
        format!("{}:{}:unique:{}:{}", self.prefix, collection, field, value.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_entity_keys() {
        let ctx = KeyContext::new("echo");
        assert_eq!(ctx.entity("posts", "abc"), "echo:posts:abc");
    }

    #[test]
    fn builds_reaction_and_index_keys() {
        let ctx = KeyContext::new("echo");
        assert_eq!(ctx.reaction("posts", "upvotes", "abc"), "echo:posts:rx:upvotes:abc");
        assert_eq!(ctx.index("posts"), "echo:posts:by_created");
        assert_eq!(
            ctx.partitioned_index("notifications", "u1"),
            "echo:notifications:by_created:u1"
        );
    }

    #[test]
    fn unique_keys_are_case_insensitive() {
        let ctx = KeyContext::new("echo");
        assert_eq!(
            ctx.unique("users", "username", "Alice"),
            ctx.unique("users", "username", "alice")
        );
    }
}
