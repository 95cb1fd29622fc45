//! Document shapes for the four store collections.
//!
//! Reaction sets (upvotes, downvotes, likes, followers, following) are
//! not serialized inside the documents; they live in native Redis sets
//! next to each document and are filled in on read. `#[serde(default)]`
//! keeps the document JSON free of empty arrays.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const POSTS: &str = "posts";
pub const VIDEOS: &str = "videos";
pub const USERS: &str = "users";
pub const NOTIFICATIONS: &str = "notifications";

/// Reaction set field names, shared between the engine and the store keys.
pub const UPVOTES: &str = "upvotes";
pub const DOWNVOTES: &str = "downvotes";
pub const LIKES: &str = "likes";
pub const FOLLOWERS: &str = "followers";
pub const FOLLOWING: &str = "following";

/// A document stored in one of the named collections.
pub trait Document: Serialize + serde::de::DeserializeOwned {
    const COLLECTION: &'static str;
    /// Reaction set fields removed together with the document.
    const REACTION_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;

    /// Partition for the recency index. Collections read per-owner
    /// (notifications per recipient) return the owner id; feed
    /// collections return `None` and share one global index.
    fn index_partition(&self) -> Option<&str> {
        None
    }

    /// Fill one reaction field from its stored set. Documents without
    /// reaction fields ignore the call.
    fn set_reaction_members(&mut self, _field: &str, _members: Vec<String>) {}
}

/// Optional donation handles attached to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

/// A comment embedded in a post or video, insertion-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_avatar_url: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,

    pub author_id: String,
    pub author_name: String,
    pub author_avatar_url: String,

    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donations: Option<Donations>,
    #[serde(default)]
    pub verified: bool,

    /// Filled from the reaction sets on read; never serialized.
    #[serde(skip)]
    pub upvotes: Vec<String>,
    #[serde(skip)]
    pub downvotes: Vec<String>,
}

impl Document for Post {
    const COLLECTION: &'static str = POSTS;
    const REACTION_FIELDS: &'static [&'static str] = &[UPVOTES, DOWNVOTES];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_reaction_members(&mut self, field: &str, members: Vec<String>) {
        match field {
            UPVOTES => self.upvotes = members,
            DOWNVOTES => self.downvotes = members,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,

    pub author_id: String,
    pub author_name: String,
    pub author_avatar_url: String,

    pub media_url: String,
    pub caption: String,
    pub song: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Best-effort monotonic counter; re-shares by the same user count again.
    #[serde(default)]
    pub shares: i64,
    #[serde(default)]
    pub verified: bool,

    #[serde(skip)]
    pub likes: Vec<String>,
}

impl Document for Video {
    const COLLECTION: &'static str = VIDEOS;
    const REACTION_FIELDS: &'static [&'static str] = &[LIKES];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_reaction_members(&mut self, field: &str, members: Vec<String>) {
        if field == LIKES {
            self.likes = members;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Identity-provider user id.
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub version: i64,

    /// Unique, mutable; claimed through the username unique index.
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,

    /// Append-only in practice.
    #[serde(default)]
    pub unlocked_achievements: Vec<String>,
    /// Ordered subset of `unlocked_achievements`, at most five entries.
    #[serde(default)]
    pub displayed_badges: Vec<String>,

    #[serde(skip)]
    pub followers: Vec<String>,
    #[serde(skip)]
    pub following: Vec<String>,
}

impl Document for UserProfile {
    const COLLECTION: &'static str = USERS;
    const REACTION_FIELDS: &'static [&'static str] = &[FOLLOWERS, FOLLOWING];

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn set_reaction_members(&mut self, field: &str, members: Vec<String>) {
        match field {
            FOLLOWERS => self.followers = members,
            FOLLOWING => self.following = members,
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Follow,
    Comment,
    Upvote,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub created_at: DateTime<Utc>,

    pub recipient_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub sender_avatar_url: String,

    pub kind: NotificationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_title: Option<String>,
    #[serde(default)]
    pub read: bool,
}

impl Document for Notification {
    const COLLECTION: &'static str = NOTIFICATIONS;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn index_partition(&self) -> Option<&str> {
        Some(&self.recipient_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaction_fields_stay_out_of_document_json() {
        let post = Post {
            id: "p1".into(),
            created_at: Utc::now(),
            version: 1,
            author_id: "u1".into(),
            author_name: "alice".into(),
            author_avatar_url: String::new(),
            title: "t".into(),
            body: "b".into(),
            image_url: None,
            tags: vec![],
            comments: vec![],
            donations: None,
            verified: false,
            upvotes: vec!["u2".into()],
            downvotes: vec![],
        };
        let json = serde_json::to_value(&post).expect("serialize");
        assert!(json.get("upvotes").is_none());
        assert!(json.get("downvotes").is_none());
        assert!(json.get("image_url").is_none());
    }

    #[test]
    fn notification_kind_uses_snake_case_tags() {
        let kind = serde_json::to_string(&NotificationKind::Upvote).expect("serialize");
        assert_eq!(kind, "\"upvote\"");
    }
}
