//! Echofeed core library.
//!
//! Backend-agnostic core for a social feed / short-video application:
//! a pure reaction engine (votes, likes, follows, displayed badges),
//! presentation helpers, feed assembly, a Redis-backed document store
//! adapter, and a one-shot AI reply module.
//!
//! Reaction fields are mutated through atomic server-side set
//! operations rather than read-modify-write array replacement, so
//! concurrent actors on the same document cannot lose updates. Scalar
//! document edits carry an optimistic version guard.

pub mod achievements;
pub mod ai;
pub mod config;
pub mod errors;
pub mod feed;
pub mod id;
pub mod identity;
pub mod keys;
pub mod media;
pub mod model;
pub mod present;
pub mod reaction;
pub mod store;
pub mod workflows;

pub use errors::{StoreError, ValidationError, ValidationIssue};
pub use feed::{DEFAULT_FEED_LIMIT, FeedState, Thread};
pub use model::{Comment, Document, Donations, Notification, NotificationKind, Post, UserProfile, Video};
pub use reaction::{BadgeError, FollowPatch, MAX_DISPLAYED_BADGES, SetDelta, SetOp, VoteOutcome, VoteSets};
pub use store::{Client, Collection, VoteDirection, VoteStatus};

// Re-export redis types so callers don't need to depend on a specific
// redis version.
pub use redis;
pub use redis::aio::ConnectionManager;

/// Delete all keys matching a pattern (for test cleanup).
///
/// This performs a SCAN + DEL loop so cleanup never blocks Redis.
pub async fn cleanup_pattern(conn: &mut ConnectionManager, pattern: &str) -> Result<u64, StoreError> {
    const SCAN_COUNT: usize = 1000;
    let mut cursor: u64 = 0;
    let mut total_deleted: u64 = 0;

    loop {
        let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
            .arg(cursor)
            .arg("MATCH")
            .arg(pattern)
            .arg("COUNT")
            .arg(SCAN_COUNT)
            .query_async(conn)
            .await?;

        if !keys.is_empty() {
            let deleted: u64 = redis::cmd("DEL").arg(&keys).query_async(conn).await?;
            total_deleted += deleted;
        }

        cursor = next_cursor;
        if cursor == 0 {
            break;
        }
    }

    Ok(total_deleted)
}
