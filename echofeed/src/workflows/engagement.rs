//! Votes, likes, comments, shares, and notification reads.

use chrono::Utc;
use tracing::debug;

use crate::errors::{StoreError, ValidationError};
use crate::id::generate_comment_id;
use crate::model::{Comment, LIKES, Notification, NotificationKind, Post, UserProfile, Video};
use crate::reaction::compute_score;
use crate::store::{Client, VoteDirection, VoteStatus};
use crate::workflows::notification;

/// Toggle the actor's vote on a post. The membership check and both
/// set mutations run atomically inside the store, so concurrent voters
/// cannot lose updates. A newly landed upvote notifies the author.
pub async fn vote_on_post(
    client: &Client,
    actor: &UserProfile,
    post_id: &str,
    direction: VoteDirection,
) -> Result<VoteStatus, StoreError> {
    let mut posts = client.collection::<Post>();
    let post = posts.get_or_error(post_id).await?;

    let status = posts.toggle_vote(post_id, &actor.id, direction).await?;

    if direction == VoteDirection::Up && status.upvoted && post.author_id != actor.id {
        let note = notification(&post.author_id, actor, NotificationKind::Upvote, Some((&post.id, &post.title)));
        client.collection::<Notification>().create(&note).await?;
    }

    Ok(status)
}

/// Membership flip on a video's like set. Returns whether the actor
/// likes the video afterwards.
pub async fn toggle_video_like(client: &Client, actor_id: &str, video_id: &str) -> Result<bool, StoreError> {
    let mut videos = client.collection::<Video>();
    videos.get_or_error(video_id).await?;
    videos.toggle_set_member(video_id, LIKES, actor_id).await
}

/// Net vote score of a post: upvotes minus downvotes, may be negative.
pub async fn post_score(client: &Client, post_id: &str) -> Result<i64, StoreError> {
    let mut posts = client.collection::<Post>();
    let upvotes = posts.set_members(post_id, crate::model::UPVOTES).await?;
    let downvotes = posts.set_members(post_id, crate::model::DOWNVOTES).await?;
    Ok(compute_score(&upvotes, &downvotes))
}

/// Append a comment to a post and notify the author (unless the
/// commenter is the author).
pub async fn comment_on_post(
    client: &Client,
    author: &UserProfile,
    post_id: &str,
    text: &str,
) -> Result<Comment, StoreError> {
    let comment = build_comment(author, text)?;

    let mut posts = client.collection::<Post>();
    let post = posts.get_or_error(post_id).await?;
    posts.append_array(post_id, "comments", &comment).await?;

    if post.author_id != author.id {
        let note = notification(&post.author_id, author, NotificationKind::Comment, Some((&post.id, &post.title)));
        client.collection::<Notification>().create(&note).await?;
    }

    Ok(comment)
}

/// Append a comment to a video and notify its author.
pub async fn comment_on_video(
    client: &Client,
    author: &UserProfile,
    video_id: &str,
    text: &str,
) -> Result<Comment, StoreError> {
    let comment = build_comment(author, text)?;

    let mut videos = client.collection::<Video>();
    let video = videos.get_or_error(video_id).await?;
    videos.append_array(video_id, "comments", &comment).await?;

    if video.author_id != author.id {
        let note = notification(
            &video.author_id,
            author,
            NotificationKind::Comment,
            Some((&video.id, &video.caption)),
        );
        client.collection::<Notification>().create(&note).await?;
    }

    Ok(comment)
}

fn build_comment(author: &UserProfile, text: &str) -> Result<Comment, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ValidationError::single("text", "validation.required", "comment cannot be empty").into());
    }
    Ok(Comment {
        id: generate_comment_id(),
        author_id: author.id.clone(),
        author_name: author.username.clone(),
        author_avatar_url: author.avatar_url.clone(),
        text: text.to_string(),
        created_at: Utc::now(),
    })
}

/// Bump a video's share counter. Best-effort: repeated shares by the
/// same user count again. Returns the new total.
pub async fn record_share(client: &Client, video_id: &str) -> Result<i64, StoreError> {
    let mut videos = client.collection::<Video>();
    videos.get_or_error(video_id).await?;
    videos.increment(video_id, "shares").await
}

/// Mark the recipient's notifications read. Ids belonging to other
/// recipients are skipped. Returns how many were updated.
pub async fn mark_notifications_read(
    client: &Client,
    recipient_id: &str,
    notification_ids: &[String],
) -> Result<u64, StoreError> {
    let mut notifications = client.collection::<Notification>();
    let mut updated = 0;
    for id in notification_ids {
        let Some(note) = notifications.get(id).await? else {
            continue;
        };
        if note.recipient_id != recipient_id {
            debug!(notification_id = %id, "skipping notification owned by another recipient");
            continue;
        }
        let mut fields = serde_json::Map::new();
        fields.insert("read".to_string(), serde_json::Value::Bool(true));
        notifications.patch(id, None, fields).await?;
        updated += 1;
    }
    Ok(updated)
}
