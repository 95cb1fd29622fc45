//! Application workflows: the thin glue between UI events and the
//! store. Every function takes the store client and the acting user
//! explicitly; there are no ambient handles.

pub mod engagement;
pub mod posting;
pub mod profile;
pub mod social_graph;

use chrono::Utc;

use crate::id::generate_document_id;
use crate::model::{Notification, NotificationKind, UserProfile};

/// Notifications are a side effect of follow/comment/upvote mutations,
/// never created for self-actions (callers check that).
pub(crate) fn notification(
    recipient_id: &str,
    sender: &UserProfile,
    kind: NotificationKind,
    post: Option<(&str, &str)>,
) -> Notification {
    Notification {
        id: generate_document_id(),
        created_at: Utc::now(),
        recipient_id: recipient_id.to_string(),
        sender_id: sender.id.clone(),
        sender_name: sender.username.clone(),
        sender_avatar_url: sender.avatar_url.clone(),
        kind,
        post_id: post.map(|(id, _)| id.to_string()),
        post_title: post.map(|(_, title)| title.to_string()),
        read: false,
    }
}
