//! Follow relationships.

use crate::errors::StoreError;
use crate::model::{Notification, NotificationKind, UserProfile};
use crate::store::Client;
use crate::workflows::notification;

/// Toggle the actor's follow on the target. Both sides of the
/// symmetric pair change in one atomic step. A new follow notifies the
/// target. Returns whether the actor is following afterwards.
pub async fn toggle_follow(client: &Client, actor: &UserProfile, target_id: &str) -> Result<bool, StoreError> {
    if actor.id == target_id {
        return Err(StoreError::InvalidRequest {
            message: "cannot follow yourself".to_string(),
        });
    }

    let mut users = client.collection::<UserProfile>();
    users.get_or_error(target_id).await?;

    let now_following = client.toggle_follow(&actor.id, target_id).await?;

    if now_following {
        let note = notification(target_id, actor, NotificationKind::Follow, None);
        client.collection::<Notification>().create(&note).await?;
    }

    Ok(now_following)
}

pub async fn is_following(client: &Client, actor_id: &str, target_id: &str) -> Result<bool, StoreError> {
    client.is_following(actor_id, target_id).await
}
