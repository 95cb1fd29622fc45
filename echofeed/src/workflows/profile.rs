//! Profile registration and owner-side edits.

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::info;

use crate::achievements;
use crate::errors::{StoreError, ValidationError};
use crate::identity::CurrentUser;
use crate::model::UserProfile;
use crate::reaction;
use crate::store::Client;

const MAX_USERNAME_LENGTH: usize = 30;

fn validate_username(username: &str) -> Result<&str, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::single("username", "validation.required", "username cannot be empty"));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::single(
            "username",
            "validation.length",
            format!("username must be at most {MAX_USERNAME_LENGTH} characters"),
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.') {
        return Err(ValidationError::single(
            "username",
            "validation.charset",
            "username may only contain letters, digits, '_' and '.'",
        ));
    }
    Ok(username)
}

/// Create the profile document at signup, claiming the username.
pub async fn register_profile(
    client: &Client,
    user: &CurrentUser,
    username: &str,
    avatar_url: &str,
) -> Result<UserProfile, StoreError> {
    let username = validate_username(username)?;

    let profile = UserProfile {
        id: user.id.clone(),
        created_at: Utc::now(),
        version: 1,
        username: username.to_string(),
        bio: String::new(),
        avatar_url: avatar_url.to_string(),
        unlocked_achievements: Vec::new(),
        displayed_badges: Vec::new(),
        followers: Vec::new(),
        following: Vec::new(),
    };

    client
        .collection::<UserProfile>()
        .create_unique(&profile, "username", username)
        .await?;
    info!(user_id = %user.id, username, "profile registered");
    Ok(profile)
}

/// Owner-side scalar edit under the version guard. A concurrent edit
/// from another tab fails with `VersionConflict` instead of clobbering.
pub async fn update_profile(
    client: &Client,
    actor_id: &str,
    expected_version: i64,
    bio: Option<String>,
    avatar_url: Option<String>,
) -> Result<i64, StoreError> {
    let mut fields = Map::new();
    if let Some(bio) = bio {
        fields.insert("bio".to_string(), Value::String(bio));
    }
    if let Some(avatar_url) = avatar_url {
        fields.insert("avatar_url".to_string(), Value::String(avatar_url));
    }
    if fields.is_empty() {
        return Err(StoreError::InvalidRequest {
            message: "nothing to update".to_string(),
        });
    }

    client
        .collection::<UserProfile>()
        .patch(actor_id, Some(expected_version), fields)
        .await
}

/// Change the unique username: claims the new value, releases the old
/// one, and rewrites the field in one atomic step.
pub async fn rename_username(
    client: &Client,
    actor_id: &str,
    expected_version: i64,
    new_username: &str,
) -> Result<i64, StoreError> {
    let new_username = validate_username(new_username)?;

    let mut users = client.collection::<UserProfile>();
    let profile = users.get_or_error(actor_id).await?;

    users
        .rename_unique(actor_id, expected_version, "username", &profile.username, new_username)
        .await
}

/// Toggle a badge in the profile's displayed set via the pure engine,
/// then persist the new ordered list under the version guard. Badge
/// rule violations surface as validation errors with state unchanged.
pub async fn toggle_displayed_badge(
    client: &Client,
    actor_id: &str,
    achievement_id: &str,
) -> Result<Vec<String>, StoreError> {
    let mut users = client.collection::<UserProfile>();
    let profile = users.get_or_error(actor_id).await?;

    let next = reaction::toggle_displayed_badge(
        &profile.displayed_badges,
        achievement_id,
        &profile.unlocked_achievements,
    )
    .map_err(|err| ValidationError::single("displayed_badges", badge_error_code(&err), err.to_string()))?;

    let mut fields = Map::new();
    fields.insert(
        "displayed_badges".to_string(),
        Value::Array(next.iter().cloned().map(Value::String).collect()),
    );
    users.patch(actor_id, Some(profile.version), fields).await?;
    Ok(next)
}

fn badge_error_code(err: &reaction::BadgeError) -> &'static str {
    match err {
        reaction::BadgeError::NotUnlocked => "badge.not_unlocked",
        reaction::BadgeError::LimitExceeded => "badge.limit_exceeded",
    }
}

/// Append an achievement to the unlocked set. Idempotent: returns
/// `false` when it was already unlocked.
pub async fn unlock_achievement(client: &Client, user_id: &str, achievement_id: &str) -> Result<bool, StoreError> {
    if !achievements::is_known(achievement_id) {
        return Err(StoreError::InvalidRequest {
            message: format!("unknown achievement '{achievement_id}'"),
        });
    }

    let mut users = client.collection::<UserProfile>();
    let profile = users.get_or_error(user_id).await?;
    if profile.unlocked_achievements.iter().any(|id| id == achievement_id) {
        return Ok(false);
    }

    let mut unlocked = profile.unlocked_achievements.clone();
    unlocked.push(achievement_id.to_string());

    let mut fields = Map::new();
    fields.insert(
        "unlocked_achievements".to_string(),
        Value::Array(unlocked.into_iter().map(Value::String).collect()),
    );
    users.patch(user_id, Some(profile.version), fields).await?;
    info!(user_id, achievement_id, "achievement unlocked");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice_99").is_ok());
        assert!(validate_username("a.b").is_ok());
        assert!(validate_username("  padded  ").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("   ").is_err());
        assert!(validate_username("has spaces").is_err());
        assert!(validate_username(&"x".repeat(31)).is_err());
    }
}
