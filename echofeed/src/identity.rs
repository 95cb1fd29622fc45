//! Identity provider adapter.
//!
//! The provider is an opaque identity source yielding a stable user id
//! and an email-like display identifier. Session lifecycle lives
//! outside this crate; callers receive the provider explicitly.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider error: {0}")]
    Provider(String),
}

/// The authenticated user as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Stable opaque id; doubles as the `UserProfile` document id.
    pub id: String,
    pub email: String,
}

#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    /// `None` when nobody is signed in.
    async fn current_user(&self) -> Result<Option<CurrentUser>, IdentityError>;
}

/// Fixed identity, for tests and local tooling.
pub struct StaticIdentity(Option<CurrentUser>);

impl StaticIdentity {
    pub fn signed_in(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self(Some(CurrentUser {
            id: id.into(),
            email: email.into(),
        }))
    }

    pub fn signed_out() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Result<Option<CurrentUser>, IdentityError> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_identity_reports_signed_in_user() {
        let provider = StaticIdentity::signed_in("u1", "u1@example.com");
        let user = provider.current_user().await.expect("provider").expect("signed in");
        assert_eq!(user.id, "u1");

        let provider = StaticIdentity::signed_out();
        assert!(provider.current_user().await.expect("provider").is_none());
    }
}
