//! Authorization gate.
//!
//! Every operation receives a [`RequestContext`] and states the [`Tier`] it
//! needs at the top. The gate itself is a pure function of the two.

use super::AuthError;
use crate::models::User;

/// Minimum privilege an operation demands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// No identity required.
    Public,
    /// A live account.
    Authenticated,
    /// A live account with the admin flag.
    Admin,
}

/// Who is calling: nobody, or a resolved live account.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    identity: Option<User>,
}

impl RequestContext {
    /// A caller without a token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { identity: None }
    }

    /// A caller resolved to `user`.
    #[must_use]
    pub const fn authenticated(user: User) -> Self {
        Self {
            identity: Some(user),
        }
    }

    /// The resolved account, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&User> {
        self.identity.as_ref()
    }

    /// Pass the gate at `tier` and return the caller's account.
    ///
    /// Only meaningful for [`Tier::Authenticated`] and [`Tier::Admin`]; use
    /// [`RequestContext::identity`] where an identity is optional.
    ///
    /// # Errors
    ///
    /// Same as [`authorize`].
    pub fn require(&self, tier: Tier) -> Result<&User, AuthError> {
        authorize(self, tier)?;
        self.identity.as_ref().ok_or(AuthError::MissingToken)
    }
}

/// Check `ctx` against `tier`.
///
/// # Errors
///
/// Returns `AuthError::MissingToken` when an identity is needed but absent
/// and `AuthError::Forbidden` when an admin is needed but the caller is not one.
pub fn authorize(ctx: &RequestContext, tier: Tier) -> Result<(), AuthError> {
    match (tier, &ctx.identity) {
        (Tier::Public, _) | (Tier::Authenticated, Some(_)) => Ok(()),
        (Tier::Admin, Some(user)) if user.is_admin => Ok(()),
        (Tier::Admin, Some(_)) => Err(AuthError::Forbidden),
        (_, None) => Err(AuthError::MissingToken),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rubel_woodworks_core::UserId;

    use super::*;

    fn ctx(is_admin: bool) -> RequestContext {
        RequestContext::authenticated(User {
            id: UserId::new(1),
            username: "karim".to_owned(),
            is_admin,
            created_at: Utc::now(),
        })
    }

    #[test]
    fn test_public_allows_everyone() {
        assert!(authorize(&RequestContext::anonymous(), Tier::Public).is_ok());
        assert!(authorize(&ctx(false), Tier::Public).is_ok());
    }

    #[test]
    fn test_authenticated_needs_identity() {
        assert!(matches!(
            authorize(&RequestContext::anonymous(), Tier::Authenticated),
            Err(AuthError::MissingToken)
        ));
        assert!(authorize(&ctx(false), Tier::Authenticated).is_ok());
    }

    #[test]
    fn test_admin_tier() {
        assert!(matches!(
            authorize(&RequestContext::anonymous(), Tier::Admin),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            authorize(&ctx(false), Tier::Admin),
            Err(AuthError::Forbidden)
        ));
        assert_eq!(ctx(true).require(Tier::Admin).unwrap().username, "karim");
    }
}
