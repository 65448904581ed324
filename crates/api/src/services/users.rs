//! Back-office user administration.
//!
//! All operations are admin-only. An admin can never demote or delete their
//! own account, which keeps at least the acting admin able to log in.

use rubel_woodworks_core::UserId;

use super::auth::{self, AuthError, RequestContext, Tier};
use crate::db::{RepositoryError, UserStore};
use crate::error::{AppError, Result};
use crate::models::User;

/// Partial user update as submitted.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub username: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
}

/// User administration operations.
pub struct UserAdminService<'a> {
    users: &'a dyn UserStore,
}

impl<'a> UserAdminService<'a> {
    /// Create a new user administration service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore) -> Self {
        Self { users }
    }

    /// All accounts.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` below admin tier.
    pub async fn list(&self, ctx: &RequestContext) -> Result<Vec<User>> {
        ctx.require(Tier::Admin)?;
        Ok(self.users.list().await?)
    }

    /// One account.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if there is no such user.
    pub async fn get(&self, ctx: &RequestContext, id: UserId) -> Result<User> {
        ctx.require(Tier::Admin)?;
        self.users.get_by_id(id).await?.ok_or_else(user_not_found)
    }

    /// Create an account with any role.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Auth` wrapping `DuplicateUsername`, `InvalidUsername`
    /// or `WeakPassword` for bad input.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<User> {
        let caller = ctx.require(Tier::Admin)?;
        let user = auth::create_account(self.users, username, password, is_admin).await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            is_admin = user.is_admin,
            created_by = %caller.username,
            "User created"
        );
        Ok(user)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if there is no such user,
    /// `AppError::SelfModification` when the caller would demote themselves
    /// and `AppError::Auth(DuplicateUsername)` if the new name is taken.
    pub async fn update(&self, ctx: &RequestContext, id: UserId, update: UserUpdate) -> Result<User> {
        let caller = ctx.require(Tier::Admin)?;

        if caller.id == id && update.is_admin == Some(false) {
            tracing::warn!(user_id = %id, "Rejected self-demotion");
            return Err(AppError::SelfModification(
                "Cannot remove your own admin privileges".to_owned(),
            ));
        }

        let changes = auth::account_changes(
            update.username.as_deref(),
            update.password.as_deref(),
            update.is_admin,
        )?;
        if changes.is_empty() {
            return self.users.get_by_id(id).await?.ok_or_else(user_not_found);
        }

        let user = self.users.update(id, &changes).await.map_err(|e| match e {
            RepositoryError::NotFound => user_not_found(),
            RepositoryError::Conflict(_) => AuthError::DuplicateUsername.into(),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, updated_by = %caller.username, "User updated");
        Ok(user)
    }

    /// Delete an account. Its orders stay, unowned; its reviews stay and
    /// list as anonymous.
    ///
    /// # Errors
    ///
    /// Returns `AppError::SelfModification` for the caller's own account and
    /// `AppError::NotFound` if there is no such user.
    pub async fn delete(&self, ctx: &RequestContext, id: UserId) -> Result<()> {
        let caller = ctx.require(Tier::Admin)?;

        if caller.id == id {
            tracing::warn!(user_id = %id, "Rejected self-deletion");
            return Err(AppError::SelfModification(
                "Cannot delete your own account".to_owned(),
            ));
        }

        self.users.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => user_not_found(),
            other => other.into(),
        })?;

        tracing::info!(user_id = %id, deleted_by = %caller.username, "User deleted");
        Ok(())
    }
}

fn user_not_found() -> AppError {
    AppError::NotFound("User not found".to_owned())
}
