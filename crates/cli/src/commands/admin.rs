//! Account management commands.
//!
//! These go through the same validation and hashing as the API, so an
//! account created here can log in through `/api/auth/login`.

use thiserror::Error;

use rubel_woodworks_api::db::Stores;
use rubel_woodworks_api::services::auth::{self, AuthError};

use super::CommandError;

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Connect(#[from] CommandError),

    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create an account.
pub async fn create_user(username: &str, password: &str, is_admin: bool) -> Result<(), AdminError> {
    let stores = Stores::postgres(super::connect().await?);

    let user = auth::create_account(stores.users.as_ref(), username, password, is_admin).await?;
    tracing::info!(
        "User created successfully! ID: {}, Username: {}, Admin: {}",
        user.id,
        user.username,
        user.is_admin
    );
    Ok(())
}

/// Reset an account's password.
pub async fn reset_password(username: &str, password: &str) -> Result<(), AdminError> {
    let stores = Stores::postgres(super::connect().await?);

    let user = auth::set_password(stores.users.as_ref(), username, password).await?;
    tracing::info!("Password updated for {}", user.username);
    Ok(())
}
