//! Authentication service.
//!
//! Owns the credential rules (username shape, password policy, argon2
//! hashing), token issuance, and resolution of a bearer token to a live
//! account.

mod error;
pub mod gate;
pub mod token;

pub use error::AuthError;
pub use gate::{RequestContext, Tier, authorize};
pub use token::{Claims, IssuedToken, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use rubel_woodworks_core::UserId;
use secrecy::ExposeSecret;

use crate::config::BootstrapAdminConfig;
use crate::db::{RepositoryError, UserStore};
use crate::models::{NewUser, User, UserChanges};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Authentication service.
///
/// Handles registration, login and token resolution.
pub struct AuthService<'a> {
    users: &'a dyn UserStore,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(users: &'a dyn UserStore, tokens: &'a TokenService) -> Self {
        Self { users, tokens }
    }

    /// Register a non-admin account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidUsername` or `AuthError::WeakPassword` if
    /// validation fails, `AuthError::DuplicateUsername` if the name is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let user = create_account(self.users, username, password, false).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        self.tokens.issue(&user)
    }

    /// Login with username and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the username/password is wrong.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let Some((user, password_hash)) = self.users.get_password_hash(username).await? else {
            tracing::info!(username = %username, "Login failed: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = verify_password(password, &password_hash) {
            tracing::info!(username = %username, "Login failed: wrong password");
            return Err(e);
        }

        self.tokens.issue(&user)
    }

    /// Turn an optional bearer token into a request context.
    ///
    /// No token yields an anonymous context. A present token must verify and
    /// name an account that still exists under the same id and username.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` / `AuthError::ExpiredToken` from
    /// verification and `AuthError::UnknownUser` if the account was deleted.
    pub async fn resolve(&self, token: Option<&str>) -> Result<RequestContext, AuthError> {
        let Some(token) = token else {
            return Ok(RequestContext::anonymous());
        };

        let claims = self.tokens.verify(token)?;
        let user = self
            .users
            .get_by_id(UserId::new(claims.uid))
            .await?
            .filter(|user| user.username == claims.sub)
            .ok_or(AuthError::UnknownUser)?;

        Ok(RequestContext::authenticated(user))
    }
}

/// Validate, hash and store a new account.
///
/// # Errors
///
/// Returns `AuthError::InvalidUsername`, `AuthError::WeakPassword` or
/// `AuthError::DuplicateUsername`.
pub async fn create_account(
    users: &dyn UserStore,
    username: &str,
    password: &str,
    is_admin: bool,
) -> Result<User, AuthError> {
    let username = validate_username(username)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    users
        .create(&NewUser {
            username,
            password_hash,
            is_admin,
        })
        .await
        .map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::DuplicateUsername,
            other => AuthError::Repository(other),
        })
}

/// Build a validated user update from raw fields.
///
/// # Errors
///
/// Returns `AuthError::InvalidUsername` or `AuthError::WeakPassword`.
pub fn account_changes(
    username: Option<&str>,
    password: Option<&str>,
    is_admin: Option<bool>,
) -> Result<UserChanges, AuthError> {
    let username = username.map(validate_username).transpose()?;
    let password_hash = match password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    Ok(UserChanges {
        username,
        password_hash,
        is_admin,
    })
}

/// Reset a user's password by username.
///
/// # Errors
///
/// Returns `AuthError::WeakPassword`, or `AuthError::Repository` wrapping
/// `NotFound` if there is no such user.
pub async fn set_password(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    let user = users
        .get_by_username(username)
        .await?
        .ok_or(AuthError::Repository(RepositoryError::NotFound))?;
    let changes = account_changes(None, Some(password), None)?;
    Ok(users.update(user.id, &changes).await?)
}

/// Make sure the configured bootstrap admin exists and is an admin.
///
/// An existing account keeps its password; it is only re-promoted if the
/// admin flag was removed.
///
/// # Errors
///
/// Returns any error from account creation or the store.
pub async fn ensure_bootstrap_admin(
    users: &dyn UserStore,
    config: &BootstrapAdminConfig,
) -> Result<User, AuthError> {
    match users.get_by_username(&config.username).await? {
        Some(user) if user.is_admin => Ok(user),
        Some(user) => {
            tracing::warn!(username = %user.username, "Bootstrap admin lost admin flag, restoring");
            let changes = UserChanges {
                is_admin: Some(true),
                ..UserChanges::default()
            };
            Ok(users.update(user.id, &changes).await?)
        }
        None => {
            let user = create_account(
                users,
                &config.username,
                config.password.expose_secret(),
                true,
            )
            .await?;
            tracing::info!(username = %user.username, "Bootstrap admin created");
            Ok(user)
        }
    }
}

/// Trim and bound a username.
fn validate_username(username: &str) -> Result<String, AuthError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(AuthError::InvalidUsername(
            "username must not be empty".to_owned(),
        ));
    }
    if trimmed.chars().count() > MAX_USERNAME_LENGTH {
        return Err(AuthError::InvalidUsername(format!(
            "username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_owned())
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
