//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication and authorization.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on an operation that needs one.
    #[error("Not authenticated")]
    MissingToken,

    /// Signature, algorithm or payload did not validate.
    #[error("Could not validate credentials")]
    InvalidToken,

    /// Token signature is fine but `exp` has passed.
    #[error("Token has expired")]
    ExpiredToken,

    /// Token is valid but its user no longer exists.
    #[error("Could not validate credentials")]
    UnknownUser,

    /// Invalid credentials (wrong password or user not found).
    #[error("Incorrect username or password")]
    InvalidCredentials,

    /// Caller is authenticated but not an admin.
    #[error("Not enough permissions")]
    Forbidden,

    /// Username already taken.
    #[error("Username already exists")]
    DuplicateUsername,

    /// Username empty or too long.
    #[error("{0}")]
    InvalidUsername(String),

    /// Password too weak or invalid.
    #[error("{0}")]
    WeakPassword(String),

    /// Token could not be signed.
    #[error("token encoding error")]
    TokenEncoding,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
