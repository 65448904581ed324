//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the account id, username and admin flag.
//! Verification checks signature and expiry only; resolving the claims to a
//! live account is the caller's job (see [`super::AuthService::resolve`]). There is no
//! revocation list, so a token stays valid until `exp`.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::config::TokenConfig;
use crate::models::User;

/// Token type marker returned to clients.
pub const TOKEN_TYPE: &str = "bearer";

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// Account id. Ids are never reused, so a recreated username does not
    /// inherit older tokens.
    pub uid: i32,
    /// Admin flag at issue time. Authorization uses the live account instead.
    pub admin: bool,
    pub iat: i64,
    pub exp: i64,
}

/// Login/registration response.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub access_token: String,
    pub token_type: &'static str,
    pub username: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

/// Issues and verifies tokens with a process-wide secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl TokenService {
    /// Build the service from configuration.
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: config.ttl,
        }
    }

    /// Issue a token for `user` valid from now for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn issue(&self, user: &User) -> Result<IssuedToken, AuthError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenEncoding` if signing fails.
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<IssuedToken, AuthError> {
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id.as_i32(),
            admin: user.is_admin,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to sign token");
                AuthError::TokenEncoding
            })?;

        Ok(IssuedToken {
            access_token,
            token_type: TOKEN_TYPE,
            username: user.username.clone(),
            is_admin: user.is_admin,
        })
    }

    /// Verify signature and expiry.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::ExpiredToken` once `exp` has passed and
    /// `AuthError::InvalidToken` for any other failure.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

#[cfg(test)]
mod tests {
    use rubel_woodworks_core::UserId;
    use secrecy::SecretString;

    use super::*;

    fn config(secret: &str) -> TokenConfig {
        TokenConfig {
            secret: SecretString::from(secret.to_owned()),
            ttl: chrono::Duration::minutes(30),
        }
    }

    fn user(is_admin: bool) -> User {
        User {
            id: UserId::new(7),
            username: "rahim".to_owned(),
            is_admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_issue_then_verify() {
        let tokens = TokenService::new(&config("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let issued = tokens.issue(&user(true)).unwrap();
        assert_eq!(issued.token_type, "bearer");
        assert_eq!(issued.username, "rahim");
        assert!(issued.is_admin);

        let claims = tokens.verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub, "rahim");
        assert_eq!(claims.uid, 7);
        assert!(claims.admin);
        assert_eq!(claims.exp - claims.iat, 30 * 60);
    }

    #[test]
    fn test_expired_token() {
        let tokens = TokenService::new(&config("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let issued = tokens
            .issue_at(&user(false), Utc::now() - chrono::Duration::hours(1))
            .unwrap();
        assert!(matches!(
            tokens.verify(&issued.access_token),
            Err(AuthError::ExpiredToken)
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let issuer = TokenService::new(&config("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let verifier = TokenService::new(&config("another-k3y-for-unit-tests-0a1b2c3d"));
        let issued = issuer.issue(&user(false)).unwrap();
        assert!(matches!(
            verifier.verify(&issued.access_token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let tokens = TokenService::new(&config("k3y-for-unit-tests-only-9f8e7d6c5b4a"));
        let issued = tokens.issue(&user(false)).unwrap();
        let mut tampered = issued.access_token;
        tampered.push('x');
        assert!(matches!(
            tokens.verify(&tampered),
            Err(AuthError::InvalidToken)
        ));
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(AuthError::InvalidToken)
        ));
    }
}
