//! Identity token verification.
//!
//! The backend does not run its own identity provider. Admins sign in against an
//! external provider that issues HS256-signed bearer tokens whose claims carry a
//! verified email address; this module validates those tokens and extracts the
//! identity. A small issuing helper exists for local development and tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::normalize_email;

/// Error type for identity token operations.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token carries no email claim")]
    MissingEmail,
}

/// Claims carried by an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Subject (provider-side account id)
    pub sub: String,
    /// Verified email address of the account
    pub email: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// A successfully verified external identity.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    pub subject: String,
    /// Normalized (trimmed, lower-cased) email
    pub email: String,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Verifier for identity tokens signed with the provider's shared secret.
#[derive(Clone)]
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    /// Leeway in seconds for clock skew tolerance (default: 30)
    pub leeway_secs: u64,
}

impl std::fmt::Debug for IdentityVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityVerifier")
            .field("leeway_secs", &self.leeway_secs)
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl IdentityVerifier {
    /// Creates a verifier from the shared HS256 secret.
    pub fn new(secret: &str) -> Self {
        Self::with_leeway(secret, DEFAULT_LEEWAY_SECS)
    }

    /// Creates a verifier with a custom clock-skew leeway.
    pub fn with_leeway(secret: &str, leeway_secs: u64) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            leeway_secs,
        }
    }

    /// Validates a token and returns the verified identity.
    pub fn verify(&self, token: &str) -> Result<VerifiedIdentity, IdentityError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<IdentityClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => IdentityError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => IdentityError::InvalidToken,
                _ => IdentityError::DecodingError(e.to_string()),
            })?;

        let email = normalize_email(&token_data.claims.email);
        if email.is_empty() {
            return Err(IdentityError::MissingEmail);
        }

        Ok(VerifiedIdentity {
            subject: token_data.claims.sub,
            email,
        })
    }
}

/// Issues an identity token signed with the shared secret.
///
/// Production tokens come from the identity provider; this exists for local
/// development and integration tests.
pub fn issue_identity_token(
    secret: &str,
    subject: &str,
    email: &str,
    ttl_secs: i64,
) -> Result<String, IdentityError> {
    let now = Utc::now();
    let claims = IdentityClaims {
        sub: subject.to_string(),
        email: email.to_string(),
        exp: (now + Duration::seconds(ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| IdentityError::EncodingError(e.to_string()))
}
