//! Identity token issuer.
//!
//! Mints short-lived HS256 tokens binding a verified principal's uid and
//! role claim. An identity token is only a bridge: the login handler
//! immediately exchanges it for a session, so its validity window is minutes.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::storage::models::{Account, RoleClaim};

const ISSUER: &str = "edutraq-auth";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Identity token rejected: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
    #[error("Failed to sign identity token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// Claim set of an identity token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub jti: String,
    #[serde(flatten)]
    pub role: RoleClaim,
    /// Account uid
    pub sub: String,
}

#[derive(Clone)]
pub struct TokenIssuer {
    decoding: DecodingKey,
    encoding: EncodingKey,
    ttl_seconds: u64,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Zero leeway: a token past its exp is rejected immediately
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);

        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            ttl_seconds,
            validation,
        }
    }

    /// Issue an identity token for a verified account
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = IdentityClaims {
            exp: (now + Duration::seconds(self.ttl_seconds as i64)).timestamp(),
            iat: now.timestamp(),
            iss: ISSUER.to_string(),
            jti: Uuid::new_v4().to_string(),
            role: account.role_claim(),
            sub: account.uid.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(TokenError::Signing)
    }

    /// Verify a token's signature, expiry, and issuer
    pub fn verify(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        decode::<IdentityClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}
