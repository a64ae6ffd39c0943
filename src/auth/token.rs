// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token signing and verification.
//!
//! Tokens are HS256 JWTs signed with the login secret. Verification walks an
//! ordered list of shared secrets and accepts the first one that validates
//! the token; the external session issuer's secret comes first, the login
//! secret second. A token is valid iff some configured secret verifies its
//! signature and it has not expired.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use super::claims::TokenClaims;
use crate::models::Identity;

/// Lifetime of tokens issued by [`TokenService::sign`].
pub const TOKEN_TTL_DAYS: i64 = 7;

/// Token service errors.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No secret is configured for the requested operation.
    #[error("no token secret configured")]
    NotConfigured,

    /// The token did not verify against any configured secret.
    #[error("token is invalid or expired")]
    Invalid,

    #[error("failed to encode token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}

/// Secrets used by the [`TokenService`].
#[derive(Clone, Default)]
pub struct TokenConfig {
    /// Secret used to sign tokens.
    pub signing_secret: Option<String>,
    /// Secrets tried in order when verifying.
    pub verification_secrets: Vec<String>,
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "<redacted>"))
            .field("verification_secrets", &self.verification_secrets.len())
            .finish()
    }
}

/// Signs and verifies bearer tokens.
#[derive(Clone)]
pub struct TokenService {
    signing_key: Option<EncodingKey>,
    verification_keys: Vec<DecodingKey>,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &TokenConfig) -> Self {
        let signing_key = config
            .signing_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .map(|secret| EncodingKey::from_secret(secret.as_bytes()));

        let verification_keys = config
            .verification_secrets
            .iter()
            .filter(|secret| !secret.is_empty())
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
            .collect();

        // The external issuer may pick any HMAC variant.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        // Signature and expiry are the only conditions: `exp` is checked
        // when present, `aud` is never checked.
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self {
            signing_key,
            verification_keys,
            validation,
        }
    }

    /// Number of secrets tried by [`TokenService::verify`].
    pub fn verification_key_count(&self) -> usize {
        self.verification_keys.len()
    }

    /// Issue a token for `identity`, valid for [`TOKEN_TTL_DAYS`].
    pub fn sign(&self, identity: &Identity) -> Result<String, TokenError> {
        let key = self.signing_key.as_ref().ok_or(TokenError::NotConfigured)?;

        let now = Utc::now();
        let expires = now + Duration::days(TOKEN_TTL_DAYS);
        let claims = TokenClaims::for_identity(identity, now.timestamp(), expires.timestamp());

        let token = encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(TokenError::Encoding)?;

        tracing::debug!(sub = %identity.id, "issued token");
        Ok(token)
    }

    /// Verify `token` against each configured secret in order.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        if self.verification_keys.is_empty() {
            return Err(TokenError::NotConfigured);
        }

        for (index, key) in self.verification_keys.iter().enumerate() {
            match decode::<TokenClaims>(token, key, &self.validation) {
                Ok(data) => {
                    tracing::debug!(sub = %data.claims.sub, key_index = index, "token verified");
                    return Ok(data.claims.into());
                }
                Err(e) => {
                    tracing::debug!(key_index = index, error = ?e.kind(), "token rejected by key");
                }
            }
        }

        Err(TokenError::Invalid)
    }
}
