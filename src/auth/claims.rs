// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims carried by bearer tokens.

use serde::{Deserialize, Serialize};

use crate::models::Identity;

/// Claims of a signed token.
///
/// Tokens issued by the login endpoint always carry every field. Tokens
/// minted by the external session issuer may omit any of them; missing
/// strings decode as empty and a missing `exp` means no expiry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Subject (identity ID)
    #[serde(default)]
    pub sub: String,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Claims for `identity`, issued at `iat` and expiring at `exp`.
    pub fn for_identity(identity: &Identity, iat: i64, exp: i64) -> Self {
        Self {
            sub: identity.id.clone(),
            name: identity.name.clone(),
            iat,
            exp: Some(exp),
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
        }
    }
}
