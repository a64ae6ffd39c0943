// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated identity.
//!
//! Use the `Auth` extractor in handlers mounted behind
//! [`require_auth`](super::middleware::require_auth):
//!
//! ```rust,ignore
//! async fn my_handler(Auth(identity): Auth) -> impl IntoResponse {
//!     // identity is Identity
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::AuthError;
use crate::models::Identity;

/// Identity attached to the request by the auth gate.
///
/// Rejects with [`AuthError::Unauthenticated`] when the handler is reached
/// without passing through the gate.
#[derive(Debug, Clone)]
pub struct Auth(pub Identity);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(Auth)
            .ok_or(AuthError::Unauthenticated)
    }
}
