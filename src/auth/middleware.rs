// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication middleware for Axum.
//!
//! Applied to protected routes with
//! `axum::middleware::from_fn_with_state(state, require_auth)`. On success
//! the verified [`Identity`] is inserted into the request extensions, where
//! the [`Auth`](super::Auth) extractor picks it up.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::{token::TokenError, AuthError};
use crate::models::Identity;
use crate::state::AppState;

/// Case-sensitive scheme prefix of the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Reject requests without a valid bearer token.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers()).ok_or(AuthError::Unauthenticated)?;

    let identity: Identity = state.tokens.verify(token).map_err(|e| match e {
        TokenError::NotConfigured => AuthError::Misconfigured,
        TokenError::Invalid | TokenError::Encoding(_) => AuthError::InvalidToken,
    })?;

    tracing::debug!(user_id = %identity.id, "request authenticated");
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Token following `Bearer ` in the `Authorization` header, untrimmed.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_PREFIX)
}
