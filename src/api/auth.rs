// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    auth::{AuthError, TokenError},
    models::{Envelope, LoginPayload, LoginRequest},
    state::AppState,
};

/// Exchange the demo credentials for a bearer token.
///
/// Wrong name and wrong password produce the same 401 response.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Token issued", body = Envelope<LoginPayload>),
        (status = 400, description = "Invalid body"),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Envelope<LoginPayload>>, AuthError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "login body rejected");
        AuthError::InvalidBody
    })?;
    if !request.is_valid() {
        return Err(AuthError::InvalidBody);
    }

    let credentials = state.credentials.clone();
    let LoginRequest { name, password } = request;
    // bcrypt is CPU-bound; keep it off the async workers.
    let matched = tokio::task::spawn_blocking(move || credentials.check(&name, &password))
        .await
        .map_err(|e| AuthError::Internal(format!("credential check panicked: {e}")))?
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    if !matched {
        tracing::info!("login rejected");
        return Err(AuthError::InvalidCredentials);
    }

    let user = state.credentials.identity();
    let token = state.tokens.sign(&user).map_err(|e| match e {
        TokenError::NotConfigured => AuthError::Misconfigured,
        other => AuthError::Internal(other.to_string()),
    })?;

    tracing::info!(user_id = %user.id, "login succeeded");
    Ok(Json(Envelope::success(LoginPayload { token, user })))
}
