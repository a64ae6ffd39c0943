// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{
    auth::Auth,
    error::{ApiError, ErrorBody},
    models::Meme,
    providers::MemeApiError,
    state::AppState,
};

/// Fetch a random meme from the upstream API.
///
/// Mounted behind the auth gate.
#[utoipa::path(
    get,
    path = "/api/meme",
    tag = "Meme",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "A random meme", body = Meme),
        (status = 401, description = "Unauthenticated or invalid token"),
        (status = 502, description = "Upstream returned a non-success status", body = ErrorBody),
        (status = 500, description = "Upstream unreachable or unreadable", body = ErrorBody),
    )
)]
pub async fn get_meme(
    Auth(identity): Auth,
    State(state): State<AppState>,
) -> Result<Json<Meme>, ApiError> {
    let meme = state.memes.fetch().await.map_err(|e| match e {
        MemeApiError::Status(status) => ApiError::bad_gateway(status),
        other => ApiError::internal(other.to_string()),
    })?;

    tracing::debug!(user_id = %identity.id, subreddit = ?meme.subreddit, "meme served");
    Ok(Json(meme))
}
