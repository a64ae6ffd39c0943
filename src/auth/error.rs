// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::Envelope;

/// Errors returned by the login endpoint and the auth gate.
///
/// Every variant renders as the response envelope
/// `{"response": null, "error": true, "message": ...}`. Client-facing
/// messages are fixed; the detail carried by [`AuthError::Internal`] is
/// only ever logged.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Login body missing, malformed or failing validation
    InvalidBody,
    /// Unknown name or wrong password
    InvalidCredentials,
    /// No `Authorization` header, or not a `Bearer ` one
    Unauthenticated,
    /// Token failed verification against every configured secret
    InvalidToken,
    /// No secret configured for the requested operation
    Misconfigured,
    /// Unexpected failure (hashing, encoding)
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidBody => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials
            | AuthError::Unauthenticated
            | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Misconfigured | AuthError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message shown to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidBody => "Invalid body",
            AuthError::InvalidCredentials => "Invalid credentials",
            AuthError::Unauthenticated => "Unauthenticated",
            AuthError::InvalidToken => "Invalid or expired token",
            AuthError::Misconfigured | AuthError::Internal(_) => "Internal server error",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::Misconfigured => write!(f, "token secret not configured"),
            AuthError::Internal(detail) => write!(f, "internal authentication error: {detail}"),
            other => f.write_str(other.public_message()),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(Envelope::<()>::failure(self.public_message()));
        (status, body).into_response()
    }
}
