// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. Types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and the
//! OpenAPI document.
//!
//! ## Model Categories
//!
//! - **Envelope**: `{response, error, message}` wrapper used by the login
//!   endpoint and by authentication failures
//! - **Identity**: the authenticated principal
//! - **Login**: credentials in, token and user out
//! - **Meme**: reshaped upstream payload
//! - **Health**: liveness response

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// =============================================================================
// Response Envelope
// =============================================================================

/// Response envelope.
///
/// Success: `{"response": {...}, "error": false}`.
/// Failure: `{"response": null, "error": true, "message": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Envelope<T> {
    pub response: Option<T>,
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    pub fn success(response: T) -> Self {
        Self {
            response: Some(response),
            error: false,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            response: None,
            error: true,
            message: Some(message.into()),
        }
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Authenticated principal.
///
/// Built by the login endpoint, carried in token claims (`sub`, `name`) and
/// rebuilt by the auth gate on every authenticated request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

// =============================================================================
// Login
// =============================================================================

/// Body of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Account name, must not be empty
    #[schema(min_length = 1)]
    pub name: String,
    /// Password, at least 8 UTF-16 code units
    #[schema(min_length = 8)]
    pub password: String,
}

impl LoginRequest {
    pub const MIN_PASSWORD_UNITS: usize = 8;

    /// Shape validation performed before any credential check.
    ///
    /// Password length is measured in UTF-16 code units, so an astral
    /// character such as an emoji counts twice.
    pub fn is_valid(&self) -> bool {
        !self.name.is_empty() && self.password.encode_utf16().count() >= Self::MIN_PASSWORD_UNITS
    }
}

/// Successful login payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct LoginPayload {
    /// Signed bearer token, valid for 7 days
    pub token: String,
    pub user: Identity,
}

// =============================================================================
// Meme
// =============================================================================

/// Meme returned to clients.
///
/// Only these four fields are forwarded from the upstream response, with
/// whatever JSON value the upstream sent. A field the upstream omits is
/// omitted here; an explicit `null` stays `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Meme {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub post_link: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<Value>,
}

/// Deserialize a field that is present in the input, keeping `null` as
/// `Some(Value::Null)`. Pair with `#[serde(default)]` so absence is `None`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

// =============================================================================
// Health
// =============================================================================

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: u16,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: 200,
            message: "OK".to_string(),
        }
    }
}
