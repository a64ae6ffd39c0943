// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Client for the public meme API (`https://meme-api.com/gimme`).
//!
//! The upstream is untrusted: one request per call, no retries, and only
//! four fields of its response are kept.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::config::MemeApiConfig;
use crate::models::{present, Meme};

#[derive(Debug, thiserror::Error)]
pub enum MemeApiError {
    /// Upstream answered with a non-success status.
    #[error("Upstream returned {}", .0.as_u16())]
    Status(StatusCode),

    #[error("{0}")]
    Request(String),

    #[error("{0}")]
    InvalidResponse(String),
}

/// Subset of the upstream payload that is forwarded. Values pass through
/// untyped; only presence is tracked.
#[derive(Debug, Deserialize)]
struct UpstreamMeme {
    #[serde(default, deserialize_with = "present")]
    title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    url: Option<Value>,
    #[serde(default, rename = "postLink", deserialize_with = "present")]
    post_link: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    subreddit: Option<Value>,
}

impl From<UpstreamMeme> for Meme {
    fn from(upstream: UpstreamMeme) -> Self {
        Self {
            title: upstream.title,
            image_url: upstream.url,
            post_link: upstream.post_link,
            subreddit: upstream.subreddit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemeClient {
    url: String,
    http: Client,
}

impl MemeClient {
    pub fn new(config: &MemeApiConfig) -> Result<Self, MemeApiError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MemeApiError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: config.url.clone(),
            http,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch one random meme.
    pub async fn fetch(&self) -> Result<Meme, MemeApiError> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| MemeApiError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MemeApiError::Status(status));
        }

        let upstream: UpstreamMeme = response
            .json()
            .await
            .map_err(|e| MemeApiError::InvalidResponse(e.to_string()))?;

        Ok(upstream.into())
    }
}
