// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{credentials::CredentialError, CredentialRecord, TokenService};
use crate::config::Config;
use crate::providers::{MemeApiError, MemeClient};

/// Errors raised while assembling [`AppState`].
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to prepare credential record: {0}")]
    Credentials(#[from] CredentialError),

    #[error("failed to build meme API client: {0}")]
    MemeApi(#[from] MemeApiError),
}

/// Shared, read-only request state.
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub credentials: Arc<CredentialRecord>,
    pub memes: MemeClient,
}

impl AppState {
    pub fn new(tokens: TokenService, credentials: CredentialRecord, memes: MemeClient) -> Self {
        Self {
            tokens: Arc::new(tokens),
            credentials: Arc::new(credentials),
            memes,
        }
    }

    /// Build state from configuration with the demo credential record.
    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        Ok(Self::new(
            TokenService::new(&config.tokens),
            CredentialRecord::demo()?,
            MemeClient::new(&config.meme_api)?,
        ))
    }
}
