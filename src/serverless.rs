// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request/response adapter for serverless hosts.
//!
//! The host runtime builds one [`ServerlessHandler`] per cold start and
//! calls [`ServerlessHandler::handle`] once per incoming request. Routing
//! and handlers are the same [`Router`] the long-running listener serves.
//!
//! ```rust,ignore
//! let handler = ServerlessHandler::from_config(&Config::from_env()?)?;
//! let response = handler.handle(request).await;
//! ```

use axum::{body::Body, extract::Request, response::Response, Router};
use tower::ServiceExt;

use crate::{
    api::router,
    config::Config,
    state::{AppState, StateError},
};

#[derive(Clone)]
pub struct ServerlessHandler {
    router: Router,
}

impl ServerlessHandler {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    pub fn from_config(config: &Config) -> Result<Self, StateError> {
        let state = AppState::from_config(config)?;
        Ok(Self::new(router(state, &config.cors)))
    }

    /// Handle a single invocation.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}
