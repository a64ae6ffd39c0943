// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Meme Gateway - Authenticated Meme Proxy
//!
//! A small API backend: a demo login that issues signed tokens, and a
//! bearer-protected endpoint that proxies a random meme from a public API.
//!
//! ## Modules
//!
//! - `api` - HTTP handlers and router (Axum)
//! - `auth` - Credential check, token signing/verification, auth gate
//! - `providers` - Outbound meme API client
//! - `serverless` - Once-per-request adapter for serverless hosts

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod serverless;
pub mod state;
pub mod telemetry;

#[cfg(test)]
mod test_support;
