// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Outbound integrations with third-party APIs.

pub mod meme_api;

pub use meme_api::{MemeApiError, MemeClient};
