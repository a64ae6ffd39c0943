// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared helpers for unit tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::Response,
    routing::get as get_route,
    Router,
};
use tokio::net::TcpListener;

use crate::{
    auth::{CredentialRecord, TokenConfig, TokenService},
    config::MemeApiConfig,
    providers::MemeClient,
    state::AppState,
};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_NEXTAUTH_SECRET: &str = "test-nextauth-secret";

/// A typical upstream payload, including fields that must be dropped.
pub const UPSTREAM_MEME: &str = r#"{
    "postLink": "https://redd.it/abc123",
    "subreddit": "wholesomememes",
    "title": "Cat discovers keyboard",
    "url": "https://i.redd.it/cat.jpg",
    "nsfw": false,
    "spoiler": false,
    "author": "someone",
    "ups": 4242,
    "preview": ["https://preview.redd.it/cat-108.jpg"]
}"#;

/// Local stand-in for the meme API that counts the requests it receives.
pub struct StubUpstream {
    pub url: String,
    hits: Arc<AtomicUsize>,
}

impl StubUpstream {
    /// Serve `body` with `status` on an ephemeral local port.
    pub async fn start(status: StatusCode, body: &'static str) -> Self {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/gimme",
            get_route(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    (status, [(CONTENT_TYPE, "application/json")], body)
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}/gimme"),
            hits,
        }
    }

    /// URL of a local port nothing listens on.
    pub async fn unreachable_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/gimme")
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Token configuration mirroring production: sign with the login secret,
/// verify with the external secret first.
pub fn test_token_config() -> TokenConfig {
    TokenConfig {
        signing_secret: Some(TEST_JWT_SECRET.to_string()),
        verification_secrets: vec![
            TEST_NEXTAUTH_SECRET.to_string(),
            TEST_JWT_SECRET.to_string(),
        ],
    }
}

/// State with the demo account (cheap bcrypt cost) and the given upstream.
pub fn test_state_with(tokens: &TokenConfig, upstream_url: &str) -> AppState {
    AppState::new(
        TokenService::new(tokens),
        CredentialRecord::new("u_1", "demo", "password123", 4).unwrap(),
        MemeClient::new(&MemeApiConfig {
            url: upstream_url.to_string(),
            ..MemeApiConfig::default()
        })
        .unwrap(),
    )
}

pub fn test_state(upstream_url: &str) -> AppState {
    test_state_with(&test_token_config(), upstream_url)
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn login_body(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
