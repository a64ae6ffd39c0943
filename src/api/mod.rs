// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        request::Parts,
        HeaderValue, Method,
    },
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::require_auth,
    config::CorsConfig,
    error::{ApiError, ErrorBody},
    models::{HealthResponse, Identity, LoginPayload, LoginRequest, Meme},
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod meme;

/// Build the application router.
///
/// Shared by the listener in `main` and by
/// [`ServerlessHandler`](crate::serverless::ServerlessHandler).
pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    let auth_gate = from_fn_with_state(state.clone(), require_auth);

    let api_routes = Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/meme", get(meme::get_meme).route_layer(auth_gate))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}

/// Cross-origin policy: configured origins, fixed methods and headers, no
/// credentials.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let policy = config.clone();
    CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(
            move |origin: &HeaderValue, _parts: &Parts| {
                origin
                    .to_str()
                    .map(|origin| policy.allows(origin))
                    .unwrap_or(false)
            },
        ))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health, auth::login, meme::get_meme),
    components(schemas(HealthResponse, LoginRequest, LoginPayload, Identity, Meme, ErrorBody)),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Auth", description = "Demo login"),
        (name = "Meme", description = "Authenticated meme proxy")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{body_json, get, login_body, test_state, StubUpstream, UPSTREAM_MEME};
    use axum::{body::Body, http::Request, http::StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app(upstream_url: &str) -> Router {
        router(test_state(upstream_url), &CorsConfig::default())
    }

    async fn login(app: &Router, name: &str, password: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(login_body(json!({ "name": name, "password": password })))
            .await
            .unwrap();
        let status = response.status();
        (status, body_json(response).await)
    }

    async fn token_for_demo(app: &Router) -> String {
        let (status, body) = login(app, "demo", "password123").await;
        assert_eq!(status, StatusCode::OK);
        body["response"]["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_is_idempotent() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);

        for uri in ["/api/health", "/api/unknown", "/api/health", "/api/health"] {
            let response = app.clone().oneshot(get(uri)).await.unwrap();
            if uri == "/api/health" {
                assert_eq!(response.status(), StatusCode::OK);
                assert_eq!(body_json(response).await, json!({"status": 200, "message": "OK"}));
            }
        }
    }

    #[tokio::test]
    async fn login_returns_token_and_user() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);

        let (status, body) = login(&app, "demo", "password123").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], json!(false));
        assert_eq!(body["response"]["user"], json!({"id": "u_1", "name": "demo"}));
        assert!(body["response"]["token"].as_str().unwrap().split('.').count() == 3);
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn wrong_name_and_wrong_password_are_indistinguishable() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);
        let expected = json!({"response": null, "error": true, "message": "Invalid credentials"});

        let (status, body) = login(&app, "someone", "password123").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, expected);

        let (status, body) = login(&app, "demo", "password124").await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn invalid_login_bodies_return_400() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);
        let expected = json!({"response": null, "error": true, "message": "Invalid body"});

        let bodies = [
            json!({"name": "", "password": "password123"}),
            json!({"name": "demo", "password": "short"}),
            json!({"name": "demo"}),
            json!({"name": 7, "password": "password123"}),
            json!([]),
        ];
        for body in bodies {
            let response = app.clone().oneshot(login_body(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await, expected);
        }

        let malformed = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(malformed).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await, expected);

        let no_content_type = Request::builder()
            .method("POST")
            .uri("/api/auth/login")
            .body(Body::from(r#"{"name":"demo","password":"password123"}"#))
            .unwrap();
        let response = app.oneshot(no_content_type).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn emoji_password_length_counts_utf16_units() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);

        // Four emoji are eight UTF-16 units: well-formed, just wrong.
        let response = app
            .clone()
            .oneshot(login_body(json!({"name": "demo", "password": "😀😀😀😀"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(login_body(json!({"name": "demo", "password": "😀😀😀"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn login_token_unlocks_meme() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);
        let token = token_for_demo(&app).await;

        let request = Request::builder()
            .uri("/api/meme")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({
                "title": "Cat discovers keyboard",
                "imageUrl": "https://i.redd.it/cat.jpg",
                "postLink": "https://redd.it/abc123",
                "subreddit": "wholesomememes"
            })
        );
        assert_eq!(upstream.hits(), 1);
    }

    #[tokio::test]
    async fn meme_without_authorization_never_calls_upstream() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);

        let response = app.clone().oneshot(get("/api/meme")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({"response": null, "error": true, "message": "Unauthenticated"})
        );

        let basic = Request::builder()
            .uri("/api/meme")
            .header(AUTHORIZATION, "bearer abc")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(basic).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        assert_eq!(upstream.hits(), 0);
    }

    #[tokio::test]
    async fn meme_with_bad_token_is_rejected() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);

        let request = Request::builder()
            .uri("/api/meme")
            .header(AUTHORIZATION, "Bearer not.a.token")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({"response": null, "error": true, "message": "Invalid or expired token"})
        );
        assert_eq!(upstream.hits(), 0);
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_502() {
        let upstream = StubUpstream::start(StatusCode::SERVICE_UNAVAILABLE, "{}").await;
        let app = app(&upstream.url);
        let token = token_for_demo(&app).await;

        let request = Request::builder()
            .uri("/api/meme")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await, json!({"error": "Upstream returned 503"}));
        assert_eq!(upstream.hits(), 1);
    }

    #[tokio::test]
    async fn unreachable_upstream_maps_to_500() {
        let url = StubUpstream::unreachable_url().await;
        let app = app(&url);
        let token = token_for_demo(&app).await;

        let request = Request::builder()
            .uri("/api/meme")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_routes_return_404() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);
        let expected = json!({"error": "Route not found"});

        let response = app.clone().oneshot(get("/api/unknown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, expected);

        // Known path, unsupported method
        let response = app.clone().oneshot(get("/api/auth/login")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, expected);

        let post_meme = Request::builder()
            .method("POST")
            .uri("/api/meme")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(post_meme).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, expected);
        assert_eq!(upstream.hits(), 0);
    }

    #[tokio::test]
    async fn cors_preflight_allows_configured_origins() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);

        let preflight = |origin: &str| {
            Request::builder()
                .method("OPTIONS")
                .uri("/api/meme")
                .header("origin", origin)
                .header("access-control-request-method", "GET")
                .header("access-control-request-headers", "authorization")
                .body(Body::empty())
                .unwrap()
        };

        for origin in ["http://localhost:3000", "https://meme-app-abc.vercel.app"] {
            let response = app.clone().oneshot(preflight(origin)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(
                response.headers().get("access-control-allow-origin").unwrap(),
                origin
            );
            assert!(response.headers().get("access-control-allow-credentials").is_none());
        }

        let response = app.oneshot(preflight("https://evil.example.com")).await.unwrap();
        assert!(response.headers().get("access-control-allow-origin").is_none());
        assert_eq!(upstream.hits(), 0);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let upstream = StubUpstream::start(StatusCode::OK, UPSTREAM_MEME).await;
        let app = app(&upstream.url);

        let response = app.oneshot(get("/api-doc/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert!(doc["paths"].get("/api/auth/login").is_some());
        assert!(doc["paths"].get("/api/meme").is_some());
    }
}
