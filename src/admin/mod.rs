//! Admin API.
//!
//! # Routes
//! - `GET  /admin/status`
//! - `GET  /admin/rules` (editing form)
//! - `PUT  /admin/rules` (replace the whole set)
//! - `GET  /admin/rules/compiled` (matcher form)
//! - `POST /admin/lookup`
//!
//! All routes require the configured bearer token.

pub mod auth;
pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use self::auth::admin_auth_middleware;
use self::handlers::*;
use crate::config::RedirectConfig;
use crate::routing::Redirector;

#[derive(Clone)]
pub struct AdminState {
    pub redirector: Arc<Redirector>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(redirector: Arc<Redirector>, api_key: &str) -> Self {
        Self {
            redirector,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(config: &RedirectConfig, redirector: Arc<Redirector>) -> Router {
    let state = AdminState::new(redirector, &config.admin.api_key);

    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/rules", get(get_rules).put(put_rules))
        .route("/admin/rules/compiled", get(get_compiled_rules))
        .route("/admin/lookup", post(lookup))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.security.max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, RuleStore};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const KEY: &str = "test-key";

    fn setup() -> (Router, Arc<MemoryStore>) {
        let mut config = RedirectConfig::default();
        config.admin.api_key = KEY.into();
        config.security.max_body_size = 1024;

        let store = Arc::new(MemoryStore::new(json!([
            {"from": "/old", "to": "https://ex.com/new"},
        ])));
        let redirector = Arc::new(Redirector::load(store.clone()).unwrap());
        (setup_admin_router(&config, redirector), store)
    }

    fn authed(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Authorization", format!("Bearer {KEY}"))
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(res: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(res.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_requires_token() {
        let (router, _) = setup();

        let res = router
            .clone()
            .oneshot(Request::get("/admin/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = router
            .oneshot(
                Request::get("/admin/status")
                    .header("Authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_status_and_listing() {
        let (router, _) = setup();

        let res = router.clone().oneshot(authed("GET", "/admin/status", Body::empty())).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["rules"], 1);

        let res = router.clone().oneshot(authed("GET", "/admin/rules", Body::empty())).await.unwrap();
        assert_eq!(json_body(res).await, json!([{"from": "/old", "to": "https://ex.com/new"}]));

        let res = router.oneshot(authed("GET", "/admin/rules/compiled", Body::empty())).await.unwrap();
        assert_eq!(
            json_body(res).await,
            json!([{"key": "/old", "destination": "https://ex.com/new"}])
        );
    }

    #[tokio::test]
    async fn test_replace_rules() {
        let (router, store) = setup();

        let upload = json!([
            {"from": "a", "to": "https://ex.com/a"},
            {"from": "", "to": "https://ex.com/x"},
            "junk",
        ]);
        let res = router
            .clone()
            .oneshot(authed("PUT", "/admin/rules", upload.to_string()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let summary = json_body(res).await;
        assert_eq!(summary["accepted"], 1);
        assert_eq!(summary["dropped"], 2);
        assert_eq!(summary["rules"], json!([{"from": "/a", "to": "https://ex.com/a"}]));

        assert_eq!(store.load().unwrap(), json!([{"from": "/a", "to": "https://ex.com/a"}]));

        let res = router
            .oneshot(authed("POST", "/admin/lookup", json!({"path": "a"}).to_string()))
            .await
            .unwrap();
        assert_eq!(
            json_body(res).await,
            json!({"key": "/a", "destination": "https://ex.com/a"})
        );
    }

    #[tokio::test]
    async fn test_non_list_upload_clears_rules() {
        let (router, _) = setup();

        let res = router
            .clone()
            .oneshot(authed("PUT", "/admin/rules", r#"{"from": "/a"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["accepted"], 0);

        let res = router
            .oneshot(authed("POST", "/admin/lookup", json!({"path": "/old"}).to_string()))
            .await
            .unwrap();
        assert_eq!(json_body(res).await["destination"], Value::Null);
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let (router, _) = setup();

        let res = router
            .clone()
            .oneshot(authed("PUT", "/admin/rules", "{nope"))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let res = router.oneshot(authed("GET", "/admin/rules", Body::empty())).await.unwrap();
        assert_eq!(json_body(res).await.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let (router, _) = setup();

        let res = router
            .oneshot(authed("PUT", "/admin/rules", "x".repeat(4096)))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
