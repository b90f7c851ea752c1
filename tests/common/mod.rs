//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::time::Duration;
use std::future::Future;

use redirect_mapper::config::RedirectConfig;
use redirect_mapper::lifecycle::{start, Running};

pub const ADMIN_KEY: &str = "integration-test-key";

/// Config bound to ephemeral local ports, admin API enabled.
pub fn test_config() -> RedirectConfig {
    let mut config = RedirectConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.admin.enabled = true;
    config.admin.bind_address = "127.0.0.1:0".into();
    config.admin.api_key = ADMIN_KEY.into();
    config
}

pub async fn start_service(config: RedirectConfig) -> Running {
    start(config).await.expect("service failed to start")
}

/// HTTP client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

pub fn front_url(running: &Running, path: &str) -> String {
    format!("http://{}{}", running.front_addr, path)
}

pub fn admin_url(running: &Running, path: &str) -> String {
    format!("http://{}{}", running.admin_addr.expect("admin disabled"), path)
}

/// Poll `check` until it returns true or `timeout` elapses.
pub async fn eventually<F, Fut>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if check().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}
