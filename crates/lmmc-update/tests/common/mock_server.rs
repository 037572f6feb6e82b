//! Mock server helpers for the releases API and asset downloads

use lmmc_core::types::RuntimeConfig;
use serde_json::Value;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::constants::*;

/// Path of the latest-release endpoint
pub fn latest_path() -> String {
    format!("/repos/{}/{}/releases/latest", REPO_OWNER, REPO_NAME)
}

/// Path of the release listing endpoint
pub fn listing_path() -> String {
    format!("/repos/{}/{}/releases", REPO_OWNER, REPO_NAME)
}

/// Runtime config pointing every endpoint at `server`
pub fn test_config(server: &MockServer) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.github.api_url = server.uri();
    config.github.repo_owner = REPO_OWNER.to_string();
    config.github.repo_name = REPO_NAME.to_string();
    config.network.http_timeout_secs = 5;
    config.network.download_timeout_secs = 5;
    config
}

/// Serve `release` from `/releases/latest`, expecting exactly one request
pub async fn mock_latest_release(server: &MockServer, release: Value) {
    Mock::given(method("GET"))
        .and(path(latest_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(release))
        .expect(1)
        .mount(server)
        .await;
}

/// Serve `releases` from the `per_page=1` listing
pub async fn mock_release_listing(server: &MockServer, releases: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(listing_path()))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(Value::Array(releases)))
        .expect(1)
        .mount(server)
        .await;
}

/// Answer the latest-release endpoint with `status`
pub async fn mock_latest_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path(latest_path()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Serve `content` at `/download/<name>`
pub async fn mock_asset(server: &MockServer, name: &str, content: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content))
        .expect(1)
        .mount(server)
        .await;
}

/// Fail the test if `/download/<name>` is ever requested
pub async fn mock_asset_never_requested(server: &MockServer, name: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{}", name)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

/// Number of requests the server has seen
pub async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|requests| requests.len())
        .unwrap_or(0)
}
