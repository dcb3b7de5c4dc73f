//! Integration tests for the hosting API preview URL lookup.
//!
//! These tests verify the version lookup path, bearer auth, and error
//! handling against a mock hosting API.

use easel_core::config::HostingConfig;
use easel_hosting::HostingApiClient;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server: &MockServer) -> HostingConfig {
    HostingConfig {
        api_url: server.uri(),
        api_token: Some("test-token".to_string()),
        project: "vision-app-maker".to_string(),
        site: "vision-app-maker".to_string(),
        api_timeout_secs: 10,
        ..HostingConfig::default()
    }
}

fn test_client(server: &MockServer) -> HostingApiClient {
    HostingApiClient::from_config(&test_config(server))
        .expect("Failed to create client")
        .expect("Token is configured")
}

#[tokio::test]
async fn test_preview_url_fetches_version_record() {
    let mock_server = MockServer::start().await;

    let version_response = serde_json::json!({
        "name": "projects/vision-app-maker/sites/vision-app-maker/versions/ver1",
        "status": "FINALIZED",
        "config": {
            "previewUrl": "https://vision-app-maker--preview.web.app"
        }
    });

    Mock::given(method("GET"))
        .and(path(
            "/v1beta1/projects/vision-app-maker/sites/vision-app-maker/versions/ver1",
        ))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&version_response))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let url = client.preview_url("ver1").await.unwrap();

    assert_eq!(url, "https://vision-app-maker--preview.web.app");
}

#[tokio::test]
async fn test_missing_preview_url_is_deployment_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"status": "CREATED"})),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.preview_url("ver1").await.unwrap_err();

    assert!(err.to_string().contains("no preview URL"));
}

#[tokio::test]
async fn test_api_error_status_is_surfaced() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(403)
                .set_body_string(r#"{"error": {"message": "permission denied"}}"#),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.preview_url("ver1").await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("Hosting API returned 403"));
    assert!(message.contains("permission denied"));
}

#[tokio::test]
async fn test_lookup_uses_configured_site_over_project() {
    let mock_server = MockServer::start().await;

    let mut config = test_config(&mock_server);
    config.site = "classroom-pages".to_string();

    Mock::given(method("GET"))
        .and(path(
            "/v1beta1/projects/vision-app-maker/sites/classroom-pages/versions/v2",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "config": {"previewUrl": "https://classroom-pages--v2.web.app"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HostingApiClient::from_config(&config)
        .expect("Failed to create client")
        .expect("Token is configured");
    let url = client.preview_url("v2").await.unwrap();

    assert_eq!(url, "https://classroom-pages--v2.web.app");
}
