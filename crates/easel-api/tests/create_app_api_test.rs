//! Integration tests for student page publishing.
//!
//! Each test spawns the full router on an ephemeral port with the site
//! directory pointed at a temp directory and deploys stubbed out by
//! [`MockDeployer`]. Hosting API lookups go to a wiremock server.

use std::sync::Arc;

use easel_api::uploads::UploadStore;
use easel_api::{build_router, AppState};
use easel_core::config::{AppConfig, HostingConfig};
use easel_core::defaults;
use easel_hosting::mock::MockDeployer;
use easel_hosting::{Deployer, HostingApiClient};
use easel_inference::mock::MockCritiqueBackend;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn publish_state(
    dir: &tempfile::TempDir,
    deployer: Arc<dyn Deployer>,
    hosting_api: Option<Arc<HostingApiClient>>,
) -> AppState {
    let mut config = AppConfig::default();
    config.intake.upload_dir = dir.path().join("uploads");
    config.hosting.site_dir = dir.path().join("public");

    AppState {
        uploads: UploadStore::from_config(&config.intake),
        config: Arc::new(config),
        critique: Arc::new(MockCritiqueBackend::new()),
        deployer,
        hosting_api,
    }
}

/// Serve the router on an ephemeral port, returning the base URL.
async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

fn hosting_api_client(base_url: &str) -> Arc<HostingApiClient> {
    let config = HostingConfig {
        api_url: base_url.to_string(),
        api_token: Some("test-token".to_string()),
        ..HostingConfig::default()
    };
    Arc::new(HostingApiClient::from_config(&config).unwrap().unwrap())
}

async fn post_create_app(base: &str, body: serde_json::Value) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("{}/create-app", base))
        .json(&body)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn free_text_output_yields_hosting_url() {
    let stdout = concat!(
        "=== Deploying to 'vision-app-maker'...\n",
        "\n",
        "i  deploying hosting\n",
        "+  Deploy complete!\n",
        "\n",
        "Project Console: https://console.firebase.google.com/project/vision-app-maker/overview\n",
        "Hosting URL: https://vision-app-maker.web.app\n",
    );

    let dir = tempfile::tempdir().unwrap();
    let state = publish_state(&dir, Arc::new(MockDeployer::succeeding(stdout)), None);
    let site_dir = state.config.hosting.site_dir.clone();
    let base = spawn_app(state).await;

    let response = post_create_app(
        &base,
        serde_json::json!({"prompt": "Draw your favorite animal"}),
    )
    .await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"url": "https://vision-app-maker.web.app"}));

    // The page landed in the site directory with the prompt embedded
    let page =
        std::fs::read_to_string(site_dir.join(defaults::STUDENT_PAGE_FILENAME)).unwrap();
    assert!(page.contains("Draw your favorite animal"));
}

#[tokio::test]
async fn structured_output_resolves_version_through_hosting_api() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/v1beta1/projects/vision-app-maker/sites/vision-app-maker/versions/abc123",
        ))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "projects/vision-app-maker/sites/vision-app-maker/versions/abc123",
            "status": "FINALIZED",
            "config": {"previewUrl": "https://vision-app-maker--preview.web.app"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let deploy_output = serde_json::json!({
        "status": "success",
        "result": {
            "hosting": "projects/vision-app-maker/sites/vision-app-maker/versions/abc123"
        }
    })
    .to_string();

    let dir = tempfile::tempdir().unwrap();
    let state = publish_state(
        &dir,
        Arc::new(MockDeployer::succeeding(deploy_output)),
        Some(hosting_api_client(&mock_server.uri())),
    );
    let base = spawn_app(state).await;

    let response = post_create_app(&base, serde_json::json!({"prompt": "Sketch a tree"})).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["url"], "https://vision-app-maker--preview.web.app");
}

#[tokio::test]
async fn deploy_failure_skips_preview_lookup() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let deployer = Arc::new(MockDeployer::failing(
        "Deploy command failed (exit exit status: 1): quota exceeded",
    ));
    let state = publish_state(
        &dir,
        deployer.clone(),
        Some(hosting_api_client(&mock_server.uri())),
    );
    let base = spawn_app(state).await;

    let response = post_create_app(&base, serde_json::json!({"prompt": "Paint a sunset"})).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error deploying application");
    assert!(body["details"].as_str().unwrap().contains("quota exceeded"));
    assert_eq!(deployer.call_count(), 1);
}

#[tokio::test]
async fn output_without_url_is_a_deployment_error() {
    let dir = tempfile::tempdir().unwrap();
    let state = publish_state(
        &dir,
        Arc::new(MockDeployer::succeeding("+  Deploy complete!\n")),
        None,
    );
    let base = spawn_app(state).await;

    let response = post_create_app(&base, serde_json::json!({"prompt": "Sculpt a bowl"})).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error deploying application");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("Hosting URL not found"));
}

#[tokio::test]
async fn version_without_api_token_is_a_deployment_error() {
    let deploy_output = serde_json::json!({
        "result": {"hosting": "projects/p/sites/s/versions/abc123"}
    })
    .to_string();

    let dir = tempfile::tempdir().unwrap();
    let state = publish_state(&dir, Arc::new(MockDeployer::succeeding(deploy_output)), None);
    let base = spawn_app(state).await;

    let response = post_create_app(&base, serde_json::json!({"prompt": "Draw a bird"})).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error deploying application");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("no hosting API token is configured"));
}

#[tokio::test]
async fn preview_lookup_failure_propagates_details() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("version not found"))
        .mount(&mock_server)
        .await;

    let deploy_output = serde_json::json!({
        "result": {"hosting": "projects/p/sites/s/versions/missing"}
    })
    .to_string();

    let dir = tempfile::tempdir().unwrap();
    let state = publish_state(
        &dir,
        Arc::new(MockDeployer::succeeding(deploy_output)),
        Some(hosting_api_client(&mock_server.uri())),
    );
    let base = spawn_app(state).await;

    let response = post_create_app(&base, serde_json::json!({"prompt": "Draw a bird"})).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Error deploying application");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("Hosting API returned 404"));
}

#[tokio::test]
async fn missing_prompt_returns_400() {
    let dir = tempfile::tempdir().unwrap();
    let deployer = MockDeployer::succeeding("Hosting URL: https://x.web.app");
    let state = publish_state(&dir, Arc::new(deployer.clone()), None);
    let base = spawn_app(state).await;

    let response = post_create_app(&base, serde_json::json!({})).await;
    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Missing prompt");

    let response = post_create_app(&base, serde_json::json!({"prompt": "   "})).await;
    assert_eq!(response.status(), 400);

    // Nothing was deployed for rejected requests
    assert_eq!(deployer.call_count(), 0);
}

#[tokio::test]
async fn prompt_markup_cannot_reach_page_as_code() {
    let dir = tempfile::tempdir().unwrap();
    let state = publish_state(
        &dir,
        Arc::new(MockDeployer::succeeding(
            "Hosting URL: https://vision-app-maker.web.app",
        )),
        None,
    );
    let site_dir = state.config.hosting.site_dir.clone();
    let base = spawn_app(state).await;

    let response = post_create_app(
        &base,
        serde_json::json!({"prompt": "</script><script>alert(1)</script>"}),
    )
    .await;
    assert_eq!(response.status(), 200);

    let page =
        std::fs::read_to_string(site_dir.join(defaults::STUDENT_PAGE_FILENAME)).unwrap();
    assert!(!page.contains("<script>alert"));
    assert!(!page.contains("</script><script>"));
}
