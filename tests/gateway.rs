//! Контракт обёртки HTTP-шлюза: заголовки и разбор ошибок.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sharthi_client::api::ApiError;
use sharthi_client::config::{ApiConfig, AppConfig, Config, FeeConfig, StorageConfig, UploadConfig};
use sharthi_client::models::{AuthUser, Role};
use sharthi_client::notify::MemoryNotifier;
use sharthi_client::AppState;

fn test_config(base_url: &str, dir: &std::path::Path) -> Config {
    Config {
        app: AppConfig {
            rust_log: "off".to_string(),
        },
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        },
        storage: StorageConfig {
            dir: dir.to_string_lossy().into_owned(),
        },
        fees: FeeConfig {
            platform_fee: 0,
            gst: 0,
        },
        upload: UploadConfig {
            base_url: base_url.to_string(),
            cloud_name: "test".to_string(),
            upload_preset: "default".to_string(),
        },
    }
}

fn test_state(server: &MockServer, dir: &tempfile::TempDir) -> Arc<AppState> {
    AppState::with_notifier(
        test_config(&server.uri(), dir.path()),
        Arc::new(MemoryNotifier::new()),
    )
}

fn user() -> AuthUser {
    AuthUser {
        id: "U1".to_string(),
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        role: Role::Creator,
    }
}

#[tokio::test]
async fn extracts_message_error_and_detail_fields() {
    for (body, expected) in [
        (json!({"message": "Stall sold out"}), "Stall sold out"),
        (json!({"error": "Bad token"}), "Bad token"),
        (json!({"detail": "Invalid eventId"}), "Invalid eventId"),
        // message имеет приоритет над остальными
        (
            json!({"detail": "x", "error": "y", "message": "wins"}),
            "wins",
        ),
    ] {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&server, &dir);

        Mock::given(method("GET"))
            .and(path("/fail"))
            .respond_with(ResponseTemplate::new(400).set_body_json(body))
            .mount(&server)
            .await;

        match state.api.get_json::<serde_json::Value>("/fail").await {
            Err(ApiError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, expected);
            }
            other => panic!("expected ApiError::Api, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn malformed_error_body_falls_back_to_status_text() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/fail"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    match state.api.get_json::<serde_json::Value>("/fail").await {
        Err(ApiError::Api { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Internal Server Error");
        }
        other => panic!("expected ApiError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn error_body_without_known_fields_falls_back_to_status_text() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/fail"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"code": 2001})))
        .mount(&server)
        .await;

    match state.api.get_json::<serde_json::Value>("/fail").await {
        Err(ApiError::Api { message, .. }) => assert_eq!(message, "Not Found"),
        other => panic!("expected ApiError::Api, got {:?}", other),
    }
}

#[tokio::test]
async fn bearer_header_only_when_token_present() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    // Без сессии заголовка Authorization нет вовсе
    state
        .api
        .get_json::<serde_json::Value>("/auth/me")
        .await
        .unwrap();

    // Пустой токен тоже не отправляется
    state.store.save_auth("", &user());
    state
        .api
        .get_json::<serde_json::Value>("/auth/me")
        .await
        .unwrap();

    // С токеном уходит Bearer
    state.store.save_auth("test-token", &user());
    state
        .api
        .get_json::<serde_json::Value>("/auth/me")
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert!(!requests[0].headers.contains_key("authorization"));
    assert!(!requests[1].headers.contains_key("authorization"));
    assert_eq!(
        requests[2]
            .headers
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap(),
        "Bearer test-token"
    );
}

#[tokio::test]
async fn json_content_type_is_always_set_on_json_calls() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&server, &dir);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    state
        .api
        .post_json::<serde_json::Value>("/auth/login", &json!({"email": "a@b.c"}))
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0].headers.get("content-type").unwrap();
    assert!(content_type
        .to_str()
        .unwrap()
        .starts_with("application/json"));
}

#[tokio::test]
async fn transport_failure_surfaces_as_network_error() {
    let dir = tempfile::tempdir().unwrap();
    // На этом порту никто не слушает
    let config = test_config("http://127.0.0.1:1", dir.path());
    let state = AppState::with_notifier(config, Arc::new(MemoryNotifier::new()));

    match state.api.get_json::<serde_json::Value>("/events").await {
        Err(ApiError::Transport(_)) => {}
        other => panic!("expected ApiError::Transport, got {:?}", other),
    }
}

#[tokio::test]
async fn decode_failure_on_mismatched_success_body() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let state = test_state(&server, &dir);

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    match state.api.get_json::<serde_json::Value>("/events").await {
        Err(ApiError::Decode(_)) => {}
        other => panic!("expected ApiError::Decode, got {:?}", other),
    }
}
