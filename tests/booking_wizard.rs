//! Протокол мастера бронирования против мок-бэкенда.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sharthi_client::config::{ApiConfig, AppConfig, Config, FeeConfig, StorageConfig, UploadConfig};
use sharthi_client::models::{AuthUser, BookingDraft, Role};
use sharthi_client::notify::MemoryNotifier;
use sharthi_client::services::booking::{BookingWizard, WizardStep};
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

fn test_state(server: &MockServer, dir: &tempfile::TempDir) -> (Arc<AppState>, Arc<MemoryNotifier>) {
    let notifier = Arc::new(MemoryNotifier::new());
    let state = AppState::with_notifier(test_config(&server.uri(), dir.path()), notifier.clone());
    (state, notifier)
}

fn draft() -> BookingDraft {
    BookingDraft {
        event_id: "E1".to_string(),
        stall_id: "S1".to_string(),
        tier: "Premium".to_string(),
        price: 8000,
    }
}

fn signed_in(state: &AppState) {
    let user = AuthUser {
        id: "U1".to_string(),
        name: "Asha".to_string(),
        email: "asha@example.com".to_string(),
        role: Role::Creator,
    };
    state.store.save_auth("test-token", &user);
}

async fn mount_lookup_mocks(server: &MockServer, qty_left: i64) {
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "E1", "title": "Winter Craft Fair", "cityId": "Delhi", "startAt": "2025-12-01T10:00:00"}
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events/E1/stalls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "S1", "name": "A-1", "tier": "SILVER", "price": 8000, "qtyTotal": 10, "qtyLeft": qty_left}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn mount_without_draft_invokes_back_and_builds_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (state, notifier) = test_state(&server, &dir);

    // Никаких сетевых вызовов без черновика
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let went_back = AtomicBool::new(false);
    let wizard = BookingWizard::mount(state, || went_back.store(true, Ordering::SeqCst)).await;

    assert!(wizard.is_none());
    assert!(went_back.load(Ordering::SeqCst));
    assert!(notifier.messages().contains(&"No stall selected.".to_string()));
}

#[tokio::test]
async fn happy_path_submits_total_and_clears_draft() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (state, _notifier) = test_state(&server, &dir);

    mount_lookup_mocks(&server, 3).await;

    Mock::given(method("POST"))
        .and(path("/payments/mock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paymentRef": "PAY-REF-1"})))
        .expect(1)
        .mount(&server)
        .await;

    // total = base + platform + gst = 8000 + 0 + 0
    Mock::given(method("POST"))
        .and(path("/bookings"))
        .and(body_json(json!({
            "eventId": "E1",
            "stallId": "S1",
            "amount": 8000,
            "paymentRef": "PAY-REF-1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "B1"})))
        .expect(1)
        .mount(&server)
        .await;

    signed_in(&state);
    state.store.save_draft(&draft());

    let mut wizard = BookingWizard::mount(state.clone(), || {}).await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Review);
    assert_eq!(wizard.event().unwrap().title, "Winter Craft Fair");

    let totals = wizard.totals();
    assert_eq!(totals.base, 8000);
    assert_eq!(totals.platform, 0);
    assert_eq!(totals.gst, 0);
    assert_eq!(totals.total(), 8000);

    assert!(wizard.proceed_to_payment());
    assert_eq!(wizard.step(), WizardStep::Payment);

    wizard.submit_payment().await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Success);

    // Черновик удалён строго при успехе
    assert!(state.store.load_draft().is_none());
}

#[tokio::test]
async fn missing_session_submits_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (state, notifier) = test_state(&server, &dir);

    mount_lookup_mocks(&server, 3).await;

    Mock::given(method("POST"))
        .and(path("/payments/mock"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    state.store.save_draft(&draft());

    let mut wizard = BookingWizard::mount(state.clone(), || {}).await.unwrap();
    assert!(wizard.proceed_to_payment());

    let err = wizard.submit_payment().await.unwrap_err();
    assert_eq!(
        err.user_message(),
        "Please sign in to complete your booking."
    );
    assert_eq!(wizard.step(), WizardStep::Payment);
    assert!(state.store.load_draft().is_some());
    assert!(notifier
        .messages()
        .contains(&"Please sign in to complete your booking.".to_string()));
}

#[tokio::test]
async fn rejected_booking_keeps_payment_state_and_draft() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (state, notifier) = test_state(&server, &dir);

    mount_lookup_mocks(&server, 1).await;

    Mock::given(method("POST"))
        .and(path("/payments/mock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paymentRef": "PAY-REF-2"})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"message": "Stall sold out"})))
        .mount(&server)
        .await;

    signed_in(&state);
    state.store.save_draft(&draft());

    let mut wizard = BookingWizard::mount(state.clone(), || {}).await.unwrap();
    assert!(wizard.proceed_to_payment());

    let err = wizard.submit_payment().await.unwrap_err();
    assert_eq!(err.user_message(), "Stall sold out");
    assert_eq!(wizard.step(), WizardStep::Payment);
    assert!(state.store.load_draft().is_some());
    assert!(notifier.messages().contains(&"Stall sold out".to_string()));
}

#[tokio::test]
async fn sold_out_tier_blocks_proceed() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (state, _notifier) = test_state(&server, &dir);

    mount_lookup_mocks(&server, 0).await;

    signed_in(&state);
    state.store.save_draft(&draft());

    let mut wizard = BookingWizard::mount(state, || {}).await.unwrap();
    assert!(wizard.known_sold_out());
    assert!(!wizard.can_proceed());
    assert!(!wizard.proceed_to_payment());
    assert_eq!(wizard.step(), WizardStep::Review);
}

#[tokio::test]
async fn unresolved_stall_does_not_block_proceed() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (state, _notifier) = test_state(&server, &dir);

    // Оба lookup-а падают: проекции пустые, сервер остаётся арбитром
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events/E1/stalls"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    state.store.save_draft(&draft());

    let mut wizard = BookingWizard::mount(state, || {}).await.unwrap();
    assert!(wizard.event().is_none());
    assert!(wizard.stall().is_none());
    assert!(!wizard.known_sold_out());
    assert!(wizard.proceed_to_payment());
}

#[tokio::test]
async fn transitions_are_strictly_linear() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let (state, _notifier) = test_state(&server, &dir);

    mount_lookup_mocks(&server, 3).await;

    Mock::given(method("POST"))
        .and(path("/payments/mock"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"paymentRef": "PAY-REF-3"})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "B2"})))
        .mount(&server)
        .await;

    signed_in(&state);
    state.store.save_draft(&draft());

    let mut wizard = BookingWizard::mount(state.clone(), || {}).await.unwrap();

    // Из review назад нельзя, отправлять из review нельзя
    assert!(!wizard.back_to_review());
    assert!(wizard.submit_payment().await.is_err());
    assert_eq!(wizard.step(), WizardStep::Review);

    // review -> payment -> review -> payment
    assert!(wizard.proceed_to_payment());
    assert!(wizard.back_to_review());
    assert_eq!(wizard.step(), WizardStep::Review);
    assert!(wizard.proceed_to_payment());

    wizard.submit_payment().await.unwrap();
    assert_eq!(wizard.step(), WizardStep::Success);

    // Из success выхода нет
    assert!(!wizard.back_to_review());
    assert!(!wizard.proceed_to_payment());
}

#[tokio::test]
async fn fee_config_feeds_three_term_total() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    let mut config = test_config(&server.uri(), dir.path());
    config.fees = FeeConfig {
        platform_fee: 250,
        gst: 1440,
    };
    let state = AppState::with_notifier(config, Arc::new(MemoryNotifier::new()));

    mount_lookup_mocks(&server, 3).await;
    state.store.save_draft(&draft());

    let wizard = BookingWizard::mount(state, || {}).await.unwrap();
    let totals = wizard.totals();
    assert_eq!(totals.total(), 8000 + 250 + 1440);
}
