use hanyu_types::{AppEvent, ErrorKind, Request, Response};
use serde_json::json;

use super::state;
use crate::background::BackgroundService;

fn service() -> (BackgroundService, kanal::AsyncReceiver<AppEvent>) {
    let (tx, rx) = kanal::bounded_async(8);
    (BackgroundService::new(state(), tx), rx)
}

#[tokio::test]
async fn unknown_action_is_answered_with_failure() {
    let (service, _events) = service();

    let response = service
        .handle_raw(&json!({ "action": "teleport" }).to_string())
        .await;
    assert_eq!(response, Response::failure("Unknown action", None));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({ "success": false, "error": "Unknown action" })
    );
}

#[tokio::test]
async fn known_action_missing_fields_is_malformed() {
    let (service, _events) = service();

    let response = service
        .handle_raw(&json!({ "action": "translate" }).to_string())
        .await;
    assert!(!response.is_success());
    assert_eq!(response.kind, Some(ErrorKind::Schema));
    assert!(response.error.unwrap().starts_with("Malformed request:"));
}

#[tokio::test]
async fn requests_without_api_key_fail_before_any_call() {
    let (service, _events) = service();

    for request in [
        Request::Translate {
            text: "你好".to_string(),
        },
        Request::Pronounce {
            text: "你好".to_string(),
        },
        Request::PronouncePartial {
            text: "你".to_string(),
        },
    ] {
        let response = service.handle(request).await;
        assert!(!response.is_success());
        assert_eq!(response.error.as_deref(), Some("API Key not set"));
        assert_eq!(response.kind, Some(ErrorKind::Configuration));
    }
}

#[tokio::test]
async fn plugin_state_is_read_and_persisted() {
    let state = state();
    let (tx, events) = kanal::bounded_async(8);
    let service = BackgroundService::new(state.clone(), tx);

    let response = service.handle(Request::GetPluginState).await;
    assert_eq!(response, Response::plugin_state(true));
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({ "enabled": true })
    );

    let response = service
        .handle_raw(r#"{"action":"updatePluginState","enabled":false}"#)
        .await;
    assert_eq!(response.enabled, Some(false));
    assert_eq!(
        events.recv().await.unwrap(),
        AppEvent::PluginStateChanged { enabled: false }
    );

    let path = state.settings.read().await.path().to_path_buf();
    let reopened = hanyu_config::SettingsStore::open(path).unwrap();
    assert!(!reopened.enabled());
}

#[tokio::test]
async fn api_key_written_elsewhere_is_picked_up() {
    let state = state();
    let (tx, _events) = kanal::bounded_async(8);
    let service = BackgroundService::new(state.clone(), tx);

    let path = state.settings.read().await.path().to_path_buf();
    let mut other = hanyu_config::SettingsStore::open(&path).unwrap();
    other.set_enabled(false).unwrap();

    let response = service.handle(Request::GetPluginState).await;
    assert_eq!(response.enabled, Some(false));
}
