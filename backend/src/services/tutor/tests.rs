//! Tutor Service Unit Tests
//!
//! Validation order, the single outbound call and error mapping.

use super::*;
use crate::models::{AskRequest, ChatMessage, ChatRole};
use crate::tests::common::{
    MockCompletionClient, create_test_service, create_test_service_with_timeout,
};
use crate::utils::ApiError;
use serde_json::{Value, json};
use std::time::Duration;

fn ask_request(message: &str, mode: Option<&str>, language: Option<&str>) -> AskRequest {
    AskRequest {
        message: message.to_string(),
        mode: mode.map(Value::from),
        language: language.map(Value::from),
        history: None,
    }
}

#[tokio::test]
async fn test_empty_message_is_rejected_without_call() {
    let mock = MockCompletionClient::answering("unused");
    let service = create_test_service(Some(mock.clone()));

    for message in ["", "   ", "\n\t "] {
        let result = service.ask(&ask_request(message, None, None)).await;
        assert!(matches!(result, Err(ApiError::EmptyInput)), "message {:?}", message);
    }
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_empty_message_checked_before_credential() {
    let service = create_test_service(None);
    let result = service.ask(&ask_request(" ", None, None)).await;
    assert!(matches!(result, Err(ApiError::EmptyInput)));
}

#[tokio::test]
async fn test_missing_credential() {
    let service = create_test_service(None);
    assert!(!service.is_available());

    let result = service.ask(&ask_request("Hallo", Some("dialog"), Some("de"))).await;
    assert!(matches!(result, Err(ApiError::MissingCredential)));
}

#[tokio::test]
async fn test_dialog_request_forwards_one_call() {
    let mock = MockCompletionClient::answering("\n  Mir geht's gut!\n\nTip: ...  \n");
    let service = create_test_service(Some(mock.clone()));

    let answer = service
        .ask(&ask_request("  Hallo, wie geht's?  ", Some("dialog"), Some("de")))
        .await
        .expect("answer");
    assert_eq!(answer, "Mir geht's gut!\n\nTip: ...");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.model, "gpt-4o-mini");
    assert_eq!(call.temperature, 0.5);
    assert_eq!(call.messages.len(), 2);
    assert_eq!(call.messages[0].role, ChatRole::System);
    assert!(call.messages[0].content.contains("German"));
    assert!(call.messages[0].content.contains("1) First, answer in the target language"));
    assert_eq!(call.messages[1], ChatMessage::user("Hallo, wie geht's?"));
}

#[tokio::test]
async fn test_defaults_are_dialog_and_english() {
    let mock = MockCompletionClient::answering("ok");
    let service = create_test_service(Some(mock.clone()));

    service.ask(&ask_request("Hello", None, None)).await.expect("answer");

    let system = &mock.calls()[0].messages[0];
    assert_eq!(system.content, Mode::Dialog.system_prompt("English"));
}

#[tokio::test]
async fn test_history_is_filtered_and_forwarded() {
    let mock = MockCompletionClient::answering("ok");
    let service = create_test_service(Some(mock.clone()));

    let req = AskRequest {
        message: "Et maintenant?".to_string(),
        mode: Some(json!("explain")),
        language: Some(json!("fr")),
        history: Some(json!([
            {"role": "user", "content": "Bonjour"},
            {"role": "tool", "content": "dropped"},
            {"role": "assistant", "content": "Salut!"},
            {"role": "assistant", "content": 3}
        ])),
    };
    service.ask(&req).await.expect("answer");

    let messages = &mock.calls()[0].messages;
    let roles: Vec<_> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![ChatRole::System, ChatRole::User, ChatRole::Assistant, ChatRole::User]
    );
    assert!(messages[0].content.starts_with("You are a French teacher"));
    assert_eq!(messages[1].content, "Bonjour");
    assert_eq!(messages[2].content, "Salut!");
    assert_eq!(messages[3].content, "Et maintenant?");
}

#[tokio::test]
async fn test_upstream_error_text_is_passed_through() {
    let mock = MockCompletionClient::failing(|| CompletionError::Api {
        status: 429,
        body: "Rate limit reached".to_string(),
    });
    let service = create_test_service(Some(mock.clone()));

    let err = service.ask(&ask_request("Ciao", Some("dialog"), Some("it"))).await.unwrap_err();
    match err {
        ApiError::Upstream(text) => assert_eq!(text, "Error code: 429 - Rate limit reached"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(mock.calls().len(), 1, "no retries");
}

#[tokio::test]
async fn test_timeout_maps_to_upstream_error() {
    let mock = MockCompletionClient::hanging();
    let service = create_test_service_with_timeout(Some(mock.clone()), Duration::from_millis(50));

    let err = service.ask(&ask_request("Hola", Some("dialog"), Some("es"))).await.unwrap_err();
    match err {
        ApiError::Upstream(text) => assert!(text.starts_with("Request timed out")),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(mock.calls().len(), 1);
}
