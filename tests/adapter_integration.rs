use serde_json::json;

use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use troubleshoot::config::{ApiStyle, ProviderConfig};
use troubleshoot::providers::{
    create_adapter, detect_api_style, extract_text, select_adapter, ChatCompletionsAdapter,
    CompletionAdapter, LegacyCompletionsAdapter, Message, RawResponse,
};

fn provider_config(api_base: String, api_style: ApiStyle) -> ProviderConfig {
    ProviderConfig {
        api_base,
        model: "gpt-3.5-turbo".to_string(),
        api_style,
    }
}

/// Chat adapter sends role/content messages with a bearer token
#[tokio::test]
async fn test_chat_adapter_request_and_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "server returns 502"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Check upstream health"}}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 3, "total_tokens": 15}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = ChatCompletionsAdapter::new(&server.uri(), "sk-test").unwrap();
    let raw = adapter
        .complete(
            &[Message::system("sys"), Message::user("server returns 502")],
            "gpt-3.5-turbo",
        )
        .await
        .unwrap();

    assert!(matches!(raw, RawResponse::Chat(_)));
    assert_eq!(extract_text(&raw), "Check upstream health");
}

/// Legacy adapter sends the same messages and reads the reply by key lookup
#[tokio::test]
async fn test_legacy_adapter_request_and_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "gpt-3.5-turbo",
            "messages": [
                {"role": "system", "content": "sys"},
                {"role": "user", "content": "disk full on /var"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "Rotate the logs in /var/log."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = LegacyCompletionsAdapter::new(&server.uri(), "sk-test").unwrap();
    let raw = adapter
        .complete(
            &[Message::system("sys"), Message::user("disk full on /var")],
            "gpt-3.5-turbo",
        )
        .await
        .unwrap();

    assert!(matches!(raw, RawResponse::Untyped(_)));
    assert_eq!(extract_text(&raw), "Rotate the logs in /var/log.");
}

/// A text-shaped legacy reply still normalizes through the fallback path
#[tokio::test]
async fn test_legacy_adapter_text_shape_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": " Restart named."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = LegacyCompletionsAdapter::new(&server.uri(), "sk-test").unwrap();
    let raw = adapter
        .complete(&[Message::user("dns fails")], "gpt-3.5-turbo")
        .await
        .unwrap();

    assert_eq!(extract_text(&raw), " Restart named.");
}

/// Unexpected body shapes still normalize to non-empty text
#[tokio::test]
async fn test_chat_adapter_unrecognized_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("plain text reply"))
        .mount(&server)
        .await;

    let adapter = ChatCompletionsAdapter::new(&server.uri(), "sk-test").unwrap();
    let raw = adapter
        .complete(&[Message::user("hi")], "gpt-3.5-turbo")
        .await
        .unwrap();

    let text = extract_text(&raw);
    assert!(!text.is_empty());
    assert!(text.contains("plain text reply"));
}

/// Non-success statuses surface as provider errors carrying the status
#[tokio::test]
async fn test_adapter_error_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = ChatCompletionsAdapter::new(&server.uri(), "sk-bad").unwrap();
    let err = adapter
        .complete(&[Message::user("hi")], "gpt-3.5-turbo")
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("401"));
    assert!(message.contains("invalid api key"));
}

/// No retry: a failing call is made exactly once
#[tokio::test]
async fn test_adapter_does_not_retry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = create_adapter(
        ApiStyle::Legacy,
        &provider_config(server.uri(), ApiStyle::Legacy),
        "sk-test",
    )
    .unwrap();
    assert!(adapter.complete(&[Message::user("hi")], "m").await.is_err());
}

#[tokio::test]
async fn test_probe_404_selects_legacy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let style = detect_api_style(&server.uri(), "sk-test").await.unwrap();
    assert_eq!(style, ApiStyle::Legacy);
}

#[tokio::test]
async fn test_probe_success_selects_chat() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let style = detect_api_style(&server.uri(), "sk-test").await.unwrap();
    assert_eq!(style, ApiStyle::Chat);
}

#[tokio::test]
async fn test_probe_auth_failure_selects_chat() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let style = detect_api_style(&server.uri(), "sk-test").await.unwrap();
    assert_eq!(style, ApiStyle::Chat);
}

/// Auto selection probes once and the chosen adapter is used for every call
#[tokio::test]
async fn test_select_adapter_auto_uses_probe_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(405))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "ok"}]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let adapter = select_adapter(&provider_config(server.uri(), ApiStyle::Auto), "sk-test")
        .await
        .unwrap();
    assert_eq!(adapter.api_style(), ApiStyle::Legacy);

    for _ in 0..2 {
        let raw = adapter.complete(&[Message::user("hi")], "m").await.unwrap();
        assert_eq!(extract_text(&raw), "ok");
    }
}
