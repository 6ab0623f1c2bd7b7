//! Response normalization
//!
//! Turns whatever an adapter call returned into the plain text shown to the
//! user. Unknown shapes are displayed as the serialized response instead of
//! failing.

use crate::providers::RawResponse;

/// Extract the generated text from a raw adapter response
///
/// Shapes are tried in order:
///
/// 1. typed chat body: first choice → message → content
/// 2. untyped JSON: `choices[0].message.content`
/// 3. legacy: first choice → text (typed or untyped)
/// 4. the whole response, serialized
///
/// # Examples
///
/// ```
/// use troubleshoot::providers::{extract_text, RawResponse};
/// use serde_json::json;
///
/// let raw = RawResponse::Untyped(json!({"choices": [{"text": "Restart the resolver"}]}));
/// assert_eq!(extract_text(&raw), "Restart the resolver");
///
/// let raw = RawResponse::Untyped(json!({"error": "quota"}));
/// assert_eq!(extract_text(&raw), r#"{"error":"quota"}"#);
/// ```
pub fn extract_text(raw: &RawResponse) -> String {
    if let Some(text) = chat_content(raw) {
        return text;
    }

    if let Some(text) = untyped_chat_content(raw) {
        return text;
    }

    if let Some(text) = legacy_text(raw) {
        return text;
    }

    tracing::warn!("Unrecognized completion response shape, displaying raw response");
    raw.to_string()
}

fn chat_content(raw: &RawResponse) -> Option<String> {
    match raw {
        RawResponse::Chat(body) => body.choices.first()?.message.content.clone(),
        _ => None,
    }
}

fn untyped_chat_content(raw: &RawResponse) -> Option<String> {
    match raw {
        RawResponse::Untyped(value) => value
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        _ => None,
    }
}

fn legacy_text(raw: &RawResponse) -> Option<String> {
    match raw {
        RawResponse::Text(body) => body.choices.first().map(|c| c.text.clone()),
        RawResponse::Untyped(value) => value
            .pointer("/choices/0/text")
            .and_then(|v| v.as_str())
            .map(str::to_string),
        RawResponse::Chat(_) => None,
    }
}
