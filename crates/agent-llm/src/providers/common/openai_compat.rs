//! OpenAI-compatible chat completion helpers.
//!
//! OpenAI and xAI accept the same `/chat/completions` request and reply
//! shape, so both providers build their bodies and read their replies here.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::unusual_finish_reason;
use crate::provider::{LLMError, Result};

/// Builds a non-streaming chat body with one user message. Vendor
/// parameters are merged on top and may override `model`.
pub fn build_chat_body(model: &str, prompt: &str, parameters: &Map<String, Value>) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [{ "role": "user", "content": prompt }],
    });

    if let Value::Object(fields) = &mut body {
        for (key, value) in parameters {
            if key == "messages" {
                log::warn!("Ignoring 'messages' parameter; the prompt is the only message");
                continue;
            }
            fields.insert(key.clone(), value.clone());
        }
    }

    body
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Text of the first choice. A non-`stop` finish reason is logged.
pub fn extract_reply(vendor: &str, response: ChatCompletionResponse) -> Result<String> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LLMError::EmptyResponse(vendor.to_string()))?;

    if let Some(reason) = unusual_finish_reason(choice.finish_reason.as_deref()) {
        log::warn!("{} finished with reason '{}'; the reply may be incomplete", vendor, reason);
    }

    choice
        .message
        .and_then(|message| message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| LLMError::EmptyResponse(vendor.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_has_single_user_message() {
        let body = build_chat_body("gpt-4o-mini", "Hello", &Map::new());
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert!(body.get("stream").is_none());
    }

    #[test]
    fn parameters_are_merged() {
        let mut params = Map::new();
        params.insert("temperature".into(), json!(0.2));
        params.insert("max_tokens".into(), json!(512));
        params.insert("messages".into(), json!([]));

        let body = build_chat_body("gpt-5-nano", "Hi", &params);
        assert_eq!(body["temperature"], 0.2);
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["content"], "Hi");
    }

    #[test]
    fn extracts_first_choice() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "first" }, "finish_reason": "stop" },
                { "message": { "role": "assistant", "content": "second" } }
            ]
        }))
        .unwrap();
        assert_eq!(extract_reply("OpenAI", response).unwrap(), "first");
    }

    #[test]
    fn truncated_reply_is_still_returned() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [
                { "message": { "role": "assistant", "content": "partial" }, "finish_reason": "length" }
            ]
        }))
        .unwrap();
        assert_eq!(extract_reply("OpenAI", response).unwrap(), "partial");
    }

    #[test]
    fn missing_content_is_empty_response() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(matches!(
            extract_reply("Grok", response),
            Err(LLMError::EmptyResponse(v)) if v == "Grok"
        ));

        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert!(extract_reply("OpenAI", response).is_err());
    }
}
