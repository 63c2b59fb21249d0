//! Gemini `generateContent` wire types.
//!
//! Gemini differs from the OpenAI shape:
//! - Messages are called "contents"
//! - Content is an array of "parts"
//! - Sampling options live in "generationConfig" with camelCase keys

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentRequest {
    pub fn from_prompt(prompt: &str, parameters: &Map<String, Value>) -> Self {
        let generation_config = generation_config(parameters);
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: (!generation_config.is_empty()).then_some(generation_config),
        }
    }
}

/// Maps OpenAI-style parameter names onto `generationConfig` keys.
/// Unrecognized keys are passed through unchanged.
pub fn generation_config(parameters: &Map<String, Value>) -> Map<String, Value> {
    let mut config = Map::new();
    for (key, value) in parameters {
        let (name, value) = match key.as_str() {
            "max_tokens" | "max_output_tokens" => ("maxOutputTokens", value.clone()),
            "top_p" => ("topP", value.clone()),
            "top_k" => ("topK", value.clone()),
            "stop" => (
                "stopSequences",
                match value {
                    Value::String(_) => Value::Array(vec![value.clone()]),
                    other => other.clone(),
                },
            ),
            other => (other, value.clone()),
        };
        config.insert(name.to_string(), value);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn maps_known_parameters() {
        let params = json!({
            "temperature": 0.4,
            "max_tokens": 1024,
            "top_p": 0.9,
            "top_k": 40,
            "stop": "END",
            "candidateCount": 1
        });
        let config = generation_config(params.as_object().unwrap());
        assert_eq!(config["temperature"], 0.4);
        assert_eq!(config["maxOutputTokens"], 1024);
        assert_eq!(config["topP"], 0.9);
        assert_eq!(config["topK"], 40);
        assert_eq!(config["stopSequences"], json!(["END"]));
        assert_eq!(config["candidateCount"], 1);
        assert!(!config.contains_key("max_tokens"));
    }

    #[test]
    fn request_serializes_camel_case() {
        let params = json!({ "max_tokens": 10 });
        let request = GenerateContentRequest::from_prompt("Hello", params.as_object().unwrap());
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["role"], "user");
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Hello");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 10);
    }

    #[test]
    fn empty_parameters_omit_generation_config() {
        let request = GenerateContentRequest::from_prompt("Hello", &Map::new());
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("generationConfig").is_none());
    }
}
