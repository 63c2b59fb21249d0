//! Google Gemini provider implementation.

mod types;

pub use types::{generation_config, GenerateContentRequest, GenerateContentResponse};

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;

use crate::client::{plain_client, post_json, ApiKey};
use crate::providers::common::unusual_finish_reason;
use crate::provider::{CompletionRequest, LLMError, LLMProvider, Result};
use agent_core::ApiVendor;

/// Google Gemini API provider.
pub struct GeminiProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider with an API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: plain_client(),
            api_key: api_key.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: ApiVendor::Gemini.default_model().to_string(),
        }
    }

    pub fn with_client(mut self, client: ClientWithMiddleware) -> Self {
        self.client = client;
        self
    }

    /// Set a custom base URL (e.g., for proxies or alternative endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// The key travels in the `x-goog-api-key` header, never in the URL.
    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

/// Concatenated text parts of the first candidate.
pub fn extract_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        return Err(LLMError::Api(format!(
            "Gemini blocked the prompt: {}",
            reason
        )));
    }

    let candidate = response.candidates.into_iter().next();
    if let Some(reason) =
        unusual_finish_reason(candidate.as_ref().and_then(|c| c.finish_reason.as_deref()))
    {
        log::warn!("Gemini finished with reason '{}'; the reply may be incomplete", reason);
    }

    let text: String = candidate
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(LLMError::EmptyResponse("Gemini".to_string()));
    }
    Ok(text)
}

#[async_trait]
impl LLMProvider for GeminiProvider {
    fn vendor(&self) -> ApiVendor {
        ApiVendor::Gemini
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        log::debug!("Gemini completion with model '{}'", model);

        let body = GenerateContentRequest::from_prompt(&request.prompt, &request.parameters);
        let response: GenerateContentResponse = post_json(
            &self.client,
            "Gemini",
            &self.endpoint(model),
            ApiKey::Header("x-goog-api-key", &self.api_key),
            &body,
        )
        .await?;

        extract_text(response)
    }
}
