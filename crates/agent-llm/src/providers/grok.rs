//! xAI Grok provider. xAI serves an OpenAI-compatible chat API.

use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;

use crate::client::{plain_client, post_json, ApiKey};
use crate::provider::{CompletionRequest, LLMProvider, Result};
use agent_core::ApiVendor;

use super::common::openai_compat::{build_chat_body, extract_reply, ChatCompletionResponse};

pub struct GrokProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

impl GrokProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: plain_client(),
            api_key: api_key.into(),
            base_url: "https://api.x.ai/v1".to_string(),
            model: ApiVendor::Grok.default_model().to_string(),
        }
    }

    pub fn with_client(mut self, client: ClientWithMiddleware) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl LLMProvider for GrokProvider {
    fn vendor(&self) -> ApiVendor {
        ApiVendor::Grok
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        log::debug!("Grok completion with model '{}'", model);

        let body = build_chat_body(model, &request.prompt, &request.parameters);
        let response: ChatCompletionResponse = post_json(
            &self.client,
            "Grok",
            &format!("{}/chat/completions", self.base_url),
            ApiKey::Bearer(&self.api_key),
            &body,
        )
        .await?;

        extract_reply("Grok", response)
    }
}
