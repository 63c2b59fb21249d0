use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;

use crate::client::{plain_client, post_json, ApiKey};
use crate::provider::{CompletionRequest, LLMProvider, Result};
use agent_core::ApiVendor;

use super::common::openai_compat::{build_chat_body, extract_reply, ChatCompletionResponse};

pub struct OpenAIProvider {
    client: ClientWithMiddleware,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: plain_client(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: ApiVendor::OpenAI.default_model().to_string(),
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
impl LLMProvider for OpenAIProvider {
    fn vendor(&self) -> ApiVendor {
        ApiVendor::OpenAI
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        log::debug!("OpenAI completion with model '{}'", model);

        let body = build_chat_body(model, &request.prompt, &request.parameters);
        let response: ChatCompletionResponse = post_json(
            &self.client,
            "OpenAI",
            &format!("{}/chat/completions", self.base_url),
            ApiKey::Bearer(&self.api_key),
            &body,
        )
        .await?;

        extract_reply("OpenAI", response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_provider() {
        let provider = OpenAIProvider::new("test_key");
        assert_eq!(provider.api_key, "test_key");
        assert_eq!(provider.base_url, "https://api.openai.com/v1");
        assert_eq!(provider.model, "gpt-5-nano");
    }

    #[test]
    fn test_chained_builders() {
        let provider = OpenAIProvider::new("test_key")
            .with_base_url("https://custom.openai.com/v1/")
            .with_model("gpt-4o-mini");

        assert_eq!(provider.base_url, "https://custom.openai.com/v1");
        assert_eq!(provider.model, "gpt-4o-mini");
        assert_eq!(provider.vendor(), ApiVendor::OpenAI);
    }
}
