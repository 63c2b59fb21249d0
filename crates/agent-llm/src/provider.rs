use agent_core::ApiVendor;
use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest_middleware::Error> for LLMError {
    /// Request URLs are stripped so nothing carried in them reaches logs.
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(e) => LLMError::Http(e.without_url()),
            reqwest_middleware::Error::Middleware(e) => LLMError::Api(e.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// A single-turn completion: one user prompt, one text reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    /// Empty means the provider's default model.
    pub model: String,
    pub parameters: Map<String, Value>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_parameters(mut self, parameters: Map<String, Value>) -> Self {
        self.parameters = parameters;
        self
    }
}

#[async_trait]
pub trait LLMProvider: Send + Sync {
    fn vendor(&self) -> ApiVendor;

    /// Send the prompt and return the generated text.
    ///
    /// # Arguments
    /// * `request` - Prompt, model override and vendor parameters
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
