pub mod client;
pub mod provider;
pub mod provider_factory;
pub mod providers;

pub use client::build_http_client;
pub use provider::{CompletionRequest, LLMError, LLMProvider, Result};
pub use provider_factory::{create_provider, validate_provider_config, ProviderSet};
pub use providers::{GeminiProvider, GrokProvider, OpenAIProvider};
