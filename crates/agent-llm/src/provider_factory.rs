//! Provider Factory
//!
//! Creates LLM providers from configuration.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use agent_core::{ApiVendor, Config};

use crate::client::build_http_client;
use crate::provider::{LLMError, LLMProvider};
use crate::providers::{GeminiProvider, GrokProvider, OpenAIProvider};

fn client_unavailable(vendor: ApiVendor) -> LLMError {
    LLMError::Auth(format!(
        "Could not initialize the {} client. Check API keys.",
        vendor
    ))
}

/// Validate provider configuration without creating the provider
pub fn validate_provider_config(vendor: ApiVendor, config: &Config) -> Result<(), LLMError> {
    match config.providers.get(vendor).key() {
        Some(_) => Ok(()),
        None => Err(client_unavailable(vendor)),
    }
}

/// Create the provider for `vendor` with a retrying HTTP client.
pub fn create_provider(vendor: ApiVendor, config: &Config) -> Result<Arc<dyn LLMProvider>, LLMError> {
    validate_provider_config(vendor, config)?;
    let provider_config = config.providers.get(vendor);
    let api_key = provider_config.key().unwrap_or_default();

    let client = build_http_client(
        Duration::from_secs(config.timeout_secs(vendor)),
        config.http.max_retries,
    )?;

    let provider: Arc<dyn LLMProvider> = match vendor {
        ApiVendor::Gemini => {
            let mut provider = GeminiProvider::new(api_key).with_client(client);
            if let Some(base_url) = provider_config.base_url() {
                provider = provider.with_base_url(base_url);
            }
            Arc::new(provider)
        }
        ApiVendor::OpenAI => {
            let mut provider = OpenAIProvider::new(api_key).with_client(client);
            if let Some(base_url) = provider_config.base_url() {
                provider = provider.with_base_url(base_url);
            }
            Arc::new(provider)
        }
        ApiVendor::Grok => {
            let mut provider = GrokProvider::new(api_key).with_client(client);
            if let Some(base_url) = provider_config.base_url() {
                provider = provider.with_base_url(base_url);
            }
            Arc::new(provider)
        }
    };

    log::debug!("{} provider initialized", vendor);
    Ok(provider)
}

/// Providers keyed by vendor. Vendors without a key are simply absent and
/// report an authentication error when requested.
#[derive(Clone, Default)]
pub struct ProviderSet {
    providers: HashMap<ApiVendor, Arc<dyn LLMProvider>>,
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut set = Self::new();
        for vendor in ApiVendor::ALL {
            match create_provider(vendor, config) {
                Ok(provider) => {
                    set.providers.insert(vendor, provider);
                }
                Err(e) => log::debug!("{} provider unavailable: {}", vendor, e),
            }
        }
        set
    }

    /// Registers `provider` under the vendor it reports.
    pub fn with_provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.insert(provider);
        self
    }

    pub fn insert(&mut self, provider: Arc<dyn LLMProvider>) {
        self.providers.insert(provider.vendor(), provider);
    }

    pub fn get(&self, vendor: ApiVendor) -> Result<Arc<dyn LLMProvider>, LLMError> {
        self.providers
            .get(&vendor)
            .cloned()
            .ok_or_else(|| client_unavailable(vendor))
    }

    pub fn is_available(&self, vendor: ApiVendor) -> bool {
        self.providers.contains_key(&vendor)
    }

    pub fn available(&self) -> Vec<ApiVendor> {
        ApiVendor::ALL
            .into_iter()
            .filter(|vendor| self.is_available(*vendor))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_openai_key() -> Config {
        let mut config = Config::default();
        config.providers.openai.api_key = Some("sk-test".to_string());
        config
    }

    #[test]
    fn missing_key_is_auth_error() {
        let config = Config::default();
        match create_provider(ApiVendor::Gemini, &config) {
            Err(LLMError::Auth(message)) => assert_eq!(
                message,
                "Could not initialize the Gemini client. Check API keys."
            ),
            Err(other) => panic!("expected auth error, got {}", other),
            Ok(_) => panic!("expected auth error"),
        }
    }

    #[test]
    fn blank_key_is_rejected() {
        let mut config = Config::default();
        config.providers.grok.api_key = Some("   ".to_string());
        assert!(validate_provider_config(ApiVendor::Grok, &config).is_err());
    }

    #[test]
    fn creates_provider_for_configured_vendor() {
        let config = config_with_openai_key();
        let provider = create_provider(ApiVendor::OpenAI, &config).unwrap();
        assert_eq!(provider.vendor(), ApiVendor::OpenAI);
    }

    #[test]
    fn provider_set_only_holds_configured_vendors() {
        let set = ProviderSet::from_config(&config_with_openai_key());
        assert_eq!(set.available(), vec![ApiVendor::OpenAI]);
        assert!(set.get(ApiVendor::OpenAI).is_ok());
        assert!(matches!(set.get(ApiVendor::Grok), Err(LLMError::Auth(_))));
    }
}
