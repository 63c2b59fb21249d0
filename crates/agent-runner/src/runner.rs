use std::collections::{BTreeMap, HashMap};

use sha2::{Digest, Sha256};

use agent_core::template::render_with;
use agent_core::{AgentCatalog, AgentSpec, ApiVendor, Config};
use agent_llm::{CompletionRequest, ProviderSet};

use crate::error::{Result, RunnerError};

/// Dispatches agents to their vendor and caches submission-style calls.
pub struct AgentRunner {
    providers: ProviderSet,
    catalog: AgentCatalog,
    submission_api: ApiVendor,
    submission_model: String,
    cache: HashMap<String, String>,
}

impl AgentRunner {
    pub fn new(providers: ProviderSet, catalog: AgentCatalog) -> Self {
        let config = Config::default();
        Self {
            providers,
            catalog,
            submission_api: config.submission_api,
            submission_model: config.submission_model,
            cache: HashMap::new(),
        }
    }

    pub fn from_config(config: &Config, catalog: AgentCatalog) -> Self {
        Self::new(ProviderSet::from_config(config), catalog)
            .with_submission_model(config.submission_api, config.submission_model.clone())
    }

    /// Vendor and model used for catalog agents that name no model.
    pub fn with_submission_model(mut self, api: ApiVendor, model: impl Into<String>) -> Self {
        self.submission_api = api;
        self.submission_model = model.into();
        self
    }

    pub fn catalog(&self) -> &AgentCatalog {
        &self.catalog
    }

    pub fn providers(&self) -> &ProviderSet {
        &self.providers
    }

    pub fn cached_responses(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Runs a pipeline agent: fills `{input_text}` and calls the agent's
    /// vendor. A model outside the vendor catalog falls back to the vendor
    /// default.
    pub async fn execute_agent(&self, spec: &AgentSpec, input_text: &str) -> Result<String> {
        let prompt = render_with(&spec.prompt, "input_text", input_text)?;
        let provider = self.providers.get(spec.api)?;
        let model = spec.api.resolve_model(spec.model.as_deref().unwrap_or_default());

        log::info!("Running {} on {} ({})", spec.name, spec.api, model);
        let request = CompletionRequest::new(prompt)
            .with_model(model)
            .with_parameters(spec.parameters.clone());
        let output = provider.complete(&request).await?;
        log::debug!("{} returned {} chars", spec.name, output.len());
        Ok(output)
    }

    /// Runs a catalog agent with a named context. Successful responses are
    /// cached by agent id and context; failures are not.
    pub async fn call_agent(&mut self, agent: &str, context: &HashMap<String, String>) -> Result<String> {
        let spec = self
            .catalog
            .resolve(agent)
            .map_err(|_| RunnerError::UnknownAgent(agent.to_string()))?;

        let key = cache_key(&spec.id, context);
        if let Some(cached) = self.cache.get(&key) {
            log::debug!("Cache hit for {}", spec.id);
            return Ok(cached.clone());
        }

        let prompt = spec.template().render(context)?;
        let provider = self.providers.get(spec.api)?;
        let fallback = if spec.api == self.submission_api {
            self.submission_model.as_str()
        } else {
            spec.api.default_model()
        };
        let model = spec.model_or(fallback);

        log::info!("{} is working ({} / {})", spec.name, spec.api, model);
        let request = CompletionRequest::new(prompt)
            .with_model(model)
            .with_parameters(spec.parameters.clone());
        let output = provider.complete(&request).await?;

        self.cache.insert(key, output.clone());
        Ok(output)
    }
}

/// `agent_id:sha256(context)`, with context entries hashed in key order.
fn cache_key(agent_id: &str, context: &HashMap<String, String>) -> String {
    let ordered: BTreeMap<&String, &String> = context.iter().collect();
    let mut hasher = Sha256::new();
    for (name, value) in ordered {
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(value.as_bytes());
        hasher.update([0u8]);
    }
    format!("{}:{}", agent_id, hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{context, ScriptedProvider};
    use agent_llm::LLMError;
    use std::sync::Arc;

    fn runner(provider: Arc<ScriptedProvider>) -> AgentRunner {
        AgentRunner::new(
            ProviderSet::new().with_provider(provider),
            AgentCatalog::builtin(),
        )
    }

    #[test]
    fn cache_key_ignores_insertion_order() {
        let a = context(&[("topic", "pump"), ("guidance_text", "g")]);
        let b = context(&[("guidance_text", "g"), ("topic", "pump")]);
        assert_eq!(cache_key("x", &a), cache_key("x", &b));
        assert_ne!(cache_key("x", &a), cache_key("y", &a));
        assert_ne!(
            cache_key("x", &context(&[("ab", "c")])),
            cache_key("x", &context(&[("a", "bc")]))
        );
    }

    #[tokio::test]
    async fn execute_agent_fills_input_and_resolves_model() {
        let provider = ScriptedProvider::new(ApiVendor::OpenAI).replying("done");
        let runner = runner(provider.clone());
        let spec = AgentSpec::new("s", "Summarizer", "Summarize: {input_text}")
            .with_api(ApiVendor::OpenAI)
            .with_model("gpt-3.5-turbo")
            .with_parameter("temperature", serde_json::json!(0.1));

        let output = runner.execute_agent(&spec, "the text").await.unwrap();
        assert_eq!(output, "done");

        let request = provider.last_request().unwrap();
        assert_eq!(request.prompt, "Summarize: the text");
        assert_eq!(request.model, "gpt-5-nano");
        assert_eq!(request.parameters["temperature"], 0.1);
    }

    #[tokio::test]
    async fn execute_agent_reports_missing_provider() {
        let provider = ScriptedProvider::new(ApiVendor::Gemini).replying("x");
        let runner = runner(provider);
        let spec = AgentSpec::new("s", "S", "{input_text}").with_api(ApiVendor::Grok);
        match runner.execute_agent(&spec, "in").await {
            Err(RunnerError::Llm(LLMError::Auth(message))) => {
                assert!(message.contains("Grok"))
            }
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn execute_agent_rejects_unknown_placeholders() {
        let provider = ScriptedProvider::new(ApiVendor::Gemini).replying("x");
        let runner = runner(provider.clone());
        let spec = AgentSpec::new("s", "S", "{input_text} for {device}");
        assert!(matches!(
            runner.execute_agent(&spec, "in").await,
            Err(RunnerError::Template(_))
        ));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn call_agent_uses_submission_model_and_caches() {
        let provider = ScriptedProvider::new(ApiVendor::Gemini).replying("risk report");
        let mut runner = runner(provider.clone());
        let ctx = context(&[("content", "device description")]);

        let first = runner.call_agent("risk_analyzer", &ctx).await.unwrap();
        let second = runner.call_agent("risk_analyzer", &ctx).await.unwrap();
        assert_eq!(first, "risk report");
        assert_eq!(second, "risk report");
        assert_eq!(provider.calls(), 1);
        assert_eq!(runner.cached_responses(), 1);

        let request = provider.last_request().unwrap();
        assert_eq!(request.model, "gemini-1.5-flash");
        assert!(request.prompt.contains("device description"));

        runner
            .call_agent("risk_analyzer", &context(&[("content", "other")]))
            .await
            .unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn failed_calls_are_not_cached() {
        let provider = ScriptedProvider::new(ApiVendor::Gemini)
            .failing_once()
            .replying("ok");
        let mut runner = runner(provider.clone());
        let ctx = context(&[("content", "c")]);

        assert!(runner.call_agent("risk_analyzer", &ctx).await.is_err());
        assert_eq!(runner.cached_responses(), 0);
        assert_eq!(runner.call_agent("risk_analyzer", &ctx).await.unwrap(), "ok");
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn call_agent_unknown_agent_and_missing_variable() {
        let provider = ScriptedProvider::new(ApiVendor::Gemini).replying("x");
        let mut runner = runner(provider.clone());

        assert!(matches!(
            runner.call_agent("no_such_agent", &HashMap::new()).await,
            Err(RunnerError::UnknownAgent(id)) if id == "no_such_agent"
        ));
        match runner.call_agent("risk_analyzer", &HashMap::new()).await {
            Err(RunnerError::Template(e)) => assert!(e.to_string().contains("content")),
            other => panic!("expected template error, got {:?}", other),
        }
        assert_eq!(provider.calls(), 0);
    }
}
