//! In-process provider double for orchestration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agent_core::ApiVendor;
use agent_llm::{CompletionRequest, LLMError, LLMProvider};
use async_trait::async_trait;

type Responder = Box<dyn Fn(&CompletionRequest) -> Result<String, String> + Send + Sync>;

pub struct ScriptedProvider {
    vendor: ApiVendor,
    respond: Responder,
    failures_left: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedProvider {
    pub fn new(vendor: ApiVendor) -> Self {
        Self {
            vendor,
            respond: Box::new(|_| Ok(String::new())),
            failures_left: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// The next call fails before any scripted reply.
    pub fn failing_once(self) -> Self {
        self.failures_left.fetch_add(1, Ordering::SeqCst);
        self
    }

    pub fn replying(self, text: &str) -> Arc<Self> {
        let text = text.to_string();
        self.responding_with(move |_| Ok(text.clone()))
    }

    pub fn responding_with<F>(mut self, respond: F) -> Arc<Self>
    where
        F: Fn(&CompletionRequest) -> Result<String, String> + Send + Sync + 'static,
    {
        self.respond = Box::new(respond);
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt.clone())
            .collect()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    fn vendor(&self) -> ApiVendor {
        self.vendor
    }

    async fn complete(&self, request: &CompletionRequest) -> agent_llm::Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        let should_fail = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(LLMError::Api("HTTP 503: scripted failure".to_string()));
        }
        (self.respond)(request).map_err(LLMError::Api)
    }
}

pub fn context(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
