//! LLM vendors and the models offered for each of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Hosted LLM API an agent is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ApiVendor {
    #[serde(alias = "gemini")]
    Gemini,
    #[serde(alias = "openai")]
    OpenAI,
    #[serde(alias = "grok", alias = "xai")]
    Grok,
}

const GEMINI_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
];
const OPENAI_MODELS: &[&str] = &["gpt-5-nano", "gpt-4o-mini"];
const GROK_MODELS: &[&str] = &["grok-4-fast-reasoning", "grok-3-mini"];

impl ApiVendor {
    pub const ALL: [ApiVendor; 3] = [ApiVendor::Gemini, ApiVendor::OpenAI, ApiVendor::Grok];

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVendor::Gemini => "Gemini",
            ApiVendor::OpenAI => "OpenAI",
            ApiVendor::Grok => "Grok",
        }
    }

    /// Models selectable for this vendor. The first entry is the default.
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            ApiVendor::Gemini => GEMINI_MODELS,
            ApiVendor::OpenAI => OPENAI_MODELS,
            ApiVendor::Grok => GROK_MODELS,
        }
    }

    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }

    pub fn supports_model(&self, model: &str) -> bool {
        self.models().contains(&model)
    }

    /// Returns `model` when the vendor offers it, otherwise the vendor default.
    pub fn resolve_model<'a>(&self, model: &'a str) -> &'a str {
        if self.supports_model(model) {
            model
        } else {
            self.default_model()
        }
    }

    /// Environment variables holding the API key, in lookup order.
    pub fn env_keys(&self) -> &'static [&'static str] {
        match self {
            ApiVendor::Gemini => &["GEMINI_API_KEY", "GOOGLE_API_KEY"],
            ApiVendor::OpenAI => &["OPENAI_API_KEY"],
            ApiVendor::Grok => &["GROK_API_KEY", "XAI_API_KEY"],
        }
    }
}

impl fmt::Display for ApiVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiVendor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(ApiVendor::Gemini),
            "openai" => Ok(ApiVendor::OpenAI),
            "grok" | "xai" => Ok(ApiVendor::Grok),
            other => Err(format!(
                "Unknown API vendor: {}. Available vendors: Gemini, OpenAI, Grok",
                other
            )),
        }
    }
}
