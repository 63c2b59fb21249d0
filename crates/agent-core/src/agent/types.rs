use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::template::PromptTemplate;
use crate::vendor::ApiVendor;

/// One agent definition: a prompt template bound to a vendor and model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Stable key. Derived from the display name when the source omits it.
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(alias = "prompt_template")]
    pub prompt: String,
    #[serde(default = "default_vendor")]
    pub api: ApiVendor,
    /// `None` means "use the caller's default model for `api`".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Extra request parameters forwarded to the vendor (temperature, max_tokens, ...).
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Map::is_empty"
    )]
    pub parameters: Map<String, Value>,
}

fn default_vendor() -> ApiVendor {
    ApiVendor::Gemini
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AgentSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            prompt: prompt.into(),
            api: default_vendor(),
            model: None,
            parameters: Map::new(),
        }
    }

    pub fn with_api(mut self, api: ApiVendor) -> Self {
        self.api = api;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Merges call parameter overrides; a `null` value removes the key.
    pub fn merge_parameters<I>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (key, value) in overrides {
            if value.is_null() {
                self.parameters.remove(&key);
            } else {
                self.parameters.insert(key, value);
            }
        }
    }

    pub fn template(&self) -> PromptTemplate<'_> {
        PromptTemplate::new(&self.prompt)
    }

    /// The configured model, or `fallback` when none is set.
    pub fn model_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.model.as_deref() {
            Some(model) if !model.trim().is_empty() => model,
            _ => fallback,
        }
    }

    /// Switches vendor, keeping the model only if the new vendor offers it.
    pub fn switch_api(&mut self, api: ApiVendor) {
        self.api = api;
        let resolved = api.resolve_model(self.model.as_deref().unwrap_or_default());
        self.model = Some(resolved.to_string());
    }
}

/// Parses a `key=value` parameter override. The value is read as YAML, so
/// `0.2` is a number, `[END]` a list and an empty value is `null`.
pub fn parse_parameter(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing parameter name in '{}'", s));
    }

    let value = if raw.trim().is_empty() {
        Value::Null
    } else {
        serde_yaml::from_str(raw).map_err(|e| format!("invalid value for {}: {}", key, e))?
    };
    Ok((key.to_string(), value))
}

/// Derives an identifier such as `summary_agent` from a display name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}
