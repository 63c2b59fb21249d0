//! Agent catalog loading.
//!
//! Two file shapes are accepted:
//!
//! ```yaml
//! agents:
//!   - name: Summarizer
//!     prompt: "Summarize: {input_text}"
//!     api: OpenAI
//!     model: gpt-4o-mini
//!     parameters: { temperature: 0.2 }
//! ```
//!
//! and a mapping keyed by agent id:
//!
//! ```yaml
//! risk_analyzer:
//!   name: Risk Assessment Specialist
//!   prompt_template: "Analyze {content}"
//! ```

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use super::builtin::builtin_agents;
use super::error::{CatalogError, CatalogResult};
use super::types::{slugify, AgentSpec};

/// Ordered, read-only set of agent definitions.
#[derive(Debug, Clone)]
pub struct AgentCatalog {
    agents: Vec<AgentSpec>,
}

impl AgentCatalog {
    pub fn new(agents: Vec<AgentSpec>) -> CatalogResult<Self> {
        if agents.is_empty() {
            return Err(CatalogError::Empty);
        }
        let catalog = Self { agents };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The built-in 510(k) review agents.
    pub fn builtin() -> Self {
        Self {
            agents: builtin_agents(),
        }
    }

    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let value: Value = serde_yaml::from_str(content)?;
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Err(CatalogError::Empty),
            _ => {
                return Err(CatalogError::Invalid {
                    agent: "<root>".to_string(),
                    reason: "expected a mapping at the top level".to_string(),
                })
            }
        };

        let agents = match mapping.get(&yaml_key("agents")) {
            Some(Value::Sequence(entries)) => parse_list(entries)?,
            Some(Value::Null) => return Err(CatalogError::Empty),
            _ => parse_map(&mapping)?,
        };

        Self::new(agents)
    }

    pub fn load_from_file(path: &Path) -> CatalogResult<Self> {
        if !path.is_file() {
            return Err(CatalogError::FileNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&content)?;
        log::info!(
            "Loaded {} agents from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Loads `path` when given and valid, otherwise the built-in table.
    pub fn load_or_builtin(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::debug!("No agent file configured, using built-in agents");
            return Self::builtin();
        };

        match Self::load_from_file(path) {
            Ok(catalog) => catalog,
            Err(CatalogError::FileNotFound(_)) => {
                log::debug!(
                    "Agent file {} not found, using built-in agents",
                    path.display()
                );
                Self::builtin()
            }
            Err(e) => {
                log::warn!("Using built-in agents: {}", e);
                Self::builtin()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentSpec> {
        self.agents.iter()
    }

    pub fn get(&self, id: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|agent| agent.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&AgentSpec> {
        self.agents.iter().find(|agent| agent.name == name)
    }

    /// Looks up by id, then by exact display name, then by case-insensitive name.
    pub fn resolve(&self, key: &str) -> CatalogResult<&AgentSpec> {
        self.get(key)
            .or_else(|| self.find_by_name(key))
            .or_else(|| {
                self.agents
                    .iter()
                    .find(|agent| agent.name.eq_ignore_ascii_case(key.trim()))
            })
            .ok_or_else(|| CatalogError::NotFound(key.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|agent| agent.name.as_str()).collect()
    }

    fn validate(&self) -> CatalogResult<()> {
        let mut seen = std::collections::HashSet::new();
        for agent in &self.agents {
            if agent.name.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    agent: agent.id.clone(),
                    reason: "name is empty".to_string(),
                });
            }
            if agent.prompt.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    agent: agent.name.clone(),
                    reason: "prompt is empty".to_string(),
                });
            }
            if let Err(e) = agent.template().placeholders() {
                return Err(CatalogError::Invalid {
                    agent: agent.name.clone(),
                    reason: e.to_string(),
                });
            }
            if !seen.insert(agent.id.as_str()) {
                return Err(CatalogError::DuplicateId(agent.id.clone()));
            }
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AgentCatalog {
    type Item = &'a AgentSpec;
    type IntoIter = std::slice::Iter<'a, AgentSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

fn parse_list(entries: &[Value]) -> CatalogResult<Vec<AgentSpec>> {
    let mut agents = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let mut agent: AgentSpec = serde_yaml::from_value(entry.clone())?;
        if agent.id.trim().is_empty() {
            agent.id = derive_id(&agent.name, index);
        }
        agents.push(agent);
    }
    Ok(agents)
}

fn parse_map(mapping: &Mapping) -> CatalogResult<Vec<AgentSpec>> {
    let mut agents = Vec::with_capacity(mapping.len());
    for (key, entry) in mapping {
        let id = key.as_str().ok_or_else(|| CatalogError::Invalid {
            agent: format!("{:?}", key),
            reason: "agent keys must be strings".to_string(),
        })?;
        let mut agent: AgentSpec = serde_yaml::from_value(entry.clone())?;
        agent.id = id.to_string();
        agents.push(agent);
    }
    Ok(agents)
}

fn derive_id(name: &str, index: usize) -> String {
    let slug = slugify(name);
    if slug.is_empty() {
        format!("agent_{}", index + 1)
    } else {
        slug
    }
}

fn yaml_key(value: &str) -> Value {
    Value::String(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vendor::ApiVendor;
    use std::io::Write;

    const LIST_YAML: &str = r#"
agents:
  - name: Summarizer
    prompt: "Summarize the following text:\n{input_text}"
    api: OpenAI
    model: gpt-4o-mini
    parameters:
      temperature: 0.2
      max_tokens: 512
  - name: Keyword Extractor
    prompt: "List keywords in: {input_text}"
    api: Gemini
    model: gemini-2.5-flash
"#;

    const MAP_YAML: &str = r#"
report_generator:
  name: Report Generator
  prompt_template: "Report on {topic}: {guidance_text}"
risk_analyzer:
  name: Risk Analyzer
  prompt_template: "Risks in {content}"
  api: Grok
"#;

    #[test]
    fn builtin_catalog_has_core_and_specialist_agents() {
        let catalog = AgentCatalog::builtin();
        assert_eq!(catalog.len(), 35);
        for id in [
            "report_generator",
            "guideline_generator",
            "review_generator",
            "document_modifier",
            "summary_generator",
        ] {
            assert!(catalog.get(id).is_some(), "missing {id}");
        }
        assert!(catalog.validate().is_ok());
    }

    #[test]
    fn parses_list_form_in_order() {
        let catalog = AgentCatalog::from_yaml_str(LIST_YAML).unwrap();
        assert_eq!(catalog.names(), vec!["Summarizer", "Keyword Extractor"]);

        let summarizer = catalog.get("summarizer").unwrap();
        assert_eq!(summarizer.api, ApiVendor::OpenAI);
        assert_eq!(summarizer.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(summarizer.parameters["max_tokens"], serde_json::json!(512));
        assert_eq!(catalog.get("keyword_extractor").unwrap().api, ApiVendor::Gemini);
    }

    #[test]
    fn parses_map_form_with_keys_as_ids() {
        let catalog = AgentCatalog::from_yaml_str(MAP_YAML).unwrap();
        let ids: Vec<&str> = catalog.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["report_generator", "risk_analyzer"]);
        assert_eq!(catalog.get("risk_analyzer").unwrap().api, ApiVendor::Grok);
        assert_eq!(
            catalog.get("report_generator").unwrap().prompt,
            "Report on {topic}: {guidance_text}"
        );
    }

    #[test]
    fn empty_agent_list_is_rejected() {
        assert!(matches!(
            AgentCatalog::from_yaml_str("agents: []"),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(
            AgentCatalog::from_yaml_str("agents:"),
            Err(CatalogError::Empty)
        ));
        assert!(matches!(AgentCatalog::from_yaml_str(""), Err(CatalogError::Empty)));
    }

    #[test]
    fn malformed_prompt_is_rejected() {
        let yaml = "agents:\n  - name: Bad\n    prompt: \"broken {input_text\"\n";
        let err = AgentCatalog::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let yaml = "agents:\n  - name: A\n    prompt: p\n  - name: a\n    prompt: q\n";
        assert!(matches!(
            AgentCatalog::from_yaml_str(yaml),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));
    }

    #[test]
    fn resolve_accepts_id_or_name() {
        let catalog = AgentCatalog::from_yaml_str(LIST_YAML).unwrap();
        assert_eq!(catalog.resolve("summarizer").unwrap().name, "Summarizer");
        assert_eq!(catalog.resolve("Keyword Extractor").unwrap().id, "keyword_extractor");
        assert_eq!(catalog.resolve("keyword extractor").unwrap().id, "keyword_extractor");
        assert!(matches!(
            catalog.resolve("translator"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn load_from_file_and_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agents.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(LIST_YAML.as_bytes()).unwrap();

        let catalog = AgentCatalog::load_or_builtin(Some(&path));
        assert_eq!(catalog.len(), 2);

        let missing = dir.path().join("missing.yaml");
        assert!(matches!(
            AgentCatalog::load_from_file(&missing),
            Err(CatalogError::FileNotFound(_))
        ));
        assert_eq!(AgentCatalog::load_or_builtin(Some(&missing)).len(), 35);

        let broken = dir.path().join("broken.yaml");
        std::fs::write(&broken, "agents: [unterminated").unwrap();
        assert_eq!(AgentCatalog::load_or_builtin(Some(&broken)).len(), 35);
        assert_eq!(AgentCatalog::load_or_builtin(None).len(), 35);
    }
}
