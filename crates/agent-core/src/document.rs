//! Submission documents and their one-level dependency chain.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generated documents of a 510(k) submission, in generation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKey {
    MockReport,
    Guideline,
    ReviewReport,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 3] = [
        DocumentKey::MockReport,
        DocumentKey::Guideline,
        DocumentKey::ReviewReport,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKey::MockReport => "mock_report",
            DocumentKey::Guideline => "guideline",
            DocumentKey::ReviewReport => "review_report",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DocumentKey::MockReport => "Mock Report",
            DocumentKey::Guideline => "Review Guideline",
            DocumentKey::ReviewReport => "Mock Review Report",
        }
    }

    /// Agent that produces this document.
    pub fn generator(&self) -> &'static str {
        match self {
            DocumentKey::MockReport => "report_generator",
            DocumentKey::Guideline => "guideline_generator",
            DocumentKey::ReviewReport => "review_generator",
        }
    }

    /// State keys fed into the generator's prompt.
    pub fn context_keys(&self) -> &'static [&'static str] {
        match self {
            DocumentKey::MockReport => &["topic", "guidance_text"],
            DocumentKey::Guideline => &["mock_report", "guidance_text"],
            DocumentKey::ReviewReport => &["mock_report", "guideline"],
        }
    }

    /// Documents invalidated when this one is modified.
    pub fn dependents(&self) -> &'static [DocumentKey] {
        match self {
            DocumentKey::MockReport => &[DocumentKey::Guideline, DocumentKey::ReviewReport],
            DocumentKey::Guideline => &[DocumentKey::ReviewReport],
            DocumentKey::ReviewReport => &[],
        }
    }

    /// Placeholder hint shown when asking for modifications.
    pub fn modification_hint(&self) -> &'static str {
        match self {
            DocumentKey::MockReport => {
                "e.g., Add a section on biocompatibility testing, expand the device description"
            }
            DocumentKey::Guideline => {
                "e.g., Add checkpoints for software validation, emphasize cybersecurity"
            }
            DocumentKey::ReviewReport => {
                "e.g., Make the deficiency list more specific, add a summary table"
            }
        }
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "mock_report" | "report" => Ok(DocumentKey::MockReport),
            "guideline" | "review_guideline" => Ok(DocumentKey::Guideline),
            "review_report" | "review" | "mock_review" => Ok(DocumentKey::ReviewReport),
            other => Err(format!(
                "Unknown document: {}. Available documents: mock_report, guideline, review_report",
                other
            )),
        }
    }
}

/// Result of one specialist agent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentOutput {
    pub name: String,
    pub result: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-session state of the submission generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionState {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub guidance_text: String,
    #[serde(default)]
    pub mock_report: String,
    #[serde(default)]
    pub guideline: String,
    #[serde(default)]
    pub review_report: String,
    #[serde(default)]
    pub agent_outputs: BTreeMap<String, AgentOutput>,
}

/// Word count and completion status of one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStatus {
    pub key: DocumentKey,
    pub title: &'static str,
    pub words: usize,
    pub complete: bool,
}

impl SubmissionState {
    pub fn new(topic: impl Into<String>, guidance_text: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            guidance_text: guidance_text.into(),
            ..Default::default()
        }
    }

    pub fn document(&self, key: DocumentKey) -> &str {
        match key {
            DocumentKey::MockReport => &self.mock_report,
            DocumentKey::Guideline => &self.guideline,
            DocumentKey::ReviewReport => &self.review_report,
        }
    }

    fn document_mut(&mut self, key: DocumentKey) -> &mut String {
        match key {
            DocumentKey::MockReport => &mut self.mock_report,
            DocumentKey::Guideline => &mut self.guideline,
            DocumentKey::ReviewReport => &mut self.review_report,
        }
    }

    pub fn has_document(&self, key: DocumentKey) -> bool {
        !self.document(key).is_empty()
    }

    /// Reads any state key used in prompt contexts.
    pub fn value(&self, key: &str) -> Option<&str> {
        match key {
            "topic" => Some(&self.topic),
            "guidance_text" => Some(&self.guidance_text),
            "mock_report" => Some(&self.mock_report),
            "guideline" => Some(&self.guideline),
            "review_report" => Some(&self.review_report),
            _ => None,
        }
    }

    /// Builds a prompt context from state keys. Unknown keys are skipped so
    /// the template reports them as missing.
    pub fn context_for(&self, keys: &[&str]) -> HashMap<String, String> {
        keys.iter()
            .filter_map(|key| self.value(key).map(|v| (key.to_string(), v.to_string())))
            .collect()
    }

    /// Stores a freshly generated document. Dependents are left untouched.
    pub fn set_generated(&mut self, key: DocumentKey, text: impl Into<String>) {
        *self.document_mut(key) = text.into();
    }

    /// Replaces a document with a modified version and clears every non-empty
    /// dependent. Returns the cleared keys.
    pub fn apply_modification(&mut self, key: DocumentKey, text: impl Into<String>) -> Vec<DocumentKey> {
        *self.document_mut(key) = text.into();

        let mut cleared = Vec::new();
        for dependent in key.dependents() {
            let doc = self.document_mut(*dependent);
            if !doc.is_empty() {
                doc.clear();
                cleared.push(*dependent);
            }
        }
        cleared
    }

    pub fn reset_document(&mut self, key: DocumentKey) {
        self.document_mut(key).clear();
    }

    /// Clears inputs, documents and agent outputs.
    pub fn reset_workflow(&mut self) {
        *self = Self::default();
    }

    /// Percentage of workflow steps completed (guidance + three documents).
    pub fn progress(&self) -> u8 {
        let steps = [
            &self.guidance_text,
            &self.mock_report,
            &self.guideline,
            &self.review_report,
        ];
        let completed = steps.iter().filter(|step| !step.is_empty()).count();
        (completed * 100 / steps.len()) as u8
    }

    pub fn summary(&self) -> Vec<DocumentStatus> {
        DocumentKey::ALL
            .iter()
            .map(|key| {
                let text = self.document(*key);
                DocumentStatus {
                    key: *key,
                    title: key.title(),
                    words: text.split_whitespace().count(),
                    complete: !text.is_empty(),
                }
            })
            .collect()
    }

    pub fn record_agent_output(
        &mut self,
        agent_id: impl Into<String>,
        name: impl Into<String>,
        result: impl Into<String>,
    ) {
        self.agent_outputs.insert(
            agent_id.into(),
            AgentOutput {
                name: name.into(),
                result: result.into(),
                timestamp: Utc::now(),
            },
        );
    }

    pub fn remove_agent_output(&mut self, agent_id: &str) -> Option<AgentOutput> {
        self.agent_outputs.remove(agent_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_state() -> SubmissionState {
        let mut state = SubmissionState::new("Infusion pump", "FDA guidance");
        state.set_generated(DocumentKey::MockReport, "report");
        state.set_generated(DocumentKey::Guideline, "guideline");
        state.set_generated(DocumentKey::ReviewReport, "review");
        state
    }

    #[test]
    fn modifying_report_clears_both_dependents() {
        let mut state = full_state();
        let cleared = state.apply_modification(DocumentKey::MockReport, "report v2");

        assert_eq!(cleared, vec![DocumentKey::Guideline, DocumentKey::ReviewReport]);
        assert_eq!(state.mock_report, "report v2");
        assert!(state.guideline.is_empty());
        assert!(state.review_report.is_empty());
    }

    #[test]
    fn modifying_guideline_clears_only_review() {
        let mut state = full_state();
        let cleared = state.apply_modification(DocumentKey::Guideline, "guideline v2");

        assert_eq!(cleared, vec![DocumentKey::ReviewReport]);
        assert_eq!(state.mock_report, "report");
        assert_eq!(state.guideline, "guideline v2");
    }

    #[test]
    fn modifying_review_clears_nothing() {
        let mut state = full_state();
        assert!(state
            .apply_modification(DocumentKey::ReviewReport, "review v2")
            .is_empty());
        assert_eq!(state.guideline, "guideline");
    }

    #[test]
    fn empty_dependents_are_not_reported() {
        let mut state = SubmissionState::new("t", "g");
        state.set_generated(DocumentKey::MockReport, "report");
        assert!(state
            .apply_modification(DocumentKey::MockReport, "report v2")
            .is_empty());
    }

    #[test]
    fn generation_does_not_invalidate_dependents() {
        let mut state = full_state();
        state.set_generated(DocumentKey::MockReport, "regenerated");
        assert_eq!(state.guideline, "guideline");
    }

    #[test]
    fn context_for_uses_generator_keys() {
        let state = full_state();
        let context = state.context_for(DocumentKey::ReviewReport.context_keys());
        assert_eq!(context.len(), 2);
        assert_eq!(context["mock_report"], "report");
        assert_eq!(context["guideline"], "guideline");

        let context = state.context_for(&["topic", "unknown"]);
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn progress_counts_guidance_and_documents() {
        let mut state = SubmissionState::default();
        assert_eq!(state.progress(), 0);
        state.guidance_text = "g".into();
        assert_eq!(state.progress(), 25);
        state.set_generated(DocumentKey::MockReport, "r");
        assert_eq!(state.progress(), 50);
        assert_eq!(full_state().progress(), 100);
    }

    #[test]
    fn summary_reports_word_counts() {
        let mut state = SubmissionState::default();
        state.set_generated(DocumentKey::MockReport, "one two  three\nfour");
        let summary = state.summary();
        assert_eq!(summary[0].words, 4);
        assert!(summary[0].complete);
        assert_eq!(summary[1].words, 0);
        assert!(!summary[1].complete);
    }

    #[test]
    fn reset_workflow_clears_everything() {
        let mut state = full_state();
        state.record_agent_output("risk_analyzer", "Risk", "ok");
        state.reset_workflow();
        assert_eq!(state, SubmissionState::default());
    }

    #[test]
    fn agent_outputs_can_be_removed() {
        let mut state = SubmissionState::default();
        state.record_agent_output("risk_analyzer", "Risk", "low");
        assert_eq!(state.agent_outputs["risk_analyzer"].result, "low");
        assert!(state.remove_agent_output("risk_analyzer").is_some());
        assert!(state.remove_agent_output("risk_analyzer").is_none());
    }

    #[test]
    fn document_key_parsing() {
        assert_eq!("mock-report".parse::<DocumentKey>().unwrap(), DocumentKey::MockReport);
        assert_eq!("Guideline".parse::<DocumentKey>().unwrap(), DocumentKey::Guideline);
        assert_eq!("review".parse::<DocumentKey>().unwrap(), DocumentKey::ReviewReport);
        assert!("summary".parse::<DocumentKey>().is_err());
    }
}
