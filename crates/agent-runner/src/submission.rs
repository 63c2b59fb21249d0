//! The 510(k) document workflow: generate, modify, analyze.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use agent_core::{DocumentKey, SubmissionState};

use crate::error::{Result, RunnerError};
use crate::runner::AgentRunner;

/// Agent that rewrites a document according to free-text edits.
pub const DOCUMENT_MODIFIER: &str = "document_modifier";

/// Specialists run by the full analysis suite, in order.
pub const CORE_ANALYSIS_AGENTS: [&str; 10] = [
    "risk_analyzer",
    "predicate_analyzer",
    "clinical_reviewer",
    "biocompatibility_expert",
    "software_validator",
    "labeling_reviewer",
    "quality_assessor",
    "regulatory_strategist",
    "deficiency_analyzer",
    "summary_generator",
];

/// Outcome of an analysis run over several agents.
/// Groups of specialist agents offered for quick selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentCategory {
    CoreAnalysis,
    TechnicalValidation,
    ComplianceQuality,
    StrategicPlanning,
    AdvancedSpecialties,
}

impl AgentCategory {
    pub const ALL: [AgentCategory; 5] = [
        AgentCategory::CoreAnalysis,
        AgentCategory::TechnicalValidation,
        AgentCategory::ComplianceQuality,
        AgentCategory::StrategicPlanning,
        AgentCategory::AdvancedSpecialties,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::CoreAnalysis => "core",
            AgentCategory::TechnicalValidation => "technical",
            AgentCategory::ComplianceQuality => "compliance",
            AgentCategory::StrategicPlanning => "strategic",
            AgentCategory::AdvancedSpecialties => "advanced",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            AgentCategory::CoreAnalysis => "🔍 Core Analysis",
            AgentCategory::TechnicalValidation => "🔬 Technical Validation",
            AgentCategory::ComplianceQuality => "📋 Compliance & Quality",
            AgentCategory::StrategicPlanning => "📊 Strategic Planning",
            AgentCategory::AdvancedSpecialties => "🌍 Advanced Specialties",
        }
    }

    pub fn agents(&self) -> &'static [&'static str] {
        match self {
            AgentCategory::CoreAnalysis => &[
                "risk_analyzer",
                "predicate_analyzer",
                "clinical_reviewer",
                "regulatory_strategist",
                "deficiency_analyzer",
            ],
            AgentCategory::TechnicalValidation => &[
                "biocompatibility_expert",
                "software_validator",
                "sterilization_expert",
                "electromagnetic_specialist",
                "mechanical_tester",
                "electrical_safety",
            ],
            AgentCategory::ComplianceQuality => &[
                "labeling_reviewer",
                "quality_assessor",
                "cybersecurity_analyst",
                "usability_engineer",
                "data_integrity",
                "audit_preparer",
            ],
            AgentCategory::StrategicPlanning => &[
                "timeline_planner",
                "cost_estimator",
                "competitor_analyst",
                "post_market_planner",
                "change_controller",
                "advisory_panel_prep",
            ],
            AgentCategory::AdvancedSpecialties => &[
                "materials_scientist",
                "packaging_validator",
                "shelf_life_analyst",
                "comparison_specialist",
                "international_harmonizer",
                "innovation_assessor",
                "training_developer",
                "summary_generator",
            ],
        }
    }

    /// Category an agent id belongs to, if any.
    pub fn of(agent_id: &str) -> Option<AgentCategory> {
        Self::ALL
            .into_iter()
            .find(|category| category.agents().iter().any(|id| *id == agent_id))
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "core" | "core_analysis" => Ok(AgentCategory::CoreAnalysis),
            "technical" | "technical_validation" => Ok(AgentCategory::TechnicalValidation),
            "compliance" | "compliance_quality" => Ok(AgentCategory::ComplianceQuality),
            "strategic" | "strategic_planning" => Ok(AgentCategory::StrategicPlanning),
            "advanced" | "advanced_specialties" => Ok(AgentCategory::AdvancedSpecialties),
            other => Err(format!(
                "Unknown agent category: {}. Available categories: core, technical, compliance, strategic, advanced",
                other
            )),
        }
    }
}

/// Content an analysis run reads: a generated document or the guidance text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisSource {
    Document(DocumentKey),
    Guidance,
}

impl AnalysisSource {
    pub fn title(&self) -> &'static str {
        match self {
            AnalysisSource::Document(key) => key.title(),
            AnalysisSource::Guidance => "FDA Guidance Text",
        }
    }

    pub fn content<'a>(&self, state: &'a SubmissionState) -> &'a str {
        match self {
            AnalysisSource::Document(key) => state.document(*key),
            AnalysisSource::Guidance => &state.guidance_text,
        }
    }
}

impl Default for AnalysisSource {
    fn default() -> Self {
        AnalysisSource::Document(DocumentKey::MockReport)
    }
}

impl FromStr for AnalysisSource {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "guidance" | "guidance_text" | "fda_guidance" => Ok(AnalysisSource::Guidance),
            other => other.parse().map(AnalysisSource::Document).map_err(|_| {
                format!(
                    "Unknown analysis source: {}. Available sources: mock_report, guideline, review_report, guidance",
                    other
                )
            }),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AnalysisReport {
    pub completed: Vec<String>,
    pub failed: Vec<(String, String)>,
    /// Requested agents missing from the catalog.
    pub skipped: Vec<String>,
}

impl AnalysisReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

pub struct SubmissionWorkflow {
    runner: AgentRunner,
    state: SubmissionState,
}

impl SubmissionWorkflow {
    pub fn new(runner: AgentRunner, state: SubmissionState) -> Self {
        Self { runner, state }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SubmissionState {
        &mut self.state
    }

    pub fn runner(&self) -> &AgentRunner {
        &self.runner
    }

    pub fn into_state(self) -> SubmissionState {
        self.state
    }

    fn require_inputs(&self) -> Result<()> {
        if self.state.guidance_text.trim().is_empty() || self.state.topic.trim().is_empty() {
            return Err(RunnerError::MissingPrerequisite(
                "Please provide guidance text and topic first.".to_string(),
            ));
        }
        Ok(())
    }

    async fn generate_missing(&mut self, key: DocumentKey) -> Result<()> {
        let keys = key.context_keys();
        if let Some(missing) = keys
            .iter()
            .find(|k| self.state.value(k).unwrap_or_default().trim().is_empty())
        {
            return Err(RunnerError::MissingPrerequisite(format!(
                "{} requires {} to be provided first.",
                key.title(),
                missing.replace('_', " ")
            )));
        }

        let context = self.state.context_for(keys);
        let text = self.runner.call_agent(key.generator(), &context).await?;
        self.state.set_generated(key, text);
        log::info!("{} generated successfully", key.title());
        Ok(())
    }

    /// Generates `key` from its context. A document that already exists
    /// must be reset or modified instead. On failure the field stays empty.
    pub async fn generate(&mut self, key: DocumentKey) -> Result<&str> {
        if self.state.has_document(key) {
            return Err(RunnerError::AlreadyGenerated(key));
        }
        self.generate_missing(key).await?;
        Ok(self.state.document(key))
    }

    /// Rewrites `key` with the document modifier and clears its dependents.
    /// Returns the documents that were cleared.
    pub async fn modify(&mut self, key: DocumentKey, edits: &str) -> Result<Vec<DocumentKey>> {
        if edits.trim().is_empty() {
            return Err(RunnerError::MissingPrerequisite(
                "Please describe the changes you want to make.".to_string(),
            ));
        }
        if !self.state.has_document(key) {
            return Err(RunnerError::MissingPrerequisite(format!(
                "{} has not been generated yet.",
                key.title()
            )));
        }

        let context = HashMap::from([
            ("document".to_string(), self.state.document(key).to_string()),
            ("edits".to_string(), edits.to_string()),
        ]);
        let modified = self.runner.call_agent(DOCUMENT_MODIFIER, &context).await?;
        let cleared = self.state.apply_modification(key, modified);
        if !cleared.is_empty() {
            log::warn!(
                "Downstream documents cleared due to {} modification. Please regenerate them.",
                key
            );
        }
        Ok(cleared)
    }

    pub fn reset(&mut self, key: DocumentKey) {
        self.state.reset_document(key);
    }

    /// Generates every missing document in order. Existing documents are
    /// kept. Returns the keys generated by this call.
    pub async fn run_complete_workflow(&mut self) -> Result<Vec<DocumentKey>> {
        self.require_inputs()?;

        let mut generated = Vec::new();
        for (i, key) in DocumentKey::ALL.into_iter().enumerate() {
            if self.state.has_document(key) {
                log::debug!("{} already present, skipping", key.title());
                continue;
            }
            log::info!(
                "Generating {} ({}/{})",
                key.title(),
                i + 1,
                DocumentKey::ALL.len()
            );
            self.generate_missing(key).await?;
            generated.push(key);
        }
        Ok(generated)
    }

    /// Runs each agent on `content` and records successful results.
    /// Unknown agents are skipped and failures reported, neither stops
    /// the remaining agents.
    pub async fn run_agent_analysis<S: AsRef<str>>(
        &mut self,
        agents: &[S],
        content: &str,
    ) -> Result<AnalysisReport> {
        if content.trim().is_empty() {
            return Err(RunnerError::MissingPrerequisite(
                "No content available for analysis. Please generate it first.".to_string(),
            ));
        }

        let mut report = AnalysisReport::default();
        let total = agents.len();
        for (i, agent) in agents.iter().enumerate() {
            let agent = agent.as_ref();
            let Some(spec) = self.runner.catalog().resolve(agent).ok().cloned() else {
                log::warn!("Skipping unknown agent {}", agent);
                report.skipped.push(agent.to_string());
                continue;
            };

            log::info!("Running {}... ({}/{})", spec.name, i + 1, total);
            let context = HashMap::from([("content".to_string(), content.to_string())]);
            match self.runner.call_agent(&spec.id, &context).await {
                Ok(result) => {
                    self.state.record_agent_output(&spec.id, &spec.name, result);
                    report.completed.push(spec.id);
                }
                Err(e) => {
                    log::error!("{} failed: {}", spec.name, e);
                    report.failed.push((spec.id, e.to_string()));
                }
            }
        }

        log::info!(
            "Analysis complete: {} succeeded, {} failed, {} skipped",
            report.completed.len(),
            report.failed.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Runs `agents` over the content of `source`.
    pub async fn analyze_source<S: AsRef<str>>(
        &mut self,
        source: AnalysisSource,
        agents: &[S],
    ) -> Result<AnalysisReport> {
        let content = source.content(&self.state).to_string();
        if content.trim().is_empty() {
            return Err(RunnerError::MissingPrerequisite(format!(
                "No content available for {}. Please generate it first.",
                source.title()
            )));
        }
        self.run_agent_analysis(agents, &content).await
    }

    /// Runs the core specialists over the mock report.
    pub async fn run_full_analysis_suite(&mut self) -> Result<AnalysisReport> {
        if !self.state.has_document(DocumentKey::MockReport) {
            return Err(RunnerError::MissingPrerequisite(
                "Please generate a mock report first.".to_string(),
            ));
        }
        let content = self.state.mock_report.clone();
        self.run_agent_analysis(&CORE_ANALYSIS_AGENTS, &content).await
    }
}
