pub mod error;
pub mod pipeline;
pub mod runner;
pub mod submission;

#[cfg(test)]
mod test_support;

pub use error::{Result, RunnerError};
pub use pipeline::{PipelineRunner, StepOutcome};
pub use runner::AgentRunner;
pub use submission::{
    AgentCategory, AnalysisReport, AnalysisSource, SubmissionWorkflow, CORE_ANALYSIS_AGENTS,
    DOCUMENT_MODIFIER,
};
