use agent_core::{DocumentKey, TemplateError};
use agent_llm::LLMError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("Prompt error: {0}")]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Llm(#[from] LLMError),

    #[error("Agent '{0}' not found in configuration")]
    UnknownAgent(String),

    #[error("{0}")]
    MissingPrerequisite(String),

    #[error("{} has already been generated; reset or modify it instead", .0.title())]
    AlreadyGenerated(DocumentKey),

    #[error("Pipeline step {index} does not exist (pipeline has {len} steps)")]
    StepOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, RunnerError>;
