//! Sequential execution of a [`PipelineState`].

use agent_core::PipelineState;

use crate::error::{Result, RunnerError};
use crate::runner::AgentRunner;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    /// The step slot now holds the failure placeholder.
    Failed(String),
}

impl StepOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed)
    }
}

pub struct PipelineRunner<'a> {
    runner: &'a AgentRunner,
}

impl<'a> PipelineRunner<'a> {
    pub fn new(runner: &'a AgentRunner) -> Self {
        Self { runner }
    }

    /// Runs step `index` on its current input and stores the result. A
    /// failed call stores the failure placeholder and is not an error.
    pub async fn run_step(&self, state: &mut PipelineState, index: usize) -> Result<StepOutcome> {
        let len = state.len();
        let Some(step) = state.steps.get(index) else {
            return Err(RunnerError::StepOutOfRange { index, len });
        };

        let input = state.input_for(index).to_string();
        log::info!(
            "Step {}/{}: {} ({} chars of input)",
            index + 1,
            len,
            step.agent.name,
            input.len()
        );

        match self.runner.execute_agent(&step.agent, &input).await {
            Ok(output) => {
                state.set_output(index, output);
                Ok(StepOutcome::Completed)
            }
            Err(e) => {
                log::error!("Error executing agent {}: {}", step.agent.name, e);
                state.set_failed(index);
                Ok(StepOutcome::Failed(e.to_string()))
            }
        }
    }

    /// Runs every step in order; each one consumes its predecessor's output.
    pub async fn run_all(&self, state: &mut PipelineState) -> Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::with_capacity(state.len());
        for index in 0..state.len() {
            outcomes.push(self.run_step(state, index).await?);
        }
        Ok(outcomes)
    }
}
