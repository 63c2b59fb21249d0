//! State of the sequential multi-agent pipeline.

use serde::{Deserialize, Serialize};

use crate::agent::AgentSpec;

/// Stored in a step slot when its agent call failed.
pub const FAILURE_PLACEHOLDER: &str = "Execution failed.";

/// Separator placed between processed documents in the initial input.
pub const INPUT_SEPARATOR: &str = "\n\n---\n\n";

/// Joins processed documents into the first step's input.
pub fn join_inputs<I, S>(texts: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts
        .into_iter()
        .map(|text| text.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(INPUT_SEPARATOR)
}

/// One pipeline step: an editable copy of an agent plus its result slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineStep {
    pub agent: AgentSpec,
    #[serde(default)]
    pub output: Option<String>,
    /// Edited version of `output` handed to the next step.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edited_output: Option<String>,
}

impl PipelineStep {
    pub fn new(agent: AgentSpec) -> Self {
        Self {
            agent,
            output: None,
            edited_output: None,
        }
    }

    pub fn has_output(&self) -> bool {
        self.output.as_deref().is_some_and(|text| !text.is_empty())
    }

    pub fn failed(&self) -> bool {
        self.output.as_deref() == Some(FAILURE_PLACEHOLDER)
    }

    /// The text handed downstream: the edit when present, otherwise the output.
    pub fn forwarded_output(&self) -> Option<&str> {
        if !self.has_output() {
            return None;
        }
        self.edited_output.as_deref().or(self.output.as_deref())
    }

    /// Swaps in a different agent, discarding the previous result.
    pub fn select_agent(&mut self, agent: AgentSpec) {
        if self.agent.id != agent.id {
            self.output = None;
            self.edited_output = None;
        }
        self.agent = agent;
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineState {
    #[serde(default)]
    pub initial_input: String,
    #[serde(default)]
    pub steps: Vec<PipelineStep>,
}

impl PipelineState {
    pub fn new(initial_input: impl Into<String>, agents: Vec<AgentSpec>) -> Self {
        Self {
            initial_input: initial_input.into(),
            steps: agents.into_iter().map(PipelineStep::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Changes the number of steps. Any change in count clears every result;
    /// new steps copy `template`.
    pub fn resize(&mut self, count: usize, template: &AgentSpec) {
        if count == self.steps.len() {
            return;
        }
        self.steps.truncate(count);
        for step in &mut self.steps {
            step.output = None;
            step.edited_output = None;
        }
        while self.steps.len() < count {
            self.steps.push(PipelineStep::new(template.clone()));
        }
    }

    /// Input of step `index`: the initial input for the first step, the
    /// forwarded output of the previous step when it has one, and otherwise
    /// whatever the previous step itself consumed.
    pub fn input_for(&self, index: usize) -> &str {
        let mut input = self.initial_input.as_str();
        for previous in self.steps.iter().take(index) {
            if let Some(forwarded) = previous.forwarded_output() {
                input = forwarded;
            }
        }
        input
    }

    pub fn set_output(&mut self, index: usize, output: impl Into<String>) {
        if let Some(step) = self.steps.get_mut(index) {
            step.output = Some(output.into());
            step.edited_output = None;
        }
    }

    pub fn set_failed(&mut self, index: usize) {
        self.set_output(index, FAILURE_PLACEHOLDER);
    }

    /// Records an edit of step `index`'s output for use by the next step.
    pub fn edit_output(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.steps.get_mut(index) {
            Some(step) if step.has_output() => {
                step.edited_output = Some(text.into());
                true
            }
            _ => false,
        }
    }

    /// Output of the last step that produced one.
    pub fn final_output(&self) -> Option<&str> {
        self.steps.iter().rev().find_map(|step| step.forwarded_output())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str) -> AgentSpec {
        AgentSpec::new(id, id, "{input_text}")
    }

    fn state(n: usize) -> PipelineState {
        PipelineState::new("initial", (0..n).map(|i| agent(&format!("a{i}"))).collect())
    }

    #[test]
    fn join_inputs_uses_separator() {
        assert_eq!(join_inputs(["a", "b"]), "a\n\n---\n\nb");
        assert_eq!(join_inputs(Vec::<String>::new()), "");
    }

    #[test]
    fn first_step_reads_initial_input() {
        let state = state(3);
        assert_eq!(state.input_for(0), "initial");
        assert_eq!(state.input_for(2), "initial");
    }

    #[test]
    fn later_steps_read_previous_output_or_edit() {
        let mut state = state(3);
        state.set_output(0, "out0");
        assert_eq!(state.input_for(1), "out0");

        assert!(state.edit_output(0, "edited0"));
        assert_eq!(state.input_for(1), "edited0");
        assert_eq!(state.input_for(2), "edited0");

        state.set_output(1, "out1");
        assert_eq!(state.input_for(2), "out1");
        assert_eq!(state.final_output(), Some("out1"));
    }

    #[test]
    fn failed_step_output_is_forwarded() {
        let mut state = state(2);
        state.set_failed(0);
        assert!(state.steps[0].failed());
        assert_eq!(state.input_for(1), FAILURE_PLACEHOLDER);
    }

    #[test]
    fn empty_output_is_skipped() {
        let mut state = state(3);
        state.set_output(0, "out0");
        state.set_output(1, "");
        assert_eq!(state.input_for(2), "out0");
    }

    #[test]
    fn edit_requires_an_output() {
        let mut state = state(2);
        assert!(!state.edit_output(0, "x"));
        assert!(!state.edit_output(5, "x"));
    }

    #[test]
    fn resize_clears_all_results() {
        let mut state = state(2);
        state.set_output(0, "out0");
        state.resize(3, &agent("t"));
        assert_eq!(state.len(), 3);
        assert!(state.steps.iter().all(|step| step.output.is_none()));
        assert_eq!(state.steps[2].agent.id, "t");

        state.set_output(0, "again");
        state.resize(3, &agent("t"));
        assert_eq!(state.steps[0].output.as_deref(), Some("again"));

        state.resize(1, &agent("t"));
        assert_eq!(state.len(), 1);
        assert!(state.steps[0].output.is_none());
    }

    #[test]
    fn selecting_another_agent_discards_result() {
        let mut state = state(1);
        state.set_output(0, "out");
        state.steps[0].select_agent(agent("a0"));
        assert!(state.steps[0].has_output());
        state.steps[0].select_agent(agent("other"));
        assert!(!state.steps[0].has_output());
    }
}
