use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Subcommand;
use colored::Colorize;
use serde_json::Value;

use agent_core::{parse_parameter, AgentSpec, ApiVendor, PipelineState, PipelineStep};
use agent_runner::{PipelineRunner, StepOutcome};
use doc_prep::load_document;

use super::{heading, preview};
use crate::context::AppContext;
use crate::logging::Timer;

#[derive(Subcommand)]
pub enum PipelineCommand {
    /// Configure the steps and run all of them in order
    Run {
        /// Initial input file (TXT, PDF or DOCX); defaults to the stored input
        #[arg(long, short)]
        input: Option<PathBuf>,
        /// Agent for each step, in order (repeatable)
        #[arg(long = "agent", short = 'a')]
        agents: Vec<String>,
        /// Number of steps; new steps copy the last configured agent
        #[arg(long)]
        steps: Option<usize>,
        /// Vendor applied to every step
        #[arg(long)]
        api: Option<ApiVendor>,
        /// Model applied to every step
        #[arg(long)]
        model: Option<String>,
        /// Call parameter for every step, e.g. temperature=0.2 (repeatable)
        #[arg(long = "param", value_parser = parse_parameter)]
        params: Vec<(String, Value)>,
    },
    /// Run a single step (1-based) on its current input
    Step {
        index: usize,
        #[arg(long)]
        agent: Option<String>,
        #[arg(long)]
        api: Option<ApiVendor>,
        #[arg(long)]
        model: Option<String>,
        /// Call parameter for this step; an empty value removes it (repeatable)
        #[arg(long = "param", value_parser = parse_parameter)]
        params: Vec<(String, Value)>,
        /// Replacement prompt template for this step
        #[arg(long)]
        prompt: Option<String>,
    },
    /// Replace a step's output with edited text for the following step
    Edit {
        index: usize,
        #[arg(long, short)]
        file: PathBuf,
    },
    /// Show the configured steps and their outputs
    Show {
        /// Print outputs in full
        #[arg(long)]
        full: bool,
    },
}

fn apply_overrides(
    agent: &mut AgentSpec,
    api: Option<ApiVendor>,
    model: Option<&str>,
    params: &[(String, Value)],
) {
    if let Some(api) = api {
        agent.switch_api(api);
    }
    if let Some(model) = model {
        agent.model = Some(model.to_string());
    }
    agent.merge_parameters(params.iter().cloned());
}

fn step_index(index: usize, state: &PipelineState) -> anyhow::Result<usize> {
    if index == 0 || index > state.len() {
        bail!(
            "Step {} does not exist; the pipeline has {} steps",
            index,
            state.len()
        );
    }
    Ok(index - 1)
}

fn print_outcome(state: &PipelineState, index: usize, outcome: &StepOutcome) {
    let name = &state.steps[index].agent.name;
    match outcome {
        StepOutcome::Completed => println!(
            "{}",
            format!("✅ Step {} ({}) completed", index + 1, name).green()
        ),
        StepOutcome::Failed(reason) => println!(
            "{}",
            format!("❌ Step {} ({}) failed: {}", index + 1, name, reason).red()
        ),
    }
}

pub async fn run(ctx: &AppContext, command: PipelineCommand) -> anyhow::Result<()> {
    let mut snapshot = ctx.load_session()?;
    let mut state = snapshot.pipeline.take().unwrap_or_default();

    let result = execute(ctx, &mut state, command).await;
    snapshot.pipeline = Some(state);
    ctx.save_session(&mut snapshot)?;
    result
}

async fn execute(
    ctx: &AppContext,
    state: &mut PipelineState,
    command: PipelineCommand,
) -> anyhow::Result<()> {
    match command {
        PipelineCommand::Run {
            input,
            agents,
            steps,
            api,
            model,
            params,
        } => {
            if let Some(input) = input {
                state.initial_input = load_document(&input)?;
            }
            if state.initial_input.trim().is_empty() {
                bail!("No pipeline input. Use --input or `gasa pdf process --pipeline`.");
            }

            if !agents.is_empty() {
                state.steps = agents
                    .iter()
                    .map(|agent| {
                        ctx.catalog
                            .resolve(agent)
                            .map(|spec| PipelineStep::new(spec.clone()))
                            .with_context(|| format!("Unknown agent: {}", agent))
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
            }

            let template = match state.steps.last() {
                Some(step) => step.agent.clone(),
                None => ctx
                    .catalog
                    .iter()
                    .next()
                    .cloned()
                    .context("The agent catalog is empty")?,
            };
            let count = steps.unwrap_or_else(|| state.len().max(1));
            if count == 0 {
                bail!("The pipeline needs at least one step");
            }
            state.resize(count, &template);

            for step in &mut state.steps {
                apply_overrides(&mut step.agent, api, model.as_deref(), &params);
            }

            let _timer = Timer::new(format!("Pipeline run ({} steps)", state.len()));
            let runner = ctx.runner();
            let outcomes = PipelineRunner::new(&runner).run_all(state).await?;
            for (index, outcome) in outcomes.iter().enumerate() {
                print_outcome(state, index, outcome);
            }

            if let Some(output) = state.final_output() {
                heading("📝 Final output");
                println!("{}", output);
            }
            Ok(())
        }
        PipelineCommand::Step {
            index,
            agent,
            api,
            model,
            params,
            prompt,
        } => {
            let index = step_index(index, state)?;
            if let Some(agent) = agent {
                let spec = ctx
                    .catalog
                    .resolve(&agent)
                    .with_context(|| format!("Unknown agent: {}", agent))?;
                state.steps[index].select_agent(spec.clone());
            }
            let step = &mut state.steps[index];
            apply_overrides(&mut step.agent, api, model.as_deref(), &params);
            if let Some(prompt) = prompt {
                step.agent.prompt = prompt;
            }

            let runner = ctx.runner();
            let outcome = PipelineRunner::new(&runner).run_step(state, index).await?;
            print_outcome(state, index, &outcome);
            if let Some(output) = state.steps[index].output.as_deref() {
                println!("{}", output);
            }
            Ok(())
        }
        PipelineCommand::Edit { index, file } => {
            let index = step_index(index, state)?;
            let text = load_document(&file)?;
            if !state.edit_output(index, text) {
                bail!("Step {} has no output to edit yet", index + 1);
            }
            println!(
                "{}",
                format!("✅ Step {} output replaced; step {} will use it", index + 1, index + 2)
                    .green()
            );
            Ok(())
        }
        PipelineCommand::Show { full } => {
            heading(&format!("🔗 Pipeline ({} steps)", state.len()));
            println!(
                "{} {}",
                "input:".dimmed(),
                preview(&state.initial_input, 100)
            );
            for (index, step) in state.steps.iter().enumerate() {
                let model = step.agent.model_or(step.agent.api.default_model());
                println!(
                    "{} {} {}",
                    format!("Step {}:", index + 1).cyan().bold(),
                    step.agent.name,
                    format!("({} / {})", step.agent.api, model).dimmed()
                );
                match step.forwarded_output() {
                    Some(text) if step.failed() => println!("  {}", text.red()),
                    Some(text) if full => println!("{}", text),
                    Some(text) => println!("  {}", preview(text, 100)),
                    None => println!("  {}", "(not run)".dimmed()),
                }
                if step.edited_output.is_some() {
                    println!("  {}", "(edited)".yellow());
                }
            }
            Ok(())
        }
    }
}
