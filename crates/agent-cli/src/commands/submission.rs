use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Local;
use clap::Subcommand;
use colored::Colorize;

use agent_core::export::{export_document, export_package};
use agent_core::{DocumentKey, SubmissionState};
use agent_runner::{
    AgentCategory, AnalysisReport, AnalysisSource, SubmissionWorkflow, CORE_ANALYSIS_AGENTS,
};
use doc_prep::load_document;

use super::{heading, preview};
use crate::context::AppContext;
use crate::logging::Timer;

#[derive(Subcommand)]
pub enum SubmissionCommand {
    /// Start a submission from a device topic and FDA guidance file
    Init {
        #[arg(long, short)]
        topic: String,
        /// Guidance document (TXT, PDF or DOCX)
        #[arg(long, short)]
        guidance: PathBuf,
    },
    /// Generate one document from its prerequisites
    Generate {
        /// mock_report, guideline or review_report
        document: DocumentKey,
    },
    /// Rewrite a document with requested changes; dependents are cleared
    Modify {
        document: DocumentKey,
        #[arg(long, short)]
        edits: String,
    },
    /// Clear one document, or the whole workflow with --all
    Reset {
        #[arg(required_unless_present = "all")]
        document: Option<DocumentKey>,
        #[arg(long, conflicts_with = "document")]
        all: bool,
    },
    /// Generate every missing document in order
    Workflow,
    /// Run specialist agents over a document or the guidance text
    Analyze {
        /// Agent ids or names (repeatable)
        #[arg(long = "agent", short = 'a', required_unless_present = "categories")]
        agents: Vec<String>,
        /// Every agent of a category: core, technical, compliance, strategic, advanced (repeatable)
        #[arg(long = "category", short = 'c')]
        categories: Vec<AgentCategory>,
        /// mock_report, guideline, review_report or guidance
        #[arg(long, default_value = "mock_report", conflicts_with = "file")]
        source: AnalysisSource,
        /// Analyze a file instead of a stored document
        #[arg(long, short)]
        file: Option<PathBuf>,
    },
    /// Run the ten core specialists over the mock report
    Suite,
    /// Show progress, document sizes and analysis results
    Status,
    /// Print a document
    Show { document: DocumentKey },
    /// Export documents as text files or one markdown package
    Export {
        /// Only this document
        #[arg(long)]
        document: Option<DocumentKey>,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// Write a single markdown package with documents and analysis results
        #[arg(long, conflicts_with = "document")]
        package: bool,
    },
}

pub async fn run(ctx: &AppContext, command: SubmissionCommand) -> anyhow::Result<()> {
    let mut snapshot = ctx.load_session()?;

    match command {
        SubmissionCommand::Status => {
            print_status(&snapshot.submission, &snapshot.timestamp);
            return Ok(());
        }
        SubmissionCommand::Show { document } => {
            let text = snapshot.submission.document(document);
            if text.is_empty() {
                bail!("{} has not been generated yet.", document.title());
            }
            heading(&format!("📄 {}", document.title()));
            println!("{}", text);
            return Ok(());
        }
        SubmissionCommand::Export {
            document,
            dir,
            package,
        } => return export(&snapshot.submission, document, &dir, package),
        SubmissionCommand::Init { topic, guidance } => {
            let text = load_document(&guidance)?;
            if topic.trim().is_empty() || text.trim().is_empty() {
                bail!("Please provide guidance text and topic first.");
            }
            snapshot.submission = SubmissionState::new(topic, text);
            ctx.save_session(&mut snapshot)?;
            println!(
                "{}",
                format!(
                    "✅ Submission started for {} ({} words of guidance)",
                    snapshot.submission.topic,
                    snapshot.submission.guidance_text.split_whitespace().count()
                )
                .green()
            );
            return Ok(());
        }
        _ => {}
    }

    let state = std::mem::take(&mut snapshot.submission);
    let mut workflow = SubmissionWorkflow::new(ctx.runner(), state);
    let result = execute(&mut workflow, command).await;
    snapshot.submission = workflow.into_state();
    ctx.save_session(&mut snapshot)?;
    result
}

async fn execute(
    workflow: &mut SubmissionWorkflow,
    command: SubmissionCommand,
) -> anyhow::Result<()> {
    match command {
        SubmissionCommand::Generate { document } => {
            let text = workflow.generate(document).await?;
            heading(&format!("📄 {}", document.title()));
            println!("{}", text);
            println!(
                "{}",
                format!("✅ {} generated successfully!", document.title()).green()
            );
        }
        SubmissionCommand::Modify { document, edits } => {
            let cleared = workflow.modify(document, &edits).await?;
            println!(
                "{}",
                format!("✅ {} updated successfully!", document.title()).green()
            );
            if !cleared.is_empty() {
                let titles: Vec<&str> = cleared.iter().map(|key| key.title()).collect();
                println!(
                    "{}",
                    format!(
                        "⚠️ Downstream documents cleared due to {} modification: {}. Please regenerate them.",
                        document.title(),
                        titles.join(", ")
                    )
                    .yellow()
                );
            }
        }
        SubmissionCommand::Reset { document, all } => {
            if all {
                workflow.state_mut().reset_workflow();
                println!("{}", "✅ Workflow reset".green());
            } else if let Some(document) = document {
                workflow.reset(document);
                println!("{}", format!("✅ {} cleared", document.title()).green());
            }
        }
        SubmissionCommand::Workflow => {
            let _timer = Timer::new("Complete workflow");
            let generated = workflow.run_complete_workflow().await?;
            if generated.is_empty() {
                println!("{}", "All documents are already generated.".dimmed());
            }
            for key in generated {
                println!("{}", format!("✅ {} generated", key.title()).green());
            }
            println!(
                "{}",
                "🎉 Complete workflow finished! All documents generated.".green()
            );
        }
        SubmissionCommand::Analyze {
            agents,
            categories,
            source,
            file,
        } => {
            let selected = select_agents(&categories, &agents);
            let report = match file {
                Some(file) => {
                    let content = load_document(&file)?;
                    workflow.run_agent_analysis(selected.as_slice(), &content).await
                }
                None => {
                    println!(
                        "{}",
                        format!("🔬 Analyzing {} with {} agents", source.title(), selected.len())
                            .cyan()
                    );
                    workflow.analyze_source(source, selected.as_slice()).await
                }
            }
            .context("Analysis could not start")?;
            print_report(workflow.state(), &report);
        }
        SubmissionCommand::Suite => {
            println!(
                "{}",
                format!("🚀 Running {} core analysis agents...", CORE_ANALYSIS_AGENTS.len()).cyan()
            );
            let _timer = Timer::new("Full analysis suite");
            let report = workflow.run_full_analysis_suite().await?;
            print_report(workflow.state(), &report);
        }
        SubmissionCommand::Init { .. }
        | SubmissionCommand::Status
        | SubmissionCommand::Show { .. }
        | SubmissionCommand::Export { .. } => {}
    }
    Ok(())
}

/// Category agents first, then explicit ones, without duplicates.
pub(crate) fn select_agents(categories: &[AgentCategory], agents: &[String]) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    let category_agents = categories
        .iter()
        .flat_map(|category| category.agents().iter().map(|id| id.to_string()));
    for agent in category_agents.chain(agents.iter().cloned()) {
        if !selected.contains(&agent) {
            selected.push(agent);
        }
    }
    selected
}

fn print_report(state: &SubmissionState, report: &AnalysisReport) {
    for id in &report.completed {
        if let Some(output) = state.agent_outputs.get(id) {
            heading(&format!("🔬 {}", output.name));
            println!("{}", output.result);
        }
    }
    for (id, reason) in &report.failed {
        println!("{}", format!("❌ {} failed: {}", id, reason).red());
    }
    for id in &report.skipped {
        println!("{}", format!("⚠️ Unknown agent skipped: {}", id).yellow());
    }
    println!(
        "{}",
        format!(
            "✅ Analysis finished: {} completed, {} failed, {} skipped",
            report.completed.len(),
            report.failed.len(),
            report.skipped.len()
        )
        .green()
    );
}

fn print_status(state: &SubmissionState, saved_at: &str) {
    heading("📊 Submission status");
    if state.topic.is_empty() {
        println!("{}", "No submission started. Run `gasa submission init`.".dimmed());
    } else {
        println!("{} {}", "topic:".dimmed(), state.topic);
    }
    println!(
        "{} {} words",
        "guidance:".dimmed(),
        state.guidance_text.split_whitespace().count()
    );
    println!("{} {}%", "progress:".dimmed(), state.progress());
    if !saved_at.is_empty() {
        println!("{} {}", "saved:".dimmed(), saved_at);
    }

    println!();
    for status in state.summary() {
        let mark = if status.complete { "✅" } else { "⬜" };
        println!("{} {:<20} {:>6} words", mark, status.title, status.words);
    }

    if !state.agent_outputs.is_empty() {
        println!();
        println!("{}", "Analysis results:".cyan());
        for (id, output) in &state.agent_outputs {
            println!(
                "  {:<26} {} {}",
                id,
                output.timestamp.format("%Y-%m-%d %H:%M"),
                preview(&output.result, 60).dimmed()
            );
        }
    }
}

fn export(
    state: &SubmissionState,
    document: Option<DocumentKey>,
    dir: &Path,
    package: bool,
) -> anyhow::Result<()> {
    let now = Local::now();
    if package {
        let path = export_package(dir, state, now)
            .with_context(|| format!("Failed to export into {}", dir.display()))?;
        println!("{}", format!("✅ Package written to {}", path.display()).green());
        return Ok(());
    }

    let keys: Vec<DocumentKey> = match document {
        Some(key) => vec![key],
        None => DocumentKey::ALL.to_vec(),
    };
    let mut exported = 0;
    for key in keys {
        let text = state.document(key);
        if text.is_empty() {
            if document.is_some() {
                bail!("{} has not been generated yet.", key.title());
            }
            continue;
        }
        let path = export_document(dir, key.title(), text, now)
            .with_context(|| format!("Failed to export {}", key.title()))?;
        println!("{}", format!("✅ {} → {}", key.title(), path.display()).green());
        exported += 1;
    }
    if exported == 0 {
        bail!("No documents to export. Generate them first.");
    }
    Ok(())
}
