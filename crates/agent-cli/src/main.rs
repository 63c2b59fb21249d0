mod commands;
mod context;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use agent_core::ApiVendor;
use commands::agents::AgentsCommand;
use commands::documents::{LoadTarget, PdfCommand};
use commands::pipeline::PipelineCommand;
use commands::submission::SubmissionCommand;
use context::AppContext;

#[derive(Parser)]
#[command(name = "gasa")]
#[command(about = "FDA 510(k) document generator and multi-agent document pipeline")]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true, env = "GASA_CONFIG")]
    config: Option<PathBuf>,

    /// Agent definitions (YAML); defaults to ./agents.yaml, then the built-in agents
    #[arg(long, global = true)]
    agents: Option<PathBuf>,

    /// Session snapshot file
    #[arg(long, global = true, env = "GASA_SESSION")]
    session: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the agent catalog
    #[command(subcommand)]
    Agents(AgentsCommand),
    /// List the models offered for each vendor
    Models {
        /// Only this vendor (gemini, openai, grok)
        vendor: Option<ApiVendor>,
    },
    /// Page counts, trimming and text extraction for PDFs
    #[command(subcommand)]
    Pdf(PdfCommand),
    /// Load a TXT, PDF or DOCX file
    Load {
        file: PathBuf,
        /// Store the text in the session instead of printing it
        #[arg(long = "as", value_enum)]
        target: Option<LoadTarget>,
    },
    /// Sequential multi-agent pipeline
    #[command(subcommand)]
    Pipeline(PipelineCommand),
    /// 510(k) submission documents and analysis
    #[command(subcommand)]
    Submission(SubmissionCommand),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::load(
        cli.config.as_deref(),
        cli.agents.as_deref(),
        cli.session.as_deref(),
    )?;

    match cli.command {
        Commands::Agents(command) => commands::agents::run(&ctx, command),
        Commands::Models { vendor } => commands::agents::list_models(&ctx, vendor),
        Commands::Pdf(command) => commands::documents::run_pdf(&ctx, command),
        Commands::Load { file, target } => commands::documents::load(&ctx, &file, target),
        Commands::Pipeline(command) => commands::pipeline::run(&ctx, command).await,
        Commands::Submission(command) => commands::submission::run(&ctx, command).await,
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("{}", format!("⚠️ Ignoring .env: {}", e).yellow());
        }
    }

    let cli = Cli::parse();
    logging::init_logging(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("❌ Error: {:#}", e).red());
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use agent_runner::{AgentCategory, AnalysisSource};
    use commands::submission::SubmissionCommand;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_pipeline_run_with_repeated_agents() {
        let cli = Cli::try_parse_from([
            "gasa", "pipeline", "run", "-a", "summary_generator", "-a", "risk_analyzer", "--api",
            "openai",
        ])
        .unwrap();
        match cli.command {
            Commands::Pipeline(PipelineCommand::Run { agents, api, .. }) => {
                assert_eq!(agents, vec!["summary_generator", "risk_analyzer"]);
                assert_eq!(api, Some(ApiVendor::OpenAI));
            }
            _ => panic!("expected pipeline run"),
        }
    }

    #[test]
    fn parses_repeated_call_parameters() {
        let cli = Cli::try_parse_from([
            "gasa", "pipeline", "step", "2", "--param", "temperature=0.2", "--param",
            "stop=[END]",
        ])
        .unwrap();
        match cli.command {
            Commands::Pipeline(PipelineCommand::Step { index, params, .. }) => {
                assert_eq!(index, 2);
                assert_eq!(
                    params,
                    vec![
                        ("temperature".to_string(), serde_json::json!(0.2)),
                        ("stop".to_string(), serde_json::json!(["END"])),
                    ]
                );
            }
            _ => panic!("expected pipeline step"),
        }

        assert!(Cli::try_parse_from(["gasa", "pipeline", "run", "--param", "temperature"]).is_err());
    }

    #[test]
    fn parses_page_range_and_document_keys() {
        let cli = Cli::try_parse_from([
            "gasa", "pdf", "trim", "in.pdf", "--pages", "2-5", "-o", "out.pdf",
        ])
        .unwrap();
        match cli.command {
            Commands::Pdf(PdfCommand::Trim { pages, .. }) => {
                assert_eq!(pages, doc_prep::PageRange::new(2, 5));
            }
            _ => panic!("expected pdf trim"),
        }

        let cli = Cli::try_parse_from(["gasa", "submission", "generate", "review-report"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Submission(SubmissionCommand::Generate {
                document: agent_core::DocumentKey::ReviewReport
            })
        ));
    }

    #[test]
    fn analyze_accepts_categories_and_guidance_source() {
        let cli = Cli::try_parse_from([
            "gasa", "submission", "analyze", "-c", "core", "--category", "technical", "--source",
            "guidance",
        ])
        .unwrap();
        match cli.command {
            Commands::Submission(SubmissionCommand::Analyze {
                agents,
                categories,
                source,
                ..
            }) => {
                assert!(agents.is_empty());
                assert_eq!(
                    categories,
                    vec![AgentCategory::CoreAnalysis, AgentCategory::TechnicalValidation]
                );
                assert_eq!(source, AnalysisSource::Guidance);
            }
            _ => panic!("expected submission analyze"),
        }

        assert!(Cli::try_parse_from(["gasa", "submission", "analyze"]).is_err());
        assert!(Cli::try_parse_from(["gasa", "submission", "analyze", "-c", "everything"]).is_err());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(
            Cli::try_parse_from(["gasa", "pdf", "trim", "a.pdf", "--pages", "x-2", "-o", "b.pdf"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["gasa", "submission", "reset"]).is_err());
        assert!(Cli::try_parse_from(["gasa", "models", "claude"]).is_err());
    }
}
