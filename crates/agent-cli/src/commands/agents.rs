use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;

use agent_core::{AgentCatalog, AgentSpec, ApiVendor};
use agent_llm::validate_provider_config;
use agent_runner::AgentCategory;

use super::{heading, preview};
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum AgentsCommand {
    /// List every agent in the catalog
    List {
        /// Only agents bound to this vendor
        #[arg(long)]
        api: Option<ApiVendor>,
        /// Only one category: core, technical, compliance, strategic, advanced
        #[arg(long, short)]
        category: Option<AgentCategory>,
    },
    /// Show one agent's prompt and settings
    Show {
        /// Agent id or display name
        agent: String,
    },
}

pub fn run(ctx: &AppContext, command: AgentsCommand) -> anyhow::Result<()> {
    match command {
        AgentsCommand::List { api, category } => {
            heading(&format!("🤖 Agents ({})", ctx.catalog.len()));
            for (group, agents) in group_by_category(&ctx.catalog) {
                if category.is_some_and(|wanted| group != Some(wanted)) {
                    continue;
                }
                let agents: Vec<&AgentSpec> = agents
                    .into_iter()
                    .filter(|a| api.map_or(true, |v| a.api == v))
                    .collect();
                if agents.is_empty() {
                    continue;
                }

                let title = group.map_or("🧩 Other Agents", |g| g.title());
                match group {
                    Some(g) => println!(
                        "\n{} {}",
                        title.bold(),
                        format!("(--category {})", g).dimmed()
                    ),
                    None => println!("\n{}", title.bold()),
                }
                for agent in agents {
                    let model = agent.model_or(agent.api.default_model());
                    println!(
                        "  {:<28} {:<34} {}",
                        agent.id.green(),
                        agent.name,
                        format!("{} / {}", agent.api, model).dimmed()
                    );
                }
            }
            Ok(())
        }
        AgentsCommand::Show { agent } => {
            let spec = ctx
                .catalog
                .resolve(&agent)
                .with_context(|| format!("Unknown agent: {}", agent))?;

            heading(&format!("🤖 {}", spec.name));
            println!("{} {}", "id:".dimmed(), spec.id);
            println!("{} {}", "api:".dimmed(), spec.api);
            println!(
                "{} {}",
                "model:".dimmed(),
                spec.model_or(&format!("{} (default)", spec.api.default_model()))
            );
            if !spec.parameters.is_empty() {
                println!(
                    "{} {}",
                    "parameters:".dimmed(),
                    serde_json::to_string(&spec.parameters)?
                );
            }
            println!("{}", "prompt:".dimmed());
            println!("{}", spec.prompt);
            if let Ok(placeholders) = spec.template().placeholders() {
                println!(
                    "{} {}",
                    "placeholders:".dimmed(),
                    preview(&placeholders.join(", "), 120)
                );
            }
            Ok(())
        }
    }
}

/// Catalog agents grouped by category in category order; agents outside
/// every category come last under `None`.
fn group_by_category(catalog: &AgentCatalog) -> Vec<(Option<AgentCategory>, Vec<&AgentSpec>)> {
    let mut groups: Vec<(Option<AgentCategory>, Vec<&AgentSpec>)> = AgentCategory::ALL
        .into_iter()
        .map(|category| {
            let agents = category
                .agents()
                .iter()
                .filter_map(|id| catalog.get(id))
                .collect();
            (Some(category), agents)
        })
        .collect();

    let other = catalog
        .iter()
        .filter(|agent| AgentCategory::of(&agent.id).is_none())
        .collect();
    groups.push((None, other));
    groups
}

pub fn list_models(ctx: &AppContext, vendor: Option<ApiVendor>) -> anyhow::Result<()> {
    let vendors: Vec<ApiVendor> = match vendor {
        Some(vendor) => vec![vendor],
        None => ApiVendor::ALL.to_vec(),
    };

    for vendor in vendors {
        let status = match validate_provider_config(vendor, &ctx.config) {
            Ok(()) => "✅ key configured".green(),
            Err(_) => "⚠️ no API key".yellow(),
        };
        println!("{} {}", vendor.as_str().cyan().bold(), status);
        for model in vendor.models() {
            if *model == vendor.default_model() {
                println!("  {} {}", model, "(default)".dimmed());
            } else {
                println!("  {}", model);
            }
        }
    }
    Ok(())
}
