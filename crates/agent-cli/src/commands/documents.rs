use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Subcommand, ValueEnum};
use colored::Colorize;

use agent_core::{join_inputs, PipelineState};
use doc_prep::{highlight_keywords, load_document, pdf, DocumentFormat, PageRange};

use super::heading;
use crate::context::AppContext;

#[derive(Subcommand)]
pub enum PdfCommand {
    /// Show the page count of a PDF
    Info { file: PathBuf },
    /// Keep only a page range and write a new PDF
    Trim {
        file: PathBuf,
        /// Inclusive 1-based range, e.g. 2-5
        #[arg(long)]
        pages: PageRange,
        #[arg(long, short)]
        output: PathBuf,
    },
    /// Extract text (with OCR fallback) and highlight keywords
    Process {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Inclusive 1-based range applied to every PDF
        #[arg(long)]
        pages: Option<PageRange>,
        /// Comma-separated keywords to highlight
        #[arg(long, short, default_value = "")]
        keywords: String,
        /// Skip the OCR fallback for scanned pages
        #[arg(long)]
        no_ocr: bool,
        /// Write the combined text here instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Use the combined text as the pipeline's initial input
        #[arg(long)]
        pipeline: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LoadTarget {
    /// FDA guidance text for the submission workflow
    Guidance,
    /// Initial input of the agent pipeline
    Pipeline,
}

fn read_file(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn run_pdf(ctx: &AppContext, command: PdfCommand) -> anyhow::Result<()> {
    match command {
        PdfCommand::Info { file } => {
            let pages = pdf::page_count(&read_file(&file)?)?;
            println!("{} {} pages", file.display().to_string().cyan(), pages);
            Ok(())
        }
        PdfCommand::Trim {
            file,
            pages,
            output,
        } => {
            let bytes = read_file(&file)?;
            pages.validate(pdf::page_count(&bytes)?)?;
            let trimmed = pdf::trim(&bytes, pages)?;
            fs::write(&output, trimmed)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            println!(
                "{}",
                format!("✅ Kept pages {} in {}", pages, output.display()).green()
            );
            Ok(())
        }
        PdfCommand::Process {
            files,
            pages,
            keywords,
            no_ocr,
            output,
            pipeline,
        } => {
            let processor = ctx.processor(!no_ocr);
            let mut texts = Vec::with_capacity(files.len());

            for file in &files {
                let text = if DocumentFormat::from_path(file)? == DocumentFormat::Pdf {
                    let processed = processor.process(&read_file(file)?, pages, &keywords)?;
                    let ocr_note = if processed.used_ocr { " (OCR)" } else { "" };
                    eprintln!(
                        "{}",
                        format!(
                            "📄 {}: {} pages, {} chars{}",
                            file.display(),
                            processed.pages,
                            processed.text.len(),
                            ocr_note
                        )
                        .dimmed()
                    );
                    processed.text
                } else {
                    let text = load_document(file)?;
                    eprintln!(
                        "{}",
                        format!("📄 {}: {} chars", file.display(), text.len()).dimmed()
                    );
                    highlight_keywords(&text, &keywords)
                };
                texts.push(text);
            }

            let combined = join_inputs(&texts);
            if let Some(output) = &output {
                fs::write(output, &combined)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                println!(
                    "{}",
                    format!("✅ Wrote {} documents to {}", texts.len(), output.display()).green()
                );
            } else if !pipeline {
                println!("{}", combined);
            }

            if pipeline {
                set_pipeline_input(ctx, combined)?;
            }
            Ok(())
        }
    }
}

fn set_pipeline_input(ctx: &AppContext, input: String) -> anyhow::Result<()> {
    let mut snapshot = ctx.load_session()?;
    let chars = input.len();
    snapshot
        .pipeline
        .get_or_insert_with(PipelineState::default)
        .initial_input = input;
    ctx.save_session(&mut snapshot)?;
    println!(
        "{}",
        format!("✅ Pipeline input set ({} chars)", chars).green()
    );
    Ok(())
}

pub fn load(ctx: &AppContext, file: &Path, target: Option<LoadTarget>) -> anyhow::Result<()> {
    let text = load_document(file)?;

    match target {
        None => {
            heading(&format!("📄 {}", file.display()));
            println!("{}", text);
        }
        Some(LoadTarget::Pipeline) => set_pipeline_input(ctx, text)?,
        Some(LoadTarget::Guidance) => {
            let mut snapshot = ctx.load_session()?;
            let words = text.split_whitespace().count();
            snapshot.submission.guidance_text = text;
            ctx.save_session(&mut snapshot)?;
            println!(
                "{}",
                format!("✅ Guidance loaded from {} ({} words)", file.display(), words).green()
            );
        }
    }
    Ok(())
}
