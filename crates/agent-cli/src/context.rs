use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Local;

use agent_core::config::gasa_dir;
use agent_core::{AgentCatalog, Config, SessionSnapshot};
use agent_runner::AgentRunner;
use doc_prep::{DocumentProcessor, TesseractOcr};

const DEFAULT_AGENTS_FILE: &str = "agents.yaml";

/// Configuration, agents and session location shared by all commands.
pub struct AppContext {
    pub config: Config,
    pub catalog: AgentCatalog,
    pub session_path: PathBuf,
}

impl AppContext {
    pub fn load(
        config_path: Option<&Path>,
        agents_path: Option<&Path>,
        session_path: Option<&Path>,
    ) -> anyhow::Result<Self> {
        let config = Config::load(config_path).context("Failed to load configuration")?;

        let agents_path = agents_path
            .map(Path::to_path_buf)
            .or_else(|| config.agents_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_AGENTS_FILE));
        let catalog = AgentCatalog::load_or_builtin(Some(&agents_path));

        let session_path = session_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| gasa_dir().join("session.json"));

        Ok(Self {
            config,
            catalog,
            session_path,
        })
    }

    pub fn runner(&self) -> AgentRunner {
        AgentRunner::from_config(&self.config, self.catalog.clone())
    }

    pub fn processor(&self, ocr: bool) -> DocumentProcessor {
        let processor =
            DocumentProcessor::new().with_min_chars_per_page(self.config.ocr.min_chars_per_page);
        if !(ocr && self.config.ocr.enabled) {
            return processor;
        }

        let mut engine = TesseractOcr::new().with_dpi(self.config.ocr.dpi);
        if let Some(language) = &self.config.ocr.language {
            engine = engine.with_language(language.clone());
        }
        processor.with_ocr(Box::new(engine))
    }

    pub fn load_session(&self) -> anyhow::Result<SessionSnapshot> {
        SessionSnapshot::load(&self.session_path).context("Failed to load session")
    }

    pub fn save_session(&self, snapshot: &mut SessionSnapshot) -> anyhow::Result<()> {
        snapshot
            .save(&self.session_path, Local::now())
            .context("Failed to save session")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::{DocumentKey, SubmissionState};

    #[test]
    fn missing_agent_file_falls_back_to_builtin_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::load(
            None,
            Some(&dir.path().join("agents.yaml")),
            Some(&dir.path().join("session.json")),
        )
        .unwrap();
        assert_eq!(ctx.catalog.len(), AgentCatalog::builtin().len());
        assert!(ctx.catalog.get("report_generator").is_some());
    }

    #[test]
    fn session_round_trips_through_context() {
        let dir = tempfile::tempdir().unwrap();
        let session_path = dir.path().join("state").join("session.json");
        let ctx = AppContext::load(None, Some(&dir.path().join("none.yaml")), Some(&session_path))
            .unwrap();

        let mut snapshot = ctx.load_session().unwrap();
        assert!(snapshot.submission.topic.is_empty());

        let mut submission = SubmissionState::new("Pulse oximeter", "guidance");
        submission.set_generated(DocumentKey::MockReport, "report");
        snapshot.submission = submission;
        ctx.save_session(&mut snapshot).unwrap();

        let loaded = ctx.load_session().unwrap();
        assert_eq!(loaded.submission.mock_report, "report");
        assert!(!loaded.timestamp.is_empty());
    }
}
