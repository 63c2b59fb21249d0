//! Plain-text and markdown export of generated documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::document::{DocumentKey, SubmissionState};
use crate::session::TIMESTAMP_FORMAT;

/// `Mock Report` at 2024-03-09 14:05:07 becomes `Mock_Report_20240309_140507.txt`.
pub fn export_file_name(title: &str, now: DateTime<Local>) -> String {
    format!(
        "{}_{}.txt",
        title.replace(' ', "_"),
        now.format(TIMESTAMP_FORMAT)
    )
}

pub fn export_document(
    dir: &Path,
    title: &str,
    content: &str,
    now: DateTime<Local>,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(title, now));
    fs::write(&path, content)?;
    log::info!("Exported {} to {}", title, path.display());
    Ok(path)
}

/// Renders every non-empty document and agent result as one markdown file.
pub fn render_package(state: &SubmissionState) -> String {
    let mut out = String::new();
    out.push_str("# 510(k) Submission Package\n\n");
    if !state.topic.is_empty() {
        out.push_str(&format!("**Device / topic:** {}\n\n", state.topic));
    }

    for key in DocumentKey::ALL {
        let text = state.document(key);
        if text.is_empty() {
            continue;
        }
        out.push_str(&format!("## {}\n\n{}\n\n", key.title(), text.trim_end()));
    }

    if !state.agent_outputs.is_empty() {
        out.push_str("## AI Analysis Results\n\n");
        for output in state.agent_outputs.values() {
            out.push_str(&format!(
                "### {}\n\n_Generated: {}_\n\n{}\n\n",
                output.name,
                output.timestamp.to_rfc3339(),
                output.result.trim_end()
            ));
        }
    }

    out
}

pub fn export_package(
    dir: &Path,
    state: &SubmissionState,
    now: DateTime<Local>,
) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let name = format!("Submission_Package_{}.md", now.format(TIMESTAMP_FORMAT));
    let path = dir.join(name);
    fs::write(&path, render_package(state))?;
    log::info!("Exported submission package to {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
    }

    #[test]
    fn file_name_replaces_spaces_and_appends_timestamp() {
        assert_eq!(
            export_file_name("Mock Review Report", fixed_now()),
            "Mock_Review_Report_20240309_140507.txt"
        );
    }

    #[test]
    fn export_document_writes_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_document(dir.path(), "Mock Report", "body", fixed_now()).unwrap();
        assert_eq!(path.file_name().unwrap(), "Mock_Report_20240309_140507.txt");
        assert_eq!(fs::read_to_string(path).unwrap(), "body");
    }

    #[test]
    fn package_skips_empty_documents() {
        let mut state = SubmissionState::new("Catheter", "g");
        state.set_generated(DocumentKey::MockReport, "the report\n");
        state.record_agent_output("risk_analyzer", "Risk Assessment", "risks");

        let rendered = render_package(&state);
        assert!(rendered.contains("## Mock Report\n\nthe report\n\n"));
        assert!(!rendered.contains("## Review Guideline"));
        assert!(rendered.contains("### Risk Assessment"));
        assert!(rendered.contains("**Device / topic:** Catheter"));

        let dir = tempfile::tempdir().unwrap();
        let path = export_package(dir.path(), &state, fixed_now()).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), rendered);
    }
}
