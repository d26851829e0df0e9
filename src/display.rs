//! Output Formatting and Display Management
//!
//! This module renders analysis results for the terminal, for scripts and for
//! download-style result files.
//!
//! ## Output Formats
//!
//! - **Text**: colored summary header followed by one username per line
//! - **Plain**: the usernames only, one per line, nothing else
//! - **Json**: machine-readable report:
//!
//! ```json
//! {
//!   "generatedAt": "2026-01-15T10:30:00+00:00",
//!   "followers": 120,
//!   "following": 140,
//!   "duplicateFollowing": 0,
//!   "notFollowingBack": {
//!     "count": 2,
//!     "usernames": ["bob", "carol"]
//!   }
//! }
//! ```
//!
//! ## Result Files
//!
//! [`DisplayManager::write_result_file`] saves the plain rendering under a
//! randomized name (`Result_1a2b3c4d.txt`) so repeated runs never clobber an
//! earlier result.

use crate::config::OutputConfig;
use crate::models::AnalysisReport;
use anyhow::{Context, Result};
use chrono::Utc;
use clap::ValueEnum;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Summary header plus one username per line
    #[default]
    Text,
    /// Usernames only, one per line
    Plain,
    /// Structured JSON report
    Json,
}

pub struct DisplayManager {
    json_pretty: bool,
    result_prefix: String,
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new(&OutputConfig::default())
    }
}

impl DisplayManager {
    pub fn new(config: &OutputConfig) -> Self {
        Self {
            json_pretty: config.json_pretty,
            result_prefix: config.result_prefix.clone(),
        }
    }

    /// Render a report in the requested format.
    pub fn render(&self, report: &AnalysisReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Plain => Ok(report.to_plain_text()),
            OutputFormat::Json => self.render_json(report),
            OutputFormat::Text => Ok(self.render_text(report)),
        }
    }

    pub fn display(&self, report: &AnalysisReport, format: OutputFormat) -> Result<()> {
        let rendered = self.render(report, format)?;
        if !rendered.is_empty() {
            println!("{}", rendered);
        }
        Ok(())
    }

    fn render_json(&self, report: &AnalysisReport) -> Result<String> {
        let output = serde_json::json!({
            "generatedAt": Utc::now().to_rfc3339(),
            "followers": report.followers_count,
            "following": report.distinct_following_count,
            "duplicateFollowing": report.duplicate_following_count(),
            "notFollowingBack": {
                "count": report.not_following_back.len(),
                "usernames": report.not_following_back,
            }
        });

        let rendered = if self.json_pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        };
        rendered.context("Failed to serialize report to JSON")
    }

    fn render_text(&self, report: &AnalysisReport) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "=".repeat(60).bright_cyan()));
        out.push_str(&format!(
            "{}\n",
            "Accounts you follow that don't follow you back".bright_white().bold()
        ));
        out.push_str(&format!("{}\n", "=".repeat(60).bright_cyan()));
        out.push_str(&format!(
            "\n{} followers • {} following • {} not following back\n",
            report.followers_count.to_string().bright_white().bold(),
            report.distinct_following_count.to_string().bright_white().bold(),
            report.not_following_back.len().to_string().bright_yellow().bold()
        ));
        let duplicates = report.duplicate_following_count();
        if duplicates > 0 {
            out.push_str(&format!(
                "{}\n",
                format!("({} duplicate entries in the following export ignored)", duplicates).dimmed()
            ));
        }

        if report.not_following_back.is_empty() {
            out.push_str(&format!("\n{}\n", "Everyone you follow follows you back.".bright_green()));
            return out;
        }

        out.push('\n');
        for username in &report.not_following_back {
            out.push_str(username.as_str());
            out.push('\n');
        }
        out
    }

    /// Save the plain result to a freshly named file inside `dir`.
    pub fn write_result_file(&self, dir: &Path, report: &AnalysisReport) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

        let token = Uuid::new_v4().simple().to_string();
        let path = dir.join(format!("{}_{}.txt", self.result_prefix, &token[..8]));

        fs::write(&path, report.to_plain_text())
            .with_context(|| format!("Failed to write result file: {}", path.display()))?;

        info!(path = %path.display(), usernames = report.not_following_back.len(), "Saved result file");
        Ok(path)
    }
}
