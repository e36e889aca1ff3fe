// Text, JSON and Markdown renderings of an evaluated audit

use crate::evaluate::{EvaluatedReport, ScoreClass};
use crate::export::{format_generated_at, format_load_time};
use crate::view::{NO_ISSUES_MESSAGE, ResultsView, ScreenshotLink};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
    Markdown,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            "markdown" | "md" => Some(ReportFormat::Markdown),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreenshotData {
    pub label: String,
    pub identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl From<&ScreenshotLink> for ScreenshotData {
    fn from(link: &ScreenshotLink) -> Self {
        Self {
            label: link.label.to_string(),
            identifier: link.identifier.clone(),
            url: link.url.as_ref().map(|url| url.to_string()),
        }
    }
}

/// Everything a rendered report shows, detached from the view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub url: String,
    pub policy: String,
    pub evaluated: EvaluatedReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_time_ms: Option<f64>,
    pub h1_headings: Vec<String>,
    pub screenshots: Vec<ScreenshotData>,
    pub generated_at: DateTime<Local>,
}

impl ReportData {
    pub fn from_view(view: &ResultsView, policy: &str, generated_at: DateTime<Local>) -> Self {
        Self {
            url: view.url().to_string(),
            policy: policy.to_string(),
            evaluated: view.evaluated(),
            load_time_ms: view.report().load_time_ms(),
            h1_headings: view
                .report()
                .h1_headings()
                .into_iter()
                .map(String::from)
                .collect(),
            screenshots: view.screenshots().iter().map(ScreenshotData::from).collect(),
            generated_at,
        }
    }

    fn verdict(&self) -> &'static str {
        match self.evaluated.score_class {
            ScoreClass::Good => "Good",
            ScoreClass::Ok => "Needs work",
            ScoreClass::Bad => "Poor",
        }
    }
}

pub fn render_report(data: &ReportData, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(data)),
        ReportFormat::Json => generate_json_report(data),
        ReportFormat::Markdown => Ok(generate_markdown_report(data)),
    }
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    // Header
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                           AUDITLY WEBSITE AUDIT REPORT\n");
    report.push_str(RULE);
    report.push_str("\n\n");

    report.push_str(&format!("URL:          {}\n", data.url));
    report.push_str(&format!("Generated:    {}\n", format_generated_at(&data.generated_at)));
    report.push_str(&format!("Policy:       {}\n", data.policy));
    report.push('\n');

    // Score
    report.push_str(RULE);
    report.push_str("\nSEO SCORE\n");
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str(&format!(
        "  {} / 100  [{}]  {}\n\n",
        data.evaluated.score,
        data.evaluated.score_class.as_str().to_uppercase(),
        data.verdict()
    ));

    // Issues
    report.push_str(RULE);
    report.push_str("\nSEO ISSUES\n");
    report.push_str(RULE);
    report.push_str("\n\n");
    if data.evaluated.issues.is_empty() {
        report.push_str(&format!("  ✓ {}\n", NO_ISSUES_MESSAGE));
    } else {
        for issue in &data.evaluated.issues {
            report.push_str(&format!("  ✗ {}\n", issue));
        }
    }
    report.push('\n');

    // Performance
    report.push_str(RULE);
    report.push_str("\nPERFORMANCE\n");
    report.push_str(RULE);
    report.push_str("\n\n");
    report.push_str(&format!("  Load Time: {}\n", format_load_time(data.load_time_ms)));
    if !data.h1_headings.is_empty() {
        report.push_str(&format!("  H1 headings: {}\n", data.h1_headings.len()));
        for heading in &data.h1_headings {
            report.push_str(&format!("    • {}\n", heading));
        }
    }
    report.push('\n');

    if !data.screenshots.is_empty() {
        report.push_str(RULE);
        report.push_str("\nSCREENSHOTS\n");
        report.push_str(RULE);
        report.push_str("\n\n");
        for shot in &data.screenshots {
            let location = shot.url.as_deref().unwrap_or(&shot.identifier);
            report.push_str(&format!("  {:<8} {}\n", shot.label, location));
        }
        report.push('\n');
    }

    // Footer
    report.push_str(RULE);
    report.push('\n');
    report.push_str("                                  End of Report\n");
    report.push_str(RULE);
    report.push('\n');

    report
}

pub fn generate_json_report(data: &ReportData) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Auditly",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": data.generated_at.to_rfc3339(),
                "format": "json",
                "policy": data.policy
            },
            "url": data.url,
            "score": data.evaluated.score,
            "score_class": data.evaluated.score_class,
            "issues": data.evaluated.issues,
            "performance": {
                "load_time_ms": data.load_time_ms
            },
            "h1_headings": data.h1_headings,
            "screenshots": data.screenshots
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn generate_markdown_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str("# Website Audit Report\n\n");
    report.push_str(&format!("- **URL:** {}\n", data.url));
    report.push_str(&format!(
        "- **Generated on:** {}\n",
        format_generated_at(&data.generated_at)
    ));
    report.push_str(&format!("- **Policy:** {}\n\n", data.policy));

    report.push_str("## SEO Score\n\n");
    report.push_str(&format!(
        "**{} / 100** ({})\n\n",
        data.evaluated.score,
        data.evaluated.score_class.as_str()
    ));

    report.push_str("## SEO Issues\n\n");
    if data.evaluated.issues.is_empty() {
        report.push_str(&format!("{}\n\n", NO_ISSUES_MESSAGE));
    } else {
        for issue in &data.evaluated.issues {
            report.push_str(&format!("- {}\n", issue));
        }
        report.push('\n');
    }

    report.push_str("## Performance\n\n");
    report.push_str(&format!("Load Time: {}\n", format_load_time(data.load_time_ms)));

    if !data.screenshots.is_empty() {
        report.push_str("\n## Screenshots\n\n");
        for shot in &data.screenshots {
            match shot.url {
                Some(ref url) => {
                    report.push_str(&format!("- {}: [{}]({})\n", shot.label, shot.identifier, url))
                }
                None => report.push_str(&format!("- {}: {}\n", shot.label, shot.identifier)),
            }
        }
    }

    report
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
