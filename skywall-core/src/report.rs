// Report generation from a persisted classification run

use crate::store::{Result, StatusStore};
use serde::{Deserialize, Serialize};
use skywall_scraper::classify::PageStatus;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportData {
    pub provider: String,
    pub total_pages: usize,
    pub status_counts: Vec<StatusCount>,
    /// Pages whose classification failed; the run's user-visible failure
    /// surface, no automatic retry is performed.
    pub error_pages: Vec<String>,
}

pub fn gather_report_data(store: &StatusStore, provider: &str) -> Result<ReportData> {
    let entries = store.load_status()?;
    let total_pages = entries.len();

    let mut status_counts: Vec<StatusCount> = Vec::new();
    for entry in &entries {
        let name = entry.status.as_str();
        match status_counts.iter_mut().find(|c| c.status == name) {
            Some(count) => count.count += 1,
            None => status_counts.push(StatusCount {
                status: name.to_string(),
                count: 1,
            }),
        }
    }
    status_counts.sort_by(|a, b| b.count.cmp(&a.count));

    let error_pages = store
        .list(PageStatus::Error)?
        .into_iter()
        .map(|id| id.to_string())
        .collect();

    Ok(ReportData {
        provider: provider.to_string(),
        total_pages,
        status_counts,
        error_pages,
    })
}

pub fn generate_text_report(data: &ReportData) -> String {
    let mut report = String::new();

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                 SKYWALL CLASSIFICATION REPORT\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");

    report.push_str(&format!("Provider:     {}\n", data.provider));
    report.push_str(&format!(
        "Generated:    {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    report.push_str(&format!("Pages:        {}\n\n", data.total_pages));

    report.push_str("Status breakdown:\n");
    for count in &data.status_counts {
        report.push_str(&format!("  {:<18} {}\n", count.status, count.count));
    }
    report.push('\n');

    if !data.error_pages.is_empty() {
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
        report.push_str("PAGES ENDING IN ERROR\n");
        report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n\n");
        for page in &data.error_pages {
            report.push_str(&format!("  {}\n", page));
        }
        report.push('\n');
    }

    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    report.push_str("                       End of Report\n");
    report.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");

    report
}

pub fn generate_json_report(data: &ReportData) -> std::result::Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "skywall",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json"
            },
            "provider": data.provider,
            "summary": {
                "total_pages": data.total_pages,
                "status_breakdown": data.status_counts,
                "error_count": data.error_pages.len()
            },
            "error_pages": data.error_pages
        }
    });

    serde_json::to_string_pretty(&json_report)
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
