use crate::classifier::classify_name;
use crate::constants::{is_all_sentinel, ALL_SENTINEL, EXPORT_FILE_PREFIX, NOT_AVAILABLE, REPORT_FOOTER_BRAND};
use crate::error::{PredictorError, Result};
use crate::model::{Criteria, Record};
use crate::telemetry::PredictorMetrics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// One label/value line of the criteria summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryItem {
    pub label: String,
    pub value: String,
}

impl SummaryItem {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Label/value pairs describing the criteria behind a result set.
pub fn criteria_summary(criteria: &Criteria) -> Vec<SummaryItem> {
    vec![
        SummaryItem::new("Seat Type", join_selection(&criteria.seat_types)),
        SummaryItem::new("Branch", join_selection(&criteria.branches)),
        SummaryItem::new("College Type", join_selection(&criteria.college_types)),
        SummaryItem::new("Region", join_selection(&criteria.regions)),
        SummaryItem::new("Filter By", criteria.mode.label()),
        SummaryItem::new(criteria.mode.label(), format_number(criteria.threshold)),
    ]
}

fn join_selection(selection: &BTreeSet<String>) -> String {
    if selection.is_empty() || selection.iter().any(|v| is_all_sentinel(v)) {
        return ALL_SENTINEL.to_string();
    }
    selection.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Renders whole numbers without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// A result row as presented to readers, with absent values spelled out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub institute: String,
    pub branch: String,
    pub college_type: String,
    pub seat_type: String,
    pub closing_rank: String,
    pub percentile: String,
}

impl ExportRow {
    pub const HEADERS: [&'static str; 6] = [
        "Institute",
        "Branch",
        "College Type",
        "Seat Type",
        "Closing Rank",
        "Percentile",
    ];

    pub fn from_record(record: &Record) -> Self {
        Self {
            institute: text_or_na(&record.institute),
            branch: text_or_na(&record.branch),
            college_type: classify_name(&record.institute).to_string(),
            seat_type: text_or_na(&record.seat_type),
            closing_rank: record.rank.map(format_number).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            percentile: record.percentile.map(format_number).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }

    fn cells(&self) -> [&str; 6] {
        [
            self.institute.as_str(),
            self.branch.as_str(),
            self.college_type.as_str(),
            self.seat_type.as_str(),
            self.closing_rank.as_str(),
            self.percentile.as_str(),
        ]
    }
}

fn text_or_na(value: &str) -> String {
    if value.trim().is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        value.to_string()
    }
}

/// Read-only copy of a result set and its criteria, handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSnapshot {
    pub title: String,
    pub generated_on: DateTime<Utc>,
    pub summary: Vec<SummaryItem>,
    pub rows: Vec<ExportRow>,
}

impl ExportSnapshot {
    pub fn new(title: impl Into<String>, criteria: &Criteria, results: &[Record], generated_on: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            generated_on,
            summary: criteria_summary(criteria),
            rows: results.iter().map(ExportRow::from_record).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Text,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Text => f.write_str("text"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = PredictorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "text" | "txt" => Ok(ExportFormat::Text),
            other => Err(PredictorError::Export(format!("unsupported export format: {}", other))),
        }
    }
}

pub fn render_json(snapshot: &ExportSnapshot) -> Result<String> {
    serde_json::to_string_pretty(snapshot).map_err(|e| PredictorError::Export(e.to_string()))
}

/// Plain-text report: title, criteria lines, a column-aligned table and a
/// dated footer.
pub fn render_text(snapshot: &ExportSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&snapshot.title);
    out.push_str("\n\n");
    for item in &snapshot.summary {
        out.push_str(&format!("{}: {}\n", item.label, item.value));
    }
    out.push('\n');
    out.push_str(&render_table(&snapshot.rows));
    out.push('\n');
    out.push_str(&format!(
        "Generated on {} | {}\n",
        snapshot.generated_on.format("%Y-%m-%d"),
        REPORT_FOOTER_BRAND
    ));
    out
}

/// Column-aligned table of rows under the standard headers.
pub fn render_table(rows: &[ExportRow]) -> String {
    let mut widths = ExportRow::HEADERS.map(|h| h.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = table_line(&ExportRow::HEADERS, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in rows {
        out.push_str(&table_line(&row.cells(), &widths));
    }
    out
}

fn table_line(cells: &[&str; 6], widths: &[usize; 6]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    let mut line = padded.join(" | ");
    line.truncate(line.trim_end().len());
    line.push('\n');
    line
}

pub fn export_file_name(format: ExportFormat, generated_on: DateTime<Utc>) -> String {
    format!(
        "{}-{}.{}",
        EXPORT_FILE_PREFIX,
        generated_on.timestamp_millis(),
        format.extension()
    )
}

/// Renders the snapshot and writes it under `output_dir`, returning the file path.
pub fn write_export(snapshot: &ExportSnapshot, format: ExportFormat, output_dir: &Path) -> Result<PathBuf> {
    let body = match format {
        ExportFormat::Json => render_json(snapshot)?,
        ExportFormat::Text => render_text(snapshot),
    };

    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(export_file_name(format, snapshot.generated_on));
    std::fs::write(&path, body)?;

    PredictorMetrics::record_export(format.extension(), snapshot.rows.len());
    info!(path = %path.display(), rows = snapshot.rows.len(), %format, "Wrote export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Criteria;
    use chrono::TimeZone;

    fn generated_on() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn rows() -> Vec<Record> {
        vec![
            Record {
                institute: "Government College of Engineering, Pune".to_string(),
                institute_code: "6006".to_string(),
                branch: "Computer Engineering".to_string(),
                seat_type: "GOPENS".to_string(),
                rank: Some(120.0),
                percentile: Some(99.61),
            },
            Record {
                institute: String::new(),
                institute_code: "1002".to_string(),
                branch: "Civil Engineering".to_string(),
                seat_type: "GOBCS".to_string(),
                rank: None,
                percentile: Some(80.0),
            },
        ]
    }

    #[test]
    fn test_summary_defaults_to_all() {
        let summary = criteria_summary(&Criteria::by_percentile(92.5));
        let pairs: Vec<_> = summary.iter().map(|i| (i.label.as_str(), i.value.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("Seat Type", "All"),
                ("Branch", "All"),
                ("College Type", "All"),
                ("Region", "All"),
                ("Filter By", "Percentile"),
                ("Percentile", "92.5"),
            ]
        );
    }

    #[test]
    fn test_summary_joins_selections() {
        let criteria = Criteria::by_rank(5000.0).with_seat_types(vec!["GOPENS", "GOBCS"]);
        let summary = criteria_summary(&criteria);
        assert_eq!(summary[0].value, "GOBCS, GOPENS");
        assert_eq!(summary[5], SummaryItem::new("Rank", "5000"));
    }

    #[test]
    fn test_rows_spell_out_missing_values() {
        let row = ExportRow::from_record(&rows()[1]);
        assert_eq!(row.institute, "N/A");
        assert_eq!(row.college_type, "Other");
        assert_eq!(row.closing_rank, "N/A");
        assert_eq!(row.percentile, "80");
    }

    #[test]
    fn test_text_report_layout() {
        let snapshot = ExportSnapshot::new("College Prediction Results", &Criteria::by_rank(100.0), &rows(), generated_on());
        let text = render_text(&snapshot);
        assert!(text.starts_with("College Prediction Results\n\nSeat Type: All\n"));
        assert!(text.contains("Institute"));
        assert!(text.contains("Government College of Engineering, Pune | Computer Engineering | Government"));
        assert!(text.ends_with("Generated on 2025-06-01 | College Predictor\n"));
    }

    #[test]
    fn test_json_report_carries_rows() {
        let snapshot = ExportSnapshot::new("Results", &Criteria::by_rank(100.0), &rows(), generated_on());
        let json: serde_json::Value = serde_json::from_str(&render_json(&snapshot).unwrap()).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 2);
        assert_eq!(json["rows"][0]["percentile"], "99.61");
        assert!(json["generated_on"].as_str().unwrap().starts_with("2025-06-01"));
    }

    #[test]
    fn test_file_name_uses_millis() {
        let name = export_file_name(ExportFormat::Json, generated_on());
        assert_eq!(name, format!("college-predictor-results-{}.json", generated_on().timestamp_millis()));
    }

    #[test]
    fn test_write_export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let snapshot = ExportSnapshot::new("Results", &Criteria::by_rank(100.0), &rows(), generated_on());
        let path = write_export(&snapshot, ExportFormat::Text, &dir.path().join("out")).unwrap();
        let body = std::fs::read_to_string(path).unwrap();
        assert!(body.contains("GOPENS"));
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!("pdf".parse::<ExportFormat>().is_err());
    }
}
