use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

const LEAD_TARGET: &str = "tractor_bot::lead";
const FOLLOW_TARGET: &str = "tractor_bot::follow";
const ROUTE_TARGET: &str = "tractor_bot::route";
const GUARD_TARGET: &str = "tractor_bot::guard";
const TOP_N: usize = 5;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("{context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse telemetry JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Default, Serialize)]
pub struct TelemetrySummary {
    pub lead: DecisionFrequencies,
    pub follow: DecisionFrequencies,
    /// Router faults that fell back to a conservative play.
    pub route_warnings: usize,
    /// Router choices rejected by the legality guard.
    pub guard_errors: usize,
}

#[derive(Debug, Default, Serialize)]
pub struct DecisionFrequencies {
    pub count: usize,
    pub avg_candidates: Option<f64>,
    pub decision_points: BTreeMap<String, usize>,
}

impl DecisionFrequencies {
    /// Most frequent decision points, ties broken by name.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .decision_points
            .iter()
            .map(|(label, count)| (label.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }

    fn record(&mut self, fields: &serde_json::Map<String, Value>, candidates: &mut Average) {
        self.count += 1;
        if let Some(count) = fields
            .get("candidate_count")
            .and_then(Value::as_i64)
            .filter(|v| *v >= 0)
        {
            candidates.add(count as f64);
        }
        let label = fields
            .get("decision_point")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("<unset>");
        *self.decision_points.entry(label.to_string()).or_insert(0) += 1;
    }
}

#[derive(Debug)]
struct Average {
    sum: f64,
    count: usize,
}

impl Average {
    fn new() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

/// Aggregate the decision events written by the audit run.
pub fn summarise_telemetry(path: &Path) -> Result<TelemetrySummary, TelemetryError> {
    if !path.exists() {
        return Ok(TelemetrySummary::default());
    }

    let file = File::open(path).map_err(|source| TelemetryError::Io {
        context: "opening telemetry log",
        source,
    })?;
    let reader = BufReader::new(file);

    let mut summary = TelemetrySummary::default();
    let mut lead_candidates = Average::new();
    let mut follow_candidates = Average::new();

    for line in reader.lines() {
        let line = line.map_err(|source| TelemetryError::Io {
            context: "reading telemetry line",
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let payload: Value = serde_json::from_str(&line)?;
        let target = payload
            .get("target")
            .and_then(Value::as_str)
            .unwrap_or_default();
        let fields = payload
            .get("fields")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        match target {
            LEAD_TARGET => summary.lead.record(&fields, &mut lead_candidates),
            FOLLOW_TARGET => summary.follow.record(&fields, &mut follow_candidates),
            ROUTE_TARGET => summary.route_warnings += 1,
            GUARD_TARGET => summary.guard_errors += 1,
            _ => {}
        }
    }

    summary.lead.avg_candidates = lead_candidates.mean();
    summary.follow.avg_candidates = follow_candidates.mean();
    Ok(summary)
}

pub fn write_summary_outputs(
    telemetry_path: &Path,
    output_dir: &Path,
) -> Result<Option<TelemetryOutputs>, TelemetryError> {
    if !telemetry_path.exists() {
        return Ok(None);
    }

    let summary = summarise_telemetry(telemetry_path)?;
    let json_path = output_dir.join("telemetry_summary.json");
    let md_path = output_dir.join("telemetry_summary.md");

    std::fs::write(&json_path, serde_json::to_vec_pretty(&summary)?).map_err(|source| {
        TelemetryError::Io {
            context: "writing telemetry summary json",
            source,
        }
    })?;

    let markdown = render_markdown(&summary, telemetry_path);
    std::fs::write(&md_path, markdown).map_err(|source| TelemetryError::Io {
        context: "writing telemetry summary markdown",
        source,
    })?;

    Ok(Some(TelemetryOutputs {
        summary,
        json_path,
        markdown_path: md_path,
    }))
}

pub fn append_highlights_to_markdown(
    summary_path: &Path,
    outputs: &TelemetryOutputs,
) -> Result<(), TelemetryError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(summary_path)
        .map_err(|source| TelemetryError::Io {
            context: "opening summary markdown for telemetry append",
            source,
        })?;

    let summary = &outputs.summary;
    let mut section = String::new();
    section.push_str("\n## Telemetry Highlights\n");
    section.push_str(&format!("- Lead events: {}\n", summary.lead.count));
    section.push_str(&format!("- Follow events: {}\n", summary.follow.count));
    section.push_str(&format!("- Router fallbacks: {}\n", summary.route_warnings));
    section.push_str(&format!("- Guard rejections: {}\n", summary.guard_errors));
    push_top(&mut section, "### Top Lead Decisions", &summary.lead);
    push_top(&mut section, "### Top Follow Decisions", &summary.follow);

    write!(file, "{section}").map_err(|source| TelemetryError::Io {
        context: "writing telemetry highlights",
        source,
    })?;

    Ok(())
}

fn push_top(output: &mut String, heading: &str, frequencies: &DecisionFrequencies) {
    output.push('\n');
    output.push_str(heading);
    output.push('\n');
    let top = frequencies.top(TOP_N);
    if top.is_empty() {
        output.push_str("- <none>\n");
    }
    for (label, count) in top {
        output.push_str(&format!("- {label}: {count}\n"));
    }
}

fn render_markdown(summary: &TelemetrySummary, telemetry_path: &Path) -> String {
    let mut output = String::new();
    output.push_str("# Telemetry Summary\n\n");
    output.push_str(&format!("- Source: `{}`\n", telemetry_path.display()));
    output.push_str(&format!("- Router fallbacks: {}\n", summary.route_warnings));
    output.push_str(&format!("- Guard rejections: {}\n", summary.guard_errors));

    for (heading, frequencies) in [
        ("## Lead Decisions", &summary.lead),
        ("## Follow Decisions", &summary.follow),
    ] {
        output.push('\n');
        output.push_str(heading);
        output.push('\n');
        output.push_str(&format!("- Events: {}\n", frequencies.count));
        if let Some(value) = frequencies.avg_candidates {
            output.push_str(&format!("- Avg candidates: {:.2}\n", value));
        }
        if frequencies.decision_points.is_empty() {
            output.push_str("- <none>\n");
        }
        for (label, count) in &frequencies.decision_points {
            output.push_str(&format!("- {}: {}\n", label, count));
        }
    }
    output
}

#[derive(Debug)]
pub struct TelemetryOutputs {
    pub summary: TelemetrySummary,
    pub json_path: PathBuf,
    pub markdown_path: PathBuf,
}
