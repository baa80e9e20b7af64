use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

/// Running tallies over every decision of an audit run.
#[derive(Debug, Default)]
pub struct AuditStats {
    decision_points: BTreeMap<&'static str, usize>,
    scenarios: BTreeMap<&'static str, usize>,
    latencies_us: Vec<u64>,
    illegal: usize,
    over_budget: usize,
    budget: Duration,
}

impl AuditStats {
    pub fn new(budget: Duration) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    pub fn record(
        &mut self,
        decision_point: &'static str,
        scenario: &'static str,
        legal: bool,
        elapsed: Duration,
    ) {
        *self.decision_points.entry(decision_point).or_insert(0) += 1;
        *self.scenarios.entry(scenario).or_insert(0) += 1;
        self.latencies_us
            .push(u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX));
        if !legal {
            self.illegal += 1;
        }
        if elapsed > self.budget {
            self.over_budget += 1;
        }
    }

    pub fn decisions(&self) -> usize {
        self.latencies_us.len()
    }

    pub fn illegal(&self) -> usize {
        self.illegal
    }

    pub fn finalize(mut self, run_id: &str, rounds: usize) -> AuditSummary {
        self.latencies_us.sort_unstable();
        let latency = LatencySummary::from_sorted(&self.latencies_us);
        AuditSummary {
            run_id: run_id.to_string(),
            rounds,
            decisions: self.latencies_us.len(),
            illegal: self.illegal,
            over_budget: self.over_budget,
            budget_ms: self.budget.as_millis() as u64,
            latency,
            decision_points: self
                .decision_points
                .into_iter()
                .map(|(label, count)| (label.to_string(), count))
                .collect(),
            scenarios: self
                .scenarios
                .into_iter()
                .map(|(label, count)| (label.to_string(), count))
                .collect(),
        }
    }
}

/// Latency figures in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub mean_us: f64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub max_us: u64,
}

impl LatencySummary {
    fn from_sorted(sorted: &[u64]) -> Self {
        let Some(&max_us) = sorted.last() else {
            return Self::default();
        };
        let total: u128 = sorted.iter().map(|&us| u128::from(us)).sum();
        Self {
            mean_us: total as f64 / sorted.len() as f64,
            p50_us: percentile(sorted, 50),
            p95_us: percentile(sorted, 95),
            max_us,
        }
    }
}

/// Nearest-rank percentile over an ascending slice.
fn percentile(sorted: &[u64], pct: usize) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    sorted[rank.min(sorted.len()) - 1]
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditSummary {
    pub run_id: String,
    pub rounds: usize,
    pub decisions: usize,
    pub illegal: usize,
    pub over_budget: usize,
    pub budget_ms: u64,
    pub latency: LatencySummary,
    pub decision_points: BTreeMap<String, usize>,
    pub scenarios: BTreeMap<String, usize>,
}

impl AuditSummary {
    pub fn render_markdown(&self) -> String {
        let mut output = String::new();
        output.push_str(&format!("# Decision Audit: {}\n\n", self.run_id));
        output.push_str(&format!("- Rounds: {}\n", self.rounds));
        output.push_str(&format!("- Decisions: {}\n", self.decisions));
        output.push_str(&format!("- Illegal decisions: {}\n", self.illegal));
        output.push_str(&format!(
            "- Over {} ms budget: {}\n",
            self.budget_ms, self.over_budget
        ));

        output.push_str("\n## Latency\n\n");
        output.push_str("| mean (us) | p50 (us) | p95 (us) | max (us) |\n");
        output.push_str("|---:|---:|---:|---:|\n");
        output.push_str(&format!(
            "| {:.1} | {} | {} | {} |\n",
            self.latency.mean_us, self.latency.p50_us, self.latency.p95_us, self.latency.max_us
        ));

        output.push_str("\n## Decision Points\n\n");
        push_frequency_table(&mut output, "decision point", &self.decision_points, self.decisions);
        output.push_str("\n## Scenarios\n\n");
        push_frequency_table(&mut output, "scenario", &self.scenarios, self.decisions);
        output
    }

    pub fn write_markdown(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.render_markdown())
    }
}

fn push_frequency_table(
    output: &mut String,
    label: &str,
    counts: &BTreeMap<String, usize>,
    total: usize,
) {
    output.push_str(&format!("| {label} | count | share |\n"));
    output.push_str("|---|---:|---:|\n");
    for (name, count) in counts {
        let share = if total == 0 {
            0.0
        } else {
            *count as f64 * 100.0 / total as f64
        };
        output.push_str(&format!("| {name} | {count} | {share:.1}% |\n"));
    }
}
