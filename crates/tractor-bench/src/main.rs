use std::path::PathBuf;

use clap::Parser;

use tractor_bench::audit::AuditRunner;
use tractor_bench::config::{AuditConfig, ResolvedOutputs};
use tractor_bench::logging::init_logging;
use tractor_bench::telemetry::{append_highlights_to_markdown, write_summary_outputs};

const TOP_DECISIONS: usize = 5;

/// Decision audit harness for the Tractor bots.
#[derive(Debug, Parser)]
#[command(
    name = "tractor-bench",
    author,
    version,
    about = "Deterministic legality and latency audit for Tractor bot decisions"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/audit.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of rounds to play.
    #[arg(long, value_name = "ROUNDS")]
    rounds: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no rounds are played).
    #[arg(long)]
    validate_only: bool,

    /// Log full hands with every decision (forces TRACTOR_DECISION_DETAILS=1).
    #[arg(long)]
    log_decision_details: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = AuditConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(rounds) = cli.rounds {
        config.deals.rounds = rounds;
    }

    if let Some(seed) = cli.seed {
        config.deals.seed = Some(seed);
    }

    if cli.log_decision_details {
        config.logging.decision_details = true;
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let rounds = config.deals.rounds;
    let trump = if config.trump.is_fixed() {
        "fixed trump"
    } else {
        "trump drawn per deal"
    };

    println!("Loaded configuration '{run_id}' ({rounds} rounds, {trump})");

    if cli.validate_only {
        println!("Validation-only mode: audit execution skipped.");
        return Ok(());
    }

    let logging_guard = init_logging(&config.logging, &outputs, &run_id)?;
    let runner = AuditRunner::new(config, outputs.clone());
    let summary = runner.run()?;

    println!(
        "Audit complete for '{run_id}': {} rounds → {} decisions ({} illegal) at {}",
        summary.rounds_played,
        summary.decisions,
        summary.illegal_decisions,
        summary.jsonl_path.display()
    );
    println!(
        "Latency: mean {:.1} us, p95 {} us, max {} us ({} over budget)",
        summary.audit.latency.mean_us,
        summary.audit.latency.p95_us,
        summary.audit.latency.max_us,
        summary.audit.over_budget
    );
    println!("Summary table: {}", summary.summary_path.display());

    if let Some(guard) = logging_guard {
        let telemetry_path = guard.telemetry_path.clone();
        // Flushes the non-blocking writer before the log is read back.
        drop(guard);

        println!("Telemetry log: {}", telemetry_path.display());
        if let Some(telemetry) = write_summary_outputs(&telemetry_path, &outputs.telemetry_dir())? {
            append_highlights_to_markdown(&summary.summary_path, &telemetry)?;
            println!("Telemetry summary (JSON): {}", telemetry.json_path.display());
            println!(
                "Telemetry summary (Markdown): {}",
                telemetry.markdown_path.display()
            );
            for (label, frequencies) in [
                ("Lead", &telemetry.summary.lead),
                ("Follow", &telemetry.summary.follow),
            ] {
                println!("  {label} decisions: {} events", frequencies.count);
                for (point, count) in frequencies.top(TOP_DECISIONS) {
                    println!("    {point}: {count}");
                }
            }
        }
    }

    if summary.illegal_decisions > 0 {
        anyhow::bail!(
            "{} illegal decisions recorded; see {}",
            summary.illegal_decisions,
            summary.jsonl_path.display()
        );
    }

    Ok(())
}
