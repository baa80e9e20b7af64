use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{Level, event};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LoggingConfig, ResolvedOutputs};

/// Read by the heuristic policy; full hands are attached to decision events
/// while it is set.
const DETAILS_ENV: &str = "TRACTOR_DECISION_DETAILS";
const TELEMETRY_FILE: &str = "telemetry.jsonl";

/// Open JSON event sink for one audit run. Queued events reach the file
/// when this is dropped.
pub struct LoggingGuard {
    _flush: WorkerGuard,
    pub telemetry_path: PathBuf,
}

/// Send bot decision events for `run_id` to `telemetry.jsonl` beside the
/// audit summary. Returns `None` when structured logging is off.
pub fn init_logging(
    logging: &LoggingConfig,
    outputs: &ResolvedOutputs,
    run_id: &str,
) -> Result<Option<LoggingGuard>> {
    if !logging.enable_structured {
        return Ok(None);
    }
    if logging.decision_details {
        enable_decision_details();
    }

    let (file, telemetry_path) = create_telemetry_file(&outputs.telemetry_dir())?;
    let (writer, flush) = NonBlockingBuilder::default().lossy(false).finish(file);

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(event_filter(logging))
        .json()
        .with_current_span(false)
        .with_writer(writer)
        .finish();

    // Keep an already installed collector; the run header only goes to ours.
    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        event!(
            target: "tractor_bench::run",
            Level::INFO,
            run_id,
            details = logging.decision_details,
        );
    }

    Ok(Some(LoggingGuard {
        _flush: flush,
        telemetry_path,
    }))
}

fn enable_decision_details() {
    // SAFETY: main calls this before the audit spawns the log writer thread.
    unsafe { std::env::set_var(DETAILS_ENV, "1") }
}

fn create_telemetry_file(dir: &Path) -> Result<(File, PathBuf)> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating telemetry directory {}", dir.display()))?;
    let path = dir.join(TELEMETRY_FILE);
    let file =
        File::create(&path).with_context(|| format!("creating telemetry log {}", path.display()))?;
    Ok((file, path))
}

/// `RUST_LOG` overrides the configured level. Unknown levels mean INFO.
fn event_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = logging.level().unwrap_or(Level::INFO);
        EnvFilter::new(level.as_str())
    })
}
