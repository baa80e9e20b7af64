use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::Level;
use tractor_bot::BotParams;
use tractor_core::model::rank::Rank;
use tractor_core::model::suit::Suit;

const DEFAULT_LATENCY_BUDGET_MS: u64 = 100;
const MAX_ROUNDS: usize = 10_000;
const RUN_ID_ALLOWED: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789._-";

/// Root audit configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AuditConfig {
    pub run_id: String,
    pub deals: DealConfig,
    #[serde(default)]
    pub trump: TrumpConfig,
    pub outputs: OutputsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub params: BotParams,
}

impl AuditConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: AuditConfig =
            serde_yaml::from_reader(reader).map_err(|source| ConfigError::Parse {
                source,
                path: path_buf.clone(),
            })?;
        cfg.validate().map_err(|source| ConfigError::Invalid {
            path: path_buf,
            source,
        })?;
        Ok(cfg)
    }

    /// Validate the configuration without performing I/O.
    pub fn validate(&mut self) -> Result<(), ValidationError> {
        validate_run_id(&self.run_id)?;
        self.deals.validate()?;
        self.outputs.validate(&self.run_id)?;
        self.metrics.validate()?;
        self.logging.normalize()?;
        Ok(())
    }

    /// Resolve `{run_id}` placeholders into concrete paths.
    pub fn resolved_outputs(&self) -> ResolvedOutputs {
        ResolvedOutputs {
            jsonl: resolve_template(&self.run_id, &self.outputs.jsonl),
            summary_md: resolve_template(&self.run_id, &self.outputs.summary_md),
        }
    }
}

/// Deal sampling block.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DealConfig {
    pub seed: Option<u64>,
    pub rounds: usize,
}

impl DealConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.rounds == 0 {
            return Err(ValidationError::InvalidField {
                field: "deals.rounds".to_string(),
                message: "number of rounds must be greater than zero".to_string(),
            });
        }

        if self.rounds > MAX_ROUNDS {
            return Err(ValidationError::InvalidField {
                field: "deals.rounds".to_string(),
                message: format!("at most {MAX_ROUNDS} rounds per run"),
            });
        }

        Ok(())
    }
}

/// Trump declaration used for every deal. Missing parts are drawn per deal.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct TrumpConfig {
    #[serde(default)]
    pub rank: Option<Rank>,
    #[serde(default)]
    pub suit: Option<Suit>,
    /// Play with no trump suit; only the trump rank and jokers are trump.
    #[serde(default)]
    pub no_suit: bool,
}

impl TrumpConfig {
    pub fn is_fixed(&self) -> bool {
        self.rank.is_some() && (self.suit.is_some() || self.no_suit)
    }
}

/// Output artifact configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OutputsConfig {
    pub jsonl: String,
    pub summary_md: String,
}

impl OutputsConfig {
    fn validate(&self, run_id: &str) -> Result<(), ValidationError> {
        for (label, value) in [
            ("outputs.jsonl", &self.jsonl),
            ("outputs.summary_md", &self.summary_md),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "path must not be empty".to_string(),
                });
            }

            let resolved = resolve_template(run_id, value);
            if resolved.components().count() == 0 {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: "resolved path is invalid".to_string(),
                });
            }
        }

        if self.jsonl == self.summary_md {
            return Err(ValidationError::InvalidField {
                field: "outputs.summary_md".to_string(),
                message: "summary must not overwrite the JSONL rows".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct MetricsConfig {
    #[serde(default = "default_latency_budget_ms")]
    pub latency_budget_ms: u64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            latency_budget_ms: DEFAULT_LATENCY_BUDGET_MS,
        }
    }
}

impl MetricsConfig {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.latency_budget_ms == 0 {
            return Err(ValidationError::InvalidField {
                field: "metrics.latency_budget_ms".to_string(),
                message: "latency budget must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}

fn default_latency_budget_ms() -> u64 {
    DEFAULT_LATENCY_BUDGET_MS
}

/// Logging configuration defaults to disabled structured logs.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default)]
    pub decision_details: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            decision_details: false,
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) -> Result<(), ValidationError> {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }
        Ok(())
    }

    pub fn level(&self) -> Option<Level> {
        match self.tracing_level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" | "warning" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn default_tracing_level() -> String {
    "info".to_string()
}

fn validate_run_id(run_id: &str) -> Result<(), ValidationError> {
    if run_id.trim().is_empty() {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id must not be empty".to_string(),
        });
    }

    if !run_id.chars().all(|c| RUN_ID_ALLOWED.contains(c)) {
        return Err(ValidationError::InvalidField {
            field: "run_id".to_string(),
            message: "run_id may only contain alphanumeric characters, '.', '_' or '-'".to_string(),
        });
    }

    Ok(())
}

fn resolve_template(run_id: &str, template: &str) -> PathBuf {
    PathBuf::from(template.replace("{run_id}", run_id))
}

/// Fully resolved output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedOutputs {
    pub jsonl: PathBuf,
    pub summary_md: PathBuf,
}

impl ResolvedOutputs {
    /// Directory that receives telemetry next to the summary.
    pub fn telemetry_dir(&self) -> PathBuf {
        self.summary_md
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Errors surfaced when loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        #[source]
        source: serde_yaml::Error,
        path: PathBuf,
    },
    #[error("invalid configuration in {path:?}: {source}")]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },
}

impl ConfigError {
    pub fn path(&self) -> &Path {
        match self {
            ConfigError::Read { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Invalid { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASIC_YAML: &str = r#"
run_id: "audit_smoke"
deals:
  seed: 123
  rounds: 4
trump:
  rank: Two
  suit: Spades
outputs:
  jsonl: "bench/out/{run_id}/decisions.jsonl"
  summary_md: "bench/out/{run_id}/summary.md"
logging:
  enable_structured: true
  tracing_level: "debug"
params:
  strong_combo_value: 160
"#;

    #[test]
    fn loads_and_validates_basic_config() {
        let mut cfg: AuditConfig = serde_yaml::from_str(BASIC_YAML).expect("parse yaml");
        cfg.validate().expect("validate");

        assert_eq!(cfg.metrics.latency_budget_ms, DEFAULT_LATENCY_BUDGET_MS);
        assert!(cfg.logging.enable_structured);
        assert!(!cfg.logging.decision_details);
        assert!(cfg.trump.is_fixed());
        assert_eq!(cfg.trump.rank, Some(Rank::Two));

        let outputs = cfg.resolved_outputs();
        assert_eq!(
            outputs.jsonl,
            PathBuf::from("bench/out/audit_smoke/decisions.jsonl")
        );
        assert_eq!(outputs.telemetry_dir(), PathBuf::from("bench/out/audit_smoke"));
    }

    #[test]
    fn params_override_only_named_fields() {
        let cfg: AuditConfig = serde_yaml::from_str(BASIC_YAML).expect("parse");
        let defaults = BotParams::default();
        assert_eq!(cfg.params.strong_combo_value, 160);
        assert_eq!(cfg.params.weak_combo_value, defaults.weak_combo_value);
        assert_eq!(cfg.params.face_trump_floor, defaults.face_trump_floor);
    }

    #[test]
    fn missing_trump_block_is_drawn_per_deal() {
        let yaml = BASIC_YAML.replace("trump:\n  rank: Two\n  suit: Spades\n", "");
        let mut cfg: AuditConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(cfg.trump, TrumpConfig::default());
        assert!(!cfg.trump.is_fixed());
    }

    #[test]
    fn rejects_zero_rounds() {
        let yaml = BASIC_YAML.replace("rounds: 4", "rounds: 0");
        let mut cfg: AuditConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("should fail");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "deals.rounds"
        ));
    }

    #[test]
    fn rejects_invalid_run_id() {
        let yaml = BASIC_YAML.replace("audit_smoke", "audit smoke");
        let mut cfg: AuditConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("invalid run id");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "run_id"
        ));
    }

    #[test]
    fn rejects_unknown_tracing_level() {
        let yaml = BASIC_YAML.replace("\"debug\"", "\"chatty\"");
        let mut cfg: AuditConfig = serde_yaml::from_str(&yaml).expect("parse");
        let err = cfg.validate().expect_err("unknown level");
        assert!(matches!(
            err,
            ValidationError::InvalidField { field, .. } if field == "logging.tracing_level"
        ));
    }

    #[test]
    fn outputs_resolve_template_multiple_occurrences() {
        let yaml = BASIC_YAML.replace(
            "bench/out/{run_id}/summary.md",
            "bench/out/{run_id}/{run_id}/summary.md",
        );
        let mut cfg: AuditConfig = serde_yaml::from_str(&yaml).expect("parse");
        cfg.validate().expect("valid");
        assert_eq!(
            cfg.resolved_outputs().summary_md,
            PathBuf::from("bench/out/audit_smoke/audit_smoke/summary.md")
        );
    }
}
