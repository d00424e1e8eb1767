use hearts_bot::PolicyKind;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::Level;

const DEFAULT_TRICK_DELAY_MS: u64 = 1_000;
const DEFAULT_BOT_DELAY_MS: u64 = 1_000;
const MAX_DELAY_MS: u64 = 60_000;
const DEFAULT_LOG_FILE: &str = "hearts-table.jsonl";

/// Root table configuration loaded from YAML. Every block is optional.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TableConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    /// Let a policy play the human seat as well.
    #[serde(default)]
    pub autopilot: bool,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub bots: BotsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TableConfig {
    /// Load configuration from a YAML file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let path_buf = path.to_path_buf();
        let file = File::open(path).map_err(|source| ConfigError::Read {
            source,
            path: path_buf.clone(),
        })?;
        let reader = BufReader::new(file);
        let mut cfg: TableConfig =
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
        self.pacing.validate()?;
        self.logging.normalize();
        self.logging.validate()?;
        Ok(())
    }
}

/// Delays between a full trick and its collection, and before each automated move.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct PacingConfig {
    #[serde(default = "default_trick_delay_ms")]
    pub trick_delay_ms: u64,
    #[serde(default = "default_bot_delay_ms")]
    pub bot_delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            trick_delay_ms: DEFAULT_TRICK_DELAY_MS,
            bot_delay_ms: DEFAULT_BOT_DELAY_MS,
        }
    }
}

impl PacingConfig {
    pub const INSTANT: PacingConfig = PacingConfig {
        trick_delay_ms: 0,
        bot_delay_ms: 0,
    };

    pub fn trick_delay(&self) -> Duration {
        Duration::from_millis(self.trick_delay_ms)
    }

    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_ms)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        for (label, value) in [
            ("pacing.trick_delay_ms", self.trick_delay_ms),
            ("pacing.bot_delay_ms", self.bot_delay_ms),
        ] {
            if value > MAX_DELAY_MS {
                return Err(ValidationError::InvalidField {
                    field: label.to_string(),
                    message: format!("delay must not exceed {MAX_DELAY_MS} ms"),
                });
            }
        }
        Ok(())
    }
}

fn default_trick_delay_ms() -> u64 {
    DEFAULT_TRICK_DELAY_MS
}

fn default_bot_delay_ms() -> u64 {
    DEFAULT_BOT_DELAY_MS
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct BotsConfig {
    #[serde(default)]
    pub kind: BotKind,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BotKind {
    #[default]
    Random,
    FirstLegal,
}

impl From<BotKind> for PolicyKind {
    fn from(kind: BotKind) -> Self {
        match kind {
            BotKind::Random => PolicyKind::Random,
            BotKind::FirstLegal => PolicyKind::FirstLegal,
        }
    }
}

/// Plain logs go to stderr; structured logs go to `log_file` as JSON lines.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub enable_structured: bool,
    #[serde(default = "default_tracing_level")]
    pub tracing_level: String,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enable_structured: false,
            tracing_level: default_tracing_level(),
            log_file: default_log_file(),
        }
    }
}

impl LoggingConfig {
    fn normalize(&mut self) {
        if self.tracing_level.trim().is_empty() {
            self.tracing_level = default_tracing_level();
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        if self.level().is_none() {
            return Err(ValidationError::InvalidField {
                field: "logging.tracing_level".to_string(),
                message: format!("unknown level '{}'", self.tracing_level),
            });
        }

        if self.enable_structured && self.log_file.trim().is_empty() {
            return Err(ValidationError::InvalidField {
                field: "logging.log_file".to_string(),
                message: "path must not be empty when structured logging is enabled".to_string(),
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

// Plain logs share the terminal with the table, so keep them quiet by default.
fn default_tracing_level() -> String {
    "warn".to_string()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
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

/// Validation failures captured with contextual metadata.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },
}
