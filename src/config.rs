use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::Deserialize;
use serde_json::Value;

use crate::access::gate::DEFAULT_COUNTDOWN_SECS;

/// Looked up next to the config file when it does not declare `$schema`.
pub const SCHEMA_FILE_NAME: &str = concat!(env!("CARGO_PKG_NAME"), ".schema.json");
/// Rolled files are named `<prefix>.<date>`; retention only ever touches these.
pub const LOG_FILE_PREFIX: &str = concat!(env!("CARGO_PKG_NAME"), ".log");

const DEFAULT_FEED_DOCUMENT: &str = "matches.json";
const DEFAULT_RETENTION_DAYS: u32 = 14;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feed: FeedConfig,
    #[serde(default)]
    pub gate: GateConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    pub base_url: String,
    #[serde(default = "FeedConfig::default_document")]
    pub document: String,
    /// No timeout when unset; a stalled upstream stalls the fetch.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl FeedConfig {
    fn default_document() -> String {
        DEFAULT_FEED_DOCUMENT.to_string()
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub countdown_secs: u32,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Daily,
    Hourly,
    Never,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
    pub rotation: LogRotation,
    pub retention_days: u32,
}

impl LoggingConfig {
    pub fn retention(&self) -> Duration {
        Duration::from_secs(u64::from(self.retention_days) * 24 * 60 * 60)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./logs"),
            rotation: LogRotation::default(),
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

impl Config {
    /// Reads a JSON5 config, checks it against its schema, then decodes it.
    /// Paths inside the config are relative to the config file's directory.
    pub fn load(config_path: &Path) -> Result<Self> {
        let base = config_path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let text = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;
        let raw: Value = json5::from_str(&text)
            .with_context(|| format!("failed to parse {}", config_path.display()))?;

        check_schema(&raw, &schema_location(base, &raw))?;

        let mut config: Config = serde_json::from_value(raw)
            .with_context(|| format!("unexpected config shape in {}", config_path.display()))?;
        // `join` keeps absolute paths as they are.
        config.logging.dir = base.join(&config.logging.dir);
        Ok(config)
    }
}

fn schema_location(base: &Path, raw: &Value) -> PathBuf {
    let declared = raw
        .get("$schema")
        .and_then(Value::as_str)
        .unwrap_or(SCHEMA_FILE_NAME);
    base.join(declared)
}

fn check_schema(raw: &Value, schema_path: &Path) -> Result<()> {
    let schema_text = fs::read_to_string(schema_path)
        .with_context(|| format!("failed to read schema {}", schema_path.display()))?;
    let schema: Value = serde_json::from_str(&schema_text)
        .with_context(|| format!("schema {} is not JSON", schema_path.display()))?;
    let validator = JSONSchema::compile(&schema)
        .map_err(|err| anyhow!("schema {} does not compile: {err}", schema_path.display()))?;

    if let Err(errors) = validator.validate(raw) {
        let problems: Vec<String> = errors
            .map(|err| format!("{err} (at '{}')", err.instance_path))
            .collect();
        bail!("config validation failed: {}", problems.join("; "));
    }
    Ok(())
}
