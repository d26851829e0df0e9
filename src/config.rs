//! Production configuration system
//!
//! Provides centralized configuration management with:
//! - Environment variable support
//! - Config file loading (optional)
//! - Runtime defaults
//! - Validation and type safety
//!
//! Only the command-line layer reads configuration. The analysis core takes
//! its limits as plain values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Input guards and scan limits
    pub limits: LimitsConfig,

    /// Output configuration
    pub output: OutputConfig,

    /// Paths configuration
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest export file accepted, in megabytes
    pub max_file_size_mb: u64,
    /// How many leading bytes are checked for NUL when sniffing for binary files
    pub sniff_bytes: usize,
    /// Deepest JSON nesting the href scanner will descend into
    pub max_scan_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub json_pretty: bool,
    /// File name prefix for saved results (`<prefix>_<token>.txt`)
    pub result_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub output_directory: PathBuf,
    pub log_directory: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "WARN".to_string(),
            format: "pretty".to_string(),
            output: "console".to_string(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 5,
            sniff_bytes: 200,
            max_scan_depth: crate::scanner::DEFAULT_MAX_DEPTH,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_pretty: true,
            result_prefix: "Result".to_string(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            log_directory: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("follow-audit")
                .join("logs"),
        }
    }
}

impl LimitsConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Config {
    /// Load configuration from environment, file, and defaults
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file if it exists
        let config_paths = [
            PathBuf::from("follow-audit.toml"),
            PathBuf::from(".follow-audit.toml"),
            dirs::config_dir()
                .map(|d| d.join("follow-audit").join("config.toml"))
                .unwrap_or_default(),
        ];

        for path in &config_paths {
            if path.is_file() {
                info!(config_file = %path.display(), "Loading configuration from file");
                config = Self::load_from_file(path)?;
                break;
            }
        }

        // Override with environment variables
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        // Logging overrides
        if let Ok(val) = env::var("LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("LOG_FORMAT") {
            self.logging.format = val;
        }
        if let Ok(val) = env::var("LOG_OUTPUT") {
            self.logging.output = val;
        }

        // Limit overrides
        if let Ok(val) = env::var("FOLLOW_AUDIT_MAX_FILE_SIZE_MB") {
            self.limits.max_file_size_mb = val
                .parse()
                .context("Invalid FOLLOW_AUDIT_MAX_FILE_SIZE_MB")?;
        }
        if let Ok(val) = env::var("FOLLOW_AUDIT_SNIFF_BYTES") {
            self.limits.sniff_bytes = val.parse().context("Invalid FOLLOW_AUDIT_SNIFF_BYTES")?;
        }
        if let Ok(val) = env::var("FOLLOW_AUDIT_MAX_SCAN_DEPTH") {
            self.limits.max_scan_depth = val
                .parse()
                .context("Invalid FOLLOW_AUDIT_MAX_SCAN_DEPTH")?;
        }

        // Output overrides
        if let Ok(val) = env::var("FOLLOW_AUDIT_JSON_PRETTY") {
            self.output.json_pretty = val.parse().context("Invalid FOLLOW_AUDIT_JSON_PRETTY")?;
        }

        // Path overrides
        if let Ok(val) = env::var("FOLLOW_AUDIT_OUTPUT_DIR") {
            self.paths.output_directory = PathBuf::from(val);
        }
        if let Ok(val) = env::var("FOLLOW_AUDIT_LOG_DIR") {
            self.paths.log_directory = PathBuf::from(val);
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("Maximum file size must be greater than 0MB"));
        }

        if self.limits.max_file_size_mb > 100 {
            warn!(
                max_file_size_mb = self.limits.max_file_size_mb,
                "File size limit is very high, large exports are held fully in memory"
            );
        }

        if self.limits.max_scan_depth == 0 || self.limits.max_scan_depth > 1024 {
            return Err(anyhow::anyhow!(
                "Scan depth must be between 1 and 1024, got {}",
                self.limits.max_scan_depth
            ));
        }

        if self.output.result_prefix.trim().is_empty()
            || self.output.result_prefix.contains(['/', '\\'])
        {
            return Err(anyhow::anyhow!(
                "Result prefix must be a non-empty file name, got {:?}",
                self.output.result_prefix
            ));
        }

        // Only file logging needs the log directory
        if self.logging.output != "console" && !self.paths.log_directory.exists() {
            fs::create_dir_all(&self.paths.log_directory)
                .context("Failed to create log directory")?;
        }

        Ok(())
    }

    /// Save current configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved to file");

        Ok(())
    }
}

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration instance
///
/// A configuration that fails to load is reported once on stderr and replaced
/// by the defaults, since logging is not yet initialized at that point.
pub fn get_config() -> &'static Config {
    CONFIG.get_or_init(|| {
        Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: ignoring invalid configuration: {:#}", e);
            Config::default()
        })
    })
}
