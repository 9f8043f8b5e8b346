//! Structured logging via the `tracing` crate.
//!
//! The crate is a library; log routing beyond stdout/stderr belongs to the
//! host process. `KINDCACHE_LOG` overrides the configured filter the same
//! way `RUST_LOG` would.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Initialize the logging system
///
/// `KINDCACHE_LOG` takes precedence over the configured level and module
/// directives.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    if !config.enabled {
        Registry::default().with(EnvFilter::new("off")).init();
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let to_stdout = match config.output.as_str() {
        "stdout" => true,
        "stderr" => false,
        other => {
            return Err(ConfigError::Invalid(format!(
                "invalid log output: {} (must be 'stdout' or 'stderr')",
                other
            )))
        }
    };

    let base = Registry::default().with(filter);
    match config.format.as_str() {
        "json" => {
            let layer = fmt::layer()
                .json()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339());
            if to_stdout {
                base.with(layer.with_writer(std::io::stdout)).init();
            } else {
                base.with(layer.with_writer(std::io::stderr)).init();
            }
        }
        "text" => {
            let layer = fmt::layer()
                .with_target(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(config.color);
            if to_stdout {
                base.with(layer.with_writer(std::io::stdout)).init();
            } else {
                base.with(layer.with_writer(std::io::stderr)).init();
            }
        }
        other => {
            return Err(ConfigError::Invalid(format!(
                "invalid log format: {} (must be 'json' or 'text')",
                other
            )))
        }
    }

    Ok(())
}

/// Build environment filter from config or the KINDCACHE_LOG variable
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ConfigError> {
    if let Ok(filter) = EnvFilter::try_from_env("KINDCACHE_LOG") {
        return Ok(filter);
    }

    let mut filter = EnvFilter::new(&config.level);
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}
