//! Runtime configuration loading from environment variables.
//!
//! All configuration values are loaded from `TICK_CORE_*` environment
//! variables with sensible defaults. Invalid values fall back to defaults
//! without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `TICK_CORE_SEGMENT_CAPACITY` | 2048 | Slots per queue segment (rounded up to a power of two) |
//! | `TICK_CORE_LOG` | info | Log filter directives |
//! | `TICK_CORE_LOG_FORMAT` | json | Log output format (`json` or `pretty`) |
//! | `TICK_CORE_LOG_PATH` | (stderr) | Log file path |

use std::path::PathBuf;

use serde::Serialize;

use crate::queue::DEFAULT_SEGMENT_CAPACITY;
use crate::telemetry::{LogConfig, LogFormat};

/// Floor and ceiling applied to the configured segment capacity.
const MIN_SEGMENT_CAPACITY: usize = 4;
const MAX_SEGMENT_CAPACITY: usize = 1 << 20;

/// All runtime configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub segment_capacity: usize,
    pub log: LogConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            segment_capacity: DEFAULT_SEGMENT_CAPACITY,
            log: LogConfig::default(),
        }
    }
}

/// Effective runtime configuration summary (serializable).
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub segment_capacity: usize,
    pub log_level: String,
    pub log_format: &'static str,
    pub log_path: Option<String>,
}

/// Parse a `usize` env var, returning `default` on missing or invalid.
fn parse_usize(key: &str, default: usize) -> usize {
    match std::env::var(key) {
        Ok(val) => val.parse::<usize>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Load the queue segment capacity from environment.
fn load_segment_capacity() -> usize {
    parse_usize("TICK_CORE_SEGMENT_CAPACITY", DEFAULT_SEGMENT_CAPACITY)
        .clamp(MIN_SEGMENT_CAPACITY, MAX_SEGMENT_CAPACITY)
        .next_power_of_two()
}

/// Load logging configuration from environment.
fn load_log_config() -> LogConfig {
    let level = std::env::var("TICK_CORE_LOG").unwrap_or_else(|_| "info".to_string());
    let format = match std::env::var("TICK_CORE_LOG_FORMAT").as_deref() {
        Ok("pretty") => LogFormat::Pretty,
        _ => LogFormat::Json,
    };
    let output_path = std::env::var("TICK_CORE_LOG_PATH").ok().map(PathBuf::from);
    LogConfig {
        format,
        level,
        output_path,
    }
}

/// Load all configuration from environment variables.
pub fn load() -> CoreConfig {
    CoreConfig {
        segment_capacity: load_segment_capacity(),
        log: load_log_config(),
    }
}

impl CoreConfig {
    /// Serializable summary of the effective values, for hosts that log
    /// or export their configuration at startup.
    pub fn effective(&self) -> EffectiveConfig {
        EffectiveConfig {
            segment_capacity: self.segment_capacity,
            log_level: self.log.level.clone(),
            log_format: match self.log.format {
                LogFormat::Json => "json",
                LogFormat::Pretty => "pretty",
            },
            log_path: self
                .log
                .output_path
                .as_ref()
                .map(|p| p.display().to_string()),
        }
    }
}
