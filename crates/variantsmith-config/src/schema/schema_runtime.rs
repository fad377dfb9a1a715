//! Gateway, harness, page, cache and logging configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Provider gateway limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Requests above this many serialized bytes are rejected before sending.
    #[serde(default = "default_max_request_bytes")]
    pub max_request_bytes: usize,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            max_request_bytes: default_max_request_bytes(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_max_request_bytes() -> usize {
    4_500_000
}

fn default_request_timeout() -> u64 {
    120
}

/// In-page test execution policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,

    #[serde(default = "default_max_timeout_ms")]
    pub max_timeout_ms: u64,

    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            default_timeout_ms: default_timeout_ms(),
            max_timeout_ms: default_max_timeout_ms(),
            max_retries: default_max_retries(),
            backoff_multiplier: default_backoff_multiplier(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_timeout_ms() -> u64 {
    20_000
}

fn default_max_retries() -> u32 {
    2
}

fn default_backoff_multiplier() -> f64 {
    1.5
}

fn default_settle_delay_ms() -> u64 {
    500
}

/// Page interaction ceiling (capture, screenshot, script injection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_operation_timeout_ms")]
    pub operation_timeout_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            operation_timeout_ms: default_operation_timeout_ms(),
        }
    }
}

fn default_operation_timeout_ms() -> u64 {
    15_000
}

/// Element database cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_seconds: default_cache_ttl(),
        }
    }
}

fn default_cache_capacity() -> usize {
    8
}

fn default_cache_ttl() -> u64 {
    300
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily-rolling log files. Console only when unset.
    pub file_dir: Option<PathBuf>,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_dir: None,
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
