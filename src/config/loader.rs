//! Configuration loader for the delivery stream sink
//!
//! This module handles loading configuration from YAML files and environment variables.

use crate::config::SinkConfiguration;
use crate::error::SinkError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// YAML configuration structure (for deserialization)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigYaml {
    pub stream_name: Option<String>,
    pub retry: Option<RetryYaml>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryYaml {
    pub max_retries: Option<u32>,
    pub base_delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub jitter: Option<bool>,
}

/// Load configuration from YAML file
///
/// # Arguments
///
/// * `path` - Path to YAML configuration file
///
/// # Returns
///
/// Returns `SinkConfiguration` if successful, or `SinkError` if loading fails.
pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<SinkConfiguration, SinkError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        SinkError::Configuration(format!(
            "Failed to read config file {}: {}",
            path.as_ref().display(),
            e
        ))
    })?;

    let yaml: ConfigYaml = serde_yaml::from_str(&content)
        .map_err(|e| SinkError::Configuration(format!("Failed to parse YAML: {}", e)))?;

    let mut config = SinkConfiguration::new(yaml.stream_name.ok_or_else(|| {
        SinkError::Configuration("stream_name is required".to_string())
    })?);

    if let Some(retry) = yaml.retry {
        if let (Some(max), Some(base), Some(max_delay)) =
            (retry.max_retries, retry.base_delay_ms, retry.max_delay_ms)
        {
            config = config.with_retry_config(max, base, max_delay);
        }
        if let Some(jitter) = retry.jitter {
            config = config.with_jitter(jitter);
        }
    }

    config.validate()?;
    Ok(config)
}

/// Load configuration from environment variables
///
/// Reads configuration from environment variables with the following prefixes:
/// - `SINK_` for sink-specific settings
/// - `RETRY_` for retry settings
///
/// # Returns
///
/// Returns `SinkConfiguration` if successful, or `SinkError` if loading fails.
pub fn load_from_env() -> Result<SinkConfiguration, SinkError> {
    let stream_name = std::env::var("SINK_STREAM_NAME").map_err(|_| {
        SinkError::Configuration("SINK_STREAM_NAME environment variable is required".to_string())
    })?;

    let mut config = SinkConfiguration::new(stream_name);

    if let (Ok(max), Ok(base), Ok(max_delay)) = (
        std::env::var("RETRY_MAX_RETRIES"),
        std::env::var("RETRY_BASE_DELAY_MS"),
        std::env::var("RETRY_MAX_DELAY_MS"),
    ) {
        if let (Ok(max_u32), Ok(base_u64), Ok(max_delay_u64)) = (
            max.parse::<u32>(),
            base.parse::<u64>(),
            max_delay.parse::<u64>(),
        ) {
            config = config.with_retry_config(max_u32, base_u64, max_delay_u64);
        }
    }

    if let Ok(jitter) = std::env::var("RETRY_JITTER") {
        config = config.with_jitter(jitter == "true");
    }

    config.validate()?;
    Ok(config)
}
