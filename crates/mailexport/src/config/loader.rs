use std::path::Path;

use regex::Regex;

use crate::config::schema::{ExportConfig, CONFIG_VERSION};
use crate::error::ConfigError;
use crate::export::ExportOptions;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ExportConfig, ConfigError> {
    let config = parse_config(path)?;

    validate_config(&config)?;

    Ok(config)
}

pub fn load_config_from_str(content: &str) -> Result<ExportConfig, ConfigError> {
    let config = parse_config_from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Reads and deserializes a config file without validating it. Callers that
/// override values afterwards must call [`validate_config`] themselves.
pub fn parse_config<P: AsRef<Path>>(path: P) -> Result<ExportConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_from_str(&content)
}

pub fn parse_config_from_str(content: &str) -> Result<ExportConfig, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

pub fn validate_config(config: &ExportConfig) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.source_directory.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "source_directory must not be empty".to_string(),
        });
    }

    if config.output_directory.trim().is_empty() {
        return Err(ConfigError::Validation {
            message: "output_directory must not be empty".to_string(),
        });
    }

    compile_patterns("store", &config.stores)?;
    compile_patterns("folder", &config.folders)?;

    Ok(())
}

/// Builds the exporter options described by a validated config.
pub fn export_options(config: &ExportConfig) -> Result<ExportOptions, ConfigError> {
    Ok(ExportOptions {
        store_patterns: compile_patterns("store", &config.stores)?,
        folder_patterns: compile_patterns("folder", &config.folders)?,
        recursive: config.recursive,
        report_directory_failures: config.report_directory_failures,
    })
}

fn compile_patterns(field: &'static str, patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
                field,
                pattern: pattern.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}
