use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::label_format::LabelFormat;
use crate::readers::ReadOptions;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Input format; detected per file when absent
    #[serde(default)]
    pub input_format: Option<LabelFormat>,

    /// Format written by conversions
    #[serde(default = "default_output_format")]
    pub output_format: LabelFormat,

    /// Reader options
    #[serde(default)]
    pub reader: ReadOptions,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Output file settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct OutputConfig {
    // @field: Extension for converted files, format default when absent
    #[serde(default)]
    pub extension: Option<String>,

    // @field: Tiers to write, empty meaning the format default
    #[serde(default)]
    pub tiers: Vec<usize>,
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_output_format() -> LabelFormat {
    LabelFormat::PraatShort
}

impl Config {
    /// Load the configuration file, writing a default one when it does not exist
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if !self.output_format.is_writable() {
            return Err(anyhow!(
                "Output format '{}' cannot be written; use praat_short, wavesurfer or esps",
                self.output_format
            ));
        }

        if self.output.tiers.contains(&0) {
            return Err(anyhow!("Tier indices start at 1"));
        }

        if !self.output_format.is_multi_tier() && self.output.tiers.len() > 1 {
            return Err(anyhow!(
                "Output format '{}' holds a single tier, {} configured",
                self.output_format,
                self.output.tiers.len()
            ));
        }

        if let Some(ext) = &self.output.extension {
            if ext.trim_start_matches('.').is_empty() {
                return Err(anyhow!("Output extension must not be empty"));
            }
        }

        Ok(())
    }

    /// Extension used for converted files
    pub fn output_extension(&self) -> String {
        self.output
            .extension
            .as_deref()
            .map(|e| e.trim_start_matches('.').to_string())
            .unwrap_or_else(|| self.output_format.default_extension().to_string())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_format: None,
            output_format: default_output_format(),
            reader: ReadOptions::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
