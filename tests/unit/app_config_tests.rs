/*!
 * Tests for application configuration
 */

use anyhow::Result;
use phonlabel::app_config::{Config, LogLevel};
use phonlabel::LabelFormat;
use crate::common;

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.output_format, LabelFormat::PraatShort);
    assert!(config.input_format.is_none());
    assert!(config.reader.parse_content);
    assert_eq!(config.log_level, LogLevel::Info);

    // The written file loads back to the same settings
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.output_format, config.output_format);
    Ok(())
}

/// Test a partial config file relying on defaults
#[test]
fn test_loadOrCreate_withPartialJson_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "input_format": "esps", "output_format": "wavesurfer", "reader": { "parse_content": false } }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.input_format, Some(LabelFormat::Esps));
    assert_eq!(config.output_format, LabelFormat::Wavesurfer);
    assert!(!config.reader.parse_content);
    assert!(config.output.tiers.is_empty());
    assert_eq!(config.output_extension(), "lab");
    config.validate()?;
    Ok(())
}

/// Test that malformed JSON is reported
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test validation rules
#[test]
fn test_validate_withInconsistentSettings_shouldFail() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.output_format = LabelFormat::Praat;
    assert!(config.validate().is_err());

    config.output_format = LabelFormat::Esps;
    config.output.tiers = vec![1, 2];
    assert!(config.validate().is_err());

    config.output.tiers = vec![0];
    assert!(config.validate().is_err());

    config.output.tiers = vec![2];
    config.output.extension = Some(".".to_string());
    assert!(config.validate().is_err());
}

/// Test the output extension override
#[test]
fn test_outputExtension_withOverride_shouldStripDot() {
    let mut config = Config::default();
    assert_eq!(config.output_extension(), "TextGrid");

    config.output.extension = Some(".xlab".to_string());
    assert_eq!(config.output_extension(), "xlab");
}

/// Test log level mapping
#[test]
fn test_logLevel_shouldMapToFilter() {
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::default().to_level_filter(), log::LevelFilter::Info);
}
