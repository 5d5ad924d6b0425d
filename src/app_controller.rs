use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::fmt::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::document::{AnnotationDocument, STDOUT_SENTINEL};
use crate::errors::{AppError, LabelError};
use crate::file_utils::FileManager;
use crate::label_format::LabelFormat;

// @module: Application controller for label conversion

/// Per-run conversion settings coming from the command line
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Tiers to write; falls back to the configured tiers when empty
    pub tiers: Vec<usize>,

    /// Multiply every time before writing
    pub scale: Option<f64>,

    /// Add to every time before writing
    pub shift: Option<f64>,

    /// Replace existing output files
    pub force_overwrite: bool,
}

/// Main application controller for label conversion
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a label file using the configured format, or the detected one
    pub fn load(&self, input_file: &Path) -> Result<AnnotationDocument, AppError> {
        if !FileManager::file_exists(input_file) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", input_file)));
        }

        let format = match self.config.input_format {
            Some(format) => format,
            None => LabelFormat::detect(input_file)?.ok_or_else(|| {
                LabelError::UnsupportedFormat(format!("cannot detect the label format of {:?}", input_file))
            })?,
        };
        debug!("Reading {:?} as {}", input_file, format);

        Ok(AnnotationDocument::from_file(input_file, format, &self.config.reader)?)
    }

    /// Convert one file; `output` is a file path or the `STDOUT` sentinel.
    ///
    /// Returns `false` when the output already exists and overwriting is off.
    pub fn convert_file(&self, input_file: &Path, output: &Path, options: &ConvertOptions) -> Result<bool, AppError> {
        let to_stdout = output.as_os_str() == STDOUT_SENTINEL;
        if !to_stdout && output.exists() && !options.force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", output);
            return Ok(false);
        }

        let mut document = self.load(input_file)?;
        let tiers = self.selected_tiers(options);

        if let Some(factor) = options.scale {
            document.scale_by(factor, &tiers)?;
        }
        if let Some(amount) = options.shift {
            document.shift_by(amount, &tiers)?;
        }

        let format = self.config.output_format;
        if tiers.is_empty() && !format.is_multi_tier() && document.tier_count() > 1 {
            warn!(
                "{:?} has {} tiers but {} holds one; writing tier 1 only",
                input_file,
                document.tier_count(),
                format
            );
        }

        if !to_stdout {
            if let Some(parent) = output.parent() {
                FileManager::ensure_dir(parent)?;
            }
        }
        document.write_to_file(output, format, &tiers)?;

        if !to_stdout {
            info!("Converted {:?} -> {:?}", input_file, output);
        }
        Ok(true)
    }

    /// Convert every label file under `input_dir`, next to the inputs or into `output_dir`
    pub fn convert_folder(&self, input_dir: &Path, output_dir: Option<&Path>, options: &ConvertOptions) -> Result<usize, AppError> {
        if !FileManager::dir_exists(input_dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", input_dir)));
        }

        let files = FileManager::find_label_files(input_dir)?;
        if files.is_empty() {
            warn!("No label files found in {:?}", input_dir);
            return Ok(0);
        }
        info!("Converting {} label file(s) from {:?}", files.len(), input_dir);

        let progress_bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));

        let extension = self.config.output_extension();
        let mut converted = 0;
        let mut failed = 0;
        let mut produced: HashSet<PathBuf> = HashSet::new();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress_bar.set_message(file_name);

            let target_dir = match output_dir {
                Some(dir) => Self::mirror_dir(input_dir, file, dir),
                None => file.parent().unwrap_or(Path::new(".")).to_path_buf(),
            };
            let Some(output) = Self::folder_output_path(file, &target_dir, &extension, &files, &produced) else {
                progress_bar.suspend(|| warn!("Skipping {:?}, every output name collides with another label file", file));
                progress_bar.inc(1);
                continue;
            };

            match self.convert_file(file, &output, options) {
                Ok(true) => {
                    converted += 1;
                    produced.insert(output);
                }
                Ok(false) => {}
                Err(e) => {
                    failed += 1;
                    progress_bar.suspend(|| error!("Failed to convert {:?}: {}", file, e));
                }
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        info!("Finished: {} converted, {} failed, {} skipped", converted, failed, files.len() - converted - failed);
        Ok(converted)
    }

    /// Human-readable summary of the tiers in a label file
    pub fn describe(&self, input_file: &Path) -> Result<String, AppError> {
        let document = self.load(input_file)?;
        let mut out = String::new();

        let _ = writeln!(out, "{} ({}), {} tier(s)", input_file.display(), document.format, document.tier_count());
        for (key, value) in document.header() {
            let _ = writeln!(out, "  header {} = {}", key, value);
        }
        for (index, tier) in document.tiers() {
            let name = tier.name().unwrap_or("-");
            match tier.bounds() {
                Some((start, end)) => {
                    let labeled = tier.intervals().iter().filter(|i| !i.content.trim().is_empty()).count();
                    let _ = writeln!(
                        out,
                        "  Tier {} [{}]: {} interval(s), {} labeled, {} - {}",
                        index,
                        name,
                        tier.len(),
                        labeled,
                        start,
                        end
                    );
                }
                None => {
                    let _ = writeln!(out, "  Tier {} [{}]: empty", index, name);
                }
            }
        }
        Ok(out)
    }

    /// Output path for a file of a folder run that neither replaces another input
    /// nor an output written earlier in the same run
    fn folder_output_path(
        file: &Path,
        target_dir: &Path,
        extension: &str,
        inputs: &[PathBuf],
        produced: &HashSet<PathBuf>,
    ) -> Option<PathBuf> {
        let is_free = |path: &PathBuf| !inputs.contains(path) && !produced.contains(path);

        let output = FileManager::generate_output_path(file, target_dir, extension);
        if is_free(&output) {
            return Some(output);
        }
        let fallback = FileManager::converted_output_path(file, target_dir, extension);
        if is_free(&fallback) {
            debug!("{:?} is another input, writing {:?} instead", output, fallback);
            return Some(fallback);
        }
        None
    }

    fn selected_tiers(&self, options: &ConvertOptions) -> Vec<usize> {
        if options.tiers.is_empty() {
            self.config.output.tiers.clone()
        } else {
            options.tiers.clone()
        }
    }

    /// Place `file` under `output_dir` at the same relative position it has under `input_dir`
    fn mirror_dir(input_dir: &Path, file: &Path, output_dir: &Path) -> PathBuf {
        file.parent()
            .and_then(|parent| parent.strip_prefix(input_dir).ok())
            .map(|relative| output_dir.join(relative))
            .unwrap_or_else(|| output_dir.to_path_buf())
    }
}
