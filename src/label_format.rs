use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::LabelError;

// @module: Supported label file formats

// @const: Wavesurfer record line, "start end [content]"
static WAVESURFER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?\s+[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?(\s|$)")
        .expect("wavesurfer line pattern is valid")
});

/// Label file formats understood by the readers and writers
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    // @format: Praat TextGrid, long or short variant chosen from the first line
    Praat,
    // @format: Praat TextGrid, long (key = value) variant
    PraatLong,
    // @format: Praat TextGrid, short (one value per line) variant
    PraatShort,
    // @format: Wavesurfer "start end label" lines
    Wavesurfer,
    // @format: ESPS/Xwaves xlabel file
    Esps,
}

impl LabelFormat {
    /// Every format tag, in the order used for help output
    pub const ALL: [LabelFormat; 5] = [
        LabelFormat::Praat,
        LabelFormat::PraatLong,
        LabelFormat::PraatShort,
        LabelFormat::Wavesurfer,
        LabelFormat::Esps,
    ];

    // @returns: Tag as accepted by FromStr
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Praat => "praat",
            Self::PraatLong => "praat_long",
            Self::PraatShort => "praat_short",
            Self::Wavesurfer => "wavesurfer",
            Self::Esps => "esps",
        }
    }

    /// Whether a writer exists for this format
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::PraatShort | Self::Wavesurfer | Self::Esps)
    }

    /// Whether the format stores more than one tier per file
    pub fn is_multi_tier(&self) -> bool {
        matches!(self, Self::Praat | Self::PraatLong | Self::PraatShort)
    }

    /// File extension used when writing this format
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Praat | Self::PraatLong | Self::PraatShort => "TextGrid",
            Self::Wavesurfer => "lab",
            Self::Esps => "esps",
        }
    }

    /// Infer the format of an existing label file.
    ///
    /// The content is examined first; the extension is only a fallback for files
    /// whose content is inconclusive (empty files, for instance).
    pub fn detect<P: AsRef<Path>>(path: P) -> Result<Option<Self>, LabelError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| LabelError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(format) = Self::detect_from_content(&content) {
            debug!("Detected {} content in {:?}", format, path);
            return Ok(Some(format));
        }

        let by_extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .and_then(|ext| match ext.as_str() {
                "textgrid" => Some(Self::Praat),
                "esps" | "xlab" | "xlabel" => Some(Self::Esps),
                "lab" | "wavesurfer" => Some(Self::Wavesurfer),
                _ => None,
            });

        Ok(by_extension)
    }

    /// Infer the format from file content alone
    pub fn detect_from_content(content: &str) -> Option<Self> {
        let first = content.lines().map(|l| l.trim()).find(|l| !l.is_empty())?;

        if first.contains("ooTextFile") || first.contains("TextGrid") {
            return Some(Self::Praat);
        }

        if content.lines().any(|l| l.trim_end_matches('\r').starts_with('#')) {
            return Some(Self::Esps);
        }

        if WAVESURFER_LINE.is_match(first) {
            return Some(Self::Wavesurfer);
        }

        None
    }
}

impl fmt::Display for LabelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LabelFormat {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "praat" | "textgrid" => Ok(Self::Praat),
            "praat_long" => Ok(Self::PraatLong),
            "praat_short" => Ok(Self::PraatShort),
            "wavesurfer" => Ok(Self::Wavesurfer),
            "esps" | "xwaves" => Ok(Self::Esps),
            _ => Err(LabelError::UnsupportedFormat(s.to_string())),
        }
    }
}
