/*!
 * The annotation document: a parsed label file held entirely in memory.
 */

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::model::{Interval, Tier};
use crate::errors::LabelError;
use crate::label_format::LabelFormat;
use crate::readers::{self, ReadOptions};
use crate::writers;

/// Path sentinel that sends written output to standard output
pub const STDOUT_SENTINEL: &str = "STDOUT";

/// A label file parsed into numbered tiers.
///
/// Tier indices start at 1 and follow the order of the source file.
#[derive(Debug, Clone)]
pub struct AnnotationDocument {
    /// Format the document was read from
    pub format: LabelFormat,

    /// Source file, when read from disk
    pub source_file: Option<PathBuf>,

    pub(crate) tiers: BTreeMap<usize, Tier>,

    pub(crate) header: BTreeMap<String, String>,
}

impl AnnotationDocument {
    /// Build a document from tiers in order; they are numbered from 1
    pub fn from_tiers(format: LabelFormat, tiers: Vec<Tier>) -> Self {
        Self {
            format,
            source_file: None,
            tiers: tiers.into_iter().enumerate().map(|(i, t)| (i + 1, t)).collect(),
            header: BTreeMap::new(),
        }
    }

    /// Read and parse a label file; the file is closed before this returns
    pub fn from_file<P: AsRef<Path>>(path: P, format: LabelFormat, options: &ReadOptions) -> Result<Self, LabelError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LabelError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut document = Self::from_reader(file, format, options).map_err(|e| match e {
            LabelError::Unreadable { source, .. } => LabelError::Unreadable {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        document.source_file = Some(path.to_path_buf());
        info!("Loaded {} tier(s) from {:?}", document.tier_count(), path);
        Ok(document)
    }

    /// Parse a label stream of the given format
    pub fn from_reader<R: Read>(mut reader: R, format: LabelFormat, options: &ReadOptions) -> Result<Self, LabelError> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .map_err(|source| LabelError::Unreadable {
                path: PathBuf::from("<stream>"),
                source,
            })?;
        Self::parse_str(&content, format, options)
    }

    /// Parse label text of the given format
    pub fn parse_str(content: &str, format: LabelFormat, options: &ReadOptions) -> Result<Self, LabelError> {
        let document = readers::read(content, format, options)?;
        debug!(
            "Parsed {} as {} tier(s) with {} interval(s)",
            format,
            document.tier_count(),
            document.tiers.values().map(Tier::len).sum::<usize>()
        );
        Ok(document)
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Tier indices in ascending order
    pub fn tier_indices(&self) -> Vec<usize> {
        self.tiers.keys().copied().collect()
    }

    pub fn tier(&self, index: usize) -> Option<&Tier> {
        self.tiers.get(&index)
    }

    pub fn tier_mut(&mut self, index: usize) -> Option<&mut Tier> {
        self.tiers.get_mut(&index)
    }

    /// Iterate over `(index, tier)` pairs in index order
    pub fn tiers(&self) -> impl Iterator<Item = (usize, &Tier)> {
        self.tiers.iter().map(|(i, t)| (*i, t))
    }

    /// Index of the first tier carrying the given name
    pub fn tier_by_name(&self, name: &str) -> Option<usize> {
        self.tiers
            .iter()
            .find(|(_, tier)| tier.name() == Some(name))
            .map(|(i, _)| *i)
    }

    /// Header key/value pairs (ESPS input only)
    pub fn header(&self) -> &BTreeMap<String, String> {
        &self.header
    }

    /// Append a tier after the highest existing index and return its index
    pub fn add_tier(&mut self, tier: Tier) -> usize {
        let index = self.tiers.keys().next_back().map_or(1, |last| last + 1);
        self.tiers.insert(index, tier);
        index
    }

    /// Remove the interval under the cursor of a tier
    pub fn delete(&mut self, tier: usize) -> Result<Interval, LabelError> {
        self.tiers
            .get_mut(&tier)
            .ok_or(LabelError::NoSuchTier(tier))?
            .delete()
    }

    /// Multiply every time in the selected tiers (all tiers when none selected)
    pub fn scale_by(&mut self, factor: f64, tiers: &[usize]) -> Result<(), LabelError> {
        if !factor.is_finite() {
            return Err(LabelError::InvalidOperation(format!("scale factor {} is not finite", factor)));
        }
        if factor <= 0.0 {
            return Err(LabelError::InvalidOperation(format!(
                "scale factor {} would reverse or collapse the tier",
                factor
            )));
        }
        for index in self.resolve_tiers(tiers)? {
            if let Some(tier) = self.tiers.get_mut(&index) {
                tier.map_times(|t| t.scaled(factor));
            }
        }
        debug!("Scaled by {}", factor);
        Ok(())
    }

    /// Add an offset to every time in the selected tiers (all tiers when none selected)
    pub fn shift_by(&mut self, amount: f64, tiers: &[usize]) -> Result<(), LabelError> {
        if !amount.is_finite() {
            return Err(LabelError::InvalidOperation(format!("shift amount {} is not finite", amount)));
        }
        for index in self.resolve_tiers(tiers)? {
            if let Some(tier) = self.tiers.get_mut(&index) {
                tier.map_times(|t| t.shifted(amount));
            }
        }
        debug!("Shifted by {}", amount);
        Ok(())
    }

    /// Serialize the selected tiers.
    ///
    /// An empty selection means tier 1 for single-tier formats and every tier for
    /// Praat output.
    pub fn stringify_as(&self, format: LabelFormat, tiers: &[usize]) -> Result<String, LabelError> {
        let selected = if tiers.is_empty() && !format.is_multi_tier() {
            vec![self.tiers.keys().next().copied().ok_or(LabelError::NoSuchTier(1))?]
        } else {
            self.resolve_tiers(tiers)?
        };
        let selected: Vec<&Tier> = selected.iter().filter_map(|i| self.tiers.get(i)).collect();
        writers::write(format, &selected)
    }

    /// Serialize and write to `path`, or to standard output for the `STDOUT` sentinel
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P, format: LabelFormat, tiers: &[usize]) -> Result<(), LabelError> {
        let path = path.as_ref();
        let text = self.stringify_as(format, tiers)?;
        let to_io_error = |source: io::Error| LabelError::Write {
            path: path.to_path_buf(),
            source,
        };

        if path.as_os_str() == STDOUT_SENTINEL {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes()).map_err(to_io_error)?;
            stdout.flush().map_err(to_io_error)?;
            return Ok(());
        }

        let mut file = File::create(path).map_err(to_io_error)?;
        file.write_all(text.as_bytes()).map_err(to_io_error)?;
        debug!("Wrote {} output to {:?}", format, path);
        Ok(())
    }

    /// Expand an empty selection to every tier and check that named tiers exist
    fn resolve_tiers(&self, tiers: &[usize]) -> Result<Vec<usize>, LabelError> {
        if tiers.is_empty() {
            return Ok(self.tier_indices());
        }
        match tiers.iter().find(|i| !self.tiers.contains_key(i)) {
            Some(missing) => Err(LabelError::NoSuchTier(*missing)),
            None => Ok(tiers.to_vec()),
        }
    }
}
