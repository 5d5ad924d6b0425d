/*!
 * Label file readers.
 *
 * Each format has its own grammar in a submodule; `read` dispatches on the
 * format tag. Readers produce contiguous tiers: when a format carries explicit
 * start times, a tier whose first interval starts after zero is primed with an
 * empty interval covering the leading gap.
 */

use log::warn;
use serde::{Deserialize, Serialize};

use crate::document::{AnnotationDocument, Interval, Tier, Timestamp};
use crate::errors::LabelError;
use crate::label_format::LabelFormat;

pub mod esps;
pub mod praat;
pub mod wavesurfer;

/// Reader options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReadOptions {
    /// Split ESPS content on the header's field separator into parallel tiers
    #[serde(default = "default_true")]
    pub parse_content: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self { parse_content: true }
    }
}

fn default_true() -> bool {
    true
}

/// Parse `content` as `format`
pub fn read(content: &str, format: LabelFormat, options: &ReadOptions) -> Result<AnnotationDocument, LabelError> {
    match format {
        LabelFormat::Praat => praat::read_auto(content),
        LabelFormat::PraatLong => praat::read_long(content),
        LabelFormat::PraatShort => praat::read_short(content),
        LabelFormat::Wavesurfer => wavesurfer::read(content),
        LabelFormat::Esps => esps::read(content, options),
    }
}

/// Lines with carriage returns removed, numbered from 1
pub(crate) fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .split('\n')
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
}

/// Split on runs of whitespace into at most `max` fields; the last field keeps
/// its inner whitespace.
pub(crate) fn split_fields(line: &str, max: usize) -> Vec<&str> {
    let mut fields = Vec::with_capacity(max);
    let mut rest = line.trim();
    while !rest.is_empty() {
        if fields.len() + 1 == max {
            fields.push(rest);
            break;
        }
        match rest.find(char::is_whitespace) {
            Some(at) => {
                fields.push(&rest[..at]);
                rest = rest[at..].trim_start();
            }
            None => {
                fields.push(rest);
                break;
            }
        }
    }
    fields
}

/// Parse a time field, reporting the format and line on failure
pub(crate) fn parse_time(text: &str, format: LabelFormat, line: usize) -> Result<Timestamp, LabelError> {
    text.parse::<Timestamp>()
        .map_err(|e| LabelError::parse(format, line, e.to_string()))
}

/// Accumulates one tier, priming it on the first interval
#[derive(Debug, Default)]
pub(crate) struct TierBuilder {
    tier: Tier,
    primed: bool,
}

impl TierBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.tier.set_name(name);
    }

    /// Append an interval; `start` is only consulted for the first one
    pub(crate) fn push(&mut self, start: Option<Timestamp>, end: Timestamp, content: String) {
        if !self.primed {
            self.primed = true;
            if let Some(start) = start {
                if start.value() > 0.0 {
                    self.tier.push(Interval::new(start, ""));
                } else if start.value() < 0.0 {
                    warn!("Tier starts before 0 ({}); the leading part cannot be represented", start);
                }
            }
        }
        self.tier.push(Interval::new(end, content));
    }

    pub(crate) fn finish(self) -> Tier {
        self.tier
    }
}
