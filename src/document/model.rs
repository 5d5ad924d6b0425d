/*!
 * Core types of the annotation model: timestamps, intervals and tiers.
 *
 * A tier stores only interval end times. The start of an interval is the end of
 * the one before it, and the first interval starts at zero, so a tier is always
 * a contiguous partition of `[0, last end]`.
 */

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::errors::LabelError;

/// A timestamp that could not be parsed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid timestamp '{0}'")]
pub struct TimestampError(pub String);

/// A time value in the source file's native units.
///
/// Values parsed from text remember their spelling so that untouched values are
/// written back exactly as they were read. Arithmetic drops the spelling.
#[derive(Debug, Clone)]
pub struct Timestamp {
    value: f64,
    text: Option<String>,
}

impl Timestamp {
    /// The implicit start of every tier
    pub const ZERO: Timestamp = Timestamp {
        value: 0.0,
        text: None,
    };

    pub fn new(value: f64) -> Self {
        Self { value, text: None }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Source spelling, if the value was parsed and has not been modified since
    pub fn source_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.value * factor)
    }

    pub fn shifted(&self, amount: f64) -> Self {
        Self::new(self.value + amount)
    }

    /// Reject NaN and infinities before they reach a tier
    pub(crate) fn require_finite(self, what: &str) -> Result<Self, LabelError> {
        if self.value.is_finite() {
            Ok(self)
        } else {
            Err(LabelError::InvalidOperation(format!("{} {} is not finite", what, self.value)))
        }
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<f64> for Timestamp {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl FromStr for Timestamp {
    type Err = TimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: f64 = trimmed
            .parse()
            .map_err(|_| TimestampError(trimmed.to_string()))?;
        if !value.is_finite() {
            return Err(TimestampError(trimmed.to_string()));
        }
        Ok(Self {
            value,
            text: Some(trimmed.to_string()),
        })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => f.write_str(text),
            None => write!(f, "{}", self.value),
        }
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<f64> for Timestamp {
    fn eq(&self, other: &f64) -> bool {
        self.value == *other
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.value.partial_cmp(&other.value)
    }
}

/// One labeled interval; its start is the previous interval's end
#[derive(Debug, Clone, PartialEq)]
pub struct Interval {
    /// End time
    pub end: Timestamp,

    /// Annotation text
    pub content: String,
}

impl Interval {
    pub fn new(end: impl Into<Timestamp>, content: impl Into<String>) -> Self {
        Self {
            end: end.into(),
            content: content.into(),
        }
    }
}

/// Borrowed view of an interval with its derived start time
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalView<'a> {
    /// Position within the tier
    pub index: usize,
    /// Derived start time
    pub start: Timestamp,
    /// End time
    pub end: &'a Timestamp,
    /// Annotation text
    pub content: &'a str,
}

impl IntervalView<'_> {
    pub fn duration(&self) -> f64 {
        self.end.value() - self.start.value()
    }
}

/// A single annotation channel with its own iteration cursor
#[derive(Debug, Clone, Default)]
pub struct Tier {
    pub(crate) name: Option<String>,
    pub(crate) intervals: Vec<Interval>,
    pub(crate) cursor: Option<usize>,
}

impl Tier {
    /// Create an empty, unnamed tier
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tier from intervals already in chronological order
    pub fn from_intervals(intervals: Vec<Interval>) -> Self {
        Self {
            name: None,
            intervals,
            cursor: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name given to the tier by its source file, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Derived start of the interval at `index`
    pub fn start_of(&self, index: usize) -> Timestamp {
        match index {
            0 => Timestamp::ZERO,
            i => self
                .intervals
                .get(i - 1)
                .map(|prev| prev.end.clone())
                .unwrap_or_default(),
        }
    }

    /// Start and end of the whole tier, `None` when it holds no intervals
    pub fn bounds(&self) -> Option<(Timestamp, Timestamp)> {
        self.intervals
            .last()
            .map(|last| (Timestamp::ZERO, last.end.clone()))
    }

    /// Walk every interval with its derived start, leaving the cursor alone
    pub fn iter(&self) -> impl Iterator<Item = IntervalView<'_>> + '_ {
        self.intervals.iter().enumerate().map(move |(index, interval)| IntervalView {
            index,
            start: self.start_of(index),
            end: &interval.end,
            content: &interval.content,
        })
    }

    pub(crate) fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    /// Insert a boundary at `end`, labeling the part before it with `content`.
    ///
    /// The interval that contained `end` is split: the new interval covers its first
    /// part and the old one keeps the remainder. A boundary past the last interval
    /// extends the tier. The cursor is left on the new interval, whose index is
    /// returned.
    pub fn insert(&mut self, end: impl Into<Timestamp>, content: impl Into<String>) -> Result<usize, LabelError> {
        let end = Into::<Timestamp>::into(end).require_finite("boundary")?;
        if end.value() < 0.0 {
            return Err(LabelError::InvalidOperation(format!(
                "cannot insert a boundary before the tier start: {}",
                end
            )));
        }
        if self.intervals.iter().any(|i| i.end == end) {
            return Err(LabelError::InvalidOperation(format!(
                "a boundary already exists at {}",
                end
            )));
        }

        let index = self
            .intervals
            .iter()
            .position(|i| i.end > end)
            .unwrap_or(self.intervals.len());
        self.intervals.insert(index, Interval::new(end, content));
        self.cursor = Some(index);
        Ok(index)
    }

    /// Rewrite every end time, keeping order and cursor
    pub(crate) fn map_times<F>(&mut self, f: F)
    where
        F: Fn(&Timestamp) -> Timestamp,
    {
        for interval in &mut self.intervals {
            interval.end = f(&interval.end);
        }
    }
}
