/*!
 * Cursor navigation and cursor-relative editing of a tier.
 *
 * The cursor is either unset or positioned on an interval. Stepping past either
 * end of the tier unsets it again, so a caller can loop with `next` until it
 * reports `false` and then start over.
 */

use log::debug;

use super::model::{Interval, Tier, Timestamp};
use crate::errors::LabelError;

impl Tier {
    /// Current cursor position, `None` when unset
    pub fn position(&self) -> Option<usize> {
        self.cursor
    }

    /// Unset the cursor
    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Advance to the next interval; returns `false` and unsets the cursor when there is none
    pub fn next(&mut self) -> bool {
        let candidate = match self.cursor {
            None => 0,
            Some(i) => i + 1,
        };
        if candidate < self.intervals.len() {
            self.cursor = Some(candidate);
            true
        } else {
            self.cursor = None;
            false
        }
    }

    /// Step back to the previous interval; returns `false` and unsets the cursor when there is none
    pub fn prev(&mut self) -> bool {
        match self.cursor {
            None if !self.intervals.is_empty() => {
                self.cursor = Some(self.intervals.len() - 1);
                true
            }
            Some(i) if i > 0 => {
                self.cursor = Some(i - 1);
                true
            }
            _ => {
                self.cursor = None;
                false
            }
        }
    }

    pub fn first(&mut self) -> bool {
        self.reset();
        self.next()
    }

    pub fn last(&mut self) -> bool {
        if self.intervals.is_empty() {
            self.cursor = None;
            return false;
        }
        self.cursor = Some(self.intervals.len() - 1);
        true
    }

    /// Interval under the cursor
    pub fn current(&self) -> Option<&Interval> {
        self.cursor.and_then(|i| self.intervals.get(i))
    }

    pub fn start(&self) -> Option<Timestamp> {
        self.cursor.map(|i| self.start_of(i))
    }

    pub fn end(&self) -> Option<&Timestamp> {
        self.current().map(|interval| &interval.end)
    }

    pub fn content(&self) -> Option<&str> {
        self.current().map(|interval| interval.content.as_str())
    }

    pub fn duration(&self) -> Option<f64> {
        let start = self.start()?;
        self.end().map(|end| end.value() - start.value())
    }

    /// Remove the interval under the cursor.
    ///
    /// The cursor steps back one place (or unsets when the first interval was
    /// removed), so the following `next` lands on the interval that came after
    /// the deleted one.
    pub fn delete(&mut self) -> Result<Interval, LabelError> {
        let index = self.cursor.ok_or(LabelError::CursorUnset)?;
        let removed = self.intervals.remove(index);
        self.cursor = index.checked_sub(1);
        debug!("Deleted interval {} ending at {}", index, removed.end);
        Ok(removed)
    }

    /// Position the cursor on the interval containing `t`.
    ///
    /// An interval matches when `start <= t < end`, so a time on a shared boundary
    /// selects the interval that begins there. When nothing matches the cursor is
    /// restored and `false` is returned.
    pub fn set_at_time(&mut self, t: f64) -> bool {
        let saved = self.cursor;
        self.reset();
        while self.next() {
            let (Some(start), Some(end)) = (self.start(), self.end()) else {
                break;
            };
            if start.value() <= t && t < end.value() {
                return true;
            }
        }
        self.cursor = saved;
        false
    }

    /// Move the start of the current interval, which is the end of the previous one
    pub fn set_start(&mut self, t: impl Into<Timestamp>) -> Result<(), LabelError> {
        let index = self.cursor.ok_or(LabelError::CursorUnset)?;
        let t = Into::<Timestamp>::into(t).require_finite("start")?;
        if index == 0 {
            if t.value() == 0.0 {
                return Ok(());
            }
            return Err(LabelError::InvalidOperation(
                "the first interval always starts at 0".to_string(),
            ));
        }
        let lower = self.start_of(index - 1);
        let upper = &self.intervals[index].end;
        if t < lower || t > *upper {
            return Err(LabelError::InvalidOperation(format!(
                "start {} outside [{}, {}]",
                t, lower, upper
            )));
        }
        self.intervals[index - 1].end = t;
        Ok(())
    }

    /// Move the end of the current interval, which is also the start of the next one
    pub fn set_end(&mut self, t: impl Into<Timestamp>) -> Result<(), LabelError> {
        let index = self.cursor.ok_or(LabelError::CursorUnset)?;
        let t = Into::<Timestamp>::into(t).require_finite("end")?;
        let lower = self.start_of(index);
        let upper = self.intervals.get(index + 1).map(|next| next.end.clone());
        let too_late = upper.as_ref().is_some_and(|u| t > *u);
        if t < lower || too_late {
            return Err(LabelError::InvalidOperation(format!(
                "end {} outside the neighbouring intervals",
                t
            )));
        }
        self.intervals[index].end = t;
        Ok(())
    }

    pub fn set_content(&mut self, content: impl Into<String>) -> Result<(), LabelError> {
        let index = self.cursor.ok_or(LabelError::CursorUnset)?;
        self.intervals[index].content = content.into();
        Ok(())
    }
}
