/*!
 * Praat TextGrid readers, long (`key = value`) and short (one value per line).
 *
 * Interval tiers and point tiers are read the same way: a point at time `t`
 * with mark `m` becomes an interval ending at `t` labeled `m`. File and tier
 * bounds are read past; item and record markers drive the parse.
 *
 * Both variants require the `ooTextFile` / `TextGrid` header, and a file whose
 * tiers are marked `<exists>` must hold as many tiers as it declares.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{TierBuilder, numbered_lines, parse_time};
use crate::document::{AnnotationDocument, Timestamp};
use crate::errors::LabelError;
use crate::label_format::LabelFormat;

// @const: Start of a tier in the long format, "item [3]:"
static ITEM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*item\s*\[\s*(\d+)\s*\]\s*:").expect("item pattern is valid"));

// @const: Start of an interval or point record, "intervals [12]:"
static RECORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(intervals|points)\s*\[\s*\d+\s*\]\s*:").expect("record pattern is valid")
});

// @const: Tier presence marker, "tiers? <exists>"
static TIERS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*tiers\?\s*<(exists|absent)>").expect("tiers pattern is valid"));

// @const: File-level tier count, "size = 2"
static SIZE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*size\s*=\s*(\S+)\s*$").expect("size pattern is valid"));

// @const: Attribute line, "xmin = 0.25"
static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(name|xmin|xmax|number|time|text|mark)\s*=\s*(.*?)\s*$").expect("attribute pattern is valid")
});

/// Read a TextGrid, choosing the variant from its first line
pub fn read_auto(content: &str) -> Result<AnnotationDocument, LabelError> {
    let first_line = content.lines().next().unwrap_or_default();
    if first_line.contains("short") {
        debug!("TextGrid header marks the short format");
        read_short(content)
    } else {
        read_long(content)
    }
}

/// Strip the surrounding quotes of a Praat string and undouble embedded quotes
pub(crate) fn unquote(value: &str) -> String {
    let value = value.trim();
    match value.strip_prefix('"') {
        Some(inner) => match inner.strip_suffix('"') {
            Some(body) => body.replace("\"\"", "\""),
            None => {
                warn!("Unterminated TextGrid string (multi-line text is not supported): {}", value);
                inner.replace("\"\"", "\"")
            }
        },
        None => value.to_string(),
    }
}

/// Fields of one interval or point record while it is being read
#[derive(Debug, Default)]
struct PendingRecord {
    line: usize,
    start: Option<Timestamp>,
    end: Option<Timestamp>,
    text: Option<String>,
}

/// Read the long TextGrid format
pub fn read_long(content: &str) -> Result<AnnotationDocument, LabelError> {
    const FORMAT: LabelFormat = LabelFormat::PraatLong;

    check_header(content, FORMAT)?;

    let mut tiers = Vec::new();
    let mut builder: Option<TierBuilder> = None;
    let mut record: Option<PendingRecord> = None;
    let mut tiers_absent = false;
    let mut declared: Option<usize> = None;
    let mut last_line = 1;

    fn flush(builder: &mut Option<TierBuilder>, record: &mut Option<PendingRecord>) -> Result<(), LabelError> {
        let Some(pending) = record.take() else {
            return Ok(());
        };
        let Some(tier) = builder.as_mut() else {
            return Ok(());
        };
        let end = pending
            .end
            .ok_or_else(|| LabelError::parse(FORMAT, pending.line, "record without an end time"))?;
        let text = pending
            .text
            .ok_or_else(|| LabelError::parse(FORMAT, pending.line, "record without text"))?;
        tier.push(pending.start, end, text);
        Ok(())
    }

    for (number, line) in numbered_lines(content) {
        last_line = number;

        // File-level markers come before the first item
        if builder.is_none() {
            if let Some(caps) = TIERS_REGEX.captures(line) {
                tiers_absent = &caps[1] == "absent";
                continue;
            }
            if let Some(caps) = SIZE_REGEX.captures(line) {
                let count = caps[1]
                    .parse()
                    .map_err(|_| LabelError::parse(FORMAT, number, format!("invalid tier count {}", &caps[1])))?;
                declared = Some(count);
                continue;
            }
        }

        if ITEM_REGEX.is_match(line) {
            flush(&mut builder, &mut record)?;
            if let Some(done) = builder.take() {
                tiers.push(done.finish());
            }
            builder = Some(TierBuilder::new());
            continue;
        }

        if RECORD_REGEX.is_match(line) {
            flush(&mut builder, &mut record)?;
            if builder.is_none() {
                return Err(LabelError::parse(FORMAT, number, "record outside of any tier"));
            }
            record = Some(PendingRecord {
                line: number,
                ..PendingRecord::default()
            });
            continue;
        }

        let Some(caps) = ATTRIBUTE_REGEX.captures(line) else {
            continue;
        };
        let key = &caps[1];
        let value = &caps[2];

        match (record.as_mut(), key) {
            // Attributes outside a record are file or tier metadata
            (None, "name") => {
                if let Some(tier) = builder.as_mut() {
                    tier.set_name(unquote(value));
                }
            }
            (None, _) => {}
            (Some(pending), "xmin") => pending.start = Some(parse_time(value, FORMAT, number)?),
            (Some(pending), "xmax" | "number" | "time") => pending.end = Some(parse_time(value, FORMAT, number)?),
            (Some(pending), "text" | "mark") => pending.text = Some(unquote(value)),
            (Some(_), _) => {}
        }
    }

    flush(&mut builder, &mut record)?;
    if let Some(done) = builder.take() {
        tiers.push(done.finish());
    }

    if !tiers_absent {
        let expected = declared.ok_or_else(|| LabelError::parse(FORMAT, last_line, "missing tier count 'size = N'"))?;
        if tiers.len() < expected || tiers.is_empty() {
            return Err(LabelError::parse(
                FORMAT,
                last_line,
                format!("expected {} tier(s), found {}", expected, tiers.len()),
            ));
        }
        if tiers.len() > expected {
            warn!("TextGrid declares {} tier(s) but holds {}; reading all of them", expected, tiers.len());
        }
    }

    Ok(AnnotationDocument::from_tiers(FORMAT, tiers))
}

/// Require the `ooTextFile` file type and `TextGrid` object class as the first two lines
fn check_header(content: &str, format: LabelFormat) -> Result<(), LabelError> {
    let mut lines = numbered_lines(content).filter(|(_, l)| !l.trim().is_empty());

    let (line, file_type) = lines
        .next()
        .ok_or_else(|| LabelError::parse(format, 1, "empty input"))?;
    if !file_type.contains("ooTextFile") {
        return Err(LabelError::parse(format, line, "not a Praat text file"));
    }

    match lines.next() {
        Some((_, class)) if class.contains("TextGrid") => Ok(()),
        Some((line, _)) => Err(LabelError::parse(format, line, "object class is not TextGrid")),
        None => Err(LabelError::parse(format, line, "missing object class")),
    }
}

/// Cursor over the non-empty lines of a short TextGrid
struct Tokens<'a> {
    lines: Vec<(usize, &'a str)>,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        let lines = numbered_lines(content)
            .map(|(n, l)| (n, l.trim()))
            .filter(|(_, l)| !l.is_empty())
            .collect();
        Self { lines, pos: 0 }
    }

    fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.pos).map(|(_, l)| *l)
    }

    fn line(&self) -> usize {
        self.lines
            .get(self.pos)
            .or_else(|| self.lines.last())
            .map_or(0, |(n, _)| *n)
    }

    fn take(&mut self, what: &str) -> Result<(usize, &'a str), LabelError> {
        let token = self
            .lines
            .get(self.pos)
            .copied()
            .ok_or_else(|| LabelError::parse(LabelFormat::PraatShort, self.line(), format!("missing {}", what)))?;
        self.pos += 1;
        Ok(token)
    }

    fn time(&mut self, what: &str) -> Result<Timestamp, LabelError> {
        let (line, text) = self.take(what)?;
        parse_time(text, LabelFormat::PraatShort, line)
    }

    fn count(&mut self, what: &str) -> Result<usize, LabelError> {
        let (line, text) = self.take(what)?;
        text.parse()
            .map_err(|_| LabelError::parse(LabelFormat::PraatShort, line, format!("invalid {}: {}", what, text)))
    }

    fn string(&mut self, what: &str) -> Result<String, LabelError> {
        self.take(what).map(|(_, text)| unquote(text))
    }
}

/// Read the short TextGrid format
pub fn read_short(content: &str) -> Result<AnnotationDocument, LabelError> {
    const FORMAT: LabelFormat = LabelFormat::PraatShort;

    let mut tokens = Tokens::new(content);

    // File type line, then the object class either as "Object class = ..." or bare
    let (line, file_type) = tokens.take("file type")?;
    if !file_type.contains("ooTextFile") {
        return Err(LabelError::parse(FORMAT, line, "not a Praat text file"));
    }
    if tokens.peek().is_some_and(|t| t.contains("TextGrid")) {
        tokens.take("object class")?;
    }

    tokens.time("file start")?;
    tokens.time("file end")?;
    let (line, exists) = tokens.take("tier marker")?;
    let tier_count = match exists {
        "<exists>" => tokens.count("tier count")?,
        "<absent>" => 0,
        other => return Err(LabelError::parse(FORMAT, line, format!("unexpected tier marker {}", other))),
    };

    let mut tiers = Vec::with_capacity(tier_count);
    for _ in 0..tier_count {
        let line = tokens.line();
        let class = tokens.string("tier class")?;
        let mut builder = TierBuilder::new();
        builder.set_name(tokens.string("tier name")?);
        tokens.time("tier start")?;
        tokens.time("tier end")?;
        let size = tokens.count("interval count")?;

        match class.as_str() {
            "IntervalTier" => {
                for _ in 0..size {
                    let start = tokens.time("interval start")?;
                    let end = tokens.time("interval end")?;
                    let text = tokens.string("interval text")?;
                    builder.push(Some(start), end, text);
                }
            }
            "TextTier" => {
                for _ in 0..size {
                    let time = tokens.time("point time")?;
                    let mark = tokens.string("point mark")?;
                    builder.push(None, time, mark);
                }
            }
            other => return Err(LabelError::parse(FORMAT, line, format!("unknown tier class {}", other))),
        }
        tiers.push(builder.finish());
    }

    Ok(AnnotationDocument::from_tiers(FORMAT, tiers))
}
