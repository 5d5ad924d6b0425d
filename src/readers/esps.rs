/*!
 * ESPS/Xwaves label reader.
 *
 * The header runs up to the first line starting with `#`; each header line is a
 * `key value` pair and a repeated key keeps its last value. Body records are
 * `end color label`, sorted by end time after reading since producers do not
 * always emit them in order.
 *
 * When the header declares a `separator` and content parsing is enabled, each
 * label is split into fields and field k goes to tier k. Records with fewer
 * fields than the widest record get empty labels in the missing tiers.
 */

use std::collections::BTreeMap;

use log::{debug, warn};

use super::{ReadOptions, numbered_lines, parse_time, split_fields};
use crate::document::{AnnotationDocument, Interval, Tier, Timestamp};
use crate::errors::LabelError;
use crate::label_format::LabelFormat;

/// Header key naming the field separator
pub const SEPARATOR_KEY: &str = "separator";

/// Header key naming the declared field count
pub const NFIELDS_KEY: &str = "nfields";

/// Parse the header lines into key/value pairs
pub fn parse_header<'a, I>(lines: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut header = BTreeMap::new();
    for line in lines {
        let fields = split_fields(line, 2);
        if let Some(key) = fields.first() {
            let value = fields.get(1).copied().unwrap_or_default();
            header.insert(key.to_string(), value.to_string());
        }
    }
    header
}

pub fn read(content: &str, options: &ReadOptions) -> Result<AnnotationDocument, LabelError> {
    const FORMAT: LabelFormat = LabelFormat::Esps;

    let lines: Vec<(usize, &str)> = numbered_lines(content).collect();
    let separator_at = lines
        .iter()
        .position(|(_, line)| line.starts_with('#'))
        .ok_or(LabelError::MissingHeaderSeparator)?;

    let header = parse_header(lines[..separator_at].iter().map(|(_, line)| *line));

    let mut records: Vec<(Timestamp, String)> = Vec::new();
    for (number, line) in &lines[separator_at + 1..] {
        let fields = split_fields(line, 3);
        match fields.as_slice() {
            [] => continue,
            [end, rest @ ..] => {
                let end = parse_time(end, FORMAT, *number)?;
                // rest[0] is the color, which is not kept
                let label = rest.get(1).copied().unwrap_or_default().to_string();
                records.push((end, label));
            }
        }
    }

    records.sort_by(|a, b| a.0.value().total_cmp(&b.0.value()));

    let separator = header
        .get(SEPARATOR_KEY)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty() && options.parse_content);

    let tiers = match separator {
        Some(separator) => split_into_tiers(records, separator, &header),
        None => vec![Tier::from_intervals(
            records
                .into_iter()
                .map(|(end, label)| Interval::new(end, label))
                .collect(),
        )],
    };

    let mut document = AnnotationDocument::from_tiers(FORMAT, tiers);
    document.header = header;
    Ok(document)
}

fn split_into_tiers(records: Vec<(Timestamp, String)>, separator: &str, header: &BTreeMap<String, String>) -> Vec<Tier> {
    let split: Vec<(Timestamp, Vec<String>)> = records
        .into_iter()
        .map(|(end, label)| {
            let fields = label.split(separator).map(|f| f.trim().to_string()).collect();
            (end, fields)
        })
        .collect();

    let widest = split.iter().map(|(_, fields)| fields.len()).max().unwrap_or(1);
    let declared = header
        .get(NFIELDS_KEY)
        .and_then(|n| n.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let tier_count = widest.max(declared).max(1);

    let uneven = split.iter().filter(|(_, fields)| fields.len() != tier_count).count();
    if uneven > 0 {
        warn!(
            "{} ESPS record(s) do not have {} '{}'-separated fields; missing fields are left empty",
            uneven, tier_count, separator
        );
    }

    let mut tiers: Vec<Tier> = (0..tier_count).map(|_| Tier::new()).collect();
    for (end, fields) in split {
        for (k, tier) in tiers.iter_mut().enumerate() {
            let field = fields.get(k).cloned().unwrap_or_default();
            tier.push(Interval::new(end.clone(), field));
        }
    }
    debug!("Split ESPS content on '{}' into {} tier(s)", separator, tier_count);
    tiers
}
