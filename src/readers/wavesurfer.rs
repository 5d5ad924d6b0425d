/*!
 * Wavesurfer label reader: one tier, one `start end label` record per line.
 *
 * Only the first start is used (to prime the tier); every later start is
 * re-derived from the previous end, so gaps and overlaps are not preserved.
 */

use log::debug;

use super::{TierBuilder, numbered_lines, parse_time, split_fields};
use crate::document::AnnotationDocument;
use crate::errors::LabelError;
use crate::label_format::LabelFormat;

pub fn read(content: &str) -> Result<AnnotationDocument, LabelError> {
    const FORMAT: LabelFormat = LabelFormat::Wavesurfer;

    let mut builder = TierBuilder::new();
    let mut discontinuities = 0;
    let mut previous_end = None;

    for (number, line) in numbered_lines(content) {
        let fields = split_fields(line, 3);
        match fields.as_slice() {
            [] => continue,
            [_] => return Err(LabelError::parse(FORMAT, number, "expected 'start end label'")),
            [start, end, rest @ ..] => {
                let start = parse_time(start, FORMAT, number)?;
                let end = parse_time(end, FORMAT, number)?;
                if previous_end.as_ref().is_some_and(|prev| *prev != start) {
                    discontinuities += 1;
                }
                previous_end = Some(end.clone());
                let label = rest.first().copied().unwrap_or_default().to_string();
                builder.push(Some(start), end, label);
            }
        }
    }

    if discontinuities > 0 {
        debug!("Wavesurfer input had {} gap(s) or overlap(s), folded into contiguous intervals", discontinuities);
    }

    Ok(AnnotationDocument::from_tiers(FORMAT, vec![builder.finish()]))
}
