/*!
 * Short-format Praat TextGrid writer.
 *
 * Every tier is written as an `IntervalTier` named `Tier<N>`, N counting the
 * selected tiers from 1. The file bounds span all selected tiers.
 */

use std::fmt::Write;

use crate::document::{Tier, Timestamp};
use crate::errors::LabelError;

/// Double embedded quotes and wrap in quotes
pub fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

pub fn write_short(tiers: &[&Tier]) -> Result<String, LabelError> {
    let bounds: Vec<(Timestamp, Timestamp)> = tiers.iter().filter_map(|t| t.bounds()).collect();
    let start = bounds
        .iter()
        .map(|(s, _)| s)
        .min_by(|a, b| a.value().total_cmp(&b.value()))
        .cloned()
        .unwrap_or_default();
    let end = bounds
        .iter()
        .map(|(_, e)| e)
        .max_by(|a, b| a.value().total_cmp(&b.value()))
        .cloned()
        .unwrap_or_default();

    let mut out = String::new();
    let _ = writeln!(out, "File type = \"ooTextFile short\"");
    let _ = writeln!(out, "Object class = \"TextGrid\"");
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", start);
    let _ = writeln!(out, "{}", end);
    let _ = writeln!(out, "<exists>");
    let _ = writeln!(out, "{}", tiers.len());

    for (n, tier) in tiers.iter().enumerate() {
        let (tier_start, tier_end) = tier.bounds().unwrap_or_default();
        let _ = writeln!(out, "\"IntervalTier\"");
        let _ = writeln!(out, "{}", quote(&format!("Tier{}", n + 1)));
        let _ = writeln!(out, "{}", tier_start);
        let _ = writeln!(out, "{}", tier_end);
        let _ = writeln!(out, "{}", tier.len());
        for view in tier.iter() {
            let _ = writeln!(out, "{}", view.start);
            let _ = writeln!(out, "{}", view.end);
            let _ = writeln!(out, "{}", quote(view.content));
        }
    }

    Ok(out)
}
