use std::fmt::Write;

use crate::document::Tier;
use crate::errors::LabelError;

/// Write one tier as tab-separated `start end label` lines
pub fn write(tier: &Tier) -> Result<String, LabelError> {
    let mut out = String::new();
    for view in tier.iter() {
        let _ = writeln!(out, "{}\t{}\t{}", view.start, view.end, view.content);
    }
    Ok(out)
}
