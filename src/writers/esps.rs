use std::fmt::Write;

use crate::document::Tier;
use crate::errors::LabelError;

/// Color code written on every ESPS record
pub const DEFAULT_COLOR: u32 = 121;

/// Write one tier as an ESPS/Xwaves label file with an empty header
pub fn write(tier: &Tier) -> Result<String, LabelError> {
    let mut out = String::from("#\n");
    for interval in tier.intervals() {
        // Writing into a String cannot fail
        let _ = writeln!(out, " {} {} {}", interval.end, DEFAULT_COLOR, interval.content);
    }
    Ok(out)
}
