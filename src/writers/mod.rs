/*!
 * Label file writers.
 *
 * Writers take the selected tiers in output order and never move their cursors.
 * Praat long output has no writer and reports `NotImplemented`.
 */

use crate::document::Tier;
use crate::errors::LabelError;
use crate::label_format::LabelFormat;

pub mod esps;
pub mod praat;
pub mod wavesurfer;

/// Serialize `tiers` as `format`
pub fn write(format: LabelFormat, tiers: &[&Tier]) -> Result<String, LabelError> {
    match format {
        LabelFormat::Esps => esps::write(single_tier(format, tiers)?),
        LabelFormat::Wavesurfer => wavesurfer::write(single_tier(format, tiers)?),
        LabelFormat::PraatShort => praat::write_short(tiers),
        LabelFormat::Praat | LabelFormat::PraatLong => Err(LabelError::NotImplemented(
            "writing the long Praat TextGrid format".to_string(),
        )),
    }
}

fn single_tier<'a>(format: LabelFormat, tiers: &[&'a Tier]) -> Result<&'a Tier, LabelError> {
    match tiers {
        [tier] => Ok(*tier),
        [] => Err(LabelError::NoSuchTier(1)),
        _ => Err(LabelError::SingleTierFormat {
            format,
            requested: tiers.len(),
        }),
    }
}
