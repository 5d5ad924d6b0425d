/*!
 * Tests for the label file readers
 */

use std::io::Cursor;
use anyhow::Result;
use phonlabel::{AnnotationDocument, LabelError, LabelFormat, ReadOptions};
use crate::common;

fn pairs(items: &[(f64, &str)]) -> Vec<(f64, String)> {
    items.iter().map(|(e, c)| (*e, c.to_string())).collect()
}

/// Test the long TextGrid fixture
#[test]
fn test_praatLong_withResourceFile_shouldReadNamedTiers() -> Result<()> {
    common::init_logging();
    let path = common::test_resource_path("sample_long.TextGrid");
    let doc = AnnotationDocument::from_file(&path, LabelFormat::Praat, &ReadOptions::default())?;

    assert_eq!(doc.format, LabelFormat::PraatLong);
    assert_eq!(doc.tier_count(), 2);
    assert_eq!(doc.source_file.as_deref(), Some(path.as_path()));
    assert_eq!(doc.tier_by_name("phone"), Some(2));

    let word = doc.tier(1).unwrap();
    assert_eq!(common::ends_and_contents(word), pairs(&[(0.35, ""), (0.9, "pot"), (1.2, "")]));

    // The phone tier starts at 0.35 and is primed with an empty leading interval
    let phone = doc.tier(2).unwrap();
    assert_eq!(
        common::ends_and_contents(phone),
        pairs(&[(0.35, ""), (0.5, "p"), (0.7, "a"), (0.9, "t"), (1.2, "")])
    );

    for (_, tier) in doc.tiers() {
        common::assert_contiguous(tier);
    }
    Ok(())
}

/// Test the short TextGrid fixture with Windows line endings
#[test]
fn test_praatShort_withCrlfResource_shouldReadAndUnescape() -> Result<()> {
    let path = common::test_resource_path("sample_short.TextGrid");
    let doc = AnnotationDocument::from_file(&path, LabelFormat::Praat, &ReadOptions::default())?;

    assert_eq!(doc.format, LabelFormat::PraatShort);
    let word = doc.tier(1).unwrap();
    assert_eq!(word.name(), Some("word"));
    assert_eq!(common::ends_and_contents(word), pairs(&[(0.35, ""), (1.2, "the \"pot\"")]));
    common::assert_contiguous(word);
    Ok(())
}

/// Test ESPS multi-field labels from the resource file
#[test]
fn test_esps_withResourceFile_shouldSortAndSplit() -> Result<()> {
    let path = common::test_resource_path("sample.esps");
    let doc = AnnotationDocument::from_file(&path, LabelFormat::Esps, &ReadOptions::default())?;

    assert_eq!(doc.tier_count(), 2);
    assert_eq!(doc.header().get("signal").map(String::as_str), Some("pot"));
    assert_eq!(
        common::ends_and_contents(doc.tier(1).unwrap()),
        pairs(&[(0.35, ""), (0.9, "pot"), (1.2, "")])
    );
    assert_eq!(
        common::ends_and_contents(doc.tier(2).unwrap()),
        pairs(&[(0.35, ""), (0.9, "V"), (1.2, "")])
    );
    // Untouched values keep their source spelling
    assert_eq!(doc.tier(1).unwrap().intervals()[1].end.to_string(), "0.900000");
    Ok(())
}

/// Test the two-field ESPS example with content splitting on and off
#[test]
fn test_esps_withSeparator_shouldYieldParallelTiersSharingEnds() -> Result<()> {
    let input = "separator ;\n#\n 1.0 121 a;b\n 2.0 121 c;d\n";

    let doc = AnnotationDocument::parse_str(input, LabelFormat::Esps, &ReadOptions::default())?;
    assert_eq!(doc.tier_count(), 2);
    assert_eq!(common::ends_and_contents(doc.tier(1).unwrap()), pairs(&[(1.0, "a"), (2.0, "c")]));
    assert_eq!(common::ends_and_contents(doc.tier(2).unwrap()), pairs(&[(1.0, "b"), (2.0, "d")]));

    let whole = AnnotationDocument::parse_str(input, LabelFormat::Esps, &ReadOptions { parse_content: false })?;
    assert_eq!(whole.tier_count(), 1);
    assert_eq!(common::ends_and_contents(whole.tier(1).unwrap()), pairs(&[(1.0, "a;b"), (2.0, "c;d")]));
    Ok(())
}

/// Test that a missing ESPS separator line yields no document
#[test]
fn test_esps_withoutSeparatorLine_shouldFailStructurally() {
    let result = AnnotationDocument::parse_str("signal x\n 1.0 121 a\n", LabelFormat::Esps, &ReadOptions::default());
    assert!(matches!(result, Err(LabelError::MissingHeaderSeparator)));
}

/// Test the Wavesurfer fixture
#[test]
fn test_wavesurfer_withResourceFile_shouldPrimeLeadingGap() -> Result<()> {
    let path = common::test_resource_path("sample.lab");
    let doc = AnnotationDocument::from_file(&path, LabelFormat::Wavesurfer, &ReadOptions::default())?;

    assert_eq!(doc.tier_count(), 1);
    let tier = doc.tier(1).unwrap();
    assert_eq!(
        common::ends_and_contents(tier),
        pairs(&[(0.35, ""), (0.5, "p"), (0.7, "a"), (0.9, "t")])
    );
    common::assert_contiguous(tier);
    Ok(())
}

/// Test reading from an arbitrary stream
#[test]
fn test_fromReader_withInMemoryStream_shouldParse() -> Result<()> {
    let stream = Cursor::new("0 1 a\n1 2 b\n");
    let doc = AnnotationDocument::from_reader(stream, LabelFormat::Wavesurfer, &ReadOptions::default())?;
    assert_eq!(doc.tier(1).unwrap().len(), 2);
    assert!(doc.source_file.is_none());
    Ok(())
}

/// Test that an unknown tag fails before anything is read
#[test]
fn test_formatTag_withUnknownValue_shouldBeUnsupported() {
    let err = "elan".parse::<LabelFormat>().unwrap_err();
    assert!(matches!(err, LabelError::UnsupportedFormat(_)));
}

/// Test that a missing file is reported as unreadable
#[test]
fn test_fromFile_withMissingFile_shouldBeUnreadable() {
    let err = AnnotationDocument::from_file("no/such/file.TextGrid", LabelFormat::Praat, &ReadOptions::default())
        .unwrap_err();
    assert!(matches!(err, LabelError::Unreadable { .. }));
}
