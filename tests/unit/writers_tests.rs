/*!
 * Tests for the label file writers
 */

use anyhow::Result;
use phonlabel::{AnnotationDocument, Interval, LabelError, LabelFormat, ReadOptions, Tier};
use crate::common;

/// Test the exact Wavesurfer output for values read from text
#[test]
fn test_wavesurfer_withParsedEnds_shouldWriteTabSeparatedLines() -> Result<()> {
    let doc = AnnotationDocument::parse_str("#\n 1.5 121 a\n 3.0 121 b\n", LabelFormat::Esps, &ReadOptions::default())?;
    let text = doc.stringify_as(LabelFormat::Wavesurfer, &[1])?;
    assert_eq!(text, "0\t1.5\ta\n1.5\t3.0\tb\n");
    Ok(())
}

/// Test that Wavesurfer write then read reproduces the (end, content) sequence
#[test]
fn test_wavesurfer_roundTrip_shouldPreserveEndsAndContents() -> Result<()> {
    let path = common::test_resource_path("sample_long.TextGrid");
    let doc = AnnotationDocument::from_file(&path, LabelFormat::Praat, &ReadOptions::default())?;

    for index in doc.tier_indices() {
        let text = doc.stringify_as(LabelFormat::Wavesurfer, &[index])?;
        let reread = AnnotationDocument::parse_str(&text, LabelFormat::Wavesurfer, &ReadOptions::default())?;
        assert_eq!(
            common::ends_and_contents(reread.tier(1).unwrap()),
            common::ends_and_contents(doc.tier(index).unwrap()),
            "tier {} changed in the round trip",
            index
        );
    }
    Ok(())
}

/// Test ESPS output layout
#[test]
fn test_esps_shouldStartWithSeparatorAndUseColor121() -> Result<()> {
    let doc = AnnotationDocument::from_tiers(
        LabelFormat::Wavesurfer,
        vec![Tier::from_intervals(vec![Interval::new(0.25, "a"), Interval::new(0.5, "b")])],
    );
    let text = doc.stringify_as(LabelFormat::Esps, &[])?;
    assert_eq!(text, "#\n 0.25 121 a\n 0.5 121 b\n");

    let reread = AnnotationDocument::parse_str(&text, LabelFormat::Esps, &ReadOptions::default())?;
    assert_eq!(
        common::ends_and_contents(reread.tier(1).unwrap()),
        common::ends_and_contents(doc.tier(1).unwrap())
    );
    Ok(())
}

/// Test that Praat short output can be read back by the auto-detecting reader
#[test]
fn test_praatShort_roundTrip_shouldKeepAllTiers() -> Result<()> {
    let path = common::test_resource_path("sample_long.TextGrid");
    let doc = AnnotationDocument::from_file(&path, LabelFormat::Praat, &ReadOptions::default())?;

    let text = doc.stringify_as(LabelFormat::PraatShort, &[])?;
    assert!(text.starts_with("File type = \"ooTextFile short\"\nObject class = \"TextGrid\"\n\n0\n1.2\n<exists>\n2\n"));
    assert!(text.contains("\"Tier2\""));

    let reread = AnnotationDocument::parse_str(&text, LabelFormat::Praat, &ReadOptions::default())?;
    assert_eq!(reread.format, LabelFormat::PraatShort);
    assert_eq!(reread.tier_count(), 2);
    for index in doc.tier_indices() {
        assert_eq!(
            common::ends_and_contents(reread.tier(index).unwrap()),
            common::ends_and_contents(doc.tier(index).unwrap())
        );
    }
    Ok(())
}

/// Test quote doubling in Praat short output
#[test]
fn test_praatShort_withQuotesInContent_shouldDoubleThem() -> Result<()> {
    let path = common::test_resource_path("sample_short.TextGrid");
    let doc = AnnotationDocument::from_file(&path, LabelFormat::Praat, &ReadOptions::default())?;
    let text = doc.stringify_as(LabelFormat::PraatShort, &[1])?;
    assert!(text.contains("\n\"the \"\"pot\"\"\"\n"));
    Ok(())
}

/// Test that the long Praat writer reports not implemented
#[test]
fn test_praatLong_shouldSignalNotImplemented() {
    let doc = AnnotationDocument::from_tiers(LabelFormat::PraatLong, vec![Tier::new()]);
    let err = doc.stringify_as(LabelFormat::PraatLong, &[]).unwrap_err();
    assert!(matches!(err, LabelError::NotImplemented(_)));
}

/// Test that writing leaves every cursor where it was
#[test]
fn test_stringifyAs_shouldPreserveCursor() -> Result<()> {
    let path = common::test_resource_path("sample_long.TextGrid");
    let mut doc = AnnotationDocument::from_file(&path, LabelFormat::Praat, &ReadOptions::default())?;
    doc.tier_mut(2).unwrap().next();
    doc.tier_mut(2).unwrap().next();

    doc.stringify_as(LabelFormat::PraatShort, &[1, 2])?;
    doc.stringify_as(LabelFormat::Wavesurfer, &[2])?;

    assert_eq!(doc.tier(2).unwrap().position(), Some(1));
    assert_eq!(doc.tier(1).unwrap().position(), None);
    Ok(())
}

/// Test writing to a file on disk
#[test]
fn test_writeToFile_withPath_shouldCreateFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output = temp_dir.path().join("out.lab");
    let doc = AnnotationDocument::parse_str("0 1 a\n1 2 b\n", LabelFormat::Wavesurfer, &ReadOptions::default())?;

    doc.write_to_file(&output, LabelFormat::Wavesurfer, &[1])?;

    assert_eq!(std::fs::read_to_string(&output)?, "0\t1\ta\n1\t2\tb\n");
    Ok(())
}

/// Test that an unknown tier is rejected
#[test]
fn test_stringifyAs_withUnknownTier_shouldFail() {
    let doc = AnnotationDocument::from_tiers(LabelFormat::Esps, vec![Tier::new()]);
    assert!(matches!(doc.stringify_as(LabelFormat::Esps, &[4]), Err(LabelError::NoSuchTier(4))));
}
