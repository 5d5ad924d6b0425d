/*!
 * Tests for document editing, cursor navigation and time transforms
 */

use anyhow::Result;
use phonlabel::{AnnotationDocument, Interval, LabelError, LabelFormat, ReadOptions, Tier};
use crate::common;

fn sample_document() -> Result<AnnotationDocument> {
    let path = common::test_resource_path("sample_long.TextGrid");
    Ok(AnnotationDocument::from_file(&path, LabelFormat::Praat, &ReadOptions::default())?)
}

fn ends(tier: &Tier) -> Vec<f64> {
    tier.intervals().iter().map(|i| i.end.value()).collect()
}

fn assert_all_contiguous(doc: &AnnotationDocument) {
    for (_, tier) in doc.tiers() {
        common::assert_contiguous(tier);
    }
}

/// Test that scaling by k then 1/k restores every time
#[test]
fn test_scaleBy_withInverseFactor_shouldRestoreTimes() -> Result<()> {
    let mut doc = sample_document()?;
    let before = ends(doc.tier(2).unwrap());

    doc.scale_by(1000.0, &[])?;
    assert!((doc.tier(2).unwrap().intervals()[1].end.value() - 500.0).abs() < 1e-9);
    assert_all_contiguous(&doc);
    doc.scale_by(0.001, &[])?;
    assert_all_contiguous(&doc);

    let after = ends(doc.tier(2).unwrap());
    for (a, b) in before.iter().zip(after.iter()) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }
    Ok(())
}

/// Test that shifting by d then -d restores every time and keeps the zero start
#[test]
fn test_shiftBy_withOppositeAmounts_shouldRestoreTimes() -> Result<()> {
    let mut doc = sample_document()?;
    let before = ends(doc.tier(1).unwrap());

    doc.shift_by(0.25, &[1])?;
    assert!((doc.tier(1).unwrap().intervals()[0].end.value() - 0.6).abs() < 1e-9);
    assert_eq!(doc.tier(1).unwrap().start_of(0), 0.0);
    // Tier 2 was not selected
    assert_eq!(doc.tier(2).unwrap().intervals()[1].end, 0.5);
    assert_all_contiguous(&doc);

    doc.shift_by(-0.25, &[1])?;
    assert_all_contiguous(&doc);
    let after = ends(doc.tier(1).unwrap());
    for (a, b) in before.iter().zip(after.iter()) {
        assert!((a - b).abs() < 1e-9);
    }
    Ok(())
}

/// Test deleting every empty interval while iterating
#[test]
fn test_delete_insideNextLoop_shouldVisitEveryInterval() -> Result<()> {
    let mut doc = sample_document()?;
    let mut visited = Vec::new();

    let tier = doc.tier_mut(2).unwrap();
    while tier.next() {
        visited.push(tier.content().unwrap_or_default().to_string());
        if tier.content() == Some("") {
            tier.delete()?;
        }
    }

    assert_eq!(visited, vec!["", "p", "a", "t", ""]);
    let contents: Vec<_> = doc.tier(2).unwrap().intervals().iter().map(|i| i.content.clone()).collect();
    assert_eq!(contents, vec!["p", "a", "t"]);
    // The first remaining interval now starts at zero
    assert_eq!(doc.tier(2).unwrap().start_of(0), 0.0);
    Ok(())
}

/// Test deletion through the document by tier index
#[test]
fn test_documentDelete_withUnsetCursor_shouldFail() -> Result<()> {
    let mut doc = sample_document()?;
    assert!(matches!(doc.delete(1), Err(LabelError::CursorUnset)));
    assert!(matches!(doc.delete(9), Err(LabelError::NoSuchTier(9))));

    doc.tier_mut(1).unwrap().last();
    let removed = doc.delete(1)?;
    assert_eq!(removed.end, 1.2);
    assert_eq!(doc.tier(1).unwrap().len(), 2);
    Ok(())
}

/// Test positioning the cursor by time on a shared boundary
#[test]
fn test_setAtTime_onBoundary_shouldPickLaterInterval() -> Result<()> {
    let mut doc = sample_document()?;
    let tier = doc.tier_mut(1).unwrap();

    assert!(tier.set_at_time(0.9));
    assert_eq!(tier.content(), Some(""));
    assert_eq!(tier.position(), Some(2));

    assert!(tier.set_at_time(0.5));
    assert_eq!(tier.content(), Some("pot"));

    // Past the end the cursor stays where it was
    assert!(!tier.set_at_time(5.0));
    assert_eq!(tier.position(), Some(1));
    Ok(())
}

/// Test editing boundaries through the cursor
#[test]
fn test_setStartAndEnd_shouldMoveSharedBoundaries() -> Result<()> {
    let mut tier = Tier::from_intervals(vec![
        Interval::new(1.0, "a"),
        Interval::new(2.0, "b"),
        Interval::new(3.0, "c"),
    ]);
    tier.next();
    tier.next();

    tier.set_start(1.5)?;
    assert_eq!(tier.intervals()[0].end, 1.5);
    tier.set_end(2.5)?;
    assert_eq!(tier.start_of(2), 2.5);
    assert!((tier.duration().unwrap_or_default() - 1.0).abs() < 1e-12);

    // Boundaries may not cross their neighbours
    assert!(tier.set_end(3.5).is_err());
    assert!(tier.set_start(-0.5).is_err());
    assert!(tier.set_end(f64::NAN).is_err());

    tier.set_content("B")?;
    assert_eq!(tier.intervals()[1].content, "B");
    common::assert_contiguous(&tier);
    Ok(())
}

/// Test inserting a boundary and reading it back through the cursor
#[test]
fn test_insert_shouldSplitAndPositionCursor() -> Result<()> {
    let mut doc = sample_document()?;
    let tier = doc.tier_mut(1).unwrap();

    let index = tier.insert(0.6, "po")?;
    assert_eq!(index, 1);
    assert_eq!(tier.content(), Some("po"));
    assert_eq!(tier.start().map(|s| s.value()), Some(0.35));
    assert!(tier.next());
    assert_eq!(tier.content(), Some("pot"));
    assert_eq!(tier.start().map(|s| s.value()), Some(0.6));
    common::assert_contiguous(tier);

    assert!(matches!(tier.insert(f64::NAN, "bad"), Err(LabelError::InvalidOperation(_))));
    assert_eq!(tier.len(), 4);
    Ok(())
}

/// Test building a document by hand and writing it out
#[test]
fn test_fromTiers_withAddedTier_shouldWriteAllTiers() -> Result<()> {
    let mut doc = AnnotationDocument::from_tiers(
        LabelFormat::PraatShort,
        vec![Tier::from_intervals(vec![Interval::new(1.0, "a")]).with_name("first")],
    );
    let index = doc.add_tier(Tier::from_intervals(vec![Interval::new(0.5, "b"), Interval::new(1.0, "c")]));
    assert_eq!(index, 2);
    assert_eq!(doc.tier_by_name("first"), Some(1));

    let text = doc.stringify_as(LabelFormat::PraatShort, &[])?;
    let reread = AnnotationDocument::parse_str(&text, LabelFormat::Praat, &ReadOptions::default())?;
    assert_eq!(reread.tier_count(), 2);
    assert_eq!(reread.tier(2).unwrap().len(), 2);
    Ok(())
}
