/*!
 * In-memory annotation model.
 *
 * This module provides:
 * - Timestamps that keep their source spelling
 * - Contiguous tiers of labeled intervals with a per-tier cursor
 * - The annotation document tying tiers to readers and writers
 */

pub mod annotation;
pub mod cursor;
pub mod model;

// Re-export types used by other modules
pub use annotation::{AnnotationDocument, STDOUT_SENTINEL};
pub use model::{Interval, IntervalView, Tier, Timestamp, TimestampError};
