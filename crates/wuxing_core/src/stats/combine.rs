//! Innate + current distribution merge.

use crate::model::reading::SYMBOLS_PER_READING;
use crate::stats::count::ElementCount;

/// Fixed denominator for a combined distribution of two readings.
pub const COMBINED_TOTAL: u32 = 2 * SYMBOLS_PER_READING;

/// Elementwise sum of two count sets.
pub fn combine(innate: &ElementCount, current: &ElementCount) -> ElementCount {
    innate.zip_with(current, |left, right| left + right)
}
