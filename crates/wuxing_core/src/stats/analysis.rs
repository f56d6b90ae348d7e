//! Reading-level analysis bundles consumed by UI/FFI callers.
//!
//! # Responsibility
//! - Run reducer + scorer for one reading, and combiner + scorer for two.
//! - Produce complete bundles; nothing is returned when scoring fails.
//!
//! # Invariants
//! - Single readings are scored over 8, combined readings over 16.
//! - Analyses are recomputed from readings, never updated incrementally.

use crate::model::reading::{Reading, SYMBOLS_PER_READING};
use crate::model::symbol::ElementCategory;
use crate::stats::combine::{combine, COMBINED_TOTAL};
use crate::stats::count::{reduce, ElementCount, ElementStat};
use crate::stats::imbalance::{score, ImbalanceReport, StatsError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Stats and imbalance report for one reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingAnalysis {
    pub counts: ElementCount,
    pub stats: [ElementStat; 5],
    pub report: ImbalanceReport,
}

/// One category row of the combined view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub category: ElementCategory,
    pub innate_count: u32,
    pub current_count: u32,
    pub count: u32,
    /// `round(count / 16 * 100)`.
    pub percentage: u32,
}

/// Combined innate + current distribution and its report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedAnalysis {
    pub rows: [CombinedRow; 5],
    pub report: ImbalanceReport,
}

impl CombinedAnalysis {
    pub fn row(&self, category: ElementCategory) -> &CombinedRow {
        &self.rows[category.index()]
    }
}

/// Analyzes one reading over a total of 8.
pub fn analyze_reading(reading: &Reading) -> Result<ReadingAnalysis, StatsError> {
    let counts = reduce(reading);
    let report = score(&counts, SYMBOLS_PER_READING)?;
    debug!(
        "event=reading_scored module=stats status=ok overall={:?} aggregate_pct={}",
        report.overall_status,
        report.aggregate_percent()
    );
    Ok(ReadingAnalysis {
        counts,
        stats: counts.stats_over(SYMBOLS_PER_READING),
        report,
    })
}

/// Analyzes the combined innate + current distribution over a fixed 16.
///
/// # Errors
/// - `StatsError::TotalMismatch` when the merged counts do not sum to 16.
///   The denominator is not adjusted to match malformed input.
pub fn analyze_combined(
    innate: &ElementCount,
    current: &ElementCount,
) -> Result<CombinedAnalysis, StatsError> {
    let merged = combine(innate, current);
    let report = score(&merged, COMBINED_TOTAL).map_err(|err| {
        warn!(
            "event=combined_score module=stats status=error innate_total={} current_total={} error={}",
            innate.total(),
            current.total(),
            err
        );
        err
    })?;

    let stats = merged.stats_over(COMBINED_TOTAL);
    let rows = ElementCategory::ALL.map(|category| CombinedRow {
        category,
        innate_count: innate.get(category),
        current_count: current.get(category),
        count: merged.get(category),
        percentage: stats[category.index()].percentage,
    });
    debug!(
        "event=combined_scored module=stats status=ok overall={:?} aggregate_pct={}",
        report.overall_status,
        report.aggregate_percent()
    );
    Ok(CombinedAnalysis { rows, report })
}

#[cfg(test)]
mod tests {
    use super::{analyze_combined, analyze_reading};
    use crate::model::reading::Reading;
    use crate::model::symbol::ElementCategory;
    use crate::stats::count::ElementCount;
    use crate::stats::imbalance::{OverallStatus, StatsError};

    #[test]
    fn single_reading_analysis_covers_all_categories() {
        let reading = Reading::parse("甲子 丙寅 戊辰 庚午").expect("reading");
        let analysis = analyze_reading(&reading).expect("analysis");
        assert_eq!(analysis.stats.len(), 5);
        assert_eq!(analysis.stats.iter().map(|stat| stat.count).sum::<u32>(), 8);
        assert_eq!(analysis.report.overall_status, OverallStatus::MildlyImbalanced);
    }

    #[test]
    fn combined_rows_keep_both_sources() {
        let innate = ElementCount::from_pairs([
            (ElementCategory::Wood, 4),
            (ElementCategory::Fire, 4),
        ]);
        let current = ElementCount::from_pairs([
            (ElementCategory::Metal, 4),
            (ElementCategory::Water, 4),
        ]);
        let analysis = analyze_combined(&innate, &current).expect("combined");
        let wood = analysis.row(ElementCategory::Wood);
        assert_eq!((wood.innate_count, wood.current_count, wood.count), (4, 0, 4));
        assert_eq!(wood.percentage, 25);
        assert_eq!(analysis.row(ElementCategory::Earth).percentage, 0);
    }

    #[test]
    fn combined_flags_malformed_totals() {
        let innate = ElementCount::from_pairs([(ElementCategory::Wood, 8)]);
        let short = ElementCount::from_pairs([(ElementCategory::Fire, 7)]);
        let err = analyze_combined(&innate, &short).expect_err("15 symbols must fail");
        assert_eq!(
            err,
            StatsError::TotalMismatch {
                expected: 16,
                found: 15
            }
        );
    }
}
