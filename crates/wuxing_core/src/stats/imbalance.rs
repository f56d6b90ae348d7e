//! Imbalance scoring against a uniform 20%-per-category ideal.
//!
//! # Responsibility
//! - Compute signed per-category deviations and an aggregate imbalance.
//! - Classify deviations and the aggregate into status tiers.
//!
//! # Invariants
//! - Reports always carry all five categories in canonical order.
//! - Tier boundaries are inclusive (`d <= 0.05` is balanced) and are decided
//!   in integer arithmetic so float drift cannot move a boundary case.
//! - `score` is pure: identical input yields identical output.

use crate::model::reading::SYMBOLS_PER_READING;
use crate::model::symbol::ElementCategory;
use crate::stats::combine::COMBINED_TOTAL;
use crate::stats::count::ElementCount;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Ideal share per category (one fifth).
pub const IDEAL_SHARE: f64 = 0.2;

/// Per-category tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationStatus {
    Balanced,
    SlightlyHigh,
    TooHigh,
    SlightlyLow,
    TooLow,
}

impl DeviationStatus {
    /// Fixed-locale label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Balanced => "平衡",
            Self::SlightlyHigh => "略多",
            Self::TooHigh => "过多",
            Self::SlightlyLow => "略少",
            Self::TooLow => "不足",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Balanced => Severity::Success,
            Self::SlightlyHigh | Self::SlightlyLow => Severity::Warning,
            Self::TooHigh | Self::TooLow => Severity::Danger,
        }
    }
}

/// Aggregate tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallStatus {
    Balanced,
    MildlyImbalanced,
    SeverelyImbalanced,
}

impl OverallStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Balanced => "五行平衡",
            Self::MildlyImbalanced => "五行轻度失衡",
            Self::SeverelyImbalanced => "五行严重失衡",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Self::Balanced => Severity::Success,
            Self::MildlyImbalanced => Severity::Warning,
            Self::SeverelyImbalanced => Severity::Danger,
        }
    }
}

/// UI tint hint shared by per-category and aggregate tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Warning,
    Danger,
}

/// Deviation of one category from the ideal share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviationResult {
    pub category: ElementCategory,
    /// `count / total - 0.2`; negative when under-represented.
    pub signed_deviation: f64,
    /// `round(signed_deviation * 100)`.
    pub deviation_percent: i32,
    pub status: DeviationStatus,
}

/// Full scoring output for one distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImbalanceReport {
    pub deviations: [DeviationResult; 5],
    /// Mean absolute deviation, in `[0, 1]`.
    pub aggregate_imbalance: f64,
    pub overall_status: OverallStatus,
}

impl ImbalanceReport {
    pub fn deviation(&self, category: ElementCategory) -> &DeviationResult {
        &self.deviations[category.index()]
    }

    /// Aggregate as a rounded whole percent for display.
    pub fn aggregate_percent(&self) -> i32 {
        (self.aggregate_imbalance * 100.0).round() as i32
    }
}

/// Precondition failures for scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Only one reading (8) or two combined readings (16) can be scored.
    UnsupportedTotal(u32),
    TotalMismatch { expected: u32, found: u32 },
}

impl Display for StatsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedTotal(total) => write!(
                f,
                "element total must be {SYMBOLS_PER_READING} or {COMBINED_TOTAL}, got {total}"
            ),
            Self::TotalMismatch { expected, found } => write!(
                f,
                "element counts sum to {found}, expected total {expected}"
            ),
        }
    }
}

impl Error for StatsError {}

/// Scores `counts` over `total`.
///
/// # Errors
/// - `StatsError::UnsupportedTotal` when `total` is neither 8 nor 16.
/// - `StatsError::TotalMismatch` when the counts do not sum to `total`.
pub fn score(counts: &ElementCount, total: u32) -> Result<ImbalanceReport, StatsError> {
    if total != SYMBOLS_PER_READING && total != COMBINED_TOTAL {
        return Err(StatsError::UnsupportedTotal(total));
    }
    let found = counts.total();
    if found != total {
        return Err(StatsError::TotalMismatch {
            expected: total,
            found,
        });
    }

    let deviations = ElementCategory::ALL
        .map(|category| deviation_for(category, counts.get(category), total));
    let aggregate_imbalance = deviations
        .iter()
        .map(|deviation| deviation.signed_deviation.abs())
        .sum::<f64>()
        / ElementCategory::ALL.len() as f64;

    Ok(ImbalanceReport {
        deviations,
        aggregate_imbalance,
        overall_status: overall_status(counts, total),
    })
}

fn deviation_for(category: ElementCategory, count: u32, total: u32) -> DeviationResult {
    let signed_deviation = f64::from(count) / f64::from(total) - IDEAL_SHARE;
    DeviationResult {
        category,
        signed_deviation,
        deviation_percent: (signed_deviation * 100.0).round() as i32,
        status: deviation_status(count, total),
    }
}

// |c/T - 1/5| compared with 1/20 and 1/10, scaled by 20T.
fn deviation_status(count: u32, total: u32) -> DeviationStatus {
    let scaled = 20 * i64::from(count) - 4 * i64::from(total);
    let magnitude = scaled.abs();
    let total = i64::from(total);
    if magnitude <= total {
        DeviationStatus::Balanced
    } else if magnitude <= 2 * total {
        if scaled > 0 {
            DeviationStatus::SlightlyHigh
        } else {
            DeviationStatus::SlightlyLow
        }
    } else if scaled > 0 {
        DeviationStatus::TooHigh
    } else {
        DeviationStatus::TooLow
    }
}

// aggregate = sum|5c - T| / 25T; compared with 1/20 and 1/10.
fn overall_status(counts: &ElementCount, total: u32) -> OverallStatus {
    let total = i64::from(total);
    let spread: i64 = counts
        .iter()
        .map(|(_, count)| (5 * i64::from(count) - total).abs())
        .sum();
    if 4 * spread <= 5 * total {
        OverallStatus::Balanced
    } else if 2 * spread <= 5 * total {
        OverallStatus::MildlyImbalanced
    } else {
        OverallStatus::SeverelyImbalanced
    }
}
