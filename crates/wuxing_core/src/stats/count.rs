//! Per-category element counts and the pillar reducer.
//!
//! # Invariants
//! - `ElementCount` always covers all five categories (zero-filled).
//! - `reduce` output always sums to `SYMBOLS_PER_READING`.

use crate::model::reading::Reading;
use crate::model::symbol::{element_of, ElementCategory};
use serde::{Deserialize, Serialize};

/// Count per element category, indexed in canonical order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementCount {
    counts: [u32; 5],
}

impl ElementCount {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds counts from `(category, count)` pairs; repeated categories add up.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (ElementCategory, u32)>) -> Self {
        let mut result = Self::new();
        for (category, count) in pairs {
            result.counts[category.index()] += count;
        }
        result
    }

    pub fn get(&self, category: ElementCategory) -> u32 {
        self.counts[category.index()]
    }

    pub fn increment(&mut self, category: ElementCategory) {
        self.counts[category.index()] += 1;
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    /// `(category, count)` in canonical order, zeros included.
    pub fn iter(&self) -> impl Iterator<Item = (ElementCategory, u32)> + '_ {
        ElementCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }

    /// Folds two count sets category by category.
    pub fn zip_with(&self, other: &Self, f: impl Fn(u32, u32) -> u32) -> Self {
        let mut counts = [0u32; 5];
        for (slot, (left, right)) in counts
            .iter_mut()
            .zip(self.counts.iter().zip(other.counts.iter()))
        {
            *slot = f(*left, *right);
        }
        Self { counts }
    }

    /// Display rows with `percentage = round(count / total * 100)`.
    ///
    /// Returns zero percentages when the total is zero.
    pub fn stats(&self) -> [ElementStat; 5] {
        self.stats_over(self.total())
    }

    /// Display rows over an explicit denominator.
    pub fn stats_over(&self, total: u32) -> [ElementStat; 5] {
        ElementCategory::ALL.map(|category| ElementStat::new(category, self.get(category), total))
    }
}

/// One display row: category, raw count, rounded percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementStat {
    pub category: ElementCategory,
    pub count: u32,
    pub percentage: u32,
}

impl ElementStat {
    pub fn new(category: ElementCategory, count: u32, total: u32) -> Self {
        Self {
            category,
            count,
            percentage: rounded_percent(count, total),
        }
    }
}

/// Reduces a reading's eight symbols to per-category counts.
pub fn reduce(reading: &Reading) -> ElementCount {
    let mut counts = ElementCount::new();
    for symbol in reading.symbols() {
        counts.increment(element_of(symbol));
    }
    counts
}

fn rounded_percent(count: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (f64::from(count) / f64::from(total) * 100.0).round() as u32
}
