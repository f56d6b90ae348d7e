//! Pillar and reading domain model.
//!
//! # Responsibility
//! - Define the four-pillar `Reading` produced by the calendar boundary.
//! - Parse pillar text (`甲子 丙寅 戊辰 庚午`) into typed symbols.
//!
//! # Invariants
//! - A `Reading` always holds exactly four pillars, so it always yields
//!   exactly eight symbols.
//! - Readings are immutable after construction and replaced wholesale.

use crate::model::symbol::{Branch, ElementCategory, Stem, Symbol, SymbolError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Pillars per reading (year, month, day, hour).
pub const PILLARS_PER_READING: usize = 4;
/// Symbols per reading (one stem + one branch per pillar).
pub const SYMBOLS_PER_READING: u32 = 8;

const MIN_INSTANT_YEAR: i32 = 1900;
const MAX_INSTANT_YEAR: i32 = 2100;

static PILLAR_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,，、/|]+").expect("valid pillar separator regex"));

/// Position of a pillar inside a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarSlot {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarSlot {
    pub const ALL: [PillarSlot; PILLARS_PER_READING] =
        [Self::Year, Self::Month, Self::Day, Self::Hour];

    fn index(self) -> usize {
        match self {
            Self::Year => 0,
            Self::Month => 1,
            Self::Day => 2,
            Self::Hour => 3,
        }
    }
}

/// One stem-branch pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pillar {
    pub stem: Stem,
    pub branch: Branch,
}

impl Pillar {
    pub fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// Parses a two-glyph pillar such as `甲子`.
    pub fn parse(value: &str) -> Result<Self, SymbolError> {
        let trimmed = value.trim();
        let mut glyphs = trimmed.chars();
        match (glyphs.next(), glyphs.next(), glyphs.next()) {
            (Some(stem), Some(branch), None) => Ok(Self {
                stem: Stem::from_glyph(stem)?,
                branch: Branch::from_glyph(branch)?,
            }),
            _ => Err(SymbolError::MalformedPillar(trimmed.to_string())),
        }
    }

    pub fn symbols(self) -> [Symbol; 2] {
        [Symbol::Stem(self.stem), Symbol::Branch(self.branch)]
    }

    /// (stem element, branch element), shown per pillar as `木/水`.
    pub fn elements(self) -> (ElementCategory, ElementCategory) {
        (self.stem.element(), self.branch.element())
    }
}

impl Display for Pillar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem.glyph(), self.branch.glyph())
    }
}

/// Four-pillar reading for one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pillars: [Pillar; PILLARS_PER_READING],
    /// Human-readable solar date label from the converter.
    pub solar_label: String,
    /// Human-readable lunar date label from the converter.
    pub lunar_label: String,
}

impl Reading {
    pub fn new(
        pillars: [Pillar; PILLARS_PER_READING],
        solar_label: impl Into<String>,
        lunar_label: impl Into<String>,
    ) -> Self {
        Self {
            pillars,
            solar_label: solar_label.into(),
            lunar_label: lunar_label.into(),
        }
    }

    /// Builds a reading from a converter-provided pillar list.
    ///
    /// # Errors
    /// - `ReadingError::PillarCount` when the list is not exactly four long.
    pub fn from_pillars(
        pillars: Vec<Pillar>,
        solar_label: impl Into<String>,
        lunar_label: impl Into<String>,
    ) -> Result<Self, ReadingError> {
        let found = pillars.len();
        let pillars: [Pillar; PILLARS_PER_READING] = pillars
            .try_into()
            .map_err(|_| ReadingError::PillarCount { found })?;
        Ok(Self::new(pillars, solar_label, lunar_label))
    }

    /// Parses four whitespace/comma/slash separated pillars.
    ///
    /// Labels are left empty; text input carries no calendar context.
    pub fn parse(text: &str) -> Result<Self, ReadingError> {
        let pillars = parse_pillars(text)?;
        Self::from_pillars(pillars, "", "")
    }

    pub fn pillars(&self) -> &[Pillar; PILLARS_PER_READING] {
        &self.pillars
    }

    pub fn pillar(&self, slot: PillarSlot) -> Pillar {
        self.pillars[slot.index()]
    }

    /// All eight symbols in pillar order: year stem, year branch, month stem, ...
    pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.pillars.iter().flat_map(|pillar| pillar.symbols())
    }

    pub fn element_pairs(&self) -> [(ElementCategory, ElementCategory); PILLARS_PER_READING] {
        self.pillars.map(Pillar::elements)
    }
}

impl Display for Reading {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [year, month, day, hour] = &self.pillars;
        write!(f, "{year} {month} {day} {hour}")
    }
}

/// Splits free text into pillars; any count is returned, callers enforce four.
pub fn parse_pillars(text: &str) -> Result<Vec<Pillar>, SymbolError> {
    PILLAR_SEPARATOR_RE
        .split(text.trim())
        .filter(|chunk| !chunk.is_empty())
        .map(Pillar::parse)
        .collect()
}

/// Wall-clock instant at hour resolution, as supplied by the form layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BirthInstant {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl BirthInstant {
    /// Validates ranges before the instant reaches the converter.
    ///
    /// # Errors
    /// - `ReadingError::InvalidInstant` when the year is outside 1900..=2100,
    ///   the day does not exist in the month, or the hour is not 0..=23.
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Result<Self, ReadingError> {
        let instant = Self {
            year,
            month,
            day,
            hour,
        };
        instant.validate()?;
        Ok(instant)
    }

    pub fn validate(&self) -> Result<(), ReadingError> {
        if !(MIN_INSTANT_YEAR..=MAX_INSTANT_YEAR).contains(&self.year) {
            return Err(ReadingError::InvalidInstant(format!(
                "year {} outside {MIN_INSTANT_YEAR}..={MAX_INSTANT_YEAR}",
                self.year
            )));
        }
        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(ReadingError::InvalidInstant(format!(
                "{}-{}-{} is not a calendar date",
                self.year, self.month, self.day
            )));
        }
        if self.hour > 23 {
            return Err(ReadingError::InvalidInstant(format!(
                "hour {} outside 0..=23",
                self.hour
            )));
        }
        Ok(())
    }

    /// `1990年5月17日 8时`
    pub fn solar_label(&self) -> String {
        format!("{}年{}月{}日 {}时", self.year, self.month, self.day, self.hour)
    }
}

/// Reading construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadingError {
    Symbol(SymbolError),
    PillarCount { found: usize },
    InvalidInstant(String),
}

impl Display for ReadingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Symbol(err) => write!(f, "{err}"),
            Self::PillarCount { found } => write!(
                f,
                "reading requires exactly {PILLARS_PER_READING} pillars, got {found}"
            ),
            Self::InvalidInstant(message) => write!(f, "invalid instant: {message}"),
        }
    }
}

impl Error for ReadingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Symbol(err) => Some(err),
            Self::PillarCount { .. } | Self::InvalidInstant(_) => None,
        }
    }
}

impl From<SymbolError> for ReadingError {
    fn from(value: SymbolError) -> Self {
        Self::Symbol(value)
    }
}
