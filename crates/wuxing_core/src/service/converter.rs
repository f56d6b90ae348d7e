//! Calendar conversion boundary.
//!
//! # Responsibility
//! - Define the `instant -> reading` contract implemented outside core.
//! - Provide wall-clock instants for the current reading.
//!
//! # Invariants
//! - Converters must return exactly four valid pillars; anything else is a
//!   contract violation reported as `ConverterError::Contract`.

use crate::model::reading::{BirthInstant, Reading, ReadingError};
use chrono::{Datelike, Local, Timelike};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// External `toPillars` collaborator.
pub trait CalendarConverter: Send + Sync {
    fn to_reading(&self, instant: &BirthInstant) -> Result<Reading, ConverterError>;
}

/// Source of "now" for the current reading.
pub trait InstantSource: Send + Sync {
    fn now(&self) -> Result<BirthInstant, ReadingError>;
}

/// Local wall clock at hour resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl InstantSource for LocalClock {
    fn now(&self) -> Result<BirthInstant, ReadingError> {
        let now = Local::now();
        BirthInstant::new(now.year(), now.month(), now.day(), now.hour())
    }
}

/// Converter errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConverterError {
    /// The converter returned pillars outside the known symbol sets.
    Contract(ReadingError),
    /// The converter has no answer for this instant.
    Unsupported(BirthInstant),
}

impl Display for ConverterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Contract(err) => write!(f, "calendar converter contract violation: {err}"),
            Self::Unsupported(instant) => write!(
                f,
                "calendar converter has no reading for {}",
                instant.solar_label()
            ),
        }
    }
}

impl Error for ConverterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Contract(err) => Some(err),
            Self::Unsupported(_) => None,
        }
    }
}

impl From<ReadingError> for ConverterError {
    fn from(value: ReadingError) -> Self {
        Self::Contract(value)
    }
}

/// Table-backed converter for hosts that resolve pillars ahead of time.
///
/// Entries are pillar text (`甲子 丙寅 戊辰 庚午`) plus a lunar label and are
/// parsed on insert, so lookups cannot fail on malformed symbols.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedConverter {
    entries: HashMap<BirthInstant, Reading>,
}

impl PrecomputedConverter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the reading for `instant`, replacing any previous entry.
    pub fn insert(
        &mut self,
        instant: BirthInstant,
        pillars: &str,
        lunar_label: &str,
    ) -> Result<(), ConverterError> {
        let parsed = Reading::parse(pillars)?;
        let reading = Reading::new(*parsed.pillars(), instant.solar_label(), lunar_label);
        self.entries.insert(instant, reading);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CalendarConverter for PrecomputedConverter {
    fn to_reading(&self, instant: &BirthInstant) -> Result<Reading, ConverterError> {
        self.entries
            .get(instant)
            .cloned()
            .ok_or(ConverterError::Unsupported(*instant))
    }
}

#[cfg(test)]
mod tests {
    use super::{CalendarConverter, ConverterError, InstantSource, LocalClock, PrecomputedConverter};
    use crate::model::reading::{BirthInstant, ReadingError};
    use crate::model::symbol::SymbolError;

    #[test]
    fn precomputed_converter_labels_readings() {
        let instant = BirthInstant::new(1984, 2, 4, 12).expect("instant");
        let mut converter = PrecomputedConverter::new();
        converter
            .insert(instant, "甲子 丙寅 戊辰 庚午", "农历甲子年正月初三")
            .expect("insert");

        let reading = converter.to_reading(&instant).expect("reading");
        assert_eq!(reading.solar_label, "1984年2月4日 12时");
        assert_eq!(reading.lunar_label, "农历甲子年正月初三");
    }

    #[test]
    fn unknown_symbols_are_contract_violations() {
        let instant = BirthInstant::new(1984, 2, 4, 12).expect("instant");
        let mut converter = PrecomputedConverter::new();
        let err = converter
            .insert(instant, "甲子 丙寅 戊辰 庚X", "")
            .expect_err("bad glyph must fail");
        assert_eq!(
            err,
            ConverterError::Contract(ReadingError::Symbol(SymbolError::UnknownBranch('X')))
        );
        assert!(converter.is_empty());
    }

    #[test]
    fn missing_instant_is_unsupported() {
        let instant = BirthInstant::new(2000, 1, 1, 0).expect("instant");
        let err = PrecomputedConverter::new()
            .to_reading(&instant)
            .expect_err("empty table");
        assert_eq!(err, ConverterError::Unsupported(instant));
    }

    #[test]
    fn local_clock_yields_valid_instant() {
        let now = LocalClock.now().expect("local clock");
        assert!(now.validate().is_ok());
    }
}
