//! Reading use-case service.
//!
//! # Responsibility
//! - Hold the birth and current readings for one session.
//! - Derive single, combined and renderer-ready analyses on demand.
//!
//! # Invariants
//! - Readings are replaced wholesale; callers observe either the old or the
//!   new snapshot, never a mix.
//! - Analyses are never cached; every call recomputes from the snapshot.

use crate::model::reading::{BirthInstant, Reading, ReadingError};
use crate::render::animation::HelixInputs;
use crate::service::converter::{CalendarConverter, ConverterError, InstantSource};
use crate::stats::analysis::{analyze_combined, analyze_reading, CombinedAnalysis, ReadingAnalysis};
use crate::stats::imbalance::StatsError;
use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

/// Session tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds between current-reading refreshes.
    pub refresh_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
        }
    }
}

impl SessionConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

/// Immutable view of both readings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub birth: Option<Arc<Reading>>,
    pub current: Option<Arc<Reading>>,
}

impl SessionSnapshot {
    pub fn birth_analysis(&self) -> Result<Option<ReadingAnalysis>, StatsError> {
        self.birth.as_deref().map(analyze_reading).transpose()
    }

    pub fn current_analysis(&self) -> Result<Option<ReadingAnalysis>, StatsError> {
        self.current.as_deref().map(analyze_reading).transpose()
    }

    /// Present only when both readings are.
    pub fn combined_analysis(&self) -> Result<Option<CombinedAnalysis>, StatsError> {
        match (self.birth_analysis()?, self.current_analysis()?) {
            (Some(birth), Some(current)) => {
                analyze_combined(&birth.counts, &current.counts).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Particle sets for the helix; `None` until both readings exist.
    pub fn helix_inputs(&self) -> Result<Option<HelixInputs>, StatsError> {
        match (self.birth_analysis()?, self.current_analysis()?) {
            (Some(birth), Some(current)) => {
                Ok(Some(HelixInputs::from_stats(&birth.stats, &current.stats)))
            }
            _ => Ok(None),
        }
    }
}

/// Session-level errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    Reading(ReadingError),
    Converter(ConverterError),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading(err) => write!(f, "{err}"),
            Self::Converter(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reading(err) => Some(err),
            Self::Converter(err) => Some(err),
        }
    }
}

impl From<ReadingError> for SessionError {
    fn from(value: ReadingError) -> Self {
        Self::Reading(value)
    }
}

impl From<ConverterError> for SessionError {
    fn from(value: ConverterError) -> Self {
        Self::Converter(value)
    }
}

/// Use-case service wrapper for birth/current readings.
pub struct ReadingService<C: CalendarConverter> {
    converter: C,
    state: RwLock<Arc<SessionSnapshot>>,
}

impl<C: CalendarConverter> ReadingService<C> {
    /// Creates an empty session using the provided converter.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            state: RwLock::new(Arc::new(SessionSnapshot::default())),
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Current snapshot of both readings.
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.state.read().clone()
    }

    /// Converts and stores the birth reading.
    ///
    /// # Contract
    /// - The instant is validated before it reaches the converter.
    /// - On error the previous birth reading is kept.
    pub fn set_birth(&self, instant: BirthInstant) -> Result<Arc<Reading>, SessionError> {
        let reading = self.convert(&instant, "birth")?;
        self.replace(|snapshot| snapshot.birth = Some(Arc::clone(&reading)));
        info!("event=birth_set module=service status=ok");
        debug!("event=birth_set module=service pillars=\"{reading}\"");
        Ok(reading)
    }

    /// Clears the birth reading; downstream views hide their content.
    pub fn clear_birth(&self) {
        self.replace(|snapshot| snapshot.birth = None);
        info!("event=birth_cleared module=service status=ok");
    }

    /// Converts `instant` into the current reading.
    pub fn refresh_current_at(&self, instant: BirthInstant) -> Result<Arc<Reading>, SessionError> {
        let reading = self.convert(&instant, "current")?;
        self.replace(|snapshot| snapshot.current = Some(Arc::clone(&reading)));
        Ok(reading)
    }

    /// Refreshes the current reading from `source`.
    pub fn refresh_current(
        &self,
        source: &dyn InstantSource,
    ) -> Result<Arc<Reading>, SessionError> {
        let instant = source.now()?;
        self.refresh_current_at(instant)
    }

    fn convert(&self, instant: &BirthInstant, kind: &str) -> Result<Arc<Reading>, SessionError> {
        instant.validate()?;
        self.converter
            .to_reading(instant)
            .map(Arc::new)
            .map_err(|err| {
                warn!(
                    "event=reading_convert module=service status=error kind={kind} error={err}"
                );
                SessionError::from(err)
            })
    }

    fn replace(&self, update: impl FnOnce(&mut SessionSnapshot)) {
        let mut guard = self.state.write();
        let mut next = (**guard).clone();
        update(&mut next);
        *guard = Arc::new(next);
    }
}

#[cfg(test)]
mod tests {
    use super::{ReadingService, SessionConfig, SessionError};
    use crate::model::reading::{BirthInstant, ReadingError};
    use crate::service::converter::{ConverterError, PrecomputedConverter};
    use std::sync::Arc;
    use std::time::Duration;

    fn service() -> (ReadingService<PrecomputedConverter>, BirthInstant, BirthInstant) {
        let birth = BirthInstant::new(1990, 5, 17, 8).expect("birth");
        let now = BirthInstant::new(2024, 6, 1, 10).expect("now");
        let mut converter = PrecomputedConverter::new();
        converter
            .insert(birth, "庚午 辛巳 庚辰 庚辰", "")
            .expect("birth entry");
        converter
            .insert(now, "甲辰 庚午 乙卯 辛巳", "")
            .expect("now entry");
        (ReadingService::new(converter), birth, now)
    }

    #[test]
    fn default_refresh_interval_is_one_minute() {
        assert_eq!(
            SessionConfig::default().refresh_interval(),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn combined_requires_both_readings() {
        let (service, birth, now) = service();
        assert!(service
            .snapshot()
            .combined_analysis()
            .expect("empty")
            .is_none());

        service.set_birth(birth).expect("birth");
        assert!(service.snapshot().birth_analysis().expect("birth").is_some());
        assert!(service.snapshot().helix_inputs().expect("inputs").is_none());

        service.refresh_current_at(now).expect("current");
        let combined = service
            .snapshot()
            .combined_analysis()
            .expect("scored")
            .expect("both present");
        let total: u32 = combined.rows.iter().map(|row| row.count).sum();
        assert_eq!(total, 16);

        let inputs = service
            .snapshot()
            .helix_inputs()
            .expect("scored")
            .expect("both present");
        assert_eq!(inputs.innate.len(), 8);
        assert_eq!(inputs.current.len(), 8);
    }

    #[test]
    fn snapshots_are_replaced_not_mutated() {
        let (service, birth, now) = service();
        service.set_birth(birth).expect("birth");
        let before = service.snapshot();
        service.refresh_current_at(now).expect("current");
        let after = service.snapshot();

        assert!(before.current.is_none());
        assert!(Arc::ptr_eq(
            before.birth.as_ref().expect("birth"),
            after.birth.as_ref().expect("birth")
        ));
    }

    #[test]
    fn clear_birth_hides_birth_derived_views() {
        let (service, birth, now) = service();
        service.set_birth(birth).expect("birth");
        service.refresh_current_at(now).expect("current");
        service.clear_birth();

        let snapshot = service.snapshot();
        assert!(snapshot.birth.is_none());
        assert!(snapshot.combined_analysis().expect("scored").is_none());
        assert!(snapshot.current_analysis().expect("scored").is_some());
    }

    #[test]
    fn failed_conversion_keeps_previous_reading() {
        let (service, birth, _) = service();
        service.set_birth(birth).expect("birth");
        let unknown = BirthInstant::new(2001, 1, 1, 0).expect("instant");

        let err = service.set_birth(unknown).expect_err("not in table");
        assert_eq!(
            err,
            SessionError::Converter(ConverterError::Unsupported(unknown))
        );
        assert_eq!(
            service.snapshot().birth.as_ref().expect("kept").to_string(),
            "庚午 辛巳 庚辰 庚辰"
        );
    }

    #[test]
    fn invalid_instant_never_reaches_converter() {
        let (service, _, _) = service();
        let invalid = BirthInstant {
            year: 2100,
            month: 2,
            day: 29,
            hour: 0,
        };
        assert!(matches!(
            service.set_birth(invalid),
            Err(SessionError::Reading(ReadingError::InvalidInstant(_)))
        ));
    }
}
