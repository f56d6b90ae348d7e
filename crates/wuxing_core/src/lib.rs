//! Core domain logic for the Four Pillars elemental view.
//! This crate is the single source of truth for scoring invariants and
//! helix layout; hosts only supply calendar conversion and a drawing surface.

pub mod logging;
pub mod model;
pub mod render;
pub mod service;
pub mod stats;

pub use logging::{default_log_level, init_logging, init_stderr_logging, logging_status, LogTarget};
pub use model::reading::{BirthInstant, Pillar, PillarSlot, Reading, ReadingError};
pub use model::symbol::{element_of, Branch, ElementCategory, Stem, Symbol, SymbolError};
pub use render::animation::{FrameClock, FrameOutcome, HelixInputs, HelixScene, HelixView};
pub use render::canvas::{Canvas, CommandRecorder, DrawCommand};
pub use render::geometry::{RendererConfig, SurfaceSize};
pub use render::svg::SvgCanvas;
pub use service::converter::{CalendarConverter, ConverterError, InstantSource, LocalClock};
pub use service::reading_service::{ReadingService, SessionConfig, SessionError, SessionSnapshot};
pub use service::ticker::CurrentReadingTicker;
pub use stats::analysis::{analyze_combined, analyze_reading, CombinedAnalysis, ReadingAnalysis};
pub use stats::count::{reduce, ElementCount, ElementStat};
pub use stats::imbalance::{
    score, DeviationResult, DeviationStatus, ImbalanceReport, OverallStatus, Severity, StatsError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
