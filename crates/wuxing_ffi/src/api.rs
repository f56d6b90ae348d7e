//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level functions to Dart via FRB.
//! - Accept pillar text from the host-side calendar converter and return
//!   flat, display-ready envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures are reported through `ok = false` plus a message; partial
//!   analyses are never returned.

use log::warn;
use std::time::Duration;
use wuxing_core::render::animation::{HelixInputs, HelixScene};
use wuxing_core::render::geometry::HelixGeometry;
use wuxing_core::{
    analyze_combined as analyze_combined_inner, analyze_reading,
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    CombinedAnalysis, CommandRecorder, FrameOutcome, ImbalanceReport, PillarSlot, Reading,
    ReadingAnalysis, RendererConfig, Severity, SurfaceSize, SvgCanvas,
};

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error|off` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One pillar as shown in the pillar table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PillarItem {
    /// `year|month|day|hour`.
    pub slot: String,
    /// Two glyphs, e.g. `甲子`.
    pub text: String,
    /// Stem and branch elements, e.g. `木/水`.
    pub elements: String,
}

/// One category of a single-reading distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementStatItem {
    /// Element glyph (`木|火|土|金|水`).
    pub element: String,
    pub count: u32,
    pub percentage: u32,
    /// `#rrggbb` display color.
    pub color: String,
}

/// One category deviation row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviationItem {
    pub element: String,
    /// Signed, rounded percentage points away from 20%.
    pub deviation_percent: i32,
    pub status: String,
    /// `success|warning|danger`.
    pub severity: String,
}

/// One category of the combined distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRowItem {
    pub element: String,
    pub innate_count: u32,
    pub current_count: u32,
    pub count: u32,
    pub percentage: u32,
    pub color: String,
}

/// Report fields shared by single and combined responses.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportItem {
    pub deviations: Vec<DeviationItem>,
    pub aggregate_percent: i32,
    pub overall_status: String,
    pub overall_severity: String,
}

/// Single-reading analysis envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingAnalysisResponse {
    pub ok: bool,
    pub message: String,
    pub pillars: Vec<PillarItem>,
    pub stats: Vec<ElementStatItem>,
    pub report: ReportItem,
}

impl ReadingAnalysisResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            pillars: Vec::new(),
            stats: Vec::new(),
            report: ReportItem::default(),
        }
    }
}

/// Combined innate + current analysis envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedAnalysisResponse {
    pub ok: bool,
    pub message: String,
    pub rows: Vec<CombinedRowItem>,
    pub report: ReportItem,
}

impl CombinedAnalysisResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            rows: Vec::new(),
            report: ReportItem::default(),
        }
    }
}

/// One rendered helix frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelixFrameResponse {
    pub ok: bool,
    pub message: String,
    /// False when the surface is empty; `payload` is then empty.
    pub drawn: bool,
    /// JSON draw commands or an SVG document, depending on the call.
    pub payload: String,
}

impl HelixFrameResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            drawn: false,
            payload: String::new(),
        }
    }

    fn skipped(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
            drawn: false,
            payload: String::new(),
        }
    }
}

/// Analyzes one four-pillar reading given as text (`甲子 丙寅 戊辰 庚午`).
///
/// # FFI contract
/// - Sync call, pure computation.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn analyze_pillars(text: String) -> ReadingAnalysisResponse {
    let reading = match Reading::parse(&text) {
        Ok(reading) => reading,
        Err(err) => return ReadingAnalysisResponse::failure(format!("analyze_pillars failed: {err}")),
    };
    match analyze_reading(&reading) {
        Ok(analysis) => to_reading_response(&reading, &analysis),
        Err(err) => ReadingAnalysisResponse::failure(format!("analyze_pillars failed: {err}")),
    }
}

/// Analyzes innate and current readings together over a fixed total of 16.
#[flutter_rust_bridge::frb(sync)]
pub fn analyze_combined(innate_text: String, current_text: String) -> CombinedAnalysisResponse {
    match combined(&innate_text, &current_text) {
        Ok(analysis) => CombinedAnalysisResponse {
            ok: true,
            message: "ok".to_string(),
            rows: analysis
                .rows
                .iter()
                .map(|row| CombinedRowItem {
                    element: row.category.glyph().to_string(),
                    innate_count: row.innate_count,
                    current_count: row.current_count,
                    count: row.count,
                    percentage: row.percentage,
                    color: wuxing_core::model::palette::element_color(row.category).hex(),
                })
                .collect(),
            report: to_report_item(&analysis.report),
        },
        Err(err) => CombinedAnalysisResponse::failure(format!("analyze_combined failed: {err}")),
    }
}

/// Renders one helix frame as a JSON draw-command list.
///
/// `height <= 0` uses the default surface height.
///
/// # FFI contract
/// - Sync call; pure layout, no animation thread is started.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn helix_frame(
    innate_text: String,
    current_text: String,
    width: f64,
    height: f64,
    elapsed_ms: u64,
) -> HelixFrameResponse {
    let scene = match scene_for(&innate_text, &current_text, width, height) {
        Ok(scene) => scene,
        Err(message) => return HelixFrameResponse::failure(format!("helix_frame failed: {message}")),
    };
    let mut recorder = CommandRecorder::new();
    match scene.render(
        &RendererConfig::default(),
        Duration::from_millis(elapsed_ms),
        &mut recorder,
    ) {
        FrameOutcome::Drawn => match serde_json::to_string(recorder.commands()) {
            Ok(payload) => HelixFrameResponse {
                ok: true,
                message: "ok".to_string(),
                drawn: true,
                payload,
            },
            Err(err) => HelixFrameResponse::failure(format!("helix_frame failed: {err}")),
        },
        FrameOutcome::Skipped(reason) => {
            HelixFrameResponse::skipped(format!("frame skipped: {reason:?}"))
        }
    }
}

/// Renders one helix frame as a standalone SVG document.
#[flutter_rust_bridge::frb(sync)]
pub fn helix_frame_svg(
    innate_text: String,
    current_text: String,
    width: f64,
    height: f64,
    elapsed_ms: u64,
) -> HelixFrameResponse {
    let scene = match scene_for(&innate_text, &current_text, width, height) {
        Ok(scene) => scene,
        Err(message) => {
            return HelixFrameResponse::failure(format!("helix_frame_svg failed: {message}"))
        }
    };
    let Some(geometry) = scene.geometry else {
        return HelixFrameResponse::skipped("frame skipped: EmptySurface");
    };
    let mut canvas = SvgCanvas::new(geometry.surface.width, geometry.surface.height);
    match scene.render(
        &RendererConfig::default(),
        Duration::from_millis(elapsed_ms),
        &mut canvas,
    ) {
        FrameOutcome::Drawn => HelixFrameResponse {
            ok: true,
            message: "ok".to_string(),
            drawn: true,
            payload: canvas.finish(),
        },
        FrameOutcome::Skipped(reason) => {
            HelixFrameResponse::skipped(format!("frame skipped: {reason:?}"))
        }
    }
}

fn combined(innate_text: &str, current_text: &str) -> Result<CombinedAnalysis, String> {
    let innate = analyze_text(innate_text)?;
    let current = analyze_text(current_text)?;
    analyze_combined_inner(&innate.counts, &current.counts).map_err(|err| err.to_string())
}

fn analyze_text(text: &str) -> Result<ReadingAnalysis, String> {
    let reading = Reading::parse(text).map_err(|err| err.to_string())?;
    analyze_reading(&reading).map_err(|err| err.to_string())
}

fn scene_for(
    innate_text: &str,
    current_text: &str,
    width: f64,
    height: f64,
) -> Result<HelixScene, String> {
    let innate = analyze_text(innate_text)?;
    let current = analyze_text(current_text)?;
    let config = RendererConfig::default();
    let surface = if height > 0.0 {
        SurfaceSize::new(width, height)
    } else {
        config.surface_for_width(width)
    };
    if !surface.is_drawable() {
        warn!(
            "event=helix_frame module=ffi status=skip width={} height={}",
            surface.width, surface.height
        );
    }
    Ok(HelixScene {
        inputs: Some(HelixInputs::from_stats(&innate.stats, &current.stats).into()),
        geometry: HelixGeometry::from_surface(surface),
    })
}

fn to_reading_response(reading: &Reading, analysis: &ReadingAnalysis) -> ReadingAnalysisResponse {
    let pillars = PillarSlot::ALL
        .iter()
        .map(|slot| {
            let pillar = reading.pillar(*slot);
            let (stem, branch) = pillar.elements();
            PillarItem {
                slot: slot_label(*slot).to_string(),
                text: pillar.to_string(),
                elements: format!("{}/{}", stem.glyph(), branch.glyph()),
            }
        })
        .collect();
    let stats = analysis
        .stats
        .iter()
        .map(|stat| ElementStatItem {
            element: stat.category.glyph().to_string(),
            count: stat.count,
            percentage: stat.percentage,
            color: wuxing_core::model::palette::element_color(stat.category).hex(),
        })
        .collect();
    ReadingAnalysisResponse {
        ok: true,
        message: "ok".to_string(),
        pillars,
        stats,
        report: to_report_item(&analysis.report),
    }
}

fn to_report_item(report: &ImbalanceReport) -> ReportItem {
    ReportItem {
        deviations: report
            .deviations
            .iter()
            .map(|deviation| DeviationItem {
                element: deviation.category.glyph().to_string(),
                deviation_percent: deviation.deviation_percent,
                status: deviation.status.label().to_string(),
                severity: severity_label(deviation.status.severity()).to_string(),
            })
            .collect(),
        aggregate_percent: report.aggregate_percent(),
        overall_status: report.overall_status.label().to_string(),
        overall_severity: severity_label(report.overall_status.severity()).to_string(),
    }
}

fn slot_label(slot: PillarSlot) -> &'static str {
    match slot {
        PillarSlot::Year => "year",
        PillarSlot::Month => "month",
        PillarSlot::Day => "day",
        PillarSlot::Hour => "hour",
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "success",
        Severity::Warning => "warning",
        Severity::Danger => "danger",
    }
}

#[cfg(test)]
mod tests {
    use super::{
        analyze_combined, analyze_pillars, core_version, helix_frame, helix_frame_svg,
        init_logging, ping,
    };

    const INNATE: &str = "甲子 丙寅 戊辰 庚午";
    const CURRENT: &str = "甲辰 庚午 乙卯 辛巳";

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn analyze_pillars_returns_complete_envelope() {
        let response = analyze_pillars(INNATE.to_string());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.pillars.len(), 4);
        assert_eq!(response.pillars[0].text, "甲子");
        assert_eq!(response.pillars[0].elements, "木/水");
        assert_eq!(response.stats.len(), 5);
        assert_eq!(response.stats.iter().map(|stat| stat.count).sum::<u32>(), 8);
        assert_eq!(response.report.deviations.len(), 5);
        assert!(!response.report.overall_status.is_empty());
    }

    #[test]
    fn analyze_pillars_reports_unknown_glyph() {
        let response = analyze_pillars("甲子 丙寅 戊辰 庚X".to_string());
        assert!(!response.ok);
        assert!(response.stats.is_empty());
        assert!(response.message.contains("analyze_pillars failed"));
    }

    #[test]
    fn analyze_combined_sums_to_sixteen() {
        let response = analyze_combined(INNATE.to_string(), CURRENT.to_string());
        assert!(response.ok, "{}", response.message);
        assert_eq!(response.rows.iter().map(|row| row.count).sum::<u32>(), 16);
        for row in &response.rows {
            assert_eq!(row.count, row.innate_count + row.current_count);
        }
    }

    #[test]
    fn helix_frame_serializes_draw_commands() {
        let response = helix_frame(INNATE.to_string(), CURRENT.to_string(), 600.0, 0.0, 1_000);
        assert!(response.ok, "{}", response.message);
        assert!(response.drawn);
        let commands: Vec<serde_json::Value> =
            serde_json::from_str(&response.payload).expect("payload is JSON");
        assert_eq!(commands[0]["op"], "background");
        assert_eq!(commands[0]["height"], 400.0);
    }

    #[test]
    fn helix_frame_skips_zero_width_surface() {
        let response = helix_frame(INNATE.to_string(), CURRENT.to_string(), 0.0, 400.0, 0);
        assert!(response.ok);
        assert!(!response.drawn);
        assert!(response.payload.is_empty());
    }

    #[test]
    fn helix_frame_svg_returns_document() {
        let response =
            helix_frame_svg(INNATE.to_string(), CURRENT.to_string(), 320.0, 400.0, 0);
        assert!(response.drawn, "{}", response.message);
        assert!(response.payload.starts_with("<svg"));
    }
}
