//! Command-line front end for `wuxing_core`.
//!
//! # Responsibility
//! - Analyze pillar text without a Flutter host.
//! - Write helix frame snapshots as SVG for quick visual checks.

use clap::{Args, Parser, Subcommand, ValueHint};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use wuxing_core::render::animation::{HelixInputs, HelixScene};
use wuxing_core::render::geometry::HelixGeometry;
use wuxing_core::{
    analyze_combined, analyze_reading, init_stderr_logging, CombinedAnalysis, FrameOutcome,
    ImbalanceReport, Reading, ReadingAnalysis, RendererConfig, SvgCanvas,
};

type DynError = Box<dyn Error>;

type Result<T> = std::result::Result<T, DynError>;

#[derive(Parser)]
#[command(author, version, about = "Four Pillars elemental balance toolkit")]
struct Cli {
    /// Log level for stderr diagnostics (falls back to WUXING_LOG_LEVEL, then warn)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print core linkage info
    Ping,

    /// Print the element distribution and imbalance report of a reading
    Analyze(AnalyzeArgs),

    /// Render one helix frame to an SVG file
    Svg(SvgArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Innate reading, e.g. "甲子 丙寅 戊辰 庚午"
    innate: String,

    /// Current reading; adds the combined view over 16 symbols
    #[arg(long)]
    current: Option<String>,

    /// Emit JSON instead of a text table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct SvgArgs {
    /// Innate reading
    innate: String,

    /// Current reading
    current: String,

    /// Destination SVG file
    #[arg(long, short, value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Surface width in pixels
    #[arg(long, default_value_t = 600.0)]
    width: f64,

    /// Surface height in pixels; defaults to the renderer's surface height
    #[arg(long)]
    height: Option<f64>,

    /// Animation time of the snapshot in milliseconds
    #[arg(long, default_value_t = 0)]
    elapsed_ms: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_stderr_logging(cli.log_level.as_deref()) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Command::Ping => {
            println!("wuxing_core ping={}", wuxing_core::ping());
            println!("wuxing_core version={}", wuxing_core::core_version());
            Ok(())
        }
        Command::Analyze(args) => run_analyze(&args),
        Command::Svg(args) => run_svg(&args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let innate_reading = Reading::parse(&args.innate)?;
    let innate = analyze_reading(&innate_reading)?;
    let current = match &args.current {
        Some(text) => {
            let reading = Reading::parse(text)?;
            let analysis = analyze_reading(&reading)?;
            Some((reading, analysis))
        }
        None => None,
    };
    let combined = match &current {
        Some((_, analysis)) => Some(analyze_combined(&innate.counts, &analysis.counts)?),
        None => None,
    };

    if args.json {
        let payload = serde_json::json!({
            "innate": innate,
            "current": current.as_ref().map(|(_, analysis)| analysis),
            "combined": combined,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    print_reading("innate", &innate_reading, &innate);
    if let Some((reading, analysis)) = &current {
        println!();
        print_reading("current", reading, analysis);
    }
    if let Some(combined) = &combined {
        println!();
        print_combined(combined);
    }
    Ok(())
}

fn print_reading(title: &str, reading: &Reading, analysis: &ReadingAnalysis) {
    println!("[{title}] {reading}");
    let pairs = reading
        .element_pairs()
        .iter()
        .map(|(stem, branch)| format!("{}/{}", stem.glyph(), branch.glyph()))
        .collect::<Vec<_>>();
    println!("  elements  {}", pairs.join(" "));
    for stat in &analysis.stats {
        println!(
            "  {}  {:>2}  {:>3}%",
            stat.category.glyph(),
            stat.count,
            stat.percentage
        );
    }
    print_report(&analysis.report);
}

fn print_combined(combined: &CombinedAnalysis) {
    println!("[combined]");
    for row in &combined.rows {
        println!(
            "  {}  {:>2} + {:>2} = {:>2}  {:>3}%",
            row.category.glyph(),
            row.innate_count,
            row.current_count,
            row.count,
            row.percentage
        );
    }
    print_report(&combined.report);
}

fn print_report(report: &ImbalanceReport) {
    for deviation in &report.deviations {
        println!(
            "  {}  {:>+4}%  {}",
            deviation.category.glyph(),
            deviation.deviation_percent,
            deviation.status.label()
        );
    }
    println!(
        "  {}  (aggregate {}%)",
        report.overall_status.label(),
        report.aggregate_percent()
    );
}

fn run_svg(args: &SvgArgs) -> Result<()> {
    let innate = analyze_reading(&Reading::parse(&args.innate)?)?;
    let current = analyze_reading(&Reading::parse(&args.current)?)?;
    let config = RendererConfig::default();
    let surface = match args.height {
        Some(height) => wuxing_core::SurfaceSize::new(args.width, height),
        None => config.surface_for_width(args.width),
    };
    let geometry = HelixGeometry::from_surface(surface)
        .ok_or_else(|| format!("surface {}x{} is not drawable", surface.width, surface.height))?;
    let scene = HelixScene {
        inputs: Some(HelixInputs::from_stats(&innate.stats, &current.stats).into()),
        geometry: Some(geometry),
    };

    let mut canvas = SvgCanvas::new(surface.width, surface.height);
    match scene.render(&config, Duration::from_millis(args.elapsed_ms), &mut canvas) {
        FrameOutcome::Drawn => {
            fs::write(&args.output, canvas.finish())?;
            println!("wrote {}", args.output.display());
            Ok(())
        }
        FrameOutcome::Skipped(reason) => Err(format!("frame skipped: {reason:?}").into()),
    }
}
