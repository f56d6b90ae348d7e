use std::f64::consts::PI;
use std::time::Duration;
use wuxing_core::render::geometry::HelixGeometry;
use wuxing_core::render::layout::StrandSide;
use wuxing_core::{
    analyze_reading, CommandRecorder, DrawCommand, FrameOutcome, HelixInputs, HelixScene,
    Reading, RendererConfig, SurfaceSize, SvgCanvas,
};

fn inputs() -> HelixInputs {
    let innate = analyze_reading(&Reading::parse("甲寅 丙午 戊辰 庚子").expect("innate"))
        .expect("innate analysis");
    let current = analyze_reading(&Reading::parse("壬子 癸亥 辛酉 己未").expect("current"))
        .expect("current analysis");
    HelixInputs::from_stats(&innate.stats, &current.stats)
}

fn scene(width: f64) -> HelixScene {
    let config = RendererConfig::default();
    HelixScene {
        inputs: Some(inputs().into()),
        geometry: HelixGeometry::from_surface(config.surface_for_width(width)),
    }
}

#[test]
fn inputs_expand_one_particle_per_symbol() {
    let inputs = inputs();
    assert_eq!(inputs.innate.len(), 8);
    assert_eq!(inputs.current.len(), 8);
    assert!(inputs
        .innate
        .iter()
        .all(|particle| particle.side == StrandSide::Innate));
    assert!(inputs
        .current
        .iter()
        .all(|particle| particle.side == StrandSide::Current));
}

#[test]
fn layout_places_particles_inside_helix_band() {
    let config = RendererConfig::default();
    let frame = scene(600.0)
        .layout_at(&config, Duration::from_millis(2_500))
        .expect("drawable scene");
    let geometry = frame.geometry;

    for placed in frame.innate.iter().chain(frame.current.iter()) {
        assert!((placed.center.x - geometry.center_x).abs() <= geometry.amplitude + 1e-9);
        assert!(placed.center.y >= geometry.start_y);
        assert!(placed.center.y < geometry.start_y + geometry.length);
    }
}

#[test]
fn strands_mirror_each_other_around_center() {
    let config = RendererConfig::default();
    let frame = scene(600.0)
        .layout_at(&config, Duration::from_millis(777))
        .expect("drawable scene");
    let [innate, current] = &frame.strands;
    let center = frame.geometry.center_x;

    for (a, b) in innate.points.iter().zip(current.points.iter()) {
        assert!((a.y - b.y).abs() < 1e-9);
        assert!(((a.x - center) + (b.x - center)).abs() < 1e-9);
    }
    assert!((StrandSide::Current.phase() - StrandSide::Innate.phase() - PI).abs() < 1e-12);
}

#[test]
fn frame_is_a_full_redraw_with_fixed_command_count() {
    let mut recorder = CommandRecorder::new();
    let outcome = scene(600.0).render(&RendererConfig::default(), Duration::ZERO, &mut recorder);
    assert_eq!(outcome, FrameOutcome::Drawn);

    let commands = recorder.commands();
    // background + 2 strands + 8 innate * 3 + 8 current * 4
    assert_eq!(commands.len(), 3 + 24 + 32);
    assert!(matches!(commands[0], DrawCommand::Background { .. }));
}

#[test]
fn same_elapsed_time_renders_identical_frames() {
    let scene = scene(480.0);
    let config = RendererConfig::default();
    let mut first = CommandRecorder::new();
    let mut second = CommandRecorder::new();
    scene.render(&config, Duration::from_millis(1_234), &mut first);
    scene.render(&config, Duration::from_millis(1_234), &mut second);
    assert_eq!(first, second);

    let mut later = CommandRecorder::new();
    scene.render(&config, Duration::from_millis(9_000), &mut later);
    assert_ne!(first, later);
}

#[test]
fn draw_commands_serialize_with_op_tags() {
    let mut recorder = CommandRecorder::new();
    scene(600.0).render(&RendererConfig::default(), Duration::ZERO, &mut recorder);

    let json = serde_json::to_value(recorder.commands()).expect("serialize");
    assert_eq!(json[0]["op"], "background");
    assert_eq!(json[1]["op"], "polyline");
    assert_eq!(json[3]["op"], "fill_circle");
    assert_eq!(json[3]["fill"]["kind"], "radial");
}

#[test]
fn svg_snapshot_contains_every_particle() {
    let mut canvas = SvgCanvas::new(600.0, 400.0);
    scene(600.0).render(&RendererConfig::default(), Duration::ZERO, &mut canvas);
    let svg = canvas.finish();

    assert_eq!(svg.matches("<polyline").count(), 2);
    // 8 * 3 innate fills + 8 * 3 current fills + 8 rings
    assert_eq!(svg.matches("<circle").count(), 56);
    assert!(svg.contains("#001529"));
}

#[test]
fn empty_surface_skips_without_drawing() {
    let mut recorder = CommandRecorder::new();
    let scene = HelixScene {
        inputs: Some(inputs().into()),
        geometry: HelixGeometry::from_surface(SurfaceSize::new(0.0, 0.0)),
    };
    let outcome = scene.render(&RendererConfig::default(), Duration::ZERO, &mut recorder);
    assert!(matches!(outcome, FrameOutcome::Skipped(_)));
    assert!(recorder.commands().is_empty());
}
