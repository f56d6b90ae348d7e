//! Frame painting: layout -> draw commands.
//!
//! # Invariants
//! - Every frame starts with a full background clear; nothing is diffed.
//! - Paint order is background, innate strand, current strand, innate
//!   particles, current particles.

use crate::model::palette::{Rgba, BACKGROUND_BOTTOM, BACKGROUND_TOP};
use crate::render::canvas::{Canvas, ColorStop, DrawCommand, Fill, Shadow};
use crate::render::layout::{FrameLayout, PlacedParticle, Point, Strand, StrandSide};

const STRAND_WIDTH: f64 = 2.0;
const CURRENT_STRAND_DASH: [f64; 2] = [5.0, 5.0];
const RING_GAP: f64 = 2.0;
const RING_WIDTH: f64 = 2.0;
const GRADIENT_COLOR_OFFSET: f64 = 0.2;

/// Per-side particle styling.
struct ParticleStyle {
    shadow_blur: f64,
    highlight_alpha: f32,
    glow_scale: f64,
    glow_alpha: u8,
    ring: bool,
}

fn particle_style(side: StrandSide) -> ParticleStyle {
    match side {
        StrandSide::Innate => ParticleStyle {
            shadow_blur: 10.0,
            highlight_alpha: 0.4,
            glow_scale: 2.0,
            glow_alpha: 0x22,
            ring: false,
        },
        StrandSide::Current => ParticleStyle {
            shadow_blur: 15.0,
            highlight_alpha: 0.5,
            glow_scale: 2.5,
            glow_alpha: 0x33,
            ring: true,
        },
    }
}

/// Paints a laid-out frame onto `canvas`.
pub fn paint_frame(frame: &FrameLayout, canvas: &mut impl Canvas) {
    let surface = frame.geometry.surface;
    canvas.draw(DrawCommand::Background {
        width: surface.width,
        height: surface.height,
        stops: vec![
            ColorStop::new(0.0, BACKGROUND_TOP),
            ColorStop::new(1.0, BACKGROUND_BOTTOM),
        ],
    });

    for strand in &frame.strands {
        paint_strand(strand, canvas);
    }
    for placed in frame.innate.iter().chain(frame.current.iter()) {
        paint_particle(placed, canvas);
    }
}

fn paint_strand(strand: &Strand, canvas: &mut impl Canvas) {
    let (alpha, dash) = match strand.side {
        StrandSide::Innate => (0.3, Vec::new()),
        StrandSide::Current => (0.2, CURRENT_STRAND_DASH.to_vec()),
    };
    canvas.draw(DrawCommand::Polyline {
        points: strand.points.clone(),
        color: Rgba::WHITE.with_alpha(alpha),
        width: STRAND_WIDTH,
        dash,
    });
}

fn paint_particle(placed: &PlacedParticle, canvas: &mut impl Canvas) {
    let style = particle_style(placed.particle.side);
    let color = placed.particle.color();
    let center = placed.center;
    let radius = placed.radius;
    let shadow = Some(Shadow {
        blur: style.shadow_blur,
        color,
    });
    let highlight = Point::new(center.x - radius / 3.0, center.y - radius / 3.0);

    if style.ring {
        canvas.draw(DrawCommand::StrokeCircle {
            center,
            radius: radius + RING_GAP,
            color: Rgba::WHITE,
            width: RING_WIDTH,
            shadow,
        });
    }

    canvas.draw(DrawCommand::FillCircle {
        center,
        radius,
        fill: Fill::Radial {
            focus: highlight,
            center,
            radius,
            stops: vec![
                ColorStop::new(0.0, Rgba::WHITE),
                ColorStop::new(GRADIENT_COLOR_OFFSET, color),
                ColorStop::new(1.0, color),
            ],
        },
        shadow,
    });

    canvas.draw(DrawCommand::FillCircle {
        center: highlight,
        radius: radius / 4.0,
        fill: Fill::Solid {
            color: Rgba::WHITE.with_alpha(style.highlight_alpha),
        },
        shadow,
    });

    let glow_radius = radius * style.glow_scale;
    canvas.draw(DrawCommand::FillCircle {
        center,
        radius: glow_radius,
        fill: Fill::Radial {
            focus: center,
            center,
            radius: glow_radius,
            stops: vec![
                ColorStop::new(0.0, color.with_alpha_byte(style.glow_alpha)),
                ColorStop::new(1.0, Rgba::TRANSPARENT),
            ],
        },
        shadow,
    });
}

#[cfg(test)]
mod tests {
    use super::paint_frame;
    use crate::model::palette::Rgba;
    use crate::model::symbol::ElementCategory;
    use crate::render::canvas::{CommandRecorder, DrawCommand, Fill};
    use crate::render::geometry::{HelixGeometry, SurfaceSize};
    use crate::render::layout::{expand_particles, layout_frame, StrandSide};
    use crate::stats::count::ElementCount;

    fn recorded(innate_count: u32, current_count: u32) -> Vec<DrawCommand> {
        let geometry =
            HelixGeometry::from_surface(SurfaceSize::new(600.0, 400.0)).expect("drawable");
        let innate = expand_particles(
            &ElementCount::from_pairs([(ElementCategory::Wood, innate_count)]).stats(),
            StrandSide::Innate,
        );
        let current = expand_particles(
            &ElementCount::from_pairs([(ElementCategory::Water, current_count)]).stats(),
            StrandSide::Current,
        );
        let frame = layout_frame(&geometry, 100, &innate, &current, 0.5);
        let mut recorder = CommandRecorder::new();
        paint_frame(&frame, &mut recorder);
        recorder.into_commands()
    }

    #[test]
    fn frame_starts_with_background_then_strands() {
        let commands = recorded(1, 1);
        assert!(matches!(commands[0], DrawCommand::Background { width, height, .. } if width == 600.0 && height == 400.0));
        match (&commands[1], &commands[2]) {
            (
                DrawCommand::Polyline { dash: solid, .. },
                DrawCommand::Polyline { dash: dashed, .. },
            ) => {
                assert!(solid.is_empty());
                assert_eq!(dashed, &vec![5.0, 5.0]);
            }
            other => panic!("unexpected strand commands: {other:?}"),
        }
    }

    #[test]
    fn current_particles_carry_white_ring() {
        // innate: fill + highlight + glow; current: ring + fill + highlight + glow.
        let commands = recorded(2, 3);
        assert_eq!(commands.len(), 3 + 2 * 3 + 3 * 4);
        let rings: Vec<_> = commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::StrokeCircle { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(rings, vec![Rgba::WHITE; 3]);
    }

    #[test]
    fn particle_fill_fades_from_white_to_category_color() {
        let commands = recorded(1, 0);
        let fill = commands.iter().find_map(|command| match command {
            DrawCommand::FillCircle {
                fill: Fill::Radial { stops, focus, center, .. },
                ..
            } if focus != center => Some(stops.clone()),
            _ => None,
        });
        let stops = fill.expect("particle gradient");
        assert_eq!(stops[0].color, Rgba::WHITE);
        assert_eq!(stops[2].color.hex(), "#52c41a");
    }
}
