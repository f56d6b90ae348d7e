//! Pure helix frame layout.
//!
//! # Responsibility
//! - Expand per-category stats into one particle per occurrence.
//! - Place strand samples and particles for a given phase value.
//!
//! # Invariants
//! - Layout is a pure function of geometry, particles and phase; there is no
//!   hidden random or clock state.
//! - Particle `i` of `n` sits at `progress = i / n` on its own strand.

use crate::model::palette::{element_color, Rgba};
use crate::model::symbol::ElementCategory;
use crate::render::geometry::HelixGeometry;
use crate::stats::count::ElementStat;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Guide curve spans 1.5 sine periods over the helix length.
const STRAND_WAVE: f64 = 3.0 * PI;
const RADIUS_BASE: f64 = 4.0;
const RADIUS_SCALE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which reading a strand or particle belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrandSide {
    Innate,
    Current,
}

impl StrandSide {
    /// Half-turn offset between the strands produces the crossing pattern.
    pub fn phase(self) -> f64 {
        match self {
            Self::Innate => 0.0,
            Self::Current => PI,
        }
    }
}

/// One elemental occurrence on a strand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub category: ElementCategory,
    /// Rounded percentage of the particle's category in its reading.
    pub weight_percent: u32,
    pub side: StrandSide,
    /// Position along the strand in `[0, 1)`.
    pub progress: f64,
}

impl Particle {
    /// Radius grows linearly with the rounded percentage weight.
    pub fn radius(&self) -> f64 {
        f64::from(self.weight_percent) / 100.0 * RADIUS_SCALE + RADIUS_BASE
    }

    pub fn color(&self) -> Rgba {
        element_color(self.category)
    }
}

/// Expands stats rows into `count` particles per row, evenly spaced.
pub fn expand_particles(stats: &[ElementStat], side: StrandSide) -> Vec<Particle> {
    let occurrences: Vec<(ElementCategory, u32)> = stats
        .iter()
        .flat_map(|stat| (0..stat.count).map(move |_| (stat.category, stat.percentage)))
        .collect();
    let total = occurrences.len();
    occurrences
        .into_iter()
        .enumerate()
        .map(|(index, (category, weight_percent))| Particle {
            category,
            weight_percent,
            side,
            progress: index as f64 / total as f64,
        })
        .collect()
}

/// A particle resolved to surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacedParticle {
    pub particle: Particle,
    pub center: Point,
    pub radius: f64,
}

/// Sampled guide curve for one strand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strand {
    pub side: StrandSide,
    pub points: Vec<Point>,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLayout {
    pub geometry: HelixGeometry,
    pub strands: [Strand; 2],
    pub innate: Vec<PlacedParticle>,
    pub current: Vec<PlacedParticle>,
}

/// Position on a strand: `x = cx + A·sin(3π·progress − ωt + phase)`.
pub fn strand_point(geometry: &HelixGeometry, side: StrandSide, progress: f64, phase: f64) -> Point {
    let x = geometry.center_x
        + (STRAND_WAVE * progress - phase + side.phase()).sin() * geometry.amplitude;
    let y = geometry.start_y + progress * geometry.length;
    Point::new(x, y)
}

/// Lays out strands and particles for phase `ωt`.
pub fn layout_frame(
    geometry: &HelixGeometry,
    samples: usize,
    innate: &[Particle],
    current: &[Particle],
    phase: f64,
) -> FrameLayout {
    let strand = |side: StrandSide| Strand {
        side,
        points: (0..samples)
            .map(|sample| strand_point(geometry, side, sample as f64 / samples as f64, phase))
            .collect(),
    };
    let place = |particles: &[Particle]| -> Vec<PlacedParticle> {
        particles
            .iter()
            .map(|particle| PlacedParticle {
                particle: *particle,
                center: strand_point(geometry, particle.side, particle.progress, phase),
                radius: particle.radius(),
            })
            .collect()
    };

    FrameLayout {
        geometry: *geometry,
        strands: [strand(StrandSide::Innate), strand(StrandSide::Current)],
        innate: place(innate),
        current: place(current),
    }
}
