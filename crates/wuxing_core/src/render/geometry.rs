//! Surface size, helix geometry and renderer tuning.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const HELIX_LENGTH_RATIO: f64 = 0.8;
const HELIX_AMPLITUDE_RATIO: f64 = 0.125;
const HELIX_START_RATIO: f64 = 0.1;

/// Drawing surface dimensions in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Zero, negative or non-finite sizes happen during layout races.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Host-tunable renderer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Surface height used when the host only reports a container width.
    pub surface_height: f64,
    /// Delay between frames of the animation loop.
    pub frame_interval_ms: u64,
    /// Strand rotation in radians per elapsed millisecond.
    pub angular_rate: f64,
    /// Samples per strand guide curve.
    pub strand_samples: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_height: 400.0,
            frame_interval_ms: 16,
            angular_rate: 0.0002,
            strand_samples: 100,
        }
    }
}

impl RendererConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    /// Phase term `ωt` for an elapsed duration.
    pub fn phase_at(&self, elapsed: Duration) -> f64 {
        elapsed.as_secs_f64() * 1000.0 * self.angular_rate
    }

    /// Surface for a container of the given width at the configured height.
    pub fn surface_for_width(&self, width: f64) -> SurfaceSize {
        SurfaceSize::new(width, self.surface_height)
    }
}

/// Helix placement derived from the surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HelixGeometry {
    pub surface: SurfaceSize,
    pub center_x: f64,
    pub start_y: f64,
    pub length: f64,
    pub amplitude: f64,
}

impl HelixGeometry {
    /// Returns `None` for surfaces that cannot be drawn yet.
    pub fn from_surface(surface: SurfaceSize) -> Option<Self> {
        if !surface.is_drawable() {
            return None;
        }
        Some(Self {
            surface,
            center_x: surface.width / 2.0,
            start_y: surface.height * HELIX_START_RATIO,
            length: surface.height * HELIX_LENGTH_RATIO,
            amplitude: surface.width * HELIX_AMPLITUDE_RATIO,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{HelixGeometry, RendererConfig, SurfaceSize};
    use std::time::Duration;

    #[test]
    fn geometry_follows_surface_ratios() {
        let geometry =
            HelixGeometry::from_surface(SurfaceSize::new(800.0, 400.0)).expect("drawable");
        assert_eq!(geometry.center_x, 400.0);
        assert_eq!(geometry.start_y, 40.0);
        assert_eq!(geometry.length, 320.0);
        assert_eq!(geometry.amplitude, 100.0);
    }

    #[test]
    fn zero_sized_surface_has_no_geometry() {
        assert!(HelixGeometry::from_surface(SurfaceSize::new(0.0, 400.0)).is_none());
        assert!(HelixGeometry::from_surface(SurfaceSize::new(640.0, 0.0)).is_none());
        assert!(HelixGeometry::from_surface(SurfaceSize::new(f64::NAN, 400.0)).is_none());
    }

    #[test]
    fn phase_advances_with_elapsed_time() {
        let config = RendererConfig::default();
        assert_eq!(config.phase_at(Duration::ZERO), 0.0);
        assert!((config.phase_at(Duration::from_secs(5)) - 1.0).abs() < 1e-12);
    }
}
