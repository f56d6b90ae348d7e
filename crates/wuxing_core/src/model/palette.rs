//! Fixed display colors.

use crate::model::symbol::ElementCategory;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// 8-bit RGB with a unit-interval alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(0xff, 0xff, 0xff);
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Same color with alpha replaced.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Same color with an 8-bit alpha byte (`#rrggbbAA` style).
    pub fn with_alpha_byte(self, alpha: u8) -> Self {
        self.with_alpha(f32::from(alpha) / 255.0)
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Display for Rgba {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.a >= 1.0 {
            write!(f, "{}", self.hex())
        } else {
            write!(f, "rgba({}, {}, {}, {:.3})", self.r, self.g, self.b, self.a)
        }
    }
}

/// Top stop of the helix background gradient.
pub const BACKGROUND_TOP: Rgba = Rgba::rgb(0x00, 0x15, 0x29);
/// Bottom stop of the helix background gradient.
pub const BACKGROUND_BOTTOM: Rgba = Rgba::rgb(0x00, 0x21, 0x40);

/// Fixed color per category.
pub fn element_color(category: ElementCategory) -> Rgba {
    match category {
        ElementCategory::Wood => Rgba::rgb(0x52, 0xc4, 0x1a),
        ElementCategory::Fire => Rgba::rgb(0xf5, 0x22, 0x2d),
        ElementCategory::Earth => Rgba::rgb(0xd4, 0x88, 0x06),
        ElementCategory::Metal => Rgba::rgb(0xfa, 0xad, 0x14),
        ElementCategory::Water => Rgba::rgb(0x18, 0x90, 0xff),
    }
}
