//! Drawing surface contract.
//!
//! # Responsibility
//! - Describe one frame as an ordered list of `DrawCommand`s.
//! - Let hosts replay commands on their own surface (Flutter painter, SVG).
//!
//! # Invariants
//! - Commands are self-contained: no command depends on state left behind
//!   by a previous one (shadow and dash are per-command).

use crate::model::palette::Rgba;
use crate::render::layout::Point;
use serde::{Deserialize, Serialize};

/// One gradient color stop, `offset` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

impl ColorStop {
    pub fn new(offset: f64, color: Rgba) -> Self {
        Self { offset, color }
    }
}

/// Fill paint for circles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fill {
    Solid {
        color: Rgba,
    },
    /// Two-circle radial gradient from `(focus, 0)` to `(center, radius)`.
    Radial {
        focus: Point,
        center: Point,
        radius: f64,
        stops: Vec<ColorStop>,
    },
}

/// Blurred drop shadow drawn under a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub blur: f64,
    pub color: Rgba,
}

/// Primitive drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Fills the whole surface with a top-to-bottom gradient.
    Background {
        width: f64,
        height: f64,
        stops: Vec<ColorStop>,
    },
    Polyline {
        points: Vec<Point>,
        color: Rgba,
        width: f64,
        /// Dash pattern; empty for solid lines.
        dash: Vec<f64>,
    },
    FillCircle {
        center: Point,
        radius: f64,
        fill: Fill,
        shadow: Option<Shadow>,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        color: Rgba,
        width: f64,
        shadow: Option<Shadow>,
    },
}

/// Target that executes draw commands.
pub trait Canvas {
    fn draw(&mut self, command: DrawCommand);
}

/// Collects commands for later replay or serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Canvas for CommandRecorder {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
