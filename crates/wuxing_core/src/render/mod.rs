//! Dual-helix particle renderer.
//!
//! # Responsibility
//! - Turn two already-computed stats lists into animated helix frames.
//! - Keep layout pure and testable; keep scheduling in `animation`.
//!
//! # Invariants
//! - The renderer never computes statistics; it only consumes stats rows.
//! - Innate particles ride the phase-0 strand, current particles the phase-π one.

pub mod animation;
pub mod canvas;
pub mod geometry;
pub mod layout;
pub mod paint;
pub mod svg;
