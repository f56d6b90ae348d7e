//! Elemental statistics engine.
//!
//! # Responsibility
//! - Reduce readings to per-category counts.
//! - Score distributions against the uniform ideal, singly and combined.
//!
//! # Invariants
//! - Every function here is pure and synchronous.
//! - Scoring never substitutes defaults for malformed totals.

pub mod analysis;
pub mod combine;
pub mod count;
pub mod imbalance;
