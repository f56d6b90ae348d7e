//! Symbol and reading domain model.
//!
//! # Responsibility
//! - Define the closed stem/branch/element enumerations.
//! - Define pillars, readings and instants exchanged with the calendar boundary.
//!
//! # Invariants
//! - Symbol -> element lookup is total and fixed for the process lifetime.
//! - A reading always has four pillars and eight symbols.

pub mod palette;
pub mod reading;
pub mod symbol;
