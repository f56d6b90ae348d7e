//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate calendar conversion and analysis into session-level APIs.
//! - Keep UI/FFI layers decoupled from the calendar converter.

pub mod converter;
pub mod reading_service;
pub mod ticker;
