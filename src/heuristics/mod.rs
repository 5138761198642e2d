//! Heuristics module for route planning.
//!
//! This module exports the tour construction heuristics.

pub mod construction;

pub use construction::*;
