//! Simulation engine for the savanna ecosystem.
//!
//! The grid holds one entity per cell; [`Simulation::step`] advances the
//! world one tick by visiting every cell once in row-major order and
//! applying the rule for whatever lives there.

pub mod grid;
pub mod rng;
mod rules;
pub mod simulation;

pub use grid::Grid;
pub use rng::{RandomSource, SeededRandom};
pub use simulation::{Census, Simulation, Snapshot};
