//! Error types for the simulation.

use crate::types::EntityKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested population does not fit on the grid. Raised before
    /// any placement is attempted; the previous grid is left untouched.
    #[error("requested {requested} entities but the grid holds at most {capacity}")]
    InvalidEntityCount { requested: usize, capacity: usize },

    /// Random placement failed to hit an empty cell within its attempt
    /// budget. Placement must terminate rather than loop on a full grid.
    #[error("no empty cell found for {kind:?} after {attempts} placement attempts")]
    PlacementExhausted { kind: EntityKind, attempts: usize },
}
