//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};

/// What occupies a grid cell.
///
/// Serialized as the single-character tags the front end renders
/// (`" "`, `"P"`, `"H"`, `"C"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = " ")]
    Empty,
    #[serde(rename = "P")]
    Plant,
    #[serde(rename = "H")]
    Herbivore,
    #[serde(rename = "C")]
    Carnivore,
}

impl EntityKind {
    /// Single-character rendering, matching the wire tag.
    pub fn glyph(self) -> char {
        match self {
            EntityKind::Empty => ' ',
            EntityKind::Plant => 'P',
            EntityKind::Herbivore => 'H',
            EntityKind::Carnivore => 'C',
        }
    }
}

/// One grid cell's occupant. `Entity::EMPTY` is the vacant sentinel;
/// every cell holds exactly one `Entity` at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    pub energy: i32,
    pub age: u32,
}

impl Entity {
    /// The vacant-cell sentinel: zero energy, zero age.
    pub const EMPTY: Entity = Entity {
        kind: EntityKind::Empty,
        energy: 0,
        age: 0,
    };

    /// A freshly sprouted plant. Plants carry no energy.
    pub fn plant() -> Self {
        Self {
            kind: EntityKind::Plant,
            energy: 0,
            age: 0,
        }
    }

    /// A newborn herbivore with the given starting energy.
    pub fn herbivore(energy: i32) -> Self {
        Self {
            kind: EntityKind::Herbivore,
            energy,
            age: 0,
        }
    }

    /// A newborn carnivore with the given starting energy.
    pub fn carnivore(energy: i32) -> Self {
        Self {
            kind: EntityKind::Carnivore,
            energy,
            age: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == EntityKind::Empty
    }
}

/// A grid coordinate, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// In-bounds orthogonal neighbors on a `size` x `size` grid, at most
    /// four, in fixed order: down, up, right, left. No wraparound and no
    /// diagonals; cells on an edge simply have fewer neighbors.
    pub fn orthogonal(self, size: usize) -> impl Iterator<Item = Coord> {
        let Coord { row, col } = self;
        [
            (row + 1 < size).then(|| Coord::new(row + 1, col)),
            (row > 0).then(|| Coord::new(row - 1, col)),
            (col + 1 < size).then(|| Coord::new(row, col + 1)),
            (col > 0).then(|| Coord::new(row, col - 1)),
        ]
        .into_iter()
        .flatten()
    }
}
