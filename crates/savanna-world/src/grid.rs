//! Entity grid and random placement.

use savanna_core::{Coord, Entity, EntityKind, Error, Result};

use crate::rng::RandomSource;

/// Placement attempt budget per entity, scaled by grid capacity.
const PLACEMENT_ATTEMPTS_PER_CELL: usize = 32;

/// A fixed square grid holding exactly one entity per cell, vacancies
/// included, stored row-major.
#[derive(Debug, Clone)]
pub struct Grid {
    size: usize,
    cells: Vec<Entity>,
}

impl Grid {
    /// An all-empty grid with the given side length.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Entity::EMPTY; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Entity at the coordinate. An out-of-bounds coordinate is a caller
    /// bug and aborts: the scheduler and the neighbor resolver only ever
    /// produce valid ones.
    pub fn get(&self, at: Coord) -> &Entity {
        let index = self.index_of(at);
        &self.cells[index]
    }

    pub(crate) fn get_mut(&mut self, at: Coord) -> &mut Entity {
        let index = self.index_of(at);
        &mut self.cells[index]
    }

    pub(crate) fn set(&mut self, at: Coord, entity: Entity) {
        *self.get_mut(at) = entity;
    }

    /// Number of cells holding the given kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.cells.iter().filter(|e| e.kind == kind).count()
    }

    /// All cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Entity)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, e)| (Coord::new(i / size, i % size), e))
    }

    /// Place `count` copies of a fresh entity by rejection sampling: draw
    /// uniform cells until one is empty. Attempts are bounded so a nearly
    /// full grid fails loudly instead of spinning.
    pub(crate) fn scatter(
        &mut self,
        fresh: Entity,
        count: u32,
        rng: &mut dyn RandomSource,
    ) -> Result<()> {
        let attempts = self.cells.len() * PLACEMENT_ATTEMPTS_PER_CELL;
        for _ in 0..count {
            let spot = (0..attempts)
                .map(|_| rng.cell(self.size))
                .find(|&at| self.get(at).is_empty())
                .ok_or(Error::PlacementExhausted {
                    kind: fresh.kind,
                    attempts,
                })?;
            self.set(spot, fresh);
        }
        Ok(())
    }

    fn index_of(&self, at: Coord) -> usize {
        assert!(
            at.row < self.size && at.col < self.size,
            "coordinate ({}, {}) outside {}x{} grid",
            at.row,
            at.col,
            self.size,
            self.size
        );
        at.row * self.size + at.col
    }
}
