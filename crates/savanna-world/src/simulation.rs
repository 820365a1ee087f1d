//! Tick scheduler and the owned simulation state.

use std::collections::HashSet;
use std::fmt;

use savanna_core::{Coord, Entity, EntityKind, Error, Result, SimConfig};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::grid::Grid;
use crate::rng::RandomSource;

/// The one owned, mutable simulation. All external access goes through
/// [`Simulation::initialize`] and [`Simulation::step`]; the grid is never
/// handed out for direct mutation.
pub struct Simulation {
    pub(crate) config: SimConfig,
    pub(crate) grid: Grid,
    pub(crate) rng: Box<dyn RandomSource>,
    /// Coordinates created or moved into during the current tick. The
    /// traversal consults this at visit time, so an entity placed ahead
    /// of the cursor is skipped for the rest of the tick, while one
    /// placed behind it was simply already passed.
    pub(crate) touched: HashSet<Coord>,
    pub(crate) tick: u64,
}

impl Simulation {
    /// A simulation over an all-empty grid of the configured size.
    pub fn new(config: SimConfig, rng: Box<dyn RandomSource>) -> Self {
        let grid = Grid::new(config.size);
        Self {
            config,
            grid,
            rng,
            touched: HashSet::new(),
            tick: 0,
        }
    }

    /// Reset the grid and repopulate it by random placement.
    ///
    /// Rejects the whole call with [`Error::InvalidEntityCount`] when the
    /// request exceeds grid capacity, before any placement happens, and
    /// with [`Error::PlacementExhausted`] when placement runs out of
    /// attempts. Either way the previous grid is kept: placement works on
    /// a fresh grid that is committed only on success.
    pub fn initialize(
        &mut self,
        plants: u32,
        herbivores: u32,
        carnivores: u32,
    ) -> Result<Snapshot> {
        let requested = plants as usize + herbivores as usize + carnivores as usize;
        let capacity = self.config.capacity();
        if requested > capacity {
            return Err(Error::InvalidEntityCount {
                requested,
                capacity,
            });
        }

        let initial = self.config.energy.initial;
        let mut grid = Grid::new(self.config.size);
        grid.scatter(Entity::plant(), plants, self.rng.as_mut())?;
        grid.scatter(Entity::herbivore(initial), herbivores, self.rng.as_mut())?;
        grid.scatter(Entity::carnivore(initial), carnivores, self.rng.as_mut())?;

        self.grid = grid;
        self.touched.clear();
        self.tick = 0;
        info!(
            plants,
            herbivores,
            carnivores,
            size = self.config.size,
            "simulation initialized"
        );
        Ok(self.snapshot())
    }

    /// Advance exactly one tick: one row-major pass over every cell,
    /// applying the matching rule to each occupied cell not already
    /// touched this tick. The touched set is discarded at tick end.
    pub fn step(&mut self) -> Snapshot {
        self.touched.clear();
        let size = self.grid.size();
        for row in 0..size {
            for col in 0..size {
                let at = Coord::new(row, col);
                if self.touched.contains(&at) {
                    continue;
                }
                self.apply_rule(at);
            }
        }
        self.tick += 1;

        let census = self.census();
        debug!(
            tick = self.tick,
            plants = census.plants,
            herbivores = census.herbivores,
            carnivores = census.carnivores,
            "tick complete"
        );
        self.snapshot()
    }

    /// The current grid as rows of cells.
    pub fn snapshot(&self) -> Snapshot {
        let size = self.grid.size();
        let rows = (0..size)
            .map(|row| {
                (0..size)
                    .map(|col| *self.grid.get(Coord::new(row, col)))
                    .collect()
            })
            .collect();
        Snapshot { rows }
    }

    /// Read-only view of the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Population counts per kind.
    pub fn census(&self) -> Census {
        Census {
            plants: self.grid.count(EntityKind::Plant),
            herbivores: self.grid.count(EntityKind::Herbivore),
            carnivores: self.grid.count(EntityKind::Carnivore),
        }
    }

    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Ticks completed since the last initialize.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[cfg(test)]
    pub(crate) fn with_grid(config: SimConfig, grid: Grid, rng: Box<dyn RandomSource>) -> Self {
        Self {
            config,
            grid,
            rng,
            touched: HashSet::new(),
            tick: 0,
        }
    }
}

/// Serializable view of the grid: `size` rows of `size` cells, each cell
/// carrying its type tag, energy, and age. Serializes as a bare array of
/// arrays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    rows: Vec<Vec<Entity>>,
}

impl Snapshot {
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, col: usize) -> &Entity {
        &self.rows[row][col]
    }

    pub fn rows(&self) -> &[Vec<Entity>] {
        &self.rows
    }

    /// All cells with their coordinates, row-major.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Entity)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, e)| (Coord::new(row, col), e))
        })
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for (_, cell) in self.iter() {
            match cell.kind {
                EntityKind::Empty => {}
                EntityKind::Plant => census.plants += 1,
                EntityKind::Herbivore => census.herbivores += 1,
                EntityKind::Carnivore => census.carnivores += 1,
            }
        }
        census
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for cell in row {
                write!(f, "{}", cell.kind.glyph())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Population counts per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Census {
    pub plants: usize,
    pub herbivores: usize,
    pub carnivores: usize,
}

impl Census {
    pub fn total(&self) -> usize {
        self.plants + self.herbivores + self.carnivores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SeededRandom;
    use proptest::prelude::*;

    fn seeded_sim(config: SimConfig, seed: u64) -> Simulation {
        Simulation::new(config, Box::new(SeededRandom::seeded(seed)))
    }

    #[test]
    fn test_step_on_empty_grid_is_idempotent() {
        let mut sim = seeded_sim(SimConfig::default(), 1);
        for _ in 0..5 {
            let snapshot = sim.step();
            assert_eq!(snapshot.census().total(), 0);
            for (_, cell) in snapshot.iter() {
                assert_eq!(*cell, Entity::EMPTY);
            }
        }
    }

    #[test]
    fn test_initialize_places_requested_populations() {
        let mut sim = seeded_sim(SimConfig::default(), 2);
        let snapshot = sim.initialize(20, 10, 5).unwrap();

        let census = snapshot.census();
        assert_eq!(census.plants, 20);
        assert_eq!(census.herbivores, 10);
        assert_eq!(census.carnivores, 5);

        for (_, cell) in snapshot.iter() {
            assert_eq!(cell.age, 0);
            match cell.kind {
                EntityKind::Plant | EntityKind::Empty => assert_eq!(cell.energy, 0),
                EntityKind::Herbivore | EntityKind::Carnivore => assert_eq!(cell.energy, 100),
            }
        }
    }

    #[test]
    fn test_initialize_again_resets_all_state() {
        let mut sim = seeded_sim(SimConfig::default(), 3);
        sim.initialize(40, 20, 10).unwrap();
        for _ in 0..8 {
            sim.step();
        }
        assert!(sim.tick() > 0);

        let snapshot = sim.initialize(1, 1, 1).unwrap();
        assert_eq!(sim.tick(), 0);
        assert_eq!(snapshot.census().total(), 3);
        for (_, cell) in snapshot.iter() {
            assert_eq!(cell.age, 0);
            if cell.is_empty() {
                assert_eq!(*cell, Entity::EMPTY);
            }
        }
    }

    #[test]
    fn test_initialize_at_exact_capacity() {
        let mut sim = seeded_sim(SimConfig::with_size(4), 4);
        let snapshot = sim.initialize(16, 0, 0).unwrap();
        assert_eq!(snapshot.census().plants, 16);
    }

    #[test]
    fn test_initialize_over_capacity_is_rejected() {
        let mut sim = seeded_sim(SimConfig::with_size(4), 5);
        let err = sim.initialize(17, 0, 0).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidEntityCount {
                requested: 17,
                capacity: 16,
            }
        );

        // Mixed populations count toward the same cap.
        let err = sim.initialize(10, 5, 2).unwrap_err();
        assert_eq!(
            err,
            Error::InvalidEntityCount {
                requested: 17,
                capacity: 16,
            }
        );
    }

    #[test]
    fn test_failed_initialize_keeps_the_previous_grid() {
        let mut sim = seeded_sim(SimConfig::with_size(4), 6);
        sim.initialize(2, 1, 0).unwrap();

        assert!(sim.initialize(17, 0, 0).is_err());
        let census = sim.census();
        assert_eq!(census.plants, 2);
        assert_eq!(census.herbivores, 1);
    }

    #[test]
    fn test_plant_lifespan_boundary() {
        // With reproduction off, a lone plant ages one tick per step. It
        // survives the step where its age reaches the cap and is cleared
        // by the step that observes it there.
        let mut config = SimConfig::default();
        config.plant.reproduction_probability = 0.0;

        let mut sim = Simulation::new(config, Box::new(SeededRandom::seeded(7)));
        sim.initialize(1, 0, 0).unwrap();

        for expected_age in 1..=10 {
            let snapshot = sim.step();
            assert_eq!(snapshot.census().plants, 1);
            let (_, plant) = snapshot
                .iter()
                .find(|(_, cell)| cell.kind == EntityKind::Plant)
                .unwrap();
            assert_eq!(plant.age, expected_age);
        }

        let snapshot = sim.step();
        assert_eq!(snapshot.census().total(), 0);
    }

    #[test]
    fn test_movement_alone_preserves_the_census() {
        let mut config = SimConfig::default();
        config.herbivore.reproduction_probability = 0.0;
        config.herbivore.move_probability = 1.0;

        let mut sim = Simulation::new(config, Box::new(SeededRandom::seeded(8)));
        sim.initialize(0, 10, 0).unwrap();

        // Movers spend 5 energy per relocation, so ten steps cannot
        // starve anyone; relocation must never change the head count.
        for _ in 0..10 {
            let snapshot = sim.step();
            assert_eq!(snapshot.census().herbivores, 10);
        }
    }

    #[test]
    fn test_snapshot_wire_shape() {
        let mut sim = seeded_sim(SimConfig::with_size(2), 9);
        sim.initialize(1, 0, 0).unwrap();

        let json = serde_json::to_value(sim.snapshot()).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row.as_array().unwrap().len(), 2);
        }

        let tags: Vec<&str> = rows
            .iter()
            .flat_map(|row| row.as_array().unwrap())
            .map(|cell| cell["type"].as_str().unwrap())
            .collect();
        assert_eq!(tags.iter().filter(|t| **t == "P").count(), 1);
        assert_eq!(tags.iter().filter(|t| **t == " ").count(), 3);
    }

    #[test]
    fn test_snapshot_display_renders_glyphs() {
        let mut sim = seeded_sim(SimConfig::with_size(3), 10);
        sim.initialize(0, 0, 1).unwrap();
        let rendered = sim.snapshot().to_string();
        assert_eq!(rendered.matches('C').count(), 1);
        assert_eq!(rendered.lines().count(), 3);
    }

    proptest! {
        #[test]
        fn prop_grid_shape_and_sentinel_hold(
            seed in any::<u64>(),
            plants in 0u32..60,
            herbivores in 0u32..30,
            carnivores in 0u32..15,
            steps in 1usize..25,
        ) {
            let mut sim = seeded_sim(SimConfig::default(), seed);
            sim.initialize(plants, herbivores, carnivores).unwrap();

            for _ in 0..steps {
                let snapshot = sim.step();
                prop_assert_eq!(snapshot.size(), 15);
                for row in snapshot.rows() {
                    prop_assert_eq!(row.len(), 15);
                }
                for (_, cell) in snapshot.iter() {
                    if cell.is_empty() {
                        prop_assert_eq!(cell.energy, 0);
                        prop_assert_eq!(cell.age, 0);
                    }
                }
            }
        }

        #[test]
        fn prop_plants_never_carry_energy(
            seed in any::<u64>(),
            plants in 1u32..80,
            steps in 1usize..15,
        ) {
            let mut sim = seeded_sim(SimConfig::default(), seed);
            sim.initialize(plants, 0, 0).unwrap();

            for _ in 0..steps {
                let snapshot = sim.step();
                for (_, cell) in snapshot.iter() {
                    if cell.kind == EntityKind::Plant {
                        prop_assert_eq!(cell.energy, 0);
                    }
                }
            }
        }
    }
}
