//! Per-type lifecycle rules, applied to one occupied cell per tick.
//!
//! Every rule runs the same phase sequence: death check, aging, feeding,
//! reproduction, movement. Each phase re-derives its candidate neighbors
//! from the current grid, since an earlier phase may have vacated or
//! filled cells the later phase cares about.

use savanna_core::{Coord, CreatureRules, Entity, EntityKind};

use crate::rng;
use crate::simulation::Simulation;

impl Simulation {
    /// Apply the rule matching whatever occupies `at`. Empty cells are
    /// left alone.
    pub(crate) fn apply_rule(&mut self, at: Coord) {
        match self.grid.get(at).kind {
            EntityKind::Empty => {}
            EntityKind::Plant => self.plant_rule(at),
            EntityKind::Herbivore => self.creature_rule(at, EntityKind::Herbivore),
            EntityKind::Carnivore => self.creature_rule(at, EntityKind::Carnivore),
        }
    }

    fn plant_rule(&mut self, at: Coord) {
        let rules = self.config.plant.clone();

        if self.grid.get(at).age == rules.max_age {
            self.grid.set(at, Entity::EMPTY);
            return;
        }
        self.grid.get_mut(at).age += 1;

        if self.rng.chance(rules.reproduction_probability) {
            if let Some(dest) = self.choose_empty_neighbor(at) {
                self.place(dest, Entity::plant());
            }
        }
    }

    /// Shared rule for both mobile species; they differ only in their
    /// parameters and in what they prey on.
    fn creature_rule(&mut self, at: Coord, kind: EntityKind) {
        let (rules, prey): (CreatureRules, EntityKind) = match kind {
            EntityKind::Herbivore => (self.config.herbivore.clone(), EntityKind::Plant),
            EntityKind::Carnivore => (self.config.carnivore.clone(), EntityKind::Herbivore),
            _ => unreachable!("creature rule dispatched for {kind:?}"),
        };
        let energy = self.config.energy.clone();

        let occupant = *self.grid.get(at);
        if occupant.age == rules.max_age || occupant.energy <= 0 {
            self.grid.set(at, Entity::EMPTY);
            return;
        }
        self.grid.get_mut(at).age += 1;

        // Feeding: one independent draw per adjacent prey. Several
        // neighbors can be eaten in the same tick.
        let neighbors: Vec<Coord> = at.orthogonal(self.grid.size()).collect();
        for neighbor in neighbors {
            if self.grid.get(neighbor).kind == prey && self.rng.chance(rules.eat_probability) {
                self.grid.set(neighbor, Entity::EMPTY);
                self.grid.get_mut(at).energy += rules.meal_energy;
            }
        }

        // Reproduction: the draw is consumed before the threshold check,
        // and the parent pays only when a destination cell existed.
        if self.rng.chance(rules.reproduction_probability)
            && self.grid.get(at).energy >= energy.reproduction_threshold
        {
            if let Some(dest) = self.choose_empty_neighbor(at) {
                self.place(dest, newborn(kind, energy.initial));
                self.grid.get_mut(at).energy -= energy.reproduction_cost;
            }
        }

        // Movement: relocate with energy minus the move cost and the age
        // unchanged, vacating the origin.
        if self.rng.chance(rules.move_probability) {
            if let Some(dest) = self.choose_empty_neighbor(at) {
                let mover = *self.grid.get(at);
                self.place(
                    dest,
                    Entity {
                        energy: mover.energy - energy.move_cost,
                        ..mover
                    },
                );
                self.grid.set(at, Entity::EMPTY);
            }
        }
    }

    /// Empty orthogonal neighbors of `at`, in resolver order.
    fn empty_neighbors(&self, at: Coord) -> Vec<Coord> {
        at.orthogonal(self.grid.size())
            .filter(|&n| self.grid.get(n).is_empty())
            .collect()
    }

    fn choose_empty_neighbor(&mut self, at: Coord) -> Option<Coord> {
        let candidates = self.empty_neighbors(at);
        rng::choose(self.rng.as_mut(), &candidates)
    }

    /// Write an entity into a cell and shield it from the rest of the
    /// current traversal.
    fn place(&mut self, dest: Coord, entity: Entity) {
        self.grid.set(dest, entity);
        self.touched.insert(dest);
    }
}

fn newborn(kind: EntityKind, energy: i32) -> Entity {
    match kind {
        EntityKind::Herbivore => Entity::herbivore(energy),
        EntityKind::Carnivore => Entity::carnivore(energy),
        _ => unreachable!("newborn of kind {kind:?}"),
    }
}
