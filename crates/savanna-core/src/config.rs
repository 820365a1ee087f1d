//! Configuration types for the simulation.

use serde::{Deserialize, Serialize};

/// Lifecycle parameters for plants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantRules {
    /// A plant observed at exactly this age is removed.
    pub max_age: u32,
    /// Chance per tick of sprouting into an empty orthogonal neighbor.
    pub reproduction_probability: f64,
}

impl Default for PlantRules {
    fn default() -> Self {
        Self {
            max_age: 10,
            reproduction_probability: 0.2,
        }
    }
}

/// Lifecycle parameters for a mobile species (herbivore or carnivore).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatureRules {
    /// A creature observed at exactly this age is removed.
    pub max_age: u32,
    /// Chance of eating each adjacent prey, drawn per neighbor.
    pub eat_probability: f64,
    /// Energy gained per prey eaten.
    pub meal_energy: i32,
    /// Chance per tick of placing a newborn into an empty neighbor.
    pub reproduction_probability: f64,
    /// Chance per tick of relocating into an empty neighbor.
    pub move_probability: f64,
}

impl CreatureRules {
    /// Canonical herbivore parameters.
    pub fn herbivore() -> Self {
        Self {
            max_age: 50,
            eat_probability: 0.9,
            meal_energy: 30,
            reproduction_probability: 0.075,
            move_probability: 0.7,
        }
    }

    /// Canonical carnivore parameters.
    pub fn carnivore() -> Self {
        Self {
            max_age: 80,
            eat_probability: 1.0,
            meal_energy: 20,
            reproduction_probability: 0.025,
            move_probability: 0.5,
        }
    }
}

/// Energy economics shared by both mobile species.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Starting energy for newly created creatures.
    pub initial: i32,
    /// Advisory ceiling. No rule clamps to it; feeding can exceed it.
    pub max: i32,
    /// Minimum energy required to reproduce.
    pub reproduction_threshold: i32,
    /// Energy the parent pays when a newborn is placed.
    pub reproduction_cost: i32,
    /// Energy spent on relocating to a neighboring cell.
    pub move_cost: i32,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            initial: 100,
            max: 200,
            reproduction_threshold: 20,
            reproduction_cost: 10,
            move_cost: 5,
        }
    }
}

/// Full simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Side length of the square grid.
    pub size: usize,
    pub plant: PlantRules,
    pub herbivore: CreatureRules,
    pub carnivore: CreatureRules,
    pub energy: EnergyConfig,
}

impl SimConfig {
    /// Total number of cells, the hard cap on population.
    pub fn capacity(&self) -> usize {
        self.size * self.size
    }

    /// Default rules on a grid of the given side length.
    pub fn with_size(size: usize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: 15,
            plant: PlantRules::default(),
            herbivore: CreatureRules::herbivore(),
            carnivore: CreatureRules::carnivore(),
            energy: EnergyConfig::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: String,
    /// Server port
    pub port: u16,
    /// Random seed; drawn from the OS when absent.
    pub seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            seed: None,
        }
    }
}
