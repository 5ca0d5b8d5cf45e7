//! Configuration types for the simulation.

use crate::types::Species;
use serde::{Deserialize, Serialize};

/// Rate of the exponential distribution used for plant seed dispersal.
pub const DISPERSAL_RATE: f64 = 0.4;

/// Per-species constants.
///
/// Every number that the behavior algorithms branch on lives here, so a
/// species is fully described by its profile plus its kind (animal/plant).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeciesProfile {
    /// Grid stratum this species occupies.
    pub layer: i32,
    /// An organism whose age exceeds this dies.
    pub max_age: u32,
    /// Minimum age for a breeding attempt to succeed.
    pub breeding_age: u32,
    /// Probability that an eligible organism breeds on a given tick.
    pub breeding_probability: f64,
    /// Upper bound on offspring per breeding event.
    pub max_litter_size: u32,
    /// Food value credited to whatever eats this organism.
    pub food_value: i32,
    /// Multiplier applied to consumed prey's food value (animals).
    pub food_factor: i32,
    /// Food level ceiling (animals).
    pub max_food_level: i32,
    /// Size ceiling (plants).
    pub max_size: i32,
    /// Species this one preys on, scanned in shuffled neighbor order.
    pub diet: &'static [Species],
    /// Whether prey search spans all layers or only the organism's own.
    pub forages_all_layers: bool,
    /// Animals culled outright per tick (hunters).
    pub kills_per_tick: u32,
}

const RABBIT_PROFILE: SpeciesProfile = SpeciesProfile {
    layer: 1,
    max_age: 40,
    breeding_age: 5,
    breeding_probability: 0.10,
    max_litter_size: 4,
    food_value: 7,
    food_factor: 1,
    max_food_level: 3,
    max_size: 0,
    diet: &[Species::Grass, Species::Flower],
    forages_all_layers: true,
    kills_per_tick: 0,
};

const FOX_PROFILE: SpeciesProfile = SpeciesProfile {
    layer: 2,
    max_age: 100,
    breeding_age: 15,
    breeding_probability: 0.06,
    max_litter_size: 2,
    food_value: 15,
    food_factor: 1,
    max_food_level: 16,
    max_size: 0,
    diet: &[Species::Rabbit],
    forages_all_layers: true,
    kills_per_tick: 0,
};

// Humans are nominal omnivores, but they only search their own layer and
// all their prey species live on other strata, so the search never
// succeeds (matching the source model).
const HUMAN_PROFILE: SpeciesProfile = SpeciesProfile {
    layer: 2,
    max_age: 1000,
    breeding_age: 5,
    breeding_probability: 0.12,
    max_litter_size: 2,
    food_value: 0,
    food_factor: 9,
    max_food_level: 25,
    max_size: 0,
    diet: &[Species::Rabbit, Species::Grass, Species::Flower],
    forages_all_layers: false,
    kills_per_tick: 0,
};

const HUNTER_PROFILE: SpeciesProfile = SpeciesProfile {
    diet: &[],
    kills_per_tick: 2,
    ..HUMAN_PROFILE
};

const GRASS_PROFILE: SpeciesProfile = SpeciesProfile {
    layer: 0,
    max_age: 50,
    breeding_age: 3,
    breeding_probability: 0.02,
    max_litter_size: 3,
    food_value: 2,
    food_factor: 0,
    max_food_level: 0,
    max_size: 5,
    diet: &[],
    forages_all_layers: false,
    kills_per_tick: 0,
};

const FLOWER_PROFILE: SpeciesProfile = SpeciesProfile {
    breeding_age: 5,
    breeding_probability: 0.01,
    max_litter_size: 7,
    food_value: 4,
    ..GRASS_PROFILE
};

impl Species {
    /// Constant table replacing the original's per-class virtual overrides.
    pub const fn profile(&self) -> &'static SpeciesProfile {
        match self {
            Species::Rabbit => &RABBIT_PROFILE,
            Species::Fox => &FOX_PROFILE,
            Species::Human => &HUMAN_PROFILE,
            Species::Hunter => &HUNTER_PROFILE,
            Species::Grass => &GRASS_PROFILE,
            Species::Flower => &FLOWER_PROFILE,
        }
    }
}

/// World (grid) dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Number of rows.
    pub height: i32,
    /// Number of columns.
    pub width: i32,
    /// Number of layers.
    pub depth: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            height: 80,
            width: 120,
            depth: 3,
        }
    }
}

/// Per-cell creation probabilities for the initial population sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub fox_probability: f64,
    pub rabbit_probability: f64,
    pub human_probability: f64,
    pub hunter_probability: f64,
    pub grass_probability: f64,
    pub flower_probability: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            fox_probability: 0.01,
            rabbit_probability: 0.05,
            human_probability: 0.0,
            hunter_probability: 0.0,
            grass_probability: 0.25,
            flower_probability: 0.15,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Random seed for reproducibility.
    pub seed: u64,
    /// World configuration.
    pub world: WorldConfig,
    /// Seeding configuration.
    pub spawn: SpawnConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world: WorldConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}
