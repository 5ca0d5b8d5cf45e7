//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an organism in the arena.
///
/// Ids are handed out sequentially by the simulation, so a fixed seed
/// reproduces the exact same id assignment on replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrganismId(pub u64);

impl fmt::Display for OrganismId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A position in the layered grid: (row, col, layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: i32,
    pub col: i32,
    pub layer: i32,
}

impl Coordinate {
    pub fn new(row: i32, col: i32, layer: i32) -> Self {
        Self { row, col, layer }
    }

    /// The same row/col cell on a different layer.
    ///
    /// Used when a feeding animal moves to its prey's column but stays on
    /// its own stratum.
    pub fn on_layer(&self, layer: i32) -> Self {
        Self {
            row: self.row,
            col: self.col,
            layer,
        }
    }

    /// Chebyshev distance in the row/col plane, ignoring the layer.
    pub fn ring_distance(&self, other: &Coordinate) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.row, self.col, self.layer)
    }
}

/// Species tag for every concrete organism variant.
///
/// All species-specific constants are dispatched through
/// [`crate::config::SpeciesProfile`] rather than per-variant code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Rabbit,
    Fox,
    Human,
    Hunter,
    Grass,
    Flower,
}

impl Species {
    pub const ALL: [Species; 6] = [
        Species::Rabbit,
        Species::Fox,
        Species::Human,
        Species::Hunter,
        Species::Grass,
        Species::Flower,
    ];

    /// Animals carry a food level and hunt; plants carry a size and grow.
    pub fn is_plant(&self) -> bool {
        matches!(self, Species::Grass | Species::Flower)
    }

    pub fn is_animal(&self) -> bool {
        !self.is_plant()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Rabbit => "rabbit",
            Species::Fox => "fox",
            Species::Human => "human",
            Species::Hunter => "hunter",
            Species::Grass => "grass",
            Species::Flower => "flower",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
