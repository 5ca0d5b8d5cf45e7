//! World simulation engine.
//!
//! This crate implements the layered grid world where plants spread,
//! herbivores graze, predators hunt, and hunters cull, one synchronized
//! tick at a time.

pub mod behavior;
pub mod grid;
pub mod organism;
pub mod simulation;
pub mod spawn;

pub use grid::Grid;
pub use organism::{Organism, Vitals};
pub use simulation::{Census, Simulation, TickSummary};
