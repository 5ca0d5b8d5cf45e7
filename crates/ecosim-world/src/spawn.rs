//! Initial-population seeding.
//!
//! Sweeps every (row, col) of the world once, rolling per-species creation
//! probabilities. Animals are mutually exclusive per cell (each branch draws
//! its own roll); ground cover rolls independently, so a fox can stand over
//! grass. Seeded organisms start with randomized age and vitals.

use crate::simulation::Simulation;
use ecosim_core::{Coordinate, Result, Species};
use rand::Rng;
use tracing::info;

impl Simulation {
    /// Populate an empty world from the configured spawn probabilities,
    /// returning the number of organisms created.
    pub fn populate(&mut self) -> Result<u32> {
        let spawn = self.config().spawn.clone();
        let (height, width) = (self.grid.height, self.grid.width);
        let mut created = 0;

        for row in 0..height {
            for col in 0..width {
                if self.roll(spawn.fox_probability) {
                    self.seed(Species::Fox, row, col)?;
                    created += 1;
                } else if self.roll(spawn.rabbit_probability) {
                    self.seed(Species::Rabbit, row, col)?;
                    created += 1;
                } else if self.roll(spawn.human_probability) {
                    self.seed(Species::Human, row, col)?;
                    created += 1;
                } else if self.roll(spawn.hunter_probability) {
                    // Hunters enter fresh rather than pre-aged.
                    let layer = Species::Hunter.profile().layer;
                    self.insert(Species::Hunter, Coordinate::new(row, col, layer))?;
                    created += 1;
                }

                if self.roll(spawn.grass_probability) {
                    self.seed(Species::Grass, row, col)?;
                    created += 1;
                } else if self.roll(spawn.flower_probability) {
                    self.seed(Species::Flower, row, col)?;
                    created += 1;
                }
            }
        }

        info!(created, "world populated");
        Ok(created)
    }

    fn seed(&mut self, species: Species, row: i32, col: i32) -> Result<()> {
        let layer = species.profile().layer;
        self.insert_seeded(species, Coordinate::new(row, col, layer))?;
        Ok(())
    }

    fn roll(&mut self, probability: f64) -> bool {
        self.rng.gen::<f64>() <= probability
    }
}
