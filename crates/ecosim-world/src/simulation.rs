//! Tick engine and arena ownership.
//!
//! The simulation owns every organism in a map keyed by id; the grid stores
//! ids only. Between ticks the engine is idle; `step` runs one full tick to
//! completion before returning, so there is never a partially-applied tick
//! observable from outside.

use crate::grid::Grid;
use crate::organism::Organism;
use ecosim_core::{
    Coordinate, Error, Exponential, OrganismId, Result, SimConfig, Species, DISPERSAL_RATE,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// Births and deaths observed during one tick, per species.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TickSummary {
    pub step: u64,
    pub births: BTreeMap<Species, u32>,
    pub deaths: BTreeMap<Species, u32>,
}

impl TickSummary {
    pub fn births_of(&self, species: Species) -> u32 {
        self.births.get(&species).copied().unwrap_or(0)
    }

    pub fn deaths_of(&self, species: Species) -> u32 {
        self.deaths.get(&species).copied().unwrap_or(0)
    }
}

/// Live population counts per species.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Census {
    pub counts: BTreeMap<Species, usize>,
}

impl Census {
    pub fn count(&self, species: Species) -> usize {
        self.counts.get(&species).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Viable while more than one species still has live members.
    pub fn is_viable(&self) -> bool {
        self.counts.values().filter(|&&n| n > 0).count() > 1
    }
}

pub struct Simulation {
    pub(crate) grid: Grid,
    pub(crate) organisms: HashMap<OrganismId, Organism>,
    /// Live organisms in insertion order. Newborns from a tick join the
    /// roster at the end of that tick, so they never act within it.
    pub(crate) roster: Vec<OrganismId>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) dispersal: Exponential,
    config: SimConfig,
    next_id: u64,
    step: u64,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self> {
        let world = &config.world;
        if world.height <= 0 || world.width <= 0 || world.depth <= 0 {
            return Err(Error::Validation(format!(
                "grid dimensions must be positive, got {}x{}x{}",
                world.height, world.width, world.depth
            )));
        }

        Ok(Self {
            grid: Grid::from_config(world),
            organisms: HashMap::new(),
            roster: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            dispersal: Exponential::new(DISPERSAL_RATE),
            config,
            next_id: 0,
            step: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub(crate) fn allocate_id(&mut self) -> OrganismId {
        let id = OrganismId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Place a newborn organism, for seeding collaborators and tests.
    pub fn insert(&mut self, species: Species, coordinate: Coordinate) -> Result<OrganismId> {
        self.insert_with(species, coordinate, false)
    }

    /// Place an organism with randomized age and vitals, used only when
    /// constructing the initial population.
    pub fn insert_seeded(
        &mut self,
        species: Species,
        coordinate: Coordinate,
    ) -> Result<OrganismId> {
        self.insert_with(species, coordinate, true)
    }

    fn insert_with(
        &mut self,
        species: Species,
        coordinate: Coordinate,
        seeded: bool,
    ) -> Result<OrganismId> {
        if !self.grid.in_bounds(coordinate) {
            return Err(Error::OutOfBounds(coordinate.to_string()));
        }
        if coordinate.layer != species.profile().layer {
            return Err(Error::Validation(format!(
                "{species} belongs on layer {}, not {}",
                species.profile().layer,
                coordinate.layer
            )));
        }
        if self.grid.occupant_at(coordinate).is_some() {
            return Err(Error::InvalidState(format!("cell {coordinate} is occupied")));
        }

        let id = self.allocate_id();
        let organism = if seeded {
            Organism::seeded(id, species, coordinate, &mut self.rng)
        } else {
            Organism::newborn(id, species, coordinate)
        };
        self.grid.place(id, coordinate);
        self.organisms.insert(id, organism);
        self.roster.push(id);
        Ok(id)
    }

    /// The organism occupying `coordinate`, if any.
    pub fn occupant_at(&self, coordinate: Coordinate) -> Option<&Organism> {
        self.grid
            .occupant_at(coordinate)
            .and_then(|id| self.organisms.get(&id))
    }

    pub fn population_count(&self, species: Species) -> usize {
        self.organisms
            .values()
            .filter(|o| o.alive && o.species == species)
            .count()
    }

    pub fn census(&self) -> Census {
        let mut counts = BTreeMap::new();
        for organism in self.organisms.values().filter(|o| o.alive) {
            *counts.entry(organism.species).or_insert(0) += 1;
        }
        Census { counts }
    }

    pub fn is_viable(&self) -> bool {
        self.census().is_viable()
    }

    pub fn current_step(&self) -> u64 {
        self.step
    }

    pub fn population(&self) -> usize {
        self.roster.len()
    }

    /// Run one tick: every live organism acts once in roster order, then
    /// the roster is rebuilt from survivors plus the tick's newborns.
    pub fn step(&mut self) -> TickSummary {
        self.step += 1;

        let snapshot = self.roster.clone();
        let mut newborns = Vec::new();

        for id in snapshot {
            let species = match self.organisms.get(&id) {
                // May have been eaten or culled earlier this tick.
                Some(organism) if organism.alive => organism.species,
                _ => continue,
            };
            match species {
                Species::Hunter => self.act_hunter(id),
                species if species.is_plant() => self.act_plant(id, &mut newborns),
                _ => self.act_animal(id, &mut newborns),
            }
        }

        let mut births: BTreeMap<Species, u32> = BTreeMap::new();
        for id in &newborns {
            if let Some(organism) = self.organisms.get(id) {
                *births.entry(organism.species).or_insert(0) += 1;
            }
        }

        // Build-new-collection: survivors plus newborns replace the roster;
        // dead organisms leave the arena here (their grid slots were cleared
        // at death time).
        let mut deaths: BTreeMap<Species, u32> = BTreeMap::new();
        let old_roster = std::mem::take(&mut self.roster);
        let mut next_roster = Vec::with_capacity(old_roster.len() + newborns.len());
        for id in old_roster.into_iter().chain(newborns) {
            if self.organisms.get(&id).is_some_and(|o| o.alive) {
                next_roster.push(id);
            } else if let Some(organism) = self.organisms.remove(&id) {
                *deaths.entry(organism.species).or_insert(0) += 1;
            }
        }
        self.roster = next_roster;

        let summary = TickSummary {
            step: self.step,
            births,
            deaths,
        };
        debug!(
            step = self.step,
            population = self.roster.len(),
            births = summary.births.values().sum::<u32>(),
            deaths = summary.deaths.values().sum::<u32>(),
            "tick complete"
        );
        summary
    }

    /// Step until `num_ticks` ticks have run or viability is lost, returning
    /// the final step count.
    pub fn run(&mut self, num_ticks: u64) -> u64 {
        info!(num_ticks, population = self.roster.len(), "starting run");

        for _ in 0..num_ticks {
            if !self.is_viable() {
                info!(step = self.step, "stopping: simulation no longer viable");
                break;
            }
            self.step();

            if self.step % 100 == 0 {
                let census = self.census();
                info!(
                    step = self.step,
                    population = census.total(),
                    rabbits = census.count(Species::Rabbit),
                    foxes = census.count(Species::Fox),
                    plants = census.count(Species::Grass) + census.count(Species::Flower),
                    "census snapshot"
                );
            }
        }

        self.step
    }

    /// Verify the occupancy invariant: every roster organism's recorded
    /// position holds its id, and every occupied slot points back at an
    /// organism recorded there.
    pub fn check_invariants(&self) -> Result<()> {
        for id in &self.roster {
            let organism = self
                .organisms
                .get(id)
                .ok_or_else(|| Error::InvalidState(format!("roster id {id} not in arena")))?;
            if self.grid.occupant_at(organism.position) != Some(*id) {
                return Err(Error::InvalidState(format!(
                    "{id} recorded at {} but slot disagrees",
                    organism.position
                )));
            }
        }
        for (coord, id) in self.grid.occupied() {
            let organism = self
                .organisms
                .get(&id)
                .ok_or_else(|| Error::InvalidState(format!("slot {coord} holds unknown {id}")))?;
            if organism.position != coord {
                return Err(Error::InvalidState(format!(
                    "slot {coord} holds {id} recorded at {}",
                    organism.position
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecosim_core::WorldConfig;

    fn small_config(seed: u64) -> SimConfig {
        SimConfig {
            seed,
            world: WorldConfig {
                height: 10,
                width: 10,
                depth: 3,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let mut config = small_config(0);
        config.world.height = 0;
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_insert_and_query() {
        let mut sim = Simulation::new(small_config(1)).unwrap();
        let coord = Coordinate::new(3, 3, 1);
        let id = sim.insert(Species::Rabbit, coord).unwrap();

        let occupant = sim.occupant_at(coord).unwrap();
        assert_eq!(occupant.id, id);
        assert_eq!(occupant.species, Species::Rabbit);
        assert_eq!(sim.population_count(Species::Rabbit), 1);
    }

    #[test]
    fn test_insert_rejects_wrong_layer() {
        let mut sim = Simulation::new(small_config(1)).unwrap();
        assert!(sim.insert(Species::Rabbit, Coordinate::new(3, 3, 0)).is_err());
    }

    #[test]
    fn test_insert_rejects_occupied_cell() {
        let mut sim = Simulation::new(small_config(1)).unwrap();
        let coord = Coordinate::new(3, 3, 1);
        sim.insert(Species::Rabbit, coord).unwrap();
        assert!(sim.insert(Species::Rabbit, coord).is_err());
    }

    #[test]
    fn test_insert_rejects_out_of_bounds() {
        let mut sim = Simulation::new(small_config(1)).unwrap();
        assert!(sim.insert(Species::Rabbit, Coordinate::new(99, 3, 1)).is_err());
    }

    #[test]
    fn test_step_counter_advances() {
        let mut sim = Simulation::new(small_config(1)).unwrap();
        assert_eq!(sim.current_step(), 0);
        sim.step();
        assert_eq!(sim.current_step(), 1);
    }

    #[test]
    fn test_viability_requires_two_species() {
        let mut sim = Simulation::new(small_config(1)).unwrap();
        assert!(!sim.is_viable());

        sim.insert(Species::Grass, Coordinate::new(0, 0, 0)).unwrap();
        assert!(!sim.is_viable());

        sim.insert(Species::Rabbit, Coordinate::new(5, 5, 1)).unwrap();
        assert!(sim.is_viable());
    }

    #[test]
    fn test_conservation_per_tick() {
        let mut sim = Simulation::new(small_config(7)).unwrap();
        sim.populate().unwrap();

        for _ in 0..20 {
            let before = sim.census();
            let summary = sim.step();
            let after = sim.census();
            for species in Species::ALL {
                let expected = before.count(species) as i64
                    + summary.births_of(species) as i64
                    - summary.deaths_of(species) as i64;
                assert_eq!(after.count(species) as i64, expected, "{species}");
            }
        }
    }

    #[test]
    fn test_occupancy_invariant_holds_across_ticks() {
        let mut sim = Simulation::new(small_config(3)).unwrap();
        sim.populate().unwrap();

        sim.check_invariants().unwrap();
        for _ in 0..30 {
            sim.step();
            sim.check_invariants().unwrap();
        }
    }

    #[test]
    fn test_age_and_vital_bounds_hold_across_ticks() {
        let mut sim = Simulation::new(small_config(11)).unwrap();
        sim.populate().unwrap();

        for _ in 0..60 {
            sim.step();
            for id in &sim.roster {
                let organism = &sim.organisms[id];
                let profile = organism.profile();
                assert!(organism.alive);
                assert!(organism.age <= profile.max_age);
                if let Some(food) = organism.food_level() {
                    assert!(food >= 0 && food <= profile.max_food_level);
                }
                if let Some(size) = organism.size() {
                    assert!(size >= 0 && size <= profile.max_size);
                }
            }
        }
    }

    #[test]
    fn test_fixed_seed_replay_is_identical() {
        let run = |seed| {
            let mut sim = Simulation::new(small_config(seed)).unwrap();
            sim.populate().unwrap();
            let mut trace = Vec::new();
            for _ in 0..40 {
                sim.step();
                let mut positions: Vec<(Species, Coordinate)> = sim
                    .roster
                    .iter()
                    .map(|id| (sim.organisms[id].species, sim.organisms[id].position))
                    .collect();
                positions.sort_by_key(|(s, c)| (*s, c.row, c.col, c.layer));
                trace.push((sim.census().counts.clone(), positions));
            }
            trace
        };

        assert_eq!(run(42), run(42));
        assert_ne!(run(42), run(43));
    }

    #[test]
    fn test_run_stops_when_viability_lost() {
        let mut sim = Simulation::new(small_config(5)).unwrap();
        sim.insert(Species::Grass, Coordinate::new(0, 0, 0)).unwrap();
        // One species only: not viable, run should stop immediately.
        let final_step = sim.run(100);
        assert_eq!(final_step, 0);
    }

    #[test]
    fn test_default_world_runs_and_stays_consistent() {
        tracing_subscriber::fmt()
            .with_env_filter("info")
            .try_init()
            .ok();

        let mut sim = Simulation::new(SimConfig {
            seed: 42,
            ..Default::default()
        })
        .unwrap();
        sim.populate().unwrap();
        assert!(sim.is_viable());

        let final_step = sim.run(200);
        assert!(final_step > 0);
        sim.check_invariants().unwrap();
    }

    #[test]
    fn test_tick_summary_serialization() {
        let mut sim = Simulation::new(small_config(9)).unwrap();
        sim.populate().unwrap();
        let summary = sim.step();

        let json = serde_json::to_string(&summary).unwrap();
        let deserialized: TickSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.step, summary.step);
        assert_eq!(deserialized.births, summary.births);
    }
}
