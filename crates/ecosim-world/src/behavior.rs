//! Per-tick behavior: aging, hunger, breeding, feeding, movement, culling.
//!
//! All randomness flows through the simulation's RNG; neighbor lists arrive
//! pre-shuffled from the grid, so every first-match scan below is a uniform
//! random choice among the eligible cells.

use crate::organism::Organism;
use crate::simulation::Simulation;
use ecosim_core::{Coordinate, OrganismId, Species};
use rand::Rng;
use tracing::trace;

/// Species a hunter culls on sight.
const CULL_TARGETS: [Species; 2] = [Species::Rabbit, Species::Fox];

impl Simulation {
    /// One tick for a rabbit, fox, or human.
    ///
    /// Order matters: aging and hunger can kill before any other step runs;
    /// breeding happens before the move, so newborns claim free cells first;
    /// an animal that neither fed nor found a free cell dies of overcrowding.
    pub(crate) fn act_animal(&mut self, id: OrganismId, newborns: &mut Vec<OrganismId>) {
        let Some(organism) = self.organisms.get_mut(&id) else {
            debug_assert!(false, "acting on organism missing from arena");
            return;
        };
        organism.increment_age();
        if organism.alive {
            organism.increment_hunger();
        }
        let position = organism.position;
        let species = organism.species;
        if !organism.alive {
            self.grid.clear(position);
            trace!(%id, %species, "died of old age or starvation");
            return;
        }

        self.attempt_breeding(id, newborns);

        if let Some(prey_id) = self.find_prey(id) {
            let destination = self
                .consume_prey(id, prey_id)
                .or_else(|| self.free_step(position));
            // A fed animal survives even when boxed in; it just stays put.
            if let Some(destination) = destination {
                self.move_organism(id, destination);
            }
        } else if let Some(destination) = self.free_step(position) {
            self.move_organism(id, destination);
        } else {
            self.kill(id);
            trace!(%id, %species, "died of overcrowding");
        }
    }

    /// One tick for a grass or flower patch: age, grow, spread.
    pub(crate) fn act_plant(&mut self, id: OrganismId, newborns: &mut Vec<OrganismId>) {
        let Some(organism) = self.organisms.get_mut(&id) else {
            debug_assert!(false, "acting on organism missing from arena");
            return;
        };
        organism.increment_age();
        if !organism.alive {
            let position = organism.position;
            self.grid.clear(position);
            trace!(%id, species = %organism.species, "died of old age");
            return;
        }
        organism.grow();
        self.attempt_breeding(id, newborns);
    }

    /// One tick for a hunter: cull nearby rabbits and foxes without eating
    /// them, then wander. Hunters neither starve nor breed, and a boxed-in
    /// hunter stays put rather than dying.
    pub(crate) fn act_hunter(&mut self, id: OrganismId) {
        let Some(organism) = self.organisms.get_mut(&id) else {
            debug_assert!(false, "acting on organism missing from arena");
            return;
        };
        organism.increment_age();
        let position = organism.position;
        if !organism.alive {
            self.grid.clear(position);
            return;
        }
        let cap = organism.profile().kills_per_tick;

        let mut kills = 0;
        for cell in self.grid.neighbors(position, 1, false, &mut self.rng) {
            if kills >= cap {
                break;
            }
            let Some(target_id) = self.grid.occupant_at(cell) else {
                continue;
            };
            let culls = self
                .organisms
                .get(&target_id)
                .is_some_and(|t| t.alive && CULL_TARGETS.contains(&t.species));
            if culls {
                self.kill(target_id);
                kills += 1;
                trace!(hunter = %id, target = %target_id, "culled");
            }
        }

        if let Some(destination) = self.free_step(position) {
            self.move_organism(id, destination);
        }
    }

    /// Shared breeding policy, parameterized by the species profile.
    ///
    /// Animals place offspring in free adjacent same-layer cells; plants
    /// disperse seeds onto the ring at an exponentially-drawn distance. One
    /// newborn goes into each free cell, up to the litter size. Newborns
    /// claim their grid slots immediately but only join the roster at tick
    /// end.
    pub(crate) fn attempt_breeding(&mut self, id: OrganismId, newborns: &mut Vec<OrganismId>) {
        let Some((species, position, eligible)) = self
            .organisms
            .get(&id)
            .map(|o| (o.species, o.position, o.can_breed()))
        else {
            return;
        };
        if !eligible {
            return;
        }
        let profile = species.profile();
        if self.rng.gen::<f64>() > profile.breeding_probability {
            return;
        }
        let litter = self.rng.gen_range(1..=profile.max_litter_size);

        let distance = if species.is_plant() {
            self.dispersal.sample_distance(&mut self.rng)
        } else {
            1
        };
        if distance < 1 {
            // A dispersal draw of zero lands on the parent's own cell.
            return;
        }

        let free = self.grid.free_neighbors(position, distance, true, &mut self.rng);
        for cell in free.into_iter().take(litter as usize) {
            let newborn_id = self.allocate_id();
            self.grid.place(newborn_id, cell);
            self.organisms
                .insert(newborn_id, Organism::newborn(newborn_id, species, cell));
            newborns.push(newborn_id);
            trace!(parent = %id, child = %newborn_id, %species, %cell, "born");
        }
    }

    /// Scan shuffled adjacent cells for the first live organism in this
    /// species' diet. Layer scope comes from the profile: rabbits and foxes
    /// search every layer, humans only their own.
    pub(crate) fn find_prey(&mut self, id: OrganismId) -> Option<OrganismId> {
        let (species, position) = self
            .organisms
            .get(&id)
            .map(|o| (o.species, o.position))?;
        let profile = species.profile();
        if profile.diet.is_empty() {
            return None;
        }

        let same_layer_only = !profile.forages_all_layers;
        for cell in self.grid.neighbors(position, 1, same_layer_only, &mut self.rng) {
            let Some(occupant_id) = self.grid.occupant_at(cell) else {
                continue;
            };
            let edible = self
                .organisms
                .get(&occupant_id)
                .is_some_and(|o| o.alive && profile.diet.contains(&o.species));
            if edible {
                return Some(occupant_id);
            }
        }
        None
    }

    /// Consume the prey: credit the eater, apply the prey's consumed
    /// reaction, and clear the prey's slot if it died.
    ///
    /// Returns the eater's preferred destination — the prey's row/col on the
    /// eater's own layer — when that cell is usable, or `None` when another
    /// organism already holds it (the caller then falls back to a plain
    /// move).
    pub(crate) fn consume_prey(
        &mut self,
        id: OrganismId,
        prey_id: OrganismId,
    ) -> Option<Coordinate> {
        let (eater_position, eater_layer) = self
            .organisms
            .get(&id)
            .map(|o| (o.position, o.layer()))?;

        let prey = self.organisms.get_mut(&prey_id)?;
        let prey_position = prey.position;
        let food_value = prey.profile().food_value;
        prey.consumed();
        if !prey.alive {
            self.grid.clear(prey_position);
            trace!(%prey_id, "eaten");
        }

        if let Some(eater) = self.organisms.get_mut(&id) {
            eater.feed(food_value);
        }

        let destination = prey_position.on_layer(eater_layer);
        if destination == eater_position {
            // Prey was directly above or below; no move needed.
            Some(eater_position)
        } else if self.grid.is_free(destination) {
            Some(destination)
        } else {
            None
        }
    }

    /// A free same-layer adjacent cell, uniformly chosen, if any exists.
    pub(crate) fn free_step(&mut self, position: Coordinate) -> Option<Coordinate> {
        self.grid
            .free_neighbors(position, 1, true, &mut self.rng)
            .into_iter()
            .next()
    }

    /// Relocate an organism, keeping its recorded position and the grid in
    /// sync within this single call.
    pub(crate) fn move_organism(&mut self, id: OrganismId, destination: Coordinate) {
        let Some(organism) = self.organisms.get_mut(&id) else {
            return;
        };
        let from = organism.position;
        if from == destination {
            return;
        }
        organism.position = destination;
        self.grid.clear(from);
        self.grid.place(id, destination);
    }

    /// Mark an organism dead and vacate its grid slot.
    pub(crate) fn kill(&mut self, id: OrganismId) {
        if let Some(organism) = self.organisms.get_mut(&id) {
            organism.set_dead();
            let position = organism.position;
            self.grid.clear(position);
        }
    }
}
