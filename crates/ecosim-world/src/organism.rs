//! Organism state: shared life-cycle plus the edible/growable capability data.

use ecosim_core::{Coordinate, OrganismId, Species, SpeciesProfile};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Capability-specific state.
///
/// Animals are edible things with a bounded food store; plants are growable
/// things with a bounded size. Which variant an organism carries follows
/// from its species kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Vitals {
    /// An animal's food level, bounded to `[0, max_food_level]`.
    Fed { food_level: i32 },
    /// A plant's size, bounded to `[0, max_size]`.
    Grown { size: i32 },
}

/// An organism in the arena.
///
/// The grid refers to organisms by id; `position` mirrors the grid slot the
/// simulation currently stores this id in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organism {
    pub id: OrganismId,
    pub species: Species,
    pub age: u32,
    pub alive: bool,
    pub position: Coordinate,
    pub vitals: Vitals,
}

impl Organism {
    /// A newborn: age zero, full food store or full size.
    pub fn newborn(id: OrganismId, species: Species, position: Coordinate) -> Self {
        let profile = species.profile();
        let vitals = if species.is_plant() {
            Vitals::Grown {
                size: profile.max_size,
            }
        } else {
            Vitals::Fed {
                food_level: profile.max_food_level,
            }
        };
        Self {
            id,
            species,
            age: 0,
            alive: true,
            position,
            vitals,
        }
    }

    /// A seeded organism with randomized age and vitals, used only when
    /// constructing the initial population.
    pub fn seeded<R: Rng + ?Sized>(
        id: OrganismId,
        species: Species,
        position: Coordinate,
        rng: &mut R,
    ) -> Self {
        let profile = species.profile();
        let mut organism = Self::newborn(id, species, position);
        organism.age = rng.gen_range(0..profile.max_age);
        organism.vitals = if species.is_plant() {
            Vitals::Grown {
                size: rng.gen_range(1..=profile.max_size),
            }
        } else {
            Vitals::Fed {
                food_level: rng.gen_range(1..=profile.max_food_level),
            }
        };
        organism
    }

    pub fn profile(&self) -> &'static SpeciesProfile {
        self.species.profile()
    }

    pub fn layer(&self) -> i32 {
        self.profile().layer
    }

    pub fn set_dead(&mut self) {
        self.alive = false;
    }

    /// Age by one tick; dying of old age when past the species maximum.
    pub fn increment_age(&mut self) {
        self.age += 1;
        if self.age > self.profile().max_age {
            self.set_dead();
        }
    }

    /// Burn one unit of food; starving when the store runs out.
    ///
    /// No-op for plants.
    pub fn increment_hunger(&mut self) {
        if let Vitals::Fed { food_level } = &mut self.vitals {
            *food_level -= 1;
            if *food_level <= 0 {
                *food_level = 0;
                self.set_dead();
            }
        }
    }

    pub fn food_level(&self) -> Option<i32> {
        match self.vitals {
            Vitals::Fed { food_level } => Some(food_level),
            Vitals::Grown { .. } => None,
        }
    }

    pub fn size(&self) -> Option<i32> {
        match self.vitals {
            Vitals::Grown { size } => Some(size),
            Vitals::Fed { .. } => None,
        }
    }

    /// Credit this animal with a consumed prey's food value, scaled by the
    /// species food factor and capped at the species maximum.
    pub fn feed(&mut self, prey_food_value: i32) {
        let profile = self.profile();
        if let Vitals::Fed { food_level } = &mut self.vitals {
            *food_level = (*food_level + profile.food_factor * prey_food_value)
                .min(profile.max_food_level);
        }
    }

    /// The reaction to being consumed: animals die outright, plants shrink
    /// and die when their size reaches zero.
    pub fn consumed(&mut self) {
        match &mut self.vitals {
            Vitals::Fed { .. } => self.set_dead(),
            Vitals::Grown { size } => {
                *size -= 1;
                if *size <= 0 {
                    *size = 0;
                    self.set_dead();
                }
            }
        }
    }

    /// Grow by one, capped at the species maximum size. No-op for animals.
    pub fn grow(&mut self) {
        let max_size = self.profile().max_size;
        if let Vitals::Grown { size } = &mut self.vitals {
            *size = (*size + 1).min(max_size);
        }
    }

    pub fn can_breed(&self) -> bool {
        self.age >= self.profile().breeding_age
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn coord() -> Coordinate {
        Coordinate::new(0, 0, 1)
    }

    #[test]
    fn test_newborn_starts_full() {
        let rabbit = Organism::newborn(OrganismId(1), Species::Rabbit, coord());
        assert_eq!(rabbit.age, 0);
        assert!(rabbit.alive);
        assert_eq!(rabbit.food_level(), Some(3));

        let grass = Organism::newborn(OrganismId(2), Species::Grass, Coordinate::new(0, 0, 0));
        assert_eq!(grass.size(), Some(5));
        assert!(grass.food_level().is_none());
    }

    #[test]
    fn test_seeded_is_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let fox = Organism::seeded(OrganismId(1), Species::Fox, coord(), &mut rng);
            assert!(fox.age < 100);
            let food = fox.food_level().unwrap();
            assert!(food >= 1 && food <= 16);

            let flower =
                Organism::seeded(OrganismId(2), Species::Flower, Coordinate::new(0, 0, 0), &mut rng);
            let size = flower.size().unwrap();
            assert!(size >= 1 && size <= 5);
        }
    }

    #[test]
    fn test_ages_out_past_maximum() {
        let mut rabbit = Organism::newborn(OrganismId(1), Species::Rabbit, coord());
        rabbit.age = 40;
        rabbit.increment_age();
        assert!(!rabbit.alive);
    }

    #[test]
    fn test_starves_at_zero_food() {
        let mut rabbit = Organism::newborn(OrganismId(1), Species::Rabbit, coord());
        if let Vitals::Fed { food_level } = &mut rabbit.vitals {
            *food_level = 1;
        }
        rabbit.increment_hunger();
        assert!(!rabbit.alive);
        assert_eq!(rabbit.food_level(), Some(0));
    }

    #[test]
    fn test_feed_is_capped() {
        let mut fox = Organism::newborn(OrganismId(1), Species::Fox, coord());
        fox.feed(100);
        assert_eq!(fox.food_level(), Some(16));
    }

    #[test]
    fn test_human_food_factor_scales() {
        let mut human = Organism::newborn(OrganismId(1), Species::Human, coord());
        if let Vitals::Fed { food_level } = &mut human.vitals {
            *food_level = 1;
        }
        human.feed(2);
        // 1 + 9 * 2, capped at 25
        assert_eq!(human.food_level(), Some(19));
    }

    #[test]
    fn test_consumed_animal_dies() {
        let mut rabbit = Organism::newborn(OrganismId(1), Species::Rabbit, coord());
        rabbit.consumed();
        assert!(!rabbit.alive);
    }

    #[test]
    fn test_consumed_plant_shrinks_then_dies() {
        let mut grass = Organism::newborn(OrganismId(1), Species::Grass, Coordinate::new(0, 0, 0));
        grass.consumed();
        assert!(grass.alive);
        assert_eq!(grass.size(), Some(4));

        if let Vitals::Grown { size } = &mut grass.vitals {
            *size = 1;
        }
        grass.consumed();
        assert!(!grass.alive);
        assert_eq!(grass.size(), Some(0));
    }

    #[test]
    fn test_growth_is_capped() {
        let mut grass = Organism::newborn(OrganismId(1), Species::Grass, Coordinate::new(0, 0, 0));
        grass.grow();
        assert_eq!(grass.size(), Some(5));
    }

    #[test]
    fn test_breeding_age_gate() {
        let mut fox = Organism::newborn(OrganismId(1), Species::Fox, coord());
        assert!(!fox.can_breed());
        fox.age = 15;
        assert!(fox.can_breed());
    }
}
