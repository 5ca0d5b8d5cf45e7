//! 3D occupancy grid for the world.
//!
//! The grid is a pure spatial index: it stores organism ids, never organisms.
//! The simulation arena owns the entities and keeps each one's recorded
//! position in sync with its slot here.

use ecosim_core::{Coordinate, OrganismId, WorldConfig};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A layered rectangular grid where each cell holds at most one organism.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub height: i32,
    pub width: i32,
    pub depth: i32,
    slots: Vec<Option<OrganismId>>,
}

impl Grid {
    pub fn new(height: i32, width: i32, depth: i32) -> Self {
        let size = (height * width * depth) as usize;
        Self {
            height,
            width,
            depth,
            slots: vec![None; size],
        }
    }

    pub fn from_config(config: &WorldConfig) -> Self {
        Self::new(config.height, config.width, config.depth)
    }

    pub fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.row >= 0
            && coord.row < self.height
            && coord.col >= 0
            && coord.col < self.width
            && coord.layer >= 0
            && coord.layer < self.depth
    }

    fn index(&self, coord: Coordinate) -> Option<usize> {
        if self.in_bounds(coord) {
            Some(((coord.row * self.width + coord.col) * self.depth + coord.layer) as usize)
        } else {
            None
        }
    }

    /// Fill the slot at `coord`.
    ///
    /// Placing into an occupied cell orphans the prior occupant; callers
    /// must clear first. The original model silently overwrote here, which
    /// is treated as a programming error: trapped in debug builds, logged
    /// and overwritten in release.
    pub fn place(&mut self, id: OrganismId, coord: Coordinate) {
        let Some(index) = self.index(coord) else {
            debug_assert!(false, "place out of bounds at {coord}");
            warn!(%coord, %id, "ignored out-of-bounds place");
            return;
        };
        if let Some(prev) = self.slots[index] {
            if prev != id {
                debug_assert!(false, "place into occupied cell {coord}");
                warn!(%coord, %id, %prev, "overwrote occupant");
            }
        }
        self.slots[index] = Some(id);
    }

    /// Empty the slot at `coord`.
    pub fn clear(&mut self, coord: Coordinate) {
        let Some(index) = self.index(coord) else {
            debug_assert!(false, "clear out of bounds at {coord}");
            warn!(%coord, "ignored out-of-bounds clear");
            return;
        };
        self.slots[index] = None;
    }

    pub fn occupant_at(&self, coord: Coordinate) -> Option<OrganismId> {
        self.index(coord).and_then(|i| self.slots[i])
    }

    pub fn is_free(&self, coord: Coordinate) -> bool {
        self.in_bounds(coord) && self.occupant_at(coord).is_none()
    }

    /// In-bounds coordinates on the Chebyshev ring at exactly `distance`
    /// around `coord`, excluding `coord` itself, in uniformly shuffled order.
    ///
    /// With `same_layer_only` the ring stays on the origin's layer; otherwise
    /// it spans every layer. Shuffling here centralizes randomness: every
    /// first-match scan over the result is a uniform random choice among the
    /// eligible cells.
    pub fn neighbors<R: Rng + ?Sized>(
        &self,
        coord: Coordinate,
        distance: i32,
        same_layer_only: bool,
        rng: &mut R,
    ) -> Vec<Coordinate> {
        let mut locations = Vec::new();
        if distance <= 0 {
            return locations;
        }

        for row_offset in -distance..=distance {
            let row = coord.row + row_offset;
            if row < 0 || row >= self.height {
                continue;
            }
            for col_offset in -distance..=distance {
                // Ring cells only, not the filled square.
                if row_offset.abs() < distance && col_offset.abs() < distance {
                    continue;
                }
                let col = coord.col + col_offset;
                if col < 0 || col >= self.width {
                    continue;
                }
                if same_layer_only {
                    locations.push(Coordinate::new(row, col, coord.layer));
                } else {
                    for layer in 0..self.depth {
                        locations.push(Coordinate::new(row, col, layer));
                    }
                }
            }
        }

        locations.shuffle(rng);
        locations
    }

    /// `neighbors` filtered to empty slots.
    pub fn free_neighbors<R: Rng + ?Sized>(
        &self,
        coord: Coordinate,
        distance: i32,
        same_layer_only: bool,
        rng: &mut R,
    ) -> Vec<Coordinate> {
        self.neighbors(coord, distance, same_layer_only, rng)
            .into_iter()
            .filter(|next| self.occupant_at(*next).is_none())
            .collect()
    }

    /// Iterator over all occupied cells.
    pub fn occupied(&self) -> impl Iterator<Item = (Coordinate, OrganismId)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.map(|id| (self.coordinate_of(i), id))
        })
    }

    fn coordinate_of(&self, index: usize) -> Coordinate {
        let index = index as i32;
        let layer = index % self.depth;
        let col = (index / self.depth) % self.width;
        let row = index / (self.depth * self.width);
        Coordinate::new(row, col, layer)
    }
}
