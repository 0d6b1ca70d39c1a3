//! Unique id and random number source for description operations.
//!
//! One generator is created per run, seeded once, and handed explicitly to
//! every operation that needs fresh ids. Its state is persisted with saved
//! snapshots so that ids handed out after a reload never collide with ids
//! already stored in the loaded data.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Persistable part of an [`IdGenerator`].
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdGeneratorState {
    /// Last id handed out.
    pub last_id: u64,
}

#[derive(Debug, Clone)]
pub struct IdGenerator {
    last_id: u64,
    rng: ChaCha8Rng,
}

impl IdGenerator {
    /// Creates a generator whose first id is 1.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            last_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Returns a fresh id, strictly greater than every id returned before.
    pub fn get_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }

    /// Uniform real in `[min, max)`; returns `min` for an empty range.
    pub fn random_real(&mut self, min: f64, max: f64) -> f64 {
        if min < max {
            self.rng.gen_range(min..max)
        } else {
            min
        }
    }

    /// Uniform integer in `[0, upper)`; returns 0 when `upper` is 0.
    pub fn random_int(&mut self, upper: usize) -> usize {
        if upper == 0 {
            0
        } else {
            self.rng.gen_range(0..upper)
        }
    }

    #[must_use]
    pub fn state(&self) -> IdGeneratorState {
        IdGeneratorState {
            last_id: self.last_id,
        }
    }

    /// Restores a persisted state. The counter never moves backwards.
    pub fn restore(&mut self, state: IdGeneratorState) {
        self.ensure_above(state.last_id);
    }

    /// Makes sure later ids are greater than `max_id`, e.g. after importing data.
    pub fn ensure_above(&mut self, max_id: u64) {
        if max_id > self.last_id {
            tracing::debug!(from = self.last_id, to = max_id, "Advancing id counter");
            self.last_id = max_id;
        }
    }
}
