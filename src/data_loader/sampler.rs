//! src/data_loader/sampler.rs
//! Samplers for the data loader.
//!
//! A `Sampler` produces a sequence of indices into a map-style dataset.
//! Two implementations are provided:
//!  * `SequentialSampler` – yields 0..end in order.
//!  * `ShuffleSampler`    – yields 0..len in a deterministic shuffled order.

use rand_chacha::ChaCha20Rng;
use rand_chacha::rand_core::{RngCore, SeedableRng};

/// Trait for index producers.
pub trait Sampler: Send {
    /// Return the next index to fetch, or `None` when exhausted.
    fn next_index(&mut self) -> Option<usize>;
    /// (Optional) remaining items hint.
    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Yields `0, 1, 2, …, end-1` once.
#[derive(Debug, Clone)]
pub struct SequentialSampler {
    curr: usize,
    end: usize,
}

impl SequentialSampler {
    /// Create a sequential sampler over `[0, end)`.
    pub fn new(end: usize) -> Self {
        Self { curr: 0, end }
    }
}

impl Sampler for SequentialSampler {
    fn next_index(&mut self) -> Option<usize> {
        if self.curr < self.end {
            let i = self.curr;
            self.curr += 1;
            Some(i)
        } else {
            None
        }
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.end.saturating_sub(self.curr))
    }
}

/// Yields all indices `0..len` in a deterministic shuffled order.
///
/// Every index appears exactly once per pass (sampling without
/// replacement); a new sampler with a new seed gives a fresh order.
#[derive(Debug, Clone)]
pub struct ShuffleSampler {
    indices: Vec<usize>,
    pos: usize,
}

impl ShuffleSampler {
    /// Create a shuffled sampler for `len` items, using `seed`.
    pub fn new(len: usize, seed: u64) -> Self {
        let mut indices: Vec<usize> = (0..len).collect();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);

        // Fisher–Yates
        for i in (1..len).rev() {
            let j = (rng.next_u32() as usize) % (i + 1);
            indices.swap(i, j);
        }

        Self { indices, pos: 0 }
    }
}

impl Sampler for ShuffleSampler {
    fn next_index(&mut self) -> Option<usize> {
        if self.pos < self.indices.len() {
            let i = self.indices[self.pos];
            self.pos += 1;
            Some(i)
        } else {
            None
        }
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.indices.len().saturating_sub(self.pos))
    }
}
