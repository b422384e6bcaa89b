// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! FIFO post-transform vertex cache simulation.
//!
//! Referencing a resident vertex is a hit and leaves the cache untouched.
//! Referencing an absent vertex is a miss: it is inserted as the newest
//! entry, evicting the oldest one when the cache is full.

use std::collections::VecDeque;

/// A bounded FIFO cache of vertex indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexCache {
    capacity: usize,
    entries: VecDeque<u32>,
}

impl VertexCache {
    /// Creates an empty cache holding at most `capacity` vertices.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn contains(&self, vertex: u32) -> bool {
        self.entries.contains(&vertex)
    }

    /// Resident vertices, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = u32> + '_ {
        self.entries.iter().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// References one vertex. Returns `true` on a hit.
    pub fn push(&mut self, vertex: u32) -> bool {
        if self.contains(vertex) {
            return true;
        }
        if self.capacity == 0 {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(vertex);
        false
    }

    /// References every vertex of `sequence` in order and returns the number
    /// of hits. The cache keeps the resulting state.
    pub fn push_all(&mut self, sequence: &[u32]) -> usize {
        sequence.iter().filter(|&&v| self.push(v)).count()
    }

    /// Scores `sequence` starting from this cache's state, without changing
    /// it. Returns the hit count and the state the cache would end up in.
    pub fn evaluate(&self, sequence: &[u32]) -> (usize, VertexCache) {
        let mut after = self.clone();
        let hits = after.push_all(sequence);
        (hits, after)
    }

    /// Like [`evaluate`](Self::evaluate), but writes the final state into a
    /// caller-owned scratch cache so repeated scoring does not allocate.
    pub fn evaluate_into(&self, sequence: &[u32], scratch: &mut VertexCache) -> usize {
        scratch.clone_from(self);
        scratch.push_all(sequence)
    }
}

/// Counts the hits of `sequence` on an initially empty cache.
///
/// This is the reference measure for a finished draw order.
pub fn count_hits(capacity: usize, sequence: &[u32]) -> usize {
    VertexCache::new(capacity).push_all(sequence)
}
