// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Round-based stripification.
//!
//! Every triangle starts pending. Each round grows candidates from pending
//! seeds, keeps the single best one according to the [`Policy`] rules,
//! commits it, and marks its triangles consumed. Rounds stop once no
//! candidate reaches the minimum strip size; whatever is still pending is
//! returned as a plain triangle list.
//!
//! With [`SeedSearch::Exhaustive`] a round scans all pending triangles in
//! input order and compares the per-seed winners with the same rules. With
//! [`SeedSearch::Loneliest`] a round only evaluates the pending triangle with
//! the fewest pending neighbors, found through a lazily updated heap.
//!
//! When cache simulation is on, candidates are scored against the cache
//! state left by the strips already committed (or against an empty cache
//! when `carry_cache` is off).

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::builder::StripBuilder;
use crate::cache::{count_hits, VertexCache};
use crate::config::{SeedSearch, StripifyConfig};
use crate::error::{Error, Result};
use crate::graph::{GraphStats, TriangleGraph, TriangleId};
use crate::policy::Policy;
use crate::strip::Strip;

/// Counters describing one stripification run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StripifyStats {
    pub graph: GraphStats,
    /// Committed strips, one per round.
    pub strips: usize,
    pub stripped_triangles: usize,
    pub standalone_triangles: usize,
}

impl StripifyStats {
    /// Mean triangles per committed strip, 0 when there are none.
    pub fn average_strip_size(&self) -> f64 {
        if self.strips == 0 {
            return 0.0;
        }
        self.stripped_triangles as f64 / self.strips as f64
    }
}

/// Result of stripifying one triangle list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Stripification {
    /// Strips in commit order.
    pub strips: Vec<Strip>,
    /// Triangles left out of every strip, in input order.
    pub standalone: Vec<TriangleId>,
    /// Flat indices of `standalone`, in original winding.
    pub triangle_list: Vec<u32>,
    pub stats: StripifyStats,
}

impl Stripification {
    /// Total triangles covered by strips and the triangle list.
    pub fn triangle_count(&self) -> usize {
        self.stats.stripped_triangles + self.standalone.len()
    }

    /// All strip indices in commit order followed by the triangle list:
    /// the order in which a renderer would submit vertices.
    pub fn draw_sequence(&self) -> Vec<u32> {
        let len = self.strips.iter().map(|s| s.indices.len()).sum::<usize>() + self.triangle_list.len();
        let mut out = Vec::with_capacity(len);
        for strip in &self.strips {
            out.extend_from_slice(&strip.indices);
        }
        out.extend_from_slice(&self.triangle_list);
        out
    }

    /// Hits of [`draw_sequence`](Self::draw_sequence) on an empty FIFO cache.
    pub fn cache_hits(&self, capacity: usize) -> usize {
        count_hits(capacity, &self.draw_sequence())
    }
}

/// Converts triangle lists into strips according to a [`StripifyConfig`].
#[derive(Debug, Clone)]
pub struct Stripifier {
    config: StripifyConfig,
}

impl Stripifier {
    /// Creates a stripifier after validating `config`.
    pub fn new(config: StripifyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &StripifyConfig {
        &self.config
    }

    /// Stripifies a flat index list (three indices per triangle).
    pub fn stripify(&self, indices: &[u32]) -> Result<Stripification> {
        let graph = TriangleGraph::build(indices)?;
        self.stripify_graph(&graph, None)
    }

    /// Like [`stripify`](Self::stripify), but gives up with
    /// [`Error::Cancelled`] once `cancel` is set. The flag is checked between
    /// rounds only.
    pub fn stripify_with_cancel(&self, indices: &[u32], cancel: &AtomicBool) -> Result<Stripification> {
        let graph = TriangleGraph::build(indices)?;
        self.stripify_graph(&graph, Some(cancel))
    }

    /// Stripifies an already built graph.
    pub fn stripify_graph(&self, graph: &TriangleGraph, cancel: Option<&AtomicBool>) -> Result<Stripification> {
        let mut run = Run::new(graph, &self.config, cancel);
        match self.config.search {
            SeedSearch::Exhaustive => run.exhaustive()?,
            SeedSearch::Loneliest => run.loneliest()?,
        }
        let result = run.finish();

        tracing::debug!(
            triangles = graph.len(),
            strips = result.stats.strips,
            standalone = result.stats.standalone_triangles,
            search = %self.config.search,
            "Stripification complete"
        );

        Ok(result)
    }
}

/// Stripifies `indices` with `config`.
///
/// # Example
///
/// ```
/// use tristrip_core::{stripify, StripifyConfig};
///
/// let config = StripifyConfig::default().with_cache_simulation(false);
/// let result = stripify(&[0, 1, 2, 0, 2, 3], &config).unwrap();
///
/// assert_eq!(result.strips.len(), 1);
/// assert_eq!(result.strips[0].size(), 2);
/// assert!(result.triangle_list.is_empty());
/// ```
pub fn stripify(indices: &[u32], config: &StripifyConfig) -> Result<Stripification> {
    Stripifier::new(config.clone())?.stripify(indices)
}

/// State owned by a single stripification call.
struct Run<'a> {
    config: &'a StripifyConfig,
    cancel: Option<&'a AtomicBool>,
    builder: StripBuilder<'a>,
    consumed: Vec<bool>,
    /// Cache state after every committed strip.
    committed: VertexCache,
    scratch_cache: VertexCache,
    candidate: Strip,
    seed_policy: Policy,
    strips: Vec<Strip>,
}

impl<'a> Run<'a> {
    fn new(graph: &'a TriangleGraph, config: &'a StripifyConfig, cancel: Option<&'a AtomicBool>) -> Self {
        Self {
            config,
            cancel,
            builder: StripBuilder::new(graph, config.backward_search),
            consumed: vec![false; graph.len()],
            committed: VertexCache::new(config.cache_capacity),
            scratch_cache: VertexCache::new(config.cache_capacity),
            candidate: Strip::new(),
            seed_policy: Policy::new(config.policy_rules()),
            strips: Vec::new(),
        }
    }

    fn check_cancel(&self) -> Result<()> {
        match self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled {
                rounds: self.strips.len(),
            }),
            _ => Ok(()),
        }
    }

    /// Grows the three candidates of `seed` and leaves the winner in
    /// `seed_policy`.
    fn evaluate_seed(&mut self, seed: TriangleId) {
        self.seed_policy.reset();
        for edge in 0..3 {
            let degree = self.builder.grow(seed, edge, &self.consumed, &mut self.candidate);
            let hits = if self.config.cache_simulation {
                self.committed
                    .evaluate_into(&self.candidate.indices, &mut self.scratch_cache)
            } else {
                0
            };
            self.seed_policy.challenge(&self.candidate, degree, hits);
        }
    }

    fn commit(&mut self, strip: Strip) {
        for &t in &strip.triangles {
            debug_assert!(!self.consumed[t], "triangle {t} committed twice");
            self.consumed[t] = true;
        }
        if self.config.cache_simulation && self.config.carry_cache {
            self.committed.push_all(&strip.indices);
        }
        tracing::trace!(
            round = self.strips.len(),
            size = strip.size(),
            first = ?strip.triangles.first(),
            "Committed strip"
        );
        self.strips.push(strip);
    }

    fn exhaustive(&mut self) -> Result<()> {
        let mut pending: Vec<TriangleId> = (0..self.consumed.len()).collect();
        let mut round_policy = Policy::new(self.config.policy_rules());

        while !pending.is_empty() {
            self.check_cancel()?;
            round_policy.reset();

            for &seed in &pending {
                self.evaluate_seed(seed);
                let best = self.seed_policy.best();
                if !best.strip.is_empty() {
                    round_policy.challenge(&best.strip, best.score.degree, best.score.cache_hits);
                }
            }

            if round_policy.best_strip().is_empty() {
                break;
            }
            self.commit(round_policy.best_strip().clone());
            pending.retain(|&t| !self.consumed[t]);
        }
        Ok(())
    }

    fn loneliest(&mut self) -> Result<()> {
        let graph = self.builder.graph();
        let mut degrees: Vec<usize> = (0..graph.len())
            .map(|t| self.builder.degree(t, &self.consumed))
            .collect();
        let mut heap: BinaryHeap<Reverse<(usize, TriangleId)>> = degrees
            .iter()
            .enumerate()
            .map(|(t, &d)| Reverse((d, t)))
            .collect();
        // Seeds that produced nothing worth committing
        let mut retired = vec![false; graph.len()];

        while let Some(Reverse((degree, seed))) = heap.pop() {
            if self.consumed[seed] || retired[seed] || degrees[seed] != degree {
                continue;
            }
            self.check_cancel()?;

            self.evaluate_seed(seed);
            if self.seed_policy.best_strip().is_empty() {
                retired[seed] = true;
                continue;
            }
            let strip = self.seed_policy.best_strip().clone();
            self.commit(strip);
            if let Some(strip) = self.strips.last() {
                self.refresh_degrees(&strip.triangles, &mut degrees, &mut heap);
            }
        }
        Ok(())
    }

    /// Recomputes the degree of every pending triangle linked with a
    /// `committed` one, in either direction, and queues the changed keys.
    ///
    /// Degrees only decrease, so each (degree, triangle) pair is pushed once.
    fn refresh_degrees(
        &self,
        committed: &[TriangleId],
        degrees: &mut [usize],
        heap: &mut BinaryHeap<Reverse<(usize, TriangleId)>>,
    ) {
        let graph = self.builder.graph();
        for &t in committed {
            let linked = graph
                .neighbors(t)
                .into_iter()
                .flatten()
                .chain(graph.back_links(t).iter().copied());
            for n in linked {
                if self.consumed[n] {
                    continue;
                }
                let d = graph.degree_where(n, |m| !self.consumed[m]);
                if d != degrees[n] {
                    degrees[n] = d;
                    heap.push(Reverse((d, n)));
                }
            }
        }
    }

    fn finish(self) -> Stripification {
        let graph = self.builder.graph();
        let standalone: Vec<TriangleId> = (0..graph.len()).filter(|&t| !self.consumed[t]).collect();
        let mut triangle_list = Vec::with_capacity(standalone.len() * 3);
        for &t in &standalone {
            triangle_list.extend_from_slice(&graph.triangle(t).vertices);
        }

        let stats = StripifyStats {
            graph: graph.stats(),
            strips: self.strips.len(),
            stripped_triangles: self.strips.iter().map(Strip::size).sum(),
            standalone_triangles: standalone.len(),
        };

        Stripification {
            strips: self.strips,
            standalone,
            triangle_list,
            stats,
        }
    }
}
