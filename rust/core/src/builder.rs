// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Greedy strip growth from a seed triangle.
//!
//! A candidate starts as the seed alone, emitted so that its chosen start
//! edge is the strip's last edge. It then grows:
//!
//! 1. **Forward**: across the last two emitted vertices, appending the
//!    neighbor's third vertex.
//! 2. **Backward** (optional): across the first two emitted vertices,
//!    prepending the neighbor's third vertex. Each prepended triangle flips
//!    the parity of every later window, so backward growth is kept in pairs
//!    and an odd trailing triangle is released.
//!
//! A step is taken only into a neighbor that is still pending, not already
//! in the candidate, not degenerate, and whose original winding matches the
//! winding implied by its window position. Strips never need restart
//! markers or degenerate padding.

use crate::graph::{TriangleGraph, TriangleId};
use crate::strip::Strip;

/// Reusable strip grower bound to one graph.
///
/// Holds scratch state only, so one builder can serve a whole
/// stripification run without reallocating.
#[derive(Debug)]
pub struct StripBuilder<'g> {
    graph: &'g TriangleGraph,
    backward_search: bool,
    /// `stamps[t] == generation` marks triangles in the current candidate.
    stamps: Vec<u32>,
    generation: u32,
    /// Backward chain as (triangle, prepended vertex), nearest first.
    backward: Vec<(TriangleId, u32)>,
}

impl<'g> StripBuilder<'g> {
    pub fn new(graph: &'g TriangleGraph, backward_search: bool) -> Self {
        Self {
            graph,
            backward_search,
            stamps: vec![0; graph.len()],
            generation: 0,
            backward: Vec::new(),
        }
    }

    pub fn graph(&self) -> &'g TriangleGraph {
        self.graph
    }

    /// Number of distinct pending neighbors of `seed` (0-3).
    ///
    /// Lonelier triangles are consumed first since stranding them later
    /// costs more.
    pub fn degree(&self, seed: TriangleId, consumed: &[bool]) -> usize {
        self.graph.degree_where(seed, |n| !consumed[n])
    }

    /// Grows a candidate strip from `seed`, first extending across edge slot
    /// `start_edge` (0-2). The candidate is written into `out`.
    ///
    /// Returns the seed's degree at the time of evaluation.
    pub fn grow(
        &mut self,
        seed: TriangleId,
        start_edge: usize,
        consumed: &[bool],
        out: &mut Strip,
    ) -> usize {
        debug_assert!(start_edge < 3);
        let degree = self.degree(seed, consumed);

        out.clear();
        self.next_generation();

        let tri = *self.graph.triangle(seed);
        let (a, b) = tri.edge(start_edge);
        out.indices.extend_from_slice(&[tri.opposite(start_edge), a, b]);
        out.triangles.push(seed);
        self.stamps[seed] = self.generation;

        self.grow_forward(consumed, out);
        if self.backward_search {
            self.grow_backward(consumed, out);
        }

        degree
    }

    fn grow_forward(&mut self, consumed: &[bool], out: &mut Strip) {
        loop {
            let n = out.indices.len();
            let (x, y) = (out.indices[n - 2], out.indices[n - 1]);
            let last = out.triangles[out.triangles.len() - 1];
            let odd = out.triangles.len() % 2 == 1;

            let step = self.step(last, x, y, consumed, move |r| {
                if odd {
                    [y, x, r]
                } else {
                    [x, y, r]
                }
            });
            let Some((next, r)) = step else { break };

            out.indices.push(r);
            out.triangles.push(next);
            self.stamps[next] = self.generation;
        }
    }

    fn grow_backward(&mut self, consumed: &[bool], out: &mut Strip) {
        self.backward.clear();
        let (mut p, mut q) = (out.indices[0], out.indices[1]);
        let mut front = out.triangles[0];

        loop {
            // With an even chain, the i-th prepended triangle sits at a
            // window whose parity equals i's.
            let odd = self.backward.len() % 2 == 0;
            let step = self.step(front, p, q, consumed, move |r| {
                if odd {
                    [p, r, q]
                } else {
                    [r, p, q]
                }
            });
            let Some((prev, r)) = step else { break };

            self.backward.push((prev, r));
            self.stamps[prev] = self.generation;
            q = p;
            p = r;
            front = prev;
        }

        if self.backward.len() % 2 == 1 {
            self.backward.pop();
        }
        let m = self.backward.len();
        if m == 0 {
            return;
        }

        out.indices.resize(out.indices.len() + m, 0);
        out.indices.rotate_right(m);
        out.triangles.resize(out.triangles.len() + m, 0);
        out.triangles.rotate_right(m);
        for (slot, &(tri, r)) in self.backward.iter().rev().enumerate() {
            out.indices[slot] = r;
            out.triangles[slot] = tri;
        }
    }

    /// Tries to cross edge (`a`, `b`) of `from`. `implied` maps the
    /// neighbor's third vertex to the winding its window would draw.
    fn step(
        &self,
        from: TriangleId,
        a: u32,
        b: u32,
        consumed: &[bool],
        implied: impl Fn(u32) -> [u32; 3],
    ) -> Option<(TriangleId, u32)> {
        let next = self.graph.neighbor_across(from, a, b)?;
        if consumed[next] || self.stamps[next] == self.generation {
            return None;
        }
        let tri = self.graph.triangle(next);
        if tri.is_degenerate() {
            return None;
        }
        let r = tri.third_vertex(a, b)?;
        tri.has_winding(implied(r)).then_some((next, r))
    }

    fn next_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.stamps.fill(0);
            self.generation = 1;
        }
    }
}
