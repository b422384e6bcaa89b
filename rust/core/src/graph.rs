// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle adjacency graph.
//!
//! Builds, from a flat triangle index list, a graph where:
//! - **Nodes** = triangles, identified by their position in the input list
//! - **Edges** = shared mesh edges, one neighbor slot per triangle edge
//!
//! Slot `i` of a triangle refers to the edge from corner `i` to corner
//! `i + 1` (mod 3). A slot holds the neighbor across that edge, or `None` on
//! a mesh boundary, on a degenerate edge (repeated vertex), or when every
//! other triangle on the edge is an exact duplicate.
//!
//! ## Non-manifold edges
//!
//! When more than two triangles share an edge, each of them is linked to the
//! first *other* triangle that referenced the edge in input order. The graph
//! is therefore not always symmetric on such edges. This is a known
//! approximation, not an error.
//!
//! The graph is immutable once built. Whether a neighbor is still available
//! is tracked by the caller (see [`Stripifier`](crate::Stripifier)).

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Position of a triangle in the source index list.
pub type TriangleId = usize;

/// A triangle as three vertex indices in original winding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triangle {
    pub vertices: [u32; 3],
}

impl Triangle {
    #[inline]
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { vertices: [a, b, c] }
    }

    /// The edge in slot `slot`, as (start, end) in winding order.
    #[inline]
    pub fn edge(&self, slot: usize) -> (u32, u32) {
        (self.vertices[slot], self.vertices[(slot + 1) % 3])
    }

    /// The corner not on edge `slot`.
    #[inline]
    pub fn opposite(&self, slot: usize) -> u32 {
        self.vertices[(slot + 2) % 3]
    }

    /// Returns `true` if two corners share a vertex index.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let [a, b, c] = self.vertices;
        a == b || b == c || a == c
    }

    /// Returns the slot whose edge joins `a` and `b` in either direction.
    pub fn slot_of(&self, a: u32, b: u32) -> Option<usize> {
        (0..3).find(|&slot| {
            let (u, v) = self.edge(slot);
            (u == a && v == b) || (u == b && v == a)
        })
    }

    /// Returns the vertex that is neither `a` nor `b`.
    ///
    /// Only meaningful for non-degenerate triangles that contain both.
    pub fn third_vertex(&self, a: u32, b: u32) -> Option<u32> {
        self.vertices.iter().copied().find(|&v| v != a && v != b)
    }

    /// Returns `true` if `order` lists the same corners with the same facing,
    /// i.e. it is a cyclic rotation of this triangle.
    pub fn has_winding(&self, order: [u32; 3]) -> bool {
        let [a, b, c] = self.vertices;
        order == [a, b, c] || order == [b, c, a] || order == [c, a, b]
    }

    /// Returns `true` if both triangles use the same vertex set.
    pub fn same_corners(&self, other: &Triangle) -> bool {
        let mut lhs = self.vertices;
        let mut rhs = other.vertices;
        lhs.sort_unstable();
        rhs.sort_unstable();
        lhs == rhs
    }
}

/// Unordered vertex pair used as a lookup key while linking triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey(u32, u32);

impl EdgeKey {
    #[inline]
    fn new(a: u32, b: u32) -> Self {
        if a <= b {
            EdgeKey(a, b)
        } else {
            EdgeKey(b, a)
        }
    }
}

/// Counters gathered while linking triangles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphStats {
    pub triangles: usize,
    pub degenerate_triangles: usize,
    /// Distinct non-degenerate edges used by exactly one triangle.
    pub boundary_edges: usize,
    /// Distinct edges used by more than two triangles.
    pub non_manifold_edges: usize,
}

/// Triangle arena with up to three neighbor links per triangle.
#[derive(Debug, Clone)]
pub struct TriangleGraph {
    triangles: Vec<Triangle>,
    neighbors: Vec<[Option<TriangleId>; 3]>,
    /// Triangles linking to an entry that does not link back.
    back_links: Vec<SmallVec<[TriangleId; 2]>>,
    stats: GraphStats,
}

impl TriangleGraph {
    /// Builds the graph from a flat index list (three indices per triangle).
    ///
    /// # Example
    ///
    /// ```
    /// use tristrip_core::TriangleGraph;
    ///
    /// // A quad split along its 0-2 diagonal.
    /// let graph = TriangleGraph::build(&[0, 1, 2, 0, 2, 3]).unwrap();
    /// assert_eq!(graph.len(), 2);
    /// assert_eq!(graph.neighbors(0), [None, None, Some(1)]);
    /// assert_eq!(graph.neighbors(1), [Some(0), None, None]);
    /// ```
    pub fn build(indices: &[u32]) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidInputShape {
                index_count: indices.len(),
            });
        }

        let triangles: Vec<Triangle> = indices
            .chunks_exact(3)
            .map(|c| Triangle::new(c[0], c[1], c[2]))
            .collect();

        // Edge -> triangles referencing it, in input order
        let mut edge_map: FxHashMap<EdgeKey, SmallVec<[TriangleId; 2]>> =
            FxHashMap::with_capacity_and_hasher(triangles.len() * 2, Default::default());

        for (id, tri) in triangles.iter().enumerate() {
            for slot in 0..3 {
                let (a, b) = tri.edge(slot);
                if a == b {
                    continue;
                }
                let users = edge_map.entry(EdgeKey::new(a, b)).or_default();
                // A degenerate triangle can name the same edge twice
                if users.last() != Some(&id) {
                    users.push(id);
                }
            }
        }

        let mut neighbors = vec![[None; 3]; triangles.len()];
        for (id, tri) in triangles.iter().enumerate() {
            for slot in 0..3 {
                let (a, b) = tri.edge(slot);
                if a == b {
                    continue;
                }
                neighbors[id][slot] = edge_map.get(&EdgeKey::new(a, b)).and_then(|users| {
                    users
                        .iter()
                        .copied()
                        .find(|&other| other != id && !triangles[other].same_corners(tri))
                });
            }
        }

        // Only non-manifold edges produce one-way links
        let mut back_links: Vec<SmallVec<[TriangleId; 2]>> = vec![SmallVec::new(); triangles.len()];
        for (id, slots) in neighbors.iter().enumerate() {
            for n in slots.iter().flatten().copied() {
                if !neighbors[n].contains(&Some(id)) && !back_links[n].contains(&id) {
                    back_links[n].push(id);
                }
            }
        }

        let stats = GraphStats {
            triangles: triangles.len(),
            degenerate_triangles: triangles.iter().filter(|t| t.is_degenerate()).count(),
            boundary_edges: edge_map.values().filter(|users| users.len() == 1).count(),
            non_manifold_edges: edge_map.values().filter(|users| users.len() > 2).count(),
        };

        tracing::debug!(
            triangles = stats.triangles,
            degenerate = stats.degenerate_triangles,
            boundary_edges = stats.boundary_edges,
            non_manifold_edges = stats.non_manifold_edges,
            "Built triangle graph"
        );

        Ok(Self {
            triangles,
            neighbors,
            back_links,
            stats,
        })
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    #[inline]
    pub fn triangle(&self, id: TriangleId) -> &Triangle {
        &self.triangles[id]
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Returns the neighbor slots of a triangle.
    #[inline]
    pub fn neighbors(&self, id: TriangleId) -> [Option<TriangleId>; 3] {
        self.neighbors[id]
    }

    /// Returns the neighbor across edge `slot` of triangle `id`.
    #[inline]
    pub fn neighbor(&self, id: TriangleId, slot: usize) -> Option<TriangleId> {
        self.neighbors[id][slot]
    }

    /// Returns the neighbor across the edge joining `a` and `b`, if that
    /// edge belongs to triangle `id`.
    pub fn neighbor_across(&self, id: TriangleId, a: u32, b: u32) -> Option<TriangleId> {
        if a == b {
            return None;
        }
        self.triangles[id]
            .slot_of(a, b)
            .and_then(|slot| self.neighbors[id][slot])
    }

    /// Triangles whose neighbor slots point at `id` while `id` does not
    /// point back. Empty unless `id` sits on a non-manifold edge.
    pub fn back_links(&self, id: TriangleId) -> &[TriangleId] {
        &self.back_links[id]
    }

    /// Counts the distinct neighbors of `id` that `is_available` accepts.
    pub fn degree_where(&self, id: TriangleId, mut is_available: impl FnMut(TriangleId) -> bool) -> usize {
        let mut seen: SmallVec<[TriangleId; 3]> = SmallVec::new();
        for n in self.neighbors[id].iter().flatten().copied() {
            if !seen.contains(&n) && is_available(n) {
                seen.push(n);
            }
        }
        seen.len()
    }

    pub fn stats(&self) -> GraphStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Four triangles forming a strip: 0 1 2 3 4 5.
    fn make_row() -> TriangleGraph {
        TriangleGraph::build(&[0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5]).unwrap()
    }

    #[test]
    fn rejects_partial_triangles() {
        let err = TriangleGraph::build(&[0, 1, 2, 3]).unwrap_err();
        assert_eq!(err, Error::InvalidInputShape { index_count: 4 });
    }

    #[test]
    fn empty_input() {
        let graph = TriangleGraph::build(&[]).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.stats(), GraphStats::default());
    }

    #[test]
    fn row_adjacency() {
        let graph = make_row();
        assert_eq!(graph.len(), 4);
        assert_eq!(graph.neighbors(0), [None, Some(1), None]);
        assert_eq!(graph.neighbors(1), [Some(0), None, Some(2)]);
        assert_eq!(graph.neighbors(2), [Some(1), Some(3), None]);
        assert_eq!(graph.neighbors(3), [Some(2), None, None]);

        let stats = graph.stats();
        assert_eq!(stats.boundary_edges, 6);
        assert_eq!(stats.non_manifold_edges, 0);
    }

    #[test]
    fn neighbor_lookup_ignores_direction() {
        let graph = make_row();
        assert_eq!(graph.neighbor_across(2, 3, 2), Some(1));
        assert_eq!(graph.neighbor_across(2, 2, 3), Some(1));
        assert_eq!(graph.neighbor_across(2, 2, 5), None);
    }

    #[test]
    fn degree_counts_available_neighbors() {
        let graph = make_row();
        assert_eq!(graph.degree_where(1, |_| true), 2);
        assert_eq!(graph.degree_where(1, |n| n != 0), 1);
        assert_eq!(graph.degree_where(3, |_| false), 0);
    }

    #[test]
    fn non_manifold_edge_uses_first_seen() {
        // Three triangles on edge 0-1
        let graph = TriangleGraph::build(&[0, 1, 2, 1, 0, 3, 0, 1, 4]).unwrap();
        assert_eq!(graph.neighbor(0, 0), Some(1));
        assert_eq!(graph.neighbor(1, 0), Some(0));
        assert_eq!(graph.neighbor(2, 0), Some(0));
        assert_eq!(graph.stats().non_manifold_edges, 1);

        // The link from 2 to 0 is one-way
        assert_eq!(graph.back_links(0), &[2]);
        assert!(graph.back_links(1).is_empty());
        assert!(graph.back_links(2).is_empty());
    }

    #[test]
    fn duplicates_are_not_neighbors() {
        let graph = TriangleGraph::build(&[0, 1, 2, 2, 1, 0]).unwrap();
        assert_eq!(graph.neighbors(0), [None, None, None]);
        assert_eq!(graph.neighbors(1), [None, None, None]);
    }

    #[test]
    fn degenerate_edges_have_no_neighbor() {
        let graph = TriangleGraph::build(&[0, 0, 1, 0, 1, 2]).unwrap();
        let degenerate = graph.triangle(0);
        assert!(degenerate.is_degenerate());
        assert_eq!(graph.neighbor(0, 0), None);
        assert_eq!(graph.neighbor(0, 1), Some(1));
        assert_eq!(graph.neighbor(0, 2), Some(1));
        assert_eq!(graph.degree_where(0, |_| true), 1);
        assert_eq!(graph.stats().degenerate_triangles, 1);
    }

    #[test]
    fn triangle_helpers() {
        let tri = Triangle::new(4, 3, 5);
        assert_eq!(tri.edge(2), (5, 4));
        assert_eq!(tri.opposite(0), 5);
        assert_eq!(tri.slot_of(3, 4), Some(0));
        assert_eq!(tri.third_vertex(5, 4), Some(3));
        assert!(tri.has_winding([3, 5, 4]));
        assert!(!tri.has_winding([3, 4, 5]));
        assert!(tri.same_corners(&Triangle::new(5, 4, 3)));
    }
}
