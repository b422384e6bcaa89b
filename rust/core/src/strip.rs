// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Triangle strip representation.
//!
//! A strip of `N` triangles is encoded as `N + 2` vertex indices. Triangle
//! `k` is the window `indices[k..k + 3]`; on odd `k` its first two corners
//! are swapped to keep facing consistent, following the usual GPU
//! triangle-strip convention.

use crate::graph::TriangleId;

/// An ordered run of triangles sharing consecutive edges.
///
/// The empty strip (size 0) is the "no strip" sentinel used by the
/// selection policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strip {
    /// Vertex indices, `size() + 2` of them when non-empty.
    pub indices: Vec<u32>,
    /// Source triangles in strip order: `triangles[k]` is drawn by window `k`.
    pub triangles: Vec<TriangleId>,
}

impl Strip {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of triangles in the strip.
    #[inline]
    pub fn size(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Empties the strip, keeping its allocations.
    pub fn clear(&mut self) {
        self.indices.clear();
        self.triangles.clear();
    }

    /// Returns triangle `k` with the winding the GPU will rasterize.
    pub fn triangle(&self, k: usize) -> Option<[u32; 3]> {
        let w = self.indices.get(k..k + 3)?;
        Some(if k % 2 == 0 {
            [w[0], w[1], w[2]]
        } else {
            [w[1], w[0], w[2]]
        })
    }

    /// Iterates the strip's triangles in draw order.
    pub fn iter_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        (0..self.size()).filter_map(move |k| self.triangle(k))
    }

    /// Unpacks the strip into a flat triangle list.
    pub fn to_triangle_list(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.size() * 3);
        for tri in self.iter_triangles() {
            out.extend_from_slice(&tri);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sentinel() {
        let strip = Strip::new();
        assert!(strip.is_empty());
        assert_eq!(strip.size(), 0);
        assert_eq!(strip.triangle(0), None);
        assert!(strip.to_triangle_list().is_empty());
    }

    #[test]
    fn alternating_winding() {
        let strip = Strip {
            indices: vec![0, 1, 2, 3, 4, 5],
            triangles: vec![0, 1, 2, 3],
        };
        assert_eq!(strip.triangle(0), Some([0, 1, 2]));
        assert_eq!(strip.triangle(1), Some([2, 1, 3]));
        assert_eq!(strip.triangle(2), Some([2, 3, 4]));
        assert_eq!(strip.triangle(3), Some([4, 3, 5]));
        assert_eq!(strip.triangle(4), None);
        assert_eq!(
            strip.to_triangle_list(),
            vec![0, 1, 2, 2, 1, 3, 2, 3, 4, 4, 3, 5]
        );
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut strip = Strip {
            indices: vec![0, 1, 2],
            triangles: vec![0],
        };
        let capacity = strip.indices.capacity();
        strip.clear();
        assert!(strip.is_empty());
        assert_eq!(strip.indices.capacity(), capacity);
    }
}
