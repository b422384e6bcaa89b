// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Batch file formats.

use serde::{Deserialize, Serialize};
use tristrip_core::{Stripification, StripifyStats};

/// Input document: a list of named index buffers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchInput {
    pub meshes: Vec<MeshInput>,
}

/// One mesh to stripify.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshInput {
    pub name: String,
    /// Flat triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

/// Output document, meshes in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchOutput {
    pub meshes: Vec<MeshOutput>,
}

/// Stripification result of one mesh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshOutput {
    pub name: String,
    /// Index sequence of each strip.
    pub strips: Vec<Vec<u32>>,
    /// Leftover triangles, original winding.
    pub triangle_list: Vec<u32>,
    pub stats: StripifyStats,
    /// FIFO cache hits of the full draw sequence on an empty cache.
    pub cache_hits: usize,
}

impl MeshOutput {
    pub fn new(name: String, result: Stripification, cache_capacity: usize) -> Self {
        let cache_hits = result.cache_hits(cache_capacity);
        Self {
            name,
            strips: result.strips.into_iter().map(|s| s.indices).collect(),
            triangle_list: result.triangle_list,
            stats: result.stats,
            cache_hits,
        }
    }

    /// Indices a renderer submits for this mesh.
    pub fn index_count(&self) -> usize {
        self.strips.iter().map(Vec::len).sum::<usize>() + self.triangle_list.len()
    }
}
