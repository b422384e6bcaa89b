// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parallel stripification of a batch of meshes.

use std::time::Instant;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tristrip_core::{SeedSearch, Stripifier, StripifyConfig};

use crate::types::{BatchInput, BatchOutput, MeshOutput};

/// Above this many triangles exhaustive search takes seconds or more.
const EXHAUSTIVE_WARN_TRIANGLES: usize = 5_000;

/// Returns `true` if `config` would scan `triangles` quadratically for too long.
fn is_slow_search(config: &StripifyConfig, triangles: usize) -> bool {
    config.search == SeedSearch::Exhaustive && triangles > EXHAUSTIVE_WARN_TRIANGLES
}

/// Stripifies every mesh of `input` on the current rayon pool.
///
/// Fails on the first mesh whose index list is malformed.
pub fn process_batch(input: BatchInput, config: &StripifyConfig) -> Result<BatchOutput> {
    let start = Instant::now();
    let stripifier = Stripifier::new(config.clone()).context("Invalid stripification settings")?;
    let capacity = config.cache_capacity;

    tracing::info!(
        meshes = input.meshes.len(),
        search = %config.search,
        cache_simulation = config.cache_simulation,
        "Starting batch"
    );

    let meshes = input
        .meshes
        .into_par_iter()
        .map(|mesh| {
            let triangles = mesh.indices.len() / 3;
            if is_slow_search(config, triangles) {
                tracing::warn!(
                    mesh = %mesh.name,
                    triangles,
                    "Exhaustive search is quadratic in the triangle count, consider --search loneliest"
                );
            }
            let result = stripifier
                .stripify(&mesh.indices)
                .with_context(|| format!("Mesh '{}' could not be stripified", mesh.name))?;
            let output = MeshOutput::new(mesh.name, result, capacity);
            tracing::info!(
                mesh = %output.name,
                triangles,
                strips = output.stats.strips,
                standalone = output.stats.standalone_triangles,
                cache_hits = output.cache_hits,
                "Mesh stripified"
            );
            Ok(output)
        })
        .collect::<Result<Vec<_>>>()?;

    let input_indices: usize = meshes
        .iter()
        .map(|m| m.stats.graph.triangles * 3)
        .sum();
    let output_indices: usize = meshes.iter().map(MeshOutput::index_count).sum();
    tracing::info!(
        meshes = meshes.len(),
        input_indices,
        output_indices,
        elapsed_ms = start.elapsed().as_millis(),
        "Batch complete"
    );

    Ok(BatchOutput { meshes })
}
