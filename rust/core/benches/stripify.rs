// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stripification benchmarks on generated grid meshes.
//!
//! Compares:
//! 1. Graph construction alone
//! 2. Exhaustive search (full rescan every round)
//! 3. Loneliest-first search (heap keyed by degree)
//!
//! Run with: cargo bench -p tristrip-core --bench stripify

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tristrip_core::{SeedSearch, Stripifier, StripifyConfig, TriangleGraph};

/// Generate an `n` x `n` quad grid, two triangles per quad.
fn generate_grid(n: u32) -> Vec<u32> {
    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;
            indices.extend_from_slice(&[v00, v10, v11, v00, v11, v01]);
        }
    }
    indices
}

fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");
    for n in [16u32, 64, 128] {
        let indices = generate_grid(n);
        group.throughput(Throughput::Elements((indices.len() / 3) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &indices, |b, indices| {
            b.iter(|| TriangleGraph::build(black_box(indices)).unwrap())
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("stripify");
    group.sample_size(10);

    // Exhaustive search is quadratic, keep it to small grids
    let cases = [
        (SeedSearch::Exhaustive, 8u32),
        (SeedSearch::Exhaustive, 16),
        (SeedSearch::Loneliest, 16),
        (SeedSearch::Loneliest, 64),
        (SeedSearch::Loneliest, 128),
    ];

    for (search, n) in cases {
        let indices = generate_grid(n);
        let stripifier = Stripifier::new(StripifyConfig::default().with_search(search)).unwrap();
        group.throughput(Throughput::Elements((indices.len() / 3) as u64));
        group.bench_with_input(BenchmarkId::new(search.as_str(), n), &indices, |b, indices| {
            b.iter(|| stripifier.stripify(black_box(indices)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_graph, bench_search);
criterion_main!(benches);
