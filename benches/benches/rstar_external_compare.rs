// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use std::collections::VecDeque;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use spheroid_benches::scatter;
use spheroid_octree::{Bodies, Octree, OctreeConfig};

use rstar::RTree;
use rstar::primitives::GeomWithData;

/// Largest radius `scatter` produces.
const MAX_RADIUS: f32 = 1.0;

fn bench_candidate_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_pairs_vs_rstar");
    for &n in &[512_usize, 2048] {
        let scene = scatter(n, 100.0, 0.0, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));

        group.bench_function(format!("octree_build_pairs_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut bodies = Bodies::new();
                    let pending: VecDeque<_> =
                        scene.iter().map(|body| bodies.insert(*body)).collect();
                    (bodies, pending)
                },
                |(mut bodies, mut pending)| {
                    let mut tree = Octree::new(OctreeConfig::default());
                    tree.ingest(&mut bodies, &mut pending).unwrap();
                    black_box(tree.candidate_pairs().len());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_bulk_within_distance_n{n}"), |b| {
            b.iter_batched(
                || {
                    scene
                        .iter()
                        .enumerate()
                        .map(|(i, body)| GeomWithData::new(body.position.to_array(), i))
                        .collect::<Vec<_>>()
                },
                |points| {
                    let tree = RTree::bulk_load(points);
                    let mut pairs = 0_usize;
                    for (i, body) in scene.iter().enumerate() {
                        let reach = body.radius() + MAX_RADIUS;
                        pairs += tree
                            .locate_within_distance(body.position.to_array(), reach * reach)
                            .filter(|p| p.data > i)
                            .count();
                    }
                    black_box(pairs);
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_candidate_pairs);
criterion_main!(benches);
