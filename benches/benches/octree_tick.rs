// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::collections::VecDeque;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use spheroid_benches::scatter;
use spheroid_octree::{Bodies, Octree, OctreeConfig};
use spheroid_sweep::ReportOnly;
use spheroid_world::{Pairing, World, WorldConfig};

fn bench_octree_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("octree_build");
    for &n in &[256_usize, 1024, 4096] {
        let scene = scatter(n, 100.0, 1.0, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("ingest_n{n}"), |b| {
            b.iter_batched(
                || {
                    let mut bodies = Bodies::new();
                    let pending: VecDeque<_> =
                        scene.iter().map(|body| bodies.insert(*body)).collect();
                    (bodies, pending)
                },
                |(mut bodies, mut pending)| {
                    let mut tree = Octree::new(OctreeConfig::default());
                    let placed = tree.ingest(&mut bodies, &mut pending).unwrap();
                    black_box((placed, tree.node_count()));
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_world_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_tick");
    for &n in &[256_usize, 1024] {
        let scene = scatter(n, 100.0, 2.0, 0x0BAD_5EED);
        group.throughput(Throughput::Elements(n as u64));
        for (label, pairing) in [
            ("all_candidates", Pairing::AllCandidates),
            ("ancestor_chains", Pairing::AncestorChains),
        ] {
            group.bench_function(format!("{label}_n{n}"), |b| {
                b.iter_batched(
                    || {
                        let config = WorldConfig::default().with_pairing(pairing);
                        let mut world = World::with_response(config, ReportOnly).unwrap();
                        for body in &scene {
                            world.spawn(*body);
                        }
                        world.tick(0.016).unwrap();
                        world
                    },
                    |mut world| {
                        for _ in 0..8 {
                            world.integrate(0.016);
                            let report = world.tick(0.016).unwrap();
                            black_box(report.contacts.len());
                        }
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_octree_build, bench_world_tick);
criterion_main!(benches);
