// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use spheroid_benches::scatter;
use spheroid_sweep::sweep;

fn bench_sweep_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep_pairs");
    for &(label, half) in &[("sparse", 200.0_f32), ("dense", 10.0)] {
        let scene = scatter(256, half, 4.0, 0xDEAD_BEEF);
        let pairs = scene.len() * (scene.len() - 1) / 2;
        group.throughput(Throughput::Elements(pairs as u64));
        group.bench_function(format!("{label}_n256"), |b| {
            b.iter(|| {
                let mut hits = 0_usize;
                for (i, a) in scene.iter().enumerate() {
                    for other in &scene[i + 1..] {
                        hits += usize::from(sweep(a, other, 1.0).is_hit());
                    }
                }
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_sweep_pairs);
criterion_main!(benches);
