// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared scene generators for the spheroid benchmarks.

use glam::Vec3;
use spheroid_octree::Body;

/// Xorshift generator; deterministic across runs.
#[derive(Clone, Debug)]
pub struct Rng(u64);

impl Rng {
    /// Seeded generator. A zero seed is replaced, since xorshift would stay at zero.
    pub fn new(seed: u64) -> Self {
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> f32 {
        let v = self.next_u64() >> 40;
        (v as f32) / ((1_u64 << 24) as f32)
    }

    /// Uniform in `[-1, 1)` on every axis.
    pub fn next_vec3(&mut self) -> Vec3 {
        Vec3::new(self.next_f32(), self.next_f32(), self.next_f32()) * 2.0 - 1.0
    }
}

/// `count` bodies scattered in a cube of half-size `half`, with speeds up to `max_speed`.
pub fn scatter(count: usize, half: f32, max_speed: f32, seed: u64) -> Vec<Body> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let radius = 0.2 + rng.next_f32() * 0.8;
            Body::new(rng.next_vec3() * half, rng.next_vec3() * max_speed, radius)
        })
        .collect()
}
