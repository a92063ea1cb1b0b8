// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bouncing spheres.
//!
//! Spawn a cloud of spheres converging on the origin and run the full pipeline with an
//! elastic response, integrating positions between ticks.
//!
//! Run:
//! - `cargo run -p spheroid_demos --example bouncing_spheres`

use glam::Vec3;
use log::info;
use spheroid_octree::Body;
use spheroid_sweep::ElasticBounce;
use spheroid_world::{World, WorldConfig};

const DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut world = World::with_response(WorldConfig::default(), ElasticBounce::new(0.9))
        .expect("default configuration is valid");

    // A ring of spheres in each of three planes, all heading for the center.
    for ring in 0..3_u8 {
        for step in 0..12_u8 {
            let angle = f32::from(step) * core::f32::consts::TAU / 12.0;
            let (s, c) = angle.sin_cos();
            let position = match ring {
                0 => Vec3::new(c, s, 0.0),
                1 => Vec3::new(0.0, c, s),
                _ => Vec3::new(s, 0.0, c),
            } * (20.0 + f32::from(ring) * 3.0);
            let velocity = -position.normalize() * 12.0;
            world.spawn(Body::new(position, velocity, 0.8));
        }
    }

    let mut total = 0;
    for _ in 0..240 {
        let report = world.tick(DT).expect("tick");
        total += report.contacts.len();
        if !report.contacts.is_empty() {
            info!(
                "tick {}: {} contacts, {} re-homed, {} pruned, {} nodes",
                report.tick,
                report.contacts.len(),
                report.rehomed,
                report.pruned,
                world.tree().node_count()
            );
        }
        world.integrate(DT);
    }
    println!(
        "{total} contacts over {} ticks; {} bodies in {} nodes",
        world.ticks(),
        world.tree().body_count(),
        world.tree().node_count()
    );
}
