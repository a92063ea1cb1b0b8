// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Custom collision response.
//!
//! Use a closure as the response to deactivate whichever body of a pair is smaller,
//! and let the next tick evict it from the tree.
//!
//! Run:
//! - `cargo run -p spheroid_demos --example custom_response`

use glam::Vec3;
use spheroid_octree::Body;
use spheroid_sweep::Contact;
use spheroid_world::{World, WorldConfig};

fn main() {
    env_logger::init();

    let absorb = |a: &mut Body, b: &mut Body, contact: &Contact| {
        let (big, small) = if a.radius() >= b.radius() { (a, b) } else { (b, a) };
        small.active = false;
        big.velocity *= contact.time_of_impact;
    };
    let mut world = World::with_response(WorldConfig::default(), absorb).expect("valid config");

    let big = world.spawn(Body::new(Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0), 2.0));
    for i in 1..=4_u8 {
        let x = 6.0 * f32::from(i);
        world.spawn(Body::at_rest(Vec3::new(x, 0.0, 0.0), 0.5));
    }

    for _ in 0..12 {
        let report = world.tick(1.0).expect("tick");
        println!(
            "tick {:>2}: {} contacts, evicted {:?}",
            report.tick,
            report.contacts.len(),
            report.evicted
        );
        if let Some(body) = world.body_mut(big) {
            body.velocity = Vec3::new(3.0, 0.0, 0.0);
        }
        world.integrate(1.0);
    }
    println!("{} bodies left", world.bodies().len());
}
