// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Octree basics.
//!
//! Build a tree from a pending queue, move a body, run maintenance, and watch an
//! empty branch age out.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p spheroid_demos --example octree_basics`

use std::collections::VecDeque;

use glam::Vec3;
use spheroid_octree::{Bodies, Body, NodeId, Octree, OctreeConfig, Region};

fn dump(tree: &Octree, id: NodeId) {
    let depth = tree.depth(id);
    let region = tree.region(id).unwrap_or_default();
    println!(
        "{:indent$}{id:?} center={} half={} bodies={:?} life={:?}",
        "",
        region.center,
        region.extents.x,
        tree.contained(id),
        tree.life(id),
        indent = depth * 2
    );
    for (_, child) in tree.children(id) {
        dump(tree, child);
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut bodies = Bodies::new();
    let mut pending: VecDeque<_> = [
        Body::at_rest(Vec3::splat(-4.0), 1.0),
        Body::at_rest(Vec3::splat(4.0), 1.0),
        Body::at_rest(Vec3::ZERO, 1.0),
        Body::at_rest(Vec3::new(-6.0, -6.0, -6.0), 0.5),
    ]
    .into_iter()
    .map(|b| bodies.insert(b))
    .collect();
    let wanderer = pending[1];

    let mut tree = Octree::with_region(
        Region::new(Vec3::ZERO, Vec3::splat(8.0)),
        OctreeConfig::default(),
    );
    let placed = tree.ingest(&mut bodies, &mut pending).unwrap();
    println!("placed {placed} bodies into {} nodes", tree.node_count());
    dump(&tree, tree.root());

    // Move one body across the root; the next pass re-homes it.
    if let Some(body) = bodies.get_mut(wanderer) {
        body.position = Vec3::new(4.0, -4.0, 4.0);
    }
    let report = tree.update(&mut bodies).unwrap();
    println!("\nafter move: {report:?}");
    dump(&tree, tree.root());

    // The branch it left stays empty and is pruned once its lifespan runs out.
    for tick in 1..=10 {
        let report = tree.update(&mut bodies).unwrap();
        if report.pruned > 0 {
            println!("\ntick {tick}: pruned {} branch(es)", report.pruned);
        }
    }
    dump(&tree, tree.root());

    println!("\ncandidate pairs: {:?}", tree.candidate_pairs());
}
