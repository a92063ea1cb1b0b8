// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spheroid World: the per-tick driver for the spheroid collision pipeline.
//!
//! A [`World`] owns the body store, a [`spheroid_octree::Octree`] broad phase and a
//! [`spheroid_sweep::SweepResolver`] narrow phase. Each [`World::tick`]:
//!
//! 1. frees pending bodies removed before they were inserted,
//! 2. moves the pending queue into the tree (building it once two bodies are available),
//! 3. runs tree maintenance: evict inactive bodies, re-home movers, prune dead branches,
//! 4. resolves collisions among the broad-phase candidates, per [`Pairing`].
//!
//! All insertions for a tick happen before any maintenance or collision work for that tick.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use spheroid_octree::Body;
//! use spheroid_world::{World, WorldConfig};
//!
//! let mut world = World::new(WorldConfig::default()).unwrap();
//! world.spawn(Body::new(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0));
//! world.spawn(Body::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0), 1.0));
//!
//! let report = world.tick(1.0).unwrap();
//! assert_eq!(report.ingested, 2);
//! assert_eq!(report.contacts.len(), 1);
//!
//! // Both bodies now stop where they touch.
//! world.integrate(1.0);
//! let report = world.tick(1.0).unwrap();
//! assert_eq!(report.rehomed, 2);
//! ```

pub mod config;
pub mod error;
pub mod world;

pub use config::{Pairing, WorldConfig};
pub use error::{Result, WorldError};
pub use world::{TickReport, World};
