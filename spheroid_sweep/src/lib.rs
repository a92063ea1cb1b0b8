// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spheroid Sweep: a swept-sphere narrow phase.
//!
//! Given broad-phase candidates from [`spheroid_octree`], confirms which pairs of moving
//! spheres touch during a tick and hands each confirmed [`Contact`] to a
//! [`CollisionResponse`].
//!
//! [`sweep()`] rejects a pair through a chain of increasingly expensive tests:
//!
//! 1. [`Rejection::Unreachable`]: the relative motion is shorter than the gap between the surfaces.
//! 2. [`Rejection::Receding`]: the relative motion does not point from one body toward the other.
//! 3. [`Rejection::PathsMiss`]: the closest approach of the paths exceeds the sum of the radii.
//! 4. [`Rejection::NoContactTriangle`] and [`Rejection::TooShort`]: the contact point along the
//!    approach direction does not exist or lies beyond this tick's motion.
//!
//! Responses are pluggable. [`StopAtContact`] (the default) scales both velocities so the
//! bodies end the tick at the contact point, [`ElasticBounce`] exchanges an impulse along the
//! contact normal, [`ReportOnly`] leaves the bodies untouched. Closures work as responses too.
//!
//! # Example
//!
//! ```rust
//! use glam::Vec3;
//! use spheroid_octree::{Bodies, Body};
//! use spheroid_sweep::{ElasticBounce, SweepResolver};
//!
//! let mut bodies = Bodies::new();
//! let a = bodies.insert(Body::new(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0));
//! let b = bodies.insert(Body::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0), 1.0));
//!
//! let mut resolver = SweepResolver::new(ElasticBounce::default());
//! let contacts = resolver.resolve_candidates(&mut bodies, &[a, b], 1.0);
//! assert_eq!(contacts.len(), 1);
//!
//! // Equal radii, so an elastic bounce swaps the velocities.
//! assert_eq!(bodies.get(a).unwrap().velocity, Vec3::new(-5.0, 0.0, 0.0));
//! ```

pub mod resolver;
pub mod response;
pub mod sweep;

pub use resolver::SweepResolver;
pub use response::{CollisionResponse, Contact, ElasticBounce, ReportOnly, StopAtContact};
pub use sweep::{Impact, Rejection, Sweep, sweep};
