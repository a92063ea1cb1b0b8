// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spheroid Octree: a self-pruning octree broad phase for moving spheres.
//!
//! - Bodies live in a generational [`Bodies`] store and are addressed by [`BodyKey`].
//! - Each body is held by exactly one node, whose region fully encloses its bounding sphere
//!   (the root excepted). Bodies that straddle a child's split plane stay with the parent.
//! - The tree is built lazily from a pending queue, once at least two bodies are available.
//!   An unset root region is sized to the smallest power-of-two cube around the bodies.
//! - [`Octree::update`] runs once per tick: it evicts inactive bodies, re-homes bodies that
//!   moved by walking up only as far as needed, and prunes leaves that stayed empty for their
//!   lifespan. A leaf refilled while dying doubles its lifespan, up to a cap.
//! - [`Octree::potential_collisions`] and [`Octree::candidate_pairs`] hand candidates to a
//!   narrow phase.
//!
//! Children are addressed by a three-bit [`Octant`] code (bit 0 is +x, bit 1 is +y, bit 2 is +z)
//! and their presence is tracked in an [`OctantMask`].
//!
//! # Example
//!
//! ```rust
//! use std::collections::VecDeque;
//!
//! use glam::Vec3;
//! use spheroid_octree::{Bodies, Body, Octree, OctreeConfig, Region};
//!
//! let mut bodies = Bodies::new();
//! let mut pending: VecDeque<_> = [
//!     Body::at_rest(Vec3::splat(-4.0), 1.0),
//!     Body::at_rest(Vec3::splat(4.0), 1.0),
//!     Body::at_rest(Vec3::ZERO, 1.0),
//! ]
//! .into_iter()
//! .map(|b| bodies.insert(b))
//! .collect();
//!
//! let mut tree = Octree::with_region(
//!     Region::new(Vec3::ZERO, Vec3::splat(8.0)),
//!     OctreeConfig::default(),
//! );
//! assert_eq!(tree.ingest(&mut bodies, &mut pending).unwrap(), 3);
//!
//! // The body at the origin straddles every split plane and stays at the root.
//! assert_eq!(tree.contained(tree.root()).len(), 1);
//! assert_eq!(tree.potential_collisions().len(), 3);
//!
//! // Move a body; the next maintenance pass re-homes it.
//! let key = tree.contained(tree.root())[0];
//! bodies.get_mut(key).unwrap().position = Vec3::new(4.0, -4.0, 4.0);
//! let report = tree.update(&mut bodies).unwrap();
//! assert_eq!(report.moved, 1);
//! assert_ne!(tree.locate(key), Some(tree.root()));
//! ```
//!
//! ## Floating point
//!
//! Regions and bodies are `f32` ([`glam::Vec3`]). Auto-sizing rejects bodies whose center or
//! radius is not finite with [`OctreeError::MissingBounds`], and bodies spread too far apart
//! for a power-of-two cube to fit in `f32` with [`OctreeError::RegionOverflow`].

pub mod body;
pub mod config;
pub mod error;
pub mod tree;
pub mod types;

pub use body::{Bodies, Body, BodyKey};
pub use config::OctreeConfig;
pub use error::{OctreeError, Result};
pub use tree::{Maintenance, NOT_AGING, NodeId, Octree};
pub use types::{Octant, OctantMask, Region};
