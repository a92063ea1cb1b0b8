// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced to whoever drives the simulation.

use spheroid_octree::OctreeError;
use thiserror::Error;

/// Failures of a [`World`](crate::World) operation.
///
/// A failed tick leaves the world usable; the caller decides whether to skip the
/// tick or stop the simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    /// The broad phase rejected its input.
    #[error(transparent)]
    Octree(#[from] OctreeError),

    /// `tick` was called with a negative or non-finite elapsed time.
    #[error("elapsed time must be finite and non-negative, got {0}")]
    InvalidElapsed(f32),
}

/// Result type for world operations.
pub type Result<T> = core::result::Result<T, WorldError>;
