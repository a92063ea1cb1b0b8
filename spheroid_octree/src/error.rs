// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for tree construction and maintenance.

use thiserror::Error;

use crate::body::BodyKey;

/// Failures surfaced by the octree.
///
/// Containment violations during insertion are not errors; the tree rebuilds
/// instead. Only unusable input is reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OctreeError {
    /// A body without a usable bounding sphere was met while sizing a region.
    #[error("body {0:?} is missing bounding information (non-finite position or invalid radius)")]
    MissingBounds(BodyKey),

    /// Auto-sizing needs a cube larger than `f32` can represent.
    #[error("bodies span more than the largest representable region")]
    RegionOverflow,

    /// A handle that does not refer to a live body.
    #[error("unknown body: {0:?}")]
    UnknownBody(BodyKey),

    /// Configuration rejected by [`OctreeConfig::validate`](crate::OctreeConfig::validate).
    #[error("invalid octree configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for octree operations.
pub type Result<T> = core::result::Result<T, OctreeError>;
