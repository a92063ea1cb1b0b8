// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tuning knobs for subdivision and branch pruning.

use crate::error::{OctreeError, Result};

/// Octree configuration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct OctreeConfig {
    /// Nodes no larger than this on every axis are never subdivided (world units).
    pub min_node_size: f32,

    /// Soft population threshold.
    ///
    /// Subdivision is not capped by it; a node at minimum size holding more bodies
    /// than this is reported through `log::debug!`.
    pub max_contained: usize,

    /// Ticks an empty leaf survives before it is pruned.
    pub initial_lifespan: u32,

    /// Upper bound for the lifespan, which doubles every time a dying leaf is refilled.
    pub lifespan_cap: u32,

    /// Bodies with a radius at or below this are treated as points and never pushed into children.
    pub radius_epsilon: f32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            min_node_size: 1.0,
            max_contained: 5,
            initial_lifespan: 8,
            lifespan_cap: 64,
            radius_epsilon: 0.001,
        }
    }
}

impl OctreeConfig {
    /// Configuration for dense scenes: finer cells and longer-lived empty branches.
    pub fn dense() -> Self {
        Self {
            min_node_size: 0.25,
            initial_lifespan: 16,
            ..Self::default()
        }
    }

    /// Set the minimum node size.
    pub fn with_min_node_size(mut self, min_node_size: f32) -> Self {
        self.min_node_size = min_node_size;
        self
    }

    /// Set the initial lifespan of empty leaves.
    pub fn with_initial_lifespan(mut self, ticks: u32) -> Self {
        self.initial_lifespan = ticks;
        self
    }

    /// Set the lifespan cap.
    pub fn with_lifespan_cap(mut self, ticks: u32) -> Self {
        self.lifespan_cap = ticks;
        self
    }

    /// Set the point-body radius threshold.
    pub fn with_radius_epsilon(mut self, epsilon: f32) -> Self {
        self.radius_epsilon = epsilon;
        self
    }

    /// Check that the values describe a tree that terminates and prunes sensibly.
    pub fn validate(&self) -> Result<()> {
        if !(self.min_node_size.is_finite() && self.min_node_size > 0.0) {
            return Err(OctreeError::InvalidConfig(format!(
                "min_node_size must be positive and finite, got {}",
                self.min_node_size
            )));
        }
        if !(self.radius_epsilon.is_finite() && self.radius_epsilon >= 0.0) {
            return Err(OctreeError::InvalidConfig(format!(
                "radius_epsilon must be non-negative and finite, got {}",
                self.radius_epsilon
            )));
        }
        if self.initial_lifespan == 0 {
            return Err(OctreeError::InvalidConfig(
                "initial_lifespan must be at least one tick".into(),
            ));
        }
        if self.lifespan_cap < self.initial_lifespan {
            return Err(OctreeError::InvalidConfig(format!(
                "lifespan_cap ({}) is below initial_lifespan ({})",
                self.lifespan_cap, self.initial_lifespan
            )));
        }
        Ok(())
    }
}
