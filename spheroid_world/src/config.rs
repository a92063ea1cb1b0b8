// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World configuration.

use spheroid_octree::{OctreeConfig, Region};

use crate::error::Result;

/// Which broad-phase output feeds the narrow phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pairing {
    /// Every pair drawn from the union of all nodes' bodies.
    #[default]
    AllCandidates,
    /// Only pairs sharing a node or an ancestor chain.
    ///
    /// Far fewer tests, but two bodies in sibling subtrees that close on each other
    /// within one tick are missed until one of them is re-homed higher up.
    AncestorChains,
}

/// World configuration.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WorldConfig {
    /// Broad-phase tuning.
    pub octree: OctreeConfig,
    /// Candidate selection for the narrow phase.
    pub pairing: Pairing,
    /// Fixed root region. `None` sizes the root from the first bodies.
    pub region: Option<Region>,
}

impl WorldConfig {
    /// Set the broad-phase configuration.
    pub fn with_octree(mut self, octree: OctreeConfig) -> Self {
        self.octree = octree;
        self
    }

    /// Set the pairing strategy.
    pub fn with_pairing(mut self, pairing: Pairing) -> Self {
        self.pairing = pairing;
        self
    }

    /// Fix the root region instead of sizing it automatically.
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.octree.validate()?;
        Ok(())
    }
}
