// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-tick driver.

use std::collections::VecDeque;

use log::{debug, trace};
use spheroid_octree::{Bodies, Body, BodyKey, Maintenance, Octree};
use spheroid_sweep::{CollisionResponse, Contact, StopAtContact, SweepResolver};

use crate::config::{Pairing, WorldConfig};
use crate::error::{Result, WorldError};

/// What one [`World::tick`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Pending bodies placed into the tree.
    pub ingested: usize,
    /// Bodies removed from the tree and freed from the store.
    pub evicted: Vec<BodyKey>,
    /// Bodies that moved and were re-homed.
    pub rehomed: usize,
    /// Empty branches pruned.
    pub pruned: usize,
    /// Size of the candidate set (bodies or pairs, per [`Pairing`]).
    pub candidates: usize,
    /// Confirmed collisions, in the order they were resolved.
    pub contacts: Vec<Contact>,
}

/// Owns the bodies, the broad phase and the narrow phase.
///
/// Bodies are spawned into a pending queue and enter the tree at the start of the next
/// tick. A tick only adjusts velocities; positions move between ticks, either through
/// [`World::integrate`] or by the caller writing them directly.
pub struct World<R = StopAtContact> {
    bodies: Bodies,
    tree: Octree,
    pending: VecDeque<BodyKey>,
    resolver: SweepResolver<R>,
    pairing: Pairing,
    ticks: u64,
}

impl<R> core::fmt::Debug for World<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("World")
            .field("bodies", &self.bodies)
            .field("tree", &self.tree)
            .field("pending", &self.pending.len())
            .field("pairing", &self.pairing)
            .field("ticks", &self.ticks)
            .finish_non_exhaustive()
    }
}

impl World {
    /// Create a world that stops colliding bodies at their contact point.
    pub fn new(config: WorldConfig) -> Result<Self> {
        Self::with_response(config, StopAtContact)
    }
}

impl<R: CollisionResponse> World<R> {
    /// Create a world with a custom collision response.
    pub fn with_response(config: WorldConfig, response: R) -> Result<Self> {
        config.validate()?;
        let tree = match config.region {
            Some(region) => Octree::with_region(region, config.octree),
            None => Octree::new(config.octree),
        };
        Ok(Self {
            bodies: Bodies::new(),
            tree,
            pending: VecDeque::new(),
            resolver: SweepResolver::new(response),
            pairing: config.pairing,
            ticks: 0,
        })
    }

    /// Add a body. It joins the tree on the next tick.
    pub fn spawn(&mut self, body: Body) -> BodyKey {
        let key = self.bodies.insert(body);
        self.pending.push_back(key);
        key
    }

    /// Mark a body inactive. It is evicted and freed on the next tick.
    ///
    /// Returns `false` if the handle was stale.
    pub fn remove(&mut self, key: BodyKey) -> bool {
        match self.bodies.get_mut(key) {
            Some(body) => {
                body.active = false;
                true
            }
            None => false,
        }
    }

    /// Insert every pending body now, even if the tree has not been built yet.
    pub fn flush_pending(&mut self) -> Result<usize> {
        self.discard_removed_pending();
        let mut count = 0;
        while let Some(key) = self.pending.pop_front() {
            self.tree.insert(&mut self.bodies, key)?;
            count += 1;
        }
        Ok(count)
    }

    /// Advance one simulation step.
    ///
    /// Drains the pending queue, runs broad-phase maintenance, then resolves collisions
    /// among the candidates with velocities scaled by `elapsed`.
    pub fn tick(&mut self, elapsed: f32) -> Result<TickReport> {
        if !(elapsed.is_finite() && elapsed >= 0.0) {
            return Err(WorldError::InvalidElapsed(elapsed));
        }
        self.ticks += 1;

        let mut evicted = self.discard_removed_pending();
        let ingested = self.tree.ingest(&mut self.bodies, &mut self.pending)?;
        let mut maintenance = Maintenance::default();
        let maintained = self.tree.maintain(&mut self.bodies, &mut maintenance);
        // Evicted bodies are out of the tree whether or not the pass succeeded.
        for &key in &maintenance.evicted {
            self.bodies.remove(key);
        }
        maintained?;
        evicted.extend(maintenance.evicted);

        let (candidates, contacts) = match self.pairing {
            Pairing::AllCandidates => {
                let candidates = self.tree.potential_collisions();
                let contacts =
                    self.resolver
                        .resolve_candidates(&mut self.bodies, &candidates, elapsed);
                (candidates.len(), contacts)
            }
            Pairing::AncestorChains => {
                let pairs = self.tree.candidate_pairs();
                let contacts = self.resolver.resolve_pairs(&mut self.bodies, &pairs, elapsed);
                (pairs.len(), contacts)
            }
        };

        let report = TickReport {
            tick: self.ticks,
            ingested,
            evicted,
            rehomed: maintenance.moved,
            pruned: maintenance.pruned,
            candidates,
            contacts,
        };
        debug!(
            "tick {}: +{} -{} moved {} pruned {} candidates {} contacts {}",
            report.tick,
            report.ingested,
            report.evicted.len(),
            report.rehomed,
            report.pruned,
            report.candidates,
            report.contacts.len()
        );
        Ok(report)
    }

    /// Free pending bodies that were removed before they reached the tree.
    fn discard_removed_pending(&mut self) -> Vec<BodyKey> {
        let mut dropped = Vec::new();
        let bodies = &mut self.bodies;
        self.pending.retain(|&key| {
            if bodies.get(key).is_some_and(|b| b.active) {
                return true;
            }
            if bodies.remove(key).is_some() {
                trace!("dropping {key:?} before insertion");
                dropped.push(key);
            }
            false
        });
        dropped
    }

    // --- accessors ---

    /// The body store.
    pub fn bodies(&self) -> &Bodies {
        &self.bodies
    }

    /// Mutable access to the body store, for moving bodies between ticks.
    pub fn bodies_mut(&mut self) -> &mut Bodies {
        &mut self.bodies
    }

    /// A live body.
    pub fn body(&self, key: BodyKey) -> Option<&Body> {
        self.bodies.get(key)
    }

    /// Mutable access to a live body.
    pub fn body_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        self.bodies.get_mut(key)
    }

    /// The broad phase.
    pub fn tree(&self) -> &Octree {
        &self.tree
    }

    /// Bodies spawned but not yet in the tree.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Number of completed ticks.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The collision response in use.
    pub fn response(&self) -> &R {
        self.resolver.response()
    }

    /// Mutable access to the collision response.
    pub fn response_mut(&mut self) -> &mut R {
        self.resolver.response_mut()
    }

    /// Move every active body by its velocity over `elapsed`.
    pub fn integrate(&mut self, elapsed: f32) {
        let keys: Vec<BodyKey> = self.bodies.iter().map(|(k, _)| k).collect();
        for key in keys {
            if let Some(body) = self.bodies.get_mut(key)
                && body.active
            {
                body.position += body.velocity * elapsed;
            }
        }
    }
}
