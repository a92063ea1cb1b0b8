// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runs [`sweep`] over broad-phase output and applies a [`CollisionResponse`].

use std::collections::HashSet;

use log::{debug, trace};
use spheroid_octree::{Bodies, BodyKey};

use crate::response::{CollisionResponse, Contact, StopAtContact};
use crate::sweep::{Sweep, sweep};

/// Swept-sphere narrow phase over a [`Bodies`] store.
///
/// Each unordered pair is tested at most once per call, in candidate order. Velocity
/// changes made by the response are visible to the pairs tested after it.
#[derive(Clone, Debug, Default)]
pub struct SweepResolver<R = StopAtContact> {
    response: R,
}

impl<R: CollisionResponse> SweepResolver<R> {
    /// Create a resolver that applies `response` to every confirmed collision.
    pub fn new(response: R) -> Self {
        Self { response }
    }

    /// The collision response in use.
    pub fn response(&self) -> &R {
        &self.response
    }

    /// Mutable access to the collision response.
    pub fn response_mut(&mut self) -> &mut R {
        &mut self.response
    }

    /// Test every pair drawn from `candidates`.
    ///
    /// Stale, inactive and repeated handles are skipped. An empty or single-body
    /// candidate list is a no-op.
    pub fn resolve_candidates(
        &mut self,
        bodies: &mut Bodies,
        candidates: &[BodyKey],
        elapsed: f32,
    ) -> Vec<Contact> {
        let mut seen = HashSet::with_capacity(candidates.len());
        let live: Vec<BodyKey> = candidates
            .iter()
            .copied()
            .filter(|k| bodies.get(*k).is_some_and(|b| b.active) && seen.insert(*k))
            .collect();

        let mut contacts = Vec::new();
        for (i, &a) in live.iter().enumerate() {
            for &b in &live[i + 1..] {
                contacts.extend(self.test_pair(bodies, a, b, elapsed));
            }
        }
        debug!(
            "narrow phase: {} candidates, {} contacts",
            live.len(),
            contacts.len()
        );
        contacts
    }

    /// Test explicit pairs, such as [`Octree::candidate_pairs`](spheroid_octree::Octree::candidate_pairs).
    ///
    /// Self pairs and repeats of an unordered pair are skipped.
    pub fn resolve_pairs(
        &mut self,
        bodies: &mut Bodies,
        pairs: &[(BodyKey, BodyKey)],
        elapsed: f32,
    ) -> Vec<Contact> {
        let mut seen = HashSet::with_capacity(pairs.len());
        let mut contacts = Vec::new();
        for &(a, b) in pairs {
            if a == b || !seen.insert((a.min(b), a.max(b))) {
                continue;
            }
            contacts.extend(self.test_pair(bodies, a, b, elapsed));
        }
        debug!(
            "narrow phase: {} pairs, {} contacts",
            seen.len(),
            contacts.len()
        );
        contacts
    }

    fn test_pair(
        &mut self,
        bodies: &mut Bodies,
        a: BodyKey,
        b: BodyKey,
        elapsed: f32,
    ) -> Option<Contact> {
        let (body_a, body_b) = bodies.pair_mut(a, b)?;
        if !body_a.active || !body_b.active {
            return None;
        }
        match sweep(body_a, body_b, elapsed) {
            Sweep::Hit(impact) => {
                let contact = Contact {
                    a,
                    b,
                    time_of_impact: impact.time_of_impact,
                    normal: impact.normal,
                };
                trace!("{a:?} hits {b:?} at t={}", impact.time_of_impact);
                self.response.respond(body_a, body_b, &contact);
                Some(contact)
            }
            Sweep::Rejected(why) => {
                trace!("{a:?} / {b:?} rejected: {why:?}");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ReportOnly;
    use approx::assert_relative_eq;
    use glam::Vec3;
    use spheroid_octree::Body;

    fn head_on(bodies: &mut Bodies) -> (BodyKey, BodyKey) {
        let a = bodies.insert(Body::new(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0));
        let b = bodies.insert(Body::new(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(-5.0, 0.0, 0.0),
            1.0,
        ));
        (a, b)
    }

    #[test]
    fn empty_candidates_are_a_no_op() {
        let mut bodies = Bodies::new();
        let mut resolver = SweepResolver::<StopAtContact>::default();
        assert!(resolver.resolve_candidates(&mut bodies, &[], 1.0).is_empty());
    }

    #[test]
    fn each_pair_is_tested_once() {
        let mut bodies = Bodies::new();
        let (a, b) = head_on(&mut bodies);
        let mut resolver = SweepResolver::new(StopAtContact);
        let contacts = resolver.resolve_candidates(&mut bodies, &[a, b, a, b], 1.0);
        assert_eq!(contacts.len(), 1);
        assert_eq!((contacts[0].a, contacts[0].b), (a, b));
        assert_relative_eq!(contacts[0].time_of_impact, 0.8);
        assert_eq!(bodies.get(a).unwrap().velocity, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(bodies.get(b).unwrap().velocity, Vec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn inactive_and_stale_candidates_are_skipped() {
        let mut bodies = Bodies::new();
        let (a, b) = head_on(&mut bodies);
        let gone = bodies.insert(Body::at_rest(Vec3::splat(5.0), 1.0));
        bodies.remove(gone);
        bodies.get_mut(b).unwrap().active = false;
        let mut resolver = SweepResolver::new(ReportOnly);
        assert!(resolver.resolve_candidates(&mut bodies, &[a, b, gone], 1.0).is_empty());
        assert!(resolver.resolve_pairs(&mut bodies, &[(a, b), (a, gone)], 1.0).is_empty());
    }

    #[test]
    fn pairs_are_deduplicated_regardless_of_order() {
        let mut bodies = Bodies::new();
        let (a, b) = head_on(&mut bodies);
        let mut resolver = SweepResolver::new(ReportOnly);
        let contacts = resolver.resolve_pairs(&mut bodies, &[(b, a), (a, b), (a, a)], 1.0);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].a, b);
        assert!(contacts[0].normal.abs_diff_eq(-Vec3::X, 1e-6), "normal points from a to b");
    }

    #[test]
    fn verdict_does_not_depend_on_candidate_order() {
        let mut forward = Bodies::new();
        let (a, b) = head_on(&mut forward);
        let mut backward = forward.clone();
        let mut resolver = SweepResolver::new(ReportOnly);
        let f = resolver.resolve_candidates(&mut forward, &[a, b], 1.0);
        let r = resolver.resolve_candidates(&mut backward, &[b, a], 1.0);
        assert_eq!(f.len(), r.len());
        assert_relative_eq!(f[0].time_of_impact, r[0].time_of_impact);
    }
}
