// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Moving spheres and the generational store that owns them.

use glam::Vec3;

/// A moving sphere.
///
/// The tree only reads `position`, `radius` and `active`, and the narrow phase
/// writes `velocity`. The radius is fixed at creation.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Body {
    /// World-space center.
    pub position: Vec3,
    /// Displacement per unit of elapsed time.
    pub velocity: Vec3,
    /// Inactive bodies are evicted from the tree on the next maintenance pass.
    pub active: bool,
    radius: f32,
    settled: Vec3,
}

impl Body {
    /// Create an active body.
    pub fn new(position: Vec3, velocity: Vec3, radius: f32) -> Self {
        Self {
            position,
            velocity,
            active: true,
            radius,
            settled: position,
        }
    }

    /// Create an active body with zero velocity.
    pub fn at_rest(position: Vec3, radius: f32) -> Self {
        Self::new(position, Vec3::ZERO, radius)
    }

    /// Radius of the bounding sphere.
    pub const fn radius(&self) -> f32 {
        self.radius
    }

    /// Position the tree last placed this body at.
    pub const fn settled_position(&self) -> Vec3 {
        self.settled
    }

    /// Whether the body moved since the tree last settled it.
    pub fn has_moved(&self) -> bool {
        self.position != self.settled
    }

    /// Record the current position as the one the tree knows about.
    pub fn settle(&mut self) {
        self.settled = self.position;
    }

    /// Finite center and a finite, non-negative radius.
    pub fn bounding_sphere_is_valid(&self) -> bool {
        self.position.is_finite() && self.radius.is_finite() && self.radius >= 0.0
    }
}

/// Generational handle for a [`Body`] in a [`Bodies`] store.
///
/// A removed body's handle never aliases a later body: the slot's generation
/// is bumped on reuse.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyKey(u32, u32);

impl BodyKey {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Body keys are 32-bit; stores never approach u32::MAX slots."
    )]
    pub(crate) const fn new(idx: usize, generation: u32) -> Self {
        Self(idx as u32, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Slot store of bodies addressed by [`BodyKey`].
#[derive(Clone, Default)]
pub struct Bodies {
    slots: Vec<Option<Body>>,
    generations: Vec<u32>,
    free_list: Vec<usize>,
    len: usize,
}

impl core::fmt::Debug for Bodies {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Bodies")
            .field("slots_total", &self.slots.len())
            .field("alive", &self.len)
            .field("free_list", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Bodies {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a body and return its handle.
    pub fn insert(&mut self, body: Body) -> BodyKey {
        self.len += 1;
        if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.slots[idx] = Some(body);
            BodyKey::new(idx, generation)
        } else {
            self.slots.push(Some(body));
            self.generations.push(1);
            BodyKey::new(self.slots.len() - 1, 1)
        }
    }

    /// Remove a body, returning it if the handle was live.
    pub fn remove(&mut self, key: BodyKey) -> Option<Body> {
        if !self.contains(key) {
            return None;
        }
        let body = self.slots[key.idx()].take();
        self.free_list.push(key.idx());
        self.len -= 1;
        body
    }

    /// Whether `key` refers to a live body.
    pub fn contains(&self, key: BodyKey) -> bool {
        self.generations.get(key.idx()) == Some(&key.1)
            && self.slots.get(key.idx()).is_some_and(Option::is_some)
    }

    /// Shared access to a live body.
    pub fn get(&self, key: BodyKey) -> Option<&Body> {
        if self.generations.get(key.idx()) != Some(&key.1) {
            return None;
        }
        self.slots.get(key.idx())?.as_ref()
    }

    /// Mutable access to a live body.
    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut Body> {
        if self.generations.get(key.idx()) != Some(&key.1) {
            return None;
        }
        self.slots.get_mut(key.idx())?.as_mut()
    }

    /// Mutable access to two distinct live bodies at once.
    pub fn pair_mut(&mut self, a: BodyKey, b: BodyKey) -> Option<(&mut Body, &mut Body)> {
        if a.idx() == b.idx() || !self.contains(a) || !self.contains(b) {
            return None;
        }
        let (lo, hi, swapped) = if a.idx() < b.idx() {
            (a.idx(), b.idx(), false)
        } else {
            (b.idx(), a.idx(), true)
        };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].as_mut()?;
        let second = tail[0].as_mut()?;
        Some(if swapped {
            (second, first)
        } else {
            (first, second)
        })
    }

    /// Number of live bodies.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no bodies are alive.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate live bodies with their handles, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &Body)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .map(|body| (BodyKey::new(i, self.generations[i]), body))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reused_slot_gets_new_generation() {
        let mut bodies = Bodies::new();
        let a = bodies.insert(Body::at_rest(Vec3::ZERO, 1.0));
        assert!(bodies.remove(a).is_some());
        let b = bodies.insert(Body::at_rest(Vec3::ONE, 1.0));
        assert_ne!(a, b);
        assert!(bodies.get(a).is_none());
        assert_eq!(bodies.get(b).unwrap().position, Vec3::ONE);
        assert_eq!(bodies.len(), 1);
        assert!(bodies.remove(a).is_none());
    }

    #[test]
    fn pair_mut_preserves_argument_order() {
        let mut bodies = Bodies::new();
        let a = bodies.insert(Body::at_rest(Vec3::X, 1.0));
        let b = bodies.insert(Body::at_rest(Vec3::Y, 2.0));
        let (first, second) = bodies.pair_mut(b, a).unwrap();
        assert_eq!(first.radius(), 2.0);
        assert_eq!(second.radius(), 1.0);
        assert!(bodies.pair_mut(a, a).is_none());
    }

    #[test]
    fn motion_is_measured_from_settled_position() {
        let mut body = Body::new(Vec3::ZERO, Vec3::X, 0.5);
        assert!(!body.has_moved());
        body.position += body.velocity;
        assert!(body.has_moved());
        body.settle();
        assert!(!body.has_moved());
        assert_eq!(body.settled_position(), Vec3::X);
    }

    #[test]
    fn invalid_spheres_are_detected() {
        assert!(Body::at_rest(Vec3::ZERO, 0.0).bounding_sphere_is_valid());
        assert!(!Body::at_rest(Vec3::ZERO, -1.0).bounding_sphere_is_valid());
        assert!(!Body::at_rest(Vec3::splat(f32::NAN), 1.0).bounding_sphere_is_valid());
        assert!(!Body::at_rest(Vec3::ZERO, f32::INFINITY).bounding_sphere_is_valid());
    }
}
