// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! What happens to two bodies once their collision is confirmed.

use glam::Vec3;
use spheroid_octree::{Body, BodyKey};

/// A confirmed collision between two bodies during one tick.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Contact {
    /// First body of the pair, in candidate order.
    pub a: BodyKey,
    /// Second body of the pair.
    pub b: BodyKey,
    /// Fraction of the tick at which the surfaces first touch.
    pub time_of_impact: f32,
    /// Unit vector from `a` toward `b` at the moment of contact.
    pub normal: Vec3,
}

/// Applies a collision to the two bodies involved.
///
/// Implemented for any `FnMut(&mut Body, &mut Body, &Contact)`.
pub trait CollisionResponse {
    /// React to `contact`. `a` and `b` are the bodies named by `contact.a` and `contact.b`.
    fn respond(&mut self, a: &mut Body, b: &mut Body, contact: &Contact);
}

impl<F> CollisionResponse for F
where
    F: FnMut(&mut Body, &mut Body, &Contact),
{
    fn respond(&mut self, a: &mut Body, b: &mut Body, contact: &Contact) {
        self(a, b, contact);
    }
}

/// Leaves velocities untouched; contacts are only reported.
#[derive(Copy, Clone, Debug, Default)]
pub struct ReportOnly;

impl CollisionResponse for ReportOnly {
    fn respond(&mut self, _a: &mut Body, _b: &mut Body, _contact: &Contact) {}
}

/// Scales both velocities by the time of impact, so that integrating the full tick
/// brings the bodies to the contact point and no further.
#[derive(Copy, Clone, Debug, Default)]
pub struct StopAtContact;

impl CollisionResponse for StopAtContact {
    fn respond(&mut self, a: &mut Body, b: &mut Body, contact: &Contact) {
        a.velocity *= contact.time_of_impact;
        b.velocity *= contact.time_of_impact;
    }
}

/// Impulse exchange along the contact normal, with mass proportional to the radius cubed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ElasticBounce {
    /// Coefficient of restitution: `1.0` conserves kinetic energy, `0.0` is perfectly inelastic.
    pub restitution: f32,
}

impl Default for ElasticBounce {
    fn default() -> Self {
        Self { restitution: 1.0 }
    }
}

impl ElasticBounce {
    /// Create a response with the given restitution, clamped to `[0, 1]`.
    pub fn new(restitution: f32) -> Self {
        Self {
            restitution: restitution.clamp(0.0, 1.0),
        }
    }
}

impl CollisionResponse for ElasticBounce {
    fn respond(&mut self, a: &mut Body, b: &mut Body, contact: &Contact) {
        let closing = (a.velocity - b.velocity).dot(contact.normal);
        if closing <= 0.0 {
            return;
        }
        let inv_a = 1.0 / mass(a);
        let inv_b = 1.0 / mass(b);
        let impulse = (1.0 + self.restitution) * closing / (inv_a + inv_b);
        a.velocity -= contact.normal * (impulse * inv_a);
        b.velocity += contact.normal * (impulse * inv_b);
    }
}

fn mass(body: &Body) -> f32 {
    body.radius().powi(3).max(f32::MIN_POSITIVE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn contact(toi: f32) -> Contact {
        let mut bodies = spheroid_octree::Bodies::new();
        let a = bodies.insert(Body::at_rest(Vec3::ZERO, 1.0));
        let b = bodies.insert(Body::at_rest(Vec3::X, 1.0));
        Contact {
            a,
            b,
            time_of_impact: toi,
            normal: Vec3::X,
        }
    }

    #[test]
    fn stop_at_contact_scales_both() {
        let mut a = Body::new(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0);
        let mut b = Body::new(Vec3::splat(10.0), Vec3::new(-5.0, 0.0, 0.0), 1.0);
        StopAtContact.respond(&mut a, &mut b, &contact(0.8));
        assert_eq!(a.velocity, Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(b.velocity, Vec3::new(-4.0, 0.0, 0.0));
    }

    #[test]
    fn equal_masses_swap_velocities() {
        let mut a = Body::new(Vec3::ZERO, Vec3::new(5.0, 1.0, 0.0), 1.0);
        let mut b = Body::new(Vec3::X, Vec3::new(-3.0, 0.0, 0.0), 1.0);
        ElasticBounce::default().respond(&mut a, &mut b, &contact(0.5));
        assert_relative_eq!(a.velocity.x, -3.0);
        assert_relative_eq!(a.velocity.y, 1.0);
        assert_relative_eq!(b.velocity.x, 5.0);
    }

    #[test]
    fn momentum_is_conserved() {
        let mut a = Body::new(Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0), 2.0);
        let mut b = Body::new(Vec3::X, Vec3::new(-1.0, 0.0, 0.0), 1.0);
        let before = a.velocity * 8.0 + b.velocity;
        ElasticBounce::new(0.3).respond(&mut a, &mut b, &contact(0.1));
        let after = a.velocity * 8.0 + b.velocity;
        assert!(before.abs_diff_eq(after, 1e-4), "momentum changed");
        assert!(a.velocity.x < b.velocity.x, "bodies still closing");
    }

    #[test]
    fn separating_bodies_are_left_alone() {
        let mut a = Body::new(Vec3::ZERO, Vec3::new(-1.0, 0.0, 0.0), 1.0);
        let mut b = Body::new(Vec3::X, Vec3::new(1.0, 0.0, 0.0), 1.0);
        ElasticBounce::default().respond(&mut a, &mut b, &contact(0.0));
        assert_eq!(a.velocity, Vec3::new(-1.0, 0.0, 0.0));
        ReportOnly.respond(&mut a, &mut b, &contact(0.0));
        assert_eq!(b.velocity, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn closures_are_responses() {
        let mut hits = 0;
        let mut count = |_: &mut Body, _: &mut Body, _: &Contact| hits += 1;
        let mut a = Body::at_rest(Vec3::ZERO, 1.0);
        let mut b = Body::at_rest(Vec3::X, 1.0);
        count.respond(&mut a, &mut b, &contact(0.0));
        count.respond(&mut a, &mut b, &contact(0.0));
        assert_eq!(hits, 2);
    }
}
