// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The swept-sphere test for one pair of bodies.

use glam::Vec3;
use spheroid_octree::Body;

/// First contact between two swept spheres.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Impact {
    /// Fraction of the tick, in `[0, 1]`, at which the surfaces first touch.
    pub time_of_impact: f32,
    /// Relative distance travelled before contact. Negative when already overlapping.
    pub distance: f32,
    /// Unit vector from the first body's center to the second's at the moment of contact.
    pub normal: Vec3,
}

/// Why a pair was ruled out, in the order the tests run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// The relative motion this tick is shorter than the gap between the surfaces.
    Unreachable,
    /// The bodies are not moving toward each other.
    Receding,
    /// The closest approach of the two paths is wider than the sum of the radii.
    PathsMiss,
    /// No real contact point exists along the approach direction.
    NoContactTriangle,
    /// The relative motion stops short of the contact point.
    TooShort,
}

/// Verdict of [`sweep`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Sweep {
    /// The spheres touch during the tick.
    Hit(Impact),
    /// The spheres stay apart during the tick.
    Rejected(Rejection),
}

impl Sweep {
    /// Whether the pair collides.
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// The impact, if the pair collides.
    pub fn impact(&self) -> Option<Impact> {
        match *self {
            Self::Hit(impact) => Some(impact),
            Self::Rejected(_) => None,
        }
    }
}

/// Test whether `a` and `b` touch while moving with their velocities for `elapsed` time.
///
/// Runs the cheap tests first: reachability, approach direction, closest approach of
/// the paths, then the contact point along the approach direction. The verdict does not
/// depend on argument order.
///
/// ```rust
/// use glam::Vec3;
/// use spheroid_octree::Body;
/// use spheroid_sweep::{Rejection, Sweep, sweep};
///
/// let a = Body::new(Vec3::ZERO, Vec3::new(5.0, 0.0, 0.0), 1.0);
/// let b = Body::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0), 1.0);
/// assert!(sweep(&a, &b, 1.0).is_hit());
///
/// let c = Body::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 1.0);
/// let d = Body::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 1.0);
/// assert_eq!(sweep(&d, &c, 1.0), Sweep::Rejected(Rejection::Unreachable));
/// ```
pub fn sweep(a: &Body, b: &Body, elapsed: f32) -> Sweep {
    let between = b.position - a.position;
    let reach = a.radius() + b.radius();
    let gap = between.length() - reach;
    let motion = (a.velocity - b.velocity) * elapsed;
    let speed = motion.length();

    if speed < gap {
        return Sweep::Rejected(Rejection::Unreachable);
    }

    let heading = motion.normalize_or_zero();
    let dot = heading.dot(between);
    if dot <= 0.0 {
        return Sweep::Rejected(Rejection::Receding);
    }

    let closest_sq = (between.length_squared() - dot * dot).max(0.0);
    let reach_sq = reach * reach;
    if closest_sq >= reach_sq {
        return Sweep::Rejected(Rejection::PathsMiss);
    }

    let side = reach_sq - closest_sq;
    if side < 0.0 {
        return Sweep::Rejected(Rejection::NoContactTriangle);
    }
    let distance = dot - side.sqrt();
    if speed < distance {
        return Sweep::Rejected(Rejection::TooShort);
    }

    let time_of_impact = (distance.max(0.0) / speed).min(1.0);
    let at_contact = between - motion * time_of_impact;
    Sweep::Hit(Impact {
        time_of_impact,
        distance,
        normal: at_contact.normalize_or(heading),
    })
}
