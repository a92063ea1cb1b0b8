// Copyright 2025 the Spheroid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types: regions, octant codes and the octant presence mask.

use glam::Vec3;

/// Axis-aligned cuboid described by its center and half-size.
///
/// A region whose extents are zero on every axis is *unset*: the tree sizes it
/// automatically (see [`Region::enclosing_cube`]) before subdividing it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    /// Center of the cuboid.
    pub center: Vec3,
    /// Half-size along each axis. Never negative.
    pub extents: Vec3,
}

impl Default for Region {
    fn default() -> Self {
        Self::UNSET
    }
}

impl Region {
    /// The unset region: zero extents at the origin.
    pub const UNSET: Self = Self {
        center: Vec3::ZERO,
        extents: Vec3::ZERO,
    };

    /// Create a region from center and half-size. Negative extents are clamped to zero.
    pub fn new(center: Vec3, extents: Vec3) -> Self {
        Self {
            center,
            extents: extents.max(Vec3::ZERO),
        }
    }

    /// Create a region from its minimum and maximum corners.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self::new((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Whether the region still needs auto-sizing.
    pub fn is_unset(&self) -> bool {
        self.extents == Vec3::ZERO
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        self.center - self.extents
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        self.center + self.extents
    }

    /// Full size along each axis (twice the extents).
    pub fn size(&self) -> Vec3 {
        self.extents * 2.0
    }

    /// True when the region is no larger than `min_size` on every axis.
    pub fn is_at_most(&self, min_size: f32) -> bool {
        self.size().cmple(Vec3::splat(min_size)).all()
    }

    /// Whether the point lies inside the region (faces inclusive).
    pub fn contains_point(&self, point: Vec3) -> bool {
        (point - self.center).abs().cmple(self.extents).all()
    }

    /// Whether the whole sphere lies inside the region.
    ///
    /// The center must be inside and its distance to the nearest face must be at
    /// least `radius`. Spheres touching a face from the inside still count.
    pub fn encloses_sphere(&self, center: Vec3, radius: f32) -> bool {
        if !self.contains_point(center) {
            return false;
        }
        let to_face = (self.extents - (center - self.center).abs()).min_element();
        to_face * to_face >= radius * radius
    }

    /// The child region for `octant`: half the extents, centered halfway toward that corner.
    pub fn octant(&self, octant: Octant) -> Self {
        let half = self.extents * 0.5;
        Self {
            center: self.center + octant.signs() * half,
            extents: half,
        }
    }

    /// All eight child regions, indexed by octant code.
    pub fn octants(&self) -> [Self; 8] {
        Octant::ALL.map(|o| self.octant(o))
    }

    /// Smallest power-of-two cube enclosing every sphere, grown from the minimum corner.
    ///
    /// The side is the largest axis span rounded up to a power of two; a span that is
    /// already a power of two is kept. Returns `None` when there are no spheres, or when
    /// the cube would not fit in `f32`.
    pub fn enclosing_cube(spheres: impl IntoIterator<Item = (Vec3, f32)>) -> Option<Self> {
        let mut spheres = spheres.into_iter();
        let (center, radius) = spheres.next()?;
        let mut min = center - Vec3::splat(radius);
        let mut max = center + Vec3::splat(radius);
        for (center, radius) in spheres {
            min = min.min(center - Vec3::splat(radius));
            max = max.max(center + Vec3::splat(radius));
        }
        let side = next_power_of_two((max - min).max_element())?;
        let cube = Self::from_min_max(min, min + Vec3::splat(side));
        (cube.center.is_finite() && cube.extents.is_finite()).then_some(cube)
    }
}

/// Smallest power of two that is `>= span`. Non-positive spans map to `1.0`.
///
/// `None` for a non-finite span or one above the largest `f32` power of two.
pub(crate) fn next_power_of_two(span: f32) -> Option<f32> {
    if !span.is_finite() {
        return None;
    }
    if span <= 0.0 {
        return Some(1.0);
    }
    let mut side = span.log2().ceil().exp2();
    // log2/exp2 may be off by one ulp around exact powers.
    while side < span {
        side *= 2.0;
    }
    while side.is_finite() && side * 0.5 >= span {
        side *= 0.5;
    }
    side.is_finite().then_some(side)
}

/// One of the eight sub-cuboids of a region, encoded in three bits.
///
/// Bit 0 selects +x, bit 1 selects +y, bit 2 selects +z.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Octant(u8);

impl Octant {
    /// Every octant, in code order.
    pub const ALL: [Self; 8] = [
        Self(0),
        Self(1),
        Self(2),
        Self(3),
        Self(4),
        Self(5),
        Self(6),
        Self(7),
    ];

    /// Octant from a three-bit code.
    pub const fn new(code: u8) -> Option<Self> {
        if code < 8 { Some(Self(code)) } else { None }
    }

    /// The three-bit code, usable as an array index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Per-axis direction of this octant from the parent center (`±1`).
    pub fn signs(self) -> Vec3 {
        let sign = |bit: u8| if self.0 & bit != 0 { 1.0 } else { -1.0 };
        Vec3::new(sign(0b001), sign(0b010), sign(0b100))
    }

    /// The single-bit mask for this octant.
    pub const fn mask(self) -> OctantMask {
        OctantMask::from_bits_retain(1 << self.0)
    }
}

bitflags::bitflags! {
    /// Presence set of a node's children: bit `i` is set iff child `i` exists.
    ///
    /// Flag names spell the sign of x, y, z in that order (`N` negative, `P` positive).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct OctantMask: u8 {
        /// Octant 0: −x −y −z.
        const NNN = 1 << 0;
        /// Octant 1: +x −y −z.
        const PNN = 1 << 1;
        /// Octant 2: −x +y −z.
        const NPN = 1 << 2;
        /// Octant 3: +x +y −z.
        const PPN = 1 << 3;
        /// Octant 4: −x −y +z.
        const NNP = 1 << 4;
        /// Octant 5: +x −y +z.
        const PNP = 1 << 5;
        /// Octant 6: −x +y +z.
        const NPP = 1 << 6;
        /// Octant 7: +x +y +z.
        const PPP = 1 << 7;
    }
}

impl OctantMask {
    /// Octants present in the mask, in code order.
    pub fn octants(self) -> impl Iterator<Item = Octant> {
        Octant::ALL
            .into_iter()
            .filter(move |o| self.contains(o.mask()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octant_children_tile_the_parent() {
        let r = Region::new(Vec3::ZERO, Vec3::splat(4.0));
        let kids = r.octants();
        assert_eq!(kids[0].center, Vec3::splat(-2.0));
        assert_eq!(kids[7].center, Vec3::splat(2.0));
        assert_eq!(kids[1].center, Vec3::new(2.0, -2.0, -2.0));
        assert_eq!(kids[6].center, Vec3::new(-2.0, 2.0, 2.0));
        for k in kids {
            assert_eq!(k.extents, Vec3::splat(2.0));
        }
    }

    #[test]
    fn straddling_sphere_is_not_enclosed() {
        let r = Region::new(Vec3::ZERO, Vec3::splat(4.0));
        let child = r.octant(Octant::ALL[7]);
        assert!(child.encloses_sphere(Vec3::splat(2.0), 1.0));
        assert!(child.encloses_sphere(Vec3::splat(2.0), 2.0));
        assert!(!child.encloses_sphere(Vec3::new(0.5, 2.0, 2.0), 1.0));
        assert!(child.contains_point(Vec3::new(0.5, 2.0, 2.0)));
        assert!(!child.encloses_sphere(Vec3::splat(-2.0), 0.0));
    }

    #[test]
    fn enclosing_cube_rounds_up_to_power_of_two() {
        let r = Region::enclosing_cube([(Vec3::ZERO, 1.0), (Vec3::new(4.0, 1.0, 0.0), 1.0)])
            .unwrap();
        // Span on x is 6 → side 8, grown from the minimum corner (-1, -1, -1).
        assert_eq!(r.min(), Vec3::splat(-1.0));
        assert_eq!(r.size(), Vec3::splat(8.0));
    }

    #[test]
    fn enclosing_cube_keeps_exact_powers() {
        let r = Region::enclosing_cube([(Vec3::splat(1.0), 1.0), (Vec3::splat(3.0), 1.0)])
            .unwrap();
        assert_eq!(r.min(), Vec3::ZERO);
        assert_eq!(r.size(), Vec3::splat(4.0));
        assert_eq!(next_power_of_two(0.75), Some(1.0));
        assert_eq!(next_power_of_two(0.5), Some(0.5));
        assert_eq!(next_power_of_two(0.0), Some(1.0));
    }

    #[test]
    fn enclosing_cube_rejects_spans_beyond_f32() {
        assert_eq!(next_power_of_two(f32::MAX), None);
        assert_eq!(next_power_of_two(f32::INFINITY), None);
        assert_eq!(next_power_of_two(f32::NAN), None);
        assert_eq!(next_power_of_two(1.5e38), Some(2.0_f32.powi(127)));

        // Finite centers, span above the largest power of two.
        let far = [(Vec3::splat(-1e38), 1.0), (Vec3::splat(1e38), 1.0)];
        assert_eq!(Region::enclosing_cube(far), None);
        // The side fits, but the cube grown from the minimum corner does not.
        let wide = [(Vec3::splat(2e38), 1.0), (Vec3::splat(3.3e38), 1.0)];
        assert_eq!(Region::enclosing_cube(wide), None);
    }

    #[test]
    fn mask_iterates_in_code_order() {
        let m = OctantMask::PPP | OctantMask::NNN | Octant::ALL[3].mask();
        let got: Vec<usize> = m.octants().map(Octant::index).collect();
        assert_eq!(got, vec![0, 3, 7]);
        assert_eq!(Octant::new(8), None);
    }
}
