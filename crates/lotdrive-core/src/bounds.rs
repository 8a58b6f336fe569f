//! Axis-aligned bounding boxes.

use glam::Vec3;

/// An axis-aligned box given by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Build a box from two opposite corners in any order.
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Build a box from its center and half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether two boxes overlap. Touching faces count as overlapping.
    #[must_use]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    #[must_use]
    pub fn contains_point(&self, point: Vec3) -> bool {
        self.min.cmple(point).all() && point.cmple(self.max).all()
    }

    /// The eight corners, bottom face first.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }

    /// The twelve edges as line segments, for outline drawing.
    #[must_use]
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let c = self.corners();
        [
            (c[0], c[1]),
            (c[1], c[2]),
            (c[2], c[3]),
            (c[3], c[0]),
            (c[4], c[5]),
            (c[5], c[6]),
            (c[6], c[7]),
            (c[7], c[4]),
            (c[0], c[4]),
            (c[1], c[5]),
            (c[2], c[6]),
            (c[3], c[7]),
        ]
    }
}

/// World-space box around a vehicle.
///
/// `half_extents` are in the vehicle's local frame (x right, y up, z forward)
/// with `position` at the bottom center, where the wheels touch the ground.
/// The footprint is rotated by `yaw` and re-fitted to the world axes.
#[must_use]
pub fn vehicle_bounds(position: Vec3, yaw: f32, half_extents: Vec3) -> Aabb {
    let (sin, cos) = yaw.sin_cos();
    let (sin, cos) = (sin.abs(), cos.abs());
    let half = half_extents.abs();
    let world_half = Vec3::new(
        cos * half.x + sin * half.z,
        half.y,
        sin * half.x + cos * half.z,
    );
    let center = position + Vec3::Y * half.y;
    Aabb::from_center_half_extents(center, world_half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_intersects() {
        let a = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::from_corners(Vec3::splat(0.5), Vec3::splat(2.0));
        let c = Aabb::from_corners(Vec3::splat(1.5), Vec3::splat(2.0));
        let touching = Aabb::from_corners(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        assert!(a.intersects(&touching));
    }

    #[test]
    fn test_separated_on_one_axis_only() {
        let a = Aabb::from_corners(Vec3::ZERO, Vec3::ONE);
        let above = Aabb::from_corners(Vec3::new(0.0, 3.0, 0.0), Vec3::new(1.0, 4.0, 1.0));
        assert!(!a.intersects(&above));
    }

    #[test]
    fn test_from_corners_orders_components() {
        let aabb = Aabb::from_corners(Vec3::new(2.0, -1.0, 5.0), Vec3::new(-2.0, 1.0, 3.0));
        assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, 3.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 1.0, 5.0));
        assert_eq!(aabb.center(), Vec3::new(0.0, 0.0, 4.0));
        assert_eq!(aabb.max - aabb.min, Vec3::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_contains_point() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::ONE);
        assert!(aabb.contains_point(Vec3::new(0.5, -0.5, 1.0)));
        assert!(!aabb.contains_point(Vec3::new(1.5, 0.0, 0.0)));
    }

    #[test]
    fn test_edges_connect_corners() {
        let aabb = Aabb::from_corners(Vec3::ZERO, Vec3::new(1.0, 2.0, 3.0));
        let corners = aabb.corners();
        for (start, end) in aabb.edges() {
            assert!(corners.contains(&start));
            assert!(corners.contains(&end));
            // Every edge runs along exactly one axis.
            let delta = (end - start).abs();
            let axes = [delta.x, delta.y, delta.z]
                .iter()
                .filter(|d| **d > 0.0)
                .count();
            assert_eq!(axes, 1);
        }
    }

    #[test]
    fn test_vehicle_bounds_unrotated() {
        let bounds = vehicle_bounds(Vec3::new(10.0, 0.0, 0.0), 0.0, Vec3::new(1.0, 0.75, 2.0));
        assert!((bounds.min - Vec3::new(9.0, 0.0, -2.0)).length() < 1e-5);
        assert!((bounds.max - Vec3::new(11.0, 1.5, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_vehicle_bounds_quarter_turn_swaps_footprint() {
        let bounds = vehicle_bounds(Vec3::ZERO, FRAC_PI_2, Vec3::new(1.0, 0.75, 2.0));
        let size = bounds.max - bounds.min;
        assert!((size.x - 4.0).abs() < 1e-5);
        assert!((size.z - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_vehicle_bounds_diagonal_grows() {
        let straight = vehicle_bounds(Vec3::ZERO, 0.0, Vec3::new(1.0, 0.75, 2.0));
        let diagonal = vehicle_bounds(Vec3::ZERO, FRAC_PI_2 / 2.0, Vec3::new(1.0, 0.75, 2.0));
        // At 45 degrees both world extents are (hx + hz) / sqrt(2).
        let expected = 2.0 * 3.0 / 2.0_f32.sqrt();
        assert!((diagonal.max - diagonal.min).x > (straight.max - straight.min).x);
        assert!((diagonal.max - diagonal.min).z > (straight.max - straight.min).z);
        assert!(((diagonal.max - diagonal.min).x - expected).abs() < 1e-4);
        assert!(((diagonal.max - diagonal.min).z - expected).abs() < 1e-4);
    }
}
