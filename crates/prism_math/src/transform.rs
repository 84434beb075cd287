// Bounding-box transforms for instanced/rotated geometry.
//
// glam already provides Mat3 * Vec3 and transpose(); this only adds the
// box-of-transformed-corners computation.

use crate::Aabb;
use glam::{Mat3, Vec3};

/// Transform an axis-aligned bounding box and re-fit an axis-aligned box
/// around the result.
pub trait TransformAabb {
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl TransformAabb for Mat3 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut result_min = Vec3::INFINITY;
        let mut result_max = Vec3::NEG_INFINITY;

        for corner in aabb.corners() {
            let moved = *self * corner;
            result_min = result_min.min(moved);
            result_max = result_max.max(moved);
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Mat3::IDENTITY.transform_aabb(&aabb);

        assert!((transformed.min() - aabb.min()).length() < 0.001);
        assert!((transformed.max() - aabb.max()).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_y_90() {
        use std::f32::consts::FRAC_PI_2;

        // Box spanning x in [0, 2], z in [0, 1]; rotating +90 about Y maps
        // (x, z) -> (z, -x), so the result spans x in [0, 1], z in [-2, 0].
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let transformed = Mat3::from_rotation_y(FRAC_PI_2).transform_aabb(&aabb);

        assert!((transformed.min() - Vec3::new(0.0, 0.0, -2.0)).length() < 0.001);
        assert!((transformed.max() - Vec3::new(1.0, 1.0, 0.0)).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_encloses_corners() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 0.0, -3.0), Vec3::new(2.0, 4.0, 1.0));
        let rot = Mat3::from_rotation_y(0.6);
        let transformed = rot.transform_aabb(&aabb);

        for corner in aabb.corners() {
            let p = rot * corner;
            assert!(transformed.x.contains(p.x));
            assert!(transformed.y.contains(p.y));
            assert!(transformed.z.contains(p.z));
        }
    }
}
