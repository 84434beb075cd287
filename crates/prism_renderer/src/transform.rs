//! Instance transforms that wrap another hittable.
//!
//! Rays are moved into object space, intersected, and the hit is moved back
//! into world space.

use std::sync::Arc;

use prism_math::{Aabb, Interval, Mat3, Ray, TransformAabb, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable};

/// Offsets an object by a fixed vector.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let offset_ray = Ray::new(ray.origin - self.offset, ray.direction, ray.time);

        if !self.object.hit(&offset_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Rotates an object about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    /// Object to world
    rotation: Mat3,
    /// World to object
    inverse: Mat3,
    bbox: Aabb,
}

impl RotateY {
    /// `angle` is in degrees.
    pub fn new(object: Arc<dyn Hittable>, angle: f32) -> Self {
        let rotation = Mat3::from_rotation_y(angle.to_radians());
        let bbox = rotation.transform_aabb(&object.bounding_box());

        Self {
            object,
            rotation,
            inverse: rotation.transpose(),
            bbox,
        }
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let object_ray = Ray::new(
            self.inverse * ray.origin,
            self.inverse * ray.direction,
            ray.time,
        );

        if !self.object.hit(&object_ray, ray_t, rec, rng) {
            return false;
        }

        // Rotation preserves the normal's orientation relative to the ray
        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::quad::make_box;
    use crate::Sphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sphere(center: Vec3) -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            center,
            1.0,
            Arc::new(Lambertian::from_color(Vec3::ONE)),
        ))
    }

    #[test]
    fn test_translate_moves_hit() {
        let mut rng = StdRng::seed_from_u64(0);
        let moved = Translate::new(sphere(Vec3::ZERO), Vec3::new(0.0, 0.0, -5.0));
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(moved.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);

        let bbox = moved.bounding_box();
        assert!((bbox.z.min + 6.0).abs() < 1e-4);
        assert!((bbox.z.max + 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_y_moves_hit() {
        let mut rng = StdRng::seed_from_u64(0);
        // +90 degrees carries +X onto -Z
        let rotated = RotateY::new(sphere(Vec3::new(5.0, 0.0, 0.0)), 90.0);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(rotated.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert!((rec.p - Vec3::new(0.0, 0.0, -4.0)).length() < 1e-4);
        assert!((rec.normal - Vec3::Z).length() < 1e-4);
        assert!(rec.front_face);
    }

    #[test]
    fn test_rotate_y_bbox_encloses_rotated_box() {
        let boxed: Arc<dyn Hittable> = Arc::new(make_box(
            Vec3::ZERO,
            Vec3::new(2.0, 1.0, 1.0),
            Arc::new(Lambertian::from_color(Vec3::ONE)),
        ));
        let rotated = RotateY::new(boxed, 45.0);
        let bbox = rotated.bounding_box();

        // Corner (2, 0, 1) reaches x = 3 / sqrt2, corner (2, 0, 0) reaches z = -sqrt2
        assert!(bbox.x.max >= 2.12);
        assert!(bbox.z.min <= -1.41);
        assert!((bbox.y.max - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_rotate_then_translate() {
        let mut rng = StdRng::seed_from_u64(0);
        let rotated: Arc<dyn Hittable> =
            Arc::new(RotateY::new(sphere(Vec3::new(3.0, 0.0, 0.0)), 180.0));
        let placed = Translate::new(rotated, Vec3::new(0.0, 0.0, -10.0));
        let ray = Ray::new_simple(Vec3::new(-3.0, 0.0, 0.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(placed.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 9.0).abs() < 1e-3);
    }
}
