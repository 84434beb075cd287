//! Planar parallelogram primitive and the six-sided box built from it.

use std::sync::Arc;

use prism_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::Material;

/// Rays closer to parallel than this are treated as missing the plane.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Parallelogram with corner `q` spanned by edges `u` and `v`.
pub struct Quad {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    /// n / (n . n), used to recover planar coordinates
    w: Vec3,
    normal: Vec3,
    /// Plane offset: normal . x = d
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let n = u.cross(v);
        let normal = n.normalize();
        let d = normal.dot(q);
        let w = n / n.dot(n);

        let diagonal1 = Aabb::from_points(q, q + u + v);
        let diagonal2 = Aabb::from_points(q + u, q + v);

        Self {
            q,
            u,
            v,
            w,
            normal,
            d,
            material,
            bbox: Aabb::surrounding(&diagonal1, &diagonal2),
        }
    }

    /// Planar coordinates (alpha, beta) map onto UV when both lie in [0, 1].
    fn interior(alpha: f32, beta: f32) -> Option<(f32, f32)> {
        let unit = Interval::new(0.0, 1.0);
        if unit.contains(alpha) && unit.contains(beta) {
            Some((alpha, beta))
        } else {
            None
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < PARALLEL_EPSILON {
            return false;
        }

        let t = (self.d - self.normal.dot(ray.origin)) / denom;
        if !ray_t.contains(t) {
            return false;
        }

        let intersection = ray.at(t);
        let planar_hit = intersection - self.q;
        let alpha = self.w.dot(planar_hit.cross(self.v));
        let beta = self.w.dot(self.u.cross(planar_hit));

        let Some((u, v)) = Self::interior(alpha, beta) else {
            return false;
        };

        rec.t = t;
        rec.p = intersection;
        rec.u = u;
        rec.v = v;
        rec.material = self.material.as_ref();
        rec.set_face_normal(ray, self.normal);

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Closed box spanning opposite corners `a` and `b`, as six quads.
pub fn make_box(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> HittableList {
    let min = a.min(b);
    let max = a.max(b);

    let dx = Vec3::new(max.x - min.x, 0.0, 0.0);
    let dy = Vec3::new(0.0, max.y - min.y, 0.0);
    let dz = Vec3::new(0.0, 0.0, max.z - min.z);

    let faces = [
        (Vec3::new(min.x, min.y, max.z), dx, dy),  // front
        (Vec3::new(max.x, min.y, max.z), -dz, dy), // right
        (Vec3::new(max.x, min.y, min.z), -dx, dy), // back
        (Vec3::new(min.x, min.y, min.z), dz, dy),  // left
        (Vec3::new(min.x, max.y, max.z), dx, -dz), // top
        (Vec3::new(min.x, min.y, min.z), dx, dz),  // bottom
    ];

    let mut sides = HittableList::new();
    for (q, u, v) in faces {
        sides.add(Arc::new(Quad::new(q, u, v, material.clone())));
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
    }

    fn unit_quad() -> Quad {
        // Unit square in the z = 0 plane, facing +Z
        Quad::new(Vec3::ZERO, Vec3::X, Vec3::Y, grey())
    }

    #[test]
    fn test_quad_hit_center_uv() {
        let mut rng = StdRng::seed_from_u64(0);
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.5, 0.5, 2.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!((rec.u - 0.5).abs() < 1e-5);
        assert!((rec.v - 0.5).abs() < 1e-5);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_quad_back_face() {
        let mut rng = StdRng::seed_from_u64(0);
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.25, 0.75, -1.0), Vec3::Z);
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::NEG_Z);
        assert!((rec.u - 0.25).abs() < 1e-5);
        assert!((rec.v - 0.75).abs() < 1e-5);
    }

    #[test]
    fn test_quad_misses_outside_and_parallel() {
        let mut rng = StdRng::seed_from_u64(0);
        let quad = unit_quad();
        let mut rec = HitRecord::default();

        let outside = Ray::new_simple(Vec3::new(1.5, 0.5, 1.0), Vec3::NEG_Z);
        assert!(!quad.hit(&outside, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));

        let parallel = Ray::new_simple(Vec3::new(0.5, 0.5, 1.0), Vec3::X);
        assert!(!quad.hit(&parallel, Interval::UNIVERSE, &mut rec, &mut rng));

        let behind = Ray::new_simple(Vec3::new(0.5, 0.5, 1.0), Vec3::Z);
        assert!(!quad.hit(&behind, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
    }

    #[test]
    fn test_quad_edge_is_inclusive() {
        let mut rng = StdRng::seed_from_u64(0);
        let quad = unit_quad();
        let ray = Ray::new_simple(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let mut rec = HitRecord::default();

        assert!(quad.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert_eq!((rec.u, rec.v), (0.0, 0.0));
    }

    #[test]
    fn test_flat_quad_bbox_is_padded() {
        let bbox = unit_quad().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert!(bbox.x.contains(0.0) && bbox.x.contains(1.0));
    }

    #[test]
    fn test_make_box() {
        let mut rng = StdRng::seed_from_u64(0);
        let sides = make_box(Vec3::new(1.0, 2.0, 3.0), Vec3::new(-1.0, 0.0, 0.0), grey());
        assert_eq!(sides.len(), 6);

        let bbox = sides.bounding_box();
        assert!((bbox.min() - Vec3::new(-1.0, 0.0, 0.0)).abs().max_element() < 1e-3);
        assert!((bbox.max() - Vec3::new(1.0, 2.0, 3.0)).abs().max_element() < 1e-3);

        // Looking down onto the top face from above
        let ray = Ray::new_simple(Vec3::new(0.0, 10.0, 1.5), Vec3::NEG_Y);
        let mut rec = HitRecord::default();
        assert!(sides.hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 8.0).abs() < 1e-4);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Y).length() < 1e-5);
    }
}
