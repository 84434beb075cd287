//! Homogeneous participating medium (smoke, fog) bounded by another hittable.

use std::sync::Arc;

use prism_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;

use crate::error::{BuildError, BuildResult};
use crate::hittable::{HitRecord, Hittable};
use crate::material::Isotropic;
use crate::sampling::gen_f32;
use crate::texture::{SolidColor, Texture};

/// Offset past the entry point when searching for the exit.
const EXIT_SEARCH_OFFSET: f32 = 0.0001;

/// Constant-density volume filling a closed boundary.
///
/// Rays travelling through the boundary scatter after an exponentially
/// distributed distance. The boundary must be convex for the entry/exit
/// search to be correct.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    /// Fails unless `density` is positive and finite.
    pub fn new(
        boundary: Arc<dyn Hittable>,
        density: f32,
        texture: Arc<dyn Texture>,
    ) -> BuildResult<Self> {
        if !(density.is_finite() && density > 0.0) {
            return Err(BuildError::InvalidDensity(density));
        }

        Ok(Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(texture),
        })
    }

    pub fn with_color(
        boundary: Arc<dyn Hittable>,
        density: f32,
        albedo: Color,
    ) -> BuildResult<Self> {
        Self::new(boundary, density, Arc::new(SolidColor::new(albedo)))
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut entry = HitRecord::default();
        let mut exit = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }

        let exit_t = Interval::new(entry.t + EXIT_SEARCH_OFFSET, f32::INFINITY);
        if !self.boundary.hit(ray, exit_t, &mut exit, rng) {
            return false;
        }

        let mut t_entry = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);

        if t_entry >= t_exit {
            return false;
        }

        // Origin inside the volume
        if t_entry < 0.0 {
            t_entry = 0.0;
        }

        let ray_length = ray.direction.length();
        let distance_inside_boundary = (t_exit - t_entry) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_entry + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Arbitrary: a volume has no surface
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = &self.phase_function;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
