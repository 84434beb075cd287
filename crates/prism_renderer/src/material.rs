//! Material trait for surface scattering.

use std::sync::Arc;

use prism_math::{Color, Ray, Vec3};
use rand::RngCore;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use crate::texture::{SolidColor, Texture};

/// Result of a successful scatter.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color multiplier applied to light arriving along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray, or return `None` if it is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Light emitted at the hit. Black for everything but lights.
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Lambertian (diffuse) material.
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time),
        })
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// `fuzz` is clamped to [0, 1]; 0 is a perfect mirror.
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction.normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzzed below the surface
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Refractive index relative to the enclosing medium
    refraction_index: f32,
}

impl Dielectric {
    pub fn new(refraction_index: f32) -> Self {
        Self { refraction_index }
    }

    /// Schlick's approximation of Fresnel reflectance.
    pub fn reflectance(cosine: f32, refraction_index: f32) -> f32 {
        let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let ri = if rec.front_face {
            1.0 / self.refraction_index
        } else {
            self.refraction_index
        };

        let unit_direction = ray_in.direction.normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        let cannot_refract = ri * sin_theta > 1.0;
        let direction = if cannot_refract || Self::reflectance(cos_theta, ri) > gen_f32(rng) {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, ri)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time),
        })
    }
}

/// Emissive material. Never scatters.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }

    pub fn from_color(emit: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(emit)))
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.texture.value(u, v, p)
    }
}

/// Phase function of a participating medium: scatters uniformly in all
/// directions.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }

    pub fn from_color(albedo: Color) -> Self {
        Self::new(Arc::new(SolidColor::new(albedo)))
    }
}

impl Material for Isotropic {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, random_unit_vector(rng), ray_in.time),
        })
    }
}

#[inline]
fn near_zero(v: Vec3) -> bool {
    const S: f32 = 1e-8;
    v.x.abs() < S && v.y.abs() < S && v.z.abs() < S
}

/// Mirror `v` about the plane with normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract unit vector `uv` through a surface with unit normal `n`.
///
/// `etai_over_etat` is the ratio of refractive indices across the surface.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record(normal: Vec3, front_face: bool) -> HitRecord<'static> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            front_face,
            t: 1.0,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_reflect() {
        let v = Vec3::new(1.0, -1.0, 0.0);
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = reflect(v, n);
        assert!((r - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let r = refract(Vec3::NEG_Y, Vec3::Y, 1.0 / 1.5);
        assert!((r - Vec3::NEG_Y).length() < 1e-5);
    }

    #[test]
    fn test_lambertian_scatters_into_hemisphere() {
        let mut rng = StdRng::seed_from_u64(42);
        let mat = Lambertian::from_color(Color::new(0.8, 0.3, 0.3));
        let rec = record(Vec3::Y, true);
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 0.5);

        for _ in 0..200 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert!(result.scattered.direction.dot(Vec3::Y) >= -1e-5);
            assert_eq!(result.scattered.time, 0.5);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let mut rng = StdRng::seed_from_u64(0);
        let mat = Metal::new(Color::splat(0.9), 0.0);
        let rec = record(Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));

        let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((result.scattered.direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 7.0).fuzz, 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz, 0.0);
    }

    #[test]
    fn test_metal_grazing_fuzz_can_absorb() {
        // A grazing ray with full fuzz must sometimes end up below the surface.
        let mut rng = StdRng::seed_from_u64(9);
        let mat = Metal::new(Color::ONE, 1.0);
        let rec = record(Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(1.0, -0.01, 0.0));

        let absorbed = (0..500)
            .filter(|_| mat.scatter(&ray, &rec, &mut rng).is_none())
            .count();
        assert!(absorbed > 0);
    }

    #[test]
    fn test_dielectric_always_scatters_white() {
        let mut rng = StdRng::seed_from_u64(3);
        let mat = Dielectric::new(1.5);
        let ray = Ray::new_simple(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.0));

        for front_face in [true, false] {
            let rec = record(Vec3::Y, front_face);
            for _ in 0..50 {
                let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
                assert_eq!(result.attenuation, Color::ONE);
            }
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Leaving glass at a grazing angle cannot refract.
        let mut rng = StdRng::seed_from_u64(4);
        let mat = Dielectric::new(1.5);
        let rec = record(Vec3::Y, false);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(1.0, -0.2, 0.0));

        for _ in 0..50 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert!(result.scattered.direction.y > 0.0);
        }
    }

    #[test]
    fn test_dielectric_normal_incidence_mostly_refracts() {
        let mut rng = StdRng::seed_from_u64(15);
        let mat = Dielectric::new(1.5);
        let rec = record(Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::Y, Vec3::NEG_Y);

        let trials = 10_000;
        let refracted = (0..trials)
            .filter(|_| {
                let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
                result.scattered.direction.dot(Vec3::Y) < 0.0
            })
            .count();
        assert!(refracted * 10 > trials * 9, "refracted {}/{}", refracted, trials);
    }

    #[test]
    fn test_schlick_reflectance() {
        // Normal incidence on glass reflects about 4%.
        let r = Dielectric::reflectance(1.0, 1.5);
        assert!((r - 0.04).abs() < 1e-4);
        // Grazing incidence reflects everything.
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let mut rng = StdRng::seed_from_u64(0);
        let light = DiffuseLight::from_color(Color::splat(4.0));
        let rec = record(Vec3::Y, true);
        let ray = Ray::new_simple(Vec3::Y, Vec3::NEG_Y);

        assert!(light.scatter(&ray, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(0.2, 0.8, Vec3::ONE), Color::splat(4.0));
        assert_eq!(Lambertian::from_color(Color::ONE).emitted(0.0, 0.0, Vec3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_isotropic_scatters_unit_directions() {
        let mut rng = StdRng::seed_from_u64(6);
        let mat = Isotropic::from_color(Color::splat(0.5));
        let rec = record(Vec3::X, true);
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::X);

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            assert!((result.scattered.direction.length() - 1.0).abs() < 1e-4);
            assert_eq!(result.attenuation, Color::splat(0.5));
        }
    }
}
