//! Gradient (Perlin) noise with turbulence.
//!
//! Uses random unit gradient vectors at lattice points and three independent
//! permutation tables, with Hermite-smoothed trilinear blending.

use prism_math::Vec3;
use rand::Rng;

/// Lattice size; must be a power of two for the `& MASK` wrap.
const POINT_COUNT: usize = 256;
const MASK: i32 = POINT_COUNT as i32 - 1;

/// Perlin noise generator.
#[derive(Clone, Debug)]
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    /// Build the gradient and permutation tables from `rng`.
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                    rng.gen_range(-1.0..1.0),
                )
                .try_normalize()
                .unwrap_or(Vec3::X)
            })
            .collect();

        Self {
            gradients,
            perm_x: generate_permutation(rng),
            perm_y: generate_permutation(rng),
            perm_z: generate_permutation(rng),
        }
    }

    /// Noise value at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let floor = p.floor();
        let frac = p - floor;

        let i = floor.x as i32;
        let j = floor.y as i32;
        let k = floor.z as i32;

        let mut corners = [[[Vec3::ZERO; 2]; 2]; 2];
        for (di, plane) in corners.iter_mut().enumerate() {
            for (dj, row) in plane.iter_mut().enumerate() {
                for (dk, corner) in row.iter_mut().enumerate() {
                    let idx = self.perm_x[((i + di as i32) & MASK) as usize]
                        ^ self.perm_y[((j + dj as i32) & MASK) as usize]
                        ^ self.perm_z[((k + dk as i32) & MASK) as usize];
                    *corner = self.gradients[idx];
                }
            }
        }

        perlin_interpolation(&corners, frac)
    }

    /// Absolute sum of `depth` noise octaves, each at double the frequency
    /// and half the weight of the previous one.
    pub fn turbulence(&self, p: Vec3, depth: u32) -> f32 {
        let mut accum = 0.0;
        let mut temp = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp);
            weight *= 0.5;
            temp *= 2.0;
        }

        accum.abs()
    }
}

fn generate_permutation<R: Rng + ?Sized>(rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..POINT_COUNT).collect();

    // Fisher-Yates
    for i in (1..POINT_COUNT).rev() {
        let target = rng.gen_range(0..=i);
        perm.swap(i, target);
    }

    perm
}

fn perlin_interpolation(corners: &[[[Vec3; 2]; 2]; 2], frac: Vec3) -> f32 {
    // Hermite smoothing
    let smooth = frac * frac * (Vec3::splat(3.0) - 2.0 * frac);

    let mut accum = 0.0;
    for (i, plane) in corners.iter().enumerate() {
        for (j, row) in plane.iter().enumerate() {
            for (k, gradient) in row.iter().enumerate() {
                let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                let weight = frac - Vec3::new(fi, fj, fk);

                accum += (fi * smooth.x + (1.0 - fi) * (1.0 - smooth.x))
                    * (fj * smooth.y + (1.0 - fj) * (1.0 - smooth.y))
                    * (fk * smooth.z + (1.0 - fk) * (1.0 - smooth.z))
                    * gradient.dot(weight);
            }
        }
    }

    accum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_permutation_is_complete() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut perm = generate_permutation(&mut rng);
        perm.sort_unstable();
        assert_eq!(perm, (0..POINT_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_noise_is_zero_on_lattice() {
        // Gradient noise vanishes at integer lattice points.
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(1));
        for p in [Vec3::ZERO, Vec3::new(3.0, -2.0, 7.0), Vec3::new(-1.0, 0.0, 255.0)] {
            assert!(perlin.noise(p).abs() < 1e-5, "noise at {p:?}");
        }
    }

    #[test]
    fn test_noise_is_bounded_and_deterministic() {
        let a = Perlin::new(&mut StdRng::seed_from_u64(3));
        let b = Perlin::new(&mut StdRng::seed_from_u64(3));

        for n in 0..200 {
            let p = Vec3::new(n as f32 * 0.37, n as f32 * -0.11, n as f32 * 0.05);
            let value = a.noise(p);
            assert!(value.abs() <= 1.5);
            assert_eq!(value, b.noise(p));
        }
    }

    #[test]
    fn test_turbulence_is_non_negative() {
        let perlin = Perlin::new(&mut StdRng::seed_from_u64(11));
        for n in 0..100 {
            let p = Vec3::splat(n as f32 * 0.173);
            assert!(perlin.turbulence(p, 7) >= 0.0);
        }
        assert_eq!(perlin.turbulence(Vec3::new(0.3, 0.2, 0.1), 0), 0.0);
    }
}
