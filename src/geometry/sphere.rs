use glam::DVec3;
use rand::distributions::Distribution;
use rand::Rng;
use rand_distr::StandardNormal;

/// Draw a single unit vector uniformly distributed on the sphere.
///
/// Three independent standard normals form an isotropic Gaussian, so their
/// direction is uniform. The resampling branch only triggers for a
/// (practically impossible) all-zero draw.
pub fn sample_unit_vector<R: Rng + ?Sized>(rng: &mut R) -> DVec3 {
    loop {
        let x: f64 = StandardNormal.sample(rng);
        let y: f64 = StandardNormal.sample(rng);
        let z: f64 = StandardNormal.sample(rng);
        let v = DVec3::new(x, y, z);
        let len = v.length();
        if len > f64::MIN_POSITIVE {
            return v / len;
        }
    }
}

/// Generate `n` uniformly distributed unit vectors using a provided RNG.
pub fn sample_unit_vectors<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<DVec3> {
    (0..n).map(|_| sample_unit_vector(rng)).collect()
}

/// Draw a point uniformly from the axis-aligned cube of edge `size` centered
/// on `center`. Each coordinate lies in `[c - size/2, c + size/2)`.
pub fn sample_coord_from_cube<R: Rng + ?Sized>(rng: &mut R, center: DVec3, size: f64) -> DVec3 {
    DVec3::new(
        sample_half_open(rng, center.x, size),
        sample_half_open(rng, center.y, size),
        sample_half_open(rng, center.z, size),
    )
}

/// Uniform draw from `[center - size/2, center + size/2)`.
fn sample_half_open<R: Rng + ?Sized>(rng: &mut R, center: f64, size: f64) -> f64 {
    let lo = center - size / 2.0;
    let hi = center + size / 2.0;
    let x = lo + rng.gen::<f64>() * size;
    if x < hi {
        return x;
    }
    // Rounding can land exactly on the excluded upper end.
    let below = next_below(hi);
    if below >= lo {
        below
    } else {
        lo
    }
}

/// Largest `f64` strictly less than `x`.
fn next_below(x: f64) -> f64 {
    if x.is_nan() || x == f64::NEG_INFINITY {
        x
    } else if x == 0.0 {
        -f64::from_bits(1)
    } else if x > 0.0 {
        f64::from_bits(x.to_bits() - 1)
    } else {
        f64::from_bits(x.to_bits() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::ks_1samp;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    /// Always returns the largest possible value, so `gen::<f64>()` yields
    /// `1 - 2^-53`.
    struct MaxRng;

    impl RngCore for MaxRng {
        fn next_u32(&mut self) -> u32 {
            u32::MAX
        }

        fn next_u64(&mut self) -> u64 {
            u64::MAX
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0xff);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    #[test]
    fn test_points_on_unit_sphere() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let points = sample_unit_vectors(100, &mut rng);
        for p in &points {
            let len = p.length();
            assert!(
                (len - 1.0).abs() < 1e-12,
                "Point not on unit sphere: length = {}",
                len
            );
        }
    }

    #[test]
    fn test_unit_vector_distance_distribution() {
        // The distance between a uniform point on the unit sphere and any
        // fixed point on it has density d/2 on [0, 2], i.e. CDF d^2/4.
        // A correct sampler fails a 5% test for 1 seed in 20, so require a
        // majority of seeds to pass.
        let reference = DVec3::X;
        let passes = (0..5u64)
            .filter(|&seed| {
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let d: Vec<f64> = (0..1000)
                    .map(|_| (sample_unit_vector(&mut rng) - reference).length())
                    .collect();
                ks_1samp(&d, |d| (d * d / 4.0).clamp(0.0, 1.0)).pvalue > 0.05
            })
            .count();
        assert!(passes >= 3, "only {}/5 seeds passed the KS test", passes);
    }

    #[test]
    fn test_sample_coord_from_cube() {
        let center = DVec3::new(0.0, 2.0, 4.0);
        let size = 4.0;
        let uniform = |a: f64, b: f64| move |x: f64| ((x - a) / (b - a)).clamp(0.0, 1.0);

        let mut passes = [0usize; 3];
        for seed in 0..5u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let x: Vec<DVec3> = (0..1000)
                .map(|_| sample_coord_from_cube(&mut rng, center, size))
                .collect();

            for p in &x {
                assert!(p.x >= -2.0 && p.x < 2.0, "x out of bounds: {}", p.x);
                assert!(p.y >= 0.0 && p.y < 4.0, "y out of bounds: {}", p.y);
                assert!(p.z >= 2.0 && p.z < 6.0, "z out of bounds: {}", p.z);
            }

            let xs: Vec<f64> = x.iter().map(|p| p.x).collect();
            let ys: Vec<f64> = x.iter().map(|p| p.y).collect();
            let zs: Vec<f64> = x.iter().map(|p| p.z).collect();

            passes[0] += (ks_1samp(&xs, uniform(-2.0, 2.0)).pvalue > 0.05) as usize;
            passes[1] += (ks_1samp(&ys, uniform(0.0, 4.0)).pvalue > 0.05) as usize;
            passes[2] += (ks_1samp(&zs, uniform(2.0, 6.0)).pvalue > 0.05) as usize;
        }

        for (axis, &n) in ["x", "y", "z"].iter().zip(&passes) {
            assert!(n >= 3, "{}: only {}/5 seeds looked uniform", axis, n);
        }
    }

    #[test]
    fn test_cube_upper_bound_is_excluded() {
        // With a small cube around 1.0, lo + (1 - 2^-53) * size rounds up to
        // exactly center + size/2.
        let size = 2f64.powi(-30);
        for center in [DVec3::ONE, DVec3::new(-1.0, 3.0, 1e6)] {
            let p = sample_coord_from_cube(&mut MaxRng, center, size);
            let lo = center - DVec3::splat(size / 2.0);
            let hi = center + DVec3::splat(size / 2.0);
            for axis in 0..3 {
                assert!(
                    p[axis] >= lo[axis] && p[axis] < hi[axis],
                    "axis {}: {} outside [{}, {})",
                    axis,
                    p[axis],
                    lo[axis],
                    hi[axis]
                );
            }
        }
    }

    #[test]
    fn test_next_below() {
        assert!(next_below(1.0) < 1.0);
        assert_eq!(next_below(1.0), 1.0 - f64::EPSILON / 2.0);
        assert!(next_below(-1.0) < -1.0);
        assert!(next_below(0.0) < 0.0);
    }

    #[test]
    fn test_sample_coord_from_degenerate_cube() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let center = DVec3::new(1.0, -1.0, 0.5);
        assert_eq!(sample_coord_from_cube(&mut rng, center, 0.0), center);
    }
}
