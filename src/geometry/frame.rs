//! Rigid coordinate frames as 4x4 homogeneous matrices.
//!
//! A frame maps coordinates from one system into another. Points are column
//! vectors: `frame * (x, y, z, 1)`. Composition reads right to left, so
//! `frame_ab * frame_ia` maps "i" coordinates to "b" coordinates.

use glam::{DMat3, DMat4, DVec3, DVec4};
use rand::Rng;

use super::sample_unit_vector;

/// Homogeneous rigid transform (rotation followed by translation).
pub type Frame = DMat4;

/// Build the frame `p ↦ rotation * p + translation`.
pub fn frame_from_rotation_translation(rotation: DMat3, translation: DVec3) -> Frame {
    DMat4::from_cols(
        rotation.x_axis.extend(0.0),
        rotation.y_axis.extend(0.0),
        rotation.z_axis.extend(0.0),
        translation.extend(1.0),
    )
}

/// Rotation block of a frame.
pub fn frame_rotation(frame: &Frame) -> DMat3 {
    DMat3::from_mat4(*frame)
}

/// Translation column of a frame.
pub fn frame_translation(frame: &Frame) -> DVec3 {
    frame.w_axis.truncate()
}

/// Invert a rigid frame without a general 4x4 inverse.
pub fn invert_frame(frame: &Frame) -> Frame {
    let r_inv = frame_rotation(frame).transpose();
    let t = frame_translation(frame);
    frame_from_rotation_translation(r_inv, -(r_inv * t))
}

/// Apply `frame` to every point.
pub fn transform_coords(points: &[DVec3], frame: &Frame) -> Vec<DVec3> {
    points.iter().map(|&p| frame.transform_point3(p)).collect()
}

/// Whether `frame` is a proper rigid transform within `tolerance`.
pub fn is_rigid(frame: &Frame, tolerance: f64) -> bool {
    let r = frame_rotation(frame);
    let bottom = frame.row(3);
    (r * r.transpose()).abs_diff_eq(DMat3::IDENTITY, tolerance)
        && (r.determinant() - 1.0).abs() <= tolerance
        && bottom.abs_diff_eq(DVec4::W, tolerance)
}

/// Draw a small random rigid transform.
///
/// The rotation turns about a uniformly random axis by an angle uniform in
/// `[0, max_angle_deg]`; the translation points in a uniformly random
/// direction with length uniform in `[0, max_distance_a]`. With both limits
/// at zero the result is exactly the identity.
pub fn sample_noise_frame<R: Rng + ?Sized>(
    rng: &mut R,
    max_distance_a: f64,
    max_angle_deg: f64,
) -> Frame {
    let axis = sample_unit_vector(rng);
    let angle = rng.gen::<f64>() * max_angle_deg.to_radians();
    let rotation = if angle == 0.0 {
        DMat3::IDENTITY
    } else {
        DMat3::from_axis_angle(axis, angle)
    };

    let direction = sample_unit_vector(rng);
    let distance = rng.gen::<f64>() * max_distance_a;

    frame_from_rotation_translation(rotation, direction * distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pairwise_distances(x: &[DVec3]) -> Vec<f64> {
        let mut d = Vec::new();
        for i in 0..x.len() {
            for j in (i + 1)..x.len() {
                d.push((x[i] - x[j]).length());
            }
        }
        d
    }

    #[test]
    fn test_noise_frame_preserves_distances() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let x = [DVec3::X, DVec3::Y, DVec3::Z];
        let expected = pairwise_distances(&x);

        for _ in 0..1000 {
            let frame = sample_noise_frame(&mut rng, 10.0, 20.0);
            assert!(is_rigid(&frame, 1e-12));

            let y = transform_coords(&x, &frame);
            for (a, e) in pairwise_distances(&y).iter().zip(&expected) {
                assert_relative_eq!(*a, *e, epsilon = 1e-12, max_relative = 1e-12);
            }
        }
    }

    #[test]
    fn test_noise_frame_respects_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let frame = sample_noise_frame(&mut rng, 5.0, 10.0);
            assert!(frame_translation(&frame).length() <= 5.0 + 1e-12);

            let r = frame_rotation(&frame);
            let trace = r.x_axis.x + r.y_axis.y + r.z_axis.z;
            let angle = ((trace - 1.0) / 2.0).clamp(-1.0, 1.0).acos();
            assert!(angle <= 10f64.to_radians() + 1e-9, "angle {}", angle);
        }
    }

    #[test]
    fn test_zero_noise_is_identity() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..10 {
            assert_eq!(sample_noise_frame(&mut rng, 0.0, 0.0), DMat4::IDENTITY);
        }
    }

    #[test]
    fn test_is_rigid_checks_homogeneous_row() {
        let mut frame = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0));
        assert!(is_rigid(&frame, 1e-12));

        frame.x_axis.w = 0.5;
        assert!(!is_rigid(&frame, 1e-12));

        let scaled = DMat4::from_scale(DVec3::splat(2.0));
        assert!(!is_rigid(&scaled, 1e-12));
    }

    #[test]
    fn test_invert_frame() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..100 {
            let frame = sample_noise_frame(&mut rng, 10.0, 180.0);
            let inv = invert_frame(&frame);
            assert!((inv * frame).abs_diff_eq(DMat4::IDENTITY, 1e-12));
            assert!((frame * inv).abs_diff_eq(DMat4::IDENTITY, 1e-12));
        }
    }

    #[test]
    fn test_frame_from_rotation_translation_applies_rotation_first() {
        let r = DMat3::from_rotation_z(std::f64::consts::FRAC_PI_2);
        let frame = frame_from_rotation_translation(r, DVec3::new(0.0, 0.0, 1.0));
        let p = frame.transform_point3(DVec3::X);
        assert!(p.abs_diff_eq(DVec3::new(0.0, 1.0, 1.0), 1e-12));
    }
}
