use glam::{DMat3, DVec3};

use crate::constants::{DEGENERATE_EPSILON, PARALLEL_EPSILON};
use crate::error::Result;

use super::require_unit_vector;

/// Compute the smallest rotation `R` such that `R * b̂ = â`.
///
/// The rotation axis is `b × a` and the angle is measured with `atan2`, which
/// stays accurate for nearly (anti-)parallel inputs. Parallel inputs give the
/// identity; anti-parallel inputs turn by π about an axis perpendicular to `b`.
///
/// Fails with [`SamplingError::DegenerateVector`](crate::SamplingError) if
/// either vector is too short to define a direction.
pub fn align_vectors(a: DVec3, b: DVec3) -> Result<DMat3> {
    let a = require_unit_vector(a)?;
    let b = require_unit_vector(b)?;

    let cross = b.cross(a);
    let sin = cross.length();
    let cos = b.dot(a);

    if sin < PARALLEL_EPSILON {
        if cos > 0.0 {
            return Ok(DMat3::IDENTITY);
        }
        return Ok(DMat3::from_axis_angle(perpendicular_axis(b), std::f64::consts::PI));
    }

    let axis = cross / sin;
    let angle = sin.atan2(cos);
    Ok(DMat3::from_axis_angle(axis, angle))
}

/// An arbitrary unit vector perpendicular to the unit vector `v`.
fn perpendicular_axis(v: DVec3) -> DVec3 {
    let arbitrary = if v.x.abs() < 0.9 { DVec3::X } else { DVec3::Y };
    let axis = v.cross(arbitrary);
    debug_assert!(axis.length() > DEGENERATE_EPSILON);
    axis.normalize()
}
