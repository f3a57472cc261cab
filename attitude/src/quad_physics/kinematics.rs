use crate::error::{AttitudeError, Result};
use crate::math::{mat3_from_rows, DMat3, DVec3};
use crate::orientation::EulerAngles;

use super::types::EulerRates;

/// Below this |cos θ| the rate transform is treated as singular.
pub const KINEMATIC_EPS: f64 = 1e-9;

/// Matrix taking Euler-angle rates (φ̇, θ̇, ψ̇) to body rates (ω_x, ω_y, ω_z).
/// Its determinant is cos θ.
pub fn world_to_body_matrix(angles: &EulerAngles) -> DMat3 {
    let (s_ph, c_ph) = angles.phi.sin_cos();
    let (s_th, c_th) = angles.theta.sin_cos();
    mat3_from_rows([
        [1.0, 0.0, -s_th],
        [0.0, c_ph, c_th * s_ph],
        [0.0, -s_ph, c_th * c_ph],
    ])
}

/// Invert [`world_to_body_matrix`] in closed form. Fails when θ is at ±90°.
pub fn body_to_world_rates(angles: &EulerAngles, omega: DVec3) -> Result<EulerRates> {
    let (s_ph, c_ph) = angles.phi.sin_cos();
    let (s_th, c_th) = angles.theta.sin_cos();
    if c_th.abs() < KINEMATIC_EPS {
        return Err(AttitudeError::KinematicSingularity { theta: angles.theta });
    }
    // sφ·ω_y + cφ·ω_z = cθ·ψ̇
    let yaw_part = s_ph * omega.y + c_ph * omega.z;
    Ok(EulerRates {
        phi: omega.x + s_th / c_th * yaw_part,
        theta: c_ph * omega.y - s_ph * omega.z,
        psi: yaw_part / c_th,
    })
}
