use crate::math::DVec3;
use crate::VehicleSpec;

use super::types::Torques;

// ----- Euler rotation equations, principal axes -----

pub(super) fn roll_acceleration(spec: &VehicleSpec, tau: f64, w: DVec3) -> f64 {
    tau / spec.ixx - (spec.iyy - spec.izz) / spec.ixx * w.y * w.z
}

pub(super) fn pitch_acceleration(spec: &VehicleSpec, tau: f64, w: DVec3) -> f64 {
    tau / spec.iyy - (spec.izz - spec.ixx) / spec.iyy * w.x * w.z
}

pub(super) fn yaw_acceleration(spec: &VehicleSpec, tau: f64, w: DVec3) -> f64 {
    tau / spec.izz - (spec.ixx - spec.iyy) / spec.izz * w.x * w.y
}

/// ω̇ for all three axes, evaluated at the start-of-step rate.
pub(super) fn angular_acceleration(spec: &VehicleSpec, torques: Torques, w: DVec3) -> DVec3 {
    DVec3::new(
        roll_acceleration(spec, torques.phi, w),
        pitch_acceleration(spec, torques.theta, w),
        yaw_acceleration(spec, torques.psi, w),
    )
}
