use rand::Rng;

use super::kinematics::body_to_world_rates;
use super::sensor::measure_rates;
use super::terms::angular_acceleration;
use super::types::{AttitudeStepDebug, RigidBodyState, Torques};
use crate::error::Result;
use crate::VehicleParams;

/// Advance body rates by one forward-Euler step of the Euler rotation
/// equations and refresh the gyro-derived world-frame rates.
/// See `step_attitude_dbg` for telemetry.
pub fn step_attitude<R: Rng + ?Sized>(
    state: &RigidBodyState,
    params: &VehicleParams,
    torques: Torques,
    rng: &mut R,
) -> Result<RigidBodyState> {
    step_attitude_dbg(state, params, torques, rng, None)
}

/// Variant of `step_attitude` that fills out an optional debug telemetry struct.
///
/// Angles are left untouched: the driver integrates them from the rates it
/// captured before the step. World rates come from the *measured* body
/// rates, so everything downstream sees sensor error.
pub fn step_attitude_dbg<R: Rng + ?Sized>(
    state: &RigidBodyState,
    params: &VehicleParams,
    torques: Torques,
    rng: &mut R,
    mut dbg: Option<&mut AttitudeStepDebug>,
) -> Result<RigidBodyState> {
    let spec = &params.spec;
    let w = state.omega_body;
    let omega_dot = angular_acceleration(spec, torques, w);
    let omega_body = w + omega_dot * spec.dt;

    let measured = measure_rates(params, omega_body, rng)?;
    let rates = body_to_world_rates(&state.angles, measured)?;

    if let Some(d) = dbg.as_mut() {
        d.torques = torques;
        d.omega_dot = omega_dot;
        d.omega_true = omega_body;
        d.omega_measured = measured;
        d.rates = rates;
        d.kinematic_det = state.angles.theta.cos();
    }

    Ok(RigidBodyState {
        omega_body,
        rates,
        ..*state
    })
}
