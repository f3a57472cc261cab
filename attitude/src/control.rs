//! PD attitude controller and the four-rotor mixer.
//!
//! Rotors 1 and 3 sit on the roll arm, 2 and 4 on the pitch arm. Pairs
//! spin in opposite directions so that yaw comes from the speed difference
//! between the pairs.

use serde::{Deserialize, Serialize};

use crate::error::{AttitudeError, Result};
use crate::quad_physics::{RigidBodyState, Torques};
use crate::{VehicleParams, VehicleSpec};

/// Below this |cos φ · cos θ| hover thrust is unbounded.
pub const THRUST_EPS: f64 = 1e-9;

/// Squared rotor speeds γ₁…γ₄ (rad²/s²), each within `[0, max_motor_gamma]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorCommand(pub [f64; 4]);

impl MotorCommand {
    pub fn gammas(&self) -> [f64; 4] {
        self.0
    }

    /// Per-rotor thrust k·γᵢ (N).
    pub fn thrusts(&self, spec: &VehicleSpec) -> [f64; 4] {
        self.0.map(|g| spec.k * g)
    }

    pub fn total_thrust(&self, spec: &VehicleSpec) -> f64 {
        self.thrusts(spec).iter().sum()
    }
}

/// PD error terms per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisErrors {
    pub phi: f64,
    pub theta: f64,
    pub psi: f64,
}

/// γ each rotor needs so the four together hold altitude at the current tilt.
pub fn hover_thrust(state: &RigidBodyState, spec: &VehicleSpec) -> Result<f64> {
    let tilt = state.angles.phi.cos() * state.angles.theta.cos();
    if tilt.abs() < THRUST_EPS {
        return Err(AttitudeError::ThrustSingularity {
            phi: state.angles.phi,
            theta: state.angles.theta,
        });
    }
    Ok(spec.m * spec.g / (4.0 * spec.k * tilt))
}

pub fn pd_errors(state: &RigidBodyState, spec: &VehicleSpec) -> AxisErrors {
    let pd = |des: f64, cur: f64, des_rate: f64, rate: f64| {
        -spec.kp * (des - cur) - spec.kd * (des_rate - rate)
    };
    let (a, d) = (&state.angles, &state.desired);
    let (r, dr) = (&state.rates, &state.desired_rates);
    AxisErrors {
        phi: pd(d.phi, a.phi, dr.phi, r.phi),
        theta: pd(d.theta, a.theta, dr.theta, r.theta),
        psi: pd(d.psi, a.psi, dr.psi, r.psi),
    }
}

/// Mix hover thrust and axis errors into unsaturated rotor commands.
pub fn allocate(spec: &VehicleSpec, hover: f64, e: AxisErrors) -> [f64; 4] {
    let (b, k, l) = (spec.b, spec.k, spec.l);
    let roll = 2.0 * b * spec.ixx * e.phi;
    let yaw = k * l * spec.izz * e.psi;
    let denom = 4.0 * b * k * l;
    let yaw_pair = spec.izz * e.psi / (4.0 * b);
    let pitch = spec.iyy * e.theta / (2.0 * k * l);
    [
        hover - (roll + yaw) / denom,
        hover + yaw_pair - pitch,
        hover - (-roll + yaw) / denom,
        hover + yaw_pair + pitch,
    ]
}

/// Clamp into what a rotor can physically do.
pub fn saturate(raw: [f64; 4], max_gamma: f64) -> MotorCommand {
    MotorCommand(raw.map(|g| g.clamp(0.0, max_gamma)))
}

/// Full control law: hover thrust, PD errors, mixing, saturation.
pub fn compute_motor_commands(state: &RigidBodyState, params: &VehicleParams) -> Result<MotorCommand> {
    let spec = &params.spec;
    let hover = hover_thrust(state, spec)?;
    let raw = allocate(spec, hover, pd_errors(state, spec));
    let cmd = saturate(raw, spec.max_motor_gamma);
    if cmd.0 != raw {
        tracing::trace!(?raw, clamped = ?cmd.0, "motor saturation");
    }
    Ok(cmd)
}

/// Body torques produced by a command, using the same rotor geometry as
/// [`allocate`].
pub fn motor_torques(cmd: &MotorCommand, spec: &VehicleSpec) -> Torques {
    let [g1, g2, g3, g4] = cmd.0;
    Torques {
        phi: spec.l * spec.k * (g1 - g3),
        theta: spec.l * spec.k * (g2 - g4),
        psi: spec.b * (g1 - g2 + g3 - g4),
    }
}
