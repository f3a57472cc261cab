use serde::{Deserialize, Serialize};

use crate::math::DVec3;
use crate::orientation::EulerAngles;

/// Time derivatives of the Euler angles (rad/s), i.e. the world-frame view
/// of the angular velocity.
pub type EulerRates = EulerAngles;

/// Body torques about the roll, pitch and yaw axes (N·m).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Torques {
    pub phi: f64,
    pub theta: f64,
    pub psi: f64,
}

impl Torques {
    pub const ZERO: Self = Self { phi: 0.0, theta: 0.0, psi: 0.0 };
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigidBodyState {
    /// Current roll φ, pitch θ and yaw ψ.
    pub angles: EulerAngles,
    pub desired: EulerAngles,
    /// World-frame rates as seen through the gyro (noisy, biased).
    pub rates: EulerRates,
    pub desired_rates: EulerRates,
    /// True body-frame angular velocity (ω_x, ω_y, ω_z), rad/s.
    pub omega_body: DVec3,
}

impl RigidBodyState {
    /// At rest at `angles`, commanded to hold `desired`.
    pub fn at_rest(angles: EulerAngles, desired: EulerAngles) -> Self {
        Self {
            angles,
            desired,
            ..Self::default()
        }
    }
}

/// Per-step telemetry from the dynamics update.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttitudeStepDebug {
    pub torques: Torques,
    /// ω̇ from the Euler equations, before integration.
    pub omega_dot: DVec3,
    pub omega_true: DVec3,
    pub omega_measured: DVec3,
    pub rates: EulerRates,
    /// det of the world→body rate transform, cos θ.
    pub kinematic_det: f64,
}
