//! Orientation as a direction-cosine matrix.
//!
//! The matrix maps body-frame vectors into the world frame and is the only
//! authoritative attitude representation. Euler angles are extracted on
//! demand and degrade to a single combined angle at the roll poles
//! (φ = ±90°), which [`EulerExtraction`] makes explicit.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::math::{cosc, mat3_at, mat3_from_rows, mat3_is_finite, orthonormality_error, sinc, skew};
use crate::math::{DMat3, DQuat, DVec3};
use crate::error::{AttitudeError, Result};

const MATRIX_TOLERANCE: f64 = 1e-6;

/// Yaw ψ, roll φ and pitch θ in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    pub psi: f64,
    pub phi: f64,
    pub theta: f64,
}

impl EulerAngles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(psi: f64, phi: f64, theta: f64) -> Self {
        Self { psi, phi, theta }
    }

    /// `[ψ, φ, θ]` in degrees.
    pub fn to_degrees(self) -> [f64; 3] {
        [self.psi.to_degrees(), self.phi.to_degrees(), self.theta.to_degrees()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pole {
    /// φ = +90°
    Positive,
    /// φ = −90°
    Negative,
}

/// Result of reading Euler angles off a rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EulerExtraction {
    Regular(EulerAngles),
    /// At the roll poles θ and ψ rotate about the same axis and only their
    /// combination is observable. `psi` holds that combination: ψ + θ at the
    /// positive pole, ψ − θ at the negative one.
    GimbalLock { pole: Pole, psi: f64 },
}

impl EulerExtraction {
    pub fn psi(&self) -> f64 {
        match *self {
            Self::Regular(a) => a.psi,
            Self::GimbalLock { psi, .. } => psi,
        }
    }

    pub fn is_gimbal_lock(&self) -> bool {
        matches!(self, Self::GimbalLock { .. })
    }

    /// Flatten into angles, attributing the whole combined angle to ψ and
    /// reporting θ = 0 at the poles. Lossy; meant for time-series output.
    pub fn to_euler_angles(&self) -> EulerAngles {
        match *self {
            Self::Regular(a) => a,
            Self::GimbalLock { pole: Pole::Positive, psi } => {
                EulerAngles::new(psi, std::f64::consts::FRAC_PI_2, 0.0)
            }
            Self::GimbalLock { pole: Pole::Negative, psi } => {
                EulerAngles::new(psi, -std::f64::consts::FRAC_PI_2, 0.0)
            }
        }
    }
}

/// Body→world rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation(DMat3);

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Orientation {
    pub const IDENTITY: Self = Self(DMat3::IDENTITY);

    /// Wrap `m` if it is a finite, proper rotation matrix to within 1e-6.
    pub fn from_matrix(m: DMat3) -> Result<Self> {
        let err = orthonormality_error(&m);
        if !mat3_is_finite(&m) || !(err < MATRIX_TOLERANCE) || m.determinant() < 0.0 {
            return Err(AttitudeError::InvalidParameter { name: "orientation", value: err });
        }
        Ok(Self(m))
    }

    pub fn matrix(&self) -> DMat3 {
        self.0
    }

    pub fn from_eulers(theta: f64, phi: f64, psi: f64) -> Self {
        eulers_to_matrix(theta, phi, psi)
    }

    pub fn to_eulers(&self) -> EulerExtraction {
        matrix_to_eulers(self)
    }

    /// Advance by a constant body rate `omega` (rad/s) held for `dt` seconds.
    pub fn integrate(self, omega: DVec3, dt: f64) -> Self {
        integrate(self, omega, dt)
    }

    pub fn to_quat(&self) -> DQuat {
        DQuat::from_mat3(&self.0)
    }

    pub fn orthonormality_error(&self) -> f64 {
        orthonormality_error(&self.0)
    }

    /// Replace a matrix that has picked up NaN/Inf with the identity.
    pub fn sanitized(self) -> Self {
        if mat3_is_finite(&self.0) {
            self
        } else {
            warn!(matrix = ?self.0, "non-finite orientation matrix, resetting to identity");
            Self::IDENTITY
        }
    }
}

/// Build the rotation matrix for pitch `theta`, roll `phi` and yaw `psi`.
pub fn eulers_to_matrix(theta: f64, phi: f64, psi: f64) -> Orientation {
    let (s_th, c_th) = theta.sin_cos();
    let (s_ph, c_ph) = phi.sin_cos();
    let (s_ps, c_ps) = psi.sin_cos();
    Orientation(mat3_from_rows([
        [
            c_ps * c_th - s_ph * s_ps * s_th,
            -c_ph * s_ps,
            c_ps * s_th + c_th * s_ph * s_ps,
        ],
        [
            c_th * s_ps + c_ps * s_ph * s_th,
            c_ph * c_ps,
            s_ps * s_th - c_ps * c_th * s_ph,
        ],
        [-c_ph * s_th, s_ph, c_ph * c_th],
    ]))
}

/// Read Euler angles off the matrix, branching on r21 = sin φ.
pub fn matrix_to_eulers(o: &Orientation) -> EulerExtraction {
    let m = &o.0;
    let r = |row, col| mat3_at(m, row, col);
    let r21 = r(2, 1);
    if r21 >= 1.0 {
        EulerExtraction::GimbalLock {
            pole: Pole::Positive,
            psi: r(0, 2).atan2(r(0, 0)),
        }
    } else if r21 <= -1.0 {
        EulerExtraction::GimbalLock {
            pole: Pole::Negative,
            psi: -r(0, 2).atan2(r(0, 0)),
        }
    } else {
        EulerExtraction::Regular(EulerAngles {
            psi: (-r(0, 1)).atan2(r(1, 1)),
            phi: r21.asin(),
            theta: (-r(2, 0)).atan2(r(2, 2)),
        })
    }
}

/// Rotation accumulated over `dt` at constant body rate `omega`:
/// `I + sinc(σ)·B + ((1 − cos σ)/σ²)·B²` with `B = skew(dt·ω)`, `σ = dt·|ω|`.
pub fn rotation_increment(omega: DVec3, dt: f64) -> DMat3 {
    let rot = omega * dt;
    let b = skew(rot);
    let sigma = rot.length();
    DMat3::IDENTITY + b * sinc(sigma) + (b * b) * cosc(sigma)
}

/// Exact update for constant body-frame angular velocity. The increment is
/// applied on the right, i.e. expressed in the body frame at step start.
pub fn integrate(o: Orientation, omega: DVec3, dt: f64) -> Orientation {
    Orientation(o.0 * rotation_increment(omega, dt))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_mat_close(a: DMat3, b: DMat3, tol: f64) {
        let d = a - b;
        let err = d.x_axis.abs().max_element()
            .max(d.y_axis.abs().max_element())
            .max(d.z_axis.abs().max_element());
        assert!(err < tol, "matrices differ by {err}:\n{a:?}\n{b:?}");
    }

    #[test]
    fn zero_rate_is_identity_increment() {
        let o = eulers_to_matrix(0.3, -0.4, 1.1);
        assert_eq!(rotation_increment(DVec3::ZERO, 0.004), DMat3::IDENTITY);
        assert_eq!(o.integrate(DVec3::ZERO, 0.004), o);
    }

    #[test]
    fn zero_angles_give_identity() {
        assert_eq!(eulers_to_matrix(0.0, 0.0, 0.0).matrix(), DMat3::IDENTITY);
    }

    #[test]
    fn round_trip_away_from_poles() {
        let cases = [(0.1, 0.2, 0.3), (-2.5, 1.2, 3.0), (1.0, -1.5, -0.7), (3.1, 0.0, -3.1)];
        for (theta, phi, psi) in cases {
            match eulers_to_matrix(theta, phi, psi).to_eulers() {
                EulerExtraction::Regular(a) => {
                    assert!((a.theta - theta).abs() < 1e-12, "theta {theta} -> {}", a.theta);
                    assert!((a.phi - phi).abs() < 1e-12, "phi {phi} -> {}", a.phi);
                    assert!((a.psi - psi).abs() < 1e-12, "psi {psi} -> {}", a.psi);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn pure_yaw_rate_for_pi_seconds_turns_half_way() {
        let omega = DVec3::new(0.0, 0.0, 1.0);
        let steps = 1000;
        let dt = PI / steps as f64;
        let mut o = Orientation::IDENTITY;
        for _ in 0..steps {
            o = o.integrate(omega, dt);
        }
        assert_mat_close(o.matrix(), eulers_to_matrix(0.0, 0.0, PI).matrix(), 1e-12);

        // One step of the same total rotation must agree: the update is exact.
        let once = Orientation::IDENTITY.integrate(omega, PI);
        assert_mat_close(once.matrix(), o.matrix(), 1e-12);
    }

    #[test]
    fn rotation_about_tilted_axis_matches_quaternion() {
        let axis = DVec3::new(1.0, -2.0, 0.5).normalize();
        let angle = 0.8;
        let got = Orientation::IDENTITY.integrate(axis * angle, 1.0);
        let want = DMat3::from_quat(DQuat::from_axis_angle(axis, angle));
        assert_mat_close(got.matrix(), want, 1e-12);
    }

    #[test]
    fn positive_pole_reports_combined_angle() {
        let o = eulers_to_matrix(0.3, FRAC_PI_2, 0.2);
        match o.to_eulers() {
            EulerExtraction::GimbalLock { pole: Pole::Positive, psi } => {
                assert!((psi - 0.5).abs() < 1e-12, "psi={psi}");
            }
            // sin(π/2) may round just below one; the regular branch must then agree.
            EulerExtraction::Regular(a) => assert!((a.psi + a.theta - 0.5).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn negative_pole_reports_difference() {
        // Exact pole: r21 = -1 by construction.
        let (s, c) = 0.9_f64.sin_cos();
        let m = mat3_from_rows([[c, 0.0, -s], [s, 0.0, c], [0.0, -1.0, 0.0]]);
        let extraction = Orientation::from_matrix(m).unwrap().to_eulers();
        match extraction {
            EulerExtraction::GimbalLock { pole: Pole::Negative, psi } => {
                assert!((psi - 0.9).abs() < 1e-12, "psi={psi}");
            }
            other => panic!("unexpected {other:?}"),
        }
        let flat = extraction.to_euler_angles();
        assert_eq!(flat.phi, -FRAC_PI_2);
        assert_eq!(flat.theta, 0.0);
    }

    #[test]
    fn quaternion_of_quarter_yaw() {
        let q = eulers_to_matrix(0.0, 0.0, FRAC_PI_2).to_quat();
        let want = DQuat::from_rotation_z(FRAC_PI_2);
        assert!(q.dot(want).abs() > 1.0 - 1e-12, "q={q:?}");
    }

    #[test]
    fn from_matrix_rejects_non_rotations() {
        let rotation = eulers_to_matrix(0.2, -0.4, 1.1).matrix();
        assert_eq!(Orientation::from_matrix(rotation).unwrap().matrix(), rotation);

        let sheared = mat3_from_rows([[1.0, 0.1, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]);
        let err = Orientation::from_matrix(sheared).unwrap_err();
        assert!(matches!(err, AttitudeError::InvalidParameter { name: "orientation", .. }), "{err}");

        let mut nan = DMat3::IDENTITY;
        nan.z_axis.y = f64::NAN;
        assert!(Orientation::from_matrix(nan).is_err());
        assert!(Orientation::from_matrix(DMat3::IDENTITY * 2.0).is_err());
        let mirrored = mat3_from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, -1.0]]);
        assert!(Orientation::from_matrix(mirrored).is_err());
    }

    #[test]
    fn nan_matrix_resets_to_identity() {
        let mut m = DMat3::IDENTITY;
        m.x_axis.x = f64::NAN;
        assert_eq!(Orientation(m).sanitized(), Orientation::IDENTITY);
        let fine = eulers_to_matrix(0.1, 0.2, 0.3);
        assert_eq!(fine.sanitized(), fine);
    }
}
