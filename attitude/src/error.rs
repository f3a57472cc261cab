use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttitudeError {
    /// The body→world rate transform has determinant cos θ; it cannot be
    /// inverted at θ = ±90°.
    #[error("kinematic singularity: cos(theta) = 0 at theta = {theta} rad")]
    KinematicSingularity { theta: f64 },
    /// Hover thrust divides by cos φ · cos θ.
    #[error("thrust singularity: cos(phi)·cos(theta) = 0 at phi = {phi} rad, theta = {theta} rad")]
    ThrustSingularity { phi: f64, theta: f64 },
    #[error("invalid vehicle parameter `{name}` = {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("gyro noise distribution: {0}")]
    Noise(#[from] rand_distr::NormalError),
}

pub type Result<T, E = AttitudeError> = std::result::Result<T, E>;
