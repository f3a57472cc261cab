//! Dead-reckoning a gyro log into an orientation history.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AttitudeError, Result};
use crate::math::DVec3;
use crate::orientation::{EulerExtraction, Orientation};

/// Samples averaged for the bias estimate in the reference logs.
pub const DEFAULT_BIAS_WINDOW: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerSample {
    /// Seconds since the first integrated sample.
    pub time: f64,
    pub extraction: EulerExtraction,
}

/// Integrates body rates (rad/s) sampled at a fixed period.
#[derive(Debug, Clone)]
pub struct GyroIntegrator {
    orientation: Orientation,
    dt: f64,
    bias: DVec3,
}

impl GyroIntegrator {
    pub fn new(dt: f64) -> Result<Self> {
        Self::with_orientation(Orientation::IDENTITY, dt)
    }

    pub fn with_orientation(orientation: Orientation, dt: f64) -> Result<Self> {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(AttitudeError::InvalidParameter { name: "dt", value: dt });
        }
        Ok(Self { orientation, dt, bias: DVec3::ZERO })
    }

    /// Estimate the gyro bias as the mean of `stationary` samples taken with
    /// the vehicle at rest. An empty slice leaves the bias at zero.
    pub fn calibrate(&mut self, stationary: &[DVec3]) -> DVec3 {
        if !stationary.is_empty() {
            let sum: DVec3 = stationary.iter().copied().sum();
            self.bias = sum / stationary.len() as f64;
        }
        debug!(bias = ?self.bias, n = stationary.len(), "gyro bias estimate");
        self.bias
    }

    pub fn bias(&self) -> DVec3 {
        self.bias
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Apply one raw sample, holding it constant over the sample period.
    pub fn update(&mut self, raw_rate: DVec3) -> EulerExtraction {
        let omega = raw_rate - self.bias;
        self.orientation = self.orientation.sanitized().integrate(omega, self.dt);
        self.orientation.to_eulers()
    }
}

/// Calibrate on the first `bias_window` samples, then integrate the rest.
/// Sample times restart at zero after the calibration window.
pub fn integrate_rate_log(rates: &[DVec3], dt: f64, bias_window: usize) -> Result<Vec<EulerSample>> {
    let mut integrator = GyroIntegrator::new(dt)?;
    let split = bias_window.min(rates.len());
    let (stationary, moving) = rates.split_at(split);
    integrator.calibrate(stationary);

    let out: Vec<EulerSample> = moving
        .iter()
        .enumerate()
        .map(|(i, &w)| EulerSample {
            time: i as f64 * dt,
            extraction: integrator.update(w),
        })
        .collect();

    let locked = out.iter().filter(|s| s.extraction.is_gimbal_lock()).count();
    info!(samples = out.len(), gimbal_lock = locked, "integrated gyro log");
    Ok(out)
}
