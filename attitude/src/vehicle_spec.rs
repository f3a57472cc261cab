use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::error::{AttitudeError, Result};
use crate::math::DVec3;

/// Physical and controller constants for one quadrotor airframe. Missing
/// fields in serialized form fall back to the reference airframe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleSpec {
    /// kg
    pub m: f64,
    /// Principal moments of inertia (kg·m²).
    pub ixx: f64,
    pub iyy: f64,
    pub izz: f64,
    /// Rotor thrust coefficient k (N·s²): thrust = k·γ.
    pub k: f64,
    /// Rotor drag-torque coefficient b (N·m·s²).
    pub b: f64,
    /// Arm length, hub to rotor axis (m).
    pub l: f64,
    pub g: f64,
    /// Fixed integration step (s).
    pub dt: f64,
    pub kp: f64,
    pub kd: f64,
    /// Ceiling on the squared rotor speed γ (rad²/s²).
    pub max_motor_gamma: f64,
    /// Zero-mean noise on every gyro reading (rad/s).
    pub gyro_noise_std: f64,
    /// Spread of the constant per-axis gyro bias drawn once per run (rad/s).
    pub gyro_bias_std: f64,
}

impl Default for VehicleSpec {
    fn default() -> Self {
        vehicle_specs::reference_quad_spec()
    }
}

/// Immutable parameters of a single run: the airframe plus the gyro bias
/// drawn for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleParams {
    pub spec: VehicleSpec,
    pub gyro_bias: DVec3,
}

impl VehicleParams {
    /// Validate `spec` and draw the per-axis gyro bias from `rng`.
    pub fn from_spec<R: Rng + ?Sized>(spec: VehicleSpec, rng: &mut R) -> Result<Self> {
        validate(&spec)?;
        let bias = Normal::new(0.0, spec.gyro_bias_std)?;
        let gyro_bias = DVec3::new(bias.sample(rng), bias.sample(rng), bias.sample(rng));
        tracing::debug!(?gyro_bias, "drew gyro bias");
        Ok(Self { spec, gyro_bias })
    }

    /// Parameters with a known bias, for replaying a specific sensor.
    pub fn with_gyro_bias(spec: VehicleSpec, gyro_bias: DVec3) -> Result<Self> {
        validate(&spec)?;
        Ok(Self { spec, gyro_bias })
    }

    /// γ per motor that exactly cancels gravity in level flight.
    pub fn hover_gamma(&self) -> f64 {
        self.spec.m * self.spec.g / (4.0 * self.spec.k)
    }
}

fn validate(spec: &VehicleSpec) -> Result<()> {
    let strictly_positive = [
        ("m", spec.m),
        ("ixx", spec.ixx),
        ("iyy", spec.iyy),
        ("izz", spec.izz),
        ("k", spec.k),
        ("b", spec.b),
        ("l", spec.l),
        ("dt", spec.dt),
        ("max_motor_gamma", spec.max_motor_gamma),
    ];
    for (name, value) in strictly_positive {
        if !(value.is_finite() && value > 0.0) {
            return Err(AttitudeError::InvalidParameter { name, value });
        }
    }
    let non_negative = [
        ("g", spec.g),
        ("kp", spec.kp),
        ("kd", spec.kd),
        ("gyro_noise_std", spec.gyro_noise_std),
        ("gyro_bias_std", spec.gyro_bias_std),
    ];
    for (name, value) in non_negative {
        if !(value.is_finite() && value >= 0.0) {
            return Err(AttitudeError::InvalidParameter { name, value });
        }
    }
    Ok(())
}

pub mod vehicle_specs {
    use super::*;

    /// Sample period of the reference MPU-6050 gyro logs (s).
    pub const GYRO_LOG_DT: f64 = 0.00375;

    // Rotor: 6360 rpm at full throttle, lifting 0.62 kg.
    fn max_rotor_speed() -> f64 {
        2.0 * std::f64::consts::PI * 6360.0 / 60.0
    }

    /// The 0.66 kg, 25 cm-arm prototype frame.
    pub fn reference_quad_spec() -> VehicleSpec {
        let g = 9.81;
        let l = 0.25;
        let w_max = max_rotor_speed();

        // Mass budget: motor 47 g, arm 43 g, battery + frame centre ~300 g
        let motor = 0.047;
        let arm = 0.043;
        let centre = 0.4 * 0.3 * 0.1 * 0.1;
        let ixx = 2.0 * motor * l * l + 2.0 * arm * l * l * 0.33 + centre;
        let iyy = ixx;
        let izz = 4.0 * motor * l * l + 4.0 * arm * l * l * 0.33 + centre;

        VehicleSpec {
            m: 0.66,
            ixx,
            iyy,
            izz,
            k: 0.62 * g / (w_max * w_max),
            b: 5.0e-6,
            l,
            g,
            dt: 0.004,
            kp: 4.0,
            kd: 3.0,
            max_motor_gamma: w_max * w_max,
            gyro_noise_std: 0.00167,
            gyro_bias_std: 0.001,
        }
    }

    /// Reference frame with a perfect gyro: no noise, no bias.
    pub fn ideal_sensor_quad_spec() -> VehicleSpec {
        VehicleSpec {
            gyro_noise_std: 0.0,
            gyro_bias_std: 0.0,
            ..reference_quad_spec()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn same_seed_same_bias() {
        let spec = vehicle_specs::reference_quad_spec();
        let a = VehicleParams::from_spec(spec.clone(), &mut StdRng::seed_from_u64(7)).unwrap();
        let b = VehicleParams::from_spec(spec, &mut StdRng::seed_from_u64(7)).unwrap();
        assert_eq!(a.gyro_bias, b.gyro_bias);
        assert!(a.gyro_bias.abs().max_element() < 0.01, "bias={:?}", a.gyro_bias);
    }

    #[test]
    fn ideal_sensor_has_zero_bias() {
        let spec = vehicle_specs::ideal_sensor_quad_spec();
        let p = VehicleParams::from_spec(spec, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(p.gyro_bias, DVec3::ZERO);
    }

    #[test]
    fn rejects_non_positive_time_step() {
        let mut spec = vehicle_specs::reference_quad_spec();
        spec.dt = 0.0;
        let err = VehicleParams::from_spec(spec, &mut StdRng::seed_from_u64(1)).unwrap_err();
        assert!(matches!(err, AttitudeError::InvalidParameter { name: "dt", .. }), "{err}");
    }

    #[test]
    fn hover_gamma_lifts_the_weight() {
        let p = VehicleParams::with_gyro_bias(vehicle_specs::reference_quad_spec(), DVec3::ZERO).unwrap();
        let lift = 4.0 * p.spec.k * p.hover_gamma();
        assert!((lift - p.spec.m * p.spec.g).abs() < 1e-12);
        assert!(p.hover_gamma() < p.spec.max_motor_gamma);
    }
}
