use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::error::Result;
use crate::math::DVec3;
use crate::VehicleParams;

/// Rate gyro reading: the true rate plus white noise centred on the run's
/// constant per-axis bias.
pub fn measure_rates<R: Rng + ?Sized>(params: &VehicleParams, omega: DVec3, rng: &mut R) -> Result<DVec3> {
    let sigma = params.spec.gyro_noise_std;
    let bias = params.gyro_bias;
    let x = Normal::new(bias.x, sigma)?;
    let y = Normal::new(bias.y, sigma)?;
    let z = Normal::new(bias.z, sigma)?;
    Ok(omega + DVec3::new(x.sample(rng), y.sample(rng), z.sample(rng)))
}
