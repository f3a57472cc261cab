use std::path::Path;

use anyhow::{Context, Result};
use attitude::{vehicle_specs, EulerAngles, VehicleSpec, DEFAULT_BIAS_WINDOW};
use serde::{Deserialize, Serialize};

/// Angles as written in config files, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnglesDeg {
    pub psi: f64,
    pub phi: f64,
    pub theta: f64,
}

impl AnglesDeg {
    pub fn to_radians(self) -> EulerAngles {
        EulerAngles::new(self.psi.to_radians(), self.phi.to_radians(), self.theta.to_radians())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub steps: usize,
    pub initial_deg: AnglesDeg,
    pub desired_deg: AnglesDeg,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            steps: 40_000,
            initial_deg: AnglesDeg::default(),
            desired_deg: AnglesDeg::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrateConfig {
    /// Gyro sample period (s).
    pub period: f64,
    /// Leading samples averaged for the bias estimate.
    pub bias_window: usize,
}

impl Default for IntegrateConfig {
    fn default() -> Self {
        Self {
            period: vehicle_specs::GYRO_LOG_DT,
            bias_window: DEFAULT_BIAS_WINDOW,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub runs: usize,
    /// Worker threads; 0 picks the available parallelism.
    pub threads: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { runs: 16, threads: 0 }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base seed; run `i` of a sweep uses `seed + i`.
    pub seed: u64,
    pub vehicle: VehicleSpec,
    pub control: ControlConfig,
    pub integrate: IntegrateConfig,
    pub sweep: SweepConfig,
}

pub fn parse_config(text: &str) -> Result<Config> {
    toml::from_str(text).context("parsing config")
}

/// Load the TOML config at `path`, or the built-in defaults when `None`.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("in {}", path.display()))
}
