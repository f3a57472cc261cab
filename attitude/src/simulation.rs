use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::control::{compute_motor_commands, motor_torques, MotorCommand};
use crate::error::Result;
use crate::orientation::EulerAngles;
use crate::quad_physics::{step_attitude, EulerRates, RigidBodyState, Torques};
use crate::VehicleParams;

/// One row of the controller time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimSample {
    /// step index × dt
    pub time: f64,
    pub angles: EulerAngles,
    pub rates: EulerRates,
    pub command: MotorCommand,
    /// k·γᵢ per rotor (N).
    pub thrusts: [f64; 4],
    /// Summed rotor thrust along body z (N). Equals m·g only in level hover;
    /// the mixer raises it by 1/(cos φ cos θ) when tilted.
    pub vertical_force: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    pub dt: f64,
    pub samples: Vec<SimSample>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn final_angles(&self) -> Option<EulerAngles> {
        self.samples.last().map(|s| s.angles)
    }
}

/// Closed-loop attitude simulation with a one-step actuation delay.
pub struct Simulation<R> {
    state: RigidBodyState,
    params: VehicleParams,
    /// Torques from the previous step's command, applied on the next step.
    pending: Torques,
    rng: R,
    step_index: usize,
}

impl<R: Rng> Simulation<R> {
    pub fn new(initial: RigidBodyState, params: VehicleParams, rng: R) -> Self {
        Self {
            state: initial,
            params,
            pending: Torques::ZERO,
            rng,
            step_index: 0,
        }
    }

    pub fn state(&self) -> &RigidBodyState {
        &self.state
    }

    pub fn params(&self) -> &VehicleParams {
        &self.params
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn step(&mut self) -> Result<SimSample> {
        let spec = &self.params.spec;
        let dt = spec.dt;
        let captured = self.state.rates;

        let mut next = step_attitude(&self.state, &self.params, self.pending, &mut self.rng)?;
        next.angles.phi += dt * captured.phi;
        next.angles.theta += dt * captured.theta;
        next.angles.psi += dt * captured.psi;

        let command = compute_motor_commands(&next, &self.params)?;
        self.pending = motor_torques(&command, spec);

        let sample = SimSample {
            time: self.step_index as f64 * dt,
            angles: next.angles,
            rates: next.rates,
            command,
            thrusts: command.thrusts(spec),
            vertical_force: command.total_thrust(spec),
        };
        self.state = next;
        self.step_index += 1;
        Ok(sample)
    }
}

/// Run `steps` fixed steps from `initial` and collect the series. Depends on
/// nothing but its arguments, so independent runs can go on separate threads.
pub fn run<R: Rng + ?Sized>(
    initial: RigidBodyState,
    params: &VehicleParams,
    steps: usize,
    rng: &mut R,
) -> Result<TimeSeries> {
    let mut sim = Simulation::new(initial, params.clone(), rng);
    let mut samples = Vec::with_capacity(steps);
    for _ in 0..steps {
        samples.push(sim.step()?);
    }
    debug!(steps, final_angles = ?samples.last().map(|s| s.angles), "simulation finished");
    Ok(TimeSeries { dt: params.spec.dt, samples })
}
