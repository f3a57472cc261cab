//! Monte Carlo over gyro seeds. Each run owns its parameters, state and RNG,
//! so runs are spread over scoped threads with nothing shared but the config.

use std::num::NonZeroUsize;
use std::thread;

use anyhow::{anyhow, Result};
use attitude::{run, EulerAngles, RigidBodyState, VehicleParams, VehicleSpec};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub final_angles: EulerAngles,
    /// Largest |φ| or |θ| seen during the run (rad).
    pub max_tilt: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    pub runs: Vec<RunSummary>,
    pub mean_max_tilt: f64,
    pub worst_max_tilt: f64,
}

/// Everything a single run needs besides its seed.
#[derive(Debug, Clone)]
pub struct RunSetup {
    pub spec: VehicleSpec,
    pub initial: RigidBodyState,
    pub steps: usize,
}

pub fn run_one(setup: &RunSetup, seed: u64) -> attitude::Result<RunSummary> {
    let mut rng = StdRng::seed_from_u64(seed);
    let params = VehicleParams::from_spec(setup.spec.clone(), &mut rng)?;
    let series = run(setup.initial, &params, setup.steps, &mut rng)?;
    let max_tilt = series
        .samples
        .iter()
        .map(|s| s.angles.phi.abs().max(s.angles.theta.abs()))
        .fold(0.0, f64::max);
    let final_angles = series.final_angles().unwrap_or(setup.initial.angles);
    debug!(seed, max_tilt, "run done");
    Ok(RunSummary { seed, final_angles, max_tilt })
}

pub fn sweep(setup: &RunSetup, base_seed: u64, runs: usize, threads: usize) -> Result<SweepSummary> {
    let threads = if threads == 0 {
        thread::available_parallelism().map_or(1, NonZeroUsize::get)
    } else {
        threads
    }
    .min(runs.max(1));
    let seeds: Vec<u64> = (0..runs as u64).map(|i| base_seed.wrapping_add(i)).collect();
    let chunk = seeds.len().div_ceil(threads).max(1);
    info!(runs, threads, base_seed, "starting sweep");

    let mut results = thread::scope(|scope| {
        let handles: Vec<_> = seeds
            .chunks(chunk)
            .map(|part| {
                scope.spawn(move || {
                    part.iter()
                        .map(|&seed| run_one(setup, seed))
                        .collect::<attitude::Result<Vec<_>>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().map_err(|_| anyhow!("sweep worker panicked"))?.map_err(anyhow::Error::from))
            .collect::<Result<Vec<_>>>()
    })?
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    results.sort_by_key(|r| r.seed);

    let worst_max_tilt = results.iter().map(|r| r.max_tilt).fold(0.0, f64::max);
    let mean_max_tilt = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.max_tilt).sum::<f64>() / results.len() as f64
    };
    info!(mean_max_tilt, worst_max_tilt, "sweep finished");
    Ok(SweepSummary { runs: results, mean_max_tilt, worst_max_tilt })
}
