use std::path::PathBuf;

use anyhow::{Context, Result};
use attitude::{integrate_rate_log, run, DVec3, EulerSample, RigidBodyState, TimeSeries, VehicleParams};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

pub mod config;
pub mod output;
pub mod sweep;

pub use config::{load_config, parse_config, Config};
pub use sweep::{RunSetup, RunSummary, SweepSummary};

#[derive(Parser, Debug, Clone)]
#[command(name = "quadsim")]
#[command(about = "Quadrotor attitude simulator and gyro log integrator", long_about = None)]
pub struct Args {
    /// TOML config; built-in reference vehicle when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the config seed
    #[arg(long)]
    pub seed: Option<u64>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Integrate a logged gyro capture into Euler angles
    Integrate {
        /// Whitespace-separated x y z rates in deg/s, one sample per line
        log: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Sample period (s)
        #[arg(long)]
        period: Option<f64>,
        /// Leading stationary samples used for the bias estimate
        #[arg(long)]
        bias_window: Option<usize>,
    },
    /// Run the closed-loop attitude simulation
    Control {
        #[arg(long)]
        steps: Option<usize>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Repeat the control run over consecutive seeds and summarize
    Sweep {
        #[arg(long)]
        runs: Option<usize>,
        #[arg(long)]
        threads: Option<usize>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Apply command-line overrides on top of the loaded config.
pub fn apply_overrides(args: &Args, mut cfg: Config) -> Config {
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    match &args.command {
        Command::Integrate { period, bias_window, .. } => {
            if let Some(p) = period {
                cfg.integrate.period = *p;
            }
            if let Some(w) = bias_window {
                cfg.integrate.bias_window = *w;
            }
        }
        Command::Control { steps, .. } => {
            if let Some(s) = steps {
                cfg.control.steps = *s;
            }
        }
        Command::Sweep { runs, threads, .. } => {
            if let Some(r) = runs {
                cfg.sweep.runs = *r;
            }
            if let Some(t) = threads {
                cfg.sweep.threads = *t;
            }
        }
    }
    cfg
}

pub fn run_integrate(log: &std::path::Path, cfg: &Config) -> Result<Vec<EulerSample>> {
    let rate_log = gyrolog::read_rate_log_file(log, cfg.integrate.period)
        .with_context(|| format!("loading gyro log {}", log.display()))?;
    let rates: Vec<DVec3> = rate_log
        .samples
        .iter()
        .map(|s| DVec3::from_array(s.to_radians()))
        .collect();
    let samples = integrate_rate_log(&rates, rate_log.period, cfg.integrate.bias_window)?;
    Ok(samples)
}

pub fn control_setup(cfg: &Config) -> RunSetup {
    RunSetup {
        spec: cfg.vehicle.clone(),
        initial: RigidBodyState::at_rest(
            cfg.control.initial_deg.to_radians(),
            cfg.control.desired_deg.to_radians(),
        ),
        steps: cfg.control.steps,
    }
}

pub fn run_control(cfg: &Config) -> Result<TimeSeries> {
    let setup = control_setup(cfg);
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let params = VehicleParams::from_spec(setup.spec, &mut rng)?;
    info!(gyro_bias = ?params.gyro_bias, hover_gamma = params.hover_gamma(), "vehicle ready");
    let series = run(setup.initial, &params, setup.steps, &mut rng)?;
    Ok(series)
}

pub fn execute(args: &Args, cfg: &Config) -> Result<()> {
    match &args.command {
        Command::Integrate { log, out, .. } => {
            let samples = run_integrate(log, cfg)?;
            let locked = samples.iter().filter(|s| s.extraction.is_gimbal_lock()).count();
            info!(samples = samples.len(), locked, "integration done");
            output::write_euler_series(output::open_output(out.as_deref())?, &samples)?;
        }
        Command::Control { out, .. } => {
            let series = run_control(cfg)?;
            info!(steps = series.len(), final_angles = ?series.final_angles(), "control run done");
            output::write_control_series(output::open_output(out.as_deref())?, &series)?;
        }
        Command::Sweep { out, .. } => {
            let summary = sweep::sweep(&control_setup(cfg), cfg.seed, cfg.sweep.runs, cfg.sweep.threads)?;
            output::write_sweep_summary(output::open_output(out.as_deref())?, &summary)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_win_over_config() {
        let args = Args::parse_from(["quadsim", "--seed", "9", "control", "--steps", "12"]);
        let cfg = apply_overrides(&args, Config::default());
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.control.steps, 12);

        let args = Args::parse_from(["quadsim", "integrate", "log.txt", "--bias-window", "3"]);
        let cfg = apply_overrides(&args, Config::default());
        assert_eq!(cfg.integrate.bias_window, 3);
        assert_eq!(cfg.integrate.period, attitude::vehicle_specs::GYRO_LOG_DT);

        let args = Args::parse_from(["quadsim", "sweep", "--runs", "2", "--out", "sweep.txt"]);
        match &args.command {
            Command::Sweep { out, .. } => assert_eq!(out.as_deref(), Some(std::path::Path::new("sweep.txt"))),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(apply_overrides(&args, Config::default()).sweep.runs, 2);
    }

    #[test]
    fn control_run_uses_config_angles() {
        let mut cfg = Config::default();
        cfg.control.steps = 3;
        cfg.control.initial_deg.phi = 5.0;
        let series = run_control(&cfg).unwrap();
        assert_eq!(series.len(), 3);
        assert!((series.samples[0].angles.phi - 5f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn missing_log_reports_path() {
        let err = run_integrate(std::path::Path::new("/nonexistent/gyro.txt"), &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/gyro.txt"), "{err:#}");
    }
}
