use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use attitude::{EulerSample, TimeSeries};

use crate::sweep::SweepSummary;

/// Buffered writer to `path`, or stdout when `None`.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(p) => {
            let f = File::create(p).with_context(|| format!("creating {}", p.display()))?;
            Box::new(BufWriter::new(f))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Columns: time, ψ, φ, θ in degrees, and 1 where the extraction hit gimbal lock.
pub fn write_euler_series<W: Write>(mut w: W, samples: &[EulerSample]) -> io::Result<()> {
    writeln!(w, "# time psi_deg phi_deg theta_deg gimbal_lock")?;
    for s in samples {
        let [psi, phi, theta] = s.extraction.to_euler_angles().to_degrees();
        let lock = u8::from(s.extraction.is_gimbal_lock());
        writeln!(w, "{:.6} {:.6} {:.6} {:.6} {}", s.time, psi, phi, theta, lock)?;
    }
    w.flush()
}

/// Columns: time, φ, θ, ψ in degrees, rotor thrusts 1–4 and vertical force (N).
pub fn write_control_series<W: Write>(mut w: W, series: &TimeSeries) -> io::Result<()> {
    writeln!(w, "# time phi_deg theta_deg psi_deg thrust1 thrust2 thrust3 thrust4 f_z")?;
    for s in &series.samples {
        let a = s.angles;
        let [t1, t2, t3, t4] = s.thrusts;
        writeln!(
            w,
            "{:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6} {:.6}",
            s.time,
            a.phi.to_degrees(),
            a.theta.to_degrees(),
            a.psi.to_degrees(),
            t1,
            t2,
            t3,
            t4,
            s.vertical_force
        )?;
    }
    w.flush()
}

/// One row per seed with the final angles in degrees, then the aggregate tilt.
pub fn write_sweep_summary<W: Write>(mut w: W, summary: &SweepSummary) -> io::Result<()> {
    writeln!(w, "# seed phi_deg theta_deg psi_deg max_tilt_deg")?;
    for r in &summary.runs {
        let a = r.final_angles;
        writeln!(
            w,
            "{} {:.6} {:.6} {:.6} {:.6}",
            r.seed,
            a.phi.to_degrees(),
            a.theta.to_degrees(),
            a.psi.to_degrees(),
            r.max_tilt.to_degrees()
        )?;
    }
    writeln!(
        w,
        "# mean_max_tilt_deg {:.6} worst_max_tilt_deg {:.6}",
        summary.mean_max_tilt.to_degrees(),
        summary.worst_max_tilt.to_degrees()
    )?;
    w.flush()
}
