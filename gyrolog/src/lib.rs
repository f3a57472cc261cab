//! Gyro rate logs: one sample per line, three whitespace-separated rates in
//! degrees per second (x, y, z body axes).
//!
//! Any malformed line aborts the read; there is no partial recovery.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("reading gyro log: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: expected 3 columns, found {found}")]
    ColumnCount { line: usize, found: usize },
    #[error("line {line}, column {column}: {source}")]
    Parse {
        line: usize,
        column: usize,
        #[source]
        source: std::num::ParseFloatError,
    },
    #[error("line {line}, column {column}: rate is not finite")]
    NonFinite { line: usize, column: usize },
}

/// Body rates in deg/s as logged by the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RateSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RateSample {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_radians(self) -> [f64; 3] {
        [self.x.to_radians(), self.y.to_radians(), self.z.to_radians()]
    }
}

/// Samples taken at a fixed period; sample `i` was taken at `i * period`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLog {
    pub period: f64,
    pub samples: Vec<RateSample>,
}

impl RateLog {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Parse one line (1-based `line` for error messages). Blank lines yield `None`.
pub fn parse_line(text: &str, line: usize) -> Result<Option<RateSample>, LogError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.is_empty() {
        return Ok(None);
    }
    if fields.len() != 3 {
        return Err(LogError::ColumnCount { line, found: fields.len() });
    }
    let mut v = [0.0; 3];
    for (column, (slot, field)) in v.iter_mut().zip(&fields).enumerate() {
        let value: f64 = field.parse().map_err(|source| LogError::Parse { line, column: column + 1, source })?;
        if !value.is_finite() {
            return Err(LogError::NonFinite { line, column: column + 1 });
        }
        *slot = value;
    }
    Ok(Some(RateSample::new(v[0], v[1], v[2])))
}

pub fn read_rate_log<R: BufRead>(reader: R, period: f64) -> Result<RateLog, LogError> {
    let mut samples = Vec::new();
    for (i, text) in reader.lines().enumerate() {
        if let Some(s) = parse_line(&text?, i + 1)? {
            samples.push(s);
        }
    }
    tracing::debug!(samples = samples.len(), period, "read gyro log");
    Ok(RateLog { period, samples })
}

pub fn read_rate_log_file(path: impl AsRef<Path>, period: f64) -> Result<RateLog, LogError> {
    let file = File::open(path)?;
    read_rate_log(BufReader::new(file), period)
}
