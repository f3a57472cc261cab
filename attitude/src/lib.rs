//! Quadrotor attitude physics shared by the simulator and its tests.
//!
//! This crate performs no I/O. It covers the rotation-matrix attitude
//! representation and gyro integration, rigid-body rotational dynamics with a
//! simulated rate gyro, the PD controller with its rotor mixer, and a
//! fixed-step closed-loop driver.

pub mod math;
pub use math::{DMat3, DQuat, DVec3};

mod error;
pub use error::{AttitudeError, Result};

pub mod orientation;
pub use orientation::{
    eulers_to_matrix, integrate, matrix_to_eulers, EulerAngles, EulerExtraction, Orientation, Pole,
};

pub mod integrator;
pub use integrator::{integrate_rate_log, EulerSample, GyroIntegrator, DEFAULT_BIAS_WINDOW};

mod vehicle_spec;
pub use vehicle_spec::{VehicleParams, VehicleSpec};
pub use vehicle_spec::vehicle_specs;

pub mod quad_physics;
pub use quad_physics::{step_attitude, step_attitude_dbg, AttitudeStepDebug, EulerRates, RigidBodyState, Torques};

pub mod control;
pub use control::{compute_motor_commands, motor_torques, MotorCommand};

pub mod simulation;
pub use simulation::{run, SimSample, Simulation, TimeSeries};
