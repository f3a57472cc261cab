mod types;
mod kinematics;
mod sensor;
mod terms;
mod dynamics;

pub use types::{AttitudeStepDebug, EulerRates, RigidBodyState, Torques};
pub use kinematics::{body_to_world_rates, world_to_body_matrix, KINEMATIC_EPS};
pub use sensor::measure_rates;
pub use dynamics::{step_attitude, step_attitude_dbg};
