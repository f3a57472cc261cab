use attitude::control::{allocate, hover_thrust, pd_errors};
use attitude::{compute_motor_commands, vehicle_specs, DVec3, EulerAngles, RigidBodyState, VehicleParams};
use proptest::prelude::*;

fn angles(range: f64) -> impl Strategy<Value = EulerAngles> {
    (-range..range, -range..range, -range..range).prop_map(|(psi, phi, theta)| EulerAngles::new(psi, phi, theta))
}

proptest! {
    #[test]
    fn commands_stay_within_actuator_range(
        current in angles(1.4),
        desired in angles(1.4),
        rates in angles(20.0),
    ) {
        let params = VehicleParams::with_gyro_bias(vehicle_specs::reference_quad_spec(), DVec3::ZERO).unwrap();
        let state = RigidBodyState { angles: current, desired, rates, ..Default::default() };
        let cmd = compute_motor_commands(&state, &params).unwrap();
        for g in cmd.gammas() {
            prop_assert!(g >= 0.0 && g <= params.spec.max_motor_gamma, "gamma {} out of range", g);
        }
    }

    #[test]
    fn unsaturated_commands_pass_through(current in angles(0.05), rates in angles(0.05)) {
        let params = VehicleParams::with_gyro_bias(vehicle_specs::reference_quad_spec(), DVec3::ZERO).unwrap();
        let state = RigidBodyState { angles: current, rates, ..Default::default() };
        let raw = allocate(&params.spec, hover_thrust(&state, &params.spec).unwrap(), pd_errors(&state, &params.spec));
        let cmd = compute_motor_commands(&state, &params).unwrap();
        prop_assert_eq!(cmd.gammas(), raw);
    }
}
