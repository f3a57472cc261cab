use attitude::{run, vehicle_specs, DVec3, EulerAngles, RigidBodyState, VehicleParams};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn ideal_params() -> VehicleParams {
    VehicleParams::with_gyro_bias(vehicle_specs::ideal_sensor_quad_spec(), DVec3::ZERO).unwrap()
}

#[test]
fn zero_error_holds_constant_hover() {
    let params = ideal_params();
    let spec = &params.spec;
    let initial = RigidBodyState::at_rest(EulerAngles::ZERO, EulerAngles::ZERO);
    let ts = run(initial, &params, 5000, &mut StdRng::seed_from_u64(1)).unwrap();

    let hover = spec.m * spec.g / (4.0 * spec.k);
    let weight = spec.m * spec.g;
    for s in &ts.samples {
        for g in s.command.gammas() {
            assert!((g - hover).abs() <= 1e-9 * hover, "t={} gamma={} hover={}", s.time, g, hover);
        }
        assert!((s.vertical_force - weight).abs() < 1e-9, "t={} f_z={}", s.time, s.vertical_force);
        assert_eq!(s.angles, EulerAngles::ZERO);
    }
}

#[test]
fn roll_offset_settles_back_to_level() {
    let params = ideal_params();
    let initial = RigidBodyState::at_rest(EulerAngles::new(0.1, 0.2, -0.15), EulerAngles::ZERO);
    let ts = run(initial, &params, 2500, &mut StdRng::seed_from_u64(1)).unwrap();
    let a = ts.final_angles().unwrap();
    assert!(a.phi.abs() < 1e-3 && a.theta.abs() < 1e-3 && a.psi.abs() < 1e-3, "final {a:?}");
}

#[test]
fn tracks_a_nonzero_setpoint() {
    let params = ideal_params();
    let desired = EulerAngles::new(0.3, -0.1, 0.05);
    let ts = run(RigidBodyState::at_rest(EulerAngles::ZERO, desired), &params, 2500, &mut StdRng::seed_from_u64(1)).unwrap();
    let a = ts.final_angles().unwrap();
    assert!((a.psi - desired.psi).abs() < 1e-3, "final {a:?}");
    assert!((a.phi - desired.phi).abs() < 1e-3, "final {a:?}");
    assert!((a.theta - desired.theta).abs() < 1e-3, "final {a:?}");
}

#[test]
fn noisy_gyro_stays_near_level() {
    let mut rng = StdRng::seed_from_u64(2024);
    let params = VehicleParams::from_spec(vehicle_specs::reference_quad_spec(), &mut rng).unwrap();
    let ts = run(RigidBodyState::default(), &params, 10_000, &mut rng).unwrap();
    let max_tilt = ts
        .samples
        .iter()
        .map(|s| s.angles.phi.abs().max(s.angles.theta.abs()))
        .fold(0.0, f64::max);
    assert!(max_tilt < 0.05, "max tilt {max_tilt}");
    for s in &ts.samples {
        for g in s.command.gammas() {
            assert!((0.0..=params.spec.max_motor_gamma).contains(&g));
        }
    }
}
