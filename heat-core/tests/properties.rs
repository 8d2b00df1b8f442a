use heat_core::*;

use float_cmp::assert_approx_eq;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Independent nested-loop stencil for a spatially constant `k`.
fn reference_uniform(config: &SimulationConfig, k: f64) -> Vec<Vec<Vec<f64>>> {
    let nx = (config.length_x / config.dx).floor() as usize + 1;
    let ny = (config.length_y / config.dx).floor() as usize + 1;
    let nt = (config.total_time / config.dt).floor() as usize;
    let b = config.boundary;

    let mut u = vec![vec![vec![config.initial_temperature; nx]; ny]; nt];
    for slice in u.iter_mut() {
        slice[0].fill(b.bottom);
        slice[ny - 1].fill(b.top);
        for row in slice.iter_mut() {
            row[0] = b.left;
            row[nx - 1] = b.right;
        }
    }
    let c = k * config.dt / (config.dx * config.dx);
    for t in 0..nt - 1 {
        for i in 1..ny - 1 {
            for j in 1..nx - 1 {
                u[t + 1][i][j] = u[t][i][j]
                    + c * (u[t][i + 1][j] + u[t][i - 1][j] + u[t][i][j + 1] + u[t][i][j - 1]
                        - 4.0 * u[t][i][j]);
            }
        }
    }
    u
}

fn scenario_config() -> SimulationConfig {
    SimulationConfig::new(2.0, 2.0, 0.1, 0.001, 0.1, 200.0)
        .with_diffusivity(DiffusivityField::uniform(0.1))
}

#[test]
fn uniform_field_matches_reference() {
    let config = SimulationConfig::new(1.0, 1.5, 0.1, 0.002, 0.2, 200.0)
        .with_boundary(BoundaryConditions {
            top: 50.0,
            bottom: 200.0,
            left: 0.0,
            right: 120.0,
        })
        .with_diffusivity(DiffusivityField::uniform(0.5));
    let reference = reference_uniform(&config, 0.5);
    let result = Simulation::new(config).unwrap().run();

    assert_eq!(result.state().len(), reference.len());
    for (t, expected) in reference.iter().enumerate() {
        let view = result.slice(t);
        for (i, row) in expected.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                assert_approx_eq!(f64, view.get(i, j), v, epsilon = 1e-9);
            }
        }
    }
}

#[test]
fn degenerate_inclusions_are_uniform() {
    let base = SimulationConfig::new(2.0, 2.0, 0.1, 0.001, 0.2, 200.0);
    let uniform = Simulation::new(base.clone().with_diffusivity(DiffusivityField::uniform(0.1)))
        .unwrap()
        .run();

    // Equal values inside and out.
    let same = Simulation::new(
        base.clone()
            .with_diffusivity(DiffusivityField::inclusion((1.5, 1.5), 0.5, 0.1, 0.1)),
    )
    .unwrap()
    .run();
    assert_eq!(same.state(), uniform.state());

    // Zero radius centered between grid nodes touches no cell.
    let empty = Simulation::new(
        base.with_diffusivity(DiffusivityField::inclusion((1.05, 1.05), 0.0, 0.01, 0.1)),
    )
    .unwrap()
    .run();
    for (a, b) in empty
        .state()
        .as_slice()
        .iter()
        .zip(uniform.state().as_slice())
    {
        assert_approx_eq!(f64, *a, *b, epsilon = 1e-12);
    }
}

#[test]
fn borders_hold_for_every_slice() {
    let bc = BoundaryConditions {
        top: 1.0,
        bottom: -3.0,
        left: 7.5,
        right: 200.0,
    };
    let config = SimulationConfig::new(2.0, 1.0, 0.1, 0.001, 0.05, 0.0).with_boundary(bc);
    let result = Simulation::new(config).unwrap().run();
    let (_, ny, nx) = result.state().shape();
    for view in result.state().slices() {
        assert!(bc.border_matches(view.as_slice(), nx, ny));
        for i in 0..ny {
            assert_eq!(view.get(i, 0), 7.5);
            assert_eq!(view.get(i, nx - 1), 200.0);
        }
        for j in 1..nx - 1 {
            assert_eq!(view.get(0, j), -3.0);
            assert_eq!(view.get(ny - 1, j), 1.0);
        }
    }
}

#[test]
fn maximum_principle() {
    let config = SimulationConfig::new(2.0, 2.0, 0.1, 0.002, 1.0, 200.0);
    let result = Simulation::new(config).unwrap().run();
    let (nt, ny, nx) = result.state().shape();
    for t in 1..nt {
        let prev = result.slice(t - 1);
        let cur = result.slice(t);
        for i in 1..ny - 1 {
            for j in 1..nx - 1 {
                assert!(cur.get(i, j) >= prev.get(i, j) - 1e-9, "cooled at t={t} ({i}, {j})");
                assert!(cur.get(i, j) <= 200.0 + 1e-9, "overshoot at t={t} ({i}, {j})");
                assert!(cur.get(i, j) >= 0.0);
            }
        }
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let config = SimulationConfig::new(2.0, 2.0, 0.1, 0.001, 0.3, 200.0);
    let a = Simulation::new(config.clone()).unwrap().run();
    let b = Simulation::new(config.clone()).unwrap().run();
    let c = Simulation::new(config).unwrap().run_with(Execution::Parallel);
    assert_eq!(a.state(), b.state());
    assert_eq!(a.state(), c.state());
}

#[test]
fn unstable_config_is_rejected_before_stepping() {
    // dt/dx^2 = 10, max k = 0.1
    let config = SimulationConfig::new(2.0, 2.0, 0.1, 0.1, 1.0, 200.0);
    assert!(config.stability_ratio() > STABILITY_LIMIT_2D);
    assert!(matches!(
        Simulation::new(config.clone()),
        Err(ConfigurationError::Unstable { .. })
    ));
    assert!(Stepper::new(config).is_err());
}

#[test]
fn center_warms_in_uniform_plate() {
    let result = Simulation::new(scenario_config()).unwrap().run();
    assert_eq!(result.state().len(), 100);
    let center_0 = result.slice(0).get(10, 10);
    let center = result.final_slice().get(10, 10);
    assert_eq!(center_0, 0.0);
    assert!(center > 0.0 && center < 200.0, "center = {center}");
    assert!(center > center_0);
    assert_eq!(result.final_slice().center(), center);
}

#[test]
fn inclusion_warms_slower() {
    let config = SimulationConfig::new(2.0, 2.0, 0.1, 0.001, 2.0, 200.0)
        .with_diffusivity(DiffusivityField::inclusion((1.5, 1.5), 0.5, 0.01, 0.1));
    let result = Simulation::new(config).unwrap().run();
    assert_eq!(result.state().len(), 2000);

    // (1.5, 1.5) is the inclusion center, (0.5, 0.5) the mirrored point
    // at the same distance from the nearest edges.
    for t in [500, 1000, 1999] {
        let view = result.slice(t);
        let inside = view.get(15, 15);
        let outside = view.get(5, 5);
        assert!(inside < outside, "t={t}: inside {inside} vs outside {outside}");
    }
}

#[test]
fn random_configs_keep_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(123);
    for _ in 0..20 {
        let dx = 0.1;
        let k_out = rng.gen_range(0.05..0.5);
        let k_in = rng.gen_range(0.0..k_out);
        let dt = rng.gen_range(0.1..1.0) * STABILITY_LIMIT_2D * dx * dx / k_out;
        let bc = BoundaryConditions {
            top: rng.gen_range(0.0..300.0),
            bottom: rng.gen_range(0.0..300.0),
            left: rng.gen_range(0.0..300.0),
            right: rng.gen_range(0.0..300.0),
        };
        let config = SimulationConfig::new(
            rng.gen_range(0.5..1.5),
            rng.gen_range(0.5..1.5),
            dx,
            dt,
            30.0 * dt,
            0.0,
        )
        .with_boundary(bc)
        .with_diffusivity(DiffusivityField::inclusion(
            (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)),
            rng.gen_range(0.0..0.5),
            k_in,
            k_out,
        ))
        .with_initial_temperature(rng.gen_range(0.0..300.0));

        let result = Simulation::new(config.clone()).unwrap().run();
        let (nt, ny, nx) = result.state().shape();
        assert!(nt >= 29);

        let lo = [bc.top, bc.bottom, bc.left, bc.right, config.initial_temperature]
            .into_iter()
            .fold(f64::INFINITY, f64::min);
        let hi = [bc.top, bc.bottom, bc.left, bc.right, config.initial_temperature]
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max);
        for view in result.state().slices() {
            assert!(bc.border_matches(view.as_slice(), nx, ny));
            for &v in view.as_slice() {
                assert!(v >= lo - 1e-9 && v <= hi + 1e-9);
            }
        }

        let mut stepper = Stepper::new(config).unwrap().with_execution(Execution::Parallel);
        stepper.finish();
        assert_eq!(stepper.current().as_slice(), result.final_slice().as_slice());
    }
}
