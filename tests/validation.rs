// tests/validation.rs
//
// Integration-style validation tests (physics sanity checks) on the reference
// sheet: 15 cm x 15 cm, 100 x 100 cells, 60 Hz, B0 = 100 mT.
// Run with: cargo test --test validation

use std::f64::consts::{FRAC_PI_2, TAU};

use approx::assert_relative_eq;

use eddy_sim::diffusion::DiffusionSolver;
use eddy_sim::material::{reference_catalog, CatalogEntry, MaterialSpec};
use eddy_sim::params::{BoundaryStencil, SimulationConfig, MU0};
use eddy_sim::simulate::{run_catalog, simulate_material, simulate_material_observed};
use eddy_sim::summary::{skin_depth, ResultBundle};
use eddy_sim::EddyError;

fn bundle_for(name: &str, cfg: &SimulationConfig) -> ResultBundle {
    let entry = reference_catalog()
        .into_iter()
        .find(|e| e.name == name)
        .expect("material in reference catalog");
    simulate_material(&entry.spec, cfg).expect("reference run succeeds")
}

#[test]
fn per_step_invariants_hold_for_reference_catalog() {
    let cfg = SimulationConfig::default();
    let grid = cfg.grid();

    for entry in reference_catalog() {
        let mut prev_energy = vec![0.0; grid.n_cells()];
        let mut steps = 0usize;

        simulate_material_observed(&entry.spec, &cfg, |view| {
            steps += 1;

            // Stability: finite and bounded by a small multiple of B0.
            assert!(view.bz.all_finite(), "{}: non-finite Bz", entry.name);
            assert!(
                view.bz.max_abs() <= 5.0 * cfg.b0,
                "{}: |Bz| = {} exceeds 5 B0 at step {}",
                entry.name,
                view.bz.max_abs(),
                view.state.step_index
            );

            // Boundary exactness: every border cell equals B0 sin(phase).
            let b_ext = cfg.b0 * view.state.phase.sin();
            for j in 0..grid.ny {
                for i in 0..grid.nx {
                    if grid.is_border(i, j) {
                        assert_eq!(
                            view.bz.get(i, j),
                            b_ext,
                            "{}: border ({}, {}) at step {}",
                            entry.name,
                            i,
                            j,
                            view.state.step_index
                        );
                    }
                }
            }

            // Monotone loss accumulation.
            let energy = &view.losses.energy().data;
            for (k, (&now, &before)) in energy.iter().zip(&prev_energy).enumerate() {
                assert!(
                    now >= before,
                    "{}: loss decreased at cell {} step {}",
                    entry.name,
                    k,
                    view.state.step_index
                );
            }
            prev_energy.copy_from_slice(energy);
        })
        .unwrap();

        assert!(steps > 0, "{} took no steps", entry.name);
    }
}

#[test]
fn skin_depth_shrinks_with_sigma_mu_product() {
    let omega = SimulationConfig::default().omega();
    let mut by_product: Vec<(f64, f64)> = reference_catalog()
        .iter()
        .map(|e| {
            let mu = e.spec.permeability(MU0);
            let sigma = e.spec.conductivity();
            (sigma * mu, skin_depth(omega, mu, sigma))
        })
        .collect();
    by_product.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());

    for w in by_product.windows(2) {
        assert!(w[1].1 < w[0].1, "delta must decrease as sigma*mu grows");
    }

    let cat = reference_catalog();
    let d = |k: usize| skin_depth(omega, cat[k].spec.permeability(MU0), cat[k].spec.conductivity());
    let (al, cu, fe) = (d(0), d(1), d(2));
    assert!(fe * 10.0 < al, "iron {fe} vs aluminium {al}");
    assert!(fe * 10.0 < cu, "iron {fe} vs copper {cu}");
}

#[test]
fn snapshot_is_first_step_inside_quadrature_window() {
    let cfg = SimulationConfig::default();

    for entry in reference_catalog() {
        let mut in_window_steps = Vec::new();
        let bundle = simulate_material_observed(&entry.spec, &cfg, |view| {
            in_window_steps.push((view.state.step_index, view.state.phase));
        })
        .unwrap();

        let window = 2.0 * cfg.omega() * bundle.dt;
        let first_hit = in_window_steps
            .iter()
            .find(|(_, phase)| (phase.rem_euclid(TAU) - FRAC_PI_2).abs() < window)
            .map(|&(k, _)| k)
            .expect("some step falls inside the window");

        assert_eq!(bundle.snapshot_step, first_hit, "{}", entry.name);
        assert!(
            (bundle.snapshot_phase.rem_euclid(TAU) - FRAC_PI_2).abs() < window,
            "{}: snapshot phase {} outside window {}",
            entry.name,
            bundle.snapshot_phase,
            window
        );
        assert_eq!(bundle.j_mag.data.len(), cfg.nx * cfg.ny);
    }
}

#[test]
fn total_power_round_trips_through_average_losses() {
    let cfg = SimulationConfig::default();
    for name in ["Aluminium", "Copper", "Iron"] {
        let b = bundle_for(name, &cfg);
        let recomputed = b.losses_avg.mean() * cfg.lx * cfg.ly * cfg.thickness;
        assert_relative_eq!(recomputed, b.p_total, max_relative = 1e-12);
        assert_relative_eq!(b.total_power_from_losses(&cfg), b.p_total, max_relative = 1e-12);
        assert!(b.p_total > 0.0, "{name}: no dissipation");
        assert!(b.p_max >= b.p_mean);
        assert!(b.j_max >= b.j_mean);
    }
}

#[test]
fn end_to_end_reference_scenario() {
    let cfg = SimulationConfig::default();
    let runs = run_catalog(&reference_catalog(), &cfg);
    assert_eq!(runs.len(), 3);

    let al = runs[0].result.as_ref().unwrap();
    let cu = runs[1].result.as_ref().unwrap();
    let fe = runs[2].result.as_ref().unwrap();

    // Ferromagnetic sheet: sub-millimetre skin depth.
    assert!(
        fe.skin_depth > 1e-4 && fe.skin_depth < 1e-3,
        "iron delta = {}",
        fe.skin_depth
    );
    // Copper: ~8.5 mm.
    assert!(cu.skin_depth > 10.0 * fe.skin_depth);
    assert_relative_eq!(cu.skin_depth, 8.53e-3, max_relative = 1e-2);

    // Larger mu*sigma -> larger dt -> fewer steps per period.
    assert_eq!(al.n_steps, 842);
    assert_eq!(cu.n_steps, 508);
    assert_eq!(fe.n_steps, 2);
    assert!(fe.dt > cu.dt && cu.dt > al.dt);

    // Phase lag at lx/4 and its derived views.
    for b in [al, cu, fe] {
        assert_relative_eq!(b.phase_lag_rad, 0.0375 / b.skin_depth, max_relative = 1e-12);
        assert_relative_eq!(
            b.lag_ms,
            b.phase_lag_rad / cfg.omega() * 1000.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(b.phase_lag_deg(), b.phase_lag_rad.to_degrees(), max_relative = 1e-12);
        assert_eq!(b.bz_profile_mt.len(), cfg.nx);
    }

    // Border cells swing through the full forcing amplitude over a period
    // when the period is finely resolved.
    for b in [al, cu] {
        let edge = b.bz_profile_mt[0];
        assert!((edge - 100.0).abs() < 0.5, "edge amplitude {edge} mT");
    }
}

#[test]
fn stencil_choice_does_not_change_results() {
    let wrap = SimulationConfig {
        nx: 32,
        ny: 24,
        stencil: BoundaryStencil::Wraparound,
        ..SimulationConfig::default()
    };
    let clamped = SimulationConfig {
        stencil: BoundaryStencil::Clamped,
        ..wrap
    };
    let cu = MaterialSpec::new(5.8e7, 1.0).unwrap();

    let a = simulate_material(&cu, &wrap).unwrap();
    let b = simulate_material(&cu, &clamped).unwrap();
    assert_eq!(a.bz_profile_mt, b.bz_profile_mt);
    assert_eq!(a.losses_avg.data, b.losses_avg.data);
    assert_eq!(a.snapshot_step, b.snapshot_step);
}

#[test]
fn overflowing_forcing_is_reported_as_divergence() {
    let cfg = SimulationConfig {
        nx: 8,
        ny: 8,
        b0: 1e308,
        ..SimulationConfig::default()
    };
    let al = MaterialSpec::new(3.5e7, 1.0).unwrap();
    let err = simulate_material(&al, &cfg).unwrap_err();
    assert!(matches!(err, EddyError::DivergedSimulation { step: 0 }));
}

#[test]
fn invalid_material_never_reaches_the_solver() {
    assert!(matches!(
        MaterialSpec::new(0.0, 1000.0),
        Err(EddyError::InvalidMaterial(_))
    ));
    assert!(matches!(
        MaterialSpec::new(1.0e7, -1.0),
        Err(EddyError::InvalidMaterial(_))
    ));
}

#[test]
fn solver_history_is_preallocated_for_the_full_period() {
    let cfg = SimulationConfig {
        nx: 16,
        ny: 16,
        ..SimulationConfig::default()
    };
    let cu = MaterialSpec::new(5.8e7, 1.0).unwrap();
    let mut solver = DiffusionSolver::new(&cu, &cfg).unwrap();
    let n = solver.n_steps();
    while solver.step().unwrap().is_some() {}
    assert_eq!(solver.history().len(), n * cfg.nx);
    assert_relative_eq!(solver.time(), n as f64 * solver.dt(), max_relative = 1e-12);
}

#[test]
fn vanishing_conductivity_does_not_abort_the_batch() {
    let cfg = SimulationConfig {
        nx: 64,
        ny: 64,
        ..SimulationConfig::default()
    };
    let mut catalog = reference_catalog();
    catalog.push(CatalogEntry {
        name: "Near-insulator".into(),
        colour: "#7f8c8d".into(),
        spec: MaterialSpec::new(1e-300, 1.0).unwrap(),
    });

    let runs = run_catalog(&catalog, &cfg);
    assert_eq!(runs.len(), 4);
    assert!(runs[..3].iter().all(|r| r.result.is_ok()));
    assert!(matches!(
        runs[3].result,
        Err(EddyError::TooManySteps { .. })
    ));
}
