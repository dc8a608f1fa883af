// src/simulate.rs
//
// One material, one forcing period:
//   DiffusionSolver step -> J from Bz -> loss += |J|² dt/σ -> snapshot near π/2
// then summarise. Nothing is shared between materials.

use log::{debug, warn};

use crate::current::{compute_current_density, CurrentDensity, LossAccumulator};
use crate::diffusion::{DiffusionSolver, TimeStepState};
use crate::error::Result;
use crate::material::{CatalogEntry, MaterialSpec};
use crate::params::{SimulationConfig, SNAPSHOT_PHASE};
use crate::scalar_field::ScalarField2D;
use crate::snapshot::PhaseSnapshotSampler;
use crate::summary::{summarize, ResultBundle};

/// Per-step view handed to an observer.
pub struct StepView<'a> {
    pub state: TimeStepState,
    pub bz: &'a ScalarField2D,
    pub current: &'a CurrentDensity,
    pub losses: &'a LossAccumulator,
}

/// Run one material for one period and reduce it to a ResultBundle.
pub fn simulate_material(spec: &MaterialSpec, config: &SimulationConfig) -> Result<ResultBundle> {
    simulate_material_observed(spec, config, |_| {})
}

/// As [`simulate_material`], calling `observe` after every step.
pub fn simulate_material_observed<F>(
    spec: &MaterialSpec,
    config: &SimulationConfig,
    mut observe: F,
) -> Result<ResultBundle>
where
    F: FnMut(&StepView<'_>),
{
    let mut solver = DiffusionSolver::new(spec, config)?;
    let grid = solver.grid();
    let mu = spec.permeability(config.mu0);
    let sigma = spec.conductivity();
    let dt = solver.dt();

    let mut current = CurrentDensity::new(grid);
    let mut losses = LossAccumulator::new(grid);
    let mut sampler = PhaseSnapshotSampler::new(SNAPSHOT_PHASE, config.omega(), dt);

    while let Some(state) = solver.step()? {
        compute_current_density(solver.bz(), mu, &mut current);
        losses.accumulate(&current, sigma, dt);
        sampler.observe(&state, &current);

        observe(&StepView {
            state,
            bz: solver.bz(),
            current: &current,
            losses: &losses,
        });
    }

    summarize(spec, config, &solver, &losses, sampler)
}

/// Outcome for one catalog entry.
#[derive(Debug)]
pub struct MaterialRun {
    pub name: String,
    pub colour: String,
    pub result: Result<ResultBundle>,
}

/// Simulate every catalog entry in order. A failing material does not stop
/// the others.
pub fn run_catalog(catalog: &[CatalogEntry], config: &SimulationConfig) -> Vec<MaterialRun> {
    catalog
        .iter()
        .map(|entry| {
            debug!("simulating {}", entry.name);
            let result = simulate_material(&entry.spec, config);
            if let Err(e) = &result {
                warn!("{}: {}", entry.name, e);
            }
            MaterialRun {
                name: entry.name.clone(),
                colour: entry.colour.clone(),
                result,
            }
        })
        .collect()
}
