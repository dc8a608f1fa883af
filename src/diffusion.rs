// src/diffusion.rs
//
// Explicit (forward Euler) integration of the 2D magnetic diffusion equation
//
//     ∂Bz/∂t = α ∇²Bz + B0 ω cos(ω t),      α = 1/(μσ)
//
// over one forcing period, with the four borders clamped to the external field
// B0 sin(ω t) after every update (Dirichlet forcing).
//
// Step size: dt = 0.2 μσ min(dx,dy)², i.e. a diffusion number α dt/dx² of 0.2
// per axis, inside the 0.25-per-axis limit of the 5-point stencil.

use log::{debug, warn};

use crate::error::{EddyError, Result};
use crate::grid::Grid2D;
use crate::material::MaterialSpec;
use crate::params::{
    BoundaryStencil, SimulationConfig, MAX_HISTORY_SAMPLES, STABILITY_FACTOR,
};
use crate::scalar_field::ScalarField2D;

/// Time state of one step, derived from the step index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeStepState {
    pub step_index: usize,
    /// Elapsed time at the start of the step (s).
    pub t: f64,
    /// Forcing phase ω·t at the start of the step (rad).
    pub phase: f64,
}

/// Explicit step size for a material on a grid.
pub fn stable_dt(spec: &MaterialSpec, grid: &Grid2D, mu0: f64) -> f64 {
    let h = grid.min_spacing();
    STABILITY_FACTOR * spec.permeability(mu0) * spec.conductivity() * h * h
}

/// Number of whole steps of size `dt` inside one period. Saturates at
/// `usize::MAX` when `dt` is vanishingly small.
pub fn steps_per_period(period: f64, dt: f64) -> usize {
    (period / dt).floor() as usize
}

/// 5-point Laplacian of `f` into `out`.
///
/// `Wraparound` indexes neighbours modulo the grid size in both axes;
/// `Clamped` writes zero on the border cells and only reads inward.
pub fn laplacian_5pt(f: &ScalarField2D, out: &mut ScalarField2D, stencil: BoundaryStencil) {
    let grid = f.grid;
    let (nx, ny) = (grid.nx, grid.ny);
    let inv_dx2 = 1.0 / (grid.dx * grid.dx);
    let inv_dy2 = 1.0 / (grid.dy * grid.dy);

    for j in 0..ny {
        let (jm, jp) = Grid2D::wrap(j, ny);
        for i in 0..nx {
            let idx = grid.idx(i, j);
            if stencil == BoundaryStencil::Clamped && grid.is_border(i, j) {
                out.data[idx] = 0.0;
                continue;
            }
            let (im, ip) = Grid2D::wrap(i, nx);
            let c = f.data[idx];
            let d2x = (f.data[grid.idx(ip, j)] + f.data[grid.idx(im, j)] - 2.0 * c) * inv_dx2;
            let d2y = (f.data[grid.idx(i, jp)] + f.data[grid.idx(i, jm)] - 2.0 * c) * inv_dy2;
            out.data[idx] = d2x + d2y;
        }
    }
}

/// Per-material diffusion run: owns Bz, its Laplacian scratch and the
/// centreline history.
#[derive(Debug)]
pub struct DiffusionSolver {
    grid: Grid2D,
    bz: ScalarField2D,
    lap: ScalarField2D,
    stencil: BoundaryStencil,
    alpha: f64,
    omega: f64,
    b0: f64,
    dt: f64,
    n_steps: usize,
    step_index: usize,
    /// Bz[:, ny/2] after each step, step-major (`step * nx + i`).
    history: Vec<f64>,
}

impl DiffusionSolver {
    pub fn new(spec: &MaterialSpec, config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = config.grid();
        let dt = stable_dt(spec, &grid, config.mu0);
        if !(dt.is_finite() && dt > 0.0) {
            return Err(EddyError::InvalidMaterial(format!(
                "step size is not a positive finite number (dt = {dt})"
            )));
        }
        let n_steps = steps_per_period(config.period(), dt);
        let too_many = EddyError::TooManySteps {
            n_steps,
            nx: grid.nx,
            limit: MAX_HISTORY_SAMPLES,
        };
        let samples = match grid.nx.checked_mul(n_steps) {
            Some(n) if n <= MAX_HISTORY_SAMPLES => n,
            _ => {
                warn!("{too_many}");
                return Err(too_many);
            }
        };
        let mut history = Vec::new();
        if history.try_reserve_exact(samples).is_err() {
            warn!("could not allocate {samples} history samples");
            return Err(too_many);
        }
        let alpha = spec.diffusivity(config.mu0);

        debug!(
            "diffusion solver: alpha={:.4e} m^2/s dt={:.4e} s n_steps={} diffusion_number={:.3}",
            alpha,
            dt,
            n_steps,
            alpha * dt / (grid.min_spacing() * grid.min_spacing())
        );

        Ok(Self {
            grid,
            bz: ScalarField2D::new(grid),
            lap: ScalarField2D::new(grid),
            stencil: config.stencil,
            alpha,
            omega: config.omega(),
            b0: config.b0,
            dt,
            n_steps,
            step_index: 0,
            history,
        })
    }

    pub fn grid(&self) -> Grid2D {
        self.grid
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Steps taken so far.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Elapsed time t = step_index · dt.
    pub fn time(&self) -> f64 {
        self.step_index as f64 * self.dt
    }

    /// Forcing phase ω·t at the current time.
    pub fn phase(&self) -> f64 {
        self.omega * self.time()
    }

    pub fn is_finished(&self) -> bool {
        self.step_index >= self.n_steps
    }

    /// Current field.
    pub fn bz(&self) -> &ScalarField2D {
        &self.bz
    }

    /// External (boundary) field at `phase`.
    pub fn external_field(&self, phase: f64) -> f64 {
        self.b0 * phase.sin()
    }

    /// Centreline history recorded so far, step-major (`step * nx + i`).
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Advance Bz by one step and return the time state at its start.
    ///
    /// Fails with `DivergedSimulation` if any cell becomes non-finite. Calling
    /// past `n_steps` is a no-op returning `None`.
    pub fn step(&mut self) -> Result<Option<TimeStepState>> {
        if self.is_finished() {
            return Ok(None);
        }
        let state = TimeStepState {
            step_index: self.step_index,
            t: self.time(),
            phase: self.phase(),
        };

        laplacian_5pt(&self.bz, &mut self.lap, self.stencil);

        let source = self.b0 * self.omega * state.phase.cos();
        let (dt, alpha) = (self.dt, self.alpha);
        for (b, l) in self.bz.data.iter_mut().zip(self.lap.data.iter()) {
            *b += dt * (alpha * l + source);
        }

        self.bz.fill_border(self.external_field(state.phase));

        if !self.bz.all_finite() {
            warn!(
                "non-finite Bz at step {} (t = {:.4e} s)",
                state.step_index, state.t
            );
            return Err(EddyError::DivergedSimulation {
                step: state.step_index,
            });
        }

        let start = self.bz.idx(0, self.grid.mid_row());
        self.history
            .extend_from_slice(&self.bz.data[start..start + self.grid.nx]);

        self.step_index += 1;
        Ok(Some(state))
    }
}
