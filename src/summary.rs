// src/summary.rs
//
// Reduction of one completed run into a ResultBundle, plus the closed-form
// skin-depth model the simulation is compared against:
//
//   δ     = sqrt(2 / (ω μ σ))
//   φ_lag = d / δ                       at depth d = lx/4
//   B(x)  = B0 exp(-x/δ)                decay envelope
//   B(t)  = B0 e^{-d/δ} sin(ω t - d/δ)  interior waveform at depth d

use serde::Serialize;
use std::f64::consts::PI;

use crate::current::{CurrentDensity, LossAccumulator};
use crate::diffusion::DiffusionSolver;
use crate::error::{EddyError, Result};
use crate::material::MaterialSpec;
use crate::params::SimulationConfig;
use crate::scalar_field::ScalarField2D;
use crate::snapshot::PhaseSnapshotSampler;

/// Reporting unit for current density: MA/m².
pub const CURRENT_DENSITY_UNIT: f64 = 1e6;

/// Analytic skin depth δ = sqrt(2/(ωμσ)) in metres.
pub fn skin_depth(omega: f64, mu: f64, sigma: f64) -> f64 {
    (2.0 / (omega * mu * sigma)).sqrt()
}

/// Half peak-to-peak of each x position over the recorded steps, in mT.
///
/// `history` is step-major with `nx` values per step.
pub fn centreline_amplitude_mt(history: &[f64], nx: usize) -> Vec<f64> {
    let mut lo = vec![f64::INFINITY; nx];
    let mut hi = vec![f64::NEG_INFINITY; nx];
    for row in history.chunks_exact(nx) {
        for (i, &b) in row.iter().enumerate() {
            lo[i] = lo[i].min(b);
            hi[i] = hi[i].max(b);
        }
    }
    lo.iter()
        .zip(&hi)
        .map(|(&l, &h)| if l.is_finite() { (h - l) / 2.0 * 1000.0 } else { 0.0 })
        .collect()
}

/// Immutable per-material result of one simulated period.
#[derive(Debug, Clone)]
pub struct ResultBundle {
    pub conductivity: f64,
    pub relative_permeability: f64,
    pub dt: f64,
    pub n_steps: usize,

    /// Analytic skin depth (m).
    pub skin_depth: f64,
    /// Phase lag at lx/4 (rad).
    pub phase_lag_rad: f64,
    /// Same lag as a delay (ms).
    pub lag_ms: f64,

    pub snapshot_step: usize,
    pub snapshot_phase: f64,
    /// (Jx, Jy) at the snapshot (A/m²).
    pub snapshot: CurrentDensity,
    /// |J| at the snapshot (MA/m²).
    pub j_mag: ScalarField2D,
    pub j_max: f64,
    pub j_mean: f64,

    /// Period-averaged Ohmic power density (W/m³).
    pub losses_avg: ScalarField2D,
    pub p_max: f64,
    pub p_mean: f64,
    /// Total dissipated power in the sheet (W).
    pub p_total: f64,

    /// Simulated centreline amplitude per x position (mT).
    pub bz_profile_mt: Vec<f64>,
}

impl ResultBundle {
    pub fn phase_lag_deg(&self) -> f64 {
        self.phase_lag_rad * 180.0 / PI
    }

    /// J_max / J_mean of the snapshot magnitude.
    pub fn peak_to_mean(&self) -> f64 {
        if self.j_mean > 0.0 {
            self.j_max / self.j_mean
        } else {
            f64::NAN
        }
    }

    /// Amplitude ratio e^{-d/δ} at d = lx/4.
    pub fn attenuation(&self, config: &SimulationConfig) -> f64 {
        (-config.probe_depth() / self.skin_depth).exp()
    }

    /// Analytic decay envelope B0 exp(-x/δ) at `config.x_coords()`, in mT.
    pub fn analytic_profile_mt(&self, config: &SimulationConfig) -> Vec<f64> {
        config
            .x_coords()
            .iter()
            .map(|x| config.b0 * (-x / self.skin_depth).exp() * 1000.0)
            .collect()
    }

    /// Analytic interior field at d = lx/4 and time `t`, in T.
    pub fn analytic_interior_field(&self, config: &SimulationConfig, t: f64) -> f64 {
        let k = config.probe_depth() / self.skin_depth;
        config.b0 * (-k).exp() * (config.omega() * t - k).sin()
    }

    /// Total power recomputed from the averaged loss field.
    pub fn total_power_from_losses(&self, config: &SimulationConfig) -> f64 {
        self.losses_avg.mean() * config.lx * config.ly * config.thickness
    }

    pub fn summary(&self, name: &str) -> ResultSummary {
        ResultSummary {
            name: name.to_string(),
            conductivity: self.conductivity,
            relative_permeability: self.relative_permeability,
            dt: self.dt,
            n_steps: self.n_steps,
            skin_depth_m: self.skin_depth,
            phase_lag_rad: self.phase_lag_rad,
            phase_lag_deg: self.phase_lag_deg(),
            lag_ms: self.lag_ms,
            snapshot_step: self.snapshot_step,
            j_max_ma_m2: self.j_max,
            j_mean_ma_m2: self.j_mean,
            p_max_w_m3: self.p_max,
            p_mean_w_m3: self.p_mean,
            p_total_w: self.p_total,
        }
    }
}

/// Scalar view of a bundle for `results.json` / `summary.csv`.
#[derive(Debug, Clone, Serialize)]
pub struct ResultSummary {
    pub name: String,
    pub conductivity: f64,
    pub relative_permeability: f64,
    pub dt: f64,
    pub n_steps: usize,
    pub skin_depth_m: f64,
    pub phase_lag_rad: f64,
    pub phase_lag_deg: f64,
    pub lag_ms: f64,
    pub snapshot_step: usize,
    pub j_max_ma_m2: f64,
    pub j_mean_ma_m2: f64,
    pub p_max_w_m3: f64,
    pub p_mean_w_m3: f64,
    pub p_total_w: f64,
}

/// Build the bundle for a finished run from its solver, loss accumulator
/// and snapshot sampler.
///
/// Fails with `MissingSnapshot` if the quadrature window was never hit.
pub fn summarize(
    spec: &MaterialSpec,
    config: &SimulationConfig,
    solver: &DiffusionSolver,
    losses: &LossAccumulator,
    sampler: PhaseSnapshotSampler,
) -> Result<ResultBundle> {
    let (dt, n_steps) = (solver.dt(), solver.n_steps());
    let window = sampler.window();
    let snap = sampler
        .into_snapshot()
        .ok_or(EddyError::MissingSnapshot { n_steps, window })?;

    let omega = config.omega();
    let mu = spec.permeability(config.mu0);
    let delta = skin_depth(omega, mu, spec.conductivity());
    let phase_lag_rad = config.probe_depth() / delta;
    let lag_ms = phase_lag_rad / omega * 1000.0;

    let j_mag = snap.current.magnitude(CURRENT_DENSITY_UNIT);
    let losses_avg = losses.average_power(config.period());
    let p_mean = losses_avg.mean();
    let p_total = p_mean * config.lx * config.ly * config.thickness;

    Ok(ResultBundle {
        conductivity: spec.conductivity(),
        relative_permeability: spec.relative_permeability(),
        dt,
        n_steps,
        skin_depth: delta,
        phase_lag_rad,
        lag_ms,
        snapshot_step: snap.step_index,
        snapshot_phase: snap.phase,
        j_max: j_mag.max(),
        j_mean: j_mag.mean(),
        j_mag,
        snapshot: snap.current,
        p_max: losses_avg.max(),
        p_mean,
        p_total,
        losses_avg,
        bz_profile_mt: centreline_amplitude_mt(solver.history(), config.nx),
    })
}
