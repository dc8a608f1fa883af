// src/current.rs
//
// Quantities derived from Bz each step:
//   J = (1/μ) ∇×(Bz ẑ)  ->  Jx = -(∂Bz/∂y)/μ,  Jy = (∂Bz/∂x)/μ
//   p = |J|²/σ          (instantaneous Ohmic power density, W/m³)

use crate::grid::Grid2D;
use crate::scalar_field::ScalarField2D;

/// In-plane eddy-current density (A/m²).
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentDensity {
    pub jx: ScalarField2D,
    pub jy: ScalarField2D,
}

impl CurrentDensity {
    pub fn new(grid: Grid2D) -> Self {
        Self {
            jx: ScalarField2D::new(grid),
            jy: ScalarField2D::new(grid),
        }
    }

    pub fn grid(&self) -> Grid2D {
        self.jx.grid
    }

    /// |J| per cell, divided by `unit` (e.g. 1e6 for MA/m²).
    pub fn magnitude(&self, unit: f64) -> ScalarField2D {
        let data = self
            .jx
            .data
            .iter()
            .zip(&self.jy.data)
            .map(|(x, y)| (x * x + y * y).sqrt() / unit)
            .collect();
        ScalarField2D {
            grid: self.grid(),
            data,
        }
    }
}

/// ∂f/∂x: centred in the interior, first-order one-sided at i = 0 and i = nx-1.
pub fn gradient_x(f: &ScalarField2D, out: &mut ScalarField2D) {
    let grid = f.grid;
    let nx = grid.nx;
    let h = grid.dx;
    for j in 0..grid.ny {
        for i in 0..nx {
            let d = if nx < 2 {
                0.0
            } else if i == 0 {
                (f.get(1, j) - f.get(0, j)) / h
            } else if i == nx - 1 {
                (f.get(nx - 1, j) - f.get(nx - 2, j)) / h
            } else {
                (f.get(i + 1, j) - f.get(i - 1, j)) / (2.0 * h)
            };
            out.data[grid.idx(i, j)] = d;
        }
    }
}

/// ∂f/∂y, same edge treatment as [`gradient_x`].
pub fn gradient_y(f: &ScalarField2D, out: &mut ScalarField2D) {
    let grid = f.grid;
    let ny = grid.ny;
    let h = grid.dy;
    for j in 0..ny {
        for i in 0..grid.nx {
            let d = if ny < 2 {
                0.0
            } else if j == 0 {
                (f.get(i, 1) - f.get(i, 0)) / h
            } else if j == ny - 1 {
                (f.get(i, ny - 1) - f.get(i, ny - 2)) / h
            } else {
                (f.get(i, j + 1) - f.get(i, j - 1)) / (2.0 * h)
            };
            out.data[grid.idx(i, j)] = d;
        }
    }
}

/// Current density from Bz for permeability `mu` (H/m), written into `j`.
pub fn compute_current_density(bz: &ScalarField2D, mu: f64, j: &mut CurrentDensity) {
    gradient_y(bz, &mut j.jx);
    gradient_x(bz, &mut j.jy);
    let inv_mu = 1.0 / mu;
    for v in &mut j.jx.data {
        *v = -*v * inv_mu;
    }
    for v in &mut j.jy.data {
        *v *= inv_mu;
    }
}

/// Cumulative Ohmic loss energy density (J/m³) over one run.
#[derive(Debug, Clone)]
pub struct LossAccumulator {
    energy: ScalarField2D,
    elapsed: f64,
}

impl LossAccumulator {
    pub fn new(grid: Grid2D) -> Self {
        Self {
            energy: ScalarField2D::new(grid),
            elapsed: 0.0,
        }
    }

    /// Add |J|²·dt/σ per cell. Every increment is ≥ 0.
    pub fn accumulate(&mut self, j: &CurrentDensity, sigma: f64, dt: f64) {
        let k = dt / sigma;
        for ((e, x), y) in self
            .energy
            .data
            .iter_mut()
            .zip(&j.jx.data)
            .zip(&j.jy.data)
        {
            *e += (x * x + y * y) * k;
        }
        self.elapsed += dt;
    }

    /// Accumulated energy density so far.
    pub fn energy(&self) -> &ScalarField2D {
        &self.energy
    }

    /// Integrated time so far (s).
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Time-averaged power density (W/m³) over `period`.
    pub fn average_power(&self, period: f64) -> ScalarField2D {
        self.energy.map(|e| e / period)
    }
}
