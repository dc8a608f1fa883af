// src/params.rs

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{EddyError, Result};
use crate::grid::{linspace, Grid2D};

/// Vacuum permeability μ0 (H/m).
pub const MU0: f64 = 4.0 * PI * 1e-7;

/// Diffusion-number margin for the explicit 5-point scheme:
/// dt = STABILITY_FACTOR · μσ · min(dx, dy)².
pub const STABILITY_FACTOR: f64 = 0.2;

/// Target forcing phase for the current-density snapshot (quadrature).
pub const SNAPSHOT_PHASE: f64 = PI / 2.0;

/// Upper bound on centreline history samples (nx · n_steps) per material,
/// 1 GiB of f64. The reference sheet needs under 10^5.
pub const MAX_HISTORY_SAMPLES: usize = 1 << 27;

/// Laplacian treatment of the edge cells.
///
/// Edge cells are overwritten by the Dirichlet forcing after every update, so
/// both variants yield the same field; `Clamped` never reads across the domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryStencil {
    /// Neighbour indices wrap around (last row/column adjacent to the first).
    #[default]
    Wraparound,
    /// Edge cells get a zero Laplacian.
    Clamped,
}

impl BoundaryStencil {
    pub fn from_arg(s: &str) -> Option<Self> {
        match s {
            "wrap" | "wraparound" | "periodic" => Some(Self::Wraparound),
            "clamped" | "clamp" | "dirichlet" => Some(Self::Clamped),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wraparound => "wraparound",
            Self::Clamped => "clamped",
        }
    }
}

/// Shared numerics for every material run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Sheet extent along x (m).
    pub lx: f64,
    /// Sheet extent along y (m).
    pub ly: f64,
    pub nx: usize,
    pub ny: usize,
    /// Forcing frequency (Hz).
    pub frequency: f64,
    /// Forcing amplitude B0 (T).
    pub b0: f64,
    /// Sheet thickness used for total power (m).
    pub thickness: f64,
    /// Vacuum permeability (H/m).
    pub mu0: f64,
    pub stencil: BoundaryStencil,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            lx: 0.15,
            ly: 0.15,
            nx: 100,
            ny: 100,
            frequency: 60.0,
            b0: 0.1,
            thickness: 0.01,
            mu0: MU0,
            stencil: BoundaryStencil::Wraparound,
        }
    }
}

impl SimulationConfig {
    /// Angular frequency ω = 2πf.
    pub fn omega(&self) -> f64 {
        2.0 * PI * self.frequency
    }

    /// Forcing period T = 1/f.
    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }

    pub fn grid(&self) -> Grid2D {
        Grid2D::from_extent(self.nx, self.ny, self.lx, self.ly)
    }

    /// Plot/profile x coordinates: linspace(0, lx, nx).
    pub fn x_coords(&self) -> Vec<f64> {
        linspace(self.lx, self.nx)
    }

    /// Depth at which phase lag and attenuation are reported (lx/4).
    pub fn probe_depth(&self) -> f64 {
        self.lx / 4.0
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("lx", self.lx),
            ("ly", self.ly),
            ("frequency", self.frequency),
            ("b0", self.b0),
            ("thickness", self.thickness),
            ("mu0", self.mu0),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(EddyError::InvalidConfig(format!(
                    "{name} must be finite and > 0, got {v}"
                )));
            }
        }
        // The border overwrite needs at least one interior cell per axis.
        if self.nx < 3 || self.ny < 3 {
            return Err(EddyError::InvalidConfig(format!(
                "grid must be at least 3x3, got {}x{}",
                self.nx, self.ny
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_reference_sheet() {
        let cfg = SimulationConfig::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.omega() - 376.991_118_430_775_2).abs() < 1e-9);
        assert!((cfg.period() - 1.0 / 60.0).abs() < 1e-15);
        assert!((cfg.probe_depth() - 0.0375).abs() < 1e-15);
        assert_eq!(cfg.x_coords().len(), 100);
    }

    #[test]
    fn rejects_degenerate_grids_and_values() {
        let mut cfg = SimulationConfig::default();
        cfg.nx = 2;
        assert!(matches!(cfg.validate(), Err(EddyError::InvalidConfig(_))));

        let mut cfg = SimulationConfig::default();
        cfg.frequency = 0.0;
        assert!(matches!(cfg.validate(), Err(EddyError::InvalidConfig(_))));

        let mut cfg = SimulationConfig::default();
        cfg.b0 = f64::NAN;
        assert!(matches!(cfg.validate(), Err(EddyError::InvalidConfig(_))));
    }

    #[test]
    fn stencil_args() {
        assert_eq!(BoundaryStencil::from_arg("wrap"), Some(BoundaryStencil::Wraparound));
        assert_eq!(BoundaryStencil::from_arg("clamped"), Some(BoundaryStencil::Clamped));
        assert_eq!(BoundaryStencil::from_arg("bogus"), None);
        assert_eq!(BoundaryStencil::default().as_str(), "wraparound");
    }
}
