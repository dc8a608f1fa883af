// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EddyError {
    #[error("invalid material: {0}")]
    InvalidMaterial(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("no current-density snapshot captured near quadrature ({n_steps} steps, window {window:.3e} rad)")]
    MissingSnapshot { n_steps: usize, window: f64 },

    #[error("one period needs {n_steps} steps of {nx} centreline samples, above the limit of {limit} samples")]
    TooManySteps {
        n_steps: usize,
        nx: usize,
        limit: usize,
    },

    #[error("simulation diverged at step {step} (non-finite Bz)")]
    DivergedSimulation { step: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EddyError>;
