// src/snapshot.rs

use log::debug;
use std::f64::consts::TAU;

use crate::current::CurrentDensity;
use crate::diffusion::TimeStepState;

/// Current density captured near the target phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseSnapshot {
    pub step_index: usize,
    pub phase: f64,
    pub current: CurrentDensity,
}

/// Captures one current-density field at the first step whose phase lies
/// within `2·ω·dt` of the target (π/2 for quadrature).
#[derive(Debug, Clone)]
pub struct PhaseSnapshotSampler {
    target: f64,
    window: f64,
    snapshot: Option<PhaseSnapshot>,
}

impl PhaseSnapshotSampler {
    pub fn new(target: f64, omega: f64, dt: f64) -> Self {
        Self {
            target,
            window: 2.0 * omega * dt,
            snapshot: None,
        }
    }

    /// Half-width of the phase window (rad).
    pub fn window(&self) -> f64 {
        self.window
    }

    /// True if `phase` (wrapped into [0, 2π)) is inside the window.
    pub fn in_window(&self, phase: f64) -> bool {
        (phase.rem_euclid(TAU) - self.target).abs() < self.window
    }

    /// Offer this step's current density; returns true if it was captured.
    /// Once captured the snapshot is never replaced.
    pub fn observe(&mut self, state: &TimeStepState, current: &CurrentDensity) -> bool {
        if self.snapshot.is_some() || !self.in_window(state.phase) {
            return false;
        }
        debug!(
            "snapshot captured at step {} (phase {:.4} rad)",
            state.step_index, state.phase
        );
        self.snapshot = Some(PhaseSnapshot {
            step_index: state.step_index,
            phase: state.phase,
            current: current.clone(),
        });
        true
    }

    pub fn is_captured(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&PhaseSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn into_snapshot(self) -> Option<PhaseSnapshot> {
        self.snapshot
    }
}
