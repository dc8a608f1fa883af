use serde::Serialize;
use serde_json;
use std::fs::File;
use std::path::Path;

use crate::material::CatalogEntry;
use crate::params::SimulationConfig;
use crate::summary::ResultSummary;

#[derive(Serialize)]
pub struct RunConfig {
    pub geometry: GeometryConfig,
    pub forcing: ForcingConfig,
    pub numerics: NumericsConfig,
    pub materials: Vec<MaterialConfig>,
    pub run: RunInfo,
}

#[derive(Serialize)]
pub struct GeometryConfig {
    pub nx: usize,
    pub ny: usize,
    pub lx: f64,
    pub ly: f64,
    pub dx: f64,
    pub dy: f64,
    pub thickness: f64,
}

#[derive(Serialize)]
pub struct ForcingConfig {
    pub frequency: f64,
    pub omega: f64,
    pub b0: f64,
}

#[derive(Serialize)]
pub struct NumericsConfig {
    pub integrator: String,
    /// dt = stability_factor * mu * sigma * min(dx, dy)^2, so it differs per material.
    pub stability_factor: f64,
    pub stencil: String,
    pub mu0: f64,
}

#[derive(Serialize)]
pub struct MaterialConfig {
    pub name: String,
    pub conductivity: f64,
    pub relative_permeability: f64,
}

#[derive(Serialize)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,
    pub timestamp_unix_ms: Option<u128>,
}

impl RunConfig {
    pub fn new(
        sim: &SimulationConfig,
        catalog: &[CatalogEntry],
        run_id: &str,
        timestamp_unix_ms: Option<u128>,
    ) -> Self {
        let grid = sim.grid();
        Self {
            geometry: GeometryConfig {
                nx: sim.nx,
                ny: sim.ny,
                lx: sim.lx,
                ly: sim.ly,
                dx: grid.dx,
                dy: grid.dy,
                thickness: sim.thickness,
            },
            forcing: ForcingConfig {
                frequency: sim.frequency,
                omega: sim.omega(),
                b0: sim.b0,
            },
            numerics: NumericsConfig {
                integrator: "explicit-euler".to_string(),
                stability_factor: crate::params::STABILITY_FACTOR,
                stencil: sim.stencil.as_str().to_string(),
                mu0: sim.mu0,
            },
            materials: catalog
                .iter()
                .map(|e| MaterialConfig {
                    name: e.name.clone(),
                    conductivity: e.spec.conductivity(),
                    relative_permeability: e.spec.relative_permeability(),
                })
                .collect(),
            run: RunInfo {
                binary: "eddy-sim".to_string(),
                run_id: run_id.to_string(),
                timestamp_unix_ms,
            },
        }
    }

    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Write `results.json` with one scalar summary per successful material.
pub fn write_results_json(out_dir: &Path, summaries: &[ResultSummary]) -> std::io::Result<()> {
    let file = File::create(out_dir.join("results.json"))?;
    serde_json::to_writer_pretty(file, summaries)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::reference_catalog;

    #[test]
    fn run_config_serialises_sections() {
        let sim = SimulationConfig::default();
        let cfg = RunConfig::new(&sim, &reference_catalog(), "test_run", None);
        let v = serde_json::to_value(&cfg).unwrap();
        assert_eq!(v["geometry"]["nx"], 100);
        assert_eq!(v["forcing"]["frequency"], 60.0);
        assert_eq!(v["numerics"]["stencil"], "wraparound");
        assert_eq!(v["materials"][2]["name"], "Iron");
        assert_eq!(v["run"]["run_id"], "test_run");
    }
}
