// src/material.rs
//
// Linear, isotropic conductor description plus the material catalog.
// Catalog files are JSON arrays of
//   { "name": "Copper", "conductivity": 5.8e7, "relative_permeability": 1.0, "colour": "#e67e22" }

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{EddyError, Result};

/// Conductivity and relative permeability of one material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialSpec {
    conductivity: f64,
    relative_permeability: f64,
}

impl MaterialSpec {
    /// Fails with `InvalidMaterial` unless σ > 0 and μr > 0 (both finite).
    pub fn new(conductivity: f64, relative_permeability: f64) -> Result<Self> {
        if !(conductivity.is_finite() && conductivity > 0.0) {
            return Err(EddyError::InvalidMaterial(format!(
                "conductivity must be finite and > 0, got {conductivity}"
            )));
        }
        if !(relative_permeability.is_finite() && relative_permeability > 0.0) {
            return Err(EddyError::InvalidMaterial(format!(
                "relative permeability must be finite and > 0, got {relative_permeability}"
            )));
        }
        Ok(Self {
            conductivity,
            relative_permeability,
        })
    }

    /// σ in S/m.
    pub fn conductivity(&self) -> f64 {
        self.conductivity
    }

    /// μr (dimensionless).
    pub fn relative_permeability(&self) -> f64 {
        self.relative_permeability
    }

    /// μ = μ0·μr in H/m.
    pub fn permeability(&self, mu0: f64) -> f64 {
        mu0 * self.relative_permeability
    }

    /// Magnetic diffusivity α = 1/(μσ) in m²/s.
    pub fn diffusivity(&self, mu0: f64) -> f64 {
        1.0 / (self.permeability(mu0) * self.conductivity)
    }
}

/// Named catalog entry with a plot colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub colour: String,
    pub spec: MaterialSpec,
}

#[derive(Deserialize)]
struct RawEntry {
    name: String,
    conductivity: f64,
    relative_permeability: f64,
    #[serde(default)]
    colour: Option<String>,
}

const FALLBACK_COLOURS: [&str; 6] = [
    "#3498db", "#e67e22", "#e74c3c", "#2ecc71", "#9b59b6", "#34495e",
];

/// Aluminium, copper and iron, in that order.
pub fn reference_catalog() -> Vec<CatalogEntry> {
    let table = [
        ("Aluminium", 3.5e7, 1.0, "#3498db"),
        ("Copper", 5.8e7, 1.0, "#e67e22"),
        ("Iron", 1.0e7, 1000.0, "#e74c3c"),
    ];
    table
        .iter()
        .map(|&(name, sigma, mu_r, colour)| CatalogEntry {
            name: name.to_string(),
            colour: colour.to_string(),
            // Constants above are all positive.
            spec: MaterialSpec {
                conductivity: sigma,
                relative_permeability: mu_r,
            },
        })
        .collect()
}

/// Parse a JSON catalog; every entry is validated through `MaterialSpec::new`.
pub fn parse_catalog(json: &str) -> Result<Vec<CatalogEntry>> {
    let raw: Vec<RawEntry> = serde_json::from_str(json)?;
    entries_from_raw(raw)
}

pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>> {
    let reader = BufReader::new(File::open(path)?);
    let raw: Vec<RawEntry> = serde_json::from_reader(reader)?;
    entries_from_raw(raw)
}

fn entries_from_raw(raw: Vec<RawEntry>) -> Result<Vec<CatalogEntry>> {
    if raw.is_empty() {
        return Err(EddyError::InvalidConfig("material catalog is empty".into()));
    }
    raw.into_iter()
        .enumerate()
        .map(|(k, r)| {
            let spec = MaterialSpec::new(r.conductivity, r.relative_permeability).map_err(
                |e| EddyError::InvalidMaterial(format!("{}: {}", r.name, e)),
            )?;
            let colour = r
                .colour
                .unwrap_or_else(|| FALLBACK_COLOURS[k % FALLBACK_COLOURS.len()].to_string());
            Ok(CatalogEntry {
                name: r.name,
                colour,
                spec,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MU0;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_non_positive_properties() {
        assert!(matches!(
            MaterialSpec::new(0.0, 1.0),
            Err(EddyError::InvalidMaterial(_))
        ));
        assert!(matches!(
            MaterialSpec::new(-1.0, 1.0),
            Err(EddyError::InvalidMaterial(_))
        ));
        assert!(matches!(
            MaterialSpec::new(5.8e7, 0.0),
            Err(EddyError::InvalidMaterial(_))
        ));
        assert!(matches!(
            MaterialSpec::new(f64::INFINITY, 1.0),
            Err(EddyError::InvalidMaterial(_))
        ));
        assert!(MaterialSpec::new(5.8e7, 1.0).is_ok());
    }

    #[test]
    fn diffusivity_of_copper() {
        let cu = MaterialSpec::new(5.8e7, 1.0).unwrap();
        assert_relative_eq!(cu.permeability(MU0), MU0);
        // α = 1/(μ0 σ) ≈ 0.01372 m²/s
        assert_relative_eq!(cu.diffusivity(MU0), 1.0 / (MU0 * 5.8e7), max_relative = 1e-12);
        assert!((cu.diffusivity(MU0) - 0.013_72).abs() < 1e-5);
    }

    #[test]
    fn reference_catalog_order_and_values() {
        let cat = reference_catalog();
        let names: Vec<&str> = cat.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Aluminium", "Copper", "Iron"]);
        assert_eq!(cat[2].spec.relative_permeability(), 1000.0);
        assert_eq!(cat[1].spec.conductivity(), 5.8e7);
    }

    #[test]
    fn parses_json_catalog_with_default_colour() {
        let json = r#"[
            {"name": "Brass", "conductivity": 1.5e7, "relative_permeability": 1.0},
            {"name": "Steel", "conductivity": 6.0e6, "relative_permeability": 100.0, "colour": "black"}
        ]"#;
        let cat = parse_catalog(json).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat[0].colour, "#3498db");
        assert_eq!(cat[1].colour, "black");
        assert_eq!(cat[1].spec.relative_permeability(), 100.0);
    }

    #[test]
    fn json_catalog_entries_are_validated() {
        let json = r#"[{"name": "Vacuum", "conductivity": 0.0, "relative_permeability": 1.0}]"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(matches!(err, EddyError::InvalidMaterial(ref msg) if msg.starts_with("Vacuum")));

        assert!(matches!(parse_catalog("[]"), Err(EddyError::InvalidConfig(_))));
        assert!(matches!(parse_catalog("{"), Err(EddyError::Json(_))));
    }

    #[test]
    fn loads_catalog_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.json");
        std::fs::write(
            &path,
            r##"[
                {"name": "Brass", "conductivity": 1.5e7, "relative_permeability": 1.0, "colour": "#b5a642"},
                {"name": "Mu-metal", "conductivity": 1.6e6, "relative_permeability": 20000.0}
            ]"##,
        )
        .unwrap();

        let cat = load_catalog(&path).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat[0].name, "Brass");
        assert_eq!(cat[0].colour, "#b5a642");
        assert_eq!(cat[1].spec.relative_permeability(), 20000.0);
        assert_eq!(cat[1].colour, FALLBACK_COLOURS[1]);
    }

    #[test]
    fn missing_or_malformed_catalog_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(matches!(load_catalog(&missing), Err(EddyError::Io(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not a list").unwrap();
        assert!(matches!(load_catalog(&bad), Err(EddyError::Json(_))));
    }
}
