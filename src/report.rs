// src/report.rs
//
// Console comparison table and CSV outputs for a batch of material runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::params::SimulationConfig;
use crate::simulate::MaterialRun;
use crate::summary::ResultBundle;

const LABEL_WIDTH: usize = 28;
const VALUE_WIDTH: usize = 10;

#[derive(Clone, Copy)]
enum Fmt {
    Sci(usize),
    Fixed(usize),
}

impl Fmt {
    fn apply(self, v: f64) -> String {
        match self {
            Fmt::Sci(p) => format!("{:.*e}", p, v),
            Fmt::Fixed(p) => format!("{:.*}", p, v),
        }
    }
}

type Row = (&'static str, fn(&ResultBundle) -> f64, Fmt);

fn rows() -> [Row; 11] {
    [
        ("Conductivity [S/m]", |r| r.conductivity, Fmt::Sci(2)),
        ("Permeability (μr)", |r| r.relative_permeability, Fmt::Fixed(0)),
        ("Skin depth δ [mm]", |r| r.skin_depth * 1000.0, Fmt::Fixed(2)),
        ("Phase lag [ms]", |r| r.lag_ms, Fmt::Fixed(3)),
        ("Phase lag [°]", |r| r.phase_lag_deg(), Fmt::Fixed(1)),
        ("|J| max [kA/m²]", |r| r.j_max * 1e3, Fmt::Fixed(2)),
        ("|J| mean [kA/m²]", |r| r.j_mean * 1e3, Fmt::Fixed(2)),
        ("Peak/mean ratio", |r| r.peak_to_mean(), Fmt::Fixed(2)),
        ("P max [kW/m³]", |r| r.p_max * 1e-3, Fmt::Fixed(4)),
        ("P mean [kW/m³]", |r| r.p_mean * 1e-3, Fmt::Fixed(4)),
        ("P total [mW]", |r| r.p_total * 1e3, Fmt::Fixed(4)),
    ]
}

fn pad_left(s: &str, width: usize) -> String {
    let n = s.chars().count();
    if n >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - n), s)
    }
}

fn pad_right(s: &str, width: usize) -> String {
    let n = s.chars().count();
    if n >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - n))
    }
}

/// Fixed-column comparison table, one column per material.
pub fn comparison_table(runs: &[MaterialRun], config: &SimulationConfig) -> String {
    let rule_len = LABEL_WIDTH + 2 + (VALUE_WIDTH + 1) * runs.len();
    let mut out = String::new();

    out.push_str(&"=".repeat(rule_len));
    out.push('\n');
    out.push_str(&format!(
        "  MATERIAL COMPARISON: EDDY CURRENTS ({:.0} Hz, B0 = {:.0} mT)\n",
        config.frequency,
        config.b0 * 1000.0
    ));
    out.push_str(&"=".repeat(rule_len));
    out.push('\n');

    let mut header = format!("  {}", pad_right("Quantity", LABEL_WIDTH));
    for run in runs {
        header.push(' ');
        header.push_str(&pad_left(&run.name, VALUE_WIDTH));
    }
    out.push_str(&header);
    out.push('\n');
    out.push_str(&format!("  {}\n", "-".repeat(rule_len - 2)));

    for (label, value, fmt) in rows() {
        let mut line = format!("  {}", pad_right(label, LABEL_WIDTH));
        for run in runs {
            let cell = match &run.result {
                Ok(r) => fmt.apply(value(r)),
                Err(_) => "n/a".to_string(),
            };
            line.push(' ');
            line.push_str(&pad_left(&cell, VALUE_WIDTH));
        }
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str(&"=".repeat(rule_len));
    out.push('\n');

    for run in runs {
        if let Err(e) = &run.result {
            out.push_str(&format!("  {}: {}\n", run.name, e));
        }
    }
    out
}

/// `summary.csv`: one row of scalars per successful material.
pub fn write_summary_csv(path: &Path, runs: &[MaterialRun]) -> std::io::Result<()> {
    let mut w = BufWriter::new(File::create(path)?);
    writeln!(
        w,
        "name,sigma,mu_r,n_steps,dt,delta_m,lag_ms,phase_lag_deg,J_max_MA_m2,J_mean_MA_m2,P_max_W_m3,P_mean_W_m3,P_total_W"
    )?;
    for run in runs {
        let Ok(r) = &run.result else { continue };
        writeln!(
            w,
            "{},{:.16e},{:.16e},{},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e},{:.16e}",
            run.name,
            r.conductivity,
            r.relative_permeability,
            r.n_steps,
            r.dt,
            r.skin_depth,
            r.lag_ms,
            r.phase_lag_deg(),
            r.j_max,
            r.j_mean,
            r.p_max,
            r.p_mean,
            r.p_total,
        )?;
    }
    w.flush()
}

/// `profiles.csv`: x plus simulated and analytic centreline amplitude (mT)
/// for each successful material.
pub fn write_profiles_csv(
    path: &Path,
    runs: &[MaterialRun],
    config: &SimulationConfig,
) -> std::io::Result<()> {
    let ok: Vec<(&str, &ResultBundle, Vec<f64>)> = runs
        .iter()
        .filter_map(|run| {
            run.result
                .as_ref()
                .ok()
                .map(|r| (run.name.as_str(), r, r.analytic_profile_mt(config)))
        })
        .collect();

    let mut w = BufWriter::new(File::create(path)?);
    let mut header = String::from("x_m");
    for (name, _, _) in &ok {
        header.push_str(&format!(",{name}_sim_mT,{name}_analytic_mT"));
    }
    writeln!(w, "{header}")?;

    for (i, x) in config.x_coords().iter().enumerate() {
        write!(w, "{:.16e}", x)?;
        for (_, r, analytic) in &ok {
            write!(w, ",{:.16e},{:.16e}", r.bz_profile_mt[i], analytic[i])?;
        }
        writeln!(w)?;
    }
    w.flush()
}
