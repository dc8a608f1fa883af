// src/main.rs
//
// Batch driver: simulates one forcing period for every material in the
// catalog, prints the comparison table and writes per-run outputs.
//
// Examples:
//
//   cargo run --release
//       -> reference sheet (15 cm, 100x100, 60 Hz, 100 mT), Al / Cu / Fe.
//
//   cargo run --release -- freq=50 b0=0.05 out=runs run=fifty_hz
//       -> same catalog at 50 Hz and 50 mT, into runs/fifty_hz/.
//
//   cargo run --release -- catalog=materials.json stencil=clamped noplots
//       -> custom catalog, Dirichlet-consistent Laplacian, tables/CSV only.
//
// Typical outputs (per run directory):
//   runs/<run_id>/
//     ├── config.json
//     ├── results.json
//     ├── summary.csv
//     ├── profiles.csv
//     ├── current_<material>.png
//     ├── losses_<material>.png
//     ├── attenuation_profile.png
//     └── time_evolution.png

use std::env;
use std::fs::create_dir_all;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use eddy_sim::config::{write_results_json, RunConfig};
use eddy_sim::material::{load_catalog, reference_catalog, CatalogEntry};
use eddy_sim::params::{BoundaryStencil, SimulationConfig};
use eddy_sim::report::{comparison_table, write_profiles_csv, write_summary_csv};
use eddy_sim::simulate::{run_catalog, MaterialRun};
use eddy_sim::summary::ResultSummary;
use eddy_sim::visualisation::{
    save_attenuation_profile_plot, save_field_heatmap, save_time_evolution_plot,
};
use eddy_sim::EddyError;

const USAGE: &str = r##"Usage:
  cargo run -- [nx=N] [ny=N] [lx=VAL] [ly=VAL] [freq=VAL] [b0=VAL] [thickness=VAL]
             [stencil=wrap|clamped] [catalog=FILE.json]
             [out=DIR] [run=RUN_ID] [noplots]

Notes:
  - Each material integrates exactly one period with dt = 0.2*mu*sigma*min(dx,dy)^2,
    so step counts differ between materials.
  - catalog files are JSON arrays of
      {"name": ..., "conductivity": ..., "relative_permeability": ..., "colour": "#rrggbb"}
"##;

fn print_usage() {
    eprint!("{USAGE}");
}

fn sanitize_run_id(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn now_millis() -> Option<u128> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .map(|d| d.as_millis())
}

fn default_run_id(cfg: &SimulationConfig) -> String {
    format!(
        "{}_{:.0}Hz_{}x{}",
        now_millis().unwrap_or(0),
        cfg.frequency,
        cfg.nx,
        cfg.ny
    )
}

fn unique_run_dir(out_root: &str, run_id: &str) -> PathBuf {
    let base = PathBuf::from(out_root);
    let mut dir = base.join(run_id);
    if !dir.exists() {
        return dir;
    }
    for k in 1..1000 {
        let cand = base.join(format!("{}_{}", run_id, k));
        if !cand.exists() {
            dir = cand;
            break;
        }
    }
    dir
}

fn file_stem(name: &str) -> String {
    sanitize_run_id(&name.to_lowercase())
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, v: &str) -> Option<T> {
    match v.parse::<T>() {
        Ok(x) => Some(x),
        Err(_) => {
            eprintln!("Warning: could not parse {key} value '{v}', ignoring");
            None
        }
    }
}

fn save_plots(runs: &[MaterialRun], cfg: &SimulationConfig, run_dir: &Path) {
    for run in runs {
        let Ok(r) = &run.result else { continue };
        let stem = file_stem(&run.name);

        let path = run_dir.join(format!("current_{stem}.png"));
        let title = format!(
            "{}: |J| at step {} [MA/m²], max = {:.4}",
            run.name, r.snapshot_step, r.j_max
        );
        if let Err(e) =
            save_field_heatmap(&r.j_mag, Some(&r.snapshot), &title, &path.to_string_lossy())
        {
            eprintln!("Could not save {}: {e}", path.to_string_lossy());
        }

        let path = run_dir.join(format!("losses_{stem}.png"));
        let losses_kw = r.losses_avg.map(|p| p / 1e3);
        let title = format!(
            "{}: average loss [kW/m³], P total = {:.3} mW",
            run.name,
            r.p_total * 1e3
        );
        if let Err(e) = save_field_heatmap(&losses_kw, None, &title, &path.to_string_lossy()) {
            eprintln!("Could not save {}: {e}", path.to_string_lossy());
        }
    }

    let path = run_dir.join("attenuation_profile.png");
    if let Err(e) = save_attenuation_profile_plot(runs, cfg, &path.to_string_lossy()) {
        eprintln!("Could not save {}: {e}", path.to_string_lossy());
    }
    let path = run_dir.join("time_evolution.png");
    if let Err(e) = save_time_evolution_plot(runs, cfg, &path.to_string_lossy()) {
        eprintln!("Could not save {}: {e}", path.to_string_lossy());
    }
}

fn main() -> Result<(), EddyError> {
    let argv: Vec<String> = env::args().collect();

    let mut cfg = SimulationConfig::default();
    let mut catalog_path: Option<String> = None;
    let mut out_root_override: Option<String> = None;
    let mut run_id_override: Option<String> = None;
    let mut plots = true;

    for arg in argv.iter().skip(1) {
        if arg == "-h" || arg == "--help" || arg == "help" {
            print_usage();
            return Ok(());
        }
        if arg == "noplots" {
            plots = false;
            continue;
        }
        if let Some(v) = arg.strip_prefix("nx=") {
            cfg.nx = parse_or_warn("nx", v).unwrap_or(cfg.nx);
            continue;
        }
        if let Some(v) = arg.strip_prefix("ny=") {
            cfg.ny = parse_or_warn("ny", v).unwrap_or(cfg.ny);
            continue;
        }
        if let Some(v) = arg.strip_prefix("lx=") {
            cfg.lx = parse_or_warn("lx", v).unwrap_or(cfg.lx);
            continue;
        }
        if let Some(v) = arg.strip_prefix("ly=") {
            cfg.ly = parse_or_warn("ly", v).unwrap_or(cfg.ly);
            continue;
        }
        if let Some(v) = arg.strip_prefix("freq=") {
            cfg.frequency = parse_or_warn("freq", v).unwrap_or(cfg.frequency);
            continue;
        }
        if let Some(v) = arg.strip_prefix("b0=") {
            cfg.b0 = parse_or_warn("b0", v).unwrap_or(cfg.b0);
            continue;
        }
        if let Some(v) = arg.strip_prefix("thickness=") {
            cfg.thickness = parse_or_warn("thickness", v).unwrap_or(cfg.thickness);
            continue;
        }
        if let Some(v) = arg.strip_prefix("stencil=") {
            cfg.stencil = BoundaryStencil::from_arg(v.trim()).unwrap_or_else(|| {
                eprintln!("Warning: unknown stencil '{v}', using wraparound");
                BoundaryStencil::Wraparound
            });
            continue;
        }
        if let Some(v) = arg.strip_prefix("catalog=") {
            catalog_path = Some(v.to_string());
            continue;
        }
        if let Some(v) = arg.strip_prefix("out=") {
            out_root_override = Some(v.to_string());
            continue;
        }
        if let Some(v) = arg.strip_prefix("run=") {
            run_id_override = Some(v.to_string());
            continue;
        }

        eprintln!("Warning: ignoring unknown argument '{arg}'");
    }

    cfg.validate()?;

    let catalog: Vec<CatalogEntry> = match &catalog_path {
        Some(p) => load_catalog(Path::new(p))?,
        None => reference_catalog(),
    };

    // -------- output directory setup --------
    let out_root = out_root_override.unwrap_or_else(|| "runs".to_string());
    create_dir_all(&out_root)?;
    let run_id = sanitize_run_id(&run_id_override.unwrap_or_else(|| default_run_id(&cfg)));
    let run_dir = unique_run_dir(&out_root, &run_id);
    create_dir_all(&run_dir)?;

    RunConfig::new(&cfg, &catalog, &run_id, now_millis()).write_to_dir(&run_dir)?;

    let grid = cfg.grid();
    println!("--- eddy-sim run config ---");
    println!("run_dir: {}", run_dir.to_string_lossy());
    println!(
        "grid:    nx={} ny={} dx={:.3e} dy={:.3e} (Lx={:.3e}, Ly={:.3e})",
        cfg.nx, cfg.ny, grid.dx, grid.dy, cfg.lx, cfg.ly
    );
    println!(
        "forcing: f={} Hz  omega={:.4e} rad/s  B0={:.3e} T",
        cfg.frequency,
        cfg.omega(),
        cfg.b0
    );
    println!(
        "stencil: {}  thickness={:.3e} m",
        cfg.stencil.as_str(),
        cfg.thickness
    );
    match &catalog_path {
        Some(p) => println!("catalog: {} ({} materials)", p, catalog.len()),
        None => println!("catalog: reference ({} materials)", catalog.len()),
    }
    println!("---------------------------");

    let runs: Vec<MaterialRun> = run_catalog(&catalog, &cfg);
    for run in &runs {
        match &run.result {
            Ok(r) => println!(
                "  ✓ {} simulated  ({} steps, dt={:.3} μs)",
                run.name,
                r.n_steps,
                r.dt * 1e6
            ),
            Err(e) => eprintln!("  ✗ {} failed: {e}", run.name),
        }
    }

    println!();
    print!("{}", comparison_table(&runs, &cfg));

    let summaries: Vec<ResultSummary> = runs
        .iter()
        .filter_map(|r| r.result.as_ref().ok().map(|b| b.summary(&r.name)))
        .collect();
    write_results_json(&run_dir, &summaries)?;
    write_summary_csv(&run_dir.join("summary.csv"), &runs)?;
    write_profiles_csv(&run_dir.join("profiles.csv"), &runs, &cfg)?;

    if plots {
        save_plots(&runs, &cfg, &run_dir);
    } else {
        println!("Plot generation skipped ('noplots').");
    }

    println!("Done. Outputs in {}", run_dir.to_string_lossy());
    Ok(())
}
