// src/visualisation.rs

use crate::current::CurrentDensity;
use crate::params::SimulationConfig;
use crate::scalar_field::ScalarField2D;
use crate::simulate::MaterialRun;
use plotters::prelude::*;

/// Parse "#rrggbb"; anything else falls back to grey.
pub fn parse_hex_colour(s: &str) -> RGBColor {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() == 6 {
        if let Ok(v) = u32::from_str_radix(hex, 16) {
            return RGBColor((v >> 16) as u8, (v >> 8) as u8, v as u8);
        }
    }
    RGBColor(128, 128, 128)
}

/// Inferno-like map: x=0 -> black, x=1 -> pale yellow.
fn heat_colour(x: f64) -> RGBColor {
    const STOPS: [(f64, f64, f64); 5] = [
        (0.0, 0.0, 4.0),
        (87.0, 16.0, 110.0),
        (188.0, 55.0, 84.0),
        (249.0, 142.0, 9.0),
        (252.0, 255.0, 164.0),
    ];
    let x = if x.is_finite() { x.clamp(0.0, 1.0) } else { 0.0 };
    let s = x * (STOPS.len() - 1) as f64;
    let k = (s.floor() as usize).min(STOPS.len() - 2);
    let u = s - k as f64;
    let (a, b) = (STOPS[k], STOPS[k + 1]);
    RGBColor(
        (a.0 + u * (b.0 - a.0)) as u8,
        (a.1 + u * (b.1 - a.1)) as u8,
        (a.2 + u * (b.2 - a.2)) as u8,
    )
}

/// Heat map of a scalar field over the sheet (axes in cm), optionally with
/// unit-length arrows showing the direction of `arrows` on a coarse lattice.
pub fn save_field_heatmap(
    field: &ScalarField2D,
    arrows: Option<&CurrentDensity>,
    title: &str,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let grid = field.grid;
    let dx_cm = grid.dx * 100.0;
    let dy_cm = grid.dy * 100.0;
    let lx_cm = dx_cm * grid.nx as f64;
    let ly_cm = dy_cm * grid.ny as f64;

    let mut lo = field.min();
    let mut hi = field.max();
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < 1e-300 {
        lo = 0.0;
        hi = if hi.is_finite() && hi > 0.0 { hi } else { 1.0 };
    }

    let root = BitMapBackend::new(filename, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..lx_cm, 0.0..ly_cm)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("x [cm]")
        .y_desc("y [cm]")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series((0..grid.nx).flat_map(|i| {
        (0..grid.ny).map(move |j| {
            let v = field.get(i, j);
            let colour = heat_colour((v - lo) / (hi - lo));
            let x0 = i as f64 * dx_cm;
            let y0 = j as f64 * dy_cm;
            Rectangle::new([(x0, y0), (x0 + dx_cm, y0 + dy_cm)], colour.filled())
        })
    }))?;

    if let Some(j) = arrows {
        // ~20 arrows per axis
        let stride_x = (grid.nx / 20).max(1);
        let stride_y = (grid.ny / 20).max(1);
        let len = 0.4 * (stride_x as f64 * dx_cm).min(stride_y as f64 * dy_cm);
        let style = WHITE.mix(0.6).stroke_width(1);

        for jj in (stride_y / 2..grid.ny).step_by(stride_y) {
            for ii in (stride_x / 2..grid.nx).step_by(stride_x) {
                let (ux, uy) = (j.jx.get(ii, jj), j.jy.get(ii, jj));
                let norm = (ux * ux + uy * uy).sqrt();
                if !(norm.is_finite() && norm > 0.0) {
                    continue;
                }
                let (ux, uy) = (ux / norm, uy / norm);
                let cx = (ii as f64 + 0.5) * dx_cm;
                let cy = (jj as f64 + 0.5) * dy_cm;
                let tail = (cx - 0.5 * len * ux, cy - 0.5 * len * uy);
                let head = (cx + 0.5 * len * ux, cy + 0.5 * len * uy);
                // barbs at ±150° from the shaft
                let (c, s) = (150f64.to_radians().cos(), 150f64.to_radians().sin());
                let barb = 0.35 * len;
                let left = (head.0 + barb * (c * ux - s * uy), head.1 + barb * (s * ux + c * uy));
                let right = (head.0 + barb * (c * ux + s * uy), head.1 + barb * (-s * ux + c * uy));
                chart.draw_series(std::iter::once(PathElement::new(vec![tail, head], style)))?;
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![left, head, right],
                    style,
                )))?;
            }
        }
    }

    chart.draw_series(std::iter::once(Text::new(
        format!("min {:.3e}  max {:.3e}", lo, hi),
        (0.02 * lx_cm, 0.96 * ly_cm),
        ("sans-serif", 14).into_font().color(&WHITE),
    )))?;

    root.present()?;
    Ok(())
}

fn y_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for v in values.filter(|v| v.is_finite()) {
        y_min = y_min.min(v);
        y_max = y_max.max(v);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        return (-1.0, 1.0);
    }
    if (y_max - y_min).abs() < 1e-30 {
        let delta = if y_max.abs() < 1e-30 { 1.0 } else { 0.1 * y_max.abs() };
        return (y_min - delta, y_max + delta);
    }
    let margin = 0.1 * (y_max - y_min);
    (y_min - margin, y_max + margin)
}

/// Simulated centreline amplitude (solid) vs analytic decay B0·exp(-x/δ)
/// (faded), plus the B0/e reference level.
pub fn save_attenuation_profile_plot(
    runs: &[MaterialRun],
    config: &SimulationConfig,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let x_cm: Vec<f64> = config.x_coords().iter().map(|x| x * 100.0).collect();
    let ok: Vec<_> = runs
        .iter()
        .filter_map(|r| r.result.as_ref().ok().map(|b| (r, b)))
        .collect();
    if ok.is_empty() || x_cm.is_empty() {
        return Ok(());
    }

    let b0_mt = config.b0 * 1000.0;
    let (_, y_hi) = y_range(
        ok.iter()
            .flat_map(|(_, b)| b.bz_profile_mt.iter().copied())
            .chain(std::iter::once(b0_mt)),
    );

    let root = BitMapBackend::new(filename, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            "Bz attenuation profile: simulated (solid) vs analytic (faded)",
            ("sans-serif", 24),
        )
        .set_left_and_bottom_label_area_size(60)
        .build_cartesian_2d(0.0..config.lx * 100.0, 0.0..y_hi)?;

    chart
        .configure_mesh()
        .x_desc("x [cm]")
        .y_desc("|Bz| [mT]")
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for (run, bundle) in &ok {
        let colour = parse_hex_colour(&run.colour);
        let analytic = bundle.analytic_profile_mt(config);

        chart.draw_series(LineSeries::new(
            x_cm.iter().copied().zip(analytic.iter().copied()),
            colour.mix(0.45).stroke_width(2),
        ))?;

        chart
            .draw_series(LineSeries::new(
                x_cm.iter().copied().zip(bundle.bz_profile_mt.iter().copied()),
                colour.stroke_width(3),
            ))?
            .label(format!(
                "{}  (δ = {:.1} mm)",
                run.name,
                bundle.skin_depth * 1000.0
            ))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));

        let d_cm = bundle.skin_depth * 100.0;
        if d_cm < config.lx * 100.0 {
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(d_cm, 0.0), (d_cm, y_hi)],
                colour.mix(0.6),
            )))?;
        }
    }

    let level = b0_mt * (-1.0f64).exp();
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, level), (config.lx * 100.0, level)],
            BLACK.mix(0.4),
        )))?
        .label(format!("B0/e = {:.1} mT", level))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.mix(0.4)));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

/// External field and analytic interior field at x = lx/4 over two periods.
pub fn save_time_evolution_plot(
    runs: &[MaterialRun],
    config: &SimulationConfig,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    const N_SAMPLES: usize = 500;
    let t_end = 2.0 * config.period();
    let times: Vec<f64> = (0..N_SAMPLES)
        .map(|k| t_end * k as f64 / (N_SAMPLES - 1) as f64)
        .collect();
    let b0_mt = config.b0 * 1000.0;

    let root = BitMapBackend::new(filename, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            format!(
                "Time evolution at x = {:.2} cm: lag and attenuation per material",
                config.probe_depth() * 100.0
            ),
            ("sans-serif", 24),
        )
        .set_left_and_bottom_label_area_size(60)
        .build_cartesian_2d(0.0..t_end * 1000.0, -1.1 * b0_mt..1.1 * b0_mt)?;

    chart
        .configure_mesh()
        .x_desc("t [ms]")
        .y_desc("B [mT]")
        .label_style(("sans-serif", 14))
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    let omega = config.omega();
    chart
        .draw_series(LineSeries::new(
            times
                .iter()
                .map(|&t| (t * 1000.0, b0_mt * (omega * t).sin())),
            BLACK.mix(0.5).stroke_width(2),
        ))?
        .label("external field B_ext")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.mix(0.5)));

    for run in runs {
        let Ok(bundle) = &run.result else { continue };
        let colour = parse_hex_colour(&run.colour);
        chart
            .draw_series(LineSeries::new(
                times.iter().map(|&t| {
                    (t * 1000.0, bundle.analytic_interior_field(config, t) * 1000.0)
                }),
                colour.stroke_width(2),
            ))?
            .label(format!(
                "{}  (Δφ = {:.1}°, att = {:.3})",
                run.name,
                bundle.phase_lag_deg(),
                bundle.attenuation(config)
            ))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colours() {
        assert_eq!(parse_hex_colour("#e67e22"), RGBColor(0xe6, 0x7e, 0x22));
        assert_eq!(parse_hex_colour("3498db"), RGBColor(0x34, 0x98, 0xdb));
        assert_eq!(parse_hex_colour("red"), RGBColor(128, 128, 128));
    }

    #[test]
    fn heat_colour_endpoints() {
        assert_eq!(heat_colour(0.0), RGBColor(0, 0, 4));
        assert_eq!(heat_colour(1.0), RGBColor(252, 255, 164));
        assert_eq!(heat_colour(f64::NAN), RGBColor(0, 0, 4));
        assert_eq!(heat_colour(2.0), heat_colour(1.0));
    }

    #[test]
    fn y_range_pads_flat_and_empty_input() {
        assert_eq!(y_range(std::iter::empty()), (-1.0, 1.0));
        let (lo, hi) = y_range([2.0, 2.0].into_iter());
        assert!(lo < 2.0 && hi > 2.0);
    }
}
