//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed cumulative faults: `o`
//! - fitted mean value function: `-` line

use crate::domain::{FaultData, Params};
use crate::models::mvf;

/// Plot observed cumulative faults against the fitted mean value function.
pub fn render_ascii_plot(data: &FaultData, params: &Params, width: usize, height: usize) -> String {
    let observed = data.cumulative();
    let t_max = observed.last().map(|&(t, _)| t).unwrap_or(0.0);
    let t_max = if t_max > 0.0 { t_max } else { 1.0 };
    let curve = sample_curve(params, t_max, width.max(2));
    render_plot(&observed, &curve, t_max, width, height)
}

fn render_plot(
    observed: &[(f64, f64)],
    curve: &[(f64, f64)],
    t_max: f64,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    // Cumulative counts start at zero, so the y-axis does too.
    let y_max = observed
        .iter()
        .chain(curve.iter())
        .map(|&(_, y)| y)
        .fold(0.0, f64::max);
    let y_max = if y_max > 0.0 { y_max } else { 1.0 };

    let mut grid = vec![vec![' '; width]; height];
    draw_curve(&mut grid, curve, t_max, y_max);

    for &(t, n) in observed {
        let x = map_x(t, t_max, width);
        let y = map_y(n, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!("Plot: time=[0, {t_max:.3}] | faults=[0, {y_max:.2}]\n"));
    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }
    out
}

fn sample_curve(params: &Params, t_max: f64, n: usize) -> Vec<(f64, f64)> {
    let n = n.max(2);
    (0..n)
        .map(|i| {
            let t = t_max * i as f64 / (n as f64 - 1.0);
            (t, mvf(t, params.omega, params.shape, params.scale))
        })
        .collect()
}

fn map_x(t: f64, t_max: f64, width: usize) -> usize {
    let u = (t / t_max).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_max: f64, height: usize) -> usize {
    let u = (y / y_max).clamp(0.0, 1.0);
    // row 0 is the top
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_curve(grid: &mut [Vec<char>], curve: &[(f64, f64)], t_max: f64, y_max: f64) {
    if curve.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(t, y) in curve {
        let x = map_x(t, t_max, width);
        let yy = map_y(y, y_max, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, yy, '-');
        } else {
            grid[yy][x] = '-';
        }
        prev = Some((x, yy));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FaultRecord;

    #[test]
    fn plot_golden_snapshot_small() {
        let data = FaultData::new(vec![
            FaultRecord::count_only(5.0, 4.0),
            FaultRecord::count_only(5.0, 4.0),
        ])
        .unwrap();
        // Nearly flat curve far below the observations keeps the snapshot simple.
        let params = Params::new(1e-9, 1.0, 0.0);

        let txt = render_ascii_plot(&data, &params, 10, 5);
        let expected = concat!(
            "Plot: time=[0, 10.000] | faults=[0, 8.00]\n",
            "         o\n",
            "          \n",
            "     o    \n",
            "          \n",
            "----------\n",
        );
        assert_eq!(txt, expected);
    }

    #[test]
    fn plot_has_requested_size_and_starts_at_origin() {
        let data = FaultData::new(vec![FaultRecord::count_only(5.0, 3.0)]).unwrap();
        let params = Params::new(10.0, 1.0, 0.0);
        let txt = render_ascii_plot(&data, &params, 20, 8);
        let lines: Vec<&str> = txt.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[1..].iter().all(|l| l.chars().count() == 20));
        // The fitted curve starts at the origin (bottom-left corner).
        assert!(lines[8].starts_with('-'));
    }
}
