//! Global surface interpolation from a sampled point grid.
//!
//! Chord-length parameterizations are averaged per direction, knot vectors
//! are generated by parameter averaging, and control points are recovered by
//! two passes of banded linear solves (one per iso-parameter curve family).

use loft_core::{LoftError, Result};
use loft_math::{Point3, WPoint};
use nalgebra::DMatrix;

use super::knot::{averaged_knots, basis_functions, find_span};
use super::{ControlNet, NurbsSurface};

/// Chord-length parameterization of a polyline, normalized to [0, 1].
///
/// Degenerate polylines (total chord length ~ 0) fall back to uniform
/// spacing so the interpolation system stays nonsingular.
fn chord_length_params(points: &[Point3]) -> Vec<f64> {
    let k = points.len();
    debug_assert!(k >= 2);

    let mut lengths = Vec::with_capacity(k - 1);
    let mut total = 0.0;
    for pair in points.windows(2) {
        let d = pair[0].distance(pair[1]);
        lengths.push(d);
        total += d;
    }

    if total <= 1e-12 {
        return (0..k).map(|i| i as f64 / (k - 1) as f64).collect();
    }

    let mut params = Vec::with_capacity(k);
    params.push(0.0);
    let mut acc = 0.0;
    for d in &lengths[..k - 2] {
        acc += d;
        params.push(acc / total);
    }
    params.push(1.0);
    params
}

/// Basis-function collocation matrix: row `r` holds the nonzero basis values
/// at `params[r]`.
fn basis_matrix(params: &[f64], degree: usize, knots: &[f64]) -> DMatrix<f64> {
    let k = params.len();
    let mut mat = DMatrix::zeros(k, k);
    for (r, &t) in params.iter().enumerate() {
        let span = find_span(degree, knots, k - 1, t);
        let basis = basis_functions(degree, knots, span, t);
        for (i, &b) in basis.iter().enumerate() {
            mat[(r, span - degree + i)] = b;
        }
    }
    mat
}

/// Interpolate an `m x n` grid of points with a non-rational surface.
///
/// The returned surface passes through every grid point at the averaged
/// parameter pairs; all weights are 1.
pub fn interpolate_grid(
    degree_u: usize,
    degree_v: usize,
    grid: &[Vec<Point3>],
) -> Result<NurbsSurface> {
    let m = grid.len();
    if m == 0 {
        return Err(LoftError::Construction(
            "interpolation requires a non-empty point grid".into(),
        ));
    }
    let n = grid[0].len();
    if grid.iter().any(|row| row.len() != n) {
        return Err(LoftError::Construction(
            "interpolation grid rows have unequal lengths".into(),
        ));
    }
    if m <= degree_u || n <= degree_v {
        return Err(LoftError::Construction(format!(
            "grid {m}x{n} is too small for degrees ({degree_u}, {degree_v})"
        )));
    }

    let (u_bar, v_bar) = averaged_grid_parameters(grid);
    let knots_u = averaged_knots(&u_bar, degree_u);
    let knots_v = averaged_knots(&v_bar, degree_v);

    // First pass: one solve per column recovers intermediate points R[i][j].
    let lu_u = basis_matrix(&u_bar, degree_u, &knots_u).lu();
    let mut intermediate = vec![vec![Point3::ZERO; n]; m];
    for j in 0..n {
        let mut rhs = DMatrix::zeros(m, 3);
        for i in 0..m {
            rhs[(i, 0)] = grid[i][j].x;
            rhs[(i, 1)] = grid[i][j].y;
            rhs[(i, 2)] = grid[i][j].z;
        }
        let sol = lu_u
            .solve(&rhs)
            .ok_or_else(|| LoftError::Singular("U-direction interpolation system".into()))?;
        for i in 0..m {
            intermediate[i][j] = Point3::new(sol[(i, 0)], sol[(i, 1)], sol[(i, 2)]);
        }
    }

    // Second pass: one solve per row recovers the final control net.
    let lu_v = basis_matrix(&v_bar, degree_v, &knots_v).lu();
    let mut rows = Vec::with_capacity(m);
    for i in 0..m {
        let mut rhs = DMatrix::zeros(n, 3);
        for j in 0..n {
            rhs[(j, 0)] = intermediate[i][j].x;
            rhs[(j, 1)] = intermediate[i][j].y;
            rhs[(j, 2)] = intermediate[i][j].z;
        }
        let sol = lu_v
            .solve(&rhs)
            .ok_or_else(|| LoftError::Singular("V-direction interpolation system".into()))?;
        let row: Vec<WPoint> = (0..n)
            .map(|j| WPoint::unweighted(Point3::new(sol[(j, 0)], sol[(j, 1)], sol[(j, 2)])))
            .collect();
        rows.push(row);
    }

    NurbsSurface::from_net(
        degree_u,
        degree_v,
        ControlNet::from_rows(rows)?,
        knots_u,
        knots_v,
    )
}

/// Parameters a grid interpolation evaluates its data points at.
///
/// Exposed so callers (and tests) can probe the interpolated surface at the
/// exact parameter pairs where it must reproduce the input grid.
pub fn averaged_grid_parameters(grid: &[Vec<Point3>]) -> (Vec<f64>, Vec<f64>) {
    let m = grid.len();
    let n = grid[0].len();

    let mut u_bar = vec![0.0; m];
    for j in 0..n {
        let column: Vec<Point3> = (0..m).map(|i| grid[i][j]).collect();
        for (i, t) in chord_length_params(&column).into_iter().enumerate() {
            u_bar[i] += t;
        }
    }
    for t in &mut u_bar {
        *t /= n as f64;
    }

    let mut v_bar = vec![0.0; n];
    for row in grid {
        for (j, t) in chord_length_params(row).into_iter().enumerate() {
            v_bar[j] += t;
        }
    }
    for t in &mut v_bar {
        *t /= m as f64;
    }

    (u_bar, v_bar)
}
