//! Rational tensor-product B-spline (NURBS) surfaces.

pub mod interpolate;
pub mod knot;
mod net;

pub use interpolate::{averaged_grid_parameters, interpolate_grid};
pub use net::ControlNet;

use loft_core::{LoftError, Result, Tolerance};
use loft_math::{Point3, Triangle, WPoint};
use serde::{Deserialize, Serialize};

use crate::surface::{Direction, Editable, Surface};
use knot::{basis_functions, find_span, insert_normalized_knot, open_uniform_knots};

/// Default tessellation resolution: a `(DEFAULT_STEPS+1)^2` sample grid.
pub const DEFAULT_STEPS: usize = 30;

/// A NURBS surface: fixed degrees, two knot vectors, and a rational
/// control net that grows through `Editable` operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NurbsSurface {
    degree_u: usize,
    degree_v: usize,
    knots_u: Vec<f64>,
    knots_v: Vec<f64>,
    net: ControlNet,
}

impl NurbsSurface {
    /// An empty surface of the given degrees. Control points arrive later
    /// through the `Editable` operations.
    pub fn new(degree_u: usize, degree_v: usize) -> Self {
        debug_assert!(degree_u >= 1 && degree_v >= 1, "degrees must be at least 1");
        Self {
            degree_u,
            degree_v,
            knots_u: Vec::new(),
            knots_v: Vec::new(),
            net: ControlNet::new(),
        }
    }

    /// Build a surface from an explicit control net and knot vectors.
    ///
    /// Fails fast on dimension mismatches or decreasing knots; no partially
    /// built surface escapes.
    pub fn from_net(
        degree_u: usize,
        degree_v: usize,
        net: ControlNet,
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
    ) -> Result<Self> {
        if net.is_empty() {
            return Err(LoftError::Construction(
                "explicit construction requires a non-empty control net".into(),
            ));
        }
        if knots_u.len() != net.n_u() + degree_u + 1 {
            return Err(LoftError::Construction(format!(
                "knots_u length {} != {} + {} + 1",
                knots_u.len(),
                net.n_u(),
                degree_u
            )));
        }
        if knots_v.len() != net.n_v() + degree_v + 1 {
            return Err(LoftError::Construction(format!(
                "knots_v length {} != {} + {} + 1",
                knots_v.len(),
                net.n_v(),
                degree_v
            )));
        }
        if knots_u.windows(2).any(|w| w[1] < w[0]) || knots_v.windows(2).any(|w| w[1] < w[0]) {
            return Err(LoftError::Construction(
                "knot vectors must be non-decreasing".into(),
            ));
        }
        Ok(Self {
            degree_u,
            degree_v,
            knots_u,
            knots_v,
            net,
        })
    }

    /// Build a surface by copying a nested sequence of control points.
    pub fn from_rows(
        degree_u: usize,
        degree_v: usize,
        rows: &[Vec<WPoint>],
        knots_u: Vec<f64>,
        knots_v: Vec<f64>,
    ) -> Result<Self> {
        let net = ControlNet::from_rows(rows.to_vec())?;
        Self::from_net(degree_u, degree_v, net, knots_u, knots_v)
    }

    /// Global surface interpolation through an `m x n` grid of points.
    pub fn interpolate(degree_u: usize, degree_v: usize, grid: &[Vec<Point3>]) -> Result<Self> {
        interpolate_grid(degree_u, degree_v, grid)
    }

    pub fn degree_u(&self) -> usize {
        self.degree_u
    }

    pub fn degree_v(&self) -> usize {
        self.degree_v
    }

    pub fn n_u(&self) -> usize {
        self.net.n_u()
    }

    pub fn n_v(&self) -> usize {
        self.net.n_v()
    }

    pub fn knots_u(&self) -> &[f64] {
        &self.knots_u
    }

    pub fn knots_v(&self) -> &[f64] {
        &self.knots_v
    }

    pub fn control_net(&self) -> &ControlNet {
        &self.net
    }

    /// Nearest control point to `p`, for point-probe and highlight features.
    pub fn closest_control_point(&self, p: Point3) -> Option<Point3> {
        self.net.closest(p)
    }

    /// True once both directions carry at least `degree + 1` control points
    /// and their knot vectors. Until then the surface tessellates to nothing.
    pub fn is_evaluable(&self) -> bool {
        self.net.n_u() > self.degree_u
            && self.net.n_v() > self.degree_v
            && self.knots_u.len() == self.net.n_u() + self.degree_u + 1
            && self.knots_v.len() == self.net.n_v() + self.degree_v + 1
    }

    pub fn domain_u(&self) -> (f64, f64) {
        let p = self.degree_u;
        (self.knots_u[p], self.knots_u[self.knots_u.len() - p - 1])
    }

    pub fn domain_v(&self) -> (f64, f64) {
        let p = self.degree_v;
        (self.knots_v[p], self.knots_v[self.knots_v.len() - p - 1])
    }

    /// Evaluate the surface at `(u, v)`.
    ///
    /// Queries at the upper domain bound clamp into the last knot span.
    /// Assumes an evaluable surface; construction and edit operations
    /// maintain that invariant.
    pub fn surface_point(&self, u: f64, v: f64) -> Point3 {
        debug_assert!(self.is_evaluable());

        let span_u = find_span(self.degree_u, &self.knots_u, self.net.n_u() - 1, u);
        let basis_u = basis_functions(self.degree_u, &self.knots_u, span_u, u);
        let span_v = find_span(self.degree_v, &self.knots_v, self.net.n_v() - 1, v);
        let basis_v = basis_functions(self.degree_v, &self.knots_v, span_v, v);

        let mut point = Point3::ZERO;
        let mut w = 0.0;

        for (i, bu) in basis_u.iter().enumerate() {
            let ui = span_u - self.degree_u + i;
            for (j, bv) in basis_v.iter().enumerate() {
                let vj = span_v - self.degree_v + j;
                let cp = self.net.get(ui, vj);
                let bw = bu * bv * cp.weight;
                point += bw * cp.point;
                w += bw;
            }
        }

        if w.abs() < 1e-15 {
            point
        } else {
            point / w
        }
    }

    /// Sample a `(steps+1) x (steps+1)` grid over the full parameter domain.
    ///
    /// Parameters are rounded to the tolerance grid so accumulated floating
    /// error cannot drift a sample past an exact knot value; the final row
    /// and column land exactly on the domain bound.
    fn sample_grid(&self, steps: usize) -> Vec<Vec<Point3>> {
        let tol = Tolerance::default();
        let (u0, u1) = self.domain_u();
        let (v0, v1) = self.domain_v();
        let du = (u1 - u0) / steps as f64;
        let dv = (v1 - v0) / steps as f64;

        (0..=steps)
            .map(|i| {
                let u = if i == steps {
                    u1
                } else {
                    tol.round_param(u0 + du * i as f64).min(u1)
                };
                (0..=steps)
                    .map(|j| {
                        let v = if j == steps {
                            v1
                        } else {
                            tol.round_param(v0 + dv * j as f64).min(v1)
                        };
                        self.surface_point(u, v)
                    })
                    .collect()
            })
            .collect()
    }

    /// Tessellate at an explicit resolution: `2 * steps * steps` triangles.
    pub fn triangulate_with(&self, steps: usize) -> Vec<Triangle> {
        if !self.is_evaluable() {
            return Vec::new();
        }

        let grid = self.sample_grid(steps);
        let mut triangles = Vec::with_capacity(2 * steps * steps);
        for i in 0..steps {
            for j in 0..steps {
                triangles.push(Triangle::new(grid[i][j], grid[i + 1][j], grid[i][j + 1]));
                triangles.push(Triangle::new(
                    grid[i + 1][j],
                    grid[i][j + 1],
                    grid[i + 1][j + 1],
                ));
            }
        }
        triangles
    }

    /// Apply a point transform to the whole control net, keeping weights.
    pub fn map_control_points(&mut self, f: impl Fn(Point3) -> Point3) {
        self.net.map_points(f);
    }

    /// Regenerate or extend the knot vector of `direction` after the net
    /// grew by one row/column. Below degree+1 control points the vector
    /// stays empty; at exactly degree+1 it becomes open uniform; beyond
    /// that a normalized knot insertion preserves the interior shape.
    fn sync_knots(&mut self, direction: Direction) {
        let (degree, count) = match direction {
            Direction::U => (self.degree_u, self.net.n_u()),
            Direction::V => (self.degree_v, self.net.n_v()),
        };
        let knots = match direction {
            Direction::U => &mut self.knots_u,
            Direction::V => &mut self.knots_v,
        };

        use std::cmp::Ordering;
        match count.cmp(&(degree + 1)) {
            Ordering::Less => knots.clear(),
            Ordering::Equal => *knots = open_uniform_knots(degree, count),
            Ordering::Greater => {
                if knots.len() + 1 == count + degree + 1 {
                    insert_normalized_knot(knots, degree);
                } else {
                    // Knots were never built for this count (bulk growth);
                    // fall back to a fresh open uniform vector.
                    *knots = open_uniform_knots(degree, count);
                }
            }
        }
    }

    fn append_line(&mut self, points: Vec<WPoint>, direction: Direction) -> Result<()> {
        match direction {
            Direction::U => self.net.push_row(points)?,
            Direction::V => self.net.push_col(points)?,
        }
        self.sync_knots(direction);
        Ok(())
    }

    /// Bootstrap a full `(degree_u+1) x (degree_v+1)` bilinear patch from
    /// two opposite corners, with open uniform knots. The patch reproduces
    /// both corners exactly at the domain corners.
    fn bootstrap_patch(&mut self, p1: Point3, p2: Point3, weight: f64) -> Result<()> {
        let a = p1;
        let c = p2;
        let b = Point3::new(c.x, a.y, a.z);
        let d = Point3::new(a.x, c.y, c.z);

        let n_u = self.degree_u + 1;
        let n_v = self.degree_v + 1;
        let mut rows = Vec::with_capacity(n_u);
        for i in 0..n_u {
            let s = i as f64 / self.degree_u as f64;
            let mut row = Vec::with_capacity(n_v);
            for j in 0..n_v {
                let t = j as f64 / self.degree_v as f64;
                let p = a * (1.0 - s) * (1.0 - t)
                    + b * s * (1.0 - t)
                    + d * (1.0 - s) * t
                    + c * s * t;
                row.push(WPoint::new(p, weight));
            }
            rows.push(row);
        }

        self.net = ControlNet::from_rows(rows)?;
        self.knots_u = open_uniform_knots(self.degree_u, n_u);
        self.knots_v = open_uniform_knots(self.degree_v, n_v);
        Ok(())
    }
}

impl Surface for NurbsSurface {
    /// Sampled surface points when evaluable; the raw control points while
    /// the net is still bootstrapping (so probes can still see them).
    fn vertices(&self) -> Vec<Point3> {
        if self.is_evaluable() {
            self.sample_grid(DEFAULT_STEPS).into_iter().flatten().collect()
        } else {
            self.net.rows().iter().flatten().map(|cp| cp.point).collect()
        }
    }

    fn triangulate(&self) -> Vec<Triangle> {
        self.triangulate_with(DEFAULT_STEPS)
    }

    /// Area of the default tessellation. An approximation that sharpens
    /// with resolution, consistent with the mesh implementation.
    fn surface_area(&self) -> f64 {
        self.triangulate().iter().map(Triangle::area).sum()
    }
}

impl Editable for NurbsSurface {
    fn add_vertex(&mut self, p: Point3, direction: Direction) -> Result<()> {
        if self.net.is_empty() {
            // Degenerate 1x1 seed; knots follow once enough points exist.
            self.net.push_row(vec![WPoint::unweighted(p)])?;
            self.sync_knots(Direction::U);
            self.sync_knots(Direction::V);
            return Ok(());
        }

        let len = match direction {
            Direction::U => self.net.n_v(),
            Direction::V => self.net.n_u(),
        };
        self.append_line(vec![WPoint::unweighted(p); len], direction)
    }

    fn add_two_vertices(
        &mut self,
        p1: Point3,
        p2: Point3,
        direction: Direction,
        weight: f64,
    ) -> Result<()> {
        if weight == 0.0 {
            return Err(LoftError::InvalidOperation(
                "control point weight must be nonzero".into(),
            ));
        }

        if self.net.is_empty() {
            return self.bootstrap_patch(p1, p2, weight);
        }

        let len = match direction {
            Direction::U => self.net.n_v(),
            Direction::V => self.net.n_u(),
        };
        let line: Vec<WPoint> = (0..len)
            .map(|k| {
                let f = if len > 1 {
                    k as f64 / (len - 1) as f64
                } else {
                    0.5
                };
                WPoint::new(p1.lerp(p2, f), weight)
            })
            .collect();
        self.append_line(line, direction)
    }

    fn add_three_vertices(
        &mut self,
        _p1: Point3,
        _p2: Point3,
        _p3: Point3,
        _direction: Direction,
        _weight: f64,
    ) -> Result<()> {
        Err(LoftError::Unimplemented(
            "add_three_vertices on a NURBS surface has no defined semantics",
        ))
    }
}

impl std::fmt::Display for NurbsSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "NURBS surface\nDegrees: ({}, {})\nControl net: {} x {}\nKnots: {} + {}\nSurface area: {} sq. u.",
            self.degree_u,
            self.degree_v,
            self.net.n_u(),
            self.net.n_v(),
            self.knots_u.len(),
            self.knots_v.len(),
            self.surface_area()
        )
    }
}
