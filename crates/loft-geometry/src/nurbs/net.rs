//! Rectangular control nets of rational points.

use loft_core::{LoftError, Result};
use loft_math::{point_eq, Point3, WPoint};
use serde::{Deserialize, Serialize};

/// A 2D grid of weighted control points, `n_u` rows by `n_v` columns.
///
/// Rows run along the U direction. The grid stays rectangular through every
/// growth operation; constructors reject ragged input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlNet {
    rows: Vec<Vec<WPoint>>,
}

impl ControlNet {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Build a net from nested rows, validating rectangularity.
    pub fn from_rows(rows: Vec<Vec<WPoint>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let width = first.len();
            if width == 0 {
                return Err(LoftError::Construction("control net rows are empty".into()));
            }
            if rows.iter().any(|r| r.len() != width) {
                return Err(LoftError::Construction(
                    "control net rows have unequal lengths".into(),
                ));
            }
        }
        Ok(Self { rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows (U direction).
    pub fn n_u(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns (V direction).
    pub fn n_v(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn get(&self, i: usize, j: usize) -> WPoint {
        self.rows[i][j]
    }

    pub fn rows(&self) -> &[Vec<WPoint>] {
        &self.rows
    }

    /// Append a row; must match the current width (or seed an empty net).
    pub fn push_row(&mut self, row: Vec<WPoint>) -> Result<()> {
        if row.is_empty() {
            return Err(LoftError::Construction("cannot append an empty row".into()));
        }
        if !self.is_empty() && row.len() != self.n_v() {
            return Err(LoftError::Construction(format!(
                "row length {} does not match net width {}",
                row.len(),
                self.n_v()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a column; must match the current height.
    pub fn push_col(&mut self, col: Vec<WPoint>) -> Result<()> {
        if self.is_empty() {
            // A column on an empty net is a net of 1-point rows.
            for p in col {
                self.rows.push(vec![p]);
            }
            return Ok(());
        }
        if col.len() != self.n_u() {
            return Err(LoftError::Construction(format!(
                "column length {} does not match net height {}",
                col.len(),
                self.n_u()
            )));
        }
        for (row, p) in self.rows.iter_mut().zip(col) {
            row.push(p);
        }
        Ok(())
    }

    /// Nearest control point to `p`, for point-probe and highlight features.
    pub fn closest(&self, p: Point3) -> Option<Point3> {
        self.rows
            .iter()
            .flatten()
            .map(|cp| cp.point)
            .min_by(|a, b| a.distance(p).total_cmp(&b.distance(p)))
    }

    /// Grid position of a control point matched by epsilon identity.
    pub fn position_of(&self, p: Point3) -> Option<(usize, usize)> {
        for (i, row) in self.rows.iter().enumerate() {
            for (j, cp) in row.iter().enumerate() {
                if point_eq(cp.point, p) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// Apply a point transform to every control point, keeping weights.
    pub fn map_points(&mut self, f: impl Fn(Point3) -> Point3) {
        for row in &mut self.rows {
            for cp in row {
                cp.point = f(cp.point);
            }
        }
    }
}
