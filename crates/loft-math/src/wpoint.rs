//! Rational (weighted) control points.

use serde::{Deserialize, Serialize};

use crate::Point3;

/// A control point with a rational weight.
///
/// The position is stored unweighted; evaluation multiplies through by the
/// weight when accumulating in homogeneous space and divides back out at the
/// end. Weights are nonzero for stored control points — zero weights only
/// appear in transient accumulators inside evaluation loops.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WPoint {
    pub point: Point3,
    pub weight: f64,
}

impl WPoint {
    pub fn new(point: Point3, weight: f64) -> Self {
        debug_assert!(weight != 0.0, "control point weight must be nonzero");
        Self { point, weight }
    }

    /// Unit-weight control point.
    pub fn unweighted(point: Point3) -> Self {
        Self { point, weight: 1.0 }
    }

    /// Homogeneous coordinates `(x*w, y*w, z*w)`.
    pub fn homogeneous(&self) -> Point3 {
        self.point * self.weight
    }
}

impl From<Point3> for WPoint {
    fn from(point: Point3) -> Self {
        Self::unweighted(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    #[test]
    fn test_homogeneous() {
        let p = WPoint::new(DVec3::new(1.0, 2.0, 3.0), 2.0);
        assert_eq!(p.homogeneous(), DVec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_unweighted() {
        let p = WPoint::unweighted(DVec3::X);
        assert_eq!(p.weight, 1.0);
        assert_eq!(p.homogeneous(), DVec3::X);
    }
}
