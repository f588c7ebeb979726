/// Tolerance policy for geometric comparisons.
///
/// Point identity drives deduplication and topology decisions in the
/// subdivision engine, so the epsilon is part of the geometry contract:
/// changing it changes which vertices merge.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Tolerance {
    /// Per-axis epsilon for point identity.
    pub point: f64,
    /// Grid size parameters are rounded to during tessellation sampling.
    pub param: f64,
}

impl Tolerance {
    pub const DEFAULT_POINT: f64 = 1e-14;
    pub const DEFAULT_PARAM: f64 = 1e-6;

    pub fn new(point: f64, param: f64) -> Self {
        Self { point, param }
    }

    /// Check if two scalars agree within the point epsilon.
    pub fn scalar_eq(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.point
    }

    /// Round a parameter value onto the sampling grid.
    pub fn round_param(self, t: f64) -> f64 {
        (t / self.param).round() * self.param
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            point: Self::DEFAULT_POINT,
            param: Self::DEFAULT_PARAM,
        }
    }
}
