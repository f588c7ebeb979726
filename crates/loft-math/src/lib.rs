pub mod triangle;
pub mod wpoint;

pub use glam::{DMat3, DVec3};
pub use triangle::Triangle;
pub use wpoint::WPoint;

pub type Point3 = DVec3;
pub type Vector3 = DVec3;

use loft_core::Tolerance;

/// Point identity under the default per-axis epsilon.
///
/// This is the equality contract shared by mesh deduplication, subdivision
/// adjacency and control-net probes.
pub fn point_eq(a: Point3, b: Point3) -> bool {
    let tol = Tolerance::default();
    tol.scalar_eq(a.x, b.x) && tol.scalar_eq(a.y, b.y) && tol.scalar_eq(a.z, b.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_eq_epsilon() {
        let p = DVec3::new(1.0, 2.0, 3.0);
        assert!(point_eq(p, p));
        assert!(point_eq(p, p + DVec3::splat(5e-15)));
        assert!(!point_eq(p, p + DVec3::new(1e-12, 0.0, 0.0)));
    }
}
