//! Triangles, the unit of every tessellation in the workspace.

use serde::{Deserialize, Serialize};

use crate::Point3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle {
    pub fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [Point3; 3] {
        [self.a, self.b, self.c]
    }

    /// Does this triangle use `p` as one of its corners (epsilon identity)?
    pub fn contains(&self, p: Point3) -> bool {
        crate::point_eq(self.a, p) || crate::point_eq(self.b, p) || crate::point_eq(self.c, p)
    }

    pub fn centroid(&self) -> Point3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// Area via Heron's formula. Degenerate triangles yield 0.0.
    pub fn area(&self) -> f64 {
        let u = self.a.distance(self.b);
        let v = self.a.distance(self.c);
        let w = self.b.distance(self.c);
        let s = 0.5 * (u + v + w);
        let sq = s * (s - u) * (s - v) * (s - w);
        if sq <= 0.0 {
            0.0
        } else {
            sq.sqrt()
        }
    }
}
