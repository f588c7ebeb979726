//! Surface capability traits shared by every surface variant.

use std::str::FromStr;

use loft_core::{LoftError, Result};
use loft_math::{Point3, Triangle};
use serde::{Deserialize, Serialize};

/// A surface that can report its geometry as flat vertex and triangle lists.
///
/// `triangulate` recomputes from current state on every call; callers that
/// need caching wrap it externally.
pub trait Surface: Send + Sync {
    /// Sampled or stored vertices of the surface.
    fn vertices(&self) -> Vec<Point3>;

    /// Flat triangle list approximating the surface. Empty surfaces yield
    /// an empty list, never an error.
    fn triangulate(&self) -> Vec<Triangle>;

    /// Total surface area.
    fn surface_area(&self) -> f64;
}

/// Parametric direction for control-net growth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    U,
    V,
}

impl FromStr for Direction {
    type Err = LoftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "U" | "u" => Ok(Direction::U),
            "V" | "v" => Ok(Direction::V),
            other => Err(LoftError::InvalidDirection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::U => write!(f, "U"),
            Direction::V => write!(f, "V"),
        }
    }
}

/// Surfaces that grow interactively, one, two or three vertices at a time.
pub trait Editable: Surface {
    /// Add a single vertex along `direction`.
    fn add_vertex(&mut self, p: Point3, direction: Direction) -> Result<()>;

    /// Add a pair of vertices along `direction` with the given weight.
    fn add_two_vertices(
        &mut self,
        p1: Point3,
        p2: Point3,
        direction: Direction,
        weight: f64,
    ) -> Result<()>;

    /// Add three vertices at once.
    fn add_three_vertices(
        &mut self,
        p1: Point3,
        p2: Point3,
        p3: Point3,
        direction: Direction,
        weight: f64,
    ) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_parses_known_tokens() {
        assert_eq!("U".parse::<Direction>().unwrap(), Direction::U);
        assert_eq!("u".parse::<Direction>().unwrap(), Direction::U);
        assert_eq!("V".parse::<Direction>().unwrap(), Direction::V);
        assert_eq!(" v ".parse::<Direction>().unwrap(), Direction::V);
    }

    #[test]
    fn test_direction_rejects_unknown_tokens() {
        for bad in ["", "W", "uv", "diagonal"] {
            let err = bad.parse::<Direction>().unwrap_err();
            assert!(matches!(err, LoftError::InvalidDirection(_)), "{bad:?}");
        }
    }
}
