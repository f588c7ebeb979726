//! Scene: the host-facing collection of surfaces.

use loft_core::{LoftError, Result};
use loft_geometry::{Direction, Editable, NurbsSurface, Surface};
use loft_math::{DMat3, Point3, Triangle, Vector3};
use loft_mesh::{subdivide, FaceVertexMesh};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle for a surface in a [`Scene`].
    pub struct SurfaceKey;
}

/// Rotation axis for rigid scene transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// The closed set of surface variants a scene can hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SurfaceKind {
    Nurbs(NurbsSurface),
    Mesh(FaceVertexMesh),
}

impl SurfaceKind {
    fn kind_name(&self) -> &'static str {
        match self {
            SurfaceKind::Nurbs(_) => "nurbs",
            SurfaceKind::Mesh(_) => "mesh",
        }
    }

    /// Apply a point transform to the underlying geometry. For a NURBS
    /// surface the control net is transformed, which moves every evaluated
    /// point by the same map when the map is affine.
    pub fn map_points(&mut self, f: impl Fn(Point3) -> Point3) {
        match self {
            SurfaceKind::Nurbs(s) => s.map_control_points(f),
            SurfaceKind::Mesh(m) => m.map_points(f),
        }
    }
}

impl Surface for SurfaceKind {
    fn vertices(&self) -> Vec<Point3> {
        match self {
            SurfaceKind::Nurbs(s) => s.vertices(),
            SurfaceKind::Mesh(m) => m.vertices(),
        }
    }

    fn triangulate(&self) -> Vec<Triangle> {
        match self {
            SurfaceKind::Nurbs(s) => s.triangulate(),
            SurfaceKind::Mesh(m) => m.triangulate(),
        }
    }

    fn surface_area(&self) -> f64 {
        match self {
            SurfaceKind::Nurbs(s) => s.surface_area(),
            SurfaceKind::Mesh(m) => m.surface_area(),
        }
    }
}

impl Editable for SurfaceKind {
    fn add_vertex(&mut self, p: Point3, direction: Direction) -> Result<()> {
        match self {
            SurfaceKind::Nurbs(s) => s.add_vertex(p, direction),
            SurfaceKind::Mesh(m) => m.add_vertex(p, direction),
        }
    }

    fn add_two_vertices(
        &mut self,
        p1: Point3,
        p2: Point3,
        direction: Direction,
        weight: f64,
    ) -> Result<()> {
        match self {
            SurfaceKind::Nurbs(s) => s.add_two_vertices(p1, p2, direction, weight),
            SurfaceKind::Mesh(m) => m.add_two_vertices(p1, p2, direction, weight),
        }
    }

    fn add_three_vertices(
        &mut self,
        p1: Point3,
        p2: Point3,
        p3: Point3,
        direction: Direction,
        weight: f64,
    ) -> Result<()> {
        match self {
            SurfaceKind::Nurbs(s) => s.add_three_vertices(p1, p2, p3, direction, weight),
            SurfaceKind::Mesh(m) => m.add_three_vertices(p1, p2, p3, direction, weight),
        }
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SurfaceKind::Nurbs(s) => s.fmt(f),
            SurfaceKind::Mesh(m) => m.fmt(f),
        }
    }
}

/// A labeled surface in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneEntry {
    pub label: String,
    pub surface: SurfaceKind,
}

/// Collection of surfaces keyed by [`SurfaceKey`].
///
/// Labels (`nurbs_0`, `mesh_1`, ...) are assigned at insertion from per-kind
/// counters owned by the scene and stay stable for the life of the entry;
/// removing a surface never relabels the others.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    surfaces: SlotMap<SurfaceKey, SceneEntry>,
    next_nurbs: usize,
    next_mesh: usize,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Insert a surface and assign its label.
    pub fn add(&mut self, surface: SurfaceKind) -> SurfaceKey {
        let counter = match surface {
            SurfaceKind::Nurbs(_) => {
                self.next_nurbs += 1;
                self.next_nurbs - 1
            }
            SurfaceKind::Mesh(_) => {
                self.next_mesh += 1;
                self.next_mesh - 1
            }
        };
        let label = format!("{}_{}", surface.kind_name(), counter);
        self.surfaces.insert(SceneEntry { label, surface })
    }

    pub fn add_nurbs(&mut self, surface: NurbsSurface) -> SurfaceKey {
        self.add(SurfaceKind::Nurbs(surface))
    }

    pub fn add_mesh(&mut self, mesh: FaceVertexMesh) -> SurfaceKey {
        self.add(SurfaceKind::Mesh(mesh))
    }

    pub fn remove(&mut self, key: SurfaceKey) -> Option<SceneEntry> {
        self.surfaces.remove(key)
    }

    pub fn get(&self, key: SurfaceKey) -> Option<&SceneEntry> {
        self.surfaces.get(key)
    }

    pub fn get_mut(&mut self, key: SurfaceKey) -> Option<&mut SceneEntry> {
        self.surfaces.get_mut(key)
    }

    pub fn find_by_label(&self, label: &str) -> Option<SurfaceKey> {
        self.surfaces
            .iter()
            .find(|(_, entry)| entry.label == label)
            .map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SurfaceKey, &SceneEntry)> {
        self.surfaces.iter()
    }

    /// Human-readable summary of one surface, headed by its label.
    pub fn info(&self, key: SurfaceKey) -> Result<String> {
        let entry = self.entry(key)?;
        Ok(format!("{}\n{}", entry.label, entry.surface))
    }

    fn entry(&self, key: SurfaceKey) -> Result<&SceneEntry> {
        self.surfaces
            .get(key)
            .ok_or_else(|| LoftError::NotFound(format!("surface {key:?}")))
    }

    fn entry_mut(&mut self, key: SurfaceKey) -> Result<&mut SceneEntry> {
        self.surfaces
            .get_mut(key)
            .ok_or_else(|| LoftError::NotFound(format!("surface {key:?}")))
    }

    pub fn add_vertex(&mut self, key: SurfaceKey, p: Point3, direction: Direction) -> Result<()> {
        self.entry_mut(key)?.surface.add_vertex(p, direction)
    }

    pub fn add_two_vertices(
        &mut self,
        key: SurfaceKey,
        p1: Point3,
        p2: Point3,
        direction: Direction,
        weight: f64,
    ) -> Result<()> {
        self.entry_mut(key)?
            .surface
            .add_two_vertices(p1, p2, direction, weight)
    }

    pub fn add_three_vertices(
        &mut self,
        key: SurfaceKey,
        p1: Point3,
        p2: Point3,
        p3: Point3,
        direction: Direction,
        weight: f64,
    ) -> Result<()> {
        self.entry_mut(key)?
            .surface
            .add_three_vertices(p1, p2, p3, direction, weight)
    }

    /// Subdivide a mesh surface in place. The key and label survive; only
    /// the topology is replaced.
    pub fn subdivide(&mut self, key: SurfaceKey, iterations: usize) -> Result<()> {
        let entry = self.entry_mut(key)?;
        match &mut entry.surface {
            SurfaceKind::Mesh(mesh) => {
                let taken = std::mem::take(mesh);
                *mesh = subdivide(taken, iterations);
                Ok(())
            }
            SurfaceKind::Nurbs(_) => Err(LoftError::InvalidOperation(format!(
                "surface '{}' is not a mesh and cannot be subdivided",
                entry.label
            ))),
        }
    }

    /// Rotate a surface about a coordinate axis through the origin.
    pub fn rotate(&mut self, key: SurfaceKey, axis: Axis, angle: f64) -> Result<()> {
        let rot = match axis {
            Axis::X => DMat3::from_rotation_x(angle),
            Axis::Y => DMat3::from_rotation_y(angle),
            Axis::Z => DMat3::from_rotation_z(angle),
        };
        self.entry_mut(key)?.surface.map_points(|p| rot * p);
        Ok(())
    }

    /// Translate a surface by `delta`.
    pub fn translate(&mut self, key: SurfaceKey, delta: Vector3) -> Result<()> {
        self.entry_mut(key)?.surface.map_points(|p| p + delta);
        Ok(())
    }
}
