//! Face-vertex meshes: a vertex list, a triangle-face list, and a derived
//! vertex-to-incident-face index.

use loft_core::{LoftError, Result};
use loft_geometry::{Direction, Editable, Surface};
use loft_math::{point_eq, Point3, Triangle};
use serde::{Deserialize, Serialize};

/// A triangulated mesh in face-vertex form.
///
/// `vertex_faces[i]` lists the indices of the faces incident to vertex `i`;
/// the index is derivable from `(vertices, faces)` and every edit keeps it
/// consistent. `vertices()` and `triangulate()` return the stored lists
/// unchanged, so externally supplied data round-trips in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceVertexMesh {
    vertices: Vec<Point3>,
    faces: Vec<Triangle>,
    vertex_faces: Vec<Vec<usize>>,
}

impl FaceVertexMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from externally supplied parts, validating that the
    /// adjacency index matches the vertex list, every adjacency entry is a
    /// real face, and every face corner appears in the vertex list.
    pub fn from_parts(
        vertices: Vec<Point3>,
        faces: Vec<Triangle>,
        vertex_faces: Vec<Vec<usize>>,
    ) -> Result<Self> {
        if vertex_faces.len() != vertices.len() {
            return Err(LoftError::Construction(format!(
                "adjacency length {} does not match vertex count {}",
                vertex_faces.len(),
                vertices.len()
            )));
        }
        if let Some(&bad) = vertex_faces
            .iter()
            .flatten()
            .find(|&&f| f >= faces.len())
        {
            return Err(LoftError::Construction(format!(
                "adjacency references face {bad} but only {} faces exist",
                faces.len()
            )));
        }
        Self::check_corners(&vertices, &faces)?;
        Ok(Self {
            vertices,
            faces,
            vertex_faces,
        })
    }

    /// Build a mesh from vertices and faces, deriving the adjacency index.
    pub fn from_faces(vertices: Vec<Point3>, faces: Vec<Triangle>) -> Result<Self> {
        Self::check_corners(&vertices, &faces)?;
        Ok(Self::assemble(vertices, faces))
    }

    /// Assemble without corner validation; callers uphold the invariant.
    pub(crate) fn assemble(vertices: Vec<Point3>, faces: Vec<Triangle>) -> Self {
        let mut vertex_faces = vec![Vec::new(); vertices.len()];
        for (f, face) in faces.iter().enumerate() {
            for (i, v) in vertices.iter().enumerate() {
                if face.contains(*v) {
                    vertex_faces[i].push(f);
                }
            }
        }
        Self {
            vertices,
            faces,
            vertex_faces,
        }
    }

    fn check_corners(vertices: &[Point3], faces: &[Triangle]) -> Result<()> {
        for (f, face) in faces.iter().enumerate() {
            for corner in face.vertices() {
                if !vertices.iter().any(|&v| point_eq(v, corner)) {
                    return Err(LoftError::Construction(format!(
                        "face {f} references a corner not present in the vertex list"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    pub fn n_faces(&self) -> usize {
        self.faces.len()
    }

    pub fn faces(&self) -> &[Triangle] {
        &self.faces
    }

    /// Face indices incident to each vertex, parallel to `vertices()`.
    pub fn vertex_faces(&self) -> &[Vec<usize>] {
        &self.vertex_faces
    }

    /// Index of the vertex matching `p` by epsilon identity.
    pub fn index_of(&self, p: Point3) -> Option<usize> {
        self.vertices.iter().position(|&v| point_eq(v, p))
    }

    /// Signed-tetrahedron volume accumulation over the face list.
    ///
    /// Exact for closed meshes with consistent winding; the result is an
    /// approximation otherwise.
    pub fn volume(&self) -> f64 {
        let mut sum = 0.0;
        for t in &self.faces {
            let tet = t.a.cross(t.b).dot(t.c).abs() / 6.0;
            let orient = t.a.dot((t.b - t.a).cross(t.c - t.a));
            if orient != 0.0 {
                sum += tet * orient.signum();
            }
        }
        sum.abs()
    }

    /// Apply a point transform to vertices and face corners coherently.
    pub fn map_points(&mut self, f: impl Fn(Point3) -> Point3) {
        for v in &mut self.vertices {
            *v = f(*v);
        }
        for face in &mut self.faces {
            face.a = f(face.a);
            face.b = f(face.b);
            face.c = f(face.c);
        }
    }

    /// Closest vertex to `p`, then the closest other vertex that forms a
    /// non-degenerate triangle with `p` and the first.
    fn two_closest(&self, p: Point3) -> (usize, Option<usize>) {
        let mut first = 0;
        let mut best = f64::INFINITY;
        for (i, v) in self.vertices.iter().enumerate() {
            let d = p.distance(*v);
            if d <= best {
                best = d;
                first = i;
            }
        }

        let mut second = None;
        let mut best = f64::INFINITY;
        for (i, v) in self.vertices.iter().enumerate() {
            if i == first || point_eq(*v, self.vertices[first]) {
                continue;
            }
            let d = p.distance(*v);
            if d <= best && Triangle::new(p, self.vertices[first], *v).area() > 0.0 {
                best = d;
                second = Some(i);
            }
        }

        (first, second)
    }

    fn push_face(&mut self, face: Triangle, vertex_indices: &[usize]) {
        let f = self.faces.len();
        self.faces.push(face);
        for &i in vertex_indices {
            self.vertex_faces[i].push(f);
        }
    }
}

impl Surface for FaceVertexMesh {
    fn vertices(&self) -> Vec<Point3> {
        self.vertices.clone()
    }

    fn triangulate(&self) -> Vec<Triangle> {
        self.faces.clone()
    }

    fn surface_area(&self) -> f64 {
        self.faces.iter().map(Triangle::area).sum()
    }
}

impl Editable for FaceVertexMesh {
    /// Nearest-neighbor insertion. With two or more existing vertices the new
    /// point is stitched to its closest vertex and the closest second vertex
    /// forming a non-degenerate triangle; if every candidate is collinear the
    /// vertex is added unconnected. The direction parameter has no meaning
    /// for meshes and is ignored.
    fn add_vertex(&mut self, p: Point3, _direction: Direction) -> Result<()> {
        if self.vertices.len() <= 1 {
            self.vertices.push(p);
            self.vertex_faces.push(Vec::new());
            return Ok(());
        }

        let (first, second) = self.two_closest(p);
        self.vertices.push(p);
        self.vertex_faces.push(Vec::new());
        if let Some(second) = second {
            let new_index = self.vertices.len() - 1;
            let face = Triangle::new(self.vertices[first], p, self.vertices[second]);
            self.push_face(face, &[first, second, new_index]);
        }
        Ok(())
    }

    /// Two independent nearest-neighbor insertions. Weight has no meaning
    /// for meshes and is ignored.
    fn add_two_vertices(
        &mut self,
        p1: Point3,
        p2: Point3,
        direction: Direction,
        _weight: f64,
    ) -> Result<()> {
        self.add_vertex(p1, direction)?;
        self.add_vertex(p2, direction)
    }

    /// Three new vertices forming one new independent triangle.
    fn add_three_vertices(
        &mut self,
        p1: Point3,
        p2: Point3,
        p3: Point3,
        _direction: Direction,
        _weight: f64,
    ) -> Result<()> {
        let base = self.vertices.len();
        self.vertices.extend([p1, p2, p3]);
        self.vertex_faces.extend([Vec::new(), Vec::new(), Vec::new()]);
        self.push_face(Triangle::new(p1, p2, p3), &[base, base + 1, base + 2]);
        Ok(())
    }
}

impl std::fmt::Display for FaceVertexMesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Face-vertex mesh\nVertices: {}\nFaces: {}\nSurface area: {} sq. u.\nVolume: {} cub. u.",
            self.vertices.len(),
            self.faces.len(),
            self.surface_area(),
            self.volume()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use loft_math::DVec3;

    fn unit_square() -> FaceVertexMesh {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(1.0, 0.0, 0.0);
        let c = DVec3::new(1.0, 1.0, 0.0);
        let d = DVec3::new(0.0, 1.0, 0.0);
        FaceVertexMesh::from_faces(
            vec![a, b, c, d],
            vec![Triangle::new(a, b, c), Triangle::new(a, c, d)],
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let vertices = vec![
            DVec3::new(2.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 3.0),
        ];
        let faces = vec![Triangle::new(vertices[0], vertices[1], vertices[2])];
        let mesh =
            FaceVertexMesh::from_parts(vertices.clone(), faces.clone(), vec![vec![0]; 3]).unwrap();
        assert_eq!(mesh.vertices(), vertices);
        assert_eq!(mesh.triangulate(), faces);
    }

    #[test]
    fn test_from_parts_rejects_bad_input() {
        let vertices = vec![DVec3::ZERO, DVec3::X];
        // Adjacency length mismatch
        assert!(FaceVertexMesh::from_parts(vertices.clone(), vec![], vec![vec![]]).is_err());
        // Adjacency references a missing face
        assert!(
            FaceVertexMesh::from_parts(vertices.clone(), vec![], vec![vec![0], vec![]]).is_err()
        );
        // Face corner not in the vertex list
        let stray = Triangle::new(DVec3::ZERO, DVec3::X, DVec3::Y);
        assert!(FaceVertexMesh::from_parts(vertices, vec![stray], vec![vec![0], vec![0]]).is_err());
    }

    #[test]
    fn test_from_faces_derives_adjacency() {
        let mesh = unit_square();
        assert_eq!(mesh.vertex_faces()[0], vec![0, 1]); // a is in both faces
        assert_eq!(mesh.vertex_faces()[1], vec![0]); // b only in the first
        assert_eq!(mesh.vertex_faces()[3], vec![1]); // d only in the second
    }

    #[test]
    fn test_add_vertex_stitches_to_closest_pair() {
        let mut mesh = FaceVertexMesh::new();
        mesh.add_vertex(DVec3::ZERO, Direction::U).unwrap();
        mesh.add_vertex(DVec3::X, Direction::U).unwrap();
        assert_eq!(mesh.n_faces(), 0); // two lone vertices, no face yet

        mesh.add_vertex(DVec3::new(0.4, 1.0, 0.0), Direction::U).unwrap();
        assert_eq!(mesh.n_vertices(), 3);
        assert_eq!(mesh.n_faces(), 1);
        let face = mesh.triangulate()[0];
        assert!(face.contains(DVec3::ZERO));
        assert!(face.contains(DVec3::X));
        assert!(face.contains(DVec3::new(0.4, 1.0, 0.0)));
        // All three vertices index the new face
        assert!(mesh.vertex_faces().iter().all(|fs| fs == &[0]));
    }

    #[test]
    fn test_add_vertex_collinear_stays_unconnected() {
        let mut mesh = FaceVertexMesh::new();
        mesh.add_vertex(DVec3::ZERO, Direction::U).unwrap();
        mesh.add_vertex(DVec3::X, Direction::U).unwrap();
        mesh.add_vertex(DVec3::X * 2.0, Direction::U).unwrap();
        assert_eq!(mesh.n_vertices(), 3);
        assert_eq!(mesh.n_faces(), 0);
    }

    #[test]
    fn test_add_three_vertices_forms_independent_triangle() {
        let mut mesh = unit_square();
        mesh.add_three_vertices(
            DVec3::new(5.0, 5.0, 0.0),
            DVec3::new(6.0, 5.0, 0.0),
            DVec3::new(5.0, 6.0, 0.0),
            Direction::U,
            1.0,
        )
        .unwrap();
        assert_eq!(mesh.n_vertices(), 7);
        assert_eq!(mesh.n_faces(), 3);
        assert_eq!(mesh.vertex_faces()[4], vec![2]);
    }

    #[test]
    fn test_surface_area_square() {
        assert_relative_eq!(unit_square().surface_area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_volume_tetrahedron() {
        let o = DVec3::ZERO;
        let a = DVec3::X;
        let b = DVec3::Y;
        let c = DVec3::Z;
        let mesh = FaceVertexMesh::from_faces(
            vec![o, a, b, c],
            vec![
                Triangle::new(o, b, a),
                Triangle::new(o, a, c),
                Triangle::new(o, c, b),
                Triangle::new(a, b, c),
            ],
        )
        .unwrap();
        assert_relative_eq!(mesh.volume(), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_map_points_keeps_lists_coherent() {
        let mut mesh = unit_square();
        mesh.map_points(|p| p + DVec3::new(0.0, 0.0, 2.0));
        assert!(mesh.vertices().iter().all(|v| v.z == 2.0));
        assert!(mesh
            .triangulate()
            .iter()
            .all(|t| t.vertices().iter().all(|v| v.z == 2.0)));
        // Adjacency untouched by a rigid motion
        assert_eq!(mesh.vertex_faces()[0], vec![0, 1]);
    }

    #[test]
    fn test_display_summary() {
        let text = unit_square().to_string();
        assert!(text.contains("Vertices: 4"));
        assert!(text.contains("Faces: 2"));
    }
}
