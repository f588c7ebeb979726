//! Catmull-Clark-style subdivision adapted to triangulated face-vertex
//! meshes.
//!
//! Each iteration rebuilds the whole mesh from per-face `ClarkCell`s: face
//! points at centroids, edge points from neighbor face points (boundary
//! edges keep their midpoints), repositioned original vertices, and six new
//! triangles per cell. Adjacency is found by pairwise scans, so cost grows
//! quadratically with face count.

use loft_geometry::Surface;
use loft_math::{point_eq, Point3, Triangle};

use crate::FaceVertexMesh;

/// Local vertex pairs of the three edges of a cell.
const EDGE_VERTS: [(usize, usize); 3] = [(0, 1), (1, 2), (0, 2)];

/// Per-face working state for one subdivision iteration. Rebuilt every
/// iteration and discarded after the mesh rebuild.
struct ClarkCell {
    verts: [Point3; 3],
    indices: [usize; 3],
    face_point: Point3,
    edge_points: [Point3; 3],
    boundary: [bool; 3],
}

impl ClarkCell {
    fn contains(&self, p: Point3) -> bool {
        self.verts.iter().any(|&v| point_eq(v, p))
    }
}

/// Smooth `mesh` by `iterations` rounds of subdivision.
///
/// Takes ownership and returns the replacement mesh; zero iterations (or a
/// mesh without faces) return the input unchanged.
pub fn subdivide(mut mesh: FaceVertexMesh, iterations: usize) -> FaceVertexMesh {
    for _ in 0..iterations {
        if mesh.n_faces() == 0 {
            break;
        }
        mesh = subdivide_once(&mesh);
    }
    mesh
}

fn subdivide_once(mesh: &FaceVertexMesh) -> FaceVertexMesh {
    let vertices = mesh.vertices();

    // Cells: corners, their vertex-list indices (matched by point identity)
    // and centroid face points.
    let mut cells: Vec<ClarkCell> = mesh
        .faces()
        .iter()
        .map(|face| {
            let corners = face.vertices();
            // Corners are always present in the vertex list (mesh invariant).
            let indices = [
                mesh.index_of(corners[0]).unwrap_or(0),
                mesh.index_of(corners[1]).unwrap_or(0),
                mesh.index_of(corners[2]).unwrap_or(0),
            ];
            ClarkCell {
                verts: corners,
                indices,
                face_point: face.centroid(),
                edge_points: [Point3::ZERO; 3],
                boundary: [false; 3],
            }
        })
        .collect();

    // Edge classification. An edge shared with a neighbor cell (two common
    // vertices) gets the interior edge point: the midpoint of the edge
    // midpoint and the two face points' midpoint. An edge with no neighbor
    // is a boundary edge and keeps its midpoint, flagged.
    let classified: Vec<([Point3; 3], [bool; 3])> = (0..cells.len())
        .map(|i| {
            let mut edge_points = [Point3::ZERO; 3];
            let mut boundary = [false; 3];
            for (k, &(la, lb)) in EDGE_VERTS.iter().enumerate() {
                let a = cells[i].verts[la];
                let b = cells[i].verts[lb];
                let edge_mid = (a + b) / 2.0;
                let neighbor = (0..cells.len())
                    .find(|&j| j != i && cells[j].contains(a) && cells[j].contains(b));
                match neighbor {
                    Some(j) => {
                        let faces_mid = (cells[i].face_point + cells[j].face_point) / 2.0;
                        edge_points[k] = (edge_mid + faces_mid) / 2.0;
                    }
                    None => {
                        edge_points[k] = edge_mid;
                        boundary[k] = true;
                    }
                }
            }
            (edge_points, boundary)
        })
        .collect();
    for (cell, (edge_points, boundary)) in cells.iter_mut().zip(classified) {
        cell.edge_points = edge_points;
        cell.boundary = boundary;
    }

    // Vertex repositioning: old*(n-3)/n + avgFace/n + avgEdge*2/n over the n
    // touching cells. When any incident edge is a boundary edge, only the
    // boundary edge points enter the average (standard boundary rule); the
    // average runs over distinct edge points.
    let new_positions: Vec<Point3> = vertices
        .iter()
        .map(|&v| {
            let touching: Vec<&ClarkCell> = cells.iter().filter(|c| c.contains(v)).collect();
            let n = touching.len();
            if n == 0 {
                return v;
            }
            let nf = n as f64;

            let avg_face = touching
                .iter()
                .fold(Point3::ZERO, |acc, c| acc + c.face_point)
                / nf;

            let mut incident: Vec<(Point3, bool)> = Vec::new();
            for c in &touching {
                for (k, &(la, lb)) in EDGE_VERTS.iter().enumerate() {
                    if point_eq(c.verts[la], v) || point_eq(c.verts[lb], v) {
                        incident.push((c.edge_points[k], c.boundary[k]));
                    }
                }
            }
            let has_boundary = incident.iter().any(|&(_, flagged)| flagged);
            let mut distinct: Vec<Point3> = Vec::new();
            for (p, flagged) in incident {
                if has_boundary && !flagged {
                    continue;
                }
                if !distinct.iter().any(|&q| point_eq(q, p)) {
                    distinct.push(p);
                }
            }
            let avg_edge =
                distinct.iter().fold(Point3::ZERO, |acc, &p| acc + p) / distinct.len() as f64;

            v * ((nf - 3.0) / nf) + avg_face / nf + avg_edge * (2.0 / nf)
        })
        .collect();

    // Move each cell corner to its repositioned vertex before
    // re-triangulation.
    for cell in &mut cells {
        for k in 0..3 {
            cell.verts[k] = new_positions[cell.indices[k]];
        }
    }

    // Six new triangles per cell: each corner's quadrilateral (corner, two
    // adjacent edge points, face point) split through the face point.
    let mut new_faces = Vec::with_capacity(6 * cells.len());
    for cell in &cells {
        let [v0, v1, v2] = cell.verts;
        let [e01, e12, e02] = cell.edge_points;
        let fp = cell.face_point;
        new_faces.push(Triangle::new(v0, e01, fp));
        new_faces.push(Triangle::new(v0, fp, e02));
        new_faces.push(Triangle::new(v1, e12, fp));
        new_faces.push(Triangle::new(v1, fp, e01));
        new_faces.push(Triangle::new(v2, e02, fp));
        new_faces.push(Triangle::new(v2, fp, e12));
    }

    // Rebuild: repositioned originals, then edge and face points, deduped by
    // point identity in first-seen order.
    let mut new_vertices = new_positions;
    for cell in &cells {
        new_vertices.extend(cell.edge_points);
        new_vertices.push(cell.face_point);
    }
    let mut deduped: Vec<Point3> = Vec::with_capacity(new_vertices.len());
    for p in new_vertices {
        if !deduped.iter().any(|&q| point_eq(q, p)) {
            deduped.push(p);
        }
    }

    FaceVertexMesh::assemble(deduped, new_faces)
}

#[cfg(test)]
mod tests {
    use super::*;
    use loft_math::DVec3;

    fn single_triangle() -> FaceVertexMesh {
        let a = DVec3::new(0.0, 0.0, 0.0);
        let b = DVec3::new(1.0, 0.0, 0.0);
        let c = DVec3::new(0.0, 1.0, 0.0);
        FaceVertexMesh::from_faces(vec![a, b, c], vec![Triangle::new(a, b, c)]).unwrap()
    }

    fn split_square() -> FaceVertexMesh {
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
    fn test_zero_iterations_is_identity() {
        let mesh = split_square();
        let out = subdivide(mesh.clone(), 0);
        assert_eq!(out, mesh);
    }

    #[test]
    fn test_empty_mesh_stays_empty() {
        let out = subdivide(FaceVertexMesh::new(), 3);
        assert_eq!(out.n_vertices(), 0);
        assert_eq!(out.n_faces(), 0);
    }

    #[test]
    fn test_isolated_triangle_boundary_midpoints() {
        let out = subdivide(single_triangle(), 1);

        // 6 faces, all fanning through the original centroid
        assert_eq!(out.n_faces(), 6);
        let centroid = DVec3::new(1.0 / 3.0, 1.0 / 3.0, 0.0);
        assert!(out.triangulate().iter().all(|t| t.contains(centroid)));

        // All 3 edges are boundary, so the edge points are plain midpoints
        for mid in [
            DVec3::new(0.5, 0.0, 0.0),
            DVec3::new(0.0, 0.5, 0.0),
            DVec3::new(0.5, 0.5, 0.0),
        ] {
            assert!(out.index_of(mid).is_some(), "missing midpoint {mid:?}");
        }

        // 3 repositioned originals + 3 midpoints + 1 face point
        assert_eq!(out.n_vertices(), 7);
    }

    #[test]
    fn test_face_count_grows_sixfold() {
        let mesh = split_square();
        let once = subdivide(mesh.clone(), 1);
        assert_eq!(once.n_faces(), 6 * mesh.n_faces());
        let twice = subdivide(mesh, 2);
        assert_eq!(twice.n_faces(), 36 * 2);
    }

    #[test]
    fn test_shared_edge_gets_interior_edge_point() {
        // The diagonal of the split square is the only interior edge. Its
        // edge point is the midpoint of the edge midpoint (0.5, 0.5) and the
        // two centroids' midpoint (0.5, 0.5), i.e. (0.5, 0.5) itself.
        let out = subdivide(split_square(), 1);
        assert!(out.index_of(DVec3::new(0.5, 0.5, 0.0)).is_some());
    }

    #[test]
    fn test_boundary_vertex_uses_boundary_edge_points_only() {
        // Vertex (0,0) of the split square touches both cells (n = 2), has
        // two boundary edges with midpoints (0.5, 0) and (0, 0.5), and one
        // interior edge. Boundary filtering gives
        //   avgEdge = (0.25, 0.25), avgFace = (0.5, 0.5)
        //   new = (0,0)*(-1/2) + (0.5,0.5)/2 + (0.25,0.25)*1 = (0.5, 0.5)
        let out = subdivide(split_square(), 1);
        let repositioned = out.vertices()[0];
        assert!((repositioned - DVec3::new(0.5, 0.5, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_vertex_count_upper_bound() {
        // At most 3 edge points and exactly 1 face point per face join the
        // repositioned originals.
        let mesh = split_square();
        let bound = mesh.n_vertices() + 4 * mesh.n_faces();
        let out = subdivide(mesh, 1);
        assert!(out.n_vertices() <= bound);
    }
}
