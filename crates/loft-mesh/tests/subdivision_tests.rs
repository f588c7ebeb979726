use loft_geometry::{Direction, Editable, Surface};
use loft_math::{DVec3, Triangle};
use loft_mesh::{subdivide, FaceVertexMesh};

fn dvec3(x: f64, y: f64, z: f64) -> DVec3 {
    DVec3::new(x, y, z)
}

/// Flat fan of four triangles around a shared center vertex.
fn make_fan() -> FaceVertexMesh {
    let center = dvec3(0.0, 0.0, 0.0);
    let ring = [
        dvec3(1.0, 0.0, 0.0),
        dvec3(0.0, 1.0, 0.0),
        dvec3(-1.0, 0.0, 0.0),
        dvec3(0.0, -1.0, 0.0),
        dvec3(1.0, -1.0, 0.0),
    ];
    let faces: Vec<Triangle> = ring
        .windows(2)
        .map(|pair| Triangle::new(center, pair[0], pair[1]))
        .collect();
    let mut vertices = vec![center];
    vertices.extend(ring);
    FaceVertexMesh::from_faces(vertices, faces).unwrap()
}

#[test]
fn test_subdivision_growth_over_iterations() {
    let mesh = make_fan();
    assert_eq!(mesh.n_faces(), 4);

    let once = subdivide(mesh.clone(), 1);
    assert_eq!(once.n_faces(), 24);
    assert!(once.n_vertices() <= mesh.n_vertices() + 4 * mesh.n_faces());

    let twice = subdivide(mesh, 2);
    assert_eq!(twice.n_faces(), 144);
    assert!(twice.surface_area() > 0.0);
}

#[test]
fn test_subdivided_mesh_round_trips_through_parts() {
    let out = subdivide(make_fan(), 1);
    let vertices = out.vertices();
    let faces = out.triangulate();
    let adjacency = out.vertex_faces().to_vec();

    let rebuilt = FaceVertexMesh::from_parts(vertices.clone(), faces.clone(), adjacency).unwrap();
    assert_eq!(rebuilt.vertices(), vertices);
    assert_eq!(rebuilt.triangulate(), faces);
}

#[test]
fn test_face_points_survive_as_vertices() {
    let mesh = make_fan();
    let centroids: Vec<DVec3> = mesh.triangulate().iter().map(Triangle::centroid).collect();
    let out = subdivide(mesh, 1);
    for c in centroids {
        assert!(out.index_of(c).is_some(), "missing face point {c:?}");
    }
}

#[test]
fn test_editing_then_subdividing() {
    let mut mesh = FaceVertexMesh::new();
    mesh.add_three_vertices(
        dvec3(0.0, 0.0, 0.0),
        dvec3(2.0, 0.0, 0.0),
        dvec3(0.0, 2.0, 0.0),
        Direction::U,
        1.0,
    )
    .unwrap();
    mesh.add_vertex(dvec3(2.0, 2.0, 1.0), Direction::U).unwrap();
    assert_eq!(mesh.n_faces(), 2);

    let out = subdivide(mesh, 1);
    assert_eq!(out.n_faces(), 12);
}
