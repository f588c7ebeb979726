//! Face-vertex triangle meshes and Catmull-Clark-style subdivision.

pub mod face_vertex;
pub mod subdivide;

pub use face_vertex::FaceVertexMesh;
pub use subdivide::subdivide;
