//! The scene model: a keyed collection of surfaces with labels, edit
//! delegation, rigid transforms and in-place subdivision.

pub mod scene;

pub use scene::{Axis, Scene, SceneEntry, SurfaceKey, SurfaceKind};
