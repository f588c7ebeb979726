//! Surface capability traits and the NURBS surface implementation.

pub mod nurbs;
pub mod surface;

pub use nurbs::{ControlNet, NurbsSurface};
pub use surface::{Direction, Editable, Surface};
