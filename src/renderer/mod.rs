//! WebGPU rendering module
//!
//! Draws a read-only `Snapshot` of the simulation as flat-colored quads.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderError, RenderState, world_to_ndc};
pub use shapes::snapshot_vertices;
pub use vertex::Vertex;
