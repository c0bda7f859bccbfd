//! WebGPU rendering module
//!
//! Reads only the frame snapshot: tessellates it into a flat triangle list in
//! scene coordinates and maps that to clip space on upload.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use scene::frame_vertices;
pub use vertex::Vertex;
