/// trirast core library - transformation pipeline and software rasterizer
///
/// Pure matrix builders for the model, view and projection stages, the
/// rasterizer that consumes them, and the driver that composes a frame.

pub mod error;
pub mod export;
pub mod geometry;
pub mod pipeline;
pub mod projection;
pub mod rasterizer;
pub mod transform;

// Re-export commonly used types
pub use error::{ExportError, PipelineError, PipelineResult, RenderError, TransformError};
pub use geometry::{Mesh, Triangle};
pub use pipeline::{Pipeline, RenderConfig};
pub use projection::{projection_matrix, Camera, Projection};
pub use rasterizer::{Buffers, Primitive, Rasterizer};
pub use transform::{deg_to_rad, Transform};
