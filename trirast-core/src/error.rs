/// Error types for matrix construction, rendering and export
use thiserror::Error;

/// Invalid parameters handed to one of the matrix builders
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransformError {
    /// Field of view outside the open interval (0, 180) degrees
    #[error("field of view must be within (0, 180) degrees, got {0}")]
    InvalidFieldOfView(f32),

    /// Near plane not strictly positive, or not in front of the far plane
    #[error("clip planes require 0 < near < far, got near={near} far={far}")]
    InvalidClipPlanes { near: f32, far: f32 },

    /// Aspect ratio that is zero, negative or not finite
    #[error("aspect ratio must be positive and finite, got {0}")]
    InvalidAspectRatio(f32),

    /// Rotation axis with (near) zero length
    #[error("rotation axis has zero length")]
    DegenerateAxis,
}

/// Errors raised by the rasterizer when drawing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("unknown position buffer id {0}")]
    UnknownPositionBuffer(usize),

    #[error("unknown index buffer id {0}")]
    UnknownIndexBuffer(usize),

    /// A triangle references a vertex past the end of the position buffer
    #[error("vertex index {index} out of range for {len} positions")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors raised while writing a frame to disk
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("frame buffer holds {actual} pixels, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Anything that can go wrong while driving the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
