/// Per-frame model/view/projection composition and rendering
use std::path::Path;

use nalgebra::Vector3;

use crate::error::PipelineResult;
use crate::export;
use crate::geometry::{Mesh, WHITE};
use crate::projection::{Camera, Projection};
use crate::rasterizer::{Buffers, IndBufId, PosBufId, Primitive, Rasterizer};
use crate::transform::Transform;

/// Default canvas edge in pixels
pub const DEFAULT_SIZE: usize = 700;

/// Default single-shot output file
pub const DEFAULT_OUTPUT: &str = "output.png";

/// Everything a pipeline needs, passed in explicitly
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    pub eye: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub fill_color: Vector3<f32>,
    pub mesh: Mesh,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SIZE,
            height: DEFAULT_SIZE,
            eye: Vector3::new(0.0, 0.0, 5.0),
            fov: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 50.0,
            fill_color: WHITE,
            mesh: Mesh::triangle(),
        }
    }
}

/// Loaded geometry plus the camera it is viewed through
pub struct Pipeline {
    rasterizer: Rasterizer,
    camera: Camera,
    pos_id: PosBufId,
    ind_id: IndBufId,
}

impl Pipeline {
    /// Validate the camera and upload the geometry
    pub fn new(config: RenderConfig) -> PipelineResult<Self> {
        let projection = Projection::new(config.fov, config.aspect, config.near, config.far)?;
        let camera = Camera::new(config.eye, projection);

        let mut rasterizer = Rasterizer::new(config.width, config.height);
        rasterizer.set_fill_color(config.fill_color);

        log::debug!(
            "loading {} vertices, {} triangles onto a {}x{} canvas",
            config.mesh.positions.len(),
            config.mesh.triangle_count(),
            config.width,
            config.height
        );
        let pos_id = rasterizer.load_positions(config.mesh.positions);
        let ind_id = rasterizer.load_indices(config.mesh.indices);

        Ok(Self {
            rasterizer,
            camera,
            pos_id,
            ind_id,
        })
    }

    pub fn rasterizer(&self) -> &Rasterizer {
        &self.rasterizer
    }

    pub fn width(&self) -> usize {
        self.rasterizer.width()
    }

    pub fn height(&self) -> usize {
        self.rasterizer.height()
    }

    /// Clear, rebuild all three matrices for `angle_deg` and draw
    pub fn render(&mut self, angle_deg: f32) -> PipelineResult<&[Vector3<f32>]> {
        self.rasterizer.clear(Buffers::COLOR | Buffers::DEPTH);

        self.rasterizer.set_model(Transform::model_matrix(angle_deg));
        self.rasterizer.set_view(self.camera.view_matrix());
        self.rasterizer.set_projection(self.camera.projection_matrix());

        self.rasterizer.draw(self.pos_id, self.ind_id, Primitive::Triangle)?;

        Ok(self.rasterizer.frame_buffer())
    }

    /// Render one frame and write it out as a PNG
    pub fn render_to_file(&mut self, angle_deg: f32, path: &Path) -> PipelineResult<()> {
        let (width, height) = (self.width(), self.height());
        let frame = self.render(angle_deg)?;
        export::save_png(frame, width, height, path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PipelineError, TransformError};

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (700, 700));
        assert_eq!(config.eye, Vector3::new(0.0, 0.0, 5.0));
        assert_eq!(config.mesh, Mesh::triangle());
    }

    #[test]
    fn test_invalid_projection_rejected() {
        let config = RenderConfig {
            near: 5.0,
            far: 5.0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            Pipeline::new(config),
            Err(PipelineError::Transform(TransformError::InvalidClipPlanes { .. }))
        ));
    }

    #[test]
    fn test_render_draws_something() {
        let mut pipeline = Pipeline::new(RenderConfig {
            width: 64,
            height: 64,
            ..RenderConfig::default()
        })
        .unwrap();

        let frame = pipeline.render(0.0).unwrap();
        assert_eq!(frame.len(), 64 * 64);
        assert!(frame.iter().any(|c| *c == WHITE));
    }

    #[test]
    fn test_frames_do_not_accumulate() {
        let mut pipeline = Pipeline::new(RenderConfig {
            width: 64,
            height: 64,
            ..RenderConfig::default()
        })
        .unwrap();

        let lit = |frame: &[Vector3<f32>]| frame.iter().filter(|c| **c == WHITE).count();
        let first = lit(pipeline.render(0.0).unwrap());
        pipeline.render(90.0).unwrap();
        let again = lit(pipeline.render(0.0).unwrap());
        assert_eq!(first, again);
    }

    #[test]
    fn test_custom_geometry_and_color() {
        let green = Vector3::new(0.0, 255.0, 0.0);
        let mut pipeline = Pipeline::new(RenderConfig {
            width: 40,
            height: 40,
            fill_color: green,
            mesh: Mesh::new(
                vec![
                    Vector3::new(-1.0, -1.0, 0.0),
                    Vector3::new(1.0, -1.0, 0.0),
                    Vector3::new(1.0, 1.0, 0.0),
                    Vector3::new(-1.0, 1.0, 0.0),
                ],
                vec![[0, 1, 2], [0, 2, 3]],
            ),
            ..RenderConfig::default()
        })
        .unwrap();

        pipeline.render(0.0).unwrap();
        assert_eq!(pipeline.rasterizer().pixel(20, 20), Some(green));
    }
}
