/// Software rasterizer: buffer handles, MVP state and flat triangle fill
use std::collections::HashMap;

use bitflags::bitflags;
use nalgebra::{Matrix4, Vector3};

use crate::error::RenderError;
use crate::geometry::{Triangle, WHITE};
use crate::projection::to_ndc;
use crate::transform::Transform;

bitflags! {
    /// Which buffers [`Rasterizer::clear`] resets
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Buffers: u8 {
        const COLOR = 1;
        const DEPTH = 1 << 1;
    }
}

/// Handle to a loaded position buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PosBufId(usize);

/// Handle to a loaded index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndBufId(usize);

/// How index triples are assembled into primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangle,
}

/// Fixed-size software render target
///
/// The color buffer stores one RGB triple per pixel in 0..=255, row 0 at the
/// top of the image. Depth is the NDC depth, smaller is closer.
pub struct Rasterizer {
    width: usize,
    height: usize,
    positions: HashMap<usize, Vec<Vector3<f32>>>,
    indices: HashMap<usize, Vec<[usize; 3]>>,
    next_id: usize,
    model: Matrix4<f32>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    fill_color: Vector3<f32>,
    frame_buffer: Vec<Vector3<f32>>,
    depth_buffer: Vec<f32>,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            positions: HashMap::new(),
            indices: HashMap::new(),
            next_id: 0,
            model: Matrix4::identity(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            fill_color: WHITE,
            frame_buffer: vec![Vector3::zeros(); size],
            depth_buffer: vec![f32::INFINITY; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn load_positions(&mut self, positions: Vec<Vector3<f32>>) -> PosBufId {
        let id = self.next_id();
        self.positions.insert(id, positions);
        PosBufId(id)
    }

    pub fn load_indices(&mut self, indices: Vec<[usize; 3]>) -> IndBufId {
        let id = self.next_id();
        self.indices.insert(id, indices);
        IndBufId(id)
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn set_model(&mut self, model: Matrix4<f32>) {
        self.model = model;
    }

    pub fn set_view(&mut self, view: Matrix4<f32>) {
        self.view = view;
    }

    pub fn set_projection(&mut self, projection: Matrix4<f32>) {
        self.projection = projection;
    }

    pub fn set_fill_color(&mut self, color: Vector3<f32>) {
        self.fill_color = color;
    }

    pub fn clear(&mut self, buffers: Buffers) {
        if buffers.contains(Buffers::COLOR) {
            self.frame_buffer.fill(Vector3::zeros());
        }
        if buffers.contains(Buffers::DEPTH) {
            self.depth_buffer.fill(f32::INFINITY);
        }
    }

    pub fn frame_buffer(&self) -> &[Vector3<f32>] {
        &self.frame_buffer
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }

    /// Color at `(x, y)`, with `y = 0` the top row
    pub fn pixel(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        if x < self.width && y < self.height {
            Some(self.frame_buffer[y * self.width + x])
        } else {
            None
        }
    }

    /// Transform and fill every triangle of the given buffers
    pub fn draw(
        &mut self,
        pos_id: PosBufId,
        ind_id: IndBufId,
        primitive: Primitive,
    ) -> Result<(), RenderError> {
        let positions = self
            .positions
            .get(&pos_id.0)
            .ok_or(RenderError::UnknownPositionBuffer(pos_id.0))?;
        let indices = self
            .indices
            .get(&ind_id.0)
            .ok_or(RenderError::UnknownIndexBuffer(ind_id.0))?;

        if let Some(&index) = indices.iter().flatten().find(|&&i| i >= positions.len()) {
            return Err(RenderError::IndexOutOfRange {
                index,
                len: positions.len(),
            });
        }

        let mvp = Transform::mvp_matrix(&self.model, &self.view, &self.projection);
        let triangles: Vec<Triangle> = match primitive {
            Primitive::Triangle => indices
                .iter()
                .filter_map(|&[a, b, c]| {
                    self.project_triangle(&mvp, [positions[a], positions[b], positions[c]])
                })
                .collect(),
        };

        log::trace!("drawing {} of {} triangles", triangles.len(), indices.len());

        for triangle in &triangles {
            self.rasterize_triangle(triangle);
        }

        Ok(())
    }

    /// Clip space -> NDC -> screen space, keeping NDC depth in z
    fn project_triangle(
        &self,
        mvp: &Matrix4<f32>,
        vertices: [Vector3<f32>; 3],
    ) -> Option<Triangle> {
        let mut screen = [Vector3::zeros(); 3];
        for (out, vertex) in screen.iter_mut().zip(vertices.iter()) {
            let Some(ndc) = to_ndc(&(mvp * vertex.push(1.0))) else {
                log::warn!("skipping triangle with vertex {:?} on the camera plane", vertex);
                return None;
            };
            *out = Vector3::new(
                0.5 * self.width as f32 * (ndc.x + 1.0),
                0.5 * self.height as f32 * (1.0 - ndc.y),
                ndc.z,
            );
        }

        Some(Triangle::new(screen[0], screen[1], screen[2]).with_color(self.fill_color))
    }

    fn rasterize_triangle(&mut self, triangle: &Triangle) {
        let [v0, v1, v2] = triangle.vertices;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) = triangle.barycentric(px, py) else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.z + w1 * v1.z + w2 * v2.z;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.frame_buffer[idx] = triangle.color;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::projection_matrix;

    fn scene(width: usize, height: usize) -> (Rasterizer, PosBufId, IndBufId) {
        let mut r = Rasterizer::new(width, height);
        let pos = r.load_positions(vec![
            Vector3::new(2.0, 0.0, -2.0),
            Vector3::new(0.0, 2.0, -2.0),
            Vector3::new(-2.0, 0.0, -2.0),
        ]);
        let ind = r.load_indices(vec![[0, 1, 2]]);
        r.set_view(Transform::view_matrix(&Vector3::new(0.0, 0.0, 5.0)));
        r.set_projection(projection_matrix(45.0, 1.0, 0.1, 50.0).unwrap());
        (r, pos, ind)
    }

    #[test]
    fn test_fills_centroid_and_leaves_corners() {
        let (mut r, pos, ind) = scene(100, 100);
        r.draw(pos, ind, Primitive::Triangle).unwrap();

        // Triangle spans y in [0, 2] so its centroid sits just above the image center
        assert_eq!(r.pixel(50, 40), Some(WHITE));
        assert_eq!(r.pixel(0, 0), Some(Vector3::zeros()));
        assert_eq!(r.pixel(99, 99), Some(Vector3::zeros()));
        // Below the base edge (y = 0 in world space) nothing is drawn
        assert_eq!(r.pixel(50, 60), Some(Vector3::zeros()));
    }

    #[test]
    fn test_clear_resets_selected_buffers() {
        let (mut r, pos, ind) = scene(32, 32);
        r.draw(pos, ind, Primitive::Triangle).unwrap();
        assert!(r.frame_buffer().iter().any(|c| *c == WHITE));

        r.clear(Buffers::COLOR);
        assert!(r.frame_buffer().iter().all(|c| *c == Vector3::zeros()));
        assert!(r.depth_buffer().iter().any(|d| d.is_finite()));

        r.clear(Buffers::COLOR | Buffers::DEPTH);
        assert!(r.depth_buffer().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut r = Rasterizer::new(16, 16);
        let near = r.load_positions(vec![
            Vector3::new(-1.0, -1.0, 0.5),
            Vector3::new(1.0, -1.0, 0.5),
            Vector3::new(0.0, 1.0, 0.5),
        ]);
        let far = r.load_positions(vec![
            Vector3::new(-1.0, -1.0, 0.9),
            Vector3::new(1.0, -1.0, 0.9),
            Vector3::new(0.0, 1.0, 0.9),
        ]);
        let ind = r.load_indices(vec![[0, 1, 2]]);

        let red = Vector3::new(255.0, 0.0, 0.0);
        let blue = Vector3::new(0.0, 0.0, 255.0);

        r.set_fill_color(red);
        r.draw(near, ind, Primitive::Triangle).unwrap();
        r.set_fill_color(blue);
        r.draw(far, ind, Primitive::Triangle).unwrap();

        assert_eq!(r.pixel(8, 10), Some(red));
    }

    #[test]
    fn test_rotation_moves_coverage() {
        let (mut r, pos, ind) = scene(100, 100);
        r.set_model(Transform::model_matrix(180.0));
        r.draw(pos, ind, Primitive::Triangle).unwrap();

        // Upside down: the triangle now covers the lower half
        assert_eq!(r.pixel(50, 60), Some(WHITE));
        assert_eq!(r.pixel(50, 40), Some(Vector3::zeros()));
    }

    #[test]
    fn test_vertex_on_camera_plane_skips_triangle() {
        let (mut r, _, ind) = scene(32, 32);
        // World z = 5 is the eye plane, so the projected w is zero
        let pos = r.load_positions(vec![
            Vector3::new(2.0, 0.0, -2.0),
            Vector3::new(0.0, 2.0, 5.0),
            Vector3::new(-2.0, 0.0, -2.0),
        ]);

        assert_eq!(r.draw(pos, ind, Primitive::Triangle), Ok(()));
        assert!(r.frame_buffer().iter().all(|c| *c == Vector3::zeros()));
        assert!(r.depth_buffer().iter().all(|d| *d == f32::INFINITY));
    }

    #[test]
    fn test_unknown_handles() {
        let (mut r, pos, ind) = scene(8, 8);
        let mut other = Rasterizer::new(8, 8);
        other.load_positions(vec![]);
        other.load_positions(vec![]);
        let bogus_ind = other.load_indices(vec![]);
        let bogus_pos = other.load_positions(vec![]);

        assert_eq!(
            r.draw(pos, bogus_ind, Primitive::Triangle),
            Err(RenderError::UnknownIndexBuffer(2))
        );
        assert_eq!(
            r.draw(bogus_pos, ind, Primitive::Triangle),
            Err(RenderError::UnknownPositionBuffer(3))
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let mut r = Rasterizer::new(8, 8);
        let pos = r.load_positions(vec![Vector3::zeros(); 3]);
        let ind = r.load_indices(vec![[0, 1, 3]]);
        assert_eq!(
            r.draw(pos, ind, Primitive::Triangle),
            Err(RenderError::IndexOutOfRange { index: 3, len: 3 })
        );
    }

    #[test]
    fn test_handles_are_distinct() {
        let mut r = Rasterizer::new(1, 1);
        let a = r.load_positions(vec![]);
        let b = r.load_positions(vec![]);
        assert_ne!(a, b);
    }
}
