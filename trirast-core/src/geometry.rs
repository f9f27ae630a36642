/// Geometry primitives for 3D rendering
use nalgebra::Vector3;

/// Default fill color, in 0..=255 per channel
pub const WHITE: Vector3<f32> = Vector3::new(255.0, 255.0, 255.0);

/// A triangle with a flat color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub vertices: [Vector3<f32>; 3],
    pub color: Vector3<f32>,
}

impl Triangle {
    pub fn new(v0: Vector3<f32>, v1: Vector3<f32>, v2: Vector3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
            color: WHITE,
        }
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = color;
        self
    }

    /// Barycentric weights of `(x, y)` against the xy projection
    ///
    /// `None` for triangles with no area.
    pub fn barycentric(&self, x: f32, y: f32) -> Option<(f32, f32, f32)> {
        let [v0, v1, v2] = self.vertices;
        let denom = (v1.y - v2.y) * (v0.x - v2.x) + (v2.x - v1.x) * (v0.y - v2.y);

        if denom.abs() < 1e-6 {
            return None;
        }

        let w0 = ((v1.y - v2.y) * (x - v2.x) + (v2.x - v1.x) * (y - v2.y)) / denom;
        let w1 = ((v2.y - v0.y) * (x - v2.x) + (v0.x - v2.x) * (y - v2.y)) / denom;
        let w2 = 1.0 - w0 - w1;

        Some((w0, w1, w2))
    }
}

/// Vertex positions plus triangle index triples
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vector3<f32>>,
    pub indices: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new(positions: Vec<Vector3<f32>>, indices: Vec<[usize; 3]>) -> Self {
        Self { positions, indices }
    }

    /// The single triangle in front of the default camera
    pub fn triangle() -> Self {
        Self::new(
            vec![
                Vector3::new(2.0, 0.0, -2.0),
                Vector3::new(0.0, 2.0, -2.0),
                Vector3::new(-2.0, 0.0, -2.0),
            ],
            vec![[0, 1, 2]],
        )
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::triangle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit() -> Triangle {
        Triangle::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn test_default_mesh() {
        let mesh = Mesh::default();
        assert_eq!(mesh.positions.len(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.indices[0], [0, 1, 2]);
    }

    fn inside(tri: &Triangle, x: f32, y: f32) -> bool {
        matches!(tri.barycentric(x, y), Some((w0, w1, w2)) if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
    }

    #[test]
    fn test_inside_outside() {
        let tri = unit();
        assert!(inside(&tri, 0.25, 0.25));
        assert!(inside(&tri, 0.0, 0.0));
        assert!(!inside(&tri, 0.75, 0.75));
        assert!(!inside(&tri, -0.1, 0.5));
    }

    #[test]
    fn test_barycentric_at_vertices() {
        let tri = unit();
        let (w0, w1, w2) = tri.barycentric(1.0, 0.0).unwrap();
        assert!(w0.abs() < 1e-6 && (w1 - 1.0).abs() < 1e-6 && w2.abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_triangle() {
        let tri = Triangle::new(
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(2.0, 2.0, 0.0),
        );
        assert!(tri.barycentric(0.5, 0.5).is_none());
    }
}
