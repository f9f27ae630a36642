/// Camera and projection utilities
///
/// Convention: right-handed view space with the camera looking down -Z.
/// `near` and `far` are positive distances; the planes sit at `z = -near`
/// and `z = -far`. Projected depth runs from -1 on the near plane to +1 on
/// the far plane, and x/y land in [-1, 1] inside the frustum.
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::error::TransformError;
use crate::transform::{deg_to_rad, Transform};

/// Homogeneous `w` values smaller than this cannot be divided by
const W_EPSILON: f32 = 1e-6;

/// Squash the frustum between the planes `z = n` and `z = f` into a box
///
/// `n` and `f` are signed plane positions (negative for a -Z camera).
/// Points on either plane keep their depth after the perspective divide.
#[rustfmt::skip]
pub fn perspective_to_orthographic(n: f32, f: f32) -> Matrix4<f32> {
    Matrix4::new(
        n,   0.0, 0.0,   0.0,
        0.0, n,   0.0,   0.0,
        0.0, 0.0, n + f, -n * f,
        0.0, 0.0, 1.0,   0.0,
    )
}

/// Map the centered box `width x height x [f, n]` onto the canonical cube
///
/// Depth maps `n -> -1` and `f -> +1`.
#[rustfmt::skip]
pub fn orthographic(width: f32, height: f32, n: f32, f: f32) -> Matrix4<f32> {
    let depth = f - n;

    Matrix4::new(
        2.0 / width, 0.0,          0.0,           0.0,
        0.0,         2.0 / height, 0.0,           0.0,
        0.0,         0.0,          2.0 / depth,  -(f + n) / depth,
        0.0,         0.0,          0.0,           1.0,
    )
}

/// Perspective projection for a vertical field of view in degrees
///
/// Built as `orthographic * perspective_to_orthographic`. Rejects a field of
/// view outside (0, 180), a non-positive aspect ratio, and clip planes that
/// do not satisfy `0 < near < far`.
pub fn projection_matrix(
    fov_deg: f32,
    aspect: f32,
    near: f32,
    far: f32,
) -> Result<Matrix4<f32>, TransformError> {
    Projection::new(fov_deg, aspect, near, far).map(|projection| projection.matrix())
}

/// Validated perspective parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl Projection {
    pub fn new(fov_deg: f32, aspect: f32, near: f32, far: f32) -> Result<Self, TransformError> {
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            return Err(TransformError::InvalidFieldOfView(fov_deg));
        }
        if !(aspect.is_finite() && aspect > 0.0) {
            return Err(TransformError::InvalidAspectRatio(aspect));
        }
        if !(near > 0.0 && near < far && far.is_finite()) {
            return Err(TransformError::InvalidClipPlanes { near, far });
        }

        Ok(Self {
            fov: fov_deg,
            aspect,
            near,
            far,
        })
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Create the projection matrix
    pub fn matrix(&self) -> Matrix4<f32> {
        let (n, f) = (-self.near, -self.far);

        let height = 2.0 * self.near * (deg_to_rad(self.fov) / 2.0).tan();
        let width = height * self.aspect;

        orthographic(width, height, n, f) * perspective_to_orthographic(n, f)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 45.0,
            aspect: 1.0,
            near: 0.1,
            far: 50.0,
        }
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vector3<f32>,
    pub projection: Projection,
}

impl Camera {
    pub fn new(eye: Vector3<f32>, projection: Projection) -> Self {
        Self { eye, projection }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Transform::view_matrix(&self.eye)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection.matrix()
    }

    /// Project a model-space point to normalized device coordinates
    ///
    /// Returns `None` when the homogeneous `w` is too close to zero to divide by.
    pub fn project_to_ndc(
        &self,
        point: &Vector3<f32>,
        model_matrix: &Matrix4<f32>,
    ) -> Option<Vector3<f32>> {
        let mvp = Transform::mvp_matrix(
            model_matrix,
            &self.view_matrix(),
            &self.projection_matrix(),
        );
        to_ndc(&(mvp * point.push(1.0)))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vector3::new(0.0, 0.0, 5.0), Projection::default())
    }
}

/// Perspective divide
pub fn to_ndc(clip: &Vector4<f32>) -> Option<Vector3<f32>> {
    if clip.w.abs() < W_EPSILON {
        return None;
    }
    Some(clip.xyz() / clip.w)
}
