/// Model, view and axis-rotation matrices
use nalgebra::{Matrix3, Matrix4, Unit, Vector3};
use std::f32::consts::PI;

use crate::error::TransformError;

/// Axes shorter than this are rejected by [`Transform::axis_rotation`]
const AXIS_EPSILON: f32 = 1e-6;

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * PI / 180.0
}

/// Transform builder for 3D transformations
///
/// Every builder takes angles in degrees and returns a fresh matrix.
pub struct Transform;

impl Transform {
    /// Rotation about the +Z axis, counter-clockwise when viewed from +Z
    #[rustfmt::skip]
    pub fn model_matrix(angle_deg: f32) -> Matrix4<f32> {
        let (sin, cos) = deg_to_rad(angle_deg).sin_cos();

        Matrix4::new(
            cos, -sin, 0.0, 0.0,
            sin,  cos, 0.0, 0.0,
            0.0,  0.0, 1.0, 0.0,
            0.0,  0.0, 0.0, 1.0,
        )
    }

    /// Move the world so the eye sits at the origin
    ///
    /// The camera keeps the world axes, so this is a pure translation by `-eye`.
    pub fn view_matrix(eye: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::new_translation(&(-eye))
    }

    /// Rotation about an arbitrary axis through the origin (Rodrigues' formula)
    ///
    /// The axis does not need to be unit length; it is normalized here.
    /// A zero-length axis has no direction and yields [`TransformError::DegenerateAxis`].
    pub fn axis_rotation(
        axis: &Vector3<f32>,
        angle_deg: f32,
    ) -> Result<Matrix4<f32>, TransformError> {
        let axis = Unit::try_new(*axis, AXIS_EPSILON).ok_or(TransformError::DegenerateAxis)?;
        Ok(Self::unit_axis_rotation(&axis, angle_deg))
    }

    /// Rodrigues' formula for an axis that is already normalized
    pub fn unit_axis_rotation(axis: &Unit<Vector3<f32>>, angle_deg: f32) -> Matrix4<f32> {
        let (sin, cos) = deg_to_rad(angle_deg).sin_cos();
        let a = axis.as_ref();

        #[rustfmt::skip]
        let cross = Matrix3::new(
             0.0, -a.z,  a.y,
             a.z,  0.0, -a.x,
            -a.y,  a.x,  0.0,
        );

        let rotation = Matrix3::identity() * cos + (a * a.transpose()) * (1.0 - cos) + cross * sin;
        rotation.to_homogeneous()
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}
