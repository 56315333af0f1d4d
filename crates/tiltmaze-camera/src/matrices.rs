//! Vision-to-render matrix algebra.
//!
//! Pure functions, no state. The vision side is right-handed with x right,
//! y down, z forward (towards the scene); the render side is right-handed
//! with y up and the camera looking down -z. The flip between the two is a
//! single constant sign matrix, kept explicit and separate so the
//! convention boundary stays auditable: a sign error here misaligns every
//! rendered overlay with the physical board.

use nalgebra::Matrix4;

use tiltmaze_core::RigidPose;

use crate::calibration::Intrinsics;

/// Axis flip from the vision frame (y down, z forward) to the render
/// frame (y up, z backward). Its own inverse; applied on the left of the
/// vision-side model matrix.
#[rustfmt::skip]
pub const VISION_TO_RENDER: Matrix4<f64> = Matrix4::new(
    1.0,  0.0,  0.0, 0.0,
    0.0, -1.0,  0.0, 0.0,
    0.0,  0.0, -1.0, 0.0,
    0.0,  0.0,  0.0, 1.0,
);

/// Clip-space projection matrix from pinhole intrinsics.
///
/// Standard pinhole-to-clip mapping for a viewport of `width` x `height`
/// pixels with near/far planes `near < far` (both positive). The principal
/// point enters the third column, so an off-center optical axis shears the
/// frustum instead of being silently assumed centered.
pub fn clip_projection(
    intrinsics: &Intrinsics,
    width: f64,
    height: f64,
    near: f64,
    far: f64,
) -> Matrix4<f64> {
    let mut p = Matrix4::zeros();
    p[(0, 0)] = 2.0 * intrinsics.fx / width;
    p[(1, 1)] = 2.0 * intrinsics.fy / height;
    p[(0, 2)] = 1.0 - 2.0 * intrinsics.cx / width;
    p[(1, 2)] = 2.0 * intrinsics.cy / height - 1.0;
    p[(2, 2)] = -(far + near) / (far - near);
    p[(2, 3)] = -2.0 * far * near / (far - near);
    p[(3, 2)] = -1.0;
    p
}

/// Render-side model matrix for a board pose.
///
/// Builds the homogeneous `[R | t]` transform in the vision frame and
/// applies [`VISION_TO_RENDER`] on the left. nalgebra stores matrices
/// column major, which is what GPU APIs expect, so no transposition
/// happens here.
pub fn model_from_pose(pose: &RigidPose) -> Matrix4<f64> {
    let mut model = Matrix4::identity();
    model
        .fixed_view_mut::<3, 3>(0, 0)
        .copy_from(pose.rotation().matrix());
    model.fixed_view_mut::<3, 1>(0, 3).copy_from(&pose.tvec);
    VISION_TO_RENDER * model
}
