use glam::{Mat4, UVec2, Vec3};

use crate::error::CaptureError;
use crate::traits::SceneOracle;
use crate::types::CameraView;

/// Fully resolved camera state for one capture call.
///
/// Holds the view/projection transforms and their inverses, plus the camera
/// pose derived from them. Recomputed fresh on every capture; the scene may
/// have moved between calls, so a frame is never valid beyond the call that
/// produced it.
#[derive(Copy, Clone, Debug)]
pub struct CameraFrame {
    pub view: Mat4,
    pub inv_view: Mat4,
    pub projection: Mat4,
    pub inv_projection: Mat4,
    pub viewport: UVec2,
    pub position: Vec3,
    pub forward: Vec3,
}

impl CameraFrame {
    /// Build a frame from raw camera state.
    ///
    /// Uses the full `Mat4::inverse`, not an affine fast path: a fast
    /// inverse assumes an orthonormal view transform and goes quietly wrong
    /// (or noisy) on denormalized ones.
    pub fn from_view(camera: &CameraView) -> Self {
        let inv_view = camera.view.inverse();
        // Right-handed view space looks down -Z.
        let forward = inv_view.transform_vector3(-Vec3::Z).normalize_or_zero();
        Self {
            view: camera.view,
            inv_view,
            projection: camera.projection,
            inv_projection: camera.projection.inverse(),
            viewport: camera.viewport,
            position: inv_view.transform_point3(Vec3::ZERO),
            forward,
        }
    }
}

/// Resolve the active camera for a capture.
///
/// Forces the render-pipeline synchronization barrier before reading any
/// viewport state, so the geometry about to be ray-cast matches the frame
/// being displayed rather than a stale or half-updated transform set.
pub fn resolve_view<O: SceneOracle>(oracle: &O) -> Result<CameraFrame, CaptureError> {
    oracle.sync_renderer();

    let viewport = oracle.viewport_size().ok_or(CaptureError::NoViewport)?;
    if viewport.x == 0 || viewport.y == 0 {
        return Err(CaptureError::NoViewport);
    }

    let camera = oracle.camera_view().ok_or(CaptureError::NoCamera)?;
    if camera.viewport != viewport {
        // Oracle handed over a camera rect that disagrees with its own live
        // viewport; fail closed rather than ray-cast against stale state.
        return Err(CaptureError::SizeMismatch {
            requested: (camera.viewport.x, camera.viewport.y),
            actual: (viewport.x, viewport.y),
        });
    }

    Ok(CameraFrame::from_view(&camera))
}
