use glam::{UVec2, Vec3};

use crate::types::{CameraView, EntityId, Observer, RayHit, TraceChannel};

/// Capability interface onto the host scene/render engine.
///
/// One adapter per host implements this; all of the capture math lives on
/// top of it, so the geometry/flow code is never duplicated per host
/// integration.
pub trait SceneOracle {
    /// Block until any in-flight rendering work has completed.
    ///
    /// Taken at the start of every capture so ray queries see the same
    /// scene state as the frame being captured.
    fn sync_renderer(&self);

    /// Size of the live viewport, if one is attached.
    fn viewport_size(&self) -> Option<UVec2>;

    /// View/projection transforms for the active controllable camera.
    fn camera_view(&self) -> Option<CameraView>;

    /// The camera-carrying entity, needed by flow and depth captures.
    fn observer(&self) -> Option<Observer>;

    /// Nearest blocking intersection along a ray, or `None`.
    fn trace_single(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        channel: TraceChannel,
    ) -> Option<RayHit>;

    /// Every intersection along a ray, in overlap (non-blocking) mode.
    ///
    /// Implementations must not stop at the nearest hit; entities behind a
    /// blocking occluder still register.
    fn trace_all(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Vec<RayHit>;

    /// Rigid-body velocity of `entity` at a world point: linear plus
    /// rotational contribution. `None` when the entity has no simulated
    /// body; callers fall back to [`linear_velocity`](Self::linear_velocity).
    fn body_velocity_at(&self, entity: EntityId, point: Vec3) -> Option<Vec3>;

    /// Coarse linear velocity of `entity`, ignoring rotation.
    fn linear_velocity(&self, entity: EntityId) -> Option<Vec3>;

    /// Read back the rendered color frame as row-major RGB bytes.
    fn read_frame(&self) -> Option<Vec<[u8; 3]>>;
}
