use crate::traits::SceneOracle;
use crate::types::{PixelRay, RayHit, TraceChannel};

/// Maximum ray length for all capture traces, in world units.
pub const MAX_TRACE_DISTANCE: f32 = 100_000.0;

/// Nearest blocking intersection along the ray, or `None`.
///
/// Fails closed on a degenerate ray: a pixel that deprojects to garbage
/// simply records no hit.
pub fn trace_single<O: SceneOracle>(
    oracle: &O,
    ray: &PixelRay,
    max_distance: f32,
    channel: TraceChannel,
) -> Option<RayHit> {
    if !ray.is_valid() {
        return None;
    }
    oracle.trace_single(ray.origin, ray.direction, max_distance, channel)
}

/// Every entity intersecting the ray, occluded ones included.
///
/// A blocking trace would stop at the nearest object and miss anything
/// behind it, so this runs on the default channel with blocking responses
/// disabled: every entity registers as a non-blocking overlap.
pub fn trace_all<O: SceneOracle>(oracle: &O, ray: &PixelRay, max_distance: f32) -> Vec<RayHit> {
    if !ray.is_valid() {
        return Vec::new();
    }
    oracle.trace_all(ray.origin, ray.direction, max_distance)
}
