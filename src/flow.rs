use glam::Vec2;

use crate::math::hsv_to_rgb;

/// Encode a 2-D flow vector as an RGB color for visualization.
///
/// Direction maps to hue (angle in degrees, negative angles wrapped by
/// +360), magnitude to saturation clamped at `max_flow`, value fixed at 1.
/// Total: zero flow has no defined angle, so hue falls back to 0 and the
/// zero saturation yields white.
pub fn encode_flow(flow: Vec2, max_flow: f32) -> [f32; 3] {
    let magnitude = flow.length();
    let mut hue = flow.y.atan2(flow.x).to_degrees();
    if hue < 0.0 {
        hue += 360.0;
    }
    // A non-positive scale would turn the division into NaN; any motion is
    // then fully saturated and zero flow stays white.
    let saturation = if max_flow > 0.0 {
        (magnitude / max_flow).clamp(0.0, 1.0)
    } else if magnitude > 0.0 {
        1.0
    } else {
        0.0
    };
    hsv_to_rgb(hue, saturation, 1.0)
}
