use glam::{Vec2, Vec3};

use crate::types::PixelRay;
use crate::view::CameraFrame;

// NDC depth values for the near and far plane under the 0..1 convention.
const NDC_NEAR: f32 = 0.0;
const NDC_FAR: f32 = 1.0;

/// Map a pixel coordinate to a world-space ray through the camera.
///
/// The ray origin lies on the near plane, which is what makes origin
/// differences meaningful for the screen Jacobian below. Pure and total:
/// a pathological camera yields a degenerate ray, never a panic.
pub fn deproject(pixel: Vec2, frame: &CameraFrame) -> PixelRay {
    let size = frame.viewport.as_vec2();
    let ndc = Vec2::new(
        (pixel.x / size.x) * 2.0 - 1.0,
        1.0 - (pixel.y / size.y) * 2.0,
    );

    let near_vs = frame
        .inv_projection
        .project_point3(Vec3::new(ndc.x, ndc.y, NDC_NEAR));
    let far_vs = frame
        .inv_projection
        .project_point3(Vec3::new(ndc.x, ndc.y, NDC_FAR));

    let origin = frame.inv_view.transform_point3(near_vs);
    let far_ws = frame.inv_view.transform_point3(far_vs);
    let direction = (far_ws - origin).normalize_or_zero();

    PixelRay { origin, direction }
}

/// How much the near-plane intersection point moves per pixel step along one
/// screen axis, inverted into pixels-per-world-unit.
///
/// Deriving this analytically from the projection is tricky, so it is done
/// by centered numerical differentiation: deproject pixel +/- 1 along the
/// axis, take the world-origin difference over 2, then invert by dividing by
/// the squared magnitude. `axis` is 0 for screen x, 1 for screen y.
pub fn pixel_screen_jacobian(pixel: Vec2, axis: usize, frame: &CameraFrame) -> Vec3 {
    let mut plus = pixel;
    let mut minus = pixel;
    if axis == 0 {
        plus.x += 1.0;
        minus.x -= 1.0;
    } else {
        plus.y += 1.0;
        minus.y -= 1.0;
    }

    let d_screen = (deproject(plus, frame).origin - deproject(minus, frame).origin) / 2.0;
    let len_sq = d_screen.length_squared();
    if len_sq > 0.0 && len_sq.is_finite() {
        d_screen / len_sq
    } else {
        Vec3::ZERO
    }
}
