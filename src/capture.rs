use glam::{UVec2, Vec2, Vec3};

use crate::deproject::{deproject, pixel_screen_jacobian};
use crate::error::CaptureError;
use crate::flow::encode_flow;
use crate::math::SampleGrid;
use crate::query::{trace_all, trace_single, MAX_TRACE_DISTANCE};
use crate::traits::SceneOracle;
use crate::types::{EntityId, Observer, TraceChannel};
use crate::velocity::resolve_velocity;
use crate::view::{resolve_view, CameraFrame};

/// Synthesizes per-pixel sensor outputs from live scene state.
///
/// Every capture runs synchronously to completion on the caller's thread,
/// writing into caller-owned buffers. All fatal checks happen before any
/// per-pixel work; on failure the buffer contents are undefined and must be
/// discarded.
pub struct CaptureEngine<'a, O: SceneOracle> {
    oracle: &'a O,
}

impl<'a, O: SceneOracle> CaptureEngine<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// Shared preconditions for the ray-based capture kinds: sync barrier,
    /// viewport attached, requested size matches the live viewport, camera
    /// frame resolvable.
    fn begin_capture(&self, size: UVec2) -> Result<CameraFrame, CaptureError> {
        let frame = resolve_view(self.oracle)?;
        if frame.viewport != size {
            return Err(CaptureError::SizeMismatch {
                requested: (size.x, size.y),
                actual: (frame.viewport.x, frame.viewport.y),
            });
        }
        Ok(frame)
    }

    fn require_observer(&self) -> Result<Observer, CaptureError> {
        self.oracle.observer().ok_or(CaptureError::NoObserver)
    }

    fn check_len(buffer_len: usize, expected: usize) -> Result<(), CaptureError> {
        if buffer_len != expected {
            return Err(CaptureError::BufferSize {
                expected,
                actual: buffer_len,
            });
        }
        Ok(())
    }

    /// Read back the rendered color frame as normalized [0, 1] planes.
    ///
    /// `out` must hold `3 * W * H` floats and is written plane-major: all
    /// red values, then all green, then all blue. Consumers rely on this
    /// ordering.
    pub fn capture_frame(&self, size: UVec2, out: &mut [f32]) -> Result<(), CaptureError> {
        self.oracle.sync_renderer();

        let viewport = self.oracle.viewport_size().ok_or(CaptureError::NoViewport)?;
        if viewport != size {
            return Err(CaptureError::SizeMismatch {
                requested: (size.x, size.y),
                actual: (viewport.x, viewport.y),
            });
        }

        let pixel_count = (size.x as usize) * (size.y as usize);
        Self::check_len(out.len(), pixel_count * 3)?;

        let pixels = self.oracle.read_frame().ok_or(CaptureError::ReadbackFailed)?;
        if pixels.len() != pixel_count {
            log::warn!(
                "frame readback returned {} pixels, expected {}",
                pixels.len(),
                pixel_count
            );
            return Err(CaptureError::ReadbackFailed);
        }

        for channel in 0..3 {
            let plane = &mut out[channel * pixel_count..(channel + 1) * pixel_count];
            for (slot, pixel) in plane.iter_mut().zip(&pixels) {
                *slot = pixel[channel] as f32 / 255.0;
            }
        }
        Ok(())
    }

    /// Object-instance segmentation: each sample is `1 + index` of the first
    /// tracked entity hit by the pixel ray, or 0 for background.
    ///
    /// `out` holds one value per sample, row-major with the given stride.
    pub fn capture_segmentation(
        &self,
        size: UVec2,
        stride: u32,
        tracked: &[EntityId],
        out: &mut [i32],
        verbose: bool,
    ) -> Result<(), CaptureError> {
        let frame = self.begin_capture(size)?;
        let grid = SampleGrid::new(size.x, size.y, stride);
        Self::check_len(out.len(), grid.len())?;

        for ((x, y), slot) in grid.pixels().zip(out.iter_mut()) {
            let ray = deproject(Vec2::new(x as f32, y as f32), &frame);
            let hit = trace_single(self.oracle, &ray, MAX_TRACE_DISTANCE, TraceChannel::Visibility);

            // First match in list order wins.
            *slot = hit
                .and_then(|hit| tracked.iter().position(|&e| e == hit.entity))
                .map_or(0, |i| i as i32 + 1);

            if verbose {
                log::trace!("({}, {}) seg: {} hit: {:?}", x, y, *slot, hit);
            }
        }
        Ok(())
    }

    /// Occlusion-inclusive object masks: for each sample and each tracked
    /// entity (in list order), 1 if the entity lies anywhere along the pixel
    /// ray, occluded or not, else 0.
    ///
    /// `out` holds `tracked.len()` values per sample.
    pub fn capture_masks(
        &self,
        size: UVec2,
        stride: u32,
        tracked: &[EntityId],
        out: &mut [u8],
        verbose: bool,
    ) -> Result<(), CaptureError> {
        let frame = self.begin_capture(size)?;
        let grid = SampleGrid::new(size.x, size.y, stride);
        Self::check_len(out.len(), grid.len() * tracked.len())?;

        if tracked.is_empty() {
            return Ok(());
        }

        for ((x, y), sample) in grid.pixels().zip(out.chunks_exact_mut(tracked.len())) {
            let ray = deproject(Vec2::new(x as f32, y as f32), &frame);
            let hits = trace_all(self.oracle, &ray, MAX_TRACE_DISTANCE);

            for (entity, slot) in tracked.iter().zip(sample.iter_mut()) {
                *slot = u8::from(hits.iter().any(|hit| hit.entity == *entity));
            }

            if verbose {
                log::trace!("({}, {}) masks: {:?} hits: {}", x, y, sample, hits.len());
            }
        }
        Ok(())
    }

    /// Dense optical flow, both as raw screen-space vectors and as an RGB
    /// visualization.
    ///
    /// `flow_out` holds 2 floats per sample, `rgb_out` 3; both row-major in
    /// the same sample order as the other kinds. `max_flow` is the magnitude
    /// at which the RGB saturation clamps to 1.
    pub fn capture_optical_flow(
        &self,
        size: UVec2,
        stride: u32,
        max_flow: f32,
        flow_out: &mut [f32],
        rgb_out: &mut [f32],
        verbose: bool,
    ) -> Result<(), CaptureError> {
        let frame = self.begin_capture(size)?;
        let observer = self.require_observer()?;
        let grid = SampleGrid::new(size.x, size.y, stride);
        Self::check_len(flow_out.len(), grid.len() * 2)?;
        Self::check_len(rgb_out.len(), grid.len() * 3)?;

        // Policy: the observer's angular velocity is treated as zero, so
        // camera rotation does not inject flow. Its velocity at every hit
        // point is therefore just its linear velocity.
        let observer_vel = match self.oracle.linear_velocity(observer.entity) {
            Some(v) => v,
            None => {
                log::warn!("observer {:?} has no velocity; assuming zero", observer.entity);
                Vec3::ZERO
            }
        };

        let samples = grid
            .pixels()
            .zip(flow_out.chunks_exact_mut(2).zip(rgb_out.chunks_exact_mut(3)));
        for ((x, y), (flow_slot, rgb_slot)) in samples {
            let pixel = Vec2::new(x as f32, y as f32);
            let ray = deproject(pixel, &frame);

            // Pixel sensitivity to near-plane movement, per screen axis.
            let screen_dx = pixel_screen_jacobian(pixel, 0, &frame);
            let screen_dy = pixel_screen_jacobian(pixel, 1, &frame);

            let hit = trace_single(self.oracle, &ray, MAX_TRACE_DISTANCE, TraceChannel::Visibility);
            // A hit entity with no obtainable velocity, precise or coarse,
            // yields zero flow at the pixel, same as a miss.
            let target_vel = hit
                .and_then(|hit| resolve_velocity(self.oracle, hit.entity, hit.point).vector());
            let flow = match (hit, target_vel) {
                (Some(hit), Some(target_vel)) => {
                    let rel_vel = target_vel - observer_vel;

                    // Drop the component along the viewing axis, then apply
                    // perspective scaling: nearer points sweep more pixels
                    // for the same world velocity.
                    let in_plane = rel_vel - rel_vel.project_onto(observer.forward);
                    let dist = (hit.point - observer.position).dot(observer.forward);
                    if dist.abs() > f32::EPSILON {
                        let scaled = in_plane / dist;
                        Vec2::new(scaled.dot(screen_dx), scaled.dot(screen_dy))
                    } else {
                        Vec2::ZERO
                    }
                }
                _ => Vec2::ZERO,
            };

            flow_slot[0] = flow.x;
            flow_slot[1] = flow.y;
            rgb_slot.copy_from_slice(&encode_flow(flow, max_flow));

            if verbose {
                log::trace!(
                    "({}, {}) flow: ({}, {}) rgb: {:?} dx: {} dy: {}",
                    x,
                    y,
                    flow.x,
                    flow.y,
                    rgb_slot,
                    screen_dx,
                    screen_dy
                );
            }
        }
        Ok(())
    }

    /// Metric depth: forward-axis distance from the observer to each pixel's
    /// nearest hit, 0 where the ray escapes the scene.
    ///
    /// This is camera-space ("z") depth, not Euclidean distance: the hit
    /// offset is projected onto the observer's forward axis.
    pub fn capture_depth(
        &self,
        size: UVec2,
        stride: u32,
        out: &mut [f32],
        verbose: bool,
    ) -> Result<(), CaptureError> {
        let frame = self.begin_capture(size)?;
        let observer = self.require_observer()?;
        let grid = SampleGrid::new(size.x, size.y, stride);
        Self::check_len(out.len(), grid.len())?;

        for ((x, y), slot) in grid.pixels().zip(out.iter_mut()) {
            let ray = deproject(Vec2::new(x as f32, y as f32), &frame);
            let hit = trace_single(self.oracle, &ray, MAX_TRACE_DISTANCE, TraceChannel::Visibility);

            *slot = hit.map_or(0.0, |hit| forward_depth(&observer, hit.point));

            if verbose {
                log::trace!("({}, {}) depth: {}", x, y, *slot);
            }
        }
        Ok(())
    }
}

/// Projection of a world point's offset from the observer onto the
/// observer's forward axis.
pub fn forward_depth(observer: &Observer, point: Vec3) -> f32 {
    (point - observer.position).dot(observer.forward)
}
