//! Boolean-returning capture entry points over raw byte buffers.
//!
//! This is the surface a scripting bridge calls: flat caller-allocated
//! buffers, positional arguments, and a success flag. On `false` the buffer
//! contents must not be trusted. Byte buffers are reinterpreted in place
//! with bytemuck; a misaligned or odd-sized buffer fails the call the same
//! way a wrongly-sized one does.

use glam::UVec2;

use crate::capture::CaptureEngine;
use crate::traits::SceneOracle;
use crate::types::EntityId;

fn report<E: std::fmt::Display>(operation: &str, err: E) -> bool {
    log::error!("{} failed: {}", operation, err);
    false
}

pub fn capture_frame<O: SceneOracle>(oracle: &O, width: u32, height: u32, out: &mut [u8]) -> bool {
    let out: &mut [f32] = match bytemuck::try_cast_slice_mut(out) {
        Ok(out) => out,
        Err(err) => return report("screenshot", err),
    };
    match CaptureEngine::new(oracle).capture_frame(UVec2::new(width, height), out) {
        Ok(()) => true,
        Err(err) => report("screenshot", err),
    }
}

pub fn capture_segmentation<O: SceneOracle>(
    oracle: &O,
    width: u32,
    height: u32,
    stride: u32,
    tracked: &[EntityId],
    out: &mut [u8],
    verbose: bool,
) -> bool {
    let out: &mut [i32] = match bytemuck::try_cast_slice_mut(out) {
        Ok(out) => out,
        Err(err) => return report("segmentation", err),
    };
    let size = UVec2::new(width, height);
    match CaptureEngine::new(oracle).capture_segmentation(size, stride, tracked, out, verbose) {
        Ok(()) => true,
        Err(err) => report("segmentation", err),
    }
}

pub fn capture_masks<O: SceneOracle>(
    oracle: &O,
    width: u32,
    height: u32,
    stride: u32,
    tracked: &[EntityId],
    out: &mut [u8],
    verbose: bool,
) -> bool {
    let size = UVec2::new(width, height);
    match CaptureEngine::new(oracle).capture_masks(size, stride, tracked, out, verbose) {
        Ok(()) => true,
        Err(err) => report("masks", err),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn capture_optical_flow<O: SceneOracle>(
    oracle: &O,
    width: u32,
    height: u32,
    stride: u32,
    max_flow: f32,
    flow_out: &mut [u8],
    rgb_out: &mut [u8],
    verbose: bool,
) -> bool {
    let flow_out: &mut [f32] = match bytemuck::try_cast_slice_mut(flow_out) {
        Ok(out) => out,
        Err(err) => return report("optical flow", err),
    };
    let rgb_out: &mut [f32] = match bytemuck::try_cast_slice_mut(rgb_out) {
        Ok(out) => out,
        Err(err) => return report("optical flow", err),
    };
    let size = UVec2::new(width, height);
    match CaptureEngine::new(oracle)
        .capture_optical_flow(size, stride, max_flow, flow_out, rgb_out, verbose)
    {
        Ok(()) => true,
        Err(err) => report("optical flow", err),
    }
}

pub fn capture_depth<O: SceneOracle>(
    oracle: &O,
    width: u32,
    height: u32,
    stride: u32,
    out: &mut [u8],
    verbose: bool,
) -> bool {
    let out: &mut [f32] = match bytemuck::try_cast_slice_mut(out) {
        Ok(out) => out,
        Err(err) => return report("depth", err),
    };
    let size = UVec2::new(width, height);
    match CaptureEngine::new(oracle).capture_depth(size, stride, out, verbose) {
        Ok(()) => true,
        Err(err) => report("depth", err),
    }
}
