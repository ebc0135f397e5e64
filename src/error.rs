//! Capture error types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CaptureError {
    #[error("No viewport attached")]
    NoViewport,

    #[error("No controllable camera")]
    NoCamera,

    #[error("No observer entity")]
    NoObserver,

    #[error("Requested size {requested:?} does not match live viewport {actual:?}")]
    SizeMismatch {
        requested: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Output buffer holds {actual} elements, expected {expected}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Frame readback failed")]
    ReadbackFailed,
}
