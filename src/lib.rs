pub mod bridge;
pub mod capture;
pub mod deproject;
pub mod error;
pub mod flow;
pub mod math;
pub mod query;
pub mod scenes;
pub mod stage;
pub mod traits;
pub mod types;
pub mod velocity;
pub mod view;

pub use capture::CaptureEngine;
pub use error::CaptureError;
pub use traits::SceneOracle;
pub use types::{EntityId, PixelRay, RayHit, TraceChannel, Velocity};
pub use view::CameraFrame;
