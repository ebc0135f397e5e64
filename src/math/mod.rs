mod color;
mod grid;

pub use color::hsv_to_rgb;
pub use grid::{samples_along, SampleGrid};
