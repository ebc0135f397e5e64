/// Number of samples a strided sweep takes along one image axis:
/// pixels 0, S, 2S, ... below `extent`, i.e. ceil(extent / stride).
pub fn samples_along(extent: u32, stride: u32) -> usize {
    debug_assert!(stride >= 1);
    extent.div_ceil(stride) as usize
}

/// Row-major pixel sampling grid: y-major, x-minor, both stepping by the
/// stride. The traversal order is part of the output buffer contract.
#[derive(Copy, Clone, Debug)]
pub struct SampleGrid {
    width: u32,
    height: u32,
    stride: u32,
}

impl SampleGrid {
    pub fn new(width: u32, height: u32, stride: u32) -> Self {
        Self {
            width,
            height,
            stride: stride.max(1),
        }
    }

    /// Samples per row.
    pub fn cols(&self) -> usize {
        samples_along(self.width, self.stride)
    }

    /// Number of sampled rows.
    pub fn rows(&self) -> usize {
        samples_along(self.height, self.stride)
    }

    /// Total sample count.
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate sampled pixel coordinates in buffer order.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (width, stride) = (self.width, self.stride);
        (0..self.height)
            .step_by(self.stride as usize)
            .flat_map(move |y| (0..width).step_by(stride as usize).map(move |x| (x, y)))
    }
}
