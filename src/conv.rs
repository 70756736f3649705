use crate::bits::bipolar_sum;
use crate::error::{check_len, BnnError, Result};
use crate::fmap::{FeatureMap, Layout};
use crate::shape::FmapShape;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Folded batchnorm boundary, in the same bipolar sum space as the conv accumulator.
pub type Threshold = i16;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvDims {
    /// M
    pub in_channels: usize,
    /// N
    pub out_channels: usize,
    /// I, already including any padding.
    pub input_width: usize,
    /// F
    pub kernel: usize,
    /// Border width the input was padded with; those pixels are left out of the sum.
    pub padding: usize,
}

impl ConvDims {
    /// Zero when the kernel does not fit; `validate` rejects those dims.
    pub fn output_width(&self) -> usize {
        (self.input_width + 1).saturating_sub(self.kernel)
    }
    pub fn input_shape(&self) -> FmapShape {
        FmapShape::new(self.in_channels, self.input_width)
    }
    pub fn output_shape(&self) -> FmapShape {
        FmapShape::new(self.out_channels, self.output_width())
    }
    pub fn n_weights(&self) -> usize {
        self.kernel * self.kernel * self.in_channels * self.out_channels
    }
    pub fn n_thresholds(&self) -> usize {
        self.output_shape().len()
    }
    pub fn validate(&self) -> Result<()> {
        if self.padding % 2 != 0 {
            return Err(BnnError::OddPadding(self.padding));
        }
        if self.kernel == 0 || self.kernel > self.input_width {
            return Err(BnnError::KernelTooLarge {
                kernel: self.kernel,
                width: self.input_width,
            });
        }
        Ok(())
    }
}

/// Binarized convolution over any number of input channels; M = 1 is the first layer.
///
/// Weights are indexed `c + r*F + (n + m*N)*F*F` for kernel column c, kernel row r,
/// output channel n and input channel m. Thresholds share the output index
/// `x + y*O + n*O*O`.
#[derive(Debug, Clone)]
pub struct ConvLayer {
    dims: ConvDims,
    weights: Vec<bool>,
    thresholds: Vec<Threshold>,
}

impl ConvLayer {
    pub fn new(dims: ConvDims, weights: Vec<bool>, thresholds: Vec<Threshold>) -> Result<Self> {
        dims.validate()?;
        check_len("conv weights", dims.n_weights(), weights.len())?;
        check_len("conv thresholds", dims.n_thresholds(), thresholds.len())?;
        Ok(ConvLayer {
            dims,
            weights,
            thresholds,
        })
    }
    pub fn dims(&self) -> &ConvDims {
        &self.dims
    }
    pub fn threshold(&self, n: usize, x: usize, y: usize) -> Result<Threshold> {
        self.check_output(n, x, y)?;
        Ok(self.thresholds[self.dims.output_shape().channel_major(n, x, y)])
    }
    fn check_input(&self, input: &FeatureMap) -> Result<()> {
        input.expect_layout("conv", Layout::ChannelMajor)?;
        let in_shape = self.dims.input_shape();
        if input.shape() != in_shape {
            return Err(BnnError::FmapMismatch {
                stage: "conv",
                expected: in_shape,
                actual: input.shape(),
            });
        }
        Ok(())
    }
    fn check_output(&self, n: usize, x: usize, y: usize) -> Result<()> {
        let o = self.dims.output_width();
        let out_of_range = |what, index, bound| Err(BnnError::OutOfRange { what, index, bound });
        if n >= self.dims.out_channels {
            return out_of_range("output channel", n, self.dims.out_channels);
        }
        if x >= o {
            return out_of_range("output x", x, o);
        }
        if y >= o {
            return out_of_range("output y", y, o);
        }
        Ok(())
    }
    fn is_interior(&self, x: usize, y: usize) -> bool {
        let lo = self.dims.padding / 2;
        let hi = self.dims.input_width.saturating_sub(lo);
        x >= lo && x < hi && y >= lo && y < hi
    }
    /// Bipolar sum for output (n, x, y), accumulated over all input channels.
    /// Each channel contributes `2*matches - valid` where `valid` counts the non padding
    /// window positions.
    pub fn signed_sum(&self, input: &FeatureMap, n: usize, x: usize, y: usize) -> Result<i32> {
        self.check_input(input)?;
        self.check_output(n, x, y)?;
        Ok(self.window_sum(input.bits(), n, x, y))
    }
    // callers have checked the input shape and output position
    fn window_sum(&self, input: &[bool], n: usize, x: usize, y: usize) -> i32 {
        let ConvDims {
            in_channels,
            out_channels,
            input_width,
            kernel,
            ..
        } = self.dims;
        let window = kernel * kernel;
        let plane = input_width * input_width;
        let mut sum = 0i32;
        for m in 0..in_channels {
            let mut matches = 0u32;
            let mut valid = 0u32;
            for c in 0..kernel {
                for r in 0..kernel {
                    if self.is_interior(x + c, y + r) {
                        let i_index = x + c + (y + r) * input_width + m * plane;
                        let w_index = c + r * kernel + (n + m * out_channels) * window;
                        // XNOR
                        matches += (input[i_index] == self.weights[w_index]) as u32;
                        valid += 1;
                    }
                }
            }
            sum += bipolar_sum(matches, valid);
        }
        sum
    }
    /// Output channels are computed in parallel; each output bit is written exactly once
    /// so the result does not depend on scheduling.
    pub fn forward(&self, input: &FeatureMap) -> Result<FeatureMap> {
        self.check_input(input)?;
        let in_shape = self.dims.input_shape();
        let out_shape = self.dims.output_shape();
        let o = out_shape.width;
        let plane = out_shape.plane();
        let mut bits = vec![false; out_shape.len()];
        bits.par_chunks_mut(plane)
            .enumerate()
            .for_each(|(n, out_plane)| {
                for y in 0..o {
                    for x in 0..o {
                        let sum = self.window_sum(input.bits(), n, x, y);
                        out_plane[x + y * o] = sum > self.thresholds[x + y * o + n * plane] as i32;
                    }
                }
            });
        debug!(?in_shape, ?out_shape, "conv");
        FeatureMap::new(out_shape, Layout::ChannelMajor, bits)
    }
}
