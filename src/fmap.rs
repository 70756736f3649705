use crate::error::{check_len, BnnError, Result};
use crate::shape::FmapShape;
use serde::{Deserialize, Serialize};

/// How a `FeatureMap` flattens (channel, x, y). The buffer itself is not self-describing,
/// so the tag travels with it and every stage checks it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    /// `x + y*width + channel*width*width`, used by every conv stage.
    ChannelMajor,
    /// `channel + (x + y*width)*channels`, what the dense layer indexes.
    PositionMajor,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureMap {
    shape: FmapShape,
    layout: Layout,
    bits: Vec<bool>,
}

impl FeatureMap {
    pub fn new(shape: FmapShape, layout: Layout, bits: Vec<bool>) -> Result<Self> {
        check_len("feature map", shape.len(), bits.len())?;
        Ok(FeatureMap {
            shape,
            layout,
            bits,
        })
    }
    pub fn zeros(shape: FmapShape, layout: Layout) -> Self {
        FeatureMap {
            shape,
            layout,
            bits: vec![false; shape.len()],
        }
    }
    /// A flat vector of `n` bits, e.g. dense layer input or output.
    /// With a width of 1 both layouts coincide.
    pub fn flat(bits: Vec<bool>) -> Self {
        FeatureMap {
            shape: FmapShape::new(bits.len(), 1),
            layout: Layout::PositionMajor,
            bits,
        }
    }
    /// Binarizes a single channel of 8 bit grayscale pixels, row major, bit = pixel > cutoff.
    pub fn from_pixels(pixels: &[u8], width: usize, cutoff: u8) -> Result<Self> {
        check_len("pixels", width * width, pixels.len())?;
        let bits = pixels.iter().map(|&p| p > cutoff).collect();
        FeatureMap::new(FmapShape::new(1, width), Layout::ChannelMajor, bits)
    }
    pub fn shape(&self) -> FmapShape {
        self.shape
    }
    pub fn layout(&self) -> Layout {
        self.layout
    }
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }
    pub fn into_bits(self) -> Vec<bool> {
        self.bits
    }
    pub fn len(&self) -> usize {
        self.bits.len()
    }
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }
    pub fn get(&self, c: usize, x: usize, y: usize) -> bool {
        self.bits[self.index(c, x, y)]
    }
    pub fn set(&mut self, c: usize, x: usize, y: usize, bit: bool) {
        let i = self.index(c, x, y);
        self.bits[i] = bit;
    }
    fn index(&self, c: usize, x: usize, y: usize) -> usize {
        match self.layout {
            Layout::ChannelMajor => self.shape.channel_major(c, x, y),
            Layout::PositionMajor => self.shape.position_major(c, x, y),
        }
    }
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
    /// Index of the set bit of a one-hot map, `None` if no bit is set.
    pub fn argmax(&self) -> Option<usize> {
        self.bits.iter().position(|&b| b)
    }

    pub(crate) fn expect_layout(&self, stage: &'static str, expected: Layout) -> Result<()> {
        // a single pixel per channel reads the same either way
        if self.layout == expected || self.shape.width == 1 {
            Ok(())
        } else {
            Err(BnnError::LayoutMismatch {
                stage,
                expected,
                actual: self.layout,
            })
        }
    }
}
