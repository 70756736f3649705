use crate::conv::ConvDims;
use crate::error::{BnnError, Result};
use crate::shape::FmapShape;
use serde::{Deserialize, Serialize};

/// Architecture constants of the two conv, two dense network.
///
/// input -> pad -> conv1 -> pool -> pad -> conv2 -> pool -> reshape -> dense1 (relu) -> dense2 (argmax)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetConfig {
    pub input_width: usize,
    pub kernel: usize,
    pub padding: usize,
    pub conv1_channels: usize,
    pub conv2_channels: usize,
    pub hidden: usize,
    pub classes: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        NetConfig {
            input_width: 16,
            kernel: 3,
            padding: 2,
            conv1_channels: 16,
            conv2_channels: 32,
            hidden: 256,
            classes: 10,
        }
    }
}

impl NetConfig {
    pub fn conv1(&self) -> ConvDims {
        ConvDims {
            in_channels: 1,
            out_channels: self.conv1_channels,
            input_width: self.input_width + self.padding,
            kernel: self.kernel,
            padding: self.padding,
        }
    }
    pub fn conv2(&self) -> ConvDims {
        ConvDims {
            in_channels: self.conv1_channels,
            out_channels: self.conv2_channels,
            input_width: self.conv1().output_width() / 2 + self.padding,
            kernel: self.kernel,
            padding: self.padding,
        }
    }
    /// Shape of the last pooled feature map, the dense input before reshaping.
    pub fn final_fmap(&self) -> FmapShape {
        FmapShape::new(self.conv2_channels, self.conv2().output_width() / 2)
    }
    pub fn flat_len(&self) -> usize {
        self.final_fmap().len()
    }
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(BnnError::InvalidConfig(msg));
        if self.padding % 2 != 0 {
            return Err(BnnError::OddPadding(self.padding));
        }
        if self.kernel == 0 || self.kernel > self.input_width + self.padding {
            return invalid(format!(
                "kernel {} does not fit input width {}",
                self.kernel, self.input_width
            ));
        }
        let conv1_out = self.conv1().output_width();
        if conv1_out % 2 != 0 {
            return invalid(format!("conv1 output width {} is odd", conv1_out));
        }
        let conv2 = self.conv2();
        if self.kernel > conv2.input_width {
            return invalid(format!(
                "kernel {} does not fit conv2 input width {}",
                self.kernel, conv2.input_width
            ));
        }
        if conv2.output_width() % 2 != 0 {
            return invalid(format!("conv2 output width {} is odd", conv2.output_width()));
        }
        if self.flat_len() == 0 || self.hidden == 0 {
            return Err(BnnError::ZeroInputs);
        }
        if self.classes == 0 {
            return invalid("no classes".to_string());
        }
        Ok(())
    }
}
