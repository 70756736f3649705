use crate::bits::{bipolar_sum, pack, packed_matches};
use crate::error::{check_len, BnnError, Result};
use crate::fmap::{FeatureMap, Layout};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// bit = activation > 0
    Relu,
    /// One hot on the first unit to reach the maximum activation. Used by the output layer.
    ArgMax,
}

/// Fully connected binarized layer with a float bias.
///
/// The flat weights are indexed `m * N + n`; at construction each unit's column is
/// bitpacked into its own row of u64 words so the inner product is a word wise XNOR-popcount.
#[derive(Debug, Clone)]
pub struct DenseLayer {
    inputs: usize,
    rows: Vec<Vec<u64>>,
    bias: Vec<f32>,
    // sqrt(2 / M)
    scale: f32,
}

impl DenseLayer {
    pub fn new(inputs: usize, outputs: usize, weights: &[bool], bias: Vec<f32>) -> Result<Self> {
        if inputs == 0 {
            return Err(BnnError::ZeroInputs);
        }
        check_len("dense weights", inputs * outputs, weights.len())?;
        check_len("dense bias", outputs, bias.len())?;
        if let Some((unit, &value)) = bias.iter().enumerate().find(|(_, b)| !b.is_finite()) {
            return Err(BnnError::NonFiniteBias { unit, value });
        }
        let rows = (0..outputs)
            .map(|n| {
                let column: Vec<bool> = (0..inputs).map(|m| weights[m * outputs + n]).collect();
                pack(&column)
            })
            .collect();
        Ok(DenseLayer {
            inputs,
            rows,
            bias,
            scale: (2f32 / inputs as f32).sqrt(),
        })
    }
    pub fn inputs(&self) -> usize {
        self.inputs
    }
    pub fn outputs(&self) -> usize {
        self.rows.len()
    }
    /// `(2*matches - M) * sqrt(2/M) + bias[n]` for every unit n.
    pub fn activations(&self, input: &FeatureMap) -> Result<Vec<f32>> {
        input.expect_layout("dense", Layout::PositionMajor)?;
        check_len("dense input", self.inputs, input.len())?;
        let packed = pack(input.bits());
        Ok(self
            .rows
            .iter()
            .zip(self.bias.iter())
            .map(|(row, bias)| {
                let matches = packed_matches(&packed, row, self.inputs);
                bipolar_sum(matches, self.inputs as u32) as f32 * self.scale + bias
            })
            .collect())
    }
    pub fn forward(&self, input: &FeatureMap, activation: Activation) -> Result<FeatureMap> {
        let acts = self.activations(input)?;
        let bits = match activation {
            Activation::Relu => acts.iter().map(|&a| a > 0f32).collect(),
            Activation::ArgMax => {
                let mut bits = vec![false; acts.len()];
                if let Some(winner) = first_max(&acts) {
                    bits[winner] = true;
                }
                bits
            }
        };
        debug!(inputs = self.inputs, outputs = self.outputs(), ?activation, "dense");
        Ok(FeatureMap::flat(bits))
    }
}

/// Streams over `acts` keeping a strict running maximum, so on ties the earliest unit wins.
/// NaN never wins; `None` only if nothing beats negative infinity.
pub fn first_max(acts: &[f32]) -> Option<usize> {
    let mut max = f32::NEG_INFINITY;
    let mut winner = None;
    for (n, &act) in acts.iter().enumerate() {
        if act.is_nan() {
            warn!(unit = n, "NaN activation");
        }
        if act > max {
            max = act;
            winner = Some(n);
        }
    }
    winner
}
