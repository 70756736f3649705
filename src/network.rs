use crate::config::NetConfig;
use crate::conv::ConvLayer;
use crate::dense::{Activation, DenseLayer};
use crate::error::{BnnError, Result};
use crate::fmap::FeatureMap;
use crate::model::ModelParams;
use crate::pad::pad;
use crate::pool::or_pool;
use crate::reshape::flatten;
use crate::shape::FmapShape;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

/// The full forward pass. Holds no state between invocations.
#[derive(Debug, Clone)]
pub struct Network {
    config: NetConfig,
    conv1: ConvLayer,
    conv2: ConvLayer,
    dense1: DenseLayer,
    dense2: DenseLayer,
}

impl Network {
    pub fn new(params: ModelParams) -> Result<Self> {
        let config = params.config;
        config.validate()?;
        Ok(Network {
            conv1: params.conv1.build(config.conv1())?,
            conv2: params.conv2.build(config.conv2())?,
            dense1: params.dense1.build(config.flat_len(), config.hidden)?,
            dense2: params.dense2.build(config.hidden, config.classes)?,
            config,
        })
    }
    pub fn config(&self) -> &NetConfig {
        &self.config
    }
    pub fn input_shape(&self) -> FmapShape {
        FmapShape::new(1, self.config.input_width)
    }
    /// Feature map entering the dense layers, in position major order.
    pub fn features(&self, input: &FeatureMap) -> Result<FeatureMap> {
        if input.shape() != self.input_shape() {
            return Err(BnnError::FmapMismatch {
                stage: "network",
                expected: self.input_shape(),
                actual: input.shape(),
            });
        }
        let padding = self.config.padding;
        let fmap = self.conv1.forward(&pad(input, padding)?)?;
        let fmap = or_pool(&fmap)?;
        let fmap = self.conv2.forward(&pad(&fmap, padding)?)?;
        let fmap = or_pool(&fmap)?;
        flatten(&fmap)
    }
    /// One hot class scores.
    pub fn forward(&self, input: &FeatureMap) -> Result<FeatureMap> {
        let hidden = self.dense1.forward(&self.features(input)?, Activation::Relu)?;
        self.dense2.forward(&hidden, Activation::ArgMax)
    }
    pub fn classify(&self, input: &FeatureMap) -> Result<usize> {
        winner(&self.forward(input)?)
    }
    /// Classifies images in parallel. Results are in input order.
    pub fn classify_batch(&self, inputs: &[FeatureMap]) -> Result<Vec<usize>> {
        let start = Instant::now();
        let chunk_size = (inputs.len() / num_cpus::get_physical()).max(1);
        let classes: Vec<usize> = inputs
            .par_chunks(chunk_size)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|input| self.classify(input))
                    .collect::<Result<Vec<usize>>>()
            })
            .collect::<Result<Vec<Vec<usize>>>>()?
            .into_iter()
            .flatten()
            .collect();
        info!(n_images = inputs.len(), elapsed = ?start.elapsed(), "classified batch");
        Ok(classes)
    }
    /// Binarizes 8 bit grayscale pixels and classifies them.
    pub fn classify_pixels(&self, pixels: &[u8], cutoff: u8) -> Result<usize> {
        let input = FeatureMap::from_pixels(pixels, self.config.input_width, cutoff)?;
        self.classify(&input)
    }
}

// finite biases always produce a winner, but an empty score map must never read as class 0
fn winner(scores: &FeatureMap) -> Result<usize> {
    scores.argmax().ok_or(BnnError::NoWinner)
}
