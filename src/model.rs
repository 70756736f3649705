use crate::config::NetConfig;
use crate::conv::{ConvDims, ConvLayer, Threshold};
use crate::dense::DenseLayer;
use crate::error::Result;
use bincode::{deserialize_from, serialize_into};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ConvParams {
    pub weights: Vec<bool>,
    pub thresholds: Vec<Threshold>,
}

impl ConvParams {
    /// Random weights with thresholds drawn from the reachable bipolar sum range.
    pub fn rand<R: Rng>(dims: &ConvDims, rng: &mut R) -> Self {
        let fan_in = (dims.kernel * dims.kernel * dims.in_channels) as Threshold;
        ConvParams {
            weights: (0..dims.n_weights()).map(|_| rng.gen()).collect(),
            thresholds: (0..dims.n_thresholds())
                .map(|_| rng.gen_range(-fan_in / 4..=fan_in / 4))
                .collect(),
        }
    }
    pub fn build(self, dims: ConvDims) -> Result<ConvLayer> {
        ConvLayer::new(dims, self.weights, self.thresholds)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DenseParams {
    pub weights: Vec<bool>,
    pub bias: Vec<f32>,
}

impl DenseParams {
    pub fn rand<R: Rng>(inputs: usize, outputs: usize, rng: &mut R) -> Self {
        DenseParams {
            weights: (0..inputs * outputs).map(|_| rng.gen()).collect(),
            bias: (0..outputs).map(|_| rng.gen_range(-0.5f32..0.5f32)).collect(),
        }
    }
    pub fn build(&self, inputs: usize, outputs: usize) -> Result<DenseLayer> {
        DenseLayer::new(inputs, outputs, &self.weights, self.bias.clone())
    }
}

/// Every constant tensor of the network together with the architecture it belongs to.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelParams {
    pub config: NetConfig,
    pub conv1: ConvParams,
    pub conv2: ConvParams,
    pub dense1: DenseParams,
    pub dense2: DenseParams,
}

impl ModelParams {
    /// Random model of the right shape for `config`, which must validate.
    pub fn rand<R: Rng>(config: NetConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;
        Ok(ModelParams {
            config,
            conv1: ConvParams::rand(&config.conv1(), rng),
            conv2: ConvParams::rand(&config.conv2(), rng),
            dense1: DenseParams::rand(config.flat_len(), config.hidden, rng),
            dense2: DenseParams::rand(config.hidden, config.classes, rng),
        })
    }
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        serialize_into(&mut file, self)?;
        file.flush()?;
        info!(?path, "saved model");
        Ok(())
    }
    pub fn load(path: &Path) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        let params: ModelParams = deserialize_from(file)?;
        info!(?path, config = ?params.config, "loaded model");
        Ok(params)
    }
}
