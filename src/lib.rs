//! Forward pass of a small binarized conv net.
//!
//! Weights and activations are single bits; every multiply-accumulate becomes an
//! XNOR-popcount, and batchnorm is folded into integer thresholds so the conv layers never
//! touch floats. Stages are pure functions of their input map and constant tensors:
//! `pad`, `conv`, `pool`, `reshape` and `dense`. `Network` chains them for the fixed
//! two conv, two dense architecture described by `NetConfig`.

pub mod bits;
pub mod config;
pub mod conv;
pub mod dense;
pub mod error;
pub mod fmap;
pub mod model;
pub mod network;
pub mod pad;
pub mod pool;
pub mod reshape;
pub mod shape;

pub use crate::config::NetConfig;
pub use crate::conv::{ConvDims, ConvLayer, Threshold};
pub use crate::dense::{Activation, DenseLayer};
pub use crate::error::{BnnError, Result};
pub use crate::fmap::{FeatureMap, Layout};
pub use crate::model::{ConvParams, DenseParams, ModelParams};
pub use crate::network::Network;
pub use crate::shape::FmapShape;
