//! Error types for building and running the inference pipeline.

use crate::fmap::Layout;
use crate::shape::FmapShape;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BnnError>;

/// Shape and layout variants are violated preconditions, caught before any stage indexes out of range.
#[derive(Debug, Error)]
pub enum BnnError {
    #[error("{what}: expected {expected} elements, got {actual}")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{stage} expects a {expected:?} input, got {actual:?}")]
    FmapMismatch {
        stage: &'static str,
        expected: FmapShape,
        actual: FmapShape,
    },

    #[error("{stage} expects a {expected:?} feature map, got {actual:?}")]
    LayoutMismatch {
        stage: &'static str,
        expected: Layout,
        actual: Layout,
    },

    #[error("{what} index {index} out of range 0..{bound}")]
    OutOfRange {
        what: &'static str,
        index: usize,
        bound: usize,
    },

    #[error("padding {padding} is wider than the map width {width}")]
    PaddingTooWide { padding: usize, width: usize },

    #[error("dense bias of unit {unit} is not finite: {value}")]
    NonFiniteBias { unit: usize, value: f32 },

    #[error("no output unit has a finite activation")]
    NoWinner,

    #[error("padding must be even, got {0}")]
    OddPadding(usize),

    #[error("pooling needs an even width, got {0}")]
    OddWidth(usize),

    #[error("kernel width {kernel} does not fit input width {width}")]
    KernelTooLarge { kernel: usize, width: usize },

    #[error("dense layer needs at least one input")]
    ZeroInputs,

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("model codec: {0}")]
    Codec(#[from] bincode::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl BnnError {
    pub fn shape(what: &'static str, expected: usize, actual: usize) -> Self {
        BnnError::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }
}

/// Returns `Err(ShapeMismatch)` unless `actual == expected`.
pub fn check_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(BnnError::shape(what, expected, actual))
    }
}
