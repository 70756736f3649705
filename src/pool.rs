use crate::error::{BnnError, Result};
use crate::fmap::{FeatureMap, Layout};
use crate::shape::FmapShape;
use tracing::debug;

/// 2x2 max pool with stride 2. Over single bits the max of a block is the OR of its four pixels.
pub fn or_pool(input: &FeatureMap) -> Result<FeatureMap> {
    input.expect_layout("pool", Layout::ChannelMajor)?;
    let in_shape = input.shape();
    if in_shape.width % 2 != 0 {
        return Err(BnnError::OddWidth(in_shape.width));
    }
    let out_shape = FmapShape::new(in_shape.channels, in_shape.width / 2);
    let mut output = FeatureMap::zeros(out_shape, Layout::ChannelMajor);
    for (m, x, y) in out_shape.indices() {
        let x_index = x * 2;
        let y_index = y * 2;
        let max = input.get(m, x_index + 0, y_index + 0)
            | input.get(m, x_index + 1, y_index + 0)
            | input.get(m, x_index + 0, y_index + 1)
            | input.get(m, x_index + 1, y_index + 1);
        output.set(m, x, y, max);
    }
    debug!(?in_shape, ?out_shape, "pool");
    Ok(output)
}
