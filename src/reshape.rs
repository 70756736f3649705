use crate::error::Result;
use crate::fmap::{FeatureMap, Layout};
use tracing::debug;

/// Reorders a channel major map into the position major, channel interleaved order the
/// dense weights are laid out in. Dimensions come from the map itself.
pub fn flatten(input: &FeatureMap) -> Result<FeatureMap> {
    input.expect_layout("reshape", Layout::ChannelMajor)?;
    let shape = input.shape();
    let mut bits = vec![false; shape.len()];
    for (c, x, y) in shape.indices() {
        bits[shape.position_major(c, x, y)] = input.bits()[shape.channel_major(c, x, y)];
    }
    debug!(?shape, "reshape");
    FeatureMap::new(shape, Layout::PositionMajor, bits)
}
