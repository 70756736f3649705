use crate::error::{BnnError, Result};
use crate::fmap::{FeatureMap, Layout};
use crate::shape::FmapShape;
use tracing::debug;

/// Surrounds every channel with a zero bit border, `padding / 2` wide on each side.
/// The output width is `width + padding`.
pub fn pad(input: &FeatureMap, padding: usize) -> Result<FeatureMap> {
    if padding % 2 != 0 {
        return Err(BnnError::OddPadding(padding));
    }
    input.expect_layout("pad", Layout::ChannelMajor)?;
    let in_shape = input.shape();
    let out_shape = FmapShape::new(in_shape.channels, in_shape.width + padding);
    let offset = padding / 2;

    let mut output = FeatureMap::zeros(out_shape, Layout::ChannelMajor);
    for (m, x, y) in in_shape.indices() {
        output.set(m, x + offset, y + offset, input.get(m, x, y));
    }
    debug!(?in_shape, ?out_shape, "pad");
    Ok(output)
}

/// Inverse of `pad`: crops the interior back out.
pub fn crop(input: &FeatureMap, padding: usize) -> Result<FeatureMap> {
    if padding % 2 != 0 {
        return Err(BnnError::OddPadding(padding));
    }
    input.expect_layout("crop", Layout::ChannelMajor)?;
    let in_shape = input.shape();
    let width = in_shape
        .width
        .checked_sub(padding)
        .ok_or(BnnError::PaddingTooWide {
            padding,
            width: in_shape.width,
        })?;
    let out_shape = FmapShape::new(in_shape.channels, width);
    let offset = padding / 2;
    let bits = out_shape
        .indices()
        .map(|(m, x, y)| input.get(m, x + offset, y + offset))
        .collect();
    FeatureMap::new(out_shape, Layout::ChannelMajor, bits)
}
