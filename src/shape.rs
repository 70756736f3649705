use serde::{Deserialize, Serialize};

/// Square feature map dimensions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FmapShape {
    pub channels: usize,
    pub width: usize,
}

impl FmapShape {
    pub fn new(channels: usize, width: usize) -> Self {
        FmapShape { channels, width }
    }
    pub fn plane(&self) -> usize {
        self.width * self.width
    }
    pub fn len(&self) -> usize {
        self.channels * self.plane()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// `x + y*width + channel*width*width`
    pub fn channel_major(&self, c: usize, x: usize, y: usize) -> usize {
        x + y * self.width + c * self.plane()
    }
    /// `channel + (x + y*width)*channels`
    pub fn position_major(&self, c: usize, x: usize, y: usize) -> usize {
        c + (x + y * self.width) * self.channels
    }
    /// Iterates (c, x, y) in channel-major storage order.
    pub fn indices(&self) -> impl Iterator<Item = (usize, usize, usize)> {
        let FmapShape { channels, width } = *self;
        (0..channels).flat_map(move |c| {
            (0..width).flat_map(move |y| (0..width).map(move |x| (c, x, y)))
        })
    }
}
