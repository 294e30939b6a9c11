// Planar audio scratch buffer, reused across blocks

/// Pre-allocated planar f32 buffer (channels x frames)
///
/// Allocated once at stream start, sized for the largest block the device
/// can deliver, then cleared and reused every callback. Nothing in the
/// real-time path grows it.
pub struct BlockBuffer {
    channels: usize,
    max_frames: usize,
    data: Vec<f32>,
}

impl BlockBuffer {
    pub fn new(channels: usize, max_frames: usize) -> Self {
        assert!(channels > 0, "Buffer needs at least one channel");
        assert!(max_frames > 0, "Buffer needs a nonzero capacity");

        Self {
            channels,
            max_frames,
            data: vec![0.0; channels * max_frames],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels
    }

    pub fn max_frames(&self) -> usize {
        self.max_frames
    }

    /// Zero all samples
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        let start = channel * self.max_frames;
        &self.data[start..start + self.max_frames]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let start = channel * self.max_frames;
        &mut self.data[start..start + self.max_frames]
    }

    /// Single sample accessor used when interleaving into the device buffer
    #[inline]
    pub fn sample(&self, channel: usize, frame: usize) -> f32 {
        self.data[channel * self.max_frames + frame]
    }
}
