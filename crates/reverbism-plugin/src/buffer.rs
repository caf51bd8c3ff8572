//! Non-interleaved audio buffer handed to the block processor.

/// Owned, channel-major block of `f32` samples.
///
/// Every channel has the same length. The host fills it, the plugin
/// transforms it in place.
///
/// # Example
///
/// ```rust
/// use reverbism_plugin::AudioBuffer;
///
/// let mut buffer = AudioBuffer::new(2, 64);
/// buffer.channel_mut(0)[0] = 1.0;
/// let (left, right) = buffer.stereo_mut().unwrap();
/// assert_eq!(left[0], 1.0);
/// assert_eq!(right[0], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioBuffer {
    data: Vec<f32>,
    num_channels: usize,
    num_samples: usize,
}

impl AudioBuffer {
    /// Silent buffer.
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            data: vec![0.0; num_channels * num_samples],
            num_channels,
            num_samples,
        }
    }

    /// Copy channels into a buffer. Shorter channels are padded with silence.
    pub fn from_channels<C: AsRef<[f32]>>(channels: &[C]) -> Self {
        let num_samples = channels.iter().map(|c| c.as_ref().len()).max().unwrap_or(0);
        let mut buffer = Self::new(channels.len(), num_samples);
        for (index, channel) in channels.iter().enumerate() {
            let channel = channel.as_ref();
            buffer.channel_mut(index)[..channel.len()].copy_from_slice(channel);
        }
        buffer
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// Samples per channel.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Samples of one channel. Panics if `index` is out of range.
    pub fn channel(&self, index: usize) -> &[f32] {
        assert!(index < self.num_channels, "channel {index} out of range");
        let start = index * self.num_samples;
        &self.data[start..start + self.num_samples]
    }

    /// Mutable samples of one channel. Panics if `index` is out of range.
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        assert!(index < self.num_channels, "channel {index} out of range");
        let start = index * self.num_samples;
        &mut self.data[start..start + self.num_samples]
    }

    /// The first two channels, borrowed together.
    pub fn stereo_mut(&mut self) -> Option<(&mut [f32], &mut [f32])> {
        if self.num_channels < 2 {
            return None;
        }
        let (left, rest) = self.data.split_at_mut(self.num_samples);
        Some((left, &mut rest[..self.num_samples]))
    }

    /// Zero one channel. Out-of-range indices are ignored.
    pub fn clear_channel(&mut self, index: usize) {
        if index < self.num_channels {
            self.channel_mut(index).fill(0.0);
        }
    }

    /// Zero every channel.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Iterate over channels.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.num_channels).map(move |index| self.channel(index))
    }

    /// Copy every channel out.
    pub fn to_channels(&self) -> Vec<Vec<f32>> {
        (0..self.num_channels).map(|i| self.channel(i).to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_channels_pads_short_channels() {
        let buffer = AudioBuffer::from_channels(&[vec![1.0, 2.0, 3.0], vec![4.0]]);
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.num_samples(), 3);
        assert_eq!(buffer.channel(1), &[4.0, 0.0, 0.0]);
    }

    #[test]
    fn test_stereo_mut_splits_first_two_channels() {
        let mut buffer = AudioBuffer::from_channels(&[[1.0f32, 1.0], [2.0, 2.0], [3.0, 3.0]]);
        let (left, right) = buffer.stereo_mut().unwrap();
        left[0] = 10.0;
        right[1] = 20.0;
        assert_eq!(buffer.to_channels(), vec![vec![10.0, 1.0], vec![2.0, 20.0], vec![3.0, 3.0]]);

        assert!(AudioBuffer::new(1, 8).stereo_mut().is_none());
    }

    #[test]
    fn test_clear_channel_ignores_missing_channels() {
        let mut buffer = AudioBuffer::from_channels(&[[1.0f32; 4], [1.0; 4]]);
        buffer.clear_channel(1);
        buffer.clear_channel(5);
        assert_eq!(buffer.channel(0), &[1.0; 4]);
        assert_eq!(buffer.channel(1), &[0.0; 4]);
    }

    #[test]
    fn test_channels_iterates_in_order() {
        let buffer = AudioBuffer::from_channels(&[[1.0f32], [2.0], [3.0]]);
        let firsts: Vec<f32> = buffer.channels().map(|c| c[0]).collect();
        assert_eq!(firsts, [1.0, 2.0, 3.0]);
        assert_eq!(AudioBuffer::new(0, 0).channels().count(), 0);
    }
}
