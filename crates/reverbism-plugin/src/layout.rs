//! Bus layout negotiation.
//!
//! The plugin has one main input bus and one main output bus. It accepts
//! mono or stereo output and requires the input to match the output.

/// Channel arrangement of one bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelSet {
    /// Bus switched off.
    Disabled,
    /// One channel.
    Mono,
    /// Left and right.
    #[default]
    Stereo,
    /// Any other channel count without speaker positions.
    Discrete(u32),
}

impl ChannelSet {
    /// Number of channels on the bus.
    pub const fn size(self) -> usize {
        match self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(n) => n as usize,
        }
    }

    /// Canonical set for a channel count.
    pub const fn from_count(count: u32) -> Self {
        match count {
            0 => ChannelSet::Disabled,
            1 => ChannelSet::Mono,
            2 => ChannelSet::Stereo,
            n => ChannelSet::Discrete(n),
        }
    }
}

/// Main input and output bus arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusesLayout {
    /// Main input bus.
    pub input: ChannelSet,
    /// Main output bus.
    pub output: ChannelSet,
}

impl BusesLayout {
    /// Stereo in, stereo out.
    pub const STEREO: Self = Self {
        input: ChannelSet::Stereo,
        output: ChannelSet::Stereo,
    };

    /// Mono in, mono out.
    pub const MONO: Self = Self {
        input: ChannelSet::Mono,
        output: ChannelSet::Mono,
    };

    /// Same arrangement on both buses.
    pub const fn symmetric(set: ChannelSet) -> Self {
        Self {
            input: set,
            output: set,
        }
    }

    /// Whether this layout can be processed.
    ///
    /// ```rust
    /// use reverbism_plugin::{BusesLayout, ChannelSet};
    ///
    /// assert!(BusesLayout::STEREO.is_supported());
    /// assert!(!BusesLayout { input: ChannelSet::Stereo, output: ChannelSet::Mono }.is_supported());
    /// ```
    pub fn is_supported(&self) -> bool {
        matches!(self.output, ChannelSet::Mono | ChannelSet::Stereo) && self.input == self.output
    }

    /// Channels carrying input.
    pub fn num_input_channels(&self) -> usize {
        self.input.size()
    }

    /// Channels the host expects back.
    pub fn num_output_channels(&self) -> usize {
        self.output.size()
    }
}
