//! Allpass filter for reverb diffusion.
//!
//! A Schroeder allpass that smears the comb bank output into a dense tail
//! without colouring its magnitude response.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::flush_denormal;

/// Feedback used by the Freeverb diffusers.
pub const DEFAULT_ALLPASS_FEEDBACK: f32 = 0.5;

/// Schroeder allpass filter for diffusion.
///
/// # Example
///
/// ```rust
/// use reverbism_core::AllpassFilter;
///
/// let mut allpass = AllpassFilter::new(556);
/// assert_eq!(allpass.process(1.0), -1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
}

impl AllpassFilter {
    /// Create a new allpass filter with the given delay length in samples.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            feedback: DEFAULT_ALLPASS_FEEDBACK,
        }
    }

    /// Resize the delay line and clear it. Allocates when growing.
    pub fn set_size(&mut self, delay_samples: usize) {
        let size = delay_samples.max(1);
        if size != self.buffer.len() {
            self.buffer.clear();
            self.buffer.resize(size, 0.0);
        }
        self.clear();
    }

    /// Set the feedback coefficient. Stable for |feedback| < 1.0.
    #[inline]
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-0.99, 0.99);
    }

    /// Current feedback coefficient.
    #[inline]
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Process a single sample.
    ///
    /// `output = delayed - input`, `delay_in = input + delayed * feedback`.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let delayed = self.buffer[self.index];

        self.buffer[self.index] = flush_denormal(input + delayed * self.feedback);
        self.index += 1;
        if self.index >= self.buffer.len() {
            self.index = 0;
        }

        delayed - input
    }

    /// Clear the delay line.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
    }

    /// Delay length in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
