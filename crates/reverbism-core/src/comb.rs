//! Comb filter for reverb algorithms.
//!
//! A feedback comb filter with a one-pole lowpass in the feedback path.
//! Eight of these in parallel form the resonant body of a Freeverb tank.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::flush_denormal;

/// Comb filter with feedback and damping.
///
/// The delay line is a plain ring buffer sized once by [`set_size`](Self::set_size);
/// [`process`](Self::process) never allocates. Damping and feedback are passed
/// per sample so the caller can ramp them without touching filter state.
///
/// # Example
///
/// ```rust
/// use reverbism_core::CombFilter;
///
/// let mut comb = CombFilter::new(1116);
/// let out = comb.process(1.0, 0.2, 0.84);
/// assert_eq!(out, 0.0); // nothing has travelled through the delay yet
/// ```
#[derive(Debug, Clone)]
pub struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    last: f32,
}

impl CombFilter {
    /// Create a new comb filter with the given delay length in samples.
    ///
    /// Lengths below one sample are raised to one.
    pub fn new(delay_samples: usize) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            last: 0.0,
        }
    }

    /// Resize the delay line and clear it.
    ///
    /// Allocates when growing. Call from a preparation path, never from the
    /// audio callback.
    pub fn set_size(&mut self, delay_samples: usize) {
        let size = delay_samples.max(1);
        if size != self.buffer.len() {
            self.buffer.clear();
            self.buffer.resize(size, 0.0);
        }
        self.clear();
    }

    /// Process a single sample.
    ///
    /// `damp` is the lowpass coefficient in the feedback path (0 = bright,
    /// 1 = fully damped); `feedback` scales what is written back into the
    /// delay line and must stay at or below 1.0 for a stable (or frozen) tank.
    #[inline]
    pub fn process(&mut self, input: f32, damp: f32, feedback: f32) -> f32 {
        let output = self.buffer[self.index];
        self.last = flush_denormal(output * (1.0 - damp) + self.last * damp);

        self.buffer[self.index] = flush_denormal(input + self.last * feedback);
        self.index += 1;
        if self.index >= self.buffer.len() {
            self.index = 0;
        }

        output
    }

    /// Clear the delay line and the damping filter state.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.index = 0;
        self.last = 0.0;
    }

    /// Delay length in samples.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }
}
