//! Linear parameter smoothing.
//!
//! Reverb coefficients are refreshed once per block but consumed per sample.
//! Ramping them linearly over a fixed time avoids zipper noise when the host
//! automates a control.

/// A value that ramps linearly towards its target over a fixed time.
///
/// Changing the target restarts the ramp from the current value. A ramp time
/// of zero makes every change take effect immediately.
///
/// # Example
///
/// ```rust
/// use reverbism_core::LinearSmoothedParam;
///
/// let mut gain = LinearSmoothedParam::with_config(0.0, 48000.0, 10.0);
/// gain.set_target(1.0);
/// for _ in 0..480 {
///     gain.advance();
/// }
/// assert_eq!(gain.get(), 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearSmoothedParam {
    current: f32,
    target: f32,
    increment: f32,
    samples_remaining: u32,
    ramp_samples: u32,
    sample_rate: f32,
    ramp_time_ms: f32,
}

impl LinearSmoothedParam {
    /// Create a smoother at 44.1 kHz with a 10 ms ramp.
    pub fn new(initial: f32) -> Self {
        Self::with_config(initial, 44100.0, 10.0)
    }

    /// Create with full configuration.
    pub fn with_config(initial: f32, sample_rate: f32, ramp_time_ms: f32) -> Self {
        let mut param = Self {
            current: initial,
            target: initial,
            increment: 0.0,
            samples_remaining: 0,
            ramp_samples: 0,
            sample_rate,
            ramp_time_ms,
        };
        param.update_ramp_samples();
        param
    }

    /// Set the target value.
    ///
    /// Setting the same target again leaves a running ramp untouched, so
    /// refreshing from an unchanged parameter snapshot every block costs
    /// nothing and never restarts the ramp.
    pub fn set_target(&mut self, target: f32) {
        if target == self.target {
            return;
        }

        self.target = target;
        if self.ramp_samples == 0 {
            self.snap_to_target();
        } else {
            self.increment = (target - self.current) / self.ramp_samples as f32;
            self.samples_remaining = self.ramp_samples;
        }
    }

    /// Set value immediately, cancelling any ramp.
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.snap_to_target();
    }

    /// Change the sample rate and ramp time, then jump to the target.
    ///
    /// Called whenever the owning processor is re-prepared.
    pub fn reset(&mut self, sample_rate: f32, ramp_time_ms: f32) {
        self.sample_rate = sample_rate;
        self.ramp_time_ms = ramp_time_ms;
        self.update_ramp_samples();
        self.snap_to_target();
    }

    /// Next smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        if self.samples_remaining > 0 {
            self.current += self.increment;
            self.samples_remaining -= 1;
            if self.samples_remaining == 0 {
                self.current = self.target;
            }
        }
        self.current
    }

    /// Current value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Whether the ramp has finished.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Ramp length in samples at the current sample rate.
    pub fn ramp_samples(&self) -> u32 {
        self.ramp_samples
    }

    /// Jump to the target immediately.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = 0.0;
        self.samples_remaining = 0;
    }

    fn update_ramp_samples(&mut self) {
        let samples = libm::floorf(self.ramp_time_ms * self.sample_rate / 1000.0);
        self.ramp_samples = if samples.is_finite() && samples > 0.0 {
            samples as u32
        } else {
            0
        };
    }
}

impl Default for LinearSmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
