//! Freeverb-topology reverb unit.
//!
//! Each channel runs eight parallel damped comb filters into four series
//! allpass diffusers. The right channel's delay lines are offset by a small
//! stereo spread so the two tails decorrelate. Delay lengths are tuned at
//! 44.1 kHz and scaled to the running sample rate.
//!
//! The unit is driven entirely through [`ReverbParameters`]: every control
//! lives in `0.0..=1.0` and is converted to internal gains here. Damping,
//! feedback and the three mix gains ramp linearly so automation does not
//! click.

use reverbism_core::{AllpassFilter, CombFilter, LinearSmoothedParam};

/// Freeverb comb filter delay times (at 44.1kHz reference).
const COMB_TUNINGS_44K: [usize; NUM_COMBS] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];

/// Freeverb allpass filter delay times (at 44.1kHz reference).
const ALLPASS_TUNINGS_44K: [usize; NUM_ALLPASSES] = [556, 441, 341, 225];

const NUM_COMBS: usize = 8;
const NUM_ALLPASSES: usize = 4;
const NUM_CHANNELS: usize = 2;

/// Extra samples added to every right-channel delay before rate scaling.
const STEREO_SPREAD: usize = 23;

/// Reference sample rate for tuning constants.
const REFERENCE_RATE: u64 = 44100;

const FIXED_GAIN: f32 = 0.015;
const WET_SCALE: f32 = 3.0;
const DRY_SCALE: f32 = 1.0;
const ROOM_SCALE: f32 = 0.28;
const ROOM_OFFSET: f32 = 0.7;
const DAMP_SCALE: f32 = 0.4;

/// Default ramp time for coefficient changes.
pub const DEFAULT_SMOOTHING_MS: f32 = 10.0;

/// Highest sample rate delay lines are sized for. Faster rates are clamped.
pub const MAX_SAMPLE_RATE: f32 = 768_000.0;

/// Scale a 44.1 kHz delay length to `sample_rate`, truncating.
fn scale_to_rate(samples: usize, sample_rate: f32) -> usize {
    let rate = if sample_rate.is_finite() && sample_rate > 0.0 {
        sample_rate.min(MAX_SAMPLE_RATE) as u64
    } else {
        0
    };
    let scaled = rate.saturating_mul(samples as u64) / REFERENCE_RATE;
    usize::try_from(scaled).unwrap_or(usize::MAX).max(1)
}

/// Coefficient-space settings for [`Reverb`].
///
/// Every float is expected in `0.0..=1.0`; [`Reverb::set_parameters`] clamps
/// anything outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverbParameters {
    /// Room size; longer decay towards 1.0.
    pub room_size: f32,
    /// High-frequency absorption; 0.0 is bright, 1.0 is dark.
    pub damping: f32,
    /// Stereo width of the tail; 0.0 is mono.
    pub width: f32,
    /// Level of the reverberated signal.
    pub wet_level: f32,
    /// Level of the unprocessed signal.
    pub dry_level: f32,
    /// Hold the current tail indefinitely and ignore new input.
    pub freeze_mode: bool,
}

impl Default for ReverbParameters {
    fn default() -> Self {
        Self {
            room_size: 0.5,
            damping: 0.5,
            width: 1.0,
            wet_level: 0.33,
            dry_level: 0.4,
            freeze_mode: false,
        }
    }
}

impl ReverbParameters {
    fn clamped(&self) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            room_size: unit(self.room_size),
            damping: unit(self.damping),
            width: unit(self.width),
            wet_level: unit(self.wet_level),
            dry_level: unit(self.dry_level),
            freeze_mode: self.freeze_mode,
        }
    }
}

/// Freeverb-topology stereo/mono reverb.
///
/// All delay lines are allocated by [`new`](Self::new) and
/// [`set_sample_rate`](Self::set_sample_rate). The processing methods never
/// allocate.
///
/// # Example
///
/// ```rust
/// use reverbism_effects::{Reverb, ReverbParameters};
///
/// let mut reverb = Reverb::new(44100.0);
/// reverb.set_parameters(&ReverbParameters { wet_level: 0.0, dry_level: 1.0, ..Default::default() });
///
/// let mut block = [0.25f32; 32];
/// reverb.process_mono(&mut block);
/// assert!(block.iter().all(|&s| s == 0.25));
/// ```
#[derive(Debug, Clone)]
pub struct Reverb {
    combs: [[CombFilter; NUM_COMBS]; NUM_CHANNELS],
    allpasses: [[AllpassFilter; NUM_ALLPASSES]; NUM_CHANNELS],

    parameters: ReverbParameters,
    gain: f32,

    damping: LinearSmoothedParam,
    feedback: LinearSmoothedParam,
    dry_gain: LinearSmoothedParam,
    wet_gain1: LinearSmoothedParam,
    wet_gain2: LinearSmoothedParam,

    sample_rate: f32,
    smoothing_ms: f32,
    // Set by preparation; the next set_parameters jumps straight to target.
    needs_snap: bool,
}

impl Reverb {
    /// Create a reverb at the given sample rate with default parameters.
    ///
    /// Like a sample-rate change, the first
    /// [`set_parameters`](Self::set_parameters) call afterwards jumps
    /// straight to its values.
    pub fn new(sample_rate: f32) -> Self {
        let smoother = || LinearSmoothedParam::with_config(0.0, sample_rate, DEFAULT_SMOOTHING_MS);
        let mut reverb = Self {
            combs: core::array::from_fn(|channel| {
                core::array::from_fn(|i| {
                    CombFilter::new(scale_to_rate(
                        COMB_TUNINGS_44K[i] + STEREO_SPREAD * channel,
                        sample_rate,
                    ))
                })
            }),
            allpasses: core::array::from_fn(|channel| {
                core::array::from_fn(|i| {
                    AllpassFilter::new(scale_to_rate(
                        ALLPASS_TUNINGS_44K[i] + STEREO_SPREAD * channel,
                        sample_rate,
                    ))
                })
            }),
            parameters: ReverbParameters::default(),
            gain: FIXED_GAIN,
            damping: smoother(),
            feedback: smoother(),
            dry_gain: smoother(),
            wet_gain1: smoother(),
            wet_gain2: smoother(),
            sample_rate,
            smoothing_ms: DEFAULT_SMOOTHING_MS,
            needs_snap: true,
        };
        reverb.set_parameters(&ReverbParameters::default());
        reverb.needs_snap = true;
        reverb
    }

    /// Resize every delay line for a new sample rate and clear all state.
    ///
    /// Allocates. The next [`set_parameters`](Self::set_parameters) call
    /// takes effect without a ramp.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        for (channel, combs) in self.combs.iter_mut().enumerate() {
            for (comb, &tuning) in combs.iter_mut().zip(COMB_TUNINGS_44K.iter()) {
                comb.set_size(scale_to_rate(tuning + STEREO_SPREAD * channel, sample_rate));
            }
        }
        for (channel, allpasses) in self.allpasses.iter_mut().enumerate() {
            for (allpass, &tuning) in allpasses.iter_mut().zip(ALLPASS_TUNINGS_44K.iter()) {
                allpass.set_size(scale_to_rate(tuning + STEREO_SPREAD * channel, sample_rate));
            }
        }
        self.reset_smoothers();
        self.needs_snap = true;
    }

    /// Current sample rate.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Change the coefficient ramp time. Zero disables smoothing.
    pub fn set_smoothing_time_ms(&mut self, ms: f32) {
        self.smoothing_ms = if ms.is_finite() { ms.max(0.0) } else { DEFAULT_SMOOTHING_MS };
        self.reset_smoothers();
    }

    /// Current coefficient ramp time in milliseconds.
    pub fn smoothing_time_ms(&self) -> f32 {
        self.smoothing_ms
    }

    /// Apply new settings.
    ///
    /// Gains and coefficients ramp towards their new values over the
    /// smoothing time, except directly after construction or a sample-rate
    /// change where they jump. The input gain switches immediately.
    pub fn set_parameters(&mut self, parameters: &ReverbParameters) {
        let params = parameters.clamped();
        let wet = params.wet_level * WET_SCALE;

        let dry = params.dry_level * DRY_SCALE;
        let wet1 = 0.5 * wet * (1.0 + params.width);
        let wet2 = 0.5 * wet * (1.0 - params.width);
        let (damping, feedback) = if params.freeze_mode {
            (0.0, 1.0)
        } else {
            (
                params.damping * DAMP_SCALE,
                params.room_size * ROOM_SCALE + ROOM_OFFSET,
            )
        };

        self.gain = if params.freeze_mode { 0.0 } else { FIXED_GAIN };
        self.parameters = params;

        if self.needs_snap {
            self.needs_snap = false;
            self.dry_gain.set_immediate(dry);
            self.wet_gain1.set_immediate(wet1);
            self.wet_gain2.set_immediate(wet2);
            self.damping.set_immediate(damping);
            self.feedback.set_immediate(feedback);
        } else {
            self.dry_gain.set_target(dry);
            self.wet_gain1.set_target(wet1);
            self.wet_gain2.set_target(wet2);
            self.damping.set_target(damping);
            self.feedback.set_target(feedback);
        }
    }

    /// The settings last applied, after clamping.
    pub fn parameters(&self) -> &ReverbParameters {
        &self.parameters
    }

    /// Whether freeze mode is active.
    pub fn is_frozen(&self) -> bool {
        self.parameters.freeze_mode
    }

    /// Whether every coefficient ramp has finished.
    pub fn is_settled(&self) -> bool {
        self.damping.is_settled()
            && self.feedback.is_settled()
            && self.dry_gain.is_settled()
            && self.wet_gain1.is_settled()
            && self.wet_gain2.is_settled()
    }

    /// Clear all delay lines and finish any running ramp.
    pub fn reset(&mut self) {
        for comb in self.combs.iter_mut().flatten() {
            comb.clear();
        }
        for allpass in self.allpasses.iter_mut().flatten() {
            allpass.clear();
        }
        self.damping.snap_to_target();
        self.feedback.snap_to_target();
        self.dry_gain.snap_to_target();
        self.wet_gain1.snap_to_target();
        self.wet_gain2.snap_to_target();
    }

    /// Process a stereo pair in place.
    ///
    /// Both channels feed one summed input; each channel has its own tank and
    /// the width gains cross-mix the two tails. Processes
    /// `min(left.len(), right.len())` samples.
    pub fn process_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let [combs_l, combs_r] = &mut self.combs;
        let [allpasses_l, allpasses_r] = &mut self.allpasses;

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let input = (*l + *r) * self.gain;
            let damp = self.damping.advance();
            let feedback = self.feedback.advance();

            let mut out_l = 0.0f32;
            let mut out_r = 0.0f32;
            for (comb_l, comb_r) in combs_l.iter_mut().zip(combs_r.iter_mut()) {
                out_l += comb_l.process(input, damp, feedback);
                out_r += comb_r.process(input, damp, feedback);
            }
            for (allpass_l, allpass_r) in allpasses_l.iter_mut().zip(allpasses_r.iter_mut()) {
                out_l = allpass_l.process(out_l);
                out_r = allpass_r.process(out_r);
            }

            let dry = self.dry_gain.advance();
            let wet1 = self.wet_gain1.advance();
            let wet2 = self.wet_gain2.advance();

            *l = out_l * wet1 + out_r * wet2 + *l * dry;
            *r = out_r * wet1 + out_l * wet2 + *r * dry;
        }
    }

    /// Process a single channel in place using the left tank.
    pub fn process_mono(&mut self, samples: &mut [f32]) {
        let [combs, _] = &mut self.combs;
        let [allpasses, _] = &mut self.allpasses;

        for sample in samples.iter_mut() {
            let input = *sample * self.gain;
            let damp = self.damping.advance();
            let feedback = self.feedback.advance();

            let mut output = 0.0f32;
            for comb in combs.iter_mut() {
                output += comb.process(input, damp, feedback);
            }
            for allpass in allpasses.iter_mut() {
                output = allpass.process(output);
            }

            let dry = self.dry_gain.advance();
            let wet1 = self.wet_gain1.advance();

            *sample = output * wet1 + *sample * dry;
        }
    }

    fn reset_smoothers(&mut self) {
        for param in [
            &mut self.damping,
            &mut self.feedback,
            &mut self.dry_gain,
            &mut self.wet_gain1,
            &mut self.wet_gain2,
        ] {
            param.reset(self.sample_rate, self.smoothing_ms);
        }
    }

    #[cfg(test)]
    fn comb_length(&self, channel: usize, index: usize) -> usize {
        self.combs[channel][index].capacity()
    }
}
