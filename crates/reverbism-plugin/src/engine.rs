//! Reverb engine adapter.
//!
//! Translates a parameter snapshot into [`ReverbParameters`] and owns the
//! reverb unit's sample-rate-dependent state. Every float parameter is
//! mapped by the affine rescale `(value - min) * (1 / (max - min))` in
//! `f32`, so a percentage knob lands on exactly `value * 0.01`.

use crate::buffer::AudioBuffer;
use crate::error::{ConfigError, PluginError};
use crate::params::ParamKey;
use crate::shared::{ParamSnapshot, ParamStore};
use reverbism_effects::{MAX_SAMPLE_RATE, Reverb, ReverbParameters};

/// Playback configuration the engine is prepared for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Largest block the host will deliver.
    pub max_block_size: u32,
    /// Output channel count.
    pub num_channels: u32,
}

impl ProcessSpec {
    /// Reject sample rates and block sizes no delay line can be sized for.
    ///
    /// The sample rate must be positive and at most [`MAX_SAMPLE_RATE`].
    pub fn validate(&self) -> Result<(), PluginError> {
        let rate_ok = self.sample_rate.is_finite()
            && self.sample_rate > 0.0
            && self.sample_rate <= f64::from(MAX_SAMPLE_RATE);
        if !rate_ok || self.max_block_size == 0 {
            return Err(PluginError::InvalidProcessSpec {
                sample_rate: self.sample_rate,
                max_block_size: self.max_block_size,
            });
        }
        Ok(())
    }
}

/// Outcome of one processing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// The reverb ran over the block.
    Processed,
    /// The channel count has no reverb path; input channels passed through.
    PassThrough,
    /// The plugin is not prepared; input channels passed through.
    NotPrepared,
}

/// Where one float parameter sits in a snapshot and how to rescale it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    index: usize,
    min: f32,
    inv_span: f32,
}

impl Slot {
    fn new(store: &ParamStore, key: ParamKey) -> Result<Self, ConfigError> {
        let index = store
            .index_of_key(key)
            .ok_or(ConfigError::MissingParam(key.string_id()))?;
        let desc = store
            .descriptor(index)
            .ok_or(ConfigError::MissingParam(key.string_id()))?;
        let span = desc.max - desc.min;
        Ok(Self {
            index,
            min: desc.min,
            inv_span: if span == 0.0 { 0.0 } else { 1.0 / span },
        })
    }

    #[inline]
    fn read(&self, snapshot: &ParamSnapshot) -> f32 {
        snapshot
            .get(self.index)
            .map_or(0.0, |value| (value - self.min) * self.inv_span)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LevelMapping {
    /// One mix knob: wet follows it, dry is its complement.
    Complement { mix: Slot },
    /// Separate wet and dry knobs.
    Independent { wet: Slot, dry: Slot },
}

/// Snapshot-to-coefficient mapping for one store layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineMapping {
    size: Slot,
    damp: Slot,
    width: Slot,
    levels: LevelMapping,
    freeze: usize,
}

impl EngineMapping {
    /// Resolve every control the engine needs from `store`.
    ///
    /// A store declaring `mix` gets the coupled mapping; otherwise it must
    /// declare both `wet` and `dry`.
    pub fn for_store(store: &ParamStore) -> Result<Self, ConfigError> {
        let levels = if store.index_of_key(ParamKey::Mix).is_some() {
            LevelMapping::Complement {
                mix: Slot::new(store, ParamKey::Mix)?,
            }
        } else {
            LevelMapping::Independent {
                wet: Slot::new(store, ParamKey::Wet)?,
                dry: Slot::new(store, ParamKey::Dry)?,
            }
        };
        Ok(Self {
            size: Slot::new(store, ParamKey::Size)?,
            damp: Slot::new(store, ParamKey::Damp)?,
            width: Slot::new(store, ParamKey::Width)?,
            levels,
            freeze: store
                .index_of_key(ParamKey::Freeze)
                .ok_or(ConfigError::MissingParam(ParamKey::Freeze.string_id()))?,
        })
    }

    /// Coefficients for `snapshot`. Pure.
    pub fn map(&self, snapshot: &ParamSnapshot) -> ReverbParameters {
        let (wet_level, dry_level) = match self.levels {
            LevelMapping::Complement { mix } => {
                let wet = mix.read(snapshot);
                (wet, 1.0 - wet)
            }
            LevelMapping::Independent { wet, dry } => (wet.read(snapshot), dry.read(snapshot)),
        };
        ReverbParameters {
            room_size: self.size.read(snapshot),
            damping: self.damp.read(snapshot),
            width: self.width.read(snapshot),
            wet_level,
            dry_level,
            freeze_mode: snapshot.get(self.freeze).is_some_and(|v| v >= 0.5),
        }
    }
}

/// Owns the reverb unit and drives it from parameter snapshots.
#[derive(Debug, Clone)]
pub struct ReverbEngine {
    reverb: Reverb,
    mapping: EngineMapping,
    smoothing_ms: f32,
    spec: Option<ProcessSpec>,
}

impl ReverbEngine {
    /// Engine with the given mapping. Allocates the reverb's delay lines.
    pub fn new(mapping: EngineMapping, smoothing_ms: f32) -> Self {
        let mut reverb = Reverb::new(44100.0);
        reverb.set_smoothing_time_ms(smoothing_ms);
        Self {
            reverb,
            mapping,
            smoothing_ms,
            spec: None,
        }
    }

    /// Size the delay lines for the given [`ProcessSpec`] and clear all state.
    ///
    /// Allocates. Must not run while audio is flowing through this engine;
    /// the `&mut` receiver enforces that.
    pub fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PluginError> {
        spec.validate()?;
        self.reverb.set_sample_rate(spec.sample_rate as f32);
        self.reverb.set_smoothing_time_ms(self.smoothing_ms);
        self.spec = Some(*spec);
        Ok(())
    }

    /// The [`ProcessSpec`] of the last successful [`prepare`](Self::prepare).
    pub fn spec(&self) -> Option<&ProcessSpec> {
        self.spec.as_ref()
    }

    /// Whether [`prepare`](Self::prepare) has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.spec.is_some()
    }

    /// Coefficients for `snapshot` without touching the engine.
    pub fn map(&self, snapshot: &ParamSnapshot) -> ReverbParameters {
        self.mapping.map(snapshot)
    }

    /// Recompute engine coefficients from `snapshot`. Real-time safe.
    pub fn refresh(&mut self, snapshot: &ParamSnapshot) {
        let parameters = self.mapping.map(snapshot);
        self.reverb.set_parameters(&parameters);
    }

    /// Apply the reverb in place over the first `active_channels` channels.
    ///
    /// One channel runs the mono path, two the stereo path. Any other count
    /// leaves the buffer untouched. Real-time safe.
    pub fn process(&mut self, buffer: &mut AudioBuffer, active_channels: usize) -> ProcessStatus {
        if !self.is_prepared() {
            return ProcessStatus::NotPrepared;
        }
        match active_channels.min(buffer.num_channels()) {
            1 => {
                self.reverb.process_mono(buffer.channel_mut(0));
                ProcessStatus::Processed
            }
            2 => match buffer.stereo_mut() {
                Some((left, right)) => {
                    self.reverb.process_stereo(left, right);
                    ProcessStatus::Processed
                }
                None => ProcessStatus::PassThrough,
            },
            _ => ProcessStatus::PassThrough,
        }
    }

    /// Clear reverb tails without reallocating.
    pub fn reset(&mut self) {
        self.reverb.reset();
    }

    /// The wrapped reverb unit.
    pub fn reverb(&self) -> &Reverb {
        &self.reverb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamLayout;

    fn store(layout: ParamLayout) -> ParamStore {
        ParamStore::for_layout(layout).unwrap()
    }

    fn spec(sample_rate: f64, num_channels: u32) -> ProcessSpec {
        ProcessSpec {
            sample_rate,
            max_block_size: 512,
            num_channels,
        }
    }

    #[test]
    fn test_percentage_mapping_matches_scaled_knobs() {
        let store = store(ParamLayout::Percentage);
        let mapping = EngineMapping::for_store(&store).unwrap();

        for (size, damp, width, mix) in [
            (50.0f32, 50.0f32, 50.0f32, 50.0f32),
            (12.34, 0.0, 100.0, 66.67),
            (99.99, 0.01, 33.33, 100.0),
        ] {
            store.restore(&[size, damp, width, mix, 1.0]);
            let snapshot = store.snapshot();
            let params = mapping.map(&snapshot);

            let s = snapshot.as_slice();
            assert_eq!(params.room_size.to_bits(), (s[0] * 0.01f32).to_bits());
            assert_eq!(params.damping.to_bits(), (s[1] * 0.01f32).to_bits());
            assert_eq!(params.width.to_bits(), (s[2] * 0.01f32).to_bits());
            assert_eq!(params.wet_level.to_bits(), (s[3] * 0.01f32).to_bits());
            assert_eq!(params.dry_level.to_bits(), (1.0 - s[3] * 0.01f32).to_bits());
            assert!(params.freeze_mode);
        }
    }

    #[test]
    fn test_full_mix_removes_dry_signal() {
        let store = store(ParamLayout::Percentage);
        store.set_key(ParamKey::Mix, 100.0);
        let params = EngineMapping::for_store(&store).unwrap().map(&store.snapshot());
        assert_eq!(params.wet_level, 1.0);
        assert_eq!(params.dry_level, 0.0);
    }

    #[test]
    fn test_independent_mapping_passes_levels_through() {
        let store = store(ParamLayout::Independent);
        let params = EngineMapping::for_store(&store).unwrap().map(&store.snapshot());
        assert_eq!(params.room_size, 0.5);
        assert_eq!(params.width, 1.0);
        assert_eq!(params.wet_level, store.value_of(ParamKey::Wet).unwrap());
        assert_eq!(params.dry_level, store.value_of(ParamKey::Dry).unwrap());
        assert!(!params.freeze_mode);

        store.set_key(ParamKey::Dry, 0.9);
        store.set_key(ParamKey::Wet, 0.1);
        let params = EngineMapping::for_store(&store).unwrap().map(&store.snapshot());
        assert!((params.dry_level - 0.9).abs() < 1e-6);
        assert!((params.wet_level - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_mapping_requires_level_controls() {
        use crate::shared::ParamStoreBuilder;

        let mut builder = ParamStoreBuilder::new();
        for key in [ParamKey::Size, ParamKey::Damp, ParamKey::Width, ParamKey::Freeze] {
            builder
                .declare(ParamLayout::Percentage.descriptor(key).unwrap())
                .unwrap();
        }
        let err = EngineMapping::for_store(&builder.build()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingParam("wet")));
    }

    #[test]
    fn test_prepare_validates_spec() {
        let store = store(ParamLayout::Percentage);
        let mut engine = ReverbEngine::new(EngineMapping::for_store(&store).unwrap(), 10.0);
        assert!(!engine.is_prepared());

        for bad in [
            spec(0.0, 2),
            spec(-44100.0, 2),
            spec(f64::NAN, 2),
            spec(f64::INFINITY, 2),
            spec(768_001.0, 2),
            spec(1.0e17, 2),
            ProcessSpec {
                max_block_size: 0,
                ..spec(44100.0, 2)
            },
        ] {
            assert!(engine.prepare(&bad).is_err(), "{bad:?}");
        }
        assert!(!engine.is_prepared());

        engine.prepare(&spec(768_000.0, 2)).unwrap();
        engine.prepare(&spec(48000.0, 2)).unwrap();
        assert_eq!(engine.spec().map(|s| s.sample_rate), Some(48000.0));
        assert_eq!(engine.reverb().sample_rate(), 48000.0);
    }

    #[test]
    fn test_unprepared_engine_leaves_buffer_alone() {
        let store = store(ParamLayout::Percentage);
        let mut engine = ReverbEngine::new(EngineMapping::for_store(&store).unwrap(), 10.0);
        let mut buffer = AudioBuffer::from_channels(&[[0.5f32; 8], [0.5; 8]]);
        assert_eq!(engine.process(&mut buffer, 2), ProcessStatus::NotPrepared);
        assert_eq!(buffer.channel(0), &[0.5; 8]);
    }

    #[test]
    fn test_channel_count_selects_path() {
        let store = store(ParamLayout::Percentage);
        let mut engine = ReverbEngine::new(EngineMapping::for_store(&store).unwrap(), 10.0);
        engine.prepare(&spec(44100.0, 2)).unwrap();
        engine.refresh(&store.snapshot());

        let mut mono = AudioBuffer::from_channels(&[[1.0f32; 16]]);
        assert_eq!(engine.process(&mut mono, 1), ProcessStatus::Processed);
        // Mix 50 %: dry gain 0.5 and no echo yet.
        assert_eq!(mono.channel(0), &[0.5; 16]);

        let mut surround = AudioBuffer::from_channels(&[[1.0f32; 16], [1.0; 16], [1.0; 16]]);
        assert_eq!(engine.process(&mut surround, 3), ProcessStatus::PassThrough);
        assert!(surround.channels().all(|c| c == [1.0; 16]));

        let mut empty = AudioBuffer::new(0, 16);
        assert_eq!(engine.process(&mut empty, 2), ProcessStatus::PassThrough);
    }
}
