//! Host-facing plugin instance.
//!
//! [`ReverbPlugin`] models the host lifecycle as an explicit state machine:
//!
//! ```text
//!               prepare_to_play                 release_resources
//! Unprepared ─────────────────────▶ Prepared ─────────────────────▶ Released
//!     ▲                              │  ▲  │                           │
//!     └──── set_buses_layout ────────┘  └──┘ process_block             │
//!                                                                      │
//!               prepare_to_play  ◀─────────────────────────────────────┘
//! ```
//!
//! Only `Prepared` owns a [`BlockProcessor`]; `process_block` in any other
//! state passes input through untouched. Preparation takes `&mut self`, so
//! it can never overlap a processing call.
//!
//! Parameter access and state persistence go through the shared
//! [`ParamStore`] and may run from any control thread while audio flows.

use crate::audio::BlockProcessor;
use crate::buffer::AudioBuffer;
use crate::config::PluginConfig;
use crate::engine::{ProcessSpec, ProcessStatus};
use crate::error::{PluginError, StateError};
use crate::layout::BusesLayout;
use crate::shared::ParamStore;
use crate::state::{LoadReport, load_state, save_state};
use reverbism_core::{ParamDescriptor, ParamId};

/// Display name reported to hosts.
pub const PLUGIN_NAME: &str = "Reverbism";

/// Reverse-domain plugin identifier.
pub const PLUGIN_ID: &str = "com.reverbism.reverb";

/// Lifecycle position of a [`ReverbPlugin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Created, or the bus layout changed since the last preparation.
    Unprepared,
    /// Ready to process audio.
    Prepared,
    /// Resources released by the host.
    Released,
}

#[derive(Debug)]
enum Lifecycle {
    Unprepared,
    Prepared(Box<BlockProcessor>),
    Released,
}

/// One plugin instance.
///
/// # Example
///
/// ```rust
/// use reverbism_plugin::{AudioBuffer, ProcessStatus, ReverbPlugin};
///
/// let mut plugin = ReverbPlugin::new().unwrap();
/// plugin.prepare_to_play(44100.0, 512).unwrap();
///
/// let mut buffer = AudioBuffer::new(2, 512);
/// assert_eq!(plugin.process_block(&mut buffer), ProcessStatus::Processed);
///
/// let state = plugin.get_state_information().unwrap();
/// plugin.set_state_information(&state).unwrap();
/// ```
#[derive(Debug)]
pub struct ReverbPlugin {
    config: PluginConfig,
    store: ParamStore,
    layout: BusesLayout,
    lifecycle: Lifecycle,
}

impl ReverbPlugin {
    /// Instance with the default configuration.
    pub fn new() -> Result<Self, PluginError> {
        Self::with_config(PluginConfig::default())
    }

    /// Instance with an explicit configuration.
    pub fn with_config(config: PluginConfig) -> Result<Self, PluginError> {
        config.validate()?;
        let store = ParamStore::for_layout(config.layout)?;
        tracing::debug!(
            layout = ?config.layout,
            smoothing_ms = config.smoothing_ms,
            params = store.param_count(),
            "created plugin instance"
        );
        Ok(Self {
            config,
            store,
            layout: BusesLayout::STEREO,
            lifecycle: Lifecycle::Unprepared,
        })
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    /// Plugin identifier.
    pub fn id(&self) -> &'static str {
        PLUGIN_ID
    }

    /// Active configuration.
    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    /// Handle to the parameter store, cloneable into UI or automation threads.
    pub fn params(&self) -> &ParamStore {
        &self.store
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        match self.lifecycle {
            Lifecycle::Unprepared => LifecycleState::Unprepared,
            Lifecycle::Prepared(_) => LifecycleState::Prepared,
            Lifecycle::Released => LifecycleState::Released,
        }
    }

    /// Current bus layout.
    pub fn buses_layout(&self) -> BusesLayout {
        self.layout
    }

    /// The [`ProcessSpec`] the processor was last prepared with.
    pub fn process_spec(&self) -> Option<ProcessSpec> {
        match &self.lifecycle {
            Lifecycle::Prepared(processor) => processor.engine().spec().copied(),
            _ => None,
        }
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Allocate and size everything for playback.
    ///
    /// Valid from any state. Re-preparing an already prepared instance
    /// reuses its processor and clears the reverb tail. On error the
    /// previous state is kept.
    pub fn prepare_to_play(&mut self, sample_rate: f64, max_block_size: u32) -> Result<(), PluginError> {
        let spec = ProcessSpec {
            sample_rate,
            max_block_size,
            num_channels: self.layout.num_output_channels() as u32,
        };
        spec.validate()?;

        match &mut self.lifecycle {
            Lifecycle::Prepared(processor) => processor.prepare(&spec)?,
            _ => {
                let mut processor = BlockProcessor::new(self.store.clone(), &self.config)?;
                processor.prepare(&spec)?;
                self.lifecycle = Lifecycle::Prepared(Box::new(processor));
            }
        }

        tracing::info!(
            sample_rate,
            max_block_size,
            channels = spec.num_channels,
            "prepared to play"
        );
        Ok(())
    }

    /// Drop the processor and its delay lines.
    pub fn release_resources(&mut self) {
        if matches!(self.lifecycle, Lifecycle::Prepared(_)) {
            tracing::info!("released resources");
        }
        self.lifecycle = Lifecycle::Released;
    }

    /// Process one host buffer in place.
    ///
    /// Channels beyond the input bus are cleared. Outside the `Prepared`
    /// state the input channels pass through and the result is
    /// [`ProcessStatus::NotPrepared`].
    pub fn process_block(&mut self, buffer: &mut AudioBuffer) -> ProcessStatus {
        let num_inputs = self.layout.num_input_channels().min(buffer.num_channels());
        match &mut self.lifecycle {
            Lifecycle::Prepared(processor) => processor.process_block(buffer, num_inputs),
            Lifecycle::Unprepared | Lifecycle::Released => {
                for channel in num_inputs..buffer.num_channels() {
                    buffer.clear_channel(channel);
                }
                ProcessStatus::NotPrepared
            }
        }
    }

    /// Clear the reverb tail (host transport jump, bypass toggle).
    pub fn reset(&mut self) {
        if let Lifecycle::Prepared(processor) = &mut self.lifecycle {
            processor.reset();
        }
    }

    /// Seconds of output after the input stops. Reported as zero.
    pub fn tail_length_seconds(&self) -> f64 {
        0.0
    }

    /// Number of programs. Hosts expect at least one.
    pub fn num_programs(&self) -> usize {
        1
    }

    /// Index of the active program.
    pub fn current_program(&self) -> usize {
        0
    }

    // ── Buses ───────────────────────────────────────────────────────────

    /// Whether `layout` can be processed: mono or stereo, input equal to output.
    pub fn is_buses_layout_supported(&self, layout: &BusesLayout) -> bool {
        layout.is_supported()
    }

    /// Switch bus layout.
    ///
    /// A change drops back to `Unprepared`; the host must call
    /// [`prepare_to_play`](Self::prepare_to_play) again. An unsupported
    /// layout is rejected and the old one kept.
    pub fn set_buses_layout(&mut self, layout: BusesLayout) -> Result<(), PluginError> {
        if !layout.is_supported() {
            tracing::warn!(?layout, "rejected unsupported bus layout");
            return Err(PluginError::UnsupportedLayout {
                input: layout.input,
                output: layout.output,
            });
        }
        if layout != self.layout {
            tracing::info!(?layout, "bus layout changed");
            self.layout = layout;
            if matches!(self.lifecycle, Lifecycle::Prepared(_)) {
                self.lifecycle = Lifecycle::Unprepared;
            }
        }
        Ok(())
    }

    // ── State ───────────────────────────────────────────────────────────

    /// Serialize every parameter value.
    pub fn get_state_information(&self) -> Result<Vec<u8>, StateError> {
        save_state(&self.store)
    }

    /// Restore parameter values from a blob produced by
    /// [`get_state_information`](Self::get_state_information).
    ///
    /// A malformed blob is logged and rejected; current values are kept.
    pub fn set_state_information(&self, data: &[u8]) -> Result<LoadReport, StateError> {
        load_state(&self.store, data).inspect_err(|err| {
            tracing::warn!(error = %err, bytes = data.len(), "rejected plugin state");
        })
    }

    // ── Parameter automation ────────────────────────────────────────────

    /// Number of automatable parameters.
    pub fn param_count(&self) -> usize {
        self.store.param_count()
    }

    /// Metadata for the parameter at `index`.
    pub fn param_info(&self, index: usize) -> Option<&ParamDescriptor> {
        self.store.descriptor(index)
    }

    /// Index of the parameter with numeric ID `id`.
    pub fn param_index_by_id(&self, id: ParamId) -> Option<usize> {
        self.store.index_by_id(id)
    }

    /// Current plain value.
    pub fn get_value(&self, id: ParamId) -> Option<f64> {
        let index = self.store.index_by_id(id)?;
        self.store.get(index).map(f64::from)
    }

    /// Write a plain value; clamped and snapped.
    ///
    /// Writing an `id` this instance never declared is a caller bug, with
    /// the same policy as [`ParamStore::set`]: it asserts in debug builds
    /// and is ignored in release builds.
    pub fn set_value(&self, id: ParamId, value: f64) {
        if let Some(index) = self.index_for_write(id) {
            self.store.set(index, value as f32);
        }
    }

    /// Current value normalized to `0.0..=1.0`.
    pub fn get_normalized(&self, id: ParamId) -> Option<f64> {
        let index = self.store.index_by_id(id)?;
        self.store.get_normalized(index).map(f64::from)
    }

    /// Write a normalized value. Unknown IDs follow the
    /// [`set_value`](Self::set_value) policy.
    pub fn set_normalized(&self, id: ParamId, normalized: f64) {
        if let Some(index) = self.index_for_write(id) {
            self.store.set_normalized(index, normalized as f32);
        }
    }

    /// Render `value` the way the parameter displays it.
    pub fn value_to_text(&self, id: ParamId, value: f64) -> Option<String> {
        let index = self.store.index_by_id(id)?;
        self.store.value_to_text(index, value as f32)
    }

    /// Parse display text into a plain value.
    pub fn text_to_value(&self, id: ParamId, text: &str) -> Option<f64> {
        let index = self.store.index_by_id(id)?;
        self.store.text_to_value(index, text).map(f64::from)
    }

    fn index_for_write(&self, id: ParamId) -> Option<usize> {
        let index = self.store.index_by_id(id);
        debug_assert!(index.is_some(), "write to undeclared parameter id {}", id.0);
        index
    }
}
