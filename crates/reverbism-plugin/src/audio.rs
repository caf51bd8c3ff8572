//! Block processor: the audio-thread half of the plugin.
//!
//! One [`BlockProcessor::process_block`] call per host buffer, strictly
//! sequential per instance. A call never allocates, never logs and never
//! takes a lock; parameter values arrive through the store's atomic slots.

use crate::buffer::AudioBuffer;
use crate::config::PluginConfig;
use crate::engine::{EngineMapping, ProcessSpec, ProcessStatus, ReverbEngine};
use crate::error::PluginError;
use crate::shared::{ParamSnapshot, ParamStore};
use no_denormals::no_denormals;

/// Audio-thread processor wrapping the reverb engine.
///
/// Created when the host prepares the plugin and dropped when it releases
/// resources.
#[derive(Debug)]
pub struct BlockProcessor {
    store: ParamStore,
    engine: ReverbEngine,
    /// Last consistent parameter values; reused while a restore is in flight.
    snapshot: ParamSnapshot,
}

impl BlockProcessor {
    /// Processor reading from `store`. Allocates; call from a control thread.
    pub fn new(store: ParamStore, config: &PluginConfig) -> Result<Self, PluginError> {
        config.validate()?;
        let mapping = EngineMapping::for_store(&store)?;
        let snapshot = store.snapshot();
        Ok(Self {
            engine: ReverbEngine::new(mapping, config.smoothing_ms),
            store,
            snapshot,
        })
    }

    /// Prepare for playback and load the current parameter values.
    ///
    /// The values apply without a ramp so the first block starts in tune.
    pub fn prepare(&mut self, spec: &ProcessSpec) -> Result<(), PluginError> {
        self.engine.prepare(spec)?;
        self.snapshot = self.store.snapshot();
        self.engine.refresh(&self.snapshot);
        Ok(())
    }

    /// Process one host buffer in place, with flush-to-zero enabled for the
    /// duration of the call.
    ///
    /// Output channels at or above `num_inputs` carry no input and are
    /// zeroed. The reverb then runs over the input channels.
    pub fn process_block(&mut self, buffer: &mut AudioBuffer, num_inputs: usize) -> ProcessStatus {
        let mut status = ProcessStatus::PassThrough;
        no_denormals(|| {
            // Keeps the previous snapshot when a state restore is mid-flight.
            self.store.try_snapshot_into(&mut self.snapshot);
            self.engine.refresh(&self.snapshot);

            let num_inputs = num_inputs.min(buffer.num_channels());
            for channel in num_inputs..buffer.num_channels() {
                buffer.clear_channel(channel);
            }

            status = self.engine.process(buffer, num_inputs);
        });
        status
    }

    /// Clear the reverb tail.
    pub fn reset(&mut self) {
        self.engine.reset();
    }

    /// The engine adapter.
    pub fn engine(&self) -> &ReverbEngine {
        &self.engine
    }

    /// Snapshot used for the most recent block.
    pub fn snapshot(&self) -> &ParamSnapshot {
        &self.snapshot
    }
}
