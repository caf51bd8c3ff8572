//! Host-facing core of the Reverbism reverb plugin.
//!
//! This crate sits between a plugin host and the [`reverbism_effects::Reverb`]
//! unit. It owns everything a host talks to except the binary ABI and the
//! editor window.
//!
//! # Architecture
//!
//! | Piece | Thread | Type |
//! |-------|--------|------|
//! | Parameter values | any | [`ParamStore`] (lock-free atomics, seqlock batches) |
//! | Audio processing | audio | [`BlockProcessor`] wrapping [`ReverbEngine`] |
//! | Persistence | control | [`save_state`] / [`load_state`] |
//! | Lifecycle | host main | [`ReverbPlugin`] |
//!
//! The audio path never allocates, never locks and never logs. It reads one
//! consistent [`ParamSnapshot`] per block; a state restore in progress on
//! another thread is never observed half-applied.
//!
//! # Parameter layouts
//!
//! [`ParamLayout::Percentage`] exposes size, damp, width and mix as 0–100 %
//! knobs with dry derived as `1 - wet`. [`ParamLayout::Independent`] exposes
//! separate wet and dry levels on a 0–1 scale. Both carry a freeze toggle.
//!
//! # Example
//!
//! ```rust
//! use reverbism_plugin::{AudioBuffer, ParamKey, ReverbPlugin};
//!
//! let mut plugin = ReverbPlugin::new().unwrap();
//! plugin.prepare_to_play(48000.0, 128).unwrap();
//! plugin.set_value(ParamKey::Size.param_id(), 80.0);
//!
//! let mut buffer = AudioBuffer::new(2, 128);
//! buffer.channel_mut(0)[0] = 1.0;
//! plugin.process_block(&mut buffer);
//! ```

pub mod audio;
pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod params;
pub mod plugin;
pub mod shared;
pub mod state;

pub use audio::BlockProcessor;
pub use buffer::AudioBuffer;
pub use config::PluginConfig;
pub use engine::{EngineMapping, ProcessSpec, ProcessStatus, ReverbEngine};
pub use error::{ConfigError, PluginError, StateError};
pub use layout::{BusesLayout, ChannelSet};
pub use params::{ParamKey, ParamLayout};
pub use plugin::{LifecycleState, PLUGIN_ID, PLUGIN_NAME, ReverbPlugin};
pub use shared::{MAX_PARAMS, ParamSnapshot, ParamStore, ParamStoreBuilder};
pub use state::{LoadReport, STATE_VERSION, load_state, save_state};

pub use reverbism_core::{ParamDescriptor, ParamId};
