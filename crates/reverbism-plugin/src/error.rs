//! Error types for the plugin core.

use crate::layout::ChannelSet;
use thiserror::Error;

/// Errors raised while saving or restoring persisted state.
///
/// A failed load never touches the parameter store.
#[derive(Debug, Error)]
pub enum StateError {
    /// The blob is not valid JSON
    #[error("failed to parse state: {0}")]
    Parse(#[source] serde_json::Error),

    /// Serialization failed
    #[error("failed to serialize state: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The top-level value is not an object
    #[error("state is not a JSON object")]
    NotAnObject,

    /// The `params` field is missing or not an object
    #[error("state field 'params' is missing or not an object")]
    InvalidParams,

    /// The `version` field is not an unsigned integer
    #[error("state field 'version' is not an unsigned integer")]
    InvalidVersion,

    /// The blob was written by a newer format
    #[error("unsupported state version {found} (newest supported is {supported})")]
    UnsupportedVersion {
        /// Version found in the blob.
        found: u64,
        /// Newest version this build understands.
        supported: u64,
    },

    /// A known parameter carries a value that is not a finite number
    #[error("invalid value for parameter '{id}'")]
    InvalidValue {
        /// String identifier of the parameter.
        id: String,
    },
}

/// Errors in static configuration: parameter declarations and plugin settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Smoothing time outside the accepted range
    #[error("smoothing time {0} ms is outside 0..=1000 ms")]
    InvalidSmoothing(f32),

    /// Two parameters share a string or numeric identifier
    #[error("duplicate parameter identifier '{0}'")]
    DuplicateParam(String),

    /// More parameters than a snapshot can hold
    #[error("too many parameters: {count} (maximum {max})")]
    TooManyParams {
        /// Number of parameters requested.
        count: usize,
        /// Snapshot capacity.
        max: usize,
    },

    /// The reverb engine needs a parameter the store does not declare
    #[error("parameter layout is missing '{0}'")]
    MissingParam(&'static str),
}

/// Errors from host-facing plugin operations.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The requested bus layout cannot be processed
    #[error("unsupported bus layout: input {input:?}, output {output:?}")]
    UnsupportedLayout {
        /// Requested input channel set.
        input: ChannelSet,
        /// Requested output channel set.
        output: ChannelSet,
    },

    /// Sample rate or block size cannot be prepared for
    #[error("invalid process spec: sample rate {sample_rate}, max block size {max_block_size}")]
    InvalidProcessSpec {
        /// Requested sample rate in Hz.
        sample_rate: f64,
        /// Requested maximum block size.
        max_block_size: u32,
    },

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}
