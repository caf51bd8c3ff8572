//! Reverbism Core - DSP primitives for the reverbism reverb
//!
//! This crate provides the building blocks the reverb engine is made of,
//! designed for real-time audio processing with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! ## Filters
//!
//! - [`CombFilter`] - Feedback comb filter with one-pole damping
//! - [`AllpassFilter`] - Schroeder allpass for diffusion
//!
//! ## Parameters
//!
//! - [`ParamDescriptor`] - Range, step, skew, unit and display formatting
//! - [`LinearSmoothedParam`] - Linear ramps for click-free coefficient changes
//!
//! ## Denormals
//!
//! - [`flush_denormal`] - Per-sample flush for feedback paths
//!
//! # no_std Support
//!
//! Disable the default `std` feature to use this crate on embedded targets.
//! Display formatting still requires `alloc`.
//!
//! # Design Principles
//!
//! - **Real-time safe**: Delay lines are sized up front; `process` never allocates
//! - **Deterministic**: All arithmetic is single-precision and order-stable

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod allpass;
pub mod comb;
pub mod denormal;
pub mod param;
pub mod param_info;

pub use allpass::AllpassFilter;
pub use comb::CombFilter;
pub use denormal::flush_denormal;
pub use param::LinearSmoothedParam;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit};
