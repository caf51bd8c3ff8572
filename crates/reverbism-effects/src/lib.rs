//! Reverbism Effects - the reverb unit driven by the reverbism plugin
//!
//! - [`Reverb`] - Freeverb-topology stereo/mono reverb
//! - [`ReverbParameters`] - Coefficient-space settings, each in `0.0..=1.0`
//!
//! ## Example
//!
//! ```rust
//! use reverbism_effects::{Reverb, ReverbParameters};
//!
//! let mut reverb = Reverb::new(48000.0);
//! reverb.set_parameters(&ReverbParameters {
//!     room_size: 0.8,
//!     wet_level: 0.5,
//!     ..ReverbParameters::default()
//! });
//!
//! let mut left = [0.0f32; 64];
//! let mut right = [0.0f32; 64];
//! left[0] = 1.0;
//! reverb.process_stereo(&mut left, &mut right);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod reverb;

pub use reverb::{MAX_SAMPLE_RATE, Reverb, ReverbParameters};
