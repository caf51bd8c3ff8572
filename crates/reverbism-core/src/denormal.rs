//! Denormal suppression for feedback paths.
//!
//! Subnormal floats make feedback loops (comb filters, allpasses) crawl on
//! most CPUs once a reverb tail decays towards silence. [`flush_denormal`]
//! clamps tiny values to zero explicitly, so output stays identical on
//! targets where the FPU flush-to-zero mode is unavailable.

/// Flush values below the subnormal threshold to zero.
///
/// Cheaper than branching on `f32::is_subnormal` and also catches values
/// that are about to become subnormal after the next multiply.
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
