//! Parameter descriptors.
//!
//! A [`ParamDescriptor`] carries everything a host or UI needs to know about
//! one control: its stable identifiers, range, step grid, skew, default, unit
//! and how to render it as text. The descriptor itself holds no value; the
//! current value lives in the plugin's atomic parameter store.
//!
//! # Value spaces
//!
//! - **Plain**: the value the user sees (e.g. `0.0..=100.0` percent).
//! - **Normalized**: `0.0..=1.0` through the descriptor's [`ParamScale`], used
//!   by host automation lanes.
//! - **Unit interval**: an affine rescale of the plain range into `0.0..=1.0`,
//!   ignoring skew. This is what the reverb engine consumes, see
//!   [`ParamDescriptor::rescale`].
//!
//! # Display
//!
//! [`ParamDescriptor::write_value`] renders values so their width never
//! changes during automation: two decimals below 10, one decimal below 100,
//! an integer above that.

use alloc::string::String;
use core::fmt::{self, Write};

/// Scaling curve for parameter normalization.
///
/// - **Linear**: `normalized = (value - min) / (max - min)`
/// - **Power(skew)**: `normalized = ((value - min) / (max - min)).powf(1.0 / skew)`
///
/// A skew of 1.0 is the same as linear. Skew above 1.0 gives more resolution
/// at the top of the range, below 1.0 at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Linear mapping (default).
    #[default]
    Linear,
    /// Power curve with the given skew exponent.
    Power(f32),
}

/// Stable numeric parameter identifier.
///
/// Hosts record automation against this number, so once assigned it must
/// never change for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Parameter capability flags for host communication.
///
/// ```rust
/// use reverbism_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host can automate this parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter only takes discrete values (toggles).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Unit used when rendering a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Percentage, rendered as `"12.5 %"`.
    Percent,
    /// Two-state switch, rendered as `"On"` / `"Off"`.
    Toggle,
    /// Dimensionless.
    None,
}

impl ParamUnit {
    /// Suffix appended after the number.
    ///
    /// ```rust
    /// use reverbism_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Percent.suffix(), " %");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Percent => " %",
            ParamUnit::Toggle | ParamUnit::None => "",
        }
    }
}

/// Metadata for a single automatable parameter.
///
/// # Example
///
/// ```rust
/// use reverbism_core::{ParamDescriptor, ParamId};
///
/// let size = ParamDescriptor::percent("Size", 50.0).with_id(ParamId(1500), "size");
///
/// assert_eq!(size.format_value(50.0), "50.0 %");
/// assert_eq!(size.clamp(140.0), 100.0);
/// assert_eq!(size.rescale(25.0), 0.25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Display name (e.g. "Size").
    pub name: &'static str,

    /// Stable string identifier, used as the key in persisted state.
    pub string_id: &'static str,

    /// Stable numeric identifier for host automation.
    pub id: ParamId,

    /// Unit used for display.
    pub unit: ParamUnit,

    /// Minimum plain value.
    pub min: f32,

    /// Maximum plain value.
    pub max: f32,

    /// Declared default (plain value).
    pub default: f32,

    /// Grid interval; values are snapped to `min + n * step`. Zero disables
    /// snapping.
    pub step: f32,

    /// Normalization curve for host automation.
    pub scale: ParamScale,

    /// Capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Percentage control, `0..=100` with a 0.01 grid.
    pub fn percent(name: &'static str, default: f32) -> Self {
        Self {
            name,
            string_id: "",
            id: ParamId(0),
            unit: ParamUnit::Percent,
            min: 0.0,
            max: 100.0,
            default,
            step: 0.01,
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Dimensionless control, `0..=1` with a 0.001 grid.
    pub fn unit_interval(name: &'static str, default: f32) -> Self {
        Self {
            name,
            string_id: "",
            id: ParamId(0),
            unit: ParamUnit::None,
            min: 0.0,
            max: 1.0,
            default,
            step: 0.001,
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// On/off switch stored as `0.0` / `1.0`.
    pub fn toggle(name: &'static str, default: bool) -> Self {
        Self {
            name,
            string_id: "",
            id: ParamId(0),
            unit: ParamUnit::Toggle,
            min: 0.0,
            max: 1.0,
            default: if default { 1.0 } else { 0.0 },
            step: 1.0,
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Sets the numeric and string identifiers.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Sets the grid interval.
    pub const fn with_step(mut self, step: f32) -> Self {
        self.step = step;
        self
    }

    /// Sets the normalization curve.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Sets the capability flags.
    pub const fn with_flags(mut self, flags: ParamFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Whether this is an on/off switch.
    #[inline]
    pub fn is_toggle(&self) -> bool {
        self.unit == ParamUnit::Toggle
    }

    /// Clamps a value to the valid range. NaN maps to the default.
    ///
    /// ```rust
    /// use reverbism_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::percent("Mix", 50.0);
    /// assert_eq!(desc.clamp(-3.0), 0.0);
    /// assert_eq!(desc.clamp(f32::NAN), 50.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            self.default.clamp(self.min, self.max)
        } else {
            value.clamp(self.min, self.max)
        }
    }

    /// Clamps and snaps a value to the step grid.
    ///
    /// Snapping is idempotent: snapping an already snapped value returns the
    /// same bits, which keeps save/load round trips exact.
    #[inline]
    pub fn snap(&self, value: f32) -> f32 {
        let clamped = self.clamp(value);
        if self.step <= 0.0 {
            return clamped;
        }
        let steps = libm::roundf((clamped - self.min) / self.step);
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Default value, snapped to the grid.
    #[inline]
    pub fn default_value(&self) -> f32 {
        self.snap(self.default)
    }

    /// Affine rescale of a plain value into `0.0..=1.0`.
    ///
    /// Computed as `(value - min) * (1 / (max - min))` in `f32`; for a
    /// `0..=100` range this is bit-identical to `value * 0.01`.
    #[inline]
    pub fn rescale(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        (value - self.min) * (1.0 / range)
    }

    /// Converts a plain value to normalized `0.0..=1.0` through the scale.
    ///
    /// ```rust
    /// use reverbism_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::percent("Mix", 50.0);
    /// assert_eq!(desc.normalize(50.0), 0.5);
    /// ```
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let linear = ((self.clamp(value) - self.min) / range).clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => linear,
            ParamScale::Power(skew) => libm::powf(linear, 1.0 / skew),
        }
    }

    /// Converts a normalized value back to the plain range, snapped to the grid.
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let normalized = if normalized.is_nan() {
            self.normalize(self.default)
        } else {
            normalized.clamp(0.0, 1.0)
        };
        let curved = match self.scale {
            ParamScale::Linear => normalized,
            ParamScale::Power(skew) => libm::powf(normalized, skew),
        };
        self.snap(self.min + curved * (self.max - self.min))
    }

    /// Renders a value without allocating.
    pub fn write_value<W: Write>(&self, value: f32, out: &mut W) -> fmt::Result {
        if self.is_toggle() {
            return out.write_str(if value >= 0.5 { "On" } else { "Off" });
        }
        write_fixed_width(value, out)?;
        out.write_str(self.unit.suffix())
    }

    /// Renders a value to a new string.
    ///
    /// ```rust
    /// use reverbism_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::percent("Size", 50.0);
    /// assert_eq!(desc.format_value(0.014), "0.01 %");
    /// assert_eq!(desc.format_value(42.25), "42.3 %");
    /// assert_eq!(desc.format_value(100.0), "100 %");
    /// ```
    pub fn format_value(&self, value: f32) -> String {
        let mut text = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_value(value, &mut text);
        text
    }

    /// Parses display text back into a snapped plain value.
    ///
    /// Accepts a bare number or a number followed by the unit suffix; toggles
    /// accept `on`/`off`, `true`/`false` and `1`/`0`.
    pub fn parse_value(&self, text: &str) -> Option<f32> {
        let trimmed = text.trim();
        if self.is_toggle() {
            let on = ["on", "true", "1"]
                .iter()
                .any(|word| trimmed.eq_ignore_ascii_case(word));
            let off = ["off", "false", "0"]
                .iter()
                .any(|word| trimmed.eq_ignore_ascii_case(word));
            return match (on, off) {
                (true, _) => Some(self.max),
                (_, true) => Some(self.min),
                _ => None,
            };
        }

        let suffix = self.unit.suffix().trim();
        let number = if suffix.is_empty() {
            trimmed
        } else {
            trimmed.strip_suffix(suffix).unwrap_or(trimmed).trim_end()
        };
        number
            .parse::<f32>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| self.snap(v))
    }
}

/// Two decimals below 10, one below 100, integer otherwise.
///
/// Each threshold is checked on the value rounded to that precision, so
/// 9.996 renders as "10.0" rather than "10.00".
fn write_fixed_width<W: Write>(value: f32, out: &mut W) -> fmt::Result {
    // `+ 0.0` turns a negative zero into a positive one so "-0.00" never shows.
    let hundredths = libm::roundf(value * 100.0) / 100.0 + 0.0;
    if hundredths < 10.0 {
        return write!(out, "{hundredths:.2}");
    }
    let tenths = libm::roundf(value * 10.0) / 10.0;
    if tenths < 100.0 {
        return write!(out, "{tenths:.1}");
    }
    write!(out, "{}", libm::roundf(value) as i64)
}
