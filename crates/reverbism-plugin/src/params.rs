//! Parameter tables for the two supported control layouts.
//!
//! | Layout        | Controls                                   | Dry level            |
//! |---------------|--------------------------------------------|----------------------|
//! | `Percentage`  | size, damp, width, mix (0-100 %), freeze   | `1 - mix`            |
//! | `Independent` | size, damp, width, wet, dry (0-1), freeze  | set by its own knob  |
//!
//! The two layouts sound different at the same knob positions, so they are
//! never mixed: a plugin instance picks one through
//! [`PluginConfig`](crate::PluginConfig).
//!
//! ## Parameter IDs
//!
//! Numeric IDs start at 1500 and are fixed per control across both layouts.
//! Never reuse or renumber them; host automation is recorded against them.

use reverbism_core::{ParamDescriptor, ParamId};
use serde::{Deserialize, Serialize};

/// Which set of controls the plugin exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamLayout {
    /// Four percentage knobs; dry level follows `1 - mix`.
    #[default]
    Percentage,
    /// Independent wet and dry levels in `0..=1`.
    Independent,
}

/// Typed handle for every control either layout can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    /// Room size.
    Size,
    /// High-frequency damping.
    Damp,
    /// Stereo width.
    Width,
    /// Wet/dry balance (percentage layout).
    Mix,
    /// Wet level (independent layout).
    Wet,
    /// Dry level (independent layout).
    Dry,
    /// Infinite sustain.
    Freeze,
}

impl ParamKey {
    /// Every key, in numeric ID order.
    pub const ALL: [ParamKey; 7] = [
        ParamKey::Size,
        ParamKey::Damp,
        ParamKey::Width,
        ParamKey::Mix,
        ParamKey::Wet,
        ParamKey::Dry,
        ParamKey::Freeze,
    ];

    /// Stable string identifier; the key used in persisted state.
    pub const fn string_id(self) -> &'static str {
        match self {
            ParamKey::Size => "size",
            ParamKey::Damp => "damp",
            ParamKey::Width => "width",
            ParamKey::Mix => "mix",
            ParamKey::Wet => "wet",
            ParamKey::Dry => "dry",
            ParamKey::Freeze => "freeze",
        }
    }

    /// Stable numeric identifier for host automation.
    pub const fn param_id(self) -> ParamId {
        ParamId(match self {
            ParamKey::Size => 1500,
            ParamKey::Damp => 1501,
            ParamKey::Width => 1502,
            ParamKey::Mix => 1503,
            ParamKey::Wet => 1504,
            ParamKey::Dry => 1505,
            ParamKey::Freeze => 1506,
        })
    }

    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            ParamKey::Size => "Size",
            ParamKey::Damp => "Damp",
            ParamKey::Width => "Width",
            ParamKey::Mix => "Mix",
            ParamKey::Wet => "Wet",
            ParamKey::Dry => "Dry",
            ParamKey::Freeze => "Freeze",
        }
    }

    /// Look up a key by its string identifier.
    pub fn from_string_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.string_id() == id)
    }
}

const PERCENTAGE_KEYS: [ParamKey; 5] = [
    ParamKey::Size,
    ParamKey::Damp,
    ParamKey::Width,
    ParamKey::Mix,
    ParamKey::Freeze,
];

const INDEPENDENT_KEYS: [ParamKey; 6] = [
    ParamKey::Size,
    ParamKey::Damp,
    ParamKey::Width,
    ParamKey::Wet,
    ParamKey::Dry,
    ParamKey::Freeze,
];

impl ParamLayout {
    /// Controls in declaration order.
    pub const fn keys(self) -> &'static [ParamKey] {
        match self {
            ParamLayout::Percentage => &PERCENTAGE_KEYS,
            ParamLayout::Independent => &INDEPENDENT_KEYS,
        }
    }

    /// Descriptor for `key`, or `None` when this layout does not declare it.
    pub fn descriptor(self, key: ParamKey) -> Option<ParamDescriptor> {
        let desc = match (self, key) {
            (_, ParamKey::Freeze) => ParamDescriptor::toggle(key.name(), false),
            (ParamLayout::Percentage, ParamKey::Size | ParamKey::Damp | ParamKey::Width | ParamKey::Mix) => {
                ParamDescriptor::percent(key.name(), 50.0)
            }
            (ParamLayout::Independent, ParamKey::Size | ParamKey::Damp) => {
                ParamDescriptor::unit_interval(key.name(), 0.5)
            }
            (ParamLayout::Independent, ParamKey::Width) => ParamDescriptor::unit_interval(key.name(), 1.0),
            (ParamLayout::Independent, ParamKey::Wet) => ParamDescriptor::unit_interval(key.name(), 0.33),
            (ParamLayout::Independent, ParamKey::Dry) => ParamDescriptor::unit_interval(key.name(), 0.4),
            _ => return None,
        };
        Some(desc.with_id(key.param_id(), key.string_id()))
    }

    /// All descriptors in declaration order.
    pub fn descriptors(self) -> Vec<ParamDescriptor> {
        self.keys()
            .iter()
            .filter_map(|&key| self.descriptor(key))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reverbism_core::ParamUnit;

    #[test]
    fn test_percentage_layout_table() {
        let descs = ParamLayout::Percentage.descriptors();
        let ids: Vec<&str> = descs.iter().map(|d| d.string_id).collect();
        assert_eq!(ids, ["size", "damp", "width", "mix", "freeze"]);

        for desc in &descs[..4] {
            assert_eq!((desc.min, desc.max, desc.default), (0.0, 100.0, 50.0));
            assert_eq!(desc.step, 0.01);
            assert_eq!(desc.unit, ParamUnit::Percent);
        }
        assert!(descs[4].is_toggle());
        assert_eq!(descs[4].default, 0.0);
    }

    #[test]
    fn test_independent_layout_table() {
        let descs = ParamLayout::Independent.descriptors();
        let defaults: Vec<(&str, f32)> = descs.iter().map(|d| (d.string_id, d.default)).collect();
        assert_eq!(
            defaults,
            [
                ("size", 0.5),
                ("damp", 0.5),
                ("width", 1.0),
                ("wet", 0.33),
                ("dry", 0.4),
                ("freeze", 0.0),
            ]
        );
        for desc in &descs[..5] {
            assert_eq!((desc.min, desc.max, desc.step), (0.0, 1.0, 0.001));
            assert_eq!(desc.unit, ParamUnit::None);
        }
    }

    #[test]
    fn test_layouts_do_not_share_mix_controls() {
        assert!(ParamLayout::Percentage.descriptor(ParamKey::Wet).is_none());
        assert!(ParamLayout::Percentage.descriptor(ParamKey::Dry).is_none());
        assert!(ParamLayout::Independent.descriptor(ParamKey::Mix).is_none());
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let mut ids: Vec<u32> = ParamKey::ALL.iter().map(|k| k.param_id().0).collect();
        ids.dedup();
        assert_eq!(ids, (1500..1507).collect::<Vec<_>>());

        for key in ParamKey::ALL {
            assert_eq!(ParamKey::from_string_id(key.string_id()), Some(key));
        }
        assert_eq!(ParamKey::from_string_id("room"), None);

        let size_pct = ParamLayout::Percentage.descriptor(ParamKey::Size).unwrap();
        let size_ind = ParamLayout::Independent.descriptor(ParamKey::Size).unwrap();
        assert_eq!(size_pct.id, size_ind.id);
    }

    #[test]
    fn test_layout_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            layout: ParamLayout,
        }
        let parsed: Wrapper = toml::from_str("layout = \"independent\"").unwrap();
        assert_eq!(parsed.layout, ParamLayout::Independent);
        assert_eq!(ParamLayout::default(), ParamLayout::Percentage);
    }
}
