use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use crate::error::TextureError;

/// The six image resources the viewer needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureSlot {
    Day,
    Night,
    Specular,
    Clouds,
    Moon,
    Stars,
}

impl TextureSlot {
    pub const ALL: [TextureSlot; 6] = [
        TextureSlot::Day,
        TextureSlot::Night,
        TextureSlot::Specular,
        TextureSlot::Clouds,
        TextureSlot::Moon,
        TextureSlot::Stars,
    ];

    /// Name used by the host when reporting load results.
    pub fn name(self) -> &'static str {
        match self {
            TextureSlot::Day => "day",
            TextureSlot::Night => "night",
            TextureSlot::Specular => "specular",
            TextureSlot::Clouds => "clouds",
            TextureSlot::Moon => "moon",
            TextureSlot::Stars => "stars",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.name() == name)
    }

    /// Stable index, used in event payloads.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Where one texture comes from and what replaces it on failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureDescriptor {
    pub url: String,
    /// RGBA in [0, 1], used as a 1×1 texture when the load fails.
    #[serde(default = "default_fallback")]
    pub fallback: [f32; 4],
}

fn default_fallback() -> [f32; 4] {
    [0.5, 0.5, 0.5, 1.0]
}

/// Texture manifest for the viewer. Loaded from JSON or built from defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureManifest {
    /// Credit line shown by the host.
    #[serde(default)]
    pub attribution: String,
    /// Slots missing from the JSON keep their default descriptor.
    #[serde(default)]
    pub textures: BTreeMap<TextureSlot, TextureDescriptor>,
}

const SSS_BASE: &str = "https://www.solarsystemscope.com/textures/download/";
const SSS_ATTRIBUTION: &str =
    "Textures from Solar System Scope (https://www.solarsystemscope.com/textures/), CC BY 4.0";

impl TextureManifest {
    /// Parse a manifest from a JSON string and fill in missing slots.
    pub fn from_json(json: &str) -> Result<Self, TextureError> {
        let mut manifest: Self = serde_json::from_str(json)?;
        manifest.fill_defaults();
        Ok(manifest)
    }

    pub fn descriptor(&self, slot: TextureSlot) -> Option<&TextureDescriptor> {
        self.textures.get(&slot)
    }

    /// Add default descriptors for slots the manifest does not mention.
    pub fn fill_defaults(&mut self) {
        let defaults = Self::default();
        for (slot, desc) in defaults.textures {
            self.textures.entry(slot).or_insert(desc);
        }
        if self.attribution.is_empty() {
            self.attribution = defaults.attribution;
        }
    }
}

impl Default for TextureManifest {
    /// The 2k Solar System Scope maps.
    fn default() -> Self {
        let entry = |file: &str, fallback: [f32; 4]| TextureDescriptor {
            url: format!("{SSS_BASE}{file}"),
            fallback,
        };
        let textures = BTreeMap::from([
            (TextureSlot::Day, entry("2k_earth_daymap.jpg", [0.10, 0.25, 0.55, 1.0])),
            (TextureSlot::Night, entry("2k_earth_nightmap.jpg", [0.01, 0.01, 0.03, 1.0])),
            (TextureSlot::Specular, entry("2k_earth_specular_map.jpg", [0.0, 0.0, 0.0, 1.0])),
            (TextureSlot::Clouds, entry("2k_earth_clouds.jpg", [1.0, 1.0, 1.0, 0.0])),
            (TextureSlot::Moon, entry("2k_moon.jpg", [0.55, 0.55, 0.55, 1.0])),
            (TextureSlot::Stars, entry("2k_stars.jpg", [0.0, 0.0, 0.0, 1.0])),
        ]);
        Self {
            attribution: SSS_ATTRIBUTION.to_string(),
            textures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_manifest_covers_every_slot() {
        let manifest = TextureManifest::default();
        for slot in TextureSlot::ALL {
            let desc = manifest.descriptor(slot).expect("slot missing");
            assert!(desc.url.starts_with("https://www.solarsystemscope.com/"));
        }
        assert!(manifest.attribution.contains("CC BY 4.0"));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{
            "textures": {
                "moon": { "url": "textures/moon.jpg", "fallback": [0.3, 0.3, 0.3, 1.0] },
                "day": { "url": "textures/earth_day.jpg" }
            }
        }"#;
        let manifest = TextureManifest::from_json(json).unwrap();
        assert_eq!(manifest.textures.len(), 6);
        assert_eq!(manifest.descriptor(TextureSlot::Moon).unwrap().url, "textures/moon.jpg");
        assert_eq!(manifest.descriptor(TextureSlot::Day).unwrap().fallback, [0.5, 0.5, 0.5, 1.0]);
        assert!(manifest.descriptor(TextureSlot::Stars).unwrap().url.ends_with("2k_stars.jpg"));
    }

    #[test]
    fn unknown_slot_is_rejected() {
        let json = r#"{ "textures": { "sun": { "url": "sun.jpg" } } }"#;
        assert!(matches!(TextureManifest::from_json(json), Err(TextureError::Json(_))));
    }

    #[test]
    fn slot_names_round_trip() {
        for slot in TextureSlot::ALL {
            assert_eq!(TextureSlot::from_name(slot.name()), Some(slot));
        }
        assert_eq!(TextureSlot::from_name("sun"), None);
        assert_eq!(TextureSlot::Moon.index(), 4);
    }
}
