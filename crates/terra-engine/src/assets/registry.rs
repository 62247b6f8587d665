use std::collections::BTreeMap;
use crate::assets::manifest::{TextureManifest, TextureSlot};
use crate::error::TextureError;

/// Load state of one texture slot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextureState {
    Pending,
    Loaded,
    /// The load failed or timed out; the host draws this RGBA colour instead.
    Fallback([f32; 4]),
}

impl TextureState {
    pub fn is_resolved(&self) -> bool {
        !matches!(self, TextureState::Pending)
    }
}

/// Tracks which textures are usable. The frame loop starts only once every
/// slot is resolved, either loaded or replaced by its fallback.
#[derive(Debug, Clone)]
pub struct TextureRegistry {
    slots: BTreeMap<TextureSlot, TextureState>,
    fallbacks: BTreeMap<TextureSlot, [f32; 4]>,
    /// Slots that fell back since the last drain.
    newly_fallen_back: Vec<TextureSlot>,
}

impl TextureRegistry {
    /// Build a registry from a manifest. Every slot starts pending.
    pub fn from_manifest(manifest: &TextureManifest) -> Self {
        let mut slots = BTreeMap::new();
        let mut fallbacks = BTreeMap::new();
        for slot in TextureSlot::ALL {
            slots.insert(slot, TextureState::Pending);
            let color = manifest
                .descriptor(slot)
                .map(|d| d.fallback)
                .unwrap_or([0.5, 0.5, 0.5, 1.0]);
            fallbacks.insert(slot, color);
        }
        Self {
            slots,
            fallbacks,
            newly_fallen_back: Vec::new(),
        }
    }

    pub fn state(&self, slot: TextureSlot) -> TextureState {
        self.slots.get(&slot).copied().unwrap_or(TextureState::Pending)
    }

    /// Host reports a successful load. A slot that already fell back stays
    /// on its fallback.
    pub fn mark_loaded(&mut self, name: &str) -> Result<TextureSlot, TextureError> {
        let slot = Self::lookup(name)?;
        if let Some(state) = self.slots.get_mut(&slot) {
            if *state == TextureState::Pending {
                *state = TextureState::Loaded;
                log::info!("texture `{name}` loaded");
            }
        }
        Ok(slot)
    }

    /// Host reports a failed load; the slot switches to its fallback.
    pub fn mark_failed(&mut self, name: &str) -> Result<TextureSlot, TextureError> {
        let slot = Self::lookup(name)?;
        self.fall_back(slot, "load failed");
        Ok(slot)
    }

    /// Resolve every slot still pending after `timeout_ms` of waiting.
    pub fn expire(&mut self, waited_ms: f64, timeout_ms: f64) {
        if waited_ms < timeout_ms {
            return;
        }
        let pending: Vec<TextureSlot> = self
            .slots
            .iter()
            .filter(|(_, state)| !state.is_resolved())
            .map(|(slot, _)| *slot)
            .collect();
        for slot in pending {
            self.fall_back(slot, "timed out");
        }
    }

    pub fn is_ready(&self) -> bool {
        self.slots.values().all(TextureState::is_resolved)
    }

    pub fn pending_count(&self) -> usize {
        self.slots.values().filter(|s| !s.is_resolved()).count()
    }

    /// Slots that fell back since the last call.
    pub fn drain_fallbacks(&mut self) -> impl Iterator<Item = TextureSlot> + '_ {
        self.newly_fallen_back.drain(..)
    }

    fn fall_back(&mut self, slot: TextureSlot, reason: &str) {
        let color = self.fallbacks.get(&slot).copied().unwrap_or([0.5, 0.5, 0.5, 1.0]);
        if let Some(state) = self.slots.get_mut(&slot) {
            if *state == TextureState::Pending {
                *state = TextureState::Fallback(color);
                self.newly_fallen_back.push(slot);
                log::warn!("texture `{}` {reason}; using fallback colour", slot.name());
            }
        }
    }

    fn lookup(name: &str) -> Result<TextureSlot, TextureError> {
        TextureSlot::from_name(name).ok_or_else(|| TextureError::UnknownSlot(name.to_string()))
    }
}

impl Default for TextureRegistry {
    fn default() -> Self {
        Self::from_manifest(&TextureManifest::default())
    }
}
