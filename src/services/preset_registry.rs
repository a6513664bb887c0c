// PresetRegistry Service
// Catalog of built-in and custom brand presets

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::models::{BuiltinPreset, ColorToken, PresetSource, PresetSummary};
use crate::services::color_codec;
use crate::services::hidden_builtins::HiddenBuiltins;
use crate::services::kv_store::{keys, load_json, save_json, KeyValueStore};
use crate::services::token_store::{token_from_hex, TokenStore, FALLBACK_PRIMARY_HEX};

/// Brand every fallback lands on
pub const DEFAULT_BRAND: &str = "default";

const DEFAULT_PRIMARY: &str = "221.2 83.2% 53.3%";
const DEFAULT_PRIMARY_FOREGROUND: &str = "210 40% 98%";

/// Hard-coded tokens of a built-in preset
pub fn builtin_tokens(builtin: BuiltinPreset) -> ColorToken {
    let default_tokens = || ColorToken::new(DEFAULT_PRIMARY, DEFAULT_PRIMARY_FOREGROUND);
    match builtin {
        BuiltinPreset::Default => default_tokens(),
        BuiltinPreset::Mands | BuiltinPreset::Hm => {
            token_from_hex(builtin.swatch_hex()).unwrap_or_else(default_tokens)
        }
    }
}

/// User-created presets in storage insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomPresets {
    entries: Vec<(String, ColorToken)>,
}

impl CustomPresets {
    fn decode(raw: Map<String, Value>) -> Self {
        let entries = raw
            .into_iter()
            .filter_map(|(name, value)| match serde_json::from_value::<ColorToken>(value) {
                Ok(token) => Some((name, token)),
                Err(e) => {
                    log::warn!("Dropping unreadable custom preset '{name}': {e}");
                    None
                }
            })
            .collect();
        Self { entries }
    }

    fn encode(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (name, token) in &self.entries {
            match serde_json::to_value(token) {
                Ok(value) => {
                    map.insert(name.clone(), value);
                }
                Err(e) => log::error!("Failed to encode custom preset '{name}': {e}"),
            }
        }
        map
    }

    pub fn get(&self, name: &str) -> Option<&ColorToken> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, token)| token)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Overwrites in place, otherwise appends
    pub fn insert(&mut self, name: &str, token: ColorToken) {
        match self.entries.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing)) => *existing = token,
            None => self.entries.push((name.to_string(), token)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ColorToken> {
        let index = self.entries.iter().position(|(existing, _)| existing == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

enum Resolved {
    Builtin(BuiltinPreset),
    Custom(ColorToken),
    Missing,
}

#[derive(Clone)]
pub struct PresetRegistry {
    store: Arc<dyn KeyValueStore>,
    tokens: TokenStore,
    hidden: HiddenBuiltins,
}

impl PresetRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, tokens: TokenStore) -> Self {
        let hidden = HiddenBuiltins::new(Arc::clone(&store));
        Self { store, tokens, hidden }
    }

    pub fn custom_presets(&self) -> CustomPresets {
        let raw: Map<String, Value> = load_json(self.store.as_ref(), keys::CUSTOM_PRESETS);
        CustomPresets::decode(raw)
    }

    fn save_custom_presets(&self, presets: &CustomPresets) {
        save_json(self.store.as_ref(), keys::CUSTOM_PRESETS, &presets.encode());
    }

    pub fn custom_preset(&self, name: &str) -> Option<ColorToken> {
        self.custom_presets().get(name).cloned()
    }

    /// Visible built-ins in catalog order, then custom presets.
    ///
    /// Custom records named like a built-in are shadowed and not listed.
    pub fn list_presets(&self) -> Vec<String> {
        let hidden = self.hidden.hidden();
        let builtins = BuiltinPreset::ALL
            .into_iter()
            .filter(|builtin| !hidden.contains(builtin))
            .map(|builtin| builtin.as_str().to_string());

        let customs = self.custom_presets();
        let custom_names = customs
            .names()
            .filter(|name| BuiltinPreset::from_name(name).is_none())
            .map(str::to_string)
            .collect::<Vec<_>>();

        builtins.chain(custom_names).collect()
    }

    pub fn list_preset_summaries(&self) -> Vec<PresetSummary> {
        let customs = self.custom_presets();
        self.list_presets()
            .into_iter()
            .map(|name| match BuiltinPreset::from_name(&name) {
                Some(builtin) => PresetSummary {
                    display_name: builtin.display_name().to_string(),
                    source: PresetSource::Builtin,
                    swatch: builtin.swatch_hex().to_string(),
                    name,
                },
                None => PresetSummary {
                    display_name: name.clone(),
                    source: PresetSource::Custom,
                    swatch: customs
                        .get(&name)
                        .and_then(|token| color_codec::hsl_string_to_hex(&token.primary))
                        .unwrap_or_else(|| FALLBACK_PRIMARY_HEX.to_string()),
                    name,
                },
            })
            .collect()
    }

    pub fn any_builtins_hidden(&self) -> bool {
        self.hidden.any_hidden()
    }

    /// Stored active brand without validation
    pub fn active_brand(&self) -> String {
        self.store
            .get(keys::BRAND)
            .filter(|brand| !brand.is_empty())
            .unwrap_or_else(|| DEFAULT_BRAND.to_string())
    }

    fn resolve(&self, name: &str) -> Resolved {
        if let Some(builtin) = BuiltinPreset::from_name(name) {
            // default stays usable as the fallback even when hidden
            if builtin == BuiltinPreset::Default || !self.hidden.is_hidden(builtin) {
                return Resolved::Builtin(builtin);
            }
            return Resolved::Missing;
        }
        match self.custom_preset(name) {
            Some(token) => Resolved::Custom(token),
            None => Resolved::Missing,
        }
    }

    fn fall_back_to_default(&self) -> String {
        self.tokens.apply_tokens(&builtin_tokens(BuiltinPreset::Default));
        self.store.set(keys::BRAND, DEFAULT_BRAND);
        DEFAULT_BRAND.to_string()
    }

    /// Validate the stored active brand, falling back to `default` when it
    /// no longer resolves. Returns the brand that is active afterwards.
    pub fn resolve_active_brand(&self) -> String {
        self.settle_active_brand(None)
    }

    fn settle_active_brand(&self, removed: Option<&str>) -> String {
        let active = self.active_brand();
        let removed_active = removed.is_some_and(|name| name == active);
        if removed_active || matches!(self.resolve(&active), Resolved::Missing) {
            log::info!("Active brand '{active}' is no longer available, falling back to default");
            return self.fall_back_to_default();
        }
        active
    }

    /// Apply a preset and make it the active brand. Returns the brand that
    /// ended up active, which is `default` when `name` does not resolve.
    pub fn apply_preset(&self, name: &str) -> String {
        match self.resolve(name) {
            Resolved::Builtin(builtin) => {
                self.tokens.apply_tokens(&builtin_tokens(builtin));
                self.store.set(keys::BRAND, builtin.as_str());
                builtin.as_str().to_string()
            }
            Resolved::Custom(token) => {
                self.tokens.apply_tokens(&token);
                self.store.set(keys::BRAND, name);
                name.to_string()
            }
            Resolved::Missing => {
                log::warn!("Preset '{name}' is hidden or missing, applying default");
                self.fall_back_to_default()
            }
        }
    }

    /// Save the live tokens as a custom preset and make it active
    pub fn add_preset(&self, name: &str) -> bool {
        let clean = name.trim();
        if clean.is_empty() {
            return false;
        }

        let mut customs = self.custom_presets();
        customs.insert(clean, self.tokens.current_tokens());
        self.save_custom_presets(&customs);
        self.store.set(keys::BRAND, clean);
        log::info!("Saved custom preset '{clean}'");
        true
    }

    /// Rename a custom preset, or duplicate a built-in under a new name.
    pub fn rename_preset(&self, from: &str, to: &str) -> bool {
        let from = from.trim();
        let to = to.trim();
        if from.is_empty() || to.is_empty() || from == to {
            return false;
        }

        let mut customs = self.custom_presets();
        if let Some(builtin) = BuiltinPreset::from_name(from) {
            customs.insert(to, builtin_tokens(builtin));
            log::info!("Duplicated built-in preset '{from}' as '{to}'");
        } else {
            let Some(token) = customs.remove(from) else {
                return false;
            };
            customs.insert(to, token);
            log::info!("Renamed custom preset '{from}' to '{to}'");
        }

        self.save_custom_presets(&customs);
        self.store.set(keys::BRAND, to);
        true
    }

    /// Hide a built-in or remove a custom preset
    pub fn delete_preset(&self, name: &str) -> bool {
        let clean = name.trim();
        if clean.is_empty() {
            return false;
        }

        if let Some(builtin) = BuiltinPreset::from_name(clean) {
            self.hidden.hide(builtin);
        } else {
            let mut customs = self.custom_presets();
            if customs.remove(clean).is_none() {
                return false;
            }
            self.save_custom_presets(&customs);
            log::info!("Deleted custom preset '{clean}'");
        }

        self.settle_active_brand(Some(clean));
        true
    }

    pub fn restore_all_builtins(&self) {
        self.hidden.restore_all();
        log::info!("Restored all built-in presets");
    }
}
