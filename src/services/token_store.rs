// TokenStore Service
// Keeps the active color tokens and theme mode in sync between storage and the render context

use std::sync::Arc;

use crate::models::{ColorToken, ThemeMode};
use crate::services::color_codec;
use crate::services::kv_store::{keys, KeyValueStore};
use crate::services::render_context::{RenderContext, PRIMARY_FOREGROUND_PROPERTY, PRIMARY_PROPERTY};

/// Returned by `get_primary_hex` when the live primary cannot be decoded
pub const FALLBACK_PRIMARY_HEX: &str = "#4f46e5";

#[derive(Clone)]
pub struct TokenStore {
    store: Arc<dyn KeyValueStore>,
    context: Arc<dyn RenderContext>,
}

impl TokenStore {
    pub fn new(store: Arc<dyn KeyValueStore>, context: Arc<dyn RenderContext>) -> Self {
        Self { store, context }
    }

    pub fn set_theme(&self, mode: ThemeMode) {
        self.context.set_dark(mode == ThemeMode::Dark);
        self.store.set(keys::THEME, mode.as_str());
    }

    /// Persisted theme mode, `light` when unset or unreadable
    pub fn theme_mode(&self) -> ThemeMode {
        self.store
            .get(keys::THEME)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    pub fn toggle_theme(&self) -> ThemeMode {
        let mode = self.theme_mode().toggled();
        self.set_theme(mode);
        mode
    }

    /// Set the primary color from a picked hex value.
    ///
    /// Returns `false` and leaves everything untouched when `hex` is malformed.
    pub fn set_primary_hex(&self, hex: &str) -> bool {
        let Some(token) = token_from_hex(hex) else {
            log::warn!("Ignoring malformed primary color '{hex}'");
            return false;
        };
        self.apply_tokens(&token);
        true
    }

    /// Live primary as hex; never fails
    pub fn get_primary_hex(&self) -> String {
        self.context
            .property(PRIMARY_PROPERTY)
            .and_then(|hsl| color_codec::hsl_string_to_hex(&hsl))
            .unwrap_or_else(|| FALLBACK_PRIMARY_HEX.to_string())
    }

    /// Both live tokens verbatim
    pub fn current_tokens(&self) -> ColorToken {
        let read = |name: &str| {
            self.context
                .property(name)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };
        ColorToken::new(read(PRIMARY_PROPERTY), read(PRIMARY_FOREGROUND_PROPERTY))
    }

    pub fn apply_tokens(&self, token: &ColorToken) {
        self.context.set_property(PRIMARY_PROPERTY, &token.primary);
        self.context
            .set_property(PRIMARY_FOREGROUND_PROPERTY, &token.primary_foreground);
        self.store.set(keys::PRIMARY, &token.primary);
        self.store.set(keys::PRIMARY_FOREGROUND, &token.primary_foreground);
    }

    /// Re-apply the persisted mode and tokens to a fresh render context
    pub fn restore_from_storage(&self) {
        let mode = self.theme_mode();
        self.context.set_dark(mode == ThemeMode::Dark);

        if let Some(primary) = self.store.get(keys::PRIMARY) {
            self.context.set_property(PRIMARY_PROPERTY, &primary);
        }
        if let Some(foreground) = self.store.get(keys::PRIMARY_FOREGROUND) {
            self.context.set_property(PRIMARY_FOREGROUND_PROPERTY, &foreground);
        }
        log::debug!("Restored {} theme and stored tokens", mode.as_str());
    }
}

/// Primary plus derived contrast foreground for a hex color
pub fn token_from_hex(hex: &str) -> Option<ColorToken> {
    let primary = color_codec::hex_to_hsl_string(hex)?;
    let lightness = color_codec::hex_to_hsl(hex)?.l;
    Some(ColorToken::new(primary, color_codec::contrast_foreground(lightness)))
}
