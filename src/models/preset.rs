use serde::{Deserialize, Serialize};

/// Presets that ship with the application.
///
/// These can be hidden but never removed or edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinPreset {
    Default,
    Mands,
    Hm,
}

impl BuiltinPreset {
    /// Catalog order
    pub const ALL: [BuiltinPreset; 3] = [BuiltinPreset::Default, BuiltinPreset::Mands, BuiltinPreset::Hm];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(BuiltinPreset::Default),
            "mands" => Some(BuiltinPreset::Mands),
            "hm" => Some(BuiltinPreset::Hm),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltinPreset::Default => "default",
            BuiltinPreset::Mands => "mands",
            BuiltinPreset::Hm => "hm",
        }
    }

    /// Human label, also used as the organization name
    pub fn display_name(&self) -> &'static str {
        match self {
            BuiltinPreset::Default => "Default",
            BuiltinPreset::Mands => "M&S",
            BuiltinPreset::Hm => "H&M",
        }
    }

    /// Brand color shown next to the preset in pickers
    pub fn swatch_hex(&self) -> &'static str {
        match self {
            // indigo-600
            BuiltinPreset::Default => "#4f46e5",
            // Marks & Spencer green
            BuiltinPreset::Mands => "#00563B",
            // H&M red
            BuiltinPreset::Hm => "#E21836",
        }
    }
}

pub fn is_builtin(name: &str) -> bool {
    BuiltinPreset::from_name(name).is_some()
}

/// Label for a preset name: built-ins get their brand label, customs are verbatim.
pub fn display_name(name: &str) -> String {
    match BuiltinPreset::from_name(name) {
        Some(builtin) => builtin.display_name().to_string(),
        None => name.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetSource {
    Builtin,
    Custom,
}

// Preset summary for display in pickers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetSummary {
    pub name: String,
    pub display_name: String,
    pub source: PresetSource,
    pub swatch: String,
}
