use std::str::FromStr;

use serde::{Deserialize, Serialize};

// Theme mode: light or dark
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(format!("Unknown theme mode '{other}'")),
        }
    }
}

/// The accent color pair the UI draws with.
///
/// Both values are HSL strings in the `"H S% L%"` form used for CSS variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorToken {
    /// Value of `--primary`
    pub primary: String,
    /// Value of `--primary-foreground`, text drawn on top of the primary
    pub primary_foreground: String,
}

impl ColorToken {
    pub fn new(primary: impl Into<String>, primary_foreground: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            primary_foreground: primary_foreground.into(),
        }
    }
}
