// Render Context
// The live style-variable surface the UI reads its colors from

use std::collections::BTreeMap;
use std::sync::RwLock;

pub const PRIMARY_PROPERTY: &str = "--primary";
pub const PRIMARY_FOREGROUND_PROPERTY: &str = "--primary-foreground";

/// Mutable custom properties plus the dark-mode class.
///
/// Implementations must be read-after-write consistent.
pub trait RenderContext: Send + Sync {
    fn set_property(&self, name: &str, value: &str);
    fn property(&self, name: &str) -> Option<String>;
    fn set_dark(&self, dark: bool);
    fn is_dark(&self) -> bool;
}

#[derive(Default)]
struct StyleState {
    properties: BTreeMap<String, String>,
    dark: bool,
}

/// In-process style sheet that can be rendered as a `:root` CSS block
#[derive(Default)]
pub struct StyleSheet {
    state: RwLock<StyleState>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the current properties, e.g. for injection into a host page.
    pub fn to_css(&self) -> String {
        let Ok(state) = self.state.read() else {
            return String::new();
        };

        let selector = if state.dark { ":root.dark" } else { ":root" };
        let mut css = format!("{selector} {{\n");
        for (name, value) in &state.properties {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push_str("}\n");
        css
    }
}

impl RenderContext for StyleSheet {
    fn set_property(&self, name: &str, value: &str) {
        if let Ok(mut state) = self.state.write() {
            state.properties.insert(name.to_string(), value.to_string());
        }
    }

    fn property(&self, name: &str) -> Option<String> {
        self.state.read().ok()?.properties.get(name).cloned()
    }

    fn set_dark(&self, dark: bool) {
        if let Ok(mut state) = self.state.write() {
            state.dark = dark;
        }
    }

    fn is_dark(&self) -> bool {
        self.state.read().map(|state| state.dark).unwrap_or(false)
    }
}
