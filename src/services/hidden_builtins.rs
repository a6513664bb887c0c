// Hidden Built-ins Ledger
// Built-in presets cannot be removed, so "deleting" one records it here instead

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::models::BuiltinPreset;
use crate::services::kv_store::{keys, load_json, save_json, KeyValueStore};

#[derive(Clone)]
pub struct HiddenBuiltins {
    store: Arc<dyn KeyValueStore>,
}

impl HiddenBuiltins {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Currently hidden built-ins. Names that are not built-ins are dropped.
    pub fn hidden(&self) -> BTreeSet<BuiltinPreset> {
        let raw: Vec<String> = load_json(self.store.as_ref(), keys::HIDDEN_BUILTINS);
        raw.iter()
            .filter_map(|name| {
                let builtin = BuiltinPreset::from_name(name);
                if builtin.is_none() {
                    log::warn!("Ignoring unknown hidden preset '{name}'");
                }
                builtin
            })
            .collect()
    }

    pub fn is_hidden(&self, builtin: BuiltinPreset) -> bool {
        self.hidden().contains(&builtin)
    }

    pub fn any_hidden(&self) -> bool {
        !self.hidden().is_empty()
    }

    pub fn hide(&self, builtin: BuiltinPreset) {
        let mut hidden = self.hidden();
        if hidden.insert(builtin) {
            self.write(&hidden);
            log::info!("Hid built-in preset '{}'", builtin.as_str());
        }
    }

    pub fn restore_all(&self) {
        self.write(&BTreeSet::new());
    }

    fn write(&self, hidden: &BTreeSet<BuiltinPreset>) {
        let names: Vec<&str> = hidden.iter().map(|builtin| builtin.as_str()).collect();
        save_json(self.store.as_ref(), keys::HIDDEN_BUILTINS, &names);
    }
}
