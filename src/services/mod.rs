// brandsync Services
// Business logic layer

pub mod color_codec;
pub mod kv_store;
pub mod render_context;
mod token_store;
mod hidden_builtins;
mod preset_registry;
mod org_client;
mod org_sync;
mod settings_manager;
mod events;

#[cfg(test)]
pub(crate) mod fake_org_api;

pub use kv_store::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use render_context::{RenderContext, StyleSheet};
pub use token_store::*;
pub use hidden_builtins::*;
pub use preset_registry::*;
pub use org_client::*;
pub use org_sync::*;
pub use settings_manager::*;
pub use events::*;
