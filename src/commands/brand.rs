// Brand Commands
// User-facing preset actions, sequenced across the registry, token store and org sync

use std::sync::Arc;

use crate::models::{display_name, is_builtin, ActiveBrand, OverwritePolicy, PresetSummary, ThemeMode};
use crate::services::{
    emit_event, EventSink, KeyValueStore, OrgApiResult, OrgSync, OrganizationApi, PresetRegistry,
    RenderContext, TokenStore, BRAND_CHANGED_EVENT, DEFAULT_BRAND, PRESETS_UPDATED_EVENT,
};

/// Runs one user intent at a time.
///
/// Nothing here prevents two actions from interleaving across an organization
/// request; callers must wait for one action to finish before starting the next.
pub struct BrandOrchestrator {
    tokens: TokenStore,
    registry: PresetRegistry,
    org_sync: OrgSync,
    events: Arc<dyn EventSink>,
    overwrite_policy: OverwritePolicy,
}

impl BrandOrchestrator {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        context: Arc<dyn RenderContext>,
        api: Arc<dyn OrganizationApi>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let tokens = TokenStore::new(Arc::clone(&store), context);
        let registry = PresetRegistry::new(Arc::clone(&store), tokens.clone());
        let org_sync = OrgSync::new(store, api);
        Self {
            tokens,
            registry,
            org_sync,
            events,
            overwrite_policy: OverwritePolicy::default(),
        }
    }

    pub fn with_overwrite_policy(mut self, policy: OverwritePolicy) -> Self {
        self.overwrite_policy = policy;
        self
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn registry(&self) -> &PresetRegistry {
        &self.registry
    }

    pub fn org_sync(&self) -> &OrgSync {
        &self.org_sync
    }

    pub fn active_brand(&self) -> ActiveBrand {
        let brand = self.registry.active_brand();
        ActiveBrand {
            display_name: display_name(&brand),
            org_id: self.org_sync.current_org_id(),
            brand,
        }
    }

    pub fn list_presets(&self) -> Vec<PresetSummary> {
        self.registry.list_preset_summaries()
    }

    fn publish_active_brand(&self) -> ActiveBrand {
        let active = self.active_brand();
        emit_event(self.events.as_ref(), BRAND_CHANGED_EVENT, &active);
        active
    }

    fn publish_presets(&self) -> Vec<PresetSummary> {
        let presets = self.list_presets();
        emit_event(self.events.as_ref(), PRESETS_UPDATED_EVENT, &presets);
        presets
    }

    fn rejects_overwrite(&self, name: &str) -> bool {
        self.overwrite_policy == OverwritePolicy::Reject
            && self.registry.list_presets().iter().any(|existing| existing == name)
    }

    /// Whether a custom preset may be saved under `name`
    fn accepts_custom_name(&self, name: &str, replacing: Option<&str>) -> bool {
        if is_builtin(name) {
            log::warn!("Preset name '{name}' is reserved for a built-in preset");
            return false;
        }
        if replacing != Some(name) && self.rejects_overwrite(name) {
            log::warn!("Preset '{name}' already exists, not overwriting");
            return false;
        }
        true
    }

    /// Organization for `brand`, created in the live primary color when missing
    async fn ensure_brand_org(&self, brand: &str) -> OrgApiResult<i64> {
        let color = self.tokens.get_primary_hex();
        self.org_sync
            .ensure_org_for_brand(&display_name(brand), Some(color.as_str()))
            .await
    }

    /// Bring a fresh render context up to the persisted state.
    ///
    /// Stored tokens win over the brand's preset tokens so a picked accent
    /// survives restarts; the brand itself is still validated.
    pub fn restore_from_storage(&self) -> ActiveBrand {
        self.tokens.restore_from_storage();
        if self.tokens.current_tokens().primary.is_empty() {
            let brand = self.registry.active_brand();
            self.registry.apply_preset(&brand);
        } else {
            self.registry.resolve_active_brand();
        }
        self.active_brand()
    }

    /// Apply a preset, then make sure its organization exists.
    ///
    /// An organization failure leaves the preset applied and the new brand
    /// published; the error is still returned.
    pub async fn select_preset(&self, name: &str) -> OrgApiResult<ActiveBrand> {
        let brand = self.registry.apply_preset(name);
        let synced = self.ensure_brand_org(&brand).await;
        let active = self.publish_active_brand();
        synced.map(|_| active)
    }

    /// Save the live tokens as a new preset and switch to it.
    ///
    /// `Ok(None)` when the name is blank, belongs to a built-in, or is refused
    /// by the overwrite policy.
    pub async fn add_preset(&self, name: &str) -> OrgApiResult<Option<ActiveBrand>> {
        let clean = name.trim();
        if !self.accepts_custom_name(clean, None) || !self.registry.add_preset(clean) {
            return Ok(None);
        }

        let brand = self.registry.apply_preset(clean);
        let synced = self.ensure_brand_org(&brand).await;
        self.publish_presets();
        let active = self.publish_active_brand();
        synced.map(|_| Some(active))
    }

    /// Rename a custom preset, or duplicate a built-in, and switch to the result
    pub async fn rename_preset(&self, from: &str, to: &str) -> OrgApiResult<Option<ActiveBrand>> {
        let to_clean = to.trim();
        if !self.accepts_custom_name(to_clean, Some(from.trim())) || !self.registry.rename_preset(from, to) {
            return Ok(None);
        }

        let brand = self.registry.apply_preset(to_clean);
        let synced = self.ensure_brand_org(&brand).await;
        self.publish_presets();
        let active = self.publish_active_brand();
        synced.map(|_| Some(active))
    }

    /// Delete a preset together with its organization.
    ///
    /// The organization goes first; if that request fails nothing local has
    /// changed and the delete can be retried.
    pub async fn delete_preset(&self, name: &str) -> OrgApiResult<Option<ActiveBrand>> {
        let clean = name.trim();
        if clean.is_empty() {
            return Ok(None);
        }

        // the org step may already move the active brand, so remember it first
        let was_active = self.registry.active_brand() == clean;
        self.org_sync.delete_org_for_brand(&display_name(clean)).await?;
        if !self.registry.delete_preset(clean) {
            return Ok(None);
        }
        if was_active {
            self.registry.apply_preset(DEFAULT_BRAND);
        }

        let brand = self.registry.active_brand();
        self.org_sync.sync_current_org(&display_name(&brand));
        self.publish_presets();
        Ok(Some(self.publish_active_brand()))
    }

    pub fn restore_builtins(&self) -> Vec<PresetSummary> {
        self.registry.restore_all_builtins();
        self.publish_presets()
    }

    pub fn set_theme(&self, mode: ThemeMode) {
        self.tokens.set_theme(mode);
    }

    pub fn toggle_theme(&self) -> ThemeMode {
        self.tokens.toggle_theme()
    }

    /// Set a custom accent color on top of the active preset
    pub fn pick_accent(&self, hex: &str) -> bool {
        self.tokens.set_primary_hex(hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BuiltinPreset, ColorToken, DEFAULT_ORG_ID};
    use crate::services::fake_org_api::FakeOrgApi;
    use crate::services::{builtin_tokens, MemoryStore, RecordingEventSink, StyleSheet};

    struct Harness {
        orchestrator: BrandOrchestrator,
        api: Arc<FakeOrgApi>,
        events: Arc<RecordingEventSink>,
        store: Arc<MemoryStore>,
    }

    fn harness(orgs: &[(i64, &str)]) -> Harness {
        let store = Arc::new(MemoryStore::new());
        let api = Arc::new(FakeOrgApi::with_orgs(orgs));
        let events = Arc::new(RecordingEventSink::new());
        let orchestrator = BrandOrchestrator::new(
            store.clone(),
            Arc::new(StyleSheet::new()),
            api.clone(),
            events.clone(),
        );
        Harness { orchestrator, api, events, store }
    }

    fn event_names(events: &RecordingEventSink) -> Vec<String> {
        events.take().into_iter().map(|(name, _)| name).collect()
    }

    #[tokio::test]
    async fn test_select_builtin_uses_display_name_for_org() {
        let h = harness(&[(1, "Default"), (7, "M&S")]);

        let active = h.orchestrator.select_preset("mands").await.unwrap();
        assert_eq!(active.brand, "mands");
        assert_eq!(active.display_name, "M&S");
        assert_eq!(active.org_id, 7);
        assert_eq!(h.orchestrator.tokens().current_tokens(), builtin_tokens(BuiltinPreset::Mands));
        assert_eq!(event_names(&h.events), vec![BRAND_CHANGED_EVENT]);
    }

    #[tokio::test]
    async fn test_select_keeps_preset_when_org_sync_fails() {
        let h = harness(&[]);
        h.api.set_failing(true);

        assert!(h.orchestrator.select_preset("hm").await.is_err());
        assert_eq!(h.orchestrator.registry().active_brand(), "hm");
        assert_eq!(h.orchestrator.tokens().current_tokens(), builtin_tokens(BuiltinPreset::Hm));
        assert_eq!(event_names(&h.events), vec![BRAND_CHANGED_EVENT]);
    }

    #[tokio::test]
    async fn test_add_creates_org_for_new_brand() {
        let h = harness(&[(1, "Default")]);
        h.orchestrator.pick_accent("#000000");

        let active = h.orchestrator.add_preset("Asda").await.unwrap().unwrap();
        assert_eq!(active.brand, "Asda");
        assert_eq!(active.org_id, 2);
        assert_eq!(h.api.calls(), vec!["list", "create Asda"]);
        assert_eq!(h.api.created_colors(), vec![Some("#000000".to_string())]);
        assert_eq!(
            h.orchestrator.registry().custom_preset("Asda").map(|token| token.primary),
            Some("0 0% 0%".to_string())
        );
        assert_eq!(event_names(&h.events), vec![PRESETS_UPDATED_EVENT, BRAND_CHANGED_EVENT]);

        h.orchestrator.select_preset("default").await.unwrap();
        let active = h.orchestrator.select_preset("Asda").await.unwrap();
        assert_eq!(active.org_id, 2);
        assert_eq!(h.api.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_reject_policy_refuses_existing_names() {
        let h = harness(&[]);
        let orchestrator = h.orchestrator.with_overwrite_policy(OverwritePolicy::Reject);
        orchestrator.pick_accent("#112233");
        orchestrator.add_preset("Asda").await.unwrap();
        let original = orchestrator.registry().custom_preset("Asda");

        orchestrator.pick_accent("#445566");
        assert_eq!(orchestrator.add_preset("Asda").await.unwrap(), None);
        assert_eq!(orchestrator.rename_preset("hm", "Asda").await.unwrap(), None);
        assert_eq!(orchestrator.add_preset("mands").await.unwrap(), None);
        assert_eq!(orchestrator.registry().custom_preset("Asda"), original);
    }

    #[tokio::test]
    async fn test_overwrite_policy_replaces_record() {
        let h = harness(&[]);
        h.orchestrator.pick_accent("#112233");
        h.orchestrator.add_preset("Asda").await.unwrap();

        h.orchestrator.pick_accent("#445566");
        assert!(h.orchestrator.add_preset("Asda").await.unwrap().is_some());
        assert_eq!(
            h.orchestrator.registry().custom_preset("Asda"),
            Some(h.orchestrator.tokens().current_tokens())
        );
    }

    #[tokio::test]
    async fn test_builtin_keys_are_not_custom_names() {
        let h = harness(&[(1, "Default"), (5, "H&M")]);
        h.orchestrator.delete_preset("hm").await.unwrap();
        h.orchestrator.pick_accent("#123456");
        h.orchestrator.add_preset("Asda").await.unwrap();
        let calls = h.api.calls();

        assert_eq!(h.orchestrator.add_preset("hm").await.unwrap(), None);
        assert_eq!(h.orchestrator.add_preset(" mands ").await.unwrap(), None);
        assert_eq!(h.orchestrator.rename_preset("Asda", "default").await.unwrap(), None);
        assert_eq!(h.orchestrator.rename_preset("mands", "hm").await.unwrap(), None);

        assert_eq!(h.api.calls(), calls);
        assert_eq!(h.orchestrator.registry().custom_preset("hm"), None);
        assert!(h.orchestrator.registry().custom_preset("Asda").is_some());
        assert_eq!(h.orchestrator.registry().active_brand(), "Asda");
        assert!(!h.orchestrator.org_sync().org_map().contains_key("hm"));
    }

    #[tokio::test]
    async fn test_rename_builtin_duplicates_and_syncs_new_name() {
        let h = harness(&[(1, "Default")]);

        let active = h.orchestrator.rename_preset("hm", "MyHM").await.unwrap().unwrap();
        assert_eq!(active.brand, "MyHM");
        assert_eq!(h.api.calls(), vec!["list", "create MyHM"]);
        assert!(h.orchestrator.registry().list_presets().contains(&"hm".to_string()));
        assert_eq!(h.orchestrator.tokens().current_tokens(), builtin_tokens(BuiltinPreset::Hm));
    }

    #[tokio::test]
    async fn test_rename_missing_custom_does_nothing() {
        let h = harness(&[]);
        assert_eq!(h.orchestrator.rename_preset("Ghost", "Other").await.unwrap(), None);
        assert!(h.api.calls().is_empty());
        assert!(h.events.take().is_empty());
    }

    #[tokio::test]
    async fn test_delete_custom_removes_org_and_resets_brand() {
        let h = harness(&[(1, "Default")]);
        h.orchestrator.pick_accent("#000000");
        h.orchestrator.add_preset("Asda").await.unwrap();
        h.events.take();

        let active = h.orchestrator.delete_preset("Asda").await.unwrap().unwrap();
        assert_eq!(active.brand, DEFAULT_BRAND);
        assert_eq!(active.org_id, DEFAULT_ORG_ID);
        let defaults = builtin_tokens(BuiltinPreset::Default);
        assert_eq!(h.orchestrator.tokens().current_tokens(), defaults);
        assert_eq!(h.store.get("primary"), Some(defaults.primary));
        assert_eq!(h.api.calls().last().map(String::as_str), Some("remove 2"));
        assert_eq!(h.orchestrator.org_sync().mapped_org_id("Asda"), None);
        assert_eq!(h.orchestrator.registry().custom_preset("Asda"), None);
        assert_eq!(event_names(&h.events), vec![PRESETS_UPDATED_EVENT, BRAND_CHANGED_EVENT]);
    }

    #[tokio::test]
    async fn test_delete_active_builtin_falls_back_and_realigns_org() {
        let h = harness(&[(1, "Default"), (8, "M&S")]);
        h.orchestrator.select_preset("mands").await.unwrap();

        let active = h.orchestrator.delete_preset("mands").await.unwrap().unwrap();
        assert_eq!(active.brand, DEFAULT_BRAND);
        assert_eq!(active.org_id, DEFAULT_ORG_ID);
        assert!(h.api.calls().contains(&"remove 8".to_string()));
        assert_eq!(
            h.orchestrator.tokens().current_tokens(),
            builtin_tokens(BuiltinPreset::Default)
        );
        assert!(h.orchestrator.registry().any_builtins_hidden());
    }

    #[tokio::test]
    async fn test_failed_remote_delete_leaves_local_state() {
        let h = harness(&[]);
        h.orchestrator.add_preset("Asda").await.unwrap();
        h.api.set_failing(true);

        assert!(h.orchestrator.delete_preset("Asda").await.is_err());
        assert!(h.orchestrator.registry().custom_preset("Asda").is_some());
        assert!(h.orchestrator.org_sync().mapped_org_id("Asda").is_some());
        assert_eq!(h.orchestrator.registry().active_brand(), "Asda");
    }

    #[tokio::test]
    async fn test_restore_builtins_publishes_catalog() {
        let h = harness(&[]);
        h.orchestrator.delete_preset("hm").await.unwrap();
        h.events.take();

        let presets = h.orchestrator.restore_builtins();
        assert_eq!(presets.len(), 3);
        assert_eq!(event_names(&h.events), vec![PRESETS_UPDATED_EVENT]);
    }

    #[test]
    fn test_restore_from_storage_keeps_picked_accent() {
        let store = Arc::new(MemoryStore::new());
        store.set("brand", "hm");
        store.set("primary", "10 20% 30%");
        store.set("primary-foreground", "0 0% 100%");
        store.set("theme", "dark");

        let sheet = Arc::new(StyleSheet::new());
        let orchestrator = BrandOrchestrator::new(
            store,
            sheet.clone(),
            Arc::new(FakeOrgApi::default()),
            Arc::new(RecordingEventSink::new()),
        );

        let active = orchestrator.restore_from_storage();
        assert_eq!(active.brand, "hm");
        assert!(sheet.is_dark());
        assert_eq!(
            orchestrator.tokens().current_tokens(),
            ColorToken::new("10 20% 30%", "0 0% 100%")
        );
    }

    #[test]
    fn test_restore_from_storage_repairs_hidden_brand() {
        let h = harness(&[]);
        h.store.set("brand", "mands");
        h.store.set("brandBuiltinsHidden", r#"["mands"]"#);

        let active = h.orchestrator.restore_from_storage();
        assert_eq!(active.brand, DEFAULT_BRAND);
        assert_eq!(
            h.orchestrator.tokens().current_tokens(),
            builtin_tokens(BuiltinPreset::Default)
        );
    }
}
