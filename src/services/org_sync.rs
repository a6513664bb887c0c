// OrgSync Service
// Maps brand names to remote organizations, creating them on first use

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::models::DEFAULT_ORG_ID;
use crate::services::kv_store::{keys, load_json, save_json, KeyValueStore};
use crate::services::org_client::{OrgApiResult, OrganizationApi};
use crate::services::preset_registry::DEFAULT_BRAND;

pub type BrandOrgMap = BTreeMap<String, i64>;

#[derive(Clone)]
pub struct OrgSync {
    store: Arc<dyn KeyValueStore>,
    api: Arc<dyn OrganizationApi>,
}

impl OrgSync {
    pub fn new(store: Arc<dyn KeyValueStore>, api: Arc<dyn OrganizationApi>) -> Self {
        Self { store, api }
    }

    pub fn org_map(&self) -> BrandOrgMap {
        load_json(self.store.as_ref(), keys::ORG_MAP)
    }

    fn save_org_map(&self, map: &BrandOrgMap) {
        save_json(self.store.as_ref(), keys::ORG_MAP, map);
    }

    pub fn mapped_org_id(&self, brand: &str) -> Option<i64> {
        self.org_map().get(brand).copied()
    }

    /// Organization the session currently works against
    pub fn current_org_id(&self) -> i64 {
        self.store
            .get(keys::ORG_ID)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_ORG_ID)
    }

    fn set_current_org_id(&self, id: i64) {
        self.store.set(keys::ORG_ID, &id.to_string());
    }

    /// Point the current organization at `brand`'s mapping, or the default
    /// organization when the brand has none. Never touches the network.
    pub fn sync_current_org(&self, brand: &str) -> i64 {
        let id = self.mapped_org_id(brand).unwrap_or(DEFAULT_ORG_ID);
        self.set_current_org_id(id);
        id
    }

    /// Resolve the organization for `brand`, creating it remotely (with
    /// `color`, when given) if needed.
    ///
    /// Mapped brands are answered from the local map without a request.
    pub async fn ensure_org_for_brand(&self, brand: &str, color: Option<&str>) -> OrgApiResult<i64> {
        if let Some(id) = self.mapped_org_id(brand) {
            log::debug!("Organization for '{brand}' cached as {id}");
            self.set_current_org_id(id);
            return Ok(id);
        }

        let orgs = self.api.list().await?;
        let wanted = brand.to_lowercase();
        let id = match orgs.iter().find(|org| org.name.to_lowercase() == wanted) {
            Some(org) => {
                log::info!("Adopting existing organization {} for '{brand}'", org.id);
                org.id
            }
            None => {
                let created = self.api.create(brand, color).await?;
                log::info!("Created organization {} for '{brand}'", created.id);
                created.id
            }
        };

        // re-read: the map may have changed while the request was in flight
        let mut map = self.org_map();
        map.insert(brand.to_string(), id);
        self.save_org_map(&map);
        self.set_current_org_id(id);
        Ok(id)
    }

    /// Remove `brand`'s organization remotely, then forget the mapping.
    ///
    /// If `brand` is the active brand, the session moves back to the default
    /// brand and organization even when no mapping existed.
    pub async fn delete_org_for_brand(&self, brand: &str) -> OrgApiResult<()> {
        if let Some(id) = self.mapped_org_id(brand) {
            self.api.remove(id).await?;
            let mut map = self.org_map();
            map.remove(brand);
            self.save_org_map(&map);
            log::info!("Removed organization {id} for '{brand}'");
        }

        if self.store.get(keys::BRAND).as_deref() == Some(brand) {
            self.store.set(keys::BRAND, DEFAULT_BRAND);
            self.set_current_org_id(DEFAULT_ORG_ID);
        }
        Ok(())
    }
}
