// Test double for the organization API

use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{CreatedOrganization, Organization};
use crate::services::org_client::{OrgApiError, OrgApiResult, OrganizationApi};

/// In-memory organization backend that records every call
#[derive(Default)]
pub struct FakeOrgApi {
    pub orgs: Mutex<Vec<Organization>>,
    pub calls: Mutex<Vec<String>>,
    pub colors: Mutex<Vec<Option<String>>>,
    pub fail: Mutex<bool>,
}

impl FakeOrgApi {
    pub fn with_orgs(orgs: &[(i64, &str)]) -> Self {
        let api = Self::default();
        *api.orgs.lock().unwrap() = orgs
            .iter()
            .map(|(id, name)| Organization { id: *id, name: name.to_string() })
            .collect();
        api
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Color passed with each create, in call order
    pub fn created_colors(&self) -> Vec<Option<String>> {
        self.colors.lock().unwrap().clone()
    }

    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }

    fn record(&self, call: String) -> OrgApiResult<()> {
        self.calls.lock().unwrap().push(call);
        if *self.fail.lock().unwrap() {
            return Err(OrgApiError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl OrganizationApi for FakeOrgApi {
    async fn list(&self) -> OrgApiResult<Vec<Organization>> {
        self.record("list".to_string())?;
        Ok(self.orgs.lock().unwrap().clone())
    }

    async fn create(&self, name: &str, color: Option<&str>) -> OrgApiResult<CreatedOrganization> {
        self.record(format!("create {name}"))?;
        self.colors.lock().unwrap().push(color.map(str::to_string));
        let mut orgs = self.orgs.lock().unwrap();
        let id = orgs.iter().map(|org| org.id).max().unwrap_or(1) + 1;
        orgs.push(Organization { id, name: name.to_string() });
        Ok(CreatedOrganization { id })
    }

    async fn remove(&self, id: i64) -> OrgApiResult<()> {
        self.record(format!("remove {id}"))?;
        self.orgs.lock().unwrap().retain(|org| org.id != id);
        Ok(())
    }
}

