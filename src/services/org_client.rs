// Organization API Client
// Boundary to the remote organization REST service

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use thiserror::Error;

use crate::models::{CreatedOrganization, Organization};
use crate::services::kv_store::{keys, KeyValueStore};

const ORG_ID_HEADER: &str = "X-Org-ID";

pub type OrgApiResult<T> = Result<T, OrgApiError>;

/// Transport-level failures of the organization API.
///
/// Callers get these unmodified; nothing here retries.
#[derive(Error, Debug)]
pub enum OrgApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// list / create / remove over remote organizations
#[async_trait]
pub trait OrganizationApi: Send + Sync {
    async fn list(&self) -> OrgApiResult<Vec<Organization>>;

    /// `color` is the brand's primary color as `#rrggbb`
    async fn create(&self, name: &str, color: Option<&str>) -> OrgApiResult<CreatedOrganization>;

    async fn remove(&self, id: i64) -> OrgApiResult<()>;
}

#[derive(Serialize)]
struct CreateOrganizationRequest<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<&'a str>,
}

/// reqwest client for `/api/orgs`
pub struct HttpOrgClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl HttpOrgClient {
    pub fn with_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            token: None,
            store: None,
        }
    }

    /// Send `Authorization: Bearer <token>` with every request
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|token| !token.trim().is_empty());
        self
    }

    /// Read the current organization (and a stored session token when none
    /// was configured) from `store` on every request
    pub fn with_store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn orgs_url(&self) -> String {
        format!("{}/api/orgs", self.base_url)
    }

    pub fn org_url(&self, id: i64) -> String {
        format!("{}/api/orgs/{}", self.base_url, id)
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.clone().or_else(|| {
            self.store
                .as_ref()
                .and_then(|store| store.get(keys::AUTH_TOKEN))
                .filter(|token| !token.is_empty())
        })
    }

    fn decorate(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(org_id) = self.store.as_ref().and_then(|store| store.get(keys::ORG_ID)) {
            request = request.header(ORG_ID_HEADER, org_id);
        }
        if let Some(token) = self.bearer_token() {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send(&self, request: RequestBuilder) -> OrgApiResult<Response> {
        let response = self.decorate(request).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(OrgApiError::Status { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl OrganizationApi for HttpOrgClient {
    async fn list(&self) -> OrgApiResult<Vec<Organization>> {
        let response = self.send(self.client.get(self.orgs_url())).await?;
        let orgs: Vec<Organization> = response.json().await?;
        log::debug!("Listed {} organizations", orgs.len());
        Ok(orgs)
    }

    async fn create(&self, name: &str, color: Option<&str>) -> OrgApiResult<CreatedOrganization> {
        let request = self
            .client
            .post(self.orgs_url())
            .json(&CreateOrganizationRequest { name, color });
        let response = self.send(request).await?;
        let created: CreatedOrganization = response.json().await?;
        log::info!("Created organization '{}' with id {}", name, created.id);
        Ok(created)
    }

    async fn remove(&self, id: i64) -> OrgApiResult<()> {
        self.send(self.client.delete(self.org_url(id))).await?;
        log::info!("Removed organization {id}");
        Ok(())
    }
}
