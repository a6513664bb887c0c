use serde::{Deserialize, Serialize};

/// Organization id the backend reserves for the default tenant
pub const DEFAULT_ORG_ID: i64 = 1;

/// A remote organization as returned by `GET /api/orgs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
}

/// Response body of `POST /api/orgs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedOrganization {
    pub id: i64,
}

/// Payload of the `brand_changed` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBrand {
    pub brand: String,
    pub display_name: String,
    pub org_id: i64,
}
