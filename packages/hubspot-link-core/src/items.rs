//! Read-only listing of HubSpot CRM objects.
//!
//! Once the backend has handed out an access token, contacts, companies and
//! deals can be pulled straight from the HubSpot CRM API and flattened into
//! [`IntegrationItem`]s.

use crate::config::normalize_url;
use crate::credentials::Credentials;
use crate::error::{IntegrationError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// HubSpot CRM API base URL
pub const HUBSPOT_API_URL: &str = "https://api.hubapi.com";

/// HubSpot web app base URL (for item links)
const HUBSPOT_APP_URL: &str = "https://app.hubspot.com";

/// Page size requested per object type
const PAGE_LIMIT: u32 = 100;

/// CRM object types we list, in listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Contact,
    Company,
    Deal,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Contact, ItemKind::Company, ItemKind::Deal];

    /// CRM object path segment (e.g. "contacts")
    fn object_path(self) -> &'static str {
        match self {
            ItemKind::Contact => "contacts",
            ItemKind::Company => "companies",
            ItemKind::Deal => "deals",
        }
    }

    fn id_prefix(self) -> &'static str {
        match self {
            ItemKind::Contact => "contact",
            ItemKind::Company => "company",
            ItemKind::Deal => "deal",
        }
    }

    fn unnamed(self) -> &'static str {
        match self {
            ItemKind::Contact => "Unnamed Contact",
            ItemKind::Company => "Unnamed Company",
            ItemKind::Deal => "Unnamed Deal",
        }
    }
}

impl std::fmt::Display for ItemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.id_prefix())
    }
}

/// One CRM object, flattened for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemKind,
    pub creation_time: Option<String>,
    pub last_modified_time: Option<String>,
    pub url: String,
    pub visibility: bool,
}

#[derive(Debug, Deserialize)]
struct ObjectPage {
    #[serde(default)]
    results: Vec<CrmObject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrmObject {
    id: String,
    #[serde(default)]
    properties: Map<String, Value>,
    created_at: Option<String>,
    updated_at: Option<String>,
}

impl CrmObject {
    /// Non-empty string property, if set
    fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    fn into_item(self, kind: ItemKind) -> IntegrationItem {
        let name = match kind {
            ItemKind::Contact => {
                let first = self.property("firstname").unwrap_or_default();
                let last = self.property("lastname").unwrap_or_default();
                format!("{} {}", first, last).trim().to_string()
            }
            ItemKind::Company => self.property("name").unwrap_or_default().to_string(),
            ItemKind::Deal => self.property("dealname").unwrap_or_default().to_string(),
        };
        let name = if name.is_empty() {
            kind.unnamed().to_string()
        } else {
            name
        };

        let object_id = self.property("hs_object_id").unwrap_or(&self.id);
        let url = format!("{}/{}/{}", HUBSPOT_APP_URL, kind.object_path(), object_id);

        IntegrationItem {
            id: format!("{}_{}", kind.id_prefix(), self.id),
            name,
            item_type: kind,
            url,
            creation_time: self.created_at,
            last_modified_time: self.updated_at,
            visibility: true,
        }
    }
}

/// Client for the HubSpot CRM objects API
#[derive(Debug, Clone)]
pub struct ItemsClient {
    client: Client,
    api_url: String,
}

impl Default for ItemsClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemsClient {
    pub fn new() -> Self {
        Self::with_api_url(HUBSPOT_API_URL)
    }

    /// Point the client at a different CRM API host
    pub fn with_api_url(api_url: &str) -> Self {
        Self {
            client: Client::new(),
            api_url: normalize_url(api_url).unwrap_or_else(|| HUBSPOT_API_URL.to_string()),
        }
    }

    /// List contacts, companies and deals visible to `access_token`.
    ///
    /// An object type the API refuses (non-success status) is skipped;
    /// transport and decoding failures abort the listing.
    pub async fn list_items(&self, access_token: &str) -> Result<Vec<IntegrationItem>> {
        let mut items = Vec::new();

        for kind in ItemKind::ALL {
            if let Some(objects) = self.fetch_objects(kind, access_token).await? {
                items.extend(objects.into_iter().map(|obj| obj.into_item(kind)));
            }
        }

        tracing::info!("Fetched {} HubSpot items", items.len());
        Ok(items)
    }

    /// List items using the access token carried by `credentials`
    pub async fn list_items_with_credentials(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<IntegrationItem>> {
        if !credentials.is_authorized() {
            return Err(IntegrationError::NotAuthenticated);
        }
        let token = credentials
            .access_token()
            .ok_or(IntegrationError::NotAuthenticated)?;
        self.list_items(token).await
    }

    async fn fetch_objects(
        &self,
        kind: ItemKind,
        access_token: &str,
    ) -> Result<Option<Vec<CrmObject>>> {
        let path = format!("/crm/v3/objects/{}", kind.object_path());
        let url = format!("{}{}", self.api_url, path);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("limit", PAGE_LIMIT)])
            .send()
            .await
            .map_err(|e| IntegrationError::request(&path, e))?;

        if !resp.status().is_success() {
            tracing::warn!("Skipping HubSpot {} objects: server returned {}", kind, resp.status());
            return Ok(None);
        }

        let page = resp
            .json::<ObjectPage>()
            .await
            .map_err(|e| IntegrationError::decode(&path, e))?;
        tracing::debug!("Fetched {} {} objects", page.results.len(), kind);
        Ok(Some(page.results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{serve, unreachable_url};
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    fn object(id: &str, properties: Value) -> CrmObject {
        serde_json::from_value(json!({
            "id": id,
            "properties": properties,
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-02-03T04:05:06Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_contact_mapping() {
        let item = object(
            "51",
            json!({ "firstname": "Ada", "lastname": "Lovelace", "hs_object_id": "51" }),
        )
        .into_item(ItemKind::Contact);

        assert_eq!(item.id, "contact_51");
        assert_eq!(item.name, "Ada Lovelace");
        assert_eq!(item.item_type, ItemKind::Contact);
        assert_eq!(item.url, "https://app.hubspot.com/contacts/51");
        assert_eq!(item.creation_time.as_deref(), Some("2024-01-02T03:04:05Z"));
        assert_eq!(item.last_modified_time.as_deref(), Some("2024-02-03T04:05:06Z"));
        assert!(item.visibility);
    }

    #[test]
    fn test_contact_partial_and_missing_names() {
        let item = object("7", json!({ "lastname": "Hopper" })).into_item(ItemKind::Contact);
        assert_eq!(item.name, "Hopper");

        let item = object("8", json!({ "firstname": null, "lastname": "" }))
            .into_item(ItemKind::Contact);
        assert_eq!(item.name, "Unnamed Contact");
    }

    #[test]
    fn test_company_and_deal_mapping() {
        let company = object("3", json!({ "name": "Initech", "hs_object_id": "3" }))
            .into_item(ItemKind::Company);
        assert_eq!(company.id, "company_3");
        assert_eq!(company.name, "Initech");
        assert_eq!(company.url, "https://app.hubspot.com/companies/3");

        let deal = object("9", json!({})).into_item(ItemKind::Deal);
        assert_eq!(deal.id, "deal_9");
        assert_eq!(deal.name, "Unnamed Deal");
        // Falls back to the object id when hs_object_id is absent
        assert_eq!(deal.url, "https://app.hubspot.com/deals/9");
    }

    #[test]
    fn test_item_serializes_type_field() {
        let item = object("1", json!({ "dealname": "Renewal" })).into_item(ItemKind::Deal);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "deal");
        assert_eq!(value["name"], "Renewal");
    }

    fn crm_backend() -> Router {
        async fn contacts(
            headers: HeaderMap,
            Query(params): Query<HashMap<String, String>>,
        ) -> std::result::Result<Json<Value>, StatusCode> {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer token-1");
            if !authorized || params.get("limit").map(String::as_str) != Some("100") {
                return Err(StatusCode::UNAUTHORIZED);
            }
            Ok(Json(json!({
                "results": [
                    { "id": "1", "properties": { "firstname": "Ada", "lastname": "Lovelace", "hs_object_id": "1" } }
                ]
            })))
        }

        Router::new()
            .route("/crm/v3/objects/contacts", get(contacts))
            .route(
                "/crm/v3/objects/companies",
                get(|| async { StatusCode::FORBIDDEN }),
            )
            .route(
                "/crm/v3/objects/deals",
                get(|| async {
                    Json(json!({
                        "results": [
                            { "id": "5", "properties": { "dealname": "Expansion" } },
                            { "id": "6", "properties": {} }
                        ]
                    }))
                }),
            )
    }

    #[tokio::test]
    async fn test_list_items_skips_refused_kinds() {
        let base = serve(crm_backend()).await;
        let items = ItemsClient::with_api_url(&base)
            .list_items("token-1")
            .await
            .unwrap();

        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["contact_1", "deal_5", "deal_6"]);
        assert_eq!(items[2].name, "Unnamed Deal");
    }

    #[tokio::test]
    async fn test_list_items_with_credentials() {
        let base = serve(crm_backend()).await;
        let creds = Credentials::new(json!({ "access_token": "token-1" }));

        let items = ItemsClient::with_api_url(&base)
            .list_items_with_credentials(&creds)
            .await
            .unwrap();

        assert_eq!(items[0].name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_list_items_requires_token() {
        let client = ItemsClient::with_api_url(&unreachable_url().await);

        let err = client
            .list_items_with_credentials(&Credentials::new(json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::NotAuthenticated));

        let err = client
            .list_items_with_credentials(&Credentials::new(json!({ "access_token": 5 })))
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_list_items_transport_failure() {
        let client = ItemsClient::with_api_url(&unreachable_url().await);
        let err = client.list_items("token-1").await.unwrap_err();
        assert!(matches!(err, IntegrationError::Request { .. }));
    }

    #[tokio::test]
    async fn test_list_items_invalid_body() {
        let app = Router::new().route(
            "/crm/v3/objects/contacts",
            get(|| async { "not json" }),
        );
        let base = serve(app).await;

        let err = ItemsClient::with_api_url(&base)
            .list_items("token-1")
            .await
            .unwrap_err();
        assert!(matches!(err, IntegrationError::Decode { .. }));
    }
}
