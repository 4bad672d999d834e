//! HubSpot integration client.
//!
//! Thin HTTP adapter over the integration backend, which runs the actual
//! OAuth flow and stores the resulting tokens. The client asks it for an
//! authorization URL, redirects the user there, and reads back whatever
//! credentials the backend ended up with.

use crate::config::{normalize_url, IntegrationConfig, DEFAULT_API_URL};
use crate::credentials::Credentials;
use crate::error::{IntegrationError, Result};
use crate::navigator::{default_navigator, Navigator};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;

/// Backend route that returns the HubSpot authorization URL
const AUTHORIZE_PATH: &str = "/authorize_hubspot";

/// Backend route that returns the stored HubSpot credentials
const CREDENTIALS_PATH: &str = "/get_hubspot_credentials";

#[derive(Debug, Deserialize)]
struct AuthorizeResponse {
    authorization_url: String,
}

/// Client for the HubSpot side of the integration backend.
/// Clone is cheap - the HTTP client and navigator are shared.
#[derive(Clone)]
pub struct HubSpotIntegration {
    client: Client,
    base_url: String,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for HubSpotIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSpotIntegration")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HubSpotIntegration {
    /// Create a client for the configured backend, navigating with the default navigator
    pub fn new(config: &IntegrationConfig) -> Self {
        Self::with_navigator(&config.api_url, default_navigator())
    }

    /// Create a client for an explicit backend URL and navigator
    pub fn with_navigator(base_url: &str, navigator: Arc<dyn Navigator>) -> Self {
        let base_url = normalize_url(base_url).unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Self {
            client: Client::new(),
            base_url,
            navigator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the HubSpot authorization URL and send the user there.
    ///
    /// Returns the URL that was navigated to. Nothing is opened if the
    /// backend request fails.
    pub async fn authorize(&self) -> Result<String> {
        let url = self.authorization_url().await?;

        if let Err(e) = self.navigator.navigate(&url) {
            tracing::error!("Error authorizing HubSpot: {}", e);
            return Err(e);
        }

        tracing::info!("Redirected to HubSpot authorization page");
        Ok(url)
    }

    /// Fetch the HubSpot authorization URL without navigating to it
    pub async fn authorization_url(&self) -> Result<String> {
        match self.get_json::<AuthorizeResponse>(AUTHORIZE_PATH).await {
            Ok(resp) => {
                tracing::debug!("Authorization URL received: {}", resp.authorization_url);
                Ok(resp.authorization_url)
            }
            Err(e) => {
                tracing::error!("Error authorizing HubSpot: {}", e);
                Err(e)
            }
        }
    }

    /// Fetch the credentials the backend holds for HubSpot, exactly as returned.
    ///
    /// An empty success body (e.g. 204) is not JSON and fails as `Decode`.
    pub async fn get_credentials(&self) -> Result<Credentials> {
        self.get_json::<Credentials>(CREDENTIALS_PATH)
            .await
            .inspect_err(|e| tracing::error!("Error getting HubSpot credentials: {}", e))
    }

    /// Whether the backend holds a usable HubSpot access token.
    ///
    /// Any failure to fetch credentials counts as not authenticated.
    pub async fn is_authenticated(&self) -> bool {
        match self.get_credentials().await {
            Ok(creds) => creds.is_authorized(),
            Err(e) => {
                tracing::debug!("Treating credentials failure as unauthenticated: {}", e);
                false
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| IntegrationError::request(path, e))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(IntegrationError::status(path, status, &body));
        }

        resp.json::<T>()
            .await
            .map_err(|e| IntegrationError::decode(path, e))
    }
}
