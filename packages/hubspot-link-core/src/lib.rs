//! hubspot-link Core Library
//!
//! Client-side adapter for a HubSpot integration backend:
//! - Authorization redirect (backend builds the OAuth URL, we navigate to it)
//! - Credential retrieval and authentication checks
//! - CRM item listing with the access token the backend hands out
//!
//! The OAuth flow itself, token storage and refresh all live in the backend.
//!
//! # Features
//!
//! - `browser` (default): open the authorization URL in the system browser
//!
//! # Example
//!
//! ```no_run
//! use hubspot_link_core::{config, HubSpotIntegration, ItemsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hubspot_link_core::IntegrationError> {
//!     let hubspot = HubSpotIntegration::new(&config::load_integration_config());
//!
//!     if !hubspot.is_authenticated().await {
//!         // Opens the HubSpot consent page
//!         hubspot.authorize().await?;
//!         return Ok(());
//!     }
//!
//!     let creds = hubspot.get_credentials().await?;
//!     let items = ItemsClient::new().list_items_with_credentials(&creds).await?;
//!     println!("Found {} items", items.len());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod integration;
pub mod items;
pub mod navigator;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{load_integration_config, ConfigSource, IntegrationConfig};
pub use credentials::Credentials;
pub use error::{IntegrationError, Result};
pub use integration::HubSpotIntegration;
pub use items::{IntegrationItem, ItemKind, ItemsClient};
pub use navigator::{Navigator, NoopNavigator, RecordingNavigator};

#[cfg(feature = "browser")]
pub use navigator::BrowserNavigator;
