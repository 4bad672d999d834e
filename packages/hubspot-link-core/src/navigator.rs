//! Navigation to the HubSpot authorization page.
//!
//! `HubSpotIntegration::authorize` hands the authorization URL to a
//! [`Navigator`] instead of opening it directly, so callers decide what a
//! redirect means for them (system browser, printed link, recorded in tests).

use crate::error::{IntegrationError, Result};
use std::sync::{Arc, Mutex};

/// Something that can send the user to a URL
pub trait Navigator: Send + Sync {
    fn navigate(&self, url: &str) -> Result<()>;
}

/// Opens URLs in the default system browser
#[cfg(feature = "browser")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserNavigator;

#[cfg(feature = "browser")]
impl Navigator for BrowserNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        webbrowser::open(url).map_err(|e| IntegrationError::Navigation(e.to_string()))
    }
}

/// Ignores navigation requests
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl Navigator for NoopNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!("Navigation to {} skipped", url);
        Ok(())
    }
}

/// Remembers every URL it was asked to open
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs navigated to so far, oldest first
    pub fn visited(&self) -> Vec<String> {
        match self.visited.lock() {
            Ok(visited) => visited.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Most recent navigation target
    pub fn last(&self) -> Option<String> {
        self.visited().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, url: &str) -> Result<()> {
        let mut visited = self
            .visited
            .lock()
            .map_err(|e| IntegrationError::Navigation(e.to_string()))?;
        visited.push(url.to_string());
        Ok(())
    }
}

/// Default navigator for this build: the system browser when available
pub fn default_navigator() -> Arc<dyn Navigator> {
    #[cfg(feature = "browser")]
    {
        Arc::new(BrowserNavigator)
    }

    #[cfg(not(feature = "browser"))]
    {
        Arc::new(NoopNavigator)
    }
}
