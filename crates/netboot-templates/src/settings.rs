//! Global settings consulted during resolution
//!
//! Settings are injected into the resolver rather than read from process
//! state, so two resolvers with different settings can coexist.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Provisioning base URL used when `unattended_url` is not configured
pub const DEFAULT_UNATTENDED_URL: &str = "http://localhost:3000";

/// Key/value lookup for system-wide settings
pub trait SettingsProvider: Send + Sync {
    fn setting(&self, key: &str) -> Option<String>;

    /// Base URL installers fetch their unattended configuration from
    fn unattended_url(&self) -> String {
        self.setting("unattended_url")
            .unwrap_or_else(|| DEFAULT_UNATTENDED_URL.to_string())
    }
}

/// In-memory settings table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings(HashMap<String, String>);

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }
}

impl SettingsProvider for Settings {
    fn setting(&self, key: &str) -> Option<String> {
        self.0.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
