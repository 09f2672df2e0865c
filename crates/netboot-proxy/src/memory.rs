//! In-memory boot proxy for tests and dry runs
//!
//! Every call is recorded in a log shared by all proxies the connector hands
//! out, so a test can assert on the exact sequence of remote operations.

use crate::client::BootProxy;
use crate::connector::ProxyConnector;
use crate::error::{ProxyError, Result};
use async_trait::async_trait;
use netboot_common::{BootFile, BootLoaderKind, MacAddress, ProxyEndpoint};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A recorded proxy call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxyCall {
    Set {
        endpoint: String,
        kind: BootLoaderKind,
        mac: MacAddress,
        config: String,
    },
    Delete {
        endpoint: String,
        kind: BootLoaderKind,
        mac: MacAddress,
    },
    FetchBootFile {
        endpoint: String,
        prefix: String,
        url: String,
    },
}

impl ProxyCall {
    pub fn endpoint(&self) -> &str {
        match self {
            ProxyCall::Set { endpoint, .. }
            | ProxyCall::Delete { endpoint, .. }
            | ProxyCall::FetchBootFile { endpoint, .. } => endpoint,
        }
    }

    pub fn kind(&self) -> Option<BootLoaderKind> {
        match self {
            ProxyCall::Set { kind, .. } | ProxyCall::Delete { kind, .. } => Some(*kind),
            ProxyCall::FetchBootFile { .. } => None,
        }
    }

    pub fn mac(&self) -> Option<&MacAddress> {
        match self {
            ProxyCall::Set { mac, .. } | ProxyCall::Delete { mac, .. } => Some(mac),
            ProxyCall::FetchBootFile { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct FailureRules {
    kinds: Vec<BootLoaderKind>,
    endpoints: Vec<String>,
    macs: Vec<MacAddress>,
}

impl FailureRules {
    fn matches(&self, call: &ProxyCall) -> bool {
        if self.endpoints.iter().any(|e| e == call.endpoint()) {
            return true;
        }
        if let Some(kind) = call.kind() {
            if self.kinds.contains(&kind) {
                return true;
            }
        }
        match call.mac() {
            Some(mac) => self.macs.contains(mac),
            None => false,
        }
    }
}

/// Connector that hands out [`MemoryBootProxy`] instances sharing one call log
#[derive(Debug, Default, Clone)]
pub struct MemoryConnector {
    calls: Arc<Mutex<Vec<ProxyCall>>>,
    rules: FailureRules,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call for `kind` fail
    pub fn fail_kind(mut self, kind: BootLoaderKind) -> Self {
        self.rules.kinds.push(kind);
        self
    }

    /// Make every call to the proxy at `url` fail
    pub fn fail_endpoint(mut self, url: impl Into<String>) -> Self {
        self.rules.endpoints.push(url.into());
        self
    }

    /// Make every call for `mac` fail
    pub fn fail_mac(mut self, mac: MacAddress) -> Self {
        self.rules.macs.push(mac);
        self
    }

    /// Snapshot of all calls attempted so far, in order
    pub async fn calls(&self) -> Vec<ProxyCall> {
        self.calls.lock().await.clone()
    }
}

impl ProxyConnector for MemoryConnector {
    fn connect(&self, endpoint: &ProxyEndpoint) -> Result<Arc<dyn BootProxy>> {
        Ok(Arc::new(MemoryBootProxy {
            endpoint: endpoint.url.clone(),
            calls: Arc::clone(&self.calls),
            rules: self.rules.clone(),
        }))
    }
}

/// Proxy that records calls instead of sending them
#[derive(Debug, Clone)]
pub struct MemoryBootProxy {
    endpoint: String,
    calls: Arc<Mutex<Vec<ProxyCall>>>,
    rules: FailureRules,
}

impl MemoryBootProxy {
    async fn record(&self, call: ProxyCall) -> Result<()> {
        let failed = self.rules.matches(&call);
        self.calls.lock().await.push(call);
        if failed {
            return Err(ProxyError::Failed {
                endpoint: self.endpoint.clone(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl BootProxy for MemoryBootProxy {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn set(&self, kind: BootLoaderKind, mac: &MacAddress, config: &str) -> Result<()> {
        self.record(ProxyCall::Set {
            endpoint: self.endpoint.clone(),
            kind,
            mac: mac.clone(),
            config: config.to_string(),
        })
        .await
    }

    async fn delete(&self, kind: BootLoaderKind, mac: &MacAddress) -> Result<()> {
        self.record(ProxyCall::Delete {
            endpoint: self.endpoint.clone(),
            kind,
            mac: mac.clone(),
        })
        .await
    }

    async fn fetch_boot_file(&self, file: &BootFile) -> Result<()> {
        self.record(ProxyCall::FetchBootFile {
            endpoint: self.endpoint.clone(),
            prefix: file.prefix.clone(),
            url: file.url.clone(),
        })
        .await
    }
}
