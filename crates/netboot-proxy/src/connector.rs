//! Resolve proxy endpoints to live clients

use crate::client::BootProxy;
use crate::error::{ProxyError, Result};
use crate::http::{HttpBootProxy, DEFAULT_TIMEOUT};
use netboot_common::ProxyEndpoint;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Turns a [`ProxyEndpoint`] from the topology into a callable client
pub trait ProxyConnector: Send + Sync {
    fn connect(&self, endpoint: &ProxyEndpoint) -> Result<Arc<dyn BootProxy>>;
}

/// Connector producing [`HttpBootProxy`] clients over one shared pool
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client,
}

impl HttpConnector {
    /// Create a connector with the default request timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a connector with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::InvalidEndpoint(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ProxyConnector for HttpConnector {
    fn connect(&self, endpoint: &ProxyEndpoint) -> Result<Arc<dyn BootProxy>> {
        let proxy = HttpBootProxy::with_client(&endpoint.url, self.client.clone())?;
        Ok(Arc::new(proxy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_connector() {
        let connector = HttpConnector::with_timeout(Duration::from_secs(5)).unwrap();

        let proxy = connector
            .connect(&ProxyEndpoint::new("a", "https://a.example.com:8443"))
            .unwrap();
        assert_eq!(proxy.endpoint(), "https://a.example.com:8443/");

        let err = connector
            .connect(&ProxyEndpoint::new("b", "::bad::"))
            .err()
            .unwrap();
        assert!(matches!(err, ProxyError::InvalidEndpoint(_)));
    }
}
