//! HTTP boot proxy client
//!
//! Talks to the proxy's TFTP API:
//!
//! - `POST   /tftp/{kind}/{mac}` with form field `pxeconfig`
//! - `DELETE /tftp/{kind}/{mac}`
//! - `POST   /tftp/fetch_boot_file` with form fields `prefix` and `path`

use crate::client::BootProxy;
use crate::error::{ProxyError, Result};
use async_trait::async_trait;
use netboot_common::{BootFile, BootLoaderKind, MacAddress};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Boot proxy reached over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpBootProxy {
    base_url: Url,
    client: Client,
}

impl HttpBootProxy {
    /// Create a client for the proxy at `base_url` with its own HTTP client
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| ProxyError::InvalidEndpoint(e.to_string()))?;
        Self::with_client(base_url, client)
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(base_url: &str, client: Client) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ProxyError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProxyError::InvalidEndpoint(base_url.to_string()));
        }
        Ok(Self { base_url, client })
    }

    /// Build `{base}/tftp/{segments...}`
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProxyError::InvalidEndpoint(self.base_url.to_string()))?
            .pop_if_empty()
            .push("tftp")
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, url: Url, request: RequestBuilder) -> Result<()> {
        debug!(url = %url, "Sending boot proxy request");
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout(url.to_string())
            } else {
                ProxyError::Transport {
                    url: url.to_string(),
                    source: e,
                }
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProxyError::Rejected {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl BootProxy for HttpBootProxy {
    fn endpoint(&self) -> &str {
        self.base_url.as_str()
    }

    async fn set(&self, kind: BootLoaderKind, mac: &MacAddress, config: &str) -> Result<()> {
        let url = self.url(&[kind.as_str(), mac.as_str()])?;
        let request = self.client.post(url.clone()).form(&[("pxeconfig", config)]);
        self.send(url, request).await
    }

    async fn delete(&self, kind: BootLoaderKind, mac: &MacAddress) -> Result<()> {
        let url = self.url(&[kind.as_str(), mac.as_str()])?;
        let request = self.client.delete(url.clone());
        self.send(url, request).await
    }

    async fn fetch_boot_file(&self, file: &BootFile) -> Result<()> {
        let url = self.url(&["fetch_boot_file"])?;
        let request = self
            .client
            .post(url.clone())
            .form(&[("prefix", file.prefix.as_str()), ("path", file.url.as_str())]);
        self.send(url, request).await
    }
}
