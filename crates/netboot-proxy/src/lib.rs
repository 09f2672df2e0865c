//! Netboot proxy client
//!
//! A boot-service proxy is a remote agent bound to one or more subnets. It
//! owns a TFTP root and accepts three operations:
//!
//! - **set**: write the configuration for a loader kind and MAC address
//! - **delete**: remove that configuration
//! - **fetch boot file**: download an installer kernel or initrd into the root
//!
//! All three are idempotent at the proxy, so callers may repeat them freely.
//!
//! # Example
//!
//! ```
//! use netboot_common::{BootLoaderKind, ProxyEndpoint};
//! use netboot_proxy::{BootProxy, MemoryConnector, ProxyConnector};
//!
//! # async fn example() -> netboot_proxy::Result<()> {
//! let connector = MemoryConnector::new();
//! let proxy = connector.connect(&ProxyEndpoint::new("proxy-a", "https://a.example.com:8443"))?;
//!
//! let mac = "00:53:67:ab:dd:00".parse().unwrap();
//! proxy.set(BootLoaderKind::PxeGrub2, &mac, "set timeout=5").await?;
//!
//! assert_eq!(connector.calls().await.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod connector;
pub mod error;
pub mod http;
pub mod memory;

pub use client::BootProxy;
pub use connector::{HttpConnector, ProxyConnector};
pub use error::{ProxyError, Result};
pub use http::HttpBootProxy;
pub use memory::{MemoryBootProxy, MemoryConnector, ProxyCall};
