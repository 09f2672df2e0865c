//! Boot proxy trait

use crate::error::Result;
use async_trait::async_trait;
use netboot_common::{BootFile, BootLoaderKind, MacAddress};

/// Operations a remote boot-service proxy offers
///
/// Every operation addresses one slot (a loader kind and MAC, or a file
/// prefix) and is safe to repeat with identical arguments.
#[async_trait]
pub trait BootProxy: Send + Sync {
    /// Human-readable endpoint identity, for logs
    fn endpoint(&self) -> &str;

    /// Publish `config` as the `kind` configuration for `mac`
    async fn set(&self, kind: BootLoaderKind, mac: &MacAddress, config: &str) -> Result<()>;

    /// Remove the `kind` configuration for `mac`
    async fn delete(&self, kind: BootLoaderKind, mac: &MacAddress) -> Result<()>;

    /// Download `file.url` into the TFTP root at `file.prefix`
    async fn fetch_boot_file(&self, file: &BootFile) -> Result<()>;
}
