//! YAML inventory the CLI runs against
//!
//! ```yaml
//! settings:
//!   unattended_url: http://foreman.example.com
//! proxies:
//!   - id: tftp-a
//!     url: https://tftp-a.example.com:8443
//! subnets:
//!   - id: prov
//!     family: v4
//!     network: 192.0.2.0/24
//!     tftp: tftp-a
//! hosts:
//!   - name: web01.example.com
//!     pxe_loader: pxelinux.0
//!     interfaces:
//!       - identifier: eth0
//!         mac: "00:53:67:ab:dd:00"
//!         provision: true
//!         subnet: prov
//! ```

use color_eyre::eyre::{eyre, Result, WrapErr};
use netboot_common::{Host, ProxyEndpoint, Subnet, Topology};
use netboot_templates::{MemoryCatalog, ProvisioningTemplate, Settings, TemplateResolver};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Default, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub proxies: Vec<ProxyEndpoint>,
    #[serde(default)]
    pub subnets: Vec<Subnet>,
    /// Extra templates on top of the built-in ones
    #[serde(default)]
    pub templates: Vec<ProvisioningTemplate>,
    #[serde(default)]
    pub hosts: Vec<Host>,
    /// Boot proxy request timeout in seconds
    #[serde(default)]
    pub proxy_timeout: Option<u64>,
}

impl Inventory {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read inventory {}", path.display()))?;
        serde_yaml::from_str(&raw)
            .wrap_err_with(|| format!("Failed to parse inventory {}", path.display()))
    }

    pub fn host(&self, name: &str) -> Result<&Host> {
        self.hosts
            .iter()
            .find(|h| h.name == name)
            .ok_or_else(|| eyre!("Host {} not found in inventory", name))
    }

    pub fn topology(&self) -> Topology {
        let topology: Topology = self.subnets.iter().cloned().collect();
        self.proxies.iter().cloned().fold(topology, Topology::with_proxy)
    }

    pub fn resolver(&self) -> TemplateResolver {
        let catalog = self
            .templates
            .iter()
            .cloned()
            .fold(MemoryCatalog::with_builtins(), MemoryCatalog::with_template);
        TemplateResolver::new(Arc::new(catalog), Arc::new(self.settings.clone()))
    }

    pub fn proxy_timeout(&self) -> Option<Duration> {
        self.proxy_timeout.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netboot_common::{BootLoaderKind, ProxyId, SubnetId};

    const INVENTORY: &str = r#"
settings:
  unattended_url: http://ahost.com:3000
proxies:
  - id: tftp-a
    url: https://a.example.com:8443
subnets:
  - id: prov
    family: v4
    network: 192.0.2.0/24
    tftp: tftp-a
templates:
  - name: my local boot
    kind: PXELinux
    template: LOCALBOOT 0
hosts:
  - name: web01.example.com
    pxe_loader: grub2/grubx64.efi
    interfaces:
      - identifier: eth0
        mac: 00-53-67-AB-DD-00
        provision: true
        subnet: prov
"#;

    #[test]
    fn test_parse_inventory() {
        let inventory: Inventory = serde_yaml::from_str(INVENTORY).unwrap();

        let host = inventory.host("web01.example.com").unwrap();
        assert_eq!(host.pxe_loader, Some(BootLoaderKind::PxeGrub2));
        assert_eq!(
            host.interfaces[0].mac.as_ref().map(|m| m.as_str()),
            Some("00:53:67:ab:dd:00")
        );
        assert!(inventory.host("missing").is_err());

        let topology = inventory.topology();
        let subnet = topology.subnet(&SubnetId("prov".to_string())).unwrap();
        assert_eq!(subnet.tftp, Some(ProxyId("tftp-a".to_string())));
        assert!(topology.proxy(&ProxyId("tftp-a".to_string())).is_some());
    }
}
