//! Hosts and their network interfaces

use crate::loader::BootLoaderKind;
use crate::mac::MacAddress;
use crate::network::{IpFamily, SubnetId};
use crate::os::{Architecture, Medium, OperatingSystem};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use uuid::Uuid;

/// A managed machine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Host {
    #[serde(default = "Uuid::now_v7")]
    pub id: Uuid,
    pub name: String,
    /// An installation is pending; boot into the installer, not the disk
    #[serde(default)]
    pub build: bool,
    /// Selected network boot loader. Empty or `None` in input means unset.
    #[serde(default, deserialize_with = "deserialize_loader")]
    pub pxe_loader: Option<BootLoaderKind>,
    #[serde(default)]
    pub operatingsystem: Option<OperatingSystem>,
    #[serde(default)]
    pub architecture: Option<Architecture>,
    #[serde(default)]
    pub medium: Option<Medium>,
    #[serde(default)]
    pub interfaces: Vec<NetworkInterface>,
    /// Host-scoped parameter overrides
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

fn deserialize_loader<'de, D>(deserializer: D) -> Result<Option<BootLoaderKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("None") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl Host {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            build: false,
            pxe_loader: None,
            operatingsystem: None,
            architecture: None,
            medium: None,
            interfaces: Vec::new(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_interface(mut self, interface: NetworkInterface) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn with_loader(mut self, kind: BootLoaderKind) -> Self {
        self.pxe_loader = Some(kind);
        self
    }

    pub fn with_os(mut self, os: OperatingSystem, arch: Architecture) -> Self {
        self.operatingsystem = Some(os);
        self.architecture = Some(arch);
        self
    }

    pub fn with_medium(mut self, medium: Medium) -> Self {
        self.medium = Some(medium);
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn in_build(mut self, build: bool) -> Self {
        self.build = build;
        self
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Look up one of this host's interfaces by identifier (`eth0`, `bond0`)
    pub fn interface(&self, identifier: &str) -> Option<&NetworkInterface> {
        self.interfaces.iter().find(|i| i.identifier == identifier)
    }

    /// The interface the host provisions through
    pub fn provision_interface(&self) -> Option<&NetworkInterface> {
        self.interfaces
            .iter()
            .find(|i| i.provision)
            .or_else(|| self.interfaces.iter().find(|i| i.primary))
    }

    /// Physical members of `interface`, in attachment order.
    ///
    /// A physical interface is its own single member. Attached device names
    /// that do not match an interface on this host are left out.
    pub fn members_of<'a>(&'a self, interface: &'a NetworkInterface) -> Vec<&'a NetworkInterface> {
        match interface.kind {
            InterfaceKind::Physical => vec![interface],
            InterfaceKind::Bond => interface
                .attached_devices
                .iter()
                .filter_map(|device| self.interface(device))
                .collect(),
        }
    }
}

/// Physical NIC or link aggregation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceKind {
    #[default]
    Physical,
    /// Bond whose identity is carried by its attached devices
    Bond,
}

/// A network interface of a host
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkInterface {
    pub identifier: String,
    /// DNS name, used when naming work for this interface
    #[serde(default)]
    pub name: Option<String>,
    /// Absent on bonds, which borrow their members' addresses
    #[serde(default)]
    pub mac: Option<MacAddress>,
    #[serde(default)]
    pub ip: Option<Ipv4Addr>,
    #[serde(default)]
    pub ip6: Option<Ipv6Addr>,
    #[serde(default)]
    pub subnet: Option<SubnetId>,
    #[serde(default)]
    pub subnet6: Option<SubnetId>,
    #[serde(default = "default_managed")]
    pub managed: bool,
    #[serde(default)]
    pub provision: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(rename = "type", default)]
    pub kind: InterfaceKind,
    /// Identifiers of the physical members of a bond, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attached_devices: Vec<String>,
}

fn default_managed() -> bool {
    true
}

impl NetworkInterface {
    /// A managed physical interface
    pub fn physical(identifier: impl Into<String>, mac: MacAddress) -> Self {
        Self {
            identifier: identifier.into(),
            name: None,
            mac: Some(mac),
            ip: None,
            ip6: None,
            subnet: None,
            subnet6: None,
            managed: true,
            provision: false,
            primary: false,
            kind: InterfaceKind::Physical,
            attached_devices: Vec::new(),
        }
    }

    /// A managed bond over `attached_devices`
    pub fn bond<I, S>(identifier: impl Into<String>, attached_devices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier: identifier.into(),
            name: None,
            mac: None,
            ip: None,
            ip6: None,
            subnet: None,
            subnet6: None,
            managed: true,
            provision: false,
            primary: false,
            kind: InterfaceKind::Bond,
            attached_devices: attached_devices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Mark as the primary, provisioning interface
    pub fn provisioning(mut self) -> Self {
        self.provision = true;
        self.primary = true;
        self
    }

    pub fn unmanaged(mut self) -> Self {
        self.managed = false;
        self
    }

    pub fn on_subnet(mut self, subnet: impl Into<String>) -> Self {
        self.subnet = Some(SubnetId(subnet.into()));
        self
    }

    pub fn on_subnet6(mut self, subnet: impl Into<String>) -> Self {
        self.subnet6 = Some(SubnetId(subnet.into()));
        self
    }

    pub fn is_composite(&self) -> bool {
        self.kind == InterfaceKind::Bond
    }

    pub fn subnet_for(&self, family: IpFamily) -> Option<&SubnetId> {
        match family {
            IpFamily::V4 => self.subnet.as_ref(),
            IpFamily::V6 => self.subnet6.as_ref(),
        }
    }
}

impl fmt::Display for NetworkInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => f.write_str(name),
            None => f.write_str(&self.identifier),
        }
    }
}
