//! Subnets and the boot-service proxies bound to them

use serde::{Deserialize, Serialize};
use std::fmt;

/// IP family a subnet (and an interface's address on it) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IpFamily {
    V4,
    V6,
}

impl IpFamily {
    /// Both families, v4 first
    pub const ALL: [IpFamily; 2] = [IpFamily::V4, IpFamily::V6];
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpFamily::V4 => write!(f, "ipv4"),
            IpFamily::V6 => write!(f, "ipv6"),
        }
    }
}

/// Stable reference to a subnet record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubnetId(pub String);

impl fmt::Display for SubnetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable reference to a boot-service proxy.
///
/// Two subnets pointing at the same `ProxyId` share one endpoint instance,
/// which is what deployment deduplicates on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProxyId(pub String);

impl fmt::Display for ProxyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A subnet as seen by the orchestration core
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Subnet {
    pub id: SubnetId,
    pub family: IpFamily,
    /// Network in CIDR notation, e.g. `192.168.10.0/24`
    pub network: String,
    /// Boot-service proxy serving TFTP on this subnet
    #[serde(default)]
    pub tftp: Option<ProxyId>,
}

impl Subnet {
    pub fn new(id: impl Into<String>, family: IpFamily, network: impl Into<String>) -> Self {
        Self {
            id: SubnetId(id.into()),
            family,
            network: network.into(),
            tftp: None,
        }
    }

    /// Bind a TFTP proxy to this subnet
    pub fn with_tftp(mut self, proxy: impl Into<String>) -> Self {
        self.tftp = Some(ProxyId(proxy.into()));
        self
    }
}

/// A remote boot-service endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProxyEndpoint {
    pub id: ProxyId,
    /// Base URL of the proxy API, e.g. `https://proxy.example.com:8443`
    pub url: String,
}

impl ProxyEndpoint {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: ProxyId(id.into()),
            url: url.into(),
        }
    }
}
