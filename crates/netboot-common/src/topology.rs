//! Subnet and proxy records the orchestration core reads

use crate::network::{ProxyEndpoint, ProxyId, Subnet, SubnetId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Read-only view of subnets and the proxies bound to them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Topology {
    #[serde(default)]
    subnets: HashMap<SubnetId, Subnet>,
    #[serde(default)]
    proxies: HashMap<ProxyId, ProxyEndpoint>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subnet(mut self, subnet: Subnet) -> Self {
        self.subnets.insert(subnet.id.clone(), subnet);
        self
    }

    pub fn with_proxy(mut self, proxy: ProxyEndpoint) -> Self {
        self.proxies.insert(proxy.id.clone(), proxy);
        self
    }

    pub fn subnet(&self, id: &SubnetId) -> Option<&Subnet> {
        self.subnets.get(id)
    }

    pub fn proxy(&self, id: &ProxyId) -> Option<&ProxyEndpoint> {
        self.proxies.get(id)
    }
}

impl FromIterator<Subnet> for Topology {
    fn from_iter<T: IntoIterator<Item = Subnet>>(iter: T) -> Self {
        iter.into_iter().fold(Topology::new(), Topology::with_subnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::IpFamily;

    #[test]
    fn test_lookup() {
        let topology = Topology::new()
            .with_proxy(ProxyEndpoint::new("proxy-a", "https://a.example.com:8443"))
            .with_subnet(Subnet::new("v6", IpFamily::V6, "2001:db8::/64").with_tftp("proxy-a"))
            .with_subnet(Subnet::new("v4", IpFamily::V4, "192.0.2.0/24"));

        let bound = topology
            .subnet(&SubnetId("v6".to_string()))
            .unwrap()
            .tftp
            .clone()
            .unwrap();
        assert_eq!(topology.proxy(&bound).unwrap().url, "https://a.example.com:8443");

        assert!(topology.subnet(&SubnetId("v4".to_string())).unwrap().tftp.is_none());
        assert!(topology.subnet(&SubnetId("missing".to_string())).is_none());
        assert!(topology.proxy(&ProxyId("proxy-b".to_string())).is_none());
    }

    #[test]
    fn test_collect_subnets() {
        let topology: Topology = vec![
            Subnet::new("a", IpFamily::V4, "10.0.0.0/24"),
            Subnet::new("b", IpFamily::V6, "2001:db8::/64"),
        ]
        .into_iter()
        .collect();
        assert!(topology.subnet(&SubnetId("b".to_string())).is_some());
    }
}
