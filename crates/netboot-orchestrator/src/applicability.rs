//! Whether an interface needs network boot configuration, and where it goes
//!
//! Evaluated per IP family: a dual-stack interface may be applicable for
//! IPv4 only, IPv6 only, both or neither. "Not applicable" is a normal
//! outcome, never an error.

use netboot_common::{Host, IpFamily, NetworkInterface, ProxyEndpoint, ProxyId, Topology};
use tracing::warn;

/// Whether `interface` of `host` needs TFTP configuration for `family`
pub fn applies(host: &Host, interface: &NetworkInterface, family: IpFamily, topology: &Topology) -> bool {
    interface.managed
        && interface.provision
        && host.pxe_loader.is_some()
        && tftp_proxy(interface, family, topology).is_some()
}

/// Families for which `interface` is applicable, in [`IpFamily::ALL`] order
pub fn applicable_families(host: &Host, interface: &NetworkInterface, topology: &Topology) -> Vec<IpFamily> {
    IpFamily::ALL
        .into_iter()
        .filter(|family| applies(host, interface, *family, topology))
        .collect()
}

/// Whether `interface` is applicable for at least one family
pub fn is_applicable(host: &Host, interface: &NetworkInterface, topology: &Topology) -> bool {
    IpFamily::ALL
        .into_iter()
        .any(|family| applies(host, interface, family, topology))
}

/// Proxy endpoints `interface` deploys to.
///
/// Families bound to the same proxy yield that proxy once.
pub fn endpoints<'a>(host: &Host, interface: &NetworkInterface, topology: &'a Topology) -> Vec<&'a ProxyEndpoint> {
    let mut seen: Vec<&ProxyId> = Vec::new();
    let mut endpoints = Vec::new();

    for family in applicable_families(host, interface, topology) {
        if let Some(proxy) = tftp_proxy(interface, family, topology) {
            if !seen.contains(&&proxy.id) {
                seen.push(&proxy.id);
                endpoints.push(proxy);
            }
        }
    }
    endpoints
}

/// The TFTP proxy bound to the interface's subnet for `family`
fn tftp_proxy<'a>(interface: &NetworkInterface, family: IpFamily, topology: &'a Topology) -> Option<&'a ProxyEndpoint> {
    let subnet = topology.subnet(interface.subnet_for(family)?)?;
    if subnet.family != family {
        warn!(subnet = %subnet.id, expected = %family, actual = %subnet.family, "Interface references a subnet of the wrong IP family");
        return None;
    }
    let proxy_id = subnet.tftp.as_ref()?;
    let proxy = topology.proxy(proxy_id);
    if proxy.is_none() {
        warn!(subnet = %subnet.id, proxy = %proxy_id, "Subnet is bound to an unknown TFTP proxy");
    }
    proxy
}

#[cfg(test)]
mod tests {
    use super::*;
    use netboot_common::{BootLoaderKind, MacAddress, Subnet};

    fn mac() -> MacAddress {
        "00:53:67:ab:dd:00".parse().unwrap()
    }

    fn topology() -> Topology {
        Topology::new()
            .with_proxy(ProxyEndpoint::new("tftp-a", "https://a.example.com:8443"))
            .with_proxy(ProxyEndpoint::new("tftp-b", "https://b.example.com:8443"))
            .with_subnet(Subnet::new("v4", IpFamily::V4, "192.0.2.0/24").with_tftp("tftp-a"))
            .with_subnet(Subnet::new("v6", IpFamily::V6, "2001:db8::/64").with_tftp("tftp-b"))
            .with_subnet(Subnet::new("v6-same", IpFamily::V6, "2001:db8:1::/64").with_tftp("tftp-a"))
            .with_subnet(Subnet::new("bare", IpFamily::V4, "198.51.100.0/24"))
            .with_subnet(Subnet::new("dangling", IpFamily::V4, "203.0.113.0/24").with_tftp("gone"))
            .with_subnet(Subnet::new("v6-only", IpFamily::V6, "2001:db8:2::/64").with_tftp("tftp-a"))
    }

    fn host() -> Host {
        Host::new("web01.example.com").with_loader(BootLoaderKind::PxeLinux)
    }

    #[test]
    fn test_single_stack() {
        let host = host();
        let nic = NetworkInterface::physical("eth0", mac()).provisioning().on_subnet("v4");
        let topology = topology();

        assert!(applies(&host, &nic, IpFamily::V4, &topology));
        assert!(!applies(&host, &nic, IpFamily::V6, &topology));
        assert_eq!(applicable_families(&host, &nic, &topology), vec![IpFamily::V4]);
        assert_eq!(endpoints(&host, &nic, &topology).len(), 1);
    }

    #[test]
    fn test_v6_only() {
        let host = host();
        let nic = NetworkInterface::physical("eth0", mac()).provisioning().on_subnet6("v6");
        let topology = topology();

        assert!(!applies(&host, &nic, IpFamily::V4, &topology));
        assert!(applies(&host, &nic, IpFamily::V6, &topology));
    }

    #[test]
    fn test_dual_stack_endpoints() {
        let host = host();
        let topology = topology();

        let distinct = NetworkInterface::physical("eth0", mac())
            .provisioning()
            .on_subnet("v4")
            .on_subnet6("v6");
        let ids: Vec<_> = endpoints(&host, &distinct, &topology)
            .into_iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(ids, vec!["tftp-a", "tftp-b"]);

        let shared = NetworkInterface::physical("eth0", mac())
            .provisioning()
            .on_subnet("v4")
            .on_subnet6("v6-same");
        assert_eq!(applicable_families(&host, &shared, &topology).len(), 2);
        assert_eq!(endpoints(&host, &shared, &topology).len(), 1);
    }

    #[test]
    fn test_not_applicable() {
        let topology = topology();
        let nic = || NetworkInterface::physical("eth0", mac()).provisioning();

        // no subnet at all
        assert!(!is_applicable(&host(), &nic(), &topology));
        // subnet without a proxy
        assert!(!is_applicable(&host(), &nic().on_subnet("bare"), &topology));
        // subnet bound to a proxy the topology does not know
        assert!(!is_applicable(&host(), &nic().on_subnet("dangling"), &topology));
        // unmanaged
        assert!(!is_applicable(&host(), &nic().on_subnet("v4").unmanaged(), &topology));
        // not the provisioning interface
        let plain = NetworkInterface::physical("eth1", mac()).on_subnet("v4");
        assert!(!is_applicable(&host(), &plain, &topology));
        // no loader selected
        let no_loader = Host::new("web02.example.com");
        assert!(!is_applicable(&no_loader, &nic().on_subnet("v4"), &topology));
    }

    #[test]
    fn test_subnet_family_must_match_slot() {
        let topology = topology();
        let host = host();

        // a v6 subnet referenced from the v4 slot is not v4 applicable
        let misplaced = NetworkInterface::physical("eth0", mac()).provisioning().on_subnet("v6-only");
        assert!(!applies(&host, &misplaced, IpFamily::V4, &topology));
        assert!(!applies(&host, &misplaced, IpFamily::V6, &topology));
        assert!(endpoints(&host, &misplaced, &topology).is_empty());

        let placed = NetworkInterface::physical("eth0", mac()).provisioning().on_subnet6("v6-only");
        assert!(applies(&host, &placed, IpFamily::V6, &topology));
    }
}
