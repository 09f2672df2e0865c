//! Variables available to boot loader templates

use netboot_common::{BootLoaderKind, Host};
use serde::Serialize;

/// Host parameter holding extra kernel command line arguments
pub const KERNEL_OPTIONS_PARAM: &str = "kernelopts";

/// Substitution variables for one host and loader kind.
///
/// Missing values render as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderContext {
    /// Host name
    pub host: String,
    /// MAC the host provisions through
    pub mac: String,
    pub kind: String,
    /// Operating system title, e.g. `Redhat 6.1`
    pub os: String,
    pub arch: String,
    /// Installer kernel relative to the TFTP root
    pub kernel: String,
    /// Installer initrd relative to the TFTP root
    pub initrd: String,
    /// Provisioning service base URL
    pub base_url: String,
    /// Unattended-installation URL for this OS family
    pub provision_url: String,
    /// Installation medium URL
    pub install_url: String,
    /// Extra kernel command line arguments
    pub append: String,
}

impl RenderContext {
    pub fn for_host(host: &Host, kind: BootLoaderKind, base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let mut context = RenderContext {
            host: host.name.clone(),
            kind: kind.to_string(),
            append: host.parameter(KERNEL_OPTIONS_PARAM).unwrap_or_default().to_string(),
            ..Default::default()
        };

        if let Some(mac) = provisioning_mac(host) {
            context.mac = mac;
        }

        if let Some(os) = &host.operatingsystem {
            context.os = os.to_string();
            context.provision_url =
                format!("{}/unattended/{}", base_url, os.family.provision_path());
            if let Some(arch) = &host.architecture {
                context.arch = arch.to_string();
                context.kernel = os.kernel_path(arch).unwrap_or_default();
                context.initrd = os.initrd_path(arch).unwrap_or_default();
                if let Some(medium) = &host.medium {
                    context.install_url = medium.url_for(os, arch);
                }
            }
        }

        context.base_url = base_url;
        context
    }
}

/// MAC of the provisioning interface, or of its first member for bonds
fn provisioning_mac(host: &Host) -> Option<String> {
    let interface = host.provision_interface()?;
    interface
        .mac
        .as_ref()
        .or_else(|| host.members_of(interface).into_iter().find_map(|m| m.mac.as_ref()))
        .map(|mac| mac.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use netboot_common::{Architecture, Medium, NetworkInterface, OperatingSystem, OsFamily};

    #[test]
    fn test_context_for_build_host() {
        let host = Host::new("web01.example.com")
            .with_os(
                OperatingSystem::new("OpenSuse", "12", "3").with_family(OsFamily::Suse),
                Architecture::new("x86_64"),
            )
            .with_medium(Medium::new(
                "openSUSE",
                "http://download.opensuse.org/distribution/$version/repo/oss",
            ))
            .with_parameter(KERNEL_OPTIONS_PARAM, "console=ttyS0");

        let context = RenderContext::for_host(&host, BootLoaderKind::PxeLinux, "http://ahost.com:3000/");
        assert_eq!(context.kernel, "boot/OpenSuse-12.3-x86_64-linux");
        assert_eq!(context.initrd, "boot/OpenSuse-12.3-x86_64-initrd");
        assert_eq!(context.provision_url, "http://ahost.com:3000/unattended/provision");
        assert_eq!(
            context.install_url,
            "http://download.opensuse.org/distribution/12.3/repo/oss"
        );
        assert_eq!(context.append, "console=ttyS0");
        assert_eq!(context.base_url, "http://ahost.com:3000");
    }

    #[test]
    fn test_bond_mac_comes_from_first_member() {
        let host = Host::new("h")
            .with_interface(NetworkInterface::bond("bond0", ["eth1", "eth0"]).provisioning())
            .with_interface(NetworkInterface::physical("eth0", "00:53:67:ab:dd:00".parse().unwrap()))
            .with_interface(NetworkInterface::physical("eth1", "00:53:67:ab:dd:01".parse().unwrap()));
        let context = RenderContext::for_host(&host, BootLoaderKind::PxeGrub2, "http://x");
        assert_eq!(context.mac, "00:53:67:ab:dd:01");
    }
}
