//! Rebuild and validation
//!
//! Rebuild refreshes all three loader kinds, not only the selected one, so
//! switching loader later needs no redeploy. Validation only checks the
//! selected kind.

use crate::applicability;
use crate::deploy::DeploymentOrchestrator;
use netboot_common::{BootLoaderKind, Host, NetworkInterface};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// A host configuration that cannot be realized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub kind: BootLoaderKind,
    pub message: String,
}

/// Per-kind result of rebuilding one interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RebuildOutcome {
    pub interface: String,
    /// Kinds whose publish failed
    pub failed: Vec<BootLoaderKind>,
    /// Non-selected kinds without an installer template
    pub skipped: Vec<BootLoaderKind>,
    /// Remote calls made across all kinds
    pub attempted: usize,
}

impl RebuildOutcome {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drives re-deployment and validates template availability
pub struct RebuildEngine {
    orchestrator: Arc<DeploymentOrchestrator>,
}

impl RebuildEngine {
    pub fn new(orchestrator: Arc<DeploymentOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Republish every loader kind for `interface`.
    ///
    /// A failing kind is recorded and the remaining kinds still run.
    /// Unmanaged and non-provisioning interfaces are a successful no-op.
    pub async fn rebuild(&self, host: &Host, interface: &NetworkInterface) -> RebuildOutcome {
        let mut outcome = RebuildOutcome {
            interface: interface.identifier.clone(),
            ..Default::default()
        };

        if !interface.managed || !interface.provision {
            debug!(host = %host.name, interface = %interface, "Interface not managed for provisioning, nothing to rebuild");
            return outcome;
        }

        for kind in BootLoaderKind::ALL {
            match self.orchestrator.publish(host, interface, kind).await {
                Ok(report) => {
                    outcome.attempted += report.attempted;
                    if !report.is_success() {
                        error!(
                            host = %host.name,
                            interface = %interface,
                            kind = %kind,
                            failed = report.failures.len(),
                            "Failed to rebuild TFTP configuration"
                        );
                        outcome.failed.push(kind);
                    }
                }
                Err(e) if e.is_template_not_found() && host.pxe_loader != Some(kind) => {
                    debug!(host = %host.name, kind = %kind, "No template for unselected loader, skipping");
                    outcome.skipped.push(kind);
                }
                Err(e) => {
                    error!(host = %host.name, interface = %interface, kind = %kind, error = %e, "Failed to rebuild TFTP configuration");
                    outcome.failed.push(kind);
                }
            }
        }

        if outcome.is_success() {
            info!(host = %host.name, interface = %interface, calls = outcome.attempted, "Rebuilt TFTP configuration");
        }
        outcome
    }

    /// [`rebuild`](Self::rebuild), reduced to whether every kind succeeded
    pub async fn rebuild_all(&self, host: &Host, interface: &NetworkInterface) -> bool {
        self.rebuild(host, interface).await.is_success()
    }

    /// Rebuild every interface of `host`
    pub async fn rebuild_host(&self, host: &Host) -> Vec<RebuildOutcome> {
        let mut outcomes = Vec::with_capacity(host.interfaces.len());
        for interface in &host.interfaces {
            outcomes.push(self.rebuild(host, interface).await);
        }
        outcomes
    }

    /// Whether a build of `host` could find a template for its selected
    /// loader on `interface`. Never calls a proxy.
    ///
    /// Only interfaces that are TFTP applicable, on hosts with a selected
    /// loader and an operating system, are checked.
    pub fn validate(&self, host: &Host, interface: &NetworkInterface) -> Vec<ValidationError> {
        let Some(kind) = host.pxe_loader else {
            return Vec::new();
        };
        if host.operatingsystem.is_none() {
            return Vec::new();
        }
        if !applicability::is_applicable(host, interface, self.orchestrator.topology()) {
            debug!(host = %host.name, interface = %interface, "Interface not TFTP applicable, nothing to validate");
            return Vec::new();
        }

        match self.orchestrator.resolver().build_template(host, kind) {
            Ok(_) => Vec::new(),
            Err(e) => vec![ValidationError {
                kind,
                message: e.to_string(),
            }],
        }
    }

    /// [`validate`](Self::validate) over every interface of `host`, each
    /// distinct error reported once
    pub fn validate_host(&self, host: &Host) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = Vec::new();
        for interface in &host.interfaces {
            for error in self.validate(host, interface) {
                if !errors.contains(&error) {
                    errors.push(error);
                }
            }
        }
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netboot_common::{Architecture, IpFamily, MacAddress, OperatingSystem, OsFamily, ProxyEndpoint, Subnet, Topology};
    use netboot_proxy::MemoryConnector;
    use netboot_templates::{MemoryCatalog, ProvisioningTemplate, Settings, TemplateResolver};

    fn engine(catalog: MemoryCatalog, connector: MemoryConnector) -> RebuildEngine {
        let topology = Topology::new()
            .with_proxy(ProxyEndpoint::new("tftp-a", "https://a.example.com:8443"))
            .with_subnet(Subnet::new("v4", IpFamily::V4, "192.0.2.0/24").with_tftp("tftp-a"));
        let resolver = TemplateResolver::new(Arc::new(catalog), Arc::new(Settings::new()));
        let orchestrator = DeploymentOrchestrator::new(Arc::new(resolver), Arc::new(connector), Arc::new(topology));
        RebuildEngine::new(Arc::new(orchestrator))
    }

    fn host(kind: BootLoaderKind) -> Host {
        let mac: MacAddress = "00:53:67:ab:dd:00".parse().unwrap();
        Host::new("build01.example.com")
            .with_loader(kind)
            .with_os(
                OperatingSystem::new("Redhat", "7", "9").with_family(OsFamily::Redhat),
                Architecture::new("x86_64"),
            )
            .with_interface(NetworkInterface::physical("eth0", mac).provisioning().on_subnet("v4"))
    }

    #[tokio::test]
    async fn test_build_skips_unselected_kinds_without_template() {
        let connector = MemoryConnector::new();
        let catalog = MemoryCatalog::new().with_template(
            ProvisioningTemplate::new("Kickstart default PXELinux", BootLoaderKind::PxeLinux, "kernel {{ kernel }}")
                .for_family(OsFamily::Redhat),
        );
        let engine = engine(catalog, connector.clone());
        let host = host(BootLoaderKind::PxeLinux).in_build(true);

        let outcome = engine.rebuild(&host, &host.interfaces[0]).await;
        assert!(outcome.is_success());
        assert_eq!(outcome.skipped, vec![BootLoaderKind::PxeGrub, BootLoaderKind::PxeGrub2]);
        assert_eq!(connector.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_build_fails_for_selected_kind_without_template() {
        let engine = engine(MemoryCatalog::new(), MemoryConnector::new());
        let host = host(BootLoaderKind::PxeGrub2).in_build(true);

        let outcome = engine.rebuild(&host, &host.interfaces[0]).await;
        assert_eq!(outcome.failed, vec![BootLoaderKind::PxeGrub2]);
        assert!(!engine.rebuild_all(&host, &host.interfaces[0]).await);
    }

    #[tokio::test]
    async fn test_rebuild_host_covers_every_interface() {
        let connector = MemoryConnector::new();
        let engine = engine(MemoryCatalog::new(), connector.clone());
        let mac: MacAddress = "00:53:67:ab:dd:01".parse().unwrap();
        let host = host(BootLoaderKind::PxeLinux).with_interface(NetworkInterface::physical("eth1", mac).on_subnet("v4"));

        let outcomes = engine.rebuild_host(&host).await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(RebuildOutcome::is_success));
        assert_eq!(outcomes[0].attempted, 3);
        assert_eq!(outcomes[1].attempted, 0);
    }

    #[test]
    fn test_validate() {
        let engine = engine(MemoryCatalog::with_builtins(), MemoryConnector::new());

        let redhat = host(BootLoaderKind::PxeLinux);
        assert!(engine.validate(&redhat, &redhat.interfaces[0]).is_empty());

        let mut unset = host(BootLoaderKind::PxeLinux);
        unset.pxe_loader = None;
        assert!(engine.validate(&unset, &unset.interfaces[0]).is_empty());

        let debian = host(BootLoaderKind::PxeGrub).with_os(
            OperatingSystem::new("Debian", "12", "0").with_family(OsFamily::Debian),
            Architecture::new("x86_64"),
        );
        let errors = engine.validate(&debian, &debian.interfaces[0]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, BootLoaderKind::PxeGrub);
        assert!(errors[0].to_string().contains("No PXEGrub templates were found"));
    }

    #[test]
    fn test_validate_host_reports_each_error_once() {
        let engine = engine(MemoryCatalog::new(), MemoryConnector::new());
        let mac: MacAddress = "00:53:67:ab:dd:01".parse().unwrap();
        let host = host(BootLoaderKind::PxeGrub2)
            .with_interface(NetworkInterface::physical("eth1", mac).provisioning().on_subnet("v4"));

        let errors = engine.validate_host(&host);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("PXEGrub2"));
    }

    #[test]
    fn test_validate_skips_host_without_operating_system() {
        let engine = engine(MemoryCatalog::new(), MemoryConnector::new());
        let mut host = host(BootLoaderKind::PxeLinux);
        host.operatingsystem = None;

        assert!(engine.validate(&host, &host.interfaces[0]).is_empty());
        assert!(engine.validate_host(&host).is_empty());
    }
}
