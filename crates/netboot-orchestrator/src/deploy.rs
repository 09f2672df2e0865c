//! Deployment orchestrator
//!
//! Maps an interface to `(endpoint, MAC)` targets and drives the boot
//! proxies:
//!
//! 1. Resolve content once per loader kind
//! 2. Expand a bond to the MACs of its members, in attachment order
//! 3. Collect the proxies of every applicable family, one entry per proxy
//! 4. Call each `(MAC, endpoint)` pair once, collecting failures without
//!    stopping at the first

use crate::applicability;
use crate::error::{DeployError, Result};
use netboot_common::{BootLoaderKind, Host, MacAddress, NetworkInterface, ProxyEndpoint, Topology};
use netboot_proxy::{BootProxy, ProxyConnector, ProxyError};
use netboot_templates::TemplateResolver;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Event emitted for every remote effect the orchestrator attempts
#[derive(Debug, Clone)]
pub enum DeployEvent {
    /// Configuration written
    Published {
        host: String,
        kind: BootLoaderKind,
        endpoint: String,
        mac: MacAddress,
    },
    /// Configuration removed
    Removed {
        host: String,
        kind: BootLoaderKind,
        endpoint: String,
        mac: MacAddress,
    },
    /// Proxy asked to download a boot file
    BootFileFetched {
        host: String,
        endpoint: String,
        prefix: String,
    },
    /// A single remote call failed
    Failed {
        host: String,
        endpoint: String,
        mac: Option<MacAddress>,
        error: String,
    },
}

/// One proxy call: a MAC's configuration slot on one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentTarget {
    pub endpoint: ProxyEndpoint,
    pub mac: MacAddress,
}

/// A remote call that did not succeed
#[derive(Debug)]
pub struct TargetFailure {
    pub endpoint: String,
    pub mac: Option<MacAddress>,
    pub error: ProxyError,
}

/// Outcome of one orchestration pass
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Remote calls made (or attempted)
    pub attempted: usize,
    pub failures: Vec<TargetFailure>,
}

impl PublishReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Turn collected failures into an error, returning the call count on success
    pub fn into_result(self) -> Result<usize> {
        let failed = self.failures.len();
        match self.failures.into_iter().next() {
            None => Ok(self.attempted),
            Some(first) => Err(DeployError::Proxy {
                failed,
                first: first.error,
            }),
        }
    }

    fn record(&mut self, result: std::result::Result<(), TargetFailure>) {
        self.attempted += 1;
        if let Err(failure) = result {
            self.failures.push(failure);
        }
    }
}

enum Operation<'a> {
    Set(&'a str),
    Delete,
}

/// Publishes boot configuration to the proxies an interface is bound to
pub struct DeploymentOrchestrator {
    resolver: Arc<TemplateResolver>,
    connector: Arc<dyn ProxyConnector>,
    topology: Arc<Topology>,
    event_sender: broadcast::Sender<DeployEvent>,
}

impl DeploymentOrchestrator {
    pub fn new(resolver: Arc<TemplateResolver>, connector: Arc<dyn ProxyConnector>, topology: Arc<Topology>) -> Self {
        let (event_sender, _) = broadcast::channel(1024);
        Self {
            resolver,
            connector,
            topology,
            event_sender,
        }
    }

    /// Subscribe to deployment events
    pub fn subscribe(&self) -> broadcast::Receiver<DeployEvent> {
        self.event_sender.subscribe()
    }

    pub fn resolver(&self) -> &TemplateResolver {
        &self.resolver
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Every `(endpoint, MAC)` pair a publish for `interface` would call
    pub fn targets(&self, host: &Host, interface: &NetworkInterface) -> Vec<DeploymentTarget> {
        self.targets_for(host, interface, &host.members_of(interface))
    }

    /// Publish `kind` configuration for `interface` to all its targets
    pub async fn publish(&self, host: &Host, interface: &NetworkInterface, kind: BootLoaderKind) -> Result<PublishReport> {
        let members = host.members_of(interface);
        self.publish_to(host, interface, kind, &members).await
    }

    /// Publish for a single member of `interface`; a physical interface is
    /// its own only member
    pub async fn publish_member(
        &self,
        host: &Host,
        interface: &NetworkInterface,
        member: &str,
        kind: BootLoaderKind,
    ) -> Result<PublishReport> {
        let member = self.member(host, interface, member)?;
        self.publish_to(host, interface, kind, &[member]).await
    }

    /// Remove `kind` configuration for `interface` from all its targets
    pub async fn unpublish(&self, host: &Host, interface: &NetworkInterface, kind: BootLoaderKind) -> Result<PublishReport> {
        let targets = self.targets(host, interface);
        Ok(self.apply(host, kind, &targets, Operation::Delete).await)
    }

    /// Remove configuration for a single member of `interface`
    pub async fn unpublish_member(
        &self,
        host: &Host,
        interface: &NetworkInterface,
        member: &str,
        kind: BootLoaderKind,
    ) -> Result<PublishReport> {
        let member = self.member(host, interface, member)?;
        let targets = self.targets_for(host, interface, &[member]);
        Ok(self.apply(host, kind, &targets, Operation::Delete).await)
    }

    /// Ask every proxy of `interface` to download the installer kernel and
    /// initrd. Hosts without OS, architecture or medium have nothing to fetch.
    pub async fn fetch_boot_files(&self, host: &Host, interface: &NetworkInterface) -> Result<PublishReport> {
        let mut report = PublishReport::default();

        let (Some(os), Some(arch), Some(medium)) = (&host.operatingsystem, &host.architecture, &host.medium) else {
            debug!(host = %host.name, "No operating system, architecture or medium, skipping boot file fetch");
            return Ok(report);
        };
        let files = os.boot_files(medium, arch);

        for endpoint in applicability::endpoints(host, interface, &self.topology) {
            let proxy = match self.connector.connect(endpoint) {
                Ok(proxy) => proxy,
                Err(error) => {
                    report.record(Err(self.failure(host, endpoint, None, error)));
                    continue;
                }
            };

            for file in &files {
                let result = match proxy.fetch_boot_file(file).await {
                    Ok(()) => {
                        info!(host = %host.name, endpoint = %endpoint.id, prefix = %file.prefix, "Boot file fetch requested");
                        let _ = self.event_sender.send(DeployEvent::BootFileFetched {
                            host: host.name.clone(),
                            endpoint: endpoint.id.to_string(),
                            prefix: file.prefix.clone(),
                        });
                        Ok(())
                    }
                    Err(error) => Err(self.failure(host, endpoint, None, error)),
                };
                report.record(result);
            }
        }
        Ok(report)
    }

    async fn publish_to(
        &self,
        host: &Host,
        interface: &NetworkInterface,
        kind: BootLoaderKind,
        members: &[&NetworkInterface],
    ) -> Result<PublishReport> {
        let targets = self.targets_for(host, interface, members);
        if targets.is_empty() {
            debug!(host = %host.name, interface = %interface, kind = %kind, "No TFTP targets, nothing to publish");
            return Ok(PublishReport::default());
        }

        let content = self.resolver.resolve(host, kind)?;
        Ok(self.apply(host, kind, &targets, Operation::Set(&content)).await)
    }

    fn member<'a>(&self, host: &'a Host, interface: &'a NetworkInterface, member: &str) -> Result<&'a NetworkInterface> {
        host.members_of(interface)
            .into_iter()
            .find(|m| m.identifier == member)
            .ok_or_else(|| DeployError::UnknownInterface {
                host: host.name.clone(),
                interface: member.to_string(),
            })
    }

    fn targets_for(&self, host: &Host, interface: &NetworkInterface, members: &[&NetworkInterface]) -> Vec<DeploymentTarget> {
        let endpoints = applicability::endpoints(host, interface, &self.topology);
        if endpoints.is_empty() {
            return Vec::new();
        }

        if interface.is_composite() && members.is_empty() {
            warn!(host = %host.name, interface = %interface, "Bond has no resolvable members");
        }

        let mut targets = Vec::new();
        for member in members {
            let Some(mac) = &member.mac else {
                warn!(host = %host.name, interface = %member, "Interface has no MAC address, skipping");
                continue;
            };
            for endpoint in &endpoints {
                targets.push(DeploymentTarget {
                    endpoint: (*endpoint).clone(),
                    mac: mac.clone(),
                });
            }
        }
        targets
    }

    async fn apply(&self, host: &Host, kind: BootLoaderKind, targets: &[DeploymentTarget], op: Operation<'_>) -> PublishReport {
        let mut report = PublishReport::default();

        for target in targets {
            let result = match self.connector.connect(&target.endpoint) {
                Ok(proxy) => self.call(host, kind, target, proxy.as_ref(), &op).await,
                Err(error) => Err(error),
            };
            report.record(result.map_err(|error| self.failure(host, &target.endpoint, Some(&target.mac), error)));
        }
        report
    }

    async fn call(
        &self,
        host: &Host,
        kind: BootLoaderKind,
        target: &DeploymentTarget,
        proxy: &dyn BootProxy,
        op: &Operation<'_>,
    ) -> std::result::Result<(), ProxyError> {
        let event = match op {
            Operation::Set(content) => {
                proxy.set(kind, &target.mac, content).await?;
                info!(host = %host.name, kind = %kind, mac = %target.mac, endpoint = %target.endpoint.id, "Deployed TFTP configuration");
                DeployEvent::Published {
                    host: host.name.clone(),
                    kind,
                    endpoint: target.endpoint.id.to_string(),
                    mac: target.mac.clone(),
                }
            }
            Operation::Delete => {
                proxy.delete(kind, &target.mac).await?;
                info!(host = %host.name, kind = %kind, mac = %target.mac, endpoint = %target.endpoint.id, "Removed TFTP configuration");
                DeployEvent::Removed {
                    host: host.name.clone(),
                    kind,
                    endpoint: target.endpoint.id.to_string(),
                    mac: target.mac.clone(),
                }
            }
        };
        let _ = self.event_sender.send(event);
        Ok(())
    }

    fn failure(&self, host: &Host, endpoint: &ProxyEndpoint, mac: Option<&MacAddress>, error: ProxyError) -> TargetFailure {
        warn!(host = %host.name, endpoint = %endpoint.id, mac = ?mac.map(MacAddress::as_str), error = %error, "Boot proxy call failed");
        let _ = self.event_sender.send(DeployEvent::Failed {
            host: host.name.clone(),
            endpoint: endpoint.id.to_string(),
            mac: mac.cloned(),
            error: error.to_string(),
        });
        TargetFailure {
            endpoint: endpoint.id.to_string(),
            mac: mac.cloned(),
            error,
        }
    }
}
