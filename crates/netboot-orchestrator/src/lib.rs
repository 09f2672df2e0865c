//! Netboot orchestration core
//!
//! Decides whether a host's interfaces need network boot configuration,
//! renders it, and pushes it to the boot proxies bound to their subnets.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌────────────────────┐
//! │ SchedulerAdapter │     │   RebuildEngine    │
//! │  (queued work)   │     │ (rebuild/validate) │
//! └────────┬─────────┘     └─────────┬──────────┘
//!          │ TaskRunner              │
//!          └────────────┬────────────┘
//!                       ▼
//!           ┌───────────────────────┐
//!           │ DeploymentOrchestrator│── applicability
//!           └───────────┬───────────┘
//!             TemplateResolver │ ProxyConnector
//!                       ▼
//!                 boot proxies
//! ```
//!
//! # Example
//!
//! ```
//! use netboot_common::*;
//! use netboot_orchestrator::{DeploymentOrchestrator, RebuildEngine};
//! use netboot_proxy::MemoryConnector;
//! use netboot_templates::{MemoryCatalog, Settings, TemplateResolver};
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let topology = Topology::new()
//!     .with_proxy(ProxyEndpoint::new("tftp-a", "https://a.example.com:8443"))
//!     .with_subnet(Subnet::new("v4", IpFamily::V4, "192.0.2.0/24").with_tftp("tftp-a"));
//! let resolver = TemplateResolver::new(Arc::new(MemoryCatalog::with_builtins()), Arc::new(Settings::new()));
//! let connector = MemoryConnector::new();
//! let orchestrator = DeploymentOrchestrator::new(
//!     Arc::new(resolver),
//!     Arc::new(connector.clone()),
//!     Arc::new(topology),
//! );
//!
//! let mac: MacAddress = "00:53:67:ab:dd:00".parse().unwrap();
//! let host = Host::new("web01.example.com")
//!     .with_loader(BootLoaderKind::PxeLinux)
//!     .with_interface(NetworkInterface::physical("eth0", mac).provisioning().on_subnet("v4"));
//!
//! let engine = RebuildEngine::new(Arc::new(orchestrator));
//! assert!(engine.rebuild_all(&host, &host.interfaces[0]).await);
//! assert_eq!(connector.calls().await.len(), 3);
//! # }
//! ```

pub mod applicability;
pub mod deploy;
pub mod error;
pub mod queue;
pub mod rebuild;

pub use applicability::{applicable_families, applies, is_applicable};
pub use deploy::{DeployEvent, DeploymentOrchestrator, DeploymentTarget, PublishReport, TargetFailure};
pub use error::{DeployError, Result};
pub use queue::{
    MemoryTaskQueue, QueuedTask, SchedulerAdapter, TaskAction, TaskOutcome, TaskRunner, TaskScheduler,
};
pub use rebuild::{RebuildEngine, RebuildOutcome, ValidationError};
