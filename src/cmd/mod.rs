//! Subcommands and the wiring they share

pub mod queue;
pub mod rebuild;
pub mod render;
pub mod validate;

use crate::inventory::Inventory;
use color_eyre::eyre::Result;
use netboot_common::Topology;
use netboot_orchestrator::{DeploymentOrchestrator, RebuildEngine};
use netboot_proxy::{HttpConnector, MemoryConnector, ProxyCall, ProxyConnector};
use std::path::Path;
use std::sync::Arc;

/// Inventory plus the orchestration components built from it
pub struct Context {
    pub inventory: Inventory,
    pub topology: Arc<Topology>,
    pub orchestrator: Arc<DeploymentOrchestrator>,
    /// Set in dry-run mode
    recorder: Option<MemoryConnector>,
}

impl Context {
    pub fn load(path: &Path, dry_run: bool) -> Result<Self> {
        let inventory = Inventory::load(path)?;
        let topology = Arc::new(inventory.topology());

        let recorder = dry_run.then(MemoryConnector::new);
        let connector: Arc<dyn ProxyConnector> = match &recorder {
            Some(recorder) => Arc::new(recorder.clone()),
            None => match inventory.proxy_timeout() {
                Some(timeout) => Arc::new(HttpConnector::with_timeout(timeout)?),
                None => Arc::new(HttpConnector::new()?),
            },
        };

        let orchestrator = Arc::new(DeploymentOrchestrator::new(
            Arc::new(inventory.resolver()),
            connector,
            topology.clone(),
        ));

        Ok(Self {
            inventory,
            topology,
            orchestrator,
            recorder,
        })
    }

    pub fn engine(&self) -> RebuildEngine {
        RebuildEngine::new(self.orchestrator.clone())
    }

    /// Print the calls a dry run recorded
    pub async fn report_dry_run(&self) {
        let Some(recorder) = &self.recorder else {
            return;
        };
        for call in recorder.calls().await {
            match call {
                ProxyCall::Set { endpoint, kind, mac, .. } => println!("would set {} {} on {}", kind, mac, endpoint),
                ProxyCall::Delete { endpoint, kind, mac } => println!("would delete {} {} on {}", kind, mac, endpoint),
                ProxyCall::FetchBootFile { endpoint, prefix, url } => {
                    println!("would fetch {} into {} on {}", url, prefix, endpoint)
                }
            }
        }
    }
}
