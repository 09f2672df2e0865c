//! Task scheduler adapter
//!
//! Translates a host save into named work items for an external job
//! system. Repeated saves may enqueue duplicates; the work itself is
//! idempotent at the proxies.

use crate::applicability;
use crate::deploy::DeploymentOrchestrator;
use crate::error::{DeployError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use netboot_common::{BootLoaderKind, Host, NetworkInterface, Topology};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub const DEPLOY_PRIORITY: u32 = 20;
pub const FETCH_PRIORITY: u32 = 25;
pub const DELETE_PRIORITY: u32 = 60;

/// What a queued task does when it runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TaskAction {
    /// Publish `kind` configuration for one member of `interface`
    Deploy {
        interface: String,
        member: String,
        kind: BootLoaderKind,
    },
    /// Download installer files to the proxies of `interface`
    FetchBootFiles { interface: String },
    /// Remove `kind` configuration for one member of `interface`
    Delete {
        interface: String,
        member: String,
        kind: BootLoaderKind,
    },
}

/// A named work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueuedTask {
    pub id: Uuid,
    pub name: String,
    /// Lower runs first
    pub priority: u32,
    pub action: TaskAction,
    pub created_at: DateTime<Utc>,
}

impl QueuedTask {
    pub fn new(name: impl Into<String>, priority: u32, action: TaskAction) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            priority,
            action,
            created_at: Utc::now(),
        }
    }
}

/// External job queue accepting named work items
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Enqueue a task, returning its handle
    async fn enqueue(&self, task: QueuedTask) -> Result<Uuid>;
}

/// In-memory queue for tests and the CLI
#[derive(Debug, Default)]
pub struct MemoryTaskQueue {
    tasks: Mutex<Vec<QueuedTask>>,
}

impl MemoryTaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued tasks by priority, then insertion order
    pub async fn pending(&self) -> Vec<QueuedTask> {
        let mut tasks = self.tasks.lock().await.clone();
        tasks.sort_by_key(|t| t.priority);
        tasks
    }

    /// Take every queued task, in [`pending`](Self::pending) order
    pub async fn drain(&self) -> Vec<QueuedTask> {
        let mut tasks = std::mem::take(&mut *self.tasks.lock().await);
        tasks.sort_by_key(|t| t.priority);
        tasks
    }

    pub async fn len(&self) -> usize {
        self.tasks.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tasks.lock().await.is_empty()
    }
}

#[async_trait]
impl TaskScheduler for MemoryTaskQueue {
    async fn enqueue(&self, task: QueuedTask) -> Result<Uuid> {
        let id = task.id;
        self.tasks.lock().await.push(task);
        Ok(id)
    }
}

/// Queues TFTP work for host saves and removals
pub struct SchedulerAdapter {
    scheduler: Arc<dyn TaskScheduler>,
    topology: Arc<Topology>,
}

impl SchedulerAdapter {
    pub fn new(scheduler: Arc<dyn TaskScheduler>, topology: Arc<Topology>) -> Self {
        Self { scheduler, topology }
    }

    /// Tasks for a saved host: a deploy and a fetch per applicable
    /// physical interface, bonds contributing their members
    pub async fn queue_create(&self, host: &Host) -> Result<Vec<QueuedTask>> {
        let mut queued = Vec::new();
        for (interface, member, kind) in self.affected(host) {
            queued.push(QueuedTask::new(
                format!("Deploy TFTP {} config for {}", kind, member),
                DEPLOY_PRIORITY,
                TaskAction::Deploy {
                    interface: interface.identifier.clone(),
                    member: member.identifier.clone(),
                    kind,
                },
            ));
            queued.push(QueuedTask::new(
                format!("Fetch TFTP boot files for {}", member),
                FETCH_PRIORITY,
                TaskAction::FetchBootFiles {
                    interface: interface.identifier.clone(),
                },
            ));
        }
        self.enqueue_all(host, queued).await
    }

    /// Tasks for a removed host: one delete per applicable physical interface
    pub async fn queue_destroy(&self, host: &Host) -> Result<Vec<QueuedTask>> {
        let queued = self
            .affected(host)
            .into_iter()
            .map(|(interface, member, kind)| {
                QueuedTask::new(
                    format!("Delete TFTP {} config for {}", kind, member),
                    DELETE_PRIORITY,
                    TaskAction::Delete {
                        interface: interface.identifier.clone(),
                        member: member.identifier.clone(),
                        kind,
                    },
                )
            })
            .collect();
        self.enqueue_all(host, queued).await
    }

    async fn enqueue_all(&self, host: &Host, tasks: Vec<QueuedTask>) -> Result<Vec<QueuedTask>> {
        if tasks.is_empty() {
            debug!(host = %host.name, "No TFTP work to queue");
        }
        for task in &tasks {
            self.scheduler.enqueue(task.clone()).await?;
            info!(host = %host.name, task = %task.name, priority = task.priority, "Queued task");
        }
        Ok(tasks)
    }

    /// `(interface, member, kind)` for every applicable interface member.
    /// A member reached through several interfaces is listed once.
    fn affected<'a>(&self, host: &'a Host) -> Vec<(&'a NetworkInterface, &'a NetworkInterface, BootLoaderKind)> {
        let Some(kind) = host.pxe_loader else {
            return Vec::new();
        };

        let mut seen: Vec<&str> = Vec::new();
        let mut affected = Vec::new();
        for interface in host
            .interfaces
            .iter()
            .filter(|i| applicability::is_applicable(host, i, &self.topology))
        {
            for member in host.members_of(interface) {
                if seen.contains(&member.identifier.as_str()) {
                    continue;
                }
                seen.push(&member.identifier);
                affected.push((interface, member, kind));
            }
        }
        affected
    }
}

/// Result of running one task
#[derive(Debug)]
pub struct TaskOutcome {
    pub task: QueuedTask,
    /// Remote calls made on success
    pub result: Result<usize>,
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Executes queued tasks through the orchestrator, one attempt each
pub struct TaskRunner {
    orchestrator: Arc<DeploymentOrchestrator>,
}

impl TaskRunner {
    pub fn new(orchestrator: Arc<DeploymentOrchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Run `tasks` for `host` in the order given
    pub async fn run(&self, host: &Host, tasks: impl IntoIterator<Item = QueuedTask>) -> Vec<TaskOutcome> {
        let mut outcomes = Vec::new();
        for task in tasks {
            let result = self.execute(host, &task.action).await;
            match &result {
                Ok(calls) => debug!(host = %host.name, task = %task.name, calls, "Task completed"),
                Err(e) => warn!(host = %host.name, task = %task.name, error = %e, "Task failed"),
            }
            outcomes.push(TaskOutcome { task, result });
        }
        outcomes
    }

    async fn execute(&self, host: &Host, action: &TaskAction) -> Result<usize> {
        let report = match action {
            TaskAction::Deploy { interface, member, kind } => {
                let interface = self.interface(host, interface)?;
                self.orchestrator.publish_member(host, interface, member, *kind).await?
            }
            TaskAction::FetchBootFiles { interface } => {
                let interface = self.interface(host, interface)?;
                self.orchestrator.fetch_boot_files(host, interface).await?
            }
            TaskAction::Delete { interface, member, kind } => {
                let interface = self.interface(host, interface)?;
                self.orchestrator.unpublish_member(host, interface, member, *kind).await?
            }
        };
        report.into_result()
    }

    fn interface<'a>(&self, host: &'a Host, identifier: &str) -> Result<&'a NetworkInterface> {
        host.interface(identifier).ok_or_else(|| DeployError::UnknownInterface {
            host: host.name.clone(),
            interface: identifier.to_string(),
        })
    }
}
