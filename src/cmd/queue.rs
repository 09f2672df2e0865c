use super::Context;
use clap::Args;
use color_eyre::eyre::{bail, Result};
use netboot_orchestrator::{MemoryTaskQueue, SchedulerAdapter, TaskRunner};
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct QueueArgs {
    /// Host name as listed in the inventory
    #[arg(long)]
    pub host: String,

    /// Queue the removal tasks instead of the creation tasks
    #[arg(long, default_value_t = false)]
    pub destroy: bool,

    /// Execute the queued tasks once
    #[arg(long, default_value_t = false)]
    pub run: bool,
}

pub async fn run(context: &Context, args: QueueArgs) -> Result<()> {
    let host = context.inventory.host(&args.host)?;
    let queue = Arc::new(MemoryTaskQueue::new());
    let adapter = SchedulerAdapter::new(queue.clone(), context.topology.clone());

    if args.destroy {
        adapter.queue_destroy(host).await?;
    } else {
        adapter.queue_create(host).await?;
    }

    let tasks = queue.drain().await;
    if !args.run {
        for task in &tasks {
            println!("[{}] {}", task.priority, task.name);
        }
        return Ok(());
    }

    let outcomes = TaskRunner::new(context.orchestrator.clone()).run(host, tasks).await;
    context.report_dry_run().await;

    let mut failed = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(calls) => println!("[{}] {}: ok ({} calls)", outcome.task.priority, outcome.task.name, calls),
            Err(e) => {
                failed += 1;
                println!("[{}] {}: {}", outcome.task.priority, outcome.task.name, e);
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} task(s) failed", failed, outcomes.len());
    }
    Ok(())
}
