use super::Context;
use clap::Args;
use color_eyre::eyre::{bail, eyre, Result};
use netboot_orchestrator::RebuildOutcome;

#[derive(Args, Debug)]
pub struct RebuildArgs {
    /// Host name as listed in the inventory
    #[arg(long)]
    pub host: String,

    /// Only rebuild this interface
    #[arg(long)]
    pub interface: Option<String>,
}

pub async fn run(context: &Context, args: RebuildArgs) -> Result<()> {
    let host = context.inventory.host(&args.host)?;
    let engine = context.engine();

    let outcomes = match &args.interface {
        Some(identifier) => {
            let interface = host
                .interface(identifier)
                .ok_or_else(|| eyre!("Interface {} not found on host {}", identifier, host.name))?;
            vec![engine.rebuild(host, interface).await]
        }
        None => engine.rebuild_host(host).await,
    };

    context.report_dry_run().await;

    for outcome in &outcomes {
        print_outcome(outcome);
    }
    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        bail!("Failed to rebuild TFTP configuration on {} interface(s) of {}", failed, host.name);
    }
    Ok(())
}

fn print_outcome(outcome: &RebuildOutcome) {
    if outcome.is_success() {
        println!("{}: ok ({} calls)", outcome.interface, outcome.attempted);
    } else {
        let kinds: Vec<_> = outcome.failed.iter().map(|k| k.to_string()).collect();
        println!("{}: failed {}", outcome.interface, kinds.join(", "));
    }
}
