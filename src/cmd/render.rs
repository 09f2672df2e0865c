use super::Context;
use clap::Args;
use color_eyre::eyre::{eyre, Result};
use netboot_common::BootLoaderKind;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Host name as listed in the inventory
    #[arg(long)]
    pub host: String,

    /// Loader kind (PXELinux, PXEGrub, PXEGrub2 or a loader file name);
    /// defaults to the host's selected loader
    #[arg(long)]
    pub kind: Option<BootLoaderKind>,
}

pub fn run(context: &Context, args: RenderArgs) -> Result<()> {
    let host = context.inventory.host(&args.host)?;
    let kind = args
        .kind
        .or(host.pxe_loader)
        .ok_or_else(|| eyre!("Host {} has no PXE loader selected, pass --kind", host.name))?;

    let config = context.orchestrator.resolver().resolve(host, kind)?;
    println!("{}", config.trim_end());
    Ok(())
}
