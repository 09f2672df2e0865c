use super::Context;
use clap::Args;
use color_eyre::eyre::{bail, Result};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Host name as listed in the inventory
    #[arg(long)]
    pub host: String,
}

pub fn run(context: &Context, args: ValidateArgs) -> Result<()> {
    let host = context.inventory.host(&args.host)?;
    let errors = context.engine().validate_host(host);

    if errors.is_empty() {
        println!("{}: ok", host.name);
        return Ok(());
    }
    for error in &errors {
        println!("{}: {}", host.name, error);
    }
    bail!("{} validation error(s) for {}", errors.len(), host.name)
}
