// netbootctl: drive the network boot orchestration core against an inventory
use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use std::io::stderr;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

mod cmd;
mod inventory;

use cmd::queue::QueueArgs;
use cmd::rebuild::RebuildArgs;
use cmd::render::RenderArgs;
use cmd::validate::ValidateArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Network boot (TFTP) configuration orchestration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Inventory file (YAML) with settings, proxies, subnets, templates and hosts
    #[arg(short, long, global = true, default_value = "inventory.yaml")]
    inventory: PathBuf,

    /// Record boot proxy calls instead of sending them
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,

    /// Verbose output - shows more detailed logs
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the configuration a host gets for a loader kind
    Render(RenderArgs),
    /// Check that the host's selected loader has an installer template
    Validate(ValidateArgs),
    /// Republish every loader kind for a host's interfaces
    Rebuild(RebuildArgs),
    /// Show (and optionally run) the tasks a host save would enqueue
    Queue(QueueArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let default_directives = format!(
        "netbootctl={level},netboot_orchestrator={level},netboot_templates={level},netboot_proxy={level},reqwest=warn,hyper=warn,rustls=warn",
        level = default_level
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives));
    registry().with(filter).with(fmt::layer().with_writer(stderr)).init();

    debug!(inventory = %cli.inventory.display(), dry_run = cli.dry_run, "Loading inventory");
    let context = cmd::Context::load(&cli.inventory, cli.dry_run)?;

    match cli.command {
        Commands::Render(args) => cmd::render::run(&context, args),
        Commands::Validate(args) => cmd::validate::run(&context, args),
        Commands::Rebuild(args) => cmd::rebuild::run(&context, args).await,
        Commands::Queue(args) => cmd::queue::run(&context, args).await,
    }
}
