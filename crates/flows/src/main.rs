mod commands;
mod output;

use clap::{Parser, Subcommand};
use flows_core::{Poller, cancellation};
use flows_provider::FlowsProvider;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flows")]
#[command(about = "Confirm, wait for and inspect Flows control plane entities", long_about = None)]
struct Cli {
    /// API endpoint (e.g. useflows.eu)
    #[arg(long, global = true, env = "FLOWS_ENDPOINT")]
    endpoint: Option<String>,
    /// API token
    #[arg(long, global = true, env = "FLOWS_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Entity lifecycle commands
    #[command(subcommand)]
    Entity(EntityCommands),
    /// App installation commands
    #[command(subcommand)]
    AppInstallation(AppInstallationCommands),
    /// Resolve an app version id
    AppVersion {
        /// App name
        name: String,
        /// App version (latest when omitted)
        #[arg(long)]
        version: Option<String>,
        /// Registry to look the app up in
        #[arg(long)]
        registry: Option<String>,
        /// Look up a custom app
        #[arg(long)]
        custom: bool,
    },
    /// Flow commands
    #[command(subcommand)]
    Flow(FlowCommands),
    /// Show version information
    Version,
}

#[derive(Subcommand)]
enum EntityCommands {
    /// Show the lifecycle status
    Status {
        /// Entity ID
        id: String,
    },
    /// Confirm a draft entity and wait until it is ready
    Confirm {
        /// Entity ID
        id: String,
        /// Return right after confirming
        #[arg(long)]
        no_wait: bool,
    },
}

#[derive(Subcommand)]
enum AppInstallationCommands {
    /// Show the installation status
    Status {
        /// App installation ID
        id: String,
    },
    /// Confirm a draft installation and wait until it is ready
    Confirm {
        /// App installation ID
        id: String,
        /// Return right after confirming
        #[arg(long)]
        no_wait: bool,
    },
    /// Wait until the installation is ready, without confirming
    Wait {
        /// App installation ID
        id: String,
    },
    /// Delete the installation and wait until it is gone
    Delete {
        /// App installation ID
        id: String,
    },
}

#[derive(Subcommand)]
enum FlowCommands {
    /// Show what applying a definition would change
    Plan {
        /// Flow ID
        flow_id: String,
        /// Definition file
        definition: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // No configuration needed
    if matches!(cli.command, Commands::Version) {
        println!("flows {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let provider = match FlowsProvider::configure(env!("CARGO_PKG_VERSION"), cli.endpoint, cli.token)
    {
        Ok(provider) => provider,
        Err(diagnostics) => {
            output::print_diagnostics(&diagnostics);
            anyhow::bail!("provider configuration failed");
        }
    };

    let (cancel, signal) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling");
            cancel.cancel();
        }
    });
    let provider = provider.with_poller(Poller::new().with_cancel(signal));

    match cli.command {
        Commands::Entity(command) => match command {
            EntityCommands::Status { id } => commands::entity::status(&provider, &id).await,
            EntityCommands::Confirm { id, no_wait } => {
                commands::entity::confirm(&provider, &id, !no_wait).await
            }
        },
        Commands::AppInstallation(command) => match command {
            AppInstallationCommands::Status { id } => {
                commands::app_installation::status(&provider, &id).await
            }
            AppInstallationCommands::Confirm { id, no_wait } => {
                commands::app_installation::confirm(&provider, &id, !no_wait).await
            }
            AppInstallationCommands::Wait { id } => {
                commands::app_installation::wait(&provider, &id).await
            }
            AppInstallationCommands::Delete { id } => {
                commands::app_installation::delete(&provider, &id).await
            }
        },
        Commands::AppVersion {
            name,
            version,
            registry,
            custom,
        } => commands::app_version::handle(&provider, name, version, registry, custom).await,
        Commands::Flow(FlowCommands::Plan {
            flow_id,
            definition,
        }) => commands::flow::plan(&provider, &flow_id, &definition).await,
        Commands::Version => Ok(()),
    }
}
