//! Wattnest - automation rule client

use anyhow::{anyhow, Context};
use automation_core::{AutomationFailure, AutomationRepository, SolarEvent};
use clap::{Parser, Subcommand};
use device_core::{toggle_call, DeviceCategory};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod drafts;
mod render;
mod transport;

use config::Config;
use transport::HttpTransport;

#[derive(Parser)]
#[command(name = "wattnest", version, about = "Author and simulate home automations")]
struct Cli {
    /// Backend API root, overrides WATTNEST_URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Bearer token, overrides WATTNEST_TOKEN
    #[arg(long, global = true)]
    token: Option<String>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List automations stored on the backend
    List,
    /// Submit a draft from a JSON file
    Create { draft: PathBuf },
    /// Dry-run a draft and report conflicts and suggestions
    Simulate {
        draft: PathBuf,
        /// Ask the backend to include its state matrix
        #[arg(long)]
        state_matrix: bool,
    },
    /// Show the service a toggle resolves to for a device category
    Resolve {
        category: String,
        /// The device is currently on
        #[arg(long, conflicts_with = "off")]
        on: bool,
        /// The device is currently off (default)
        #[arg(long)]
        off: bool,
    },
    /// Show the allowed solar offsets
    Offsets {
        #[arg(long, default_value = "sunset")]
        event: String,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "debug"
    } else {
        "wattnest=info,automation_core=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn repository(cli: &Cli, state_matrix: bool) -> anyhow::Result<AutomationRepository> {
    let config = Config::from_env()?.with_overrides(cli.url.as_deref(), cli.token.clone())?;
    tracing::debug!("Using backend at {}", config.base_url);

    let transport = HttpTransport::new(&config).context("Failed to build HTTP client")?;
    Ok(AutomationRepository::new(Arc::new(transport)).with_state_matrix(state_matrix))
}

fn failure(error: AutomationFailure) -> anyhow::Error {
    anyhow!(error.user_message())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Command::List => {
            let automations = repository(&cli, false)?.list().await.map_err(failure)?;
            print!("{}", render::automations(&automations));
        }
        Command::Create { draft } => {
            let draft = drafts::load_draft(draft).await?;
            let name = draft.name.clone();
            repository(&cli, false)?
                .create(draft)
                .await
                .map_err(failure)?;
            println!("Created '{name}'");
        }
        Command::Simulate {
            draft,
            state_matrix,
        } => {
            let draft = drafts::load_draft(draft).await?;
            let result = repository(&cli, *state_matrix)?
                .simulate(&draft)
                .await
                .map_err(failure)?;
            print!("{}", render::simulation(&result));
        }
        Command::Resolve { category, on, off: _ } => {
            let category: DeviceCategory = category.parse()?;
            let call = toggle_call(category, *on);
            let state = if *on { "on" } else { "off" };
            println!("{category} ({state}) -> {call}");
        }
        Command::Offsets { event } => {
            let event = SolarEvent::from_token(event)
                .ok_or_else(|| anyhow!("Unknown solar event '{event}', expected sunrise or sunset"))?;
            print!("{}", render::offsets(event));
        }
    }

    Ok(())
}
