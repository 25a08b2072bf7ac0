use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use launch_registry::catalog::{FileTargetCatalog, FixedTargetCatalog};
use launch_registry::config::{ConfigLoader, ResolvedConfig};
use launch_registry::domain::{FlightNumber, ScheduleRequest};
use launch_registry::error::RegistryError;
use launch_registry::feed::SpacexHttpClient;
use launch_registry::importer::FeedImporter;
use launch_registry::output::{AbortResult, JsonOutput, SyncResult};
use launch_registry::registry::LaunchRegistry;
use launch_registry::store::LaunchStore;

#[derive(Parser)]
#[command(name = "launchreg")]
#[command(about = "Space-mission launch registry")]
#[command(version, author)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "List all launch records")]
    List,
    #[command(about = "Schedule a new launch against a catalog target")]
    Schedule(ScheduleArgs),
    #[command(about = "Abort a launch by flight number")]
    Abort(AbortArgs),
    #[command(about = "Bootstrap-sync launch records from the remote feed")]
    Sync,
}

#[derive(Args)]
struct ScheduleArgs {
    #[arg(long)]
    mission: String,

    #[arg(long)]
    rocket: String,

    #[arg(long)]
    launch_date: String,

    #[arg(long)]
    target: String,
}

#[derive(Args)]
struct AbortArgs {
    flight_number: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(report) = run().await {
        eprintln!("{report:?}");
        if let Some(registry) = report.downcast_ref::<RegistryError>() {
            return ExitCode::from(map_exit_code(registry));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &RegistryError) -> u8 {
    match error {
        RegistryError::LaunchNotFound(_)
        | RegistryError::InvalidTarget(_)
        | RegistryError::InvalidFlightNumber(_)
        | RegistryError::InvalidLaunchDate(_) => 2,
        RegistryError::FeedHttp(_)
        | RegistryError::FeedStatus { .. }
        | RegistryError::Store(_)
        | RegistryError::Catalog(_) => 3,
        _ => 1,
    }
}

async fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::resolve(cli.config.as_deref()).into_diagnostic()?;
    let store = LaunchStore::open(config.data_dir.clone())
        .await
        .into_diagnostic()?;

    match cli.command {
        Commands::List => {
            let registry = LaunchRegistry::new(store, FixedTargetCatalog::default());
            let launches = registry.get_launches().await;
            JsonOutput::print_launches(&launches).into_diagnostic()?;
            Ok(())
        }
        Commands::Schedule(args) => {
            let catalog = FileTargetCatalog::load(&config.targets_file)
                .await
                .into_diagnostic()?;
            let registry = LaunchRegistry::new(store, catalog);
            let launch = registry
                .schedule_new_launch(ScheduleRequest {
                    mission: args.mission,
                    rocket: args.rocket,
                    launch_date: args.launch_date,
                    target: args.target,
                })
                .await
                .into_diagnostic()?;
            JsonOutput::print_launch(&launch).into_diagnostic()?;
            Ok(())
        }
        Commands::Abort(args) => {
            let flight_number = args
                .flight_number
                .parse::<FlightNumber>()
                .into_diagnostic()?;
            let registry = LaunchRegistry::new(store, FixedTargetCatalog::default());
            registry
                .abort_launch_by_id(flight_number)
                .await
                .into_diagnostic()?;
            JsonOutput::print_abort(&AbortResult {
                flight_number: flight_number.as_u32(),
                aborted: true,
            })
            .into_diagnostic()?;
            Ok(())
        }
        Commands::Sync => {
            run_sync(store, &config).await
        }
    }
}

async fn run_sync(store: LaunchStore, config: &ResolvedConfig) -> miette::Result<()> {
    let feed =
        SpacexHttpClient::with_config(&config.feed_url, config.feed_timeout).into_diagnostic()?;
    let importer = FeedImporter::new(store, feed);
    let imported = importer.load_launch_data().await.into_diagnostic()?;
    JsonOutput::print_sync(&SyncResult { imported }).into_diagnostic()?;
    Ok(())
}
