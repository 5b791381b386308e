use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use athis_core::app::{AppBuilder, AthisApi, ListQuery};
use athis_core::config::AthisConfig;
use athis_core::domain::{
    AthisError, DemandKind, DemandStatus, ErrorClass, GeoPoint, NewDemand, Requester,
};
use athis_core::observability::init_logging;
use clap::{Parser, Subcommand};
use serde::Serialize;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "athis.toml";

#[derive(Parser)]
#[command(name = "athis")]
#[command(about = "Housing-assistance demands and intervention area planning")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new demand (starts as pending)
    Create {
        /// land_regularization | housing_improvement
        #[arg(long)]
        kind: DemandKind,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        #[arg(long, default_value = "")]
        description: String,
        /// Street address, free text
        #[arg(long, default_value = "")]
        address: String,
    },
    /// List demands, optionally filtered by status
    List {
        #[arg(long)]
        status: Option<DemandStatus>,
        #[arg(long)]
        newest_first: bool,
    },
    /// Show one demand
    Get { id: String },
    /// Move a demand to a new status
    SetStatus { id: String, status: DemandStatus },
    /// Areas ordered by priority, most urgent first
    RankAreas,
    /// Route between two "lat,lng" points through GraphHopper
    PlanRoute {
        #[arg(long, allow_hyphen_values = true)]
        from: GeoPoint,
        #[arg(long, allow_hyphen_values = true)]
        to: GeoPoint,
    },
    /// Demand counters per status and kind
    Stats,
    /// Demands located inside an area
    AreaDemands { area_id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(exit_status(&err))
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    init_logging(&config.logging, args.verbose)?;
    tracing::debug!(backend = ?config.storage.backend, "configuration loaded");

    let mut builder = AppBuilder::from_config(&config)?;
    // only route planning needs the api key
    if matches!(args.command, Command::PlanRoute { .. }) {
        builder = builder.graphhopper(&config)?;
    }
    let api = builder.build()?;

    execute(&api, args.command).await
}

fn load_config(path: Option<&Path>) -> Result<AthisConfig> {
    match path {
        Some(path) => AthisConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None if Path::new(DEFAULT_CONFIG).exists() => {
            AthisConfig::from_file(DEFAULT_CONFIG).context("loading athis.toml")
        }
        None => Ok(AthisConfig::from_env()),
    }
}

async fn execute(api: &AthisApi, command: Command) -> Result<()> {
    match command {
        Command::Create {
            kind,
            name,
            phone,
            email,
            lat,
            lng,
            description,
            address,
        } => {
            let demand = api
                .create_demand(NewDemand {
                    kind,
                    description,
                    address,
                    location: GeoPoint::new(lat, lng),
                    requester: Requester { name, phone, email },
                })
                .await?;
            print_json(&demand)
        }
        Command::List {
            status,
            newest_first,
        } => {
            let mut query = ListQuery {
                status,
                ..ListQuery::default()
            };
            if newest_first {
                query = query.newest_first();
            }
            print_json(&api.list_demands_with(query).await?)
        }
        Command::Get { id } => print_json(&api.get_demand(&id).await?),
        Command::SetStatus { id, status } => {
            print_json(&api.set_demand_status(&id, status).await?)
        }
        Command::RankAreas => print_json(&api.rank_areas()),
        Command::PlanRoute { from, to } => print_json(&api.plan_route(from, to).await?),
        Command::Stats => print_json(&api.demand_stats().await?),
        Command::AreaDemands { area_id } => print_json(&api.demands_in_area(&area_id).await?),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{out}");
    Ok(())
}

/// 2: the caller's input was wrong. 3: try again later or fix the setup.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AthisError>().map(AthisError::class) {
        Some(ErrorClass::InvalidInput | ErrorClass::NotFound | ErrorClass::Conflict) => 2,
        Some(ErrorClass::Unavailable | ErrorClass::Fatal) | None => 3,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn code(err: anyhow::Error) -> u8 {
        exit_status(&err)
    }

    #[rstest::rstest]
    #[case::validation(AthisError::validation("requester name is required"))]
    #[case::not_found(AthisError::not_found("demand", "demand-x"))]
    #[case::invalid_transition(AthisError::InvalidTransition {
        from: DemandStatus::Approved,
        to: DemandStatus::Pending,
    })]
    #[case::invalid_request(AthisError::invalid_request("lat out of range"))]
    fn input_errors_exit_with_2(#[case] err: AthisError) {
        assert_eq!(code(err.into()), 2);
    }

    #[rstest::rstest]
    #[case::routing_unavailable(AthisError::routing_unavailable("503"))]
    #[case::storage(AthisError::storage("disk full"))]
    #[case::configuration(AthisError::configuration("routing api key is not set"))]
    fn outages_and_setup_errors_exit_with_3(#[case] err: AthisError) {
        assert_eq!(code(err.into()), 3);
    }

    #[test]
    fn context_wrapped_errors_keep_their_class() {
        let err = anyhow::Error::from(AthisError::not_found("area", "atlantis"))
            .context("running area-demands");
        assert_eq!(code(err), 2);

        let missing = load_config(Some(Path::new("/definitely/not/here/athis.toml")))
            .unwrap_err();
        assert_eq!(code(missing), 3);
    }

    #[test]
    fn foreign_errors_exit_with_3() {
        assert_eq!(code(anyhow!("serializing output")), 3);
    }

    #[test]
    fn create_accepts_address_and_negative_coordinates() {
        let args = Args::try_parse_from([
            "athis",
            "create",
            "--kind",
            "land_regularization",
            "--name",
            "Maria Silva",
            "--lat",
            "-19.7492",
            "--lng",
            "-47.9292",
            "--address",
            "Rua das Flores, 123 - Centro",
        ])
        .unwrap();
        match args.command {
            Command::Create {
                address, lat, lng, ..
            } => {
                assert_eq!(address, "Rua das Flores, 123 - Centro");
                assert_eq!((lat, lng), (-19.7492, -47.9292));
            }
            _ => panic!("expected create"),
        }
    }
}
