//! Binary entrypoint for the travelnet operator CLI.
//!
//! Commands:
//! - `start` - register every configured planet, run the shuttle schedule until Ctrl-C
//! - `init` - write a starter `config.toml`
//! - `points --planet <name>` - print the travel point list response for a planet as JSON
//!
//! The binary runs the travel service standalone, against the in-memory world in
//! `travelnet::world`.
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::sync::Arc;

use travelnet::config::{Config, ConfigPointLoader};
use travelnet::travel::{Point3D, TravelCollaborators, TravelService};
use travelnet::world::{
    Creature, MemoryInventory, MemoryObjectFactory, RecordingNotifier, RecordingSimulation,
    StaticPlanetCatalog,
};

#[derive(Parser)]
#[command(name = "travelnet")]
#[command(about = "Fast-travel network for a multiplayer galaxy")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Load travel points and run the shuttle schedule
    Start,
    /// Write a default configuration file
    Init,
    /// Print the travel point list for a planet
    Points {
        /// Planet name as listed in the catalog (e.g. tatooine)
        #[arg(short, long)]
        planet: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            init_logging(&None, cli.verbose);
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
        Commands::Start => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);
            info!("Starting travelnet v{}", env!("CARGO_PKG_VERSION"));

            let mut service = build_service(&config);
            service.load_travel_points();
            let schedule = service.start_shuttle_schedule();

            tokio::signal::ctrl_c().await?;
            info!("Shutdown requested");
            if let Some(stats) = schedule.snapshot().await {
                info!(
                    "Shuttle schedule ran {} ticks ({} departures, {} arrivals)",
                    stats.ticks, stats.departures, stats.arrivals
                );
            }
            service.shutdown().await;
        }
        Commands::Points { planet } => {
            let config = Config::load(&cli.config).await?;
            init_logging(&Some(config.clone()), cli.verbose);

            let service = build_service(&config);
            service.load_travel_points();
            let home = config
                .planet_list()
                .into_iter()
                .find(|p| p.name == planet.to_lowercase())
                .ok_or_else(|| anyhow!("planet '{}' is not in the catalog", planet))?;
            let viewer = Creature::new(0, home, Point3D::default());
            let response = service
                .handle_point_list_request(Some(&viewer), &planet.to_lowercase())
                .ok_or_else(|| anyhow!("no travel points registered for '{}'", planet))?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

fn build_service(config: &Config) -> TravelService {
    let factory = Arc::new(MemoryObjectFactory::default());
    let collab = TravelCollaborators {
        catalog: Arc::new(StaticPlanetCatalog::new(config.planet_list())),
        factory: factory.clone(),
        inventory: Arc::new(MemoryInventory::new()),
        notifier: Arc::new(RecordingNotifier::new()),
        simulation: Arc::new(RecordingSimulation::new()),
        loader: Some(Arc::new(ConfigPointLoader::new(config, factory))),
    };
    TravelService::new(collab, config.travel.settings())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    use std::io::Write;
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|c| c.logging.level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|c| c.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let file = std::sync::Mutex::new(f);
        // Mirror to the console only when attached to a terminal
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            writeln!(fmt, "{} [{}] {}", ts, record.level(), record.args())
        });
    }
    let _ = builder.try_init();
}
