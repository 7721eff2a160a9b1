//! Rig Advisor
//!
//! Finds CPU/GPU bottlenecks in a PC build for a set of games and recommends
//! upgrades within a budget.

mod analysis;
mod benchmarks;
mod bottleneck;
mod candidates;
mod catalog;
mod config;
mod constants;
mod db;
mod engine;
mod error;
#[cfg(test)]
mod fixtures;
mod fps;
mod hardware;
mod matcher;
mod models;
mod optimizer;
mod recommendations;
mod report;
mod sample;
mod store;

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::EngineConfig;
use crate::constants::DEFAULT_QUERY_TIMEOUT_SECS;
use crate::db::SqliteStore;
use crate::error::StoreError;
use crate::matcher::ComponentMatcher;
use crate::models::{
    parse_psu_wattage, BuildData, ComponentKind, RamConfig, Resolution, StorageType,
};
use crate::store::{ComponentStore, SharedStore};

#[derive(Parser)]
#[command(name = "rig-advisor")]
#[command(about = "PC bottleneck analysis and upgrade recommendations")]
struct Cli {
    /// Path to the SQLite database
    #[arg(short, long, env = "RIG_ADVISOR_DB", default_value = "rig_advisor.db", global = true)]
    database: PathBuf,

    /// Seconds before a store query counts as failed
    #[arg(long, env = "RIG_ADVISOR_TIMEOUT_SECS", default_value_t = DEFAULT_QUERY_TIMEOUT_SECS, global = true)]
    timeout_secs: u64,

    /// Year used to compute component ages (defaults to the current year)
    #[arg(long, env = "RIG_ADVISOR_YEAR", global = true)]
    year: Option<i32>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize empty database with schema
    Init,

    /// Load the built-in sample catalog
    LoadSample,

    /// Import catalog JSON files from a directory
    Import {
        /// Directory containing *.json catalog files
        dir: PathBuf,

        /// Clear existing catalog before importing
        #[arg(long)]
        clear: bool,
    },

    /// List components in the database
    ListComponents {
        /// Only list one kind (cpu, gpu, ram, storage, psu)
        #[arg(short, long)]
        kind: Option<ComponentKind>,
    },

    /// List all games in the database
    ListGames,

    /// Find the catalog component best matching a free-text name
    Match {
        kind: ComponentKind,
        name: String,
    },

    /// Analyze a build and recommend upgrades
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Read the build from a JSON file instead of flags
    #[arg(long, conflicts_with_all = ["cpu", "gpu", "ram", "storage", "psu", "games", "budget", "resolution"])]
    build: Option<PathBuf>,

    /// CPU id or name
    #[arg(long, required_unless_present = "build")]
    cpu: Option<String>,

    /// GPU id or name
    #[arg(long, required_unless_present = "build")]
    gpu: Option<String>,

    /// Installed memory as ddrN-GB (e.g. ddr4-16)
    #[arg(long, default_value = "ddr4-16")]
    ram: RamConfig,

    /// nvme, sata-ssd or hdd
    #[arg(long, default_value = "sata-ssd")]
    storage: StorageType,

    /// PSU rating, e.g. 650W
    #[arg(long, default_value = "650", value_parser = parse_psu_wattage)]
    psu: u32,

    /// Comma-separated game ids
    #[arg(long, value_delimiter = ',')]
    games: Vec<String>,

    /// Upgrade budget in dollars
    #[arg(long, default_value_t = 500.0)]
    budget: f64,

    /// 1080p, 1440p or 4k
    #[arg(long, default_value = "1440p")]
    resolution: Resolution,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

impl AnalyzeArgs {
    fn into_build(self) -> Result<BuildData> {
        if let Some(path) = &self.build {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let build: BuildData = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            return Ok(build);
        }

        let (Some(cpu), Some(gpu)) = (self.cpu, self.gpu) else {
            bail!("--cpu and --gpu are required without --build");
        };
        Ok(BuildData {
            cpu,
            gpu,
            ram: self.ram,
            storage: self.storage,
            psu_watts: self.psu,
            games: self.games,
            budget: self.budget,
            resolution: self.resolution,
        })
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    let directive = if verbose { "rig_advisor=debug" } else { "rig_advisor=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Resolve a user-supplied CPU/GPU reference to a catalog id
///
/// Ids are used as-is; anything else is matched by name. A reference that
/// cannot be resolved, including one the store failed to look up, is passed
/// through so the analysis records it.
fn resolve_component_id(store: &dyn ComponentStore, matcher: &ComponentMatcher, kind: ComponentKind, query: &str) -> String {
    match store.get_component(kind, query) {
        Ok(component) => return component.id,
        Err(StoreError::NotFound { .. }) => {}
        Err(e) => {
            warn!(query, error = %e, "{} lookup failed before analysis", kind.label());
            return query.to_string();
        }
    }

    let catalog = match store.list_components(kind) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!(query, error = %e, "could not list {}s to match by name", kind.label());
            return query.to_string();
        }
    };
    match matcher.best_match(query, &catalog) {
        Some(hit) => {
            info!(
                query,
                id = %hit.component.id,
                confidence = hit.confidence,
                "resolved {} by name",
                kind.label()
            );
            hit.component.id.clone()
        }
        None => {
            warn!(query, "no {} matches this name", kind.label());
            query.to_string()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = EngineConfig::default()
        .with_timeout_secs(cli.timeout_secs)
        .with_year(cli.year);
    let store = Arc::new(
        SqliteStore::open(&cli.database, config.query_timeout)
            .with_context(|| format!("Failed to open {}", cli.database.display()))?,
    );

    match cli.command {
        Commands::Init => {
            println!("Database initialized at: {}", cli.database.display());
        }

        Commands::LoadSample => {
            sample::load_sample_data(&*store.connection()?)?;
            println!("Sample data loaded successfully!");
        }

        Commands::Import { dir, clear } => {
            let conn = store.connection()?;
            if clear {
                println!("Clearing existing catalog...");
                db::clear_catalog(&conn)?;
            }

            let stats = catalog::import_catalog(&conn, &dir)?;
            println!("{}", stats);
        }

        Commands::ListComponents { kind } => {
            let kinds = match kind {
                Some(kind) => vec![kind],
                None => ComponentKind::ALL.to_vec(),
            };

            let mut any = false;
            for kind in kinds {
                let components = store.list_components(kind)?;
                if components.is_empty() {
                    continue;
                }
                any = true;
                println!("{}:", kind.label());
                println!("  {:<16} {:<36} {:>6} {:>9}", "ID", "Name", "Year", "Score");
                for c in components {
                    let year = c.release_year.map_or_else(|| "-".to_string(), |y| y.to_string());
                    println!(
                        "  {:<16} {:<36} {:>6} {:>9}",
                        c.id,
                        c.display_name(),
                        year,
                        c.benchmark_score
                    );
                }
                println!();
            }
            if !any {
                println!("No components in database. Run 'import' or 'load-sample' first.");
            }
        }

        Commands::ListGames => {
            let games = db::list_games(&*store.connection()?)?;
            if games.is_empty() {
                println!("No games in database. Run 'import' or 'load-sample' first.");
            } else {
                println!("{:<20} {:<30} {:>7} {:>7} {:>7}", "ID", "Game", "CPU", "GPU", "RAM");
                println!("{}", "-".repeat(75));
                for g in games {
                    let (cpu, gpu) = match g.weights {
                        Some(w) => (format!("{:.2}", w.cpu), format!("{:.2}", w.gpu)),
                        None => ("-".to_string(), "-".to_string()),
                    };
                    println!(
                        "{:<20} {:<30} {:>7} {:>7} {:>5}GB",
                        g.id, g.name, cpu, gpu, g.ram_requirement_gb
                    );
                }
            }
        }

        Commands::Match { kind, name } => {
            let matcher = ComponentMatcher::new()?;
            let catalog = store.list_components(kind)?;
            match matcher.best_match(&name, &catalog) {
                Some(hit) => println!(
                    "{} -> {} ({}), confidence {:.2}",
                    name,
                    hit.component.display_name(),
                    hit.component.id,
                    hit.confidence
                ),
                None => println!("No {} matches '{}'", kind.label(), name),
            }
        }

        Commands::Analyze(args) => {
            let json = args.json;
            let mut build = args.into_build()?;
            build.validate()?;

            let matcher = ComponentMatcher::new()?;
            build.cpu = resolve_component_id(store.as_ref(), &matcher, ComponentKind::Cpu, &build.cpu);
            build.gpu = resolve_component_id(store.as_ref(), &matcher, ComponentKind::Gpu, &build.gpu);

            let shared: SharedStore = store;
            let report = engine::analyze_build(&shared, &config, &build);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report);
            }
        }
    }

    Ok(())
}
