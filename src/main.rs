use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use fpl_picker::config::{load_config, validate_config, Config};
use fpl_picker::fetch::{fetch_and_score_players, PlayerPool};
use fpl_picker::fpl::{CacheConfig, FplClient, Position, ResponseCache};
use fpl_picker::optimize::{pick_team, Squad};
use fpl_picker::output;

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_INFEASIBLE: i32 = 3;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pick the best squad for the next gameweek (default if no subcommand)
    Pick,
    /// List eligible players ranked by predicted points
    Players {
        /// Only show one position (GK, DEF, MID, FWD)
        #[arg(short, long)]
        position: Option<Position>,

        /// Number of players to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Create a config file interactively
    Init,
    /// Delete cached API responses
    ClearCache,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum OutputFormat {
    #[default]
    Table,
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "fpl-picker")]
#[command(about = "Fantasy Premier League squad picker", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging and score breakdowns
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/fpl-picker/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Ignore cached API responses and don't store new ones
    #[arg(long, global = true)]
    no_cache: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Budget in millions, overriding the config
    #[arg(short, long, global = true)]
    budget: Option<f64>,

    /// Player who must be picked (repeatable)
    #[arg(long, global = true)]
    include: Vec<String>,

    /// Glob of player names to leave out (repeatable)
    #[arg(long, global = true)]
    exclude: Vec<String>,

    /// Also write the picked squad as JSON to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Fold command-line overrides into the loaded config
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(budget) = cli.budget {
        config.squad.budget = budget;
    }
    config.filters.include.extend(cli.include.iter().cloned());
    config.filters.exclude.extend(cli.exclude.iter().cloned());
}

fn load_validated_config(cli: &Cli) -> Config {
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let mut config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    apply_overrides(&mut config, cli);

    if let Err(errors) = validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }
    config
}

fn create_client(config: &Config, no_cache: bool) -> anyhow::Result<FplClient> {
    // Both durations were checked by validate_config
    let timeout = config.api.timeout_duration()?;
    let cache_config = CacheConfig {
        enabled: !no_cache,
        ttl: config.api.cache_ttl_duration()?,
    };
    debug!(
        cache = if cache_config.enabled { "enabled" } else { "disabled (--no-cache)" },
        "creating FPL client"
    );
    FplClient::new(
        &config.api.base_url,
        timeout,
        ResponseCache::from_config(&cache_config),
    )
}

async fn load_pool(config: &Config, no_cache: bool) -> PlayerPool {
    let client = match create_client(config, no_cache) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create FPL client: {:#}", e);
            std::process::exit(EXIT_NETWORK);
        }
    };

    match fetch_and_score_players(&client, config).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{:#}", e);
            eprintln!("Check your network connection, or retry later if the game is updating.");
            std::process::exit(EXIT_NETWORK);
        }
    }
}

fn print_gameweek(pool: &PlayerPool) {
    if let Some(gw) = &pool.target_gameweek {
        match gw.deadline_time {
            Some(deadline) => println!(
                "{} (deadline {})",
                gw.name,
                deadline.format("%a %d %b %H:%M UTC")
            ),
            None => println!("{}", gw.name),
        }
        println!();
    }
}

fn print_squad(squad: &Squad, pool: &PlayerPool, cli: &Cli) {
    let use_colors = output::should_use_colors();
    match cli.format {
        OutputFormat::Table => {
            print_gameweek(pool);
            println!("{}", output::format_squad(squad, use_colors));
            if cli.verbose {
                println!();
                for scored in squad.players() {
                    println!(
                        "  {} ({:.2} pts/90)",
                        scored.player.web_name,
                        scored.player.points_per_90()
                    );
                    println!("{}", output::format_breakdown(&scored.score.breakdown, use_colors));
                }
            }
        }
        OutputFormat::Tsv => println!("{}", output::format_squad_tsv(squad)),
        OutputFormat::Json => match output::format_squad_json(squad) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        },
    }
}

fn print_players(pool: &PlayerPool, position: Option<Position>, limit: usize, cli: &Cli) {
    let shown: Vec<_> = pool
        .players
        .iter()
        .filter(|p| position.map_or(true, |pos| p.player.position == pos))
        .take(limit)
        .cloned()
        .collect();

    let use_colors = output::should_use_colors();
    match cli.format {
        OutputFormat::Table => {
            print_gameweek(pool);
            let table = output::format_player_table(&shown, use_colors);
            if cli.verbose && !shown.is_empty() {
                for (line, scored) in table.lines().zip(&shown) {
                    println!("{}", line);
                    println!("{}", output::format_breakdown(&scored.score.breakdown, use_colors));
                }
            } else {
                println!("{}", table);
            }
        }
        OutputFormat::Tsv => println!("{}", output::format_players_tsv(&shown)),
        OutputFormat::Json => match output::format_players_json(&shown) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        },
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+).
    // An error only means one is already installed.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let cli = Cli::parse();
    fpl_picker::logging::init_logging(cli.verbose);
    let start_time = Instant::now();

    match cli.command.as_ref().unwrap_or(&Commands::Pick) {
        Commands::Init => {
            if let Err(e) = fpl_picker::config::run_init_wizard(cli.config.as_ref().map(PathBuf::from)) {
                eprintln!("Init failed: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
        Commands::ClearCache => match fpl_picker::fpl::clear_cache() {
            Ok(()) => println!("Cache cleared"),
            Err(e) => {
                eprintln!("Failed to clear cache: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        },
        Commands::Players { position, limit } => {
            let config = load_validated_config(&cli);
            let pool = load_pool(&config, cli.no_cache).await;
            print_players(&pool, *position, *limit, &cli);
        }
        Commands::Pick => {
            let config = load_validated_config(&cli);
            let pool = load_pool(&config, cli.no_cache).await;

            let squad = match pick_team(&pool.players, &config.squad, &config.filters.include) {
                Ok(squad) => squad,
                Err(e) => {
                    eprintln!("No squad: {}", e);
                    std::process::exit(EXIT_INFEASIBLE);
                }
            };

            print_squad(&squad, &pool, &cli);

            if let Some(path) = &cli.output {
                if let Err(e) = output::write_squad_json(path, &squad) {
                    eprintln!("{:#}", e);
                    std::process::exit(EXIT_FAILURE);
                }
                info!("wrote squad to {}", path.display());
            }
        }
    }

    info!(elapsed = ?start_time.elapsed(), "done");
    std::process::exit(EXIT_SUCCESS);
}
