use clap::{Parser, Subcommand};
use std::error::Error;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use pokedex_arena::battle::engine::opening_event;
use pokedex_arena::battle::runner::BattleRunner;
use pokedex_arena::catalog::{self, CatalogKey, CatalogSource};
use pokedex_arena::compare::compare_by_key;
use pokedex_arena::config::{ArenaConfig, CatalogKind};
use pokedex_arena::dex::Dex;
use pokedex_arena::guess::{pick_creature_id, play_round, GuessGame, GuessStatus, RoundEnd};
use pokedex_arena::logging;
use pokedex_arena::mcp_interface::*;
use schema::CreatureType;

/// Upper bound on attacks in one CLI battle; real battles end long before.
const MAX_ATTACKS: usize = 10_000;

#[derive(Parser)]
#[command(version, about = "Browse, compare, guess and battle the first 151 creatures")]
struct Cli {
    /// Use the public REST API instead of the bundled catalog
    #[arg(long, global = true)]
    remote: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Battle two creatures until one faints
    Battle {
        first: String,
        second: String,
        /// Wait for Enter between attacks
        #[arg(long)]
        step: bool,
    },
    /// List the catalog, optionally filtered
    List {
        #[arg(short, long)]
        search: Option<String>,
        /// Only show creatures of this type (e.g. fire)
        #[arg(short = 't', long = "type")]
        type_filter: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Compare two creatures by base stat total
    Compare { first: String, second: String },
    /// Guess creatures against the clock
    Guess {
        #[arg(short, long, default_value_t = 5)]
        rounds: u32,
    },
    /// Show one creature's details, with lore and evolutions when remote
    Show { creature: String },
}

type CliResult = Result<(), Box<dyn Error>>;

#[tokio::main]
async fn main() -> CliResult {
    logging::init(tracing::Level::WARN);

    let cli = Cli::parse();
    let mut config = ArenaConfig::from_env();
    if cli.remote {
        config.catalog = CatalogKind::Remote;
    }
    let catalog = catalog::from_config(&config)?;

    match cli.command {
        Commands::Battle { first, second, step } => run_battle(catalog, &first, &second, step).await,
        Commands::List {
            search,
            type_filter,
            page,
        } => run_list(catalog.as_ref(), &config, search, type_filter, page).await,
        Commands::Compare { first, second } => {
            let comparison = compare_by_key(catalog.as_ref(), &first, &second).await?;
            print!("{}", display_comparison(&comparison));
            Ok(())
        }
        Commands::Guess { rounds } => run_guess(catalog.as_ref(), &config, rounds).await,
        Commands::Show { creature } => {
            let key = CatalogKey::parse(&creature).ok_or("creature name or number required")?;
            let record = catalog.fetch_record(&key).await?;
            let species = fetch_species_details(catalog.as_ref(), &record).await;
            print!("{}", display_creature_details(&record, species.as_ref()));
            Ok(())
        }
    }
}

async fn run_battle(catalog: Arc<dyn CatalogSource>, first: &str, second: &str, step: bool) -> CliResult {
    let mut runner = BattleRunner::new(catalog);
    let info = runner.select(first, second).await?;
    if let Some(event) = opening_event(runner.state()) {
        println!("{}\n", event);
    }
    print!("{}", display_battle_status(&info));

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut attacks = 0;
    while !runner.is_battle_ended() && attacks < MAX_ATTACKS {
        if step {
            println!("\n(press Enter to attack)");
            if stdin.next_line().await?.is_none() {
                break;
            }
        }
        let result = runner.attack()?;
        attacks += 1;
        print!("{}", format_attack_result(&result));
    }

    println!();
    print!("{}", get_battle_status_summary(&runner.battle_info()));
    Ok(())
}

async fn run_list(
    catalog: &dyn CatalogSource,
    config: &ArenaConfig,
    search: Option<String>,
    type_filter: Option<String>,
    page: usize,
) -> CliResult {
    let type_filter = match type_filter {
        Some(name) => match CreatureType::from_str(&name) {
            Ok(kind) => Some(kind),
            Err(_) => {
                print!("Unknown type '{}'. {}", name, get_available_types_display());
                return Ok(());
            }
        },
        None => None,
    };

    let records = catalog.fetch_all(usize::from(config.catalog_limit)).await?;
    let mut dex = Dex::new(records, config.page_size);
    if let Some(search) = search {
        dex.set_search(&search);
    }
    dex.set_type_filter(type_filter);
    dex.set_page(page);

    print!("{}", display_dex_page(&dex.current_page()));
    Ok(())
}

async fn run_guess(catalog: &dyn CatalogSource, config: &ArenaConfig, rounds: u32) -> CliResult {
    let entries = catalog.list(usize::from(config.catalog_limit)).await?;
    let mut game = GuessGame::new(config.guess_seconds);
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    for round in 1..=rounds {
        let id = pick_creature_id(&mut rand::rng(), &entries).ok_or("the catalog is empty")?;
        game.next_round(catalog, id).await?;

        println!("\nRound {}/{} - who's that creature?", round, rounds);
        if let Some(image) = game.image() {
            println!("{}", image);
        }
        println!("You have {} seconds.", game.seconds_left());

        if play_round(&mut game, &mut stdin, Duration::from_secs(1)).await? == RoundEnd::InputClosed {
            println!("\nNo more input. Final score: {}", game.score());
            return Ok(());
        }

        match game.status() {
            GuessStatus::Correct => println!("Correct!"),
            _ => println!(
                "Wrong! It was {}.",
                game.revealed_name().unwrap_or("unknown").to_uppercase()
            ),
        }
        println!("Score: {}", game.score());
    }
    Ok(())
}
