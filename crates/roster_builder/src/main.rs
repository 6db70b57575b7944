//! Roster Builder CLI
//!
//! Validate roster CSVs, generate synthetic rosters and simulate matches.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use cricket_core::{
    generate_team, roster::MAX_GENERATED_ID_BASE, scoreboard::scorecards, MatchConfig,
    MatchRequest, MatchSession, Scoreboard, SessionAction, Team, TeamSide, SCHEMA_VERSION,
};
#[cfg(feature = "cli")]
use rand::SeedableRng;
#[cfg(feature = "cli")]
use rand_chacha::ChaCha8Rng;
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "roster_builder")]
#[command(about = "Import cricket rosters and simulate limited-overs matches", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Side {
    A,
    B,
}

#[cfg(feature = "cli")]
impl From<Side> for TeamSide {
    fn from(side: Side) -> Self {
        match side {
            Side::A => TeamSide::A,
            Side::B => TeamSide::B,
        }
    }
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Check that a roster CSV has the expected shape
    Validate {
        /// Roster CSV file path
        #[arg(long)]
        csv: PathBuf,
    },

    /// Write a roster with random attributes
    Generate {
        /// Team prefix, used in the team and player names
        #[arg(long)]
        prefix: String,

        /// Output CSV file path
        #[arg(long)]
        out: PathBuf,

        /// First player id
        #[arg(
            long,
            default_value_t = 1,
            value_parser = clap::value_parser!(u32).range(1..=MAX_GENERATED_ID_BASE as i64)
        )]
        id_base: u32,

        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play a full match with automatic player selection
    Simulate {
        /// Team A roster CSV (generated if omitted)
        #[arg(long)]
        team_a: Option<PathBuf>,

        /// Team B roster CSV (generated if omitted)
        #[arg(long)]
        team_b: Option<PathBuf>,

        /// RNG seed (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Overs per innings
        #[arg(long)]
        overs: Option<u32>,

        /// Overs cap per bowler
        #[arg(long)]
        max_overs_per_bowler: Option<u32>,

        /// Side that bats first
        #[arg(long, value_enum, default_value = "a")]
        bat_first: Side,

        /// Print the full match report as JSON
        #[arg(long)]
        json: bool,

        /// Ball-by-ball commentary and debug logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();

    let verbose = matches!(cli.command, Commands::Simulate { verbose: true, .. });
    let filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Validate { csv } => {
            let config = MatchConfig::from_env().context("Failed to load match config")?;
            let table = roster_builder::read_roster_csv(&csv)?;
            roster_builder::validate_shape(&csv, &table, config.players_per_side)?;
            println!("✅ {} is a valid roster", csv.display());
            println!("   Columns: {}", table.headers.len());
            println!("   Players: {}", table.rows.len());
        }

        Commands::Generate {
            prefix,
            out,
            id_base,
            seed,
        } => {
            let seed = seed.unwrap_or_else(rand::random);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let team = generate_team(&prefix, id_base, &mut rng);
            roster_builder::write_roster_csv(&team, &out)?;
            println!("🔨 Generated {} ({} players)", team.name, team.players.len());
            println!("   Output: {}", out.display());
            println!("   Seed:   {}", seed);
        }

        Commands::Simulate {
            team_a,
            team_b,
            seed,
            overs,
            max_overs_per_bowler,
            bat_first,
            json,
            verbose,
        } => {
            let mut config = MatchConfig::from_env().context("Failed to load match config")?;
            if let Some(overs) = overs {
                config.overs = overs;
                config.max_overs_per_bowler = config.max_overs_per_bowler.min(overs);
            }
            if let Some(cap) = max_overs_per_bowler {
                config.max_overs_per_bowler = cap;
            }
            config.validate().context("Invalid match settings")?;

            let seed = seed.unwrap_or_else(rand::random);
            let bat_first = TeamSide::from(bat_first);

            if json {
                simulate_json(config, seed, bat_first, team_a.as_deref(), team_b.as_deref())?;
            } else {
                simulate_text(config, seed, bat_first, team_a.as_deref(), team_b.as_deref(), verbose)?;
            }
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn roster_data(
    path: Option<&Path>,
    name: &str,
    min_rows: usize,
) -> Result<Option<cricket_core::api::RosterData>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let table = roster_builder::read_roster_csv(path)?;
    roster_builder::validate_shape(path, &table, min_rows)?;
    Ok(Some(table.into_roster_data(Some(name.to_string()))))
}

#[cfg(feature = "cli")]
fn simulate_json(
    config: MatchConfig,
    seed: u64,
    bat_first: TeamSide,
    team_a: Option<&Path>,
    team_b: Option<&Path>,
) -> Result<()> {
    let request = MatchRequest {
        schema_version: SCHEMA_VERSION,
        seed,
        overs: Some(config.overs),
        max_overs_per_bowler: Some(config.max_overs_per_bowler),
        bat_first,
        team_a: roster_data(team_a, "Team A", config.players_per_side)?,
        team_b: roster_data(team_b, "Team B", config.players_per_side)?,
    };
    let response = cricket_core::simulate_match(&request).context("Simulation failed")?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(feature = "cli")]
fn resolve_team(
    path: Option<&Path>,
    name: &str,
    prefix: &str,
    id_base: u32,
    min_rows: usize,
    rng: &mut ChaCha8Rng,
) -> Result<Team> {
    match path {
        Some(path) => Ok(roster_builder::load_team(name, path, min_rows)?),
        None => Ok(generate_team(prefix, id_base, rng)),
    }
}

#[cfg(feature = "cli")]
fn player_name(team: &Team, id: u32) -> &str {
    team.player(id).map(|p| p.name.as_str()).unwrap_or("?")
}

#[cfg(feature = "cli")]
fn simulate_text(
    config: MatchConfig,
    seed: u64,
    bat_first: TeamSide,
    team_a: Option<&Path>,
    team_b: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let min_rows = config.players_per_side;
    let team_a = resolve_team(team_a, "Team A", "A", 1, min_rows, &mut rng)?;
    let team_b = resolve_team(team_b, "Team B", "B", 100, min_rows, &mut rng)?;

    println!("🏏 {} vs {} ({} overs, seed {})", team_a.name, team_b.name, config.overs, seed);

    let mut session = MatchSession::new(config);
    session.load_teams(team_a, team_b)?;
    session.apply(SessionAction::SetBattingTeam(bat_first))?;

    while !session.state().is_match_completed {
        session.auto_select()?;
        session.simulate_delivery(&mut rng)?;

        let Some(event) = session.history().last() else {
            continue;
        };
        if verbose {
            let state = session.state();
            let (batting, bowling) = if state.team_a.name == event.batting_team {
                (&state.team_a, &state.team_b)
            } else {
                (&state.team_b, &state.team_a)
            };
            println!(
                "{:>5}  {} to {}: {}",
                event.ball,
                player_name(bowling, event.bowler_id),
                player_name(batting, event.striker_id),
                event.outcome.describe()
            );
        }

        if event.innings_completed {
            println!(
                "\nEnd of innings: {} {}/{}",
                event.batting_team, event.total_runs, event.wickets
            );
            if let Some(target) = session.state().target.filter(|_| !event.match_completed) {
                println!("Target: {}\n", target);
            }
        } else if event.over_completed {
            if let Some(board) = Scoreboard::from_match(session.state()) {
                println!("\n{}", board);
            }
        }
    }

    println!();
    for card in scorecards(session.state()) {
        println!("{}", card);
    }
    if let Some(result) = session.state().result_text() {
        println!("🏆 {}", result);
    }
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    std::process::exit(1);
}
