use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use coup_engine::{sim, Coup, PlayerId, Rules};

/// Plays random games of Coup and prints one CSV row per game.
#[derive(Parser, Debug)]
#[command(name = "coup-engine", version)]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Seats per game (2 to 6).
    #[arg(long, default_value_t = 4)]
    players: usize,

    /// Seed of the first game; game `n` uses `seed + n`.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// JSON file overriding the default rules.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Give up on a game after this many commands.
    #[arg(long, default_value_t = 10_000)]
    max_commands: usize,
}

#[derive(Serialize)]
struct GameRow {
    game: usize,
    seed: u64,
    players: usize,
    winner: Option<u32>,
    turns: usize,
    commands: usize,
    log_entries: usize,
}

fn load_rules(path: Option<&PathBuf>) -> anyhow::Result<Rules> {
    let Some(path) = path else {
        return Ok(Rules::default());
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading rules from {}", path.display()))?;
    Rules::from_json(&json).with_context(|| format!("parsing rules from {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let rules = load_rules(args.rules.as_ref())?;
    let mut writer = csv::Writer::from_writer(std::io::stdout());

    for game_idx in 0..args.games {
        let seed = args.seed.wrapping_add(game_idx as u64);
        let mut rng = Pcg64::seed_from_u64(seed);

        let seats = (0..args.players)
            .map(|idx| (PlayerId(idx as u32), format!("Player {idx}")))
            .collect();
        let game = Coup::initialize(format!("sim-{game_idx}"), seats, PlayerId(0), rules.clone(), &mut rng)?;

        let playout = sim::play_random(game, &mut rng, args.max_commands);
        if playout.game.winner_id().is_none() {
            tracing::warn!(game = game_idx, seed, max_commands = args.max_commands, "game did not finish\n{}", playout.game);
        }

        writer.serialize(GameRow {
            game: game_idx,
            seed,
            players: args.players,
            winner: playout.game.winner_id().map(|id| id.0),
            turns: playout.game.turn(),
            commands: playout.commands,
            log_entries: playout.game.logs().len(),
        })?;
    }

    writer.flush()?;
    Ok(())
}
