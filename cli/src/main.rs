use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use sapper_core::{
    CellCount, Coord, GameConfig, GameError, GameSession, LeaderboardEntry, LevelPreset, Muted,
    SessionState, SoundCue, SoundPlayer, format_duration,
};

use script::{Move, parse_script};
use store::{LeaderboardStore, StoreError};

mod script;
mod store;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Leaderboard file, defaults to the platform data directory
    #[arg(long, global = true)]
    leaderboard: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a session from a move script and print the outcome
    Play(PlayArgs),
    /// Inspect or edit the leaderboard
    #[command(subcommand)]
    Leaderboard(LeaderboardCommand),
    /// List the level presets
    Levels,
}

#[derive(Args, Debug)]
struct PlayArgs {
    /// Level preset: easy, medium, hard, time-challenge or expert
    #[arg(short, long, default_value = "easy", conflicts_with = "board")]
    level: LevelPreset,

    /// Custom board as ROWS COLS MINES instead of a preset
    #[arg(long, num_args = 3, value_names = ["ROWS", "COLS", "MINES"])]
    board: Option<Vec<u32>>,

    /// Time limit in seconds for a custom board
    #[arg(long, requires = "board")]
    time_limit: Option<u32>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Move script, one `reveal R C`, `flag R C` or `tick S` per line; `-` reads stdin
    #[arg(short, long, default_value = "-")]
    moves: PathBuf,

    /// Record the result on the leaderboard under this name
    #[arg(short, long, value_parser = parse_player_name)]
    name: Option<String>,

    /// Ring the terminal bell on explosions and wins
    #[arg(long)]
    bell: bool,
}

#[derive(Subcommand, Debug)]
enum LeaderboardCommand {
    /// Print the ranked entries
    Show,
    /// Record an entry by hand
    Add {
        #[arg(value_parser = parse_player_name)]
        name: String,
        score: u32,
        /// Level label, e.g. "Time Challenge"
        level: String,
        /// Duration in seconds
        duration: u32,
    },
    /// Remove every entry
    Clear,
}

fn parse_player_name(raw: &str) -> Result<String, String> {
    let name = raw.trim();
    if name.is_empty() {
        Err("player name must not be empty".to_string())
    } else {
        Ok(name.to_string())
    }
}

impl PlayArgs {
    fn config(&self) -> anyhow::Result<(GameConfig, String)> {
        let Some(board) = &self.board else {
            return Ok((self.level.config(), self.level.label().to_string()));
        };
        let &[rows, cols, mines] = board.as_slice() else {
            anyhow::bail!("--board takes exactly ROWS COLS MINES");
        };
        let rows = Coord::try_from(rows).context("too many rows")?;
        let cols = Coord::try_from(cols).context("too many columns")?;
        let mut config = GameConfig::new(rows, cols, mines as CellCount)?;
        if let Some(limit) = self.time_limit {
            config = config.with_time_limit(limit);
        }
        Ok((config, "Custom".to_string()))
    }

    fn read_moves(&self) -> anyhow::Result<String> {
        if self.moves.as_os_str() == "-" {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read moves from stdin")?;
            Ok(text)
        } else {
            std::fs::read_to_string(&self.moves)
                .with_context(|| format!("Failed to read moves from {}", self.moves.display()))
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.verbose.log_level_filter())
        .init();

    let store = LeaderboardStore::new(match cli.leaderboard {
        Some(path) => path,
        None => LeaderboardStore::default_path()?,
    });
    log::debug!("leaderboard: {}", store.path().display());

    match cli.command {
        Command::Play(args) => play(&args, &store),
        Command::Leaderboard(LeaderboardCommand::Show) => {
            print_leaderboard(&store);
            Ok(())
        }
        Command::Leaderboard(LeaderboardCommand::Add {
            name,
            score,
            level,
            duration,
        }) => {
            let (_, rank) = store.add(LeaderboardEntry::new(name, score, level, duration))?;
            report_rank(rank);
            Ok(())
        }
        Command::Leaderboard(LeaderboardCommand::Clear) => {
            store.clear()?;
            println!("Leaderboard cleared.");
            Ok(())
        }
        Command::Levels => {
            for level in LevelPreset::ALL {
                let config = level.config();
                let limit = config
                    .time_limit()
                    .map_or_else(|| "none".to_string(), format_duration);
                println!(
                    "{:<15} {:>2}x{:<2} {:>3} mines  limit: {}",
                    level.label(),
                    config.rows(),
                    config.cols(),
                    config.mines(),
                    limit
                );
            }
            Ok(())
        }
    }
}

fn play(args: &PlayArgs, store: &LeaderboardStore) -> anyhow::Result<()> {
    let (config, level_label) = args.config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {}", seed);

    let moves = parse_script(&args.read_moves()?)?;
    let mut session = GameSession::with_seed(config, seed)?;
    let mut player: Box<dyn SoundPlayer> = if args.bell {
        Box::new(|cue: SoundCue| {
            if cue != SoundCue::Click {
                eprint!("\x07");
            }
        })
    } else {
        Box::new(Muted)
    };

    apply_moves(&mut session, &moves, player.as_mut())?;

    let status = match session.state() {
        SessionState::Active => "in progress",
        SessionState::Won => "won",
        SessionState::Lost => "lost",
        SessionState::TimedOut => "time's up",
    };
    println!("Level: {} (seed {})", level_label, seed);
    println!("Result: {}", status);
    println!("Score: {}", session.score());
    println!("Flags left: {}", session.flags_remaining());
    println!("Time: {}", format_duration(session.elapsed_secs()));

    if let Some(name) = &args.name {
        if let Some(rank) = record_outcome(&session, name, &level_label, store)? {
            report_rank(rank);
        }
    }
    Ok(())
}

/// Plays `moves` in order until the session ends, returns how many were applied.
///
/// Moves that fall off the board are logged and skipped.
fn apply_moves(
    session: &mut GameSession,
    moves: &[(usize, Move)],
    player: &mut dyn SoundPlayer,
) -> anyhow::Result<usize> {
    let mut applied = 0;
    for &(line, next) in moves {
        if session.is_game_over() {
            log::info!("Session over, ignoring moves from line {}", line);
            break;
        }
        let result = match next {
            Move::Reveal(coords) => session.reveal(coords),
            Move::Flag(coords) => session.toggle_flag(coords),
            Move::Tick(seconds) => Ok(session.tick(seconds)),
        };
        match result {
            Ok(event) => {
                log::debug!("line {}: {:?} -> {:?}", line, next, event);
                player.play_for(event);
                applied += 1;
            }
            Err(err @ GameError::OutOfBounds(_)) => log::warn!("line {}: {}", line, err),
            Err(err) => return Err(err).with_context(|| format!("line {}", line)),
        }
    }
    Ok(applied)
}

/// Adds a finished session to the leaderboard.
///
/// Returns `None` when the session is still active and nothing was written,
/// otherwise the rank the entry reached.
fn record_outcome(
    session: &GameSession,
    name: &str,
    level: &str,
    store: &LeaderboardStore,
) -> Result<Option<Option<usize>>, StoreError> {
    let Some(entry) = session.leaderboard_entry(name, level) else {
        log::warn!("Session still in progress, nothing recorded");
        return Ok(None);
    };
    let (_, rank) = store.add(entry)?;
    Ok(Some(rank))
}

fn print_leaderboard(store: &LeaderboardStore) {
    let leaderboard = store.load();
    println!("Leaderboard (Top 10 Scores):");
    if leaderboard.is_empty() {
        println!("No scores yet.");
        return;
    }
    for (rank, entry) in leaderboard.entries().iter().enumerate() {
        println!(
            "{}. {} - {} points - Level: {} - Time: {}",
            rank + 1,
            entry.name,
            entry.score,
            entry.level,
            format_duration(entry.duration)
        );
    }
}

fn report_rank(rank: Option<usize>) {
    match rank {
        Some(rank) => println!("Recorded at rank {}.", rank + 1),
        None => println!("Score did not make the top 10."),
    }
}
