use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;

use flip_seven::batch::run_parallel;
use flip_seven::core::{ConfigError, GameConfig};
use flip_seven::display::TextDisplay;
use flip_seven::events::{NullSink, RecordingSink};
use flip_seven::rules::{Flip7Builder, DEFAULT_ROSTER};
use flip_seven::runner::{AbortFlag, GameRunner, RunError};
use flip_seven::strategy::{DisplayStrategy, HumanStrategy, Strategy, ThresholdStrategy};

#[derive(Parser)]
#[command(name = "flip7", about = "Play or simulate the Flip Seven card game")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play at the terminal
    Play(PlayArgs),
    /// Pit threshold bots against each other over many games
    Simulate(SimulateArgs),
}

#[derive(Args)]
struct PlayArgs {
    /// Player names in turn order (default: Elias Eloise Jules Mina Theo)
    names: Vec<String>,

    /// Seat played by the threshold bot; repeat for several
    #[arg(long = "bot", value_name = "NAME")]
    bots: Vec<String>,

    /// Bots play every seat
    #[arg(long)]
    watch: bool,

    /// Bust estimate above which bots pass
    #[arg(long, default_value_t = 0.25)]
    bot_risk: f64,

    /// Pause after rendering a bot's turn, in milliseconds
    #[arg(long, default_value_t = 600)]
    delay_ms: u64,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    max_score: Option<u32>,

    /// Show everyone's hand
    #[arg(long)]
    open_hands: bool,
}

#[derive(Args)]
struct SimulateArgs {
    #[arg(long, default_value_t = 10_000)]
    games: u64,

    /// Games per worker task
    #[arg(long, default_value_t = 100)]
    batch_size: u64,

    /// Game i is seeded with seed + i
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// One bot seat per bust threshold
    #[arg(long, value_delimiter = ',', default_values_t = vec![0.1, 0.2, 0.3, 0.4])]
    thresholds: Vec<f64>,

    /// JSON game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the tally as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("--bot {0} does not name a seat")]
    UnknownBot(String),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Play(args) => play(args),
        Command::Simulate(args) => simulate(args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<GameConfig, ConfigError> {
    match path {
        Some(path) => GameConfig::from_json_file(path),
        None => Ok(GameConfig::default()),
    }
}

fn play(args: PlayArgs) -> Result<(), CliError> {
    let mut config = load_config(args.config.as_deref())?;
    if args.open_hands {
        config = config.with_open_hands(true);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(max_score) = args.max_score {
        config = config.with_max_score(max_score);
    }

    let names: Vec<String> = if args.names.is_empty() {
        DEFAULT_ROSTER.iter().map(|name| name.to_string()).collect()
    } else {
        args.names
    };
    if let Some(unknown) = args.bots.iter().find(|bot| !names.contains(bot)) {
        return Err(CliError::UnknownBot(unknown.clone()));
    }

    let log = Arc::new(RecordingSink::new(200));
    let (game, state) = Flip7Builder::new()
        .players(names.iter().cloned())
        .config(config)
        .sink(log.clone())
        .build()?;

    let abort = AbortFlag::new();
    let display = TextDisplay::new().with_log(log.clone(), 8);
    let delay = Duration::from_millis(args.delay_ms);
    let strategies: Vec<Box<dyn Strategy>> = names
        .iter()
        .map(|name| -> Box<dyn Strategy> {
            if args.watch || args.bots.contains(name) {
                let bot = ThresholdStrategy::new(args.bot_risk);
                Box::new(DisplayStrategy::new(bot, display.clone(), io::stdout()).with_delay(delay))
            } else {
                Box::new(HumanStrategy::stdio(abort.clone()).with_display(display.clone()))
            }
        })
        .collect();

    let mut runner = GameRunner::new(game, state, strategies)?.with_abort(abort);
    let summary = runner.run()?;

    let events = log.take();
    println!();
    for event in &events[events.len().saturating_sub(6)..] {
        println!("  {event}");
    }
    println!();
    for (id, name) in summary.names.iter() {
        println!("{name:<12} {:>5}", summary.scores[id]);
    }
    match summary.winner {
        Some(winner) => println!("\n{winner} won after {} rounds", summary.rounds),
        None => println!("\nGame abandoned"),
    }
    Ok(())
}

fn simulate(args: SimulateArgs) -> Result<(), CliError> {
    let config = load_config(args.config.as_deref())?.with_probabilities(true);
    let names = bot_names(&args.thresholds);
    log::info!("simulating {} games between {}", args.games, names.join(", "));

    let factory = |seed: u64| -> Result<GameRunner, RunError> {
        let (game, state) = Flip7Builder::new()
            .players(names.iter().cloned())
            .config(config.clone().with_seed(seed))
            .sink(Arc::new(NullSink))
            .build()?;
        let strategies: Vec<Box<dyn Strategy>> = args
            .thresholds
            .iter()
            .map(|&t| Box::new(ThresholdStrategy::new(t)) as Box<dyn Strategy>)
            .collect();
        GameRunner::new(game, state, strategies)
    };

    let bar = ProgressBar::new(args.games);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} games {percent}% ({eta})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    let summary = run_parallel(args.games, args.batch_size, args.seed, &factory, |done, _| {
        bar.set_position(done);
    })?;
    bar.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} games", summary.games);
    for (name, wins) in summary.ranking() {
        println!("{name:<20} {wins:>8} {:>7.2}%", summary.win_rate(&name) * 100.0);
    }
    Ok(())
}

/// One seat name per threshold. Repeated thresholds get their seat number so
/// their wins are tallied apart.
fn bot_names(thresholds: &[f64]) -> Vec<String> {
    thresholds
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let repeated = thresholds.iter().filter(|&&other| other == *t).count() > 1;
            if repeated {
                format!("threshold-{t}#{}", i + 1)
            } else {
                format!("threshold-{t}")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bot_names_are_unique() {
        assert_eq!(bot_names(&[0.1, 0.3]), vec!["threshold-0.1", "threshold-0.3"]);
        assert_eq!(
            bot_names(&[0.2, 0.4, 0.2]),
            vec!["threshold-0.2#1", "threshold-0.4", "threshold-0.2#3"]
        );
    }

    #[test]
    fn test_repeated_thresholds_tally_apart() {
        let config = GameConfig::default().with_max_score(60);
        let names = bot_names(&[0.2, 0.2]);
        let factory = |seed: u64| -> Result<GameRunner, RunError> {
            let (game, state) = Flip7Builder::new()
                .players(names.iter().cloned())
                .config(config.clone().with_seed(seed))
                .sink(Arc::new(NullSink))
                .build()?;
            let strategies: Vec<Box<dyn Strategy>> =
                vec![Box::new(ThresholdStrategy::new(0.2)), Box::new(ThresholdStrategy::new(0.2))];
            GameRunner::new(game, state, strategies)
        };

        let summary = run_parallel(40, 10, 1, &factory, |_, _| {}).unwrap();
        assert_eq!(summary.wins.values().sum::<u64>(), 40);
        assert!(summary.wins.keys().all(|name| names.contains(name)));
    }
}
