//! Whole games through `GameRunner`, and batches of them.

use std::io::{self, Cursor, Write};
use std::sync::{Arc, Mutex};

use flip_seven::batch::{run_batch, run_parallel, BatchSummary};
use flip_seven::core::{Action, GameConfig, Observation, PlayerId};
use flip_seven::display::TextDisplay;
use flip_seven::events::{GameEvent, NullSink, RecordingSink};
use flip_seven::rules::{Flip7Builder, GameResult, RulesEngine};
use flip_seven::runner::{AbortFlag, GameRunner, RunError};
use flip_seven::strategy::{DisplayStrategy, HumanStrategy, RandomStrategy, Strategy, ThresholdStrategy};

fn bots(thresholds: &[f64]) -> Vec<Box<dyn Strategy>> {
    thresholds
        .iter()
        .map(|&t| Box::new(ThresholdStrategy::new(t)) as Box<dyn Strategy>)
        .collect()
}

fn bot_table(seed: u64) -> Result<GameRunner, RunError> {
    let (game, state) = Flip7Builder::new()
        .players(["cautious", "bold", "reckless"])
        .config(GameConfig::default().with_seed(seed).with_max_score(80))
        .sink(Arc::new(NullSink))
        .build()?;
    GameRunner::new(game, state, bots(&[0.1, 0.3, 0.5]))
}

/// Writer that can still be read after the runner takes ownership.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Aborts the game after a fixed number of decisions.
struct Impatient {
    left: usize,
    abort: AbortFlag,
}

impl Strategy for Impatient {
    fn choose_action(&mut self, _obs: &Observation, legal: &[Action]) -> Option<Action> {
        if self.left == 0 {
            self.abort.abort();
            return None;
        }
        self.left -= 1;
        legal.first().cloned()
    }
}

/// Bots play a full game; the round log agrees with the final scores.
#[test]
fn test_bot_game_runs_to_completion() {
    let mut runner = bot_table(17).unwrap();
    let summary = runner.run().unwrap();

    assert!(!summary.aborted);
    assert!(runner.state().game_over);
    assert_eq!(summary.rounds as usize, runner.rounds().len());

    let last = runner.rounds().last().unwrap();
    assert!(last.game_over);
    for (id, score) in summary.scores.iter() {
        assert_eq!(last.totals[id], *score);
        let banked: u32 = runner.rounds().iter().map(|r| r.hand_scores[id]).sum();
        assert_eq!(banked, *score);
    }

    let winner = summary.winner.as_deref().unwrap();
    let best = summary.scores.values().max().copied().unwrap();
    assert!(best >= 80);
    match runner.game().is_terminal(runner.state()).unwrap() {
        GameResult::Winner(id) => assert_eq!(summary.names[id], winner),
        GameResult::Winners(ids) => assert_eq!(summary.names[ids[0]], winner),
    }
}

/// Round starters rotate through the seats.
#[test]
fn test_rounds_rotate_starter() {
    let sink = Arc::new(RecordingSink::new(10_000));
    let (game, state) = Flip7Builder::new()
        .players(["A", "B", "C"])
        .config(GameConfig::default().with_seed(3).with_max_score(100))
        .sink(sink.clone())
        .build()
        .unwrap();
    let mut runner = GameRunner::new(game, state, bots(&[0.2, 0.2, 0.2])).unwrap();
    runner.run().unwrap();

    let starters: Vec<(u32, PlayerId)> = sink
        .events()
        .iter()
        .filter_map(|event| match event {
            GameEvent::RoundStarted { round, starter } => Some((*round, starter.id)),
            _ => None,
        })
        .collect();
    assert!(starters.len() >= 2);
    for (round, starter) in starters {
        assert_eq!(starter.index(), (round as usize - 1) % 3);
    }
}

/// A human seat reads keys; running out of input abandons the game.
#[test]
fn test_human_seat_from_script() {
    let abort = AbortFlag::new();
    let human = HumanStrategy::new(Cursor::new("x\np\n".to_string()), Vec::new(), abort.clone());
    let (game, state) = Flip7Builder::new()
        .players(["You", "Bot"])
        .config(GameConfig::default().with_seed(21))
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();
    let strategies: Vec<Box<dyn Strategy>> = vec![Box::new(human), Box::new(ThresholdStrategy::default())];

    let mut runner = GameRunner::new(game, state, strategies).unwrap().with_abort(abort);
    let summary = runner.run().unwrap();

    assert_eq!(runner.state().history()[0].action, Action::pass(PlayerId::new(0)));
    if summary.aborted {
        assert!(summary.winner.is_none());
    } else {
        assert_eq!(summary.winner.as_deref(), Some("Bot"));
    }
}

/// A strategy can stop the run through the shared flag.
#[test]
fn test_abort_mid_game() {
    let abort = AbortFlag::new();
    let (game, state) = Flip7Builder::new()
        .players(["A", "B"])
        .config(GameConfig::default().with_seed(6))
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();
    let strategies: Vec<Box<dyn Strategy>> = (0..2)
        .map(|_| {
            Box::new(Impatient {
                left: 3,
                abort: abort.clone(),
            }) as Box<dyn Strategy>
        })
        .collect();

    let mut runner = GameRunner::new(game, state, strategies).unwrap().with_abort(abort);
    let summary = runner.run().unwrap();

    assert!(summary.aborted);
    assert!(summary.winner.is_none());
    assert!(runner.state().history().len() <= 6);
    assert!(!runner.state().game_over);
}

/// The watcher shows each decision before the wrapped bot makes it.
#[test]
fn test_display_strategy_renders_each_decision() {
    let screen = SharedBuffer::default();
    let (game, state) = Flip7Builder::new()
        .players(["Watched", "Other"])
        .config(GameConfig::default().with_seed(12).with_max_score(40))
        .sink(Arc::new(NullSink))
        .build()
        .unwrap();
    let strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(DisplayStrategy::new(RandomStrategy::new(2), TextDisplay::new(), screen.clone())),
        Box::new(RandomStrategy::new(3)),
    ];

    let mut runner = GameRunner::new(game, state, strategies).unwrap();
    runner.run().unwrap();

    let text = screen.text();
    assert!(text.contains("Round 1"));
    assert!(text.contains("Acting: Watched"));
    assert!(!text.contains("Acting: Other"));
}

/// Every game of a batch is counted and has a winner.
#[test]
fn test_batch_counts_games() {
    let summary = run_batch(20, 100, &bot_table).unwrap();

    assert_eq!(summary.games, 20);
    assert_eq!(summary.wins.values().sum::<u64>(), 20);
    assert!(summary.wins.keys().all(|name| ["cautious", "bold", "reckless"].contains(&name.as_str())));
}

/// Splitting a run across batches and threads does not change the tally.
#[test]
fn test_parallel_matches_sequential() {
    let sequential = run_batch(30, 7, &bot_table).unwrap();
    let parallel = run_parallel(30, 4, 7, &bot_table, |_, _| {}).unwrap();
    let single = run_parallel(30, 1000, 7, &bot_table, |_, _| {}).unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential, single);
}

/// Progress reaches the total exactly once all batches are in.
#[test]
fn test_parallel_progress() {
    let seen = Mutex::new(Vec::new());
    let summary = run_parallel(10, 3, 0, &bot_table, |done, total| {
        seen.lock().unwrap().push((done, total));
    })
    .unwrap();

    let seen = seen.into_inner().unwrap();
    assert_eq!(summary.games, 10);
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|&(_, total)| total == 10));
    assert_eq!(seen.iter().map(|&(done, _)| done).max(), Some(10));
}

/// A factory failure stops the run and is reported.
#[test]
fn test_factory_error_propagates() {
    let broken = |_seed: u64| -> Result<GameRunner, RunError> {
        let (game, state) = Flip7Builder::new().players(Vec::<String>::new()).build()?;
        GameRunner::new(game, state, Vec::new())
    };

    assert!(matches!(run_batch(3, 0, &broken), Err(RunError::Config(_))));
    assert!(run_parallel(3, 1, 0, &broken, |_, _| {}).is_err());
    assert_eq!(run_batch(0, 0, &broken).unwrap(), BatchSummary::default());
}

/// Tallies serialize for the `--json` report.
#[test]
fn test_batch_summary_json() {
    let mut summary = BatchSummary::default();
    summary.record(Some("bold"));
    summary.record(None);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["games"], 2);
    assert_eq!(json["wins"]["bold"], 1);
}
