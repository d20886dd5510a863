//! Many games, one tally.
//!
//! Every game is independent: the factory builds a fresh runner from a seed,
//! game `i` of a run always gets `base_seed + i`, and batch results combine
//! with [`BatchSummary::merge`]. Runs are reproducible for a given seed
//! whatever the batch size or thread count.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::runner::{GameRunner, RunError};

/// Games played and wins per name.
///
/// `merge` is commutative and associative with `Default` as identity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub games: u64,
    pub wins: FxHashMap<String, u64>,
}

impl BatchSummary {
    /// Count one finished game.
    pub fn record(&mut self, winner: Option<&str>) {
        self.games += 1;
        if let Some(name) = winner {
            *self.wins.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    #[must_use]
    pub fn merge(mut self, other: BatchSummary) -> BatchSummary {
        self.games += other.games;
        for (name, count) in other.wins {
            *self.wins.entry(name).or_insert(0) += count;
        }
        self
    }

    #[must_use]
    pub fn win_rate(&self, name: &str) -> f64 {
        if self.games == 0 {
            return 0.0;
        }
        self.wins.get(name).copied().unwrap_or(0) as f64 / self.games as f64
    }

    /// Names by descending wins, then by name.
    #[must_use]
    pub fn ranking(&self) -> Vec<(String, u64)> {
        let mut ranking: Vec<(String, u64)> = self.wins.iter().map(|(k, v)| (k.clone(), *v)).collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranking
    }
}

/// Play `games` games in this thread. Game `i` is built from `base_seed + i`.
pub fn run_batch<F>(games: u64, base_seed: u64, factory: &F) -> Result<BatchSummary, RunError>
where
    F: Fn(u64) -> Result<GameRunner, RunError>,
{
    let mut summary = BatchSummary::default();
    for i in 0..games {
        let mut runner = factory(base_seed.wrapping_add(i))?;
        let result = runner.run()?;
        summary.record(result.winner.as_deref());
    }
    Ok(summary)
}

/// Split `games` into batches of `batch_size` and play them on the rayon pool.
///
/// `progress(done, total)` is called as each batch completes.
pub fn run_parallel<F, P>(
    games: u64,
    batch_size: u64,
    base_seed: u64,
    factory: &F,
    progress: P,
) -> Result<BatchSummary, RunError>
where
    F: Fn(u64) -> Result<GameRunner, RunError> + Sync,
    P: Fn(u64, u64) + Sync,
{
    let batch_size = batch_size.max(1);
    let batches: Vec<(u64, u64)> = (0..games)
        .step_by(batch_size as usize)
        .map(|start| (start, batch_size.min(games - start)))
        .collect();
    log::debug!("{games} games in {} batches", batches.len());

    let completed = AtomicU64::new(0);
    let results: Vec<BatchSummary> = batches
        .par_iter()
        .map(|&(start, len)| {
            let summary = run_batch(len, base_seed.wrapping_add(start), factory)?;
            let done = completed.fetch_add(len, Ordering::Relaxed) + len;
            progress(done, games);
            Ok(summary)
        })
        .collect::<Result<_, RunError>>()?;

    Ok(results.into_iter().fold(BatchSummary::default(), BatchSummary::merge))
}
