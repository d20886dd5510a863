//! Game events and the sinks that receive them.
//!
//! The engine reports what happens (draws, busts, effects, scoring) as
//! `GameEvent`s pushed into an `EventSink` handed to it at construction.
//! Front-ends choose the sink: `LogSink` for the `log` facade,
//! `RecordingSink` to keep events for a display panel or a test,
//! `NullSink` for silent batch runs.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::PlayerId;

/// A seat as it appears in an event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub id: PlayerId,
    pub name: String,
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Something that happened at the table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { round: u32, starter: Seat },
    /// `bust_odds` is the estimate just before the draw.
    Drew { who: Seat, card: Card, forced: bool, bust_odds: f64 },
    SecondChanceUsed { who: Seat, card: Card },
    Busted { who: Seat, card: Card },
    FlippedSeven { who: Seat },
    Passed { who: Seat },
    EffectQueued { who: Seat, card: Card },
    EffectPending { owner: Seat, card: Card },
    Frozen { target: Seat, by: Seat },
    FlipThree { target: Seat, by: Seat },
    FlipThreeSurvived { target: Seat },
    RoundOverFor { who: Seat },
    RoundScored { round: u32, scores: Vec<(Seat, u32, u32)> },
    GameOver { winner: Seat, score: u32 },
}

impl GameEvent {
    /// Round and game level events, as opposed to per-draw chatter.
    #[must_use]
    pub fn is_milestone(&self) -> bool {
        matches!(
            self,
            GameEvent::RoundStarted { .. } | GameEvent::RoundScored { .. } | GameEvent::GameOver { .. }
        )
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::RoundStarted { round, starter } => {
                write!(f, "Starting round {round}, {starter} begins")
            }
            GameEvent::Drew { who, card, forced, bust_odds } => {
                let how = if *forced { "is forced to flip" } else { "flips" };
                write!(f, "{who} {how} {card} (bust {:.0}%)", bust_odds * 100.0)
            }
            GameEvent::SecondChanceUsed { who, card } => {
                write!(f, "{who} matched {card} and lost their second chance")
            }
            GameEvent::Busted { who, card } => write!(f, "Match! {who} busts on {card}"),
            GameEvent::FlippedSeven { who } => write!(f, "{who} flipped 7!"),
            GameEvent::Passed { who } => write!(f, "{who} passes"),
            GameEvent::EffectQueued { who, card } => write!(f, "{who} queues {card}"),
            GameEvent::EffectPending { owner, card } => {
                write!(f, "Resolving {card}: {owner} chooses a player")
            }
            GameEvent::Frozen { target, by } => write!(f, "{by} freezes {target}"),
            GameEvent::FlipThree { target, by } => {
                write!(f, "{by} makes {target} flip three cards")
            }
            GameEvent::FlipThreeSurvived { target } => {
                write!(f, "{target} survived the flip three!")
            }
            GameEvent::RoundOverFor { who } => write!(f, "The round is over for {who}"),
            GameEvent::RoundScored { round, scores } => {
                write!(f, "Round {round} scores:")?;
                for (seat, hand, total) in scores {
                    write!(f, " {seat} +{hand} = {total};")?;
                }
                Ok(())
            }
            GameEvent::GameOver { winner, score } => {
                write!(f, "The game is over! {winner} won with {score}")
            }
        }
    }
}

/// Receiver for engine events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &GameEvent);
}

/// Drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &GameEvent) {}
}

/// Forwards events to the `log` facade.
///
/// Milestones go to `info`, individual draws and effects to `debug`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &GameEvent) {
        if event.is_milestone() {
            log::info!("{event}");
        } else {
            log::debug!("{event}");
        }
    }
}

/// Keeps events in memory, bounded to the most recent `capacity`.
#[derive(Debug)]
pub struct RecordingSink {
    events: Mutex<Vec<GameEvent>>,
    capacity: usize,
}

impl RecordingSink {
    /// Keep at most `capacity` events, oldest dropped first.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            capacity,
        }
    }

    /// Copy of the recorded events, oldest first.
    #[must_use]
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().map(|events| events.clone()).unwrap_or_default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<GameEvent> {
        self.events
            .lock()
            .map(|mut events| std::mem::take(&mut *events))
            .unwrap_or_default()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new(200)
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &GameEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
            if events.len() > self.capacity {
                let excess = events.len() - self.capacity;
                events.drain(..excess);
            }
        }
    }
}
