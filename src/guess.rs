//! "Who's that creature?" guessing game.
//!
//! The game is an externally clocked state machine: the host calls `tick`
//! once per second and forwards the player's answers to `submit`.

use crate::catalog::{CatalogKey, CatalogSource};
use crate::errors::{ArenaResult, GuessError};
use rand::seq::IndexedRandom;
use rand::Rng;
use schema::{CatalogEntry, CreatureRecord};
use serde::Serialize;
use std::time::Duration;
use tokio::io::{AsyncBufRead, Lines};
use tracing::debug;

pub const DEFAULT_GUESS_SECONDS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GuessStatus {
    Guessing,
    Correct,
    Wrong,
}

#[derive(Debug, Clone)]
pub struct GuessGame {
    countdown: u32,
    answer: Option<CreatureRecord>,
    status: GuessStatus,
    seconds_left: u32,
    score: u32,
}

/// How a round handed back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundEnd {
    /// Answered or timed out; the status says which.
    Decided,
    /// The player's input ended while the round was still open.
    InputClosed,
}

/// Draw the dex number of one listed entry. `None` for an empty listing.
pub fn pick_creature_id<R: Rng + ?Sized>(rng: &mut R, entries: &[CatalogEntry]) -> Option<u16> {
    entries.choose(rng).map(|entry| entry.id)
}

/// Feed answer lines and clock ticks to `game` until the round is decided or
/// the input ends. Blank lines are ignored.
pub async fn play_round<R>(
    game: &mut GuessGame,
    lines: &mut Lines<R>,
    tick: Duration,
) -> std::io::Result<RoundEnd>
where
    R: AsyncBufRead + Unpin,
{
    if game.answer.is_none() {
        return Ok(RoundEnd::Decided);
    }

    let mut clock = tokio::time::interval(tick);
    // The first tick of an interval completes immediately.
    clock.tick().await;

    while game.status() == GuessStatus::Guessing {
        tokio::select! {
            _ = clock.tick() => {
                game.tick();
            }
            line = lines.next_line() => {
                match line? {
                    Some(guess) => {
                        if let Err(err) = game.submit(&guess) {
                            debug!(%err, "guess ignored");
                        }
                    }
                    None => return Ok(RoundEnd::InputClosed),
                }
            }
        }
    }
    Ok(RoundEnd::Decided)
}

impl GuessGame {
    pub fn new(countdown: u32) -> Self {
        Self {
            countdown: countdown.max(1),
            answer: None,
            status: GuessStatus::Guessing,
            seconds_left: 0,
            score: 0,
        }
    }

    /// Begin a round with `answer` as the creature to guess. The score carries over.
    pub fn start_round(&mut self, answer: CreatureRecord) {
        debug!(id = answer.id, "new guessing round");
        self.answer = Some(answer);
        self.status = GuessStatus::Guessing;
        self.seconds_left = self.countdown;
    }

    /// Fetch creature `id` from the catalog and start a round with it.
    pub async fn next_round(&mut self, catalog: &dyn CatalogSource, id: u16) -> ArenaResult<()> {
        let record = catalog.fetch_record(&CatalogKey::Id(id)).await?;
        self.start_round(record);
        Ok(())
    }

    /// Check an answer: trimmed and case-insensitive.
    ///
    /// A correct answer scores a point and stops the clock. A wrong one stops
    /// the clock too, but the player may keep trying until they get it.
    pub fn submit(&mut self, guess: &str) -> Result<GuessStatus, GuessError> {
        let answer = self.answer.as_ref().ok_or(GuessError::NoRoundInProgress)?;
        if self.status == GuessStatus::Correct {
            return Err(GuessError::AlreadySolved);
        }
        let guess = guess.trim();
        if guess.is_empty() {
            return Err(GuessError::EmptyGuess);
        }

        if guess.eq_ignore_ascii_case(&answer.name) {
            self.status = GuessStatus::Correct;
            self.score += 1;
        } else {
            self.status = GuessStatus::Wrong;
        }
        Ok(self.status)
    }

    /// Advance the countdown by one second. Only runs while guessing; reaching
    /// zero marks the round as wrong.
    pub fn tick(&mut self) -> GuessStatus {
        if self.answer.is_some() && self.status == GuessStatus::Guessing {
            self.seconds_left = self.seconds_left.saturating_sub(1);
            if self.seconds_left == 0 {
                self.status = GuessStatus::Wrong;
            }
        }
        self.status
    }

    pub fn status(&self) -> GuessStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn seconds_left(&self) -> u32 {
        self.seconds_left
    }

    pub fn image(&self) -> Option<&str> {
        self.answer.as_ref().map(|a| a.image.as_str())
    }

    /// The answer, once the round is no longer being guessed.
    pub fn revealed_name(&self) -> Option<&str> {
        match self.status {
            GuessStatus::Guessing => None,
            _ => self.answer.as_ref().map(|a| a.name.as_str()),
        }
    }
}

impl Default for GuessGame {
    fn default() -> Self {
        Self::new(DEFAULT_GUESS_SECONDS)
    }
}
