// chatline — A terminal chat client with scroll-aware typewriter replies
// Copyright (C) 2025  Simon Peter Rothgang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Typewriter reveal of bot replies.
//!
//! A reply is disclosed in roughly [`REVEAL_STEPS`] ticks regardless of its
//! length, so every reply takes about the same wall time to appear. Ticks are
//! scheduled on a [`Timer`] and carry the generation of the session that
//! scheduled them; a tick whose generation is no longer current is dropped.

use super::log::BubbleId;
use super::timer::Timer;
use crate::markup::{self, Markup};
use std::time::{Duration, Instant};

pub const REVEAL_STEPS: usize = 800;

/// Identity of one reveal session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Generation(u64);

#[must_use]
pub fn chunk_size(len: usize) -> usize {
    (len / REVEAL_STEPS).max(1)
}

#[derive(Debug)]
pub struct RevealSession {
    generation: Generation,
    full_text: String,
    /// Length of `full_text` in chars.
    total: usize,
    revealed: usize,
    chunk: usize,
    target: BubbleId,
}

impl RevealSession {
    fn new(generation: Generation, target: BubbleId, full_text: String) -> Self {
        let total = full_text.chars().count();
        Self { generation, chunk: chunk_size(total), total, revealed: 0, full_text, target }
    }

    #[must_use]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[must_use]
    pub fn target(&self) -> BubbleId {
        self.target
    }

    #[must_use]
    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    #[must_use]
    pub fn revealed(&self) -> usize {
        self.revealed
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.revealed == self.total
    }

    fn advance(&mut self) {
        self.revealed = (self.revealed + self.chunk).min(self.total);
    }

    #[must_use]
    pub fn prefix(&self) -> &str {
        let end = self
            .full_text
            .char_indices()
            .nth(self.revealed)
            .map_or(self.full_text.len(), |(idx, _)| idx);
        &self.full_text[..end]
    }
}

/// Outcome of one tick, for the caller to write into the log.
#[derive(Debug, PartialEq, Eq)]
pub struct RevealStep {
    pub generation: Generation,
    pub target: BubbleId,
    pub content: Markup,
    pub finished: bool,
}

#[derive(Debug)]
pub struct Typewriter {
    active: Option<RevealSession>,
    tick: Timer,
    /// Generation the armed tick belongs to.
    scheduled: Option<Generation>,
    next_generation: u64,
    interval: Duration,
}

impl Typewriter {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { active: None, tick: Timer::default(), scheduled: None, next_generation: 0, interval }
    }

    #[must_use]
    pub fn active(&self) -> Option<&RevealSession> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.tick.deadline()
    }

    /// Begin revealing `text` into `target`. The first tick is due at `now`.
    ///
    /// Returns the new generation and the session it superseded, if any; the
    /// caller decides what to leave in the superseded bubble.
    pub fn start(
        &mut self,
        target: BubbleId,
        text: impl Into<String>,
        now: Instant,
    ) -> (Generation, Option<RevealSession>) {
        let generation = Generation(self.next_generation);
        self.next_generation += 1;

        let superseded = self.active.replace(RevealSession::new(generation, target, text.into()));
        if let Some(old) = &superseded {
            tracing::debug!(
                old = ?old.generation,
                new = ?generation,
                revealed = old.revealed,
                total = old.total,
                "reveal superseded"
            );
        }
        self.schedule(generation, now, Duration::ZERO);
        (generation, superseded)
    }

    /// Stop the active session without completing it.
    pub fn cancel(&mut self) -> Option<RevealSession> {
        self.tick.cancel();
        self.scheduled = None;
        self.active.take()
    }

    /// Run the scheduled tick if it is due.
    pub fn poll(&mut self, now: Instant) -> Option<RevealStep> {
        if !self.tick.fire(now) {
            return None;
        }
        let generation = self.scheduled.take()?;
        let step = self.on_tick(generation)?;
        if !step.finished {
            self.schedule(generation, now, self.interval);
        }
        Some(step)
    }

    /// Advance the session identified by `generation` by one chunk.
    /// Stale generations are ignored.
    pub fn on_tick(&mut self, generation: Generation) -> Option<RevealStep> {
        let Some(session) = self.active.as_mut() else {
            tracing::debug!(?generation, "tick with no active reveal");
            return None;
        };
        if session.generation != generation {
            tracing::debug!(
                stale = ?generation,
                current = ?session.generation,
                "dropping stale reveal tick"
            );
            return None;
        }

        session.advance();
        let content = markup::render(session.prefix());
        let target = session.target;
        let finished = session.is_complete();
        if finished {
            tracing::debug!(?generation, chars = session.total, "reveal finished");
            self.active = None;
        }
        Some(RevealStep { generation, target, content, finished })
    }

    fn schedule(&mut self, generation: Generation, now: Instant, delay: Duration) {
        self.scheduled = Some(generation);
        self.tick.arm(now, delay);
    }
}
