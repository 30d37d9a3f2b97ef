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

use super::timer::Timer;
use super::viewport::{Viewport, is_near_bottom};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// Programmatic scrolling may follow new content.
    Following,
    /// The user scrolled away; auto-scroll is suppressed until they come back.
    Locked,
}

/// Auto-follow state machine for the transcript.
///
/// Fed only by user-initiated scrolls. Every component that wants to move the
/// viewport on its own asks [`ScrollLock::may_auto_scroll`] first.
#[derive(Debug)]
pub struct ScrollLock {
    state: LockState,
    /// Re-enables following once a near-bottom scroll has settled.
    debounce: Timer,
    debounce_delay: Duration,
    threshold: usize,
}

impl ScrollLock {
    #[must_use]
    pub fn new(threshold: usize, debounce_delay: Duration) -> Self {
        Self {
            state: LockState::Following,
            debounce: Timer::default(),
            debounce_delay,
            threshold,
        }
    }

    #[must_use]
    pub fn state(&self) -> LockState {
        self.state
    }

    #[must_use]
    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// The jump-to-bottom control is shown exactly while locked.
    #[must_use]
    pub fn jump_visible(&self) -> bool {
        self.state == LockState::Locked
    }

    #[must_use]
    pub fn debounce_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    pub fn on_user_scroll(&mut self, viewport: Viewport, now: Instant) {
        self.debounce.cancel();
        if is_near_bottom(viewport, self.threshold) {
            self.debounce.arm(now, self.debounce_delay);
        } else {
            if self.state != LockState::Locked {
                tracing::debug!(?viewport, "auto-follow locked by user scroll");
            }
            self.state = LockState::Locked;
        }
    }

    pub fn on_jump_requested(&mut self) {
        tracing::debug!("auto-follow resumed by jump request");
        self.debounce.cancel();
        self.resume();
    }

    /// Fire the debounce if due. Returns `true` when following resumed.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.debounce.fire(now) {
            return false;
        }
        if self.state == LockState::Locked {
            tracing::debug!("auto-follow resumed after settling near bottom");
        }
        self.resume();
        true
    }

    fn resume(&mut self) {
        self.state = LockState::Following;
    }

    #[must_use]
    pub fn may_auto_scroll(&self, viewport: Viewport) -> bool {
        self.state == LockState::Following && is_near_bottom(viewport, self.threshold)
    }
}
