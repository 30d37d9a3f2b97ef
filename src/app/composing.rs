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

use super::log::BubbleId;
use super::timer::Timer;
use crate::markup::{self, Markup};
use std::time::{Duration, Instant};

pub const COMPOSING_INTERVAL: Duration = Duration::from_millis(400);
const COMPOSING_TEXT: &str = "Đang soạn trả lời";
const INITIAL_DOTS: &str = "...";
const DOTS: [&str; 2] = ["…", "...."];

/// Placeholder content shown while a reply is pending.
#[must_use]
pub fn placeholder(dots: &str) -> Markup {
    markup::paragraph(&format!("{COMPOSING_TEXT}{dots}"))
}

#[must_use]
pub fn initial_placeholder() -> Markup {
    placeholder(INITIAL_DOTS)
}

/// Alternating-glyph animation on the pending reply's placeholder. Runs on its
/// own timer, independent of the typewriter.
#[derive(Debug, Default)]
pub struct ComposingIndicator {
    target: Option<BubbleId>,
    timer: Timer,
    frame: usize,
}

impl ComposingIndicator {
    pub fn start(&mut self, target: BubbleId, now: Instant) {
        self.target = Some(target);
        self.frame = 0;
        self.timer.arm(now, COMPOSING_INTERVAL);
    }

    pub fn stop(&mut self) {
        self.target = None;
        self.timer.cancel();
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.target.is_some()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timer.deadline()
    }

    /// Next frame for the placeholder, if one is due.
    pub fn poll(&mut self, now: Instant) -> Option<(BubbleId, Markup)> {
        if !self.timer.fire(now) {
            return None;
        }
        let target = self.target?;
        let dots = DOTS[self.frame % DOTS.len()];
        self.frame = self.frame.wrapping_add(1);
        self.timer.arm(now, COMPOSING_INTERVAL);
        Some((target, placeholder(dots)))
    }
}
