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

use super::composing::ComposingIndicator;
use super::conversation::{Phase, SubmissionId};
use super::input::Composer;
use super::log::{BubbleId, MessageLog, Role};
use super::reveal::Typewriter;
use super::scroll_lock::ScrollLock;
use super::timer;
use super::viewport::{ChatScroll, ScrollBehavior};
use crate::backend::{BackendError, ChatBackend};
use crate::config::Config;
use crate::markup::Markup;
use ratatui::layout::Rect;
use std::rc::Rc;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Which pane receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    Transcript,
}

/// Results posted back to the event loop by local tasks.
#[derive(Debug)]
pub enum AppEvent {
    Reply { submission: SubmissionId, result: Result<Option<String>, BackendError> },
}

pub struct App {
    pub config: Config,
    pub log: MessageLog,
    pub scroll: ChatScroll,
    pub lock: ScrollLock,
    pub typewriter: Typewriter,
    pub composing: ComposingIndicator,
    pub conversation: Phase,
    pub composer: Composer,
    pub focus: Focus,
    pub should_quit: bool,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
    pub event_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Label shown in the header.
    pub server_label: String,
    /// Areas from the last frame, for mouse hit-testing.
    pub chat_area: Rect,
    pub input_area: Rect,
    pub jump_area: Option<Rect>,
    pub(super) backend: Rc<dyn ChatBackend>,
    pub(super) next_submission: u64,
    /// Cancels the outstanding backend request on shutdown.
    pub(super) in_flight: Option<CancellationToken>,
}

impl App {
    #[must_use]
    pub fn new(config: Config, backend: Rc<dyn ChatBackend>) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            log: MessageLog::default(),
            scroll: ChatScroll::default(),
            lock: ScrollLock::new(config.near_bottom_rows, config.debounce),
            typewriter: Typewriter::new(config.tick_interval),
            composing: ComposingIndicator::default(),
            conversation: Phase::Idle,
            composer: Composer::new(),
            focus: Focus::Input,
            should_quit: false,
            event_tx,
            event_rx,
            server_label: config.server.to_string(),
            chat_area: Rect::default(),
            input_area: Rect::default(),
            jump_area: None,
            backend,
            next_submission: 0,
            in_flight: None,
            config,
        }
    }

    /// Fresh check against the current geometry; never cache the result.
    #[must_use]
    pub fn may_auto_scroll(&self) -> bool {
        self.lock.may_auto_scroll(self.scroll.viewport())
    }

    /// Scroll to the anchor if the lock allows it.
    pub fn follow(&mut self, behavior: ScrollBehavior) -> bool {
        let allowed = self.may_auto_scroll();
        if allowed {
            self.scroll.scroll_to_bottom(behavior);
        }
        allowed
    }

    pub fn append_bubble(&mut self, role: Role, content: Markup) -> BubbleId {
        self.log.append(role, content, &self.lock, &mut self.scroll)
    }

    /// Jump-to-bottom control: resume following and hand focus back to the input.
    pub fn request_jump(&mut self) {
        self.lock.on_jump_requested();
        self.scroll.scroll_to_bottom(ScrollBehavior::Smooth);
        self.focus = Focus::Input;
    }

    pub fn user_scroll_by(&mut self, delta: isize, now: Instant) {
        let viewport = self.scroll.scroll_by(delta);
        self.lock.on_user_scroll(viewport, now);
    }

    pub fn user_scroll_to(&mut self, row: usize, now: Instant) {
        let viewport = self.scroll.scroll_to(row);
        self.lock.on_user_scroll(viewport, now);
    }

    /// Earliest pending timer, so the event loop can sleep until it.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        timer::earliest([
            self.lock.debounce_deadline(),
            self.composing.next_deadline(),
            self.typewriter.next_deadline(),
        ])
    }

    /// Stop everything that could still write into the transcript.
    pub fn shutdown(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
        self.composing.stop();
        if let Some(session) = self.typewriter.cancel() {
            tracing::debug!(generation = ?session.generation(), "reveal cancelled on shutdown");
        }
    }
}
