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

//! Submission lifecycle: user bubble, placeholder, backend round-trip, then a
//! typewriter reveal or an inline error.

use super::composing;
use super::log::{BubbleId, Role};
use super::reveal::{Generation, RevealStep};
use super::scroll_lock::LockState;
use super::state::{App, AppEvent, Focus};
use super::viewport::ScrollBehavior;
use crate::backend::BackendError;
use crate::markup::{self, Markup};
use std::rc::Rc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

pub const FALLBACK_ANSWER: &str = "Xin lỗi, mình chưa có câu trả lời phù hợp.";

pub const GREETING: &str = "Xin chào! Mình là **Chat Bot lịch tuần Đại học Thương Mại** 👋

Bạn có thể hỏi về hoạt động/họp/sự kiện theo *ngày, thứ, giờ*.
- VD: *\"Lịch tuần trường Đại học Thương Mại là gì?\"*
- VD: *\"Thứ 5 tuần này lúc 9h30 có gì?\"*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionId(u64);

/// `Idle -> Sent -> Answered -> Idle`, or `Sent -> Idle` on failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting on the backend; the placeholder shows the composing indicator.
    Sent { submission: SubmissionId, placeholder: BubbleId },
    /// The reply is being revealed into the placeholder.
    Answered { placeholder: BubbleId, reveal: Generation },
}

impl Phase {
    #[must_use]
    pub fn is_idle(self) -> bool {
        self == Self::Idle
    }
}

/// Submit the composer's text. Returns `true` if a request was dispatched.
pub fn submit_input(app: &mut App, now: Instant) -> bool {
    if !app.conversation.is_idle() {
        tracing::debug!(phase = ?app.conversation, "submit ignored while a reply is pending");
        return false;
    }
    let message = app.composer.text().trim().to_owned();
    if message.is_empty() {
        return false;
    }

    app.append_bubble(Role::User, markup::paragraph(&message));
    app.composer.clear();
    app.focus = Focus::Input;

    let placeholder = app.append_bubble(Role::Bot, composing::initial_placeholder());
    app.follow(ScrollBehavior::Smooth);
    app.composing.start(placeholder, now);

    let submission = SubmissionId(app.next_submission);
    app.next_submission += 1;
    app.conversation = Phase::Sent { submission, placeholder };
    tracing::debug!(?submission, chars = message.chars().count(), "submitting message");

    dispatch(app, submission, message);
    true
}

fn dispatch(app: &mut App, submission: SubmissionId, message: String) {
    let backend = Rc::clone(&app.backend);
    let tx = app.event_tx.clone();
    let token = CancellationToken::new();
    if let Some(previous) = app.in_flight.replace(token.clone()) {
        previous.cancel();
    }

    tokio::task::spawn_local(async move {
        tokio::select! {
            () = token.cancelled() => {
                tracing::debug!(?submission, "chat request cancelled");
            }
            result = backend.ask(&message) => {
                let _ = tx.send(AppEvent::Reply { submission, result });
            }
        }
    });
}

pub fn handle_reply(
    app: &mut App,
    submission: SubmissionId,
    result: Result<Option<String>, BackendError>,
    now: Instant,
) {
    let Phase::Sent { submission: pending, placeholder } = app.conversation else {
        tracing::warn!(?submission, phase = ?app.conversation, "reply with no pending submission");
        return;
    };
    if pending != submission {
        tracing::warn!(?submission, ?pending, "dropping reply for a stale submission");
        return;
    }

    app.in_flight = None;
    app.composing.stop();

    match result {
        Ok(answer) => {
            let text = answer
                .filter(|a| !a.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_ANSWER.to_owned());
            let reveal = start_reveal(app, placeholder, text, now);
            app.conversation = Phase::Answered { placeholder, reveal };
        }
        Err(err) => {
            tracing::error!("chat request failed: {err}");
            app.log.set_content(placeholder, markup::error_notice(&err.to_string()));
            app.follow(ScrollBehavior::Smooth);
            app.conversation = Phase::Idle;
            app.focus = Focus::Input;
        }
    }
}

/// Start revealing `text` into `target`. A superseded session's bubble gets its
/// full text at once so it is never left cut off mid-reply.
pub fn start_reveal(
    app: &mut App,
    target: BubbleId,
    text: impl Into<String>,
    now: Instant,
) -> Generation {
    let (generation, superseded) = app.typewriter.start(target, text, now);
    if let Some(old) = superseded {
        app.log.set_content(old.target(), markup::render(old.full_text()));
    }
    generation
}

pub fn apply_reveal_step(app: &mut App, step: RevealStep) {
    app.log.set_content(step.target, step.content);
    if !step.finished {
        app.follow(ScrollBehavior::Instant);
        return;
    }
    if app.lock.state() == LockState::Following {
        app.scroll.ease_to_bottom();
    }
    app.focus = Focus::Input;
    if let Phase::Answered { reveal, .. } = app.conversation
        && reveal == step.generation
    {
        app.conversation = Phase::Idle;
    }
}

/// Welcome bubble, revealed like any other bot reply.
pub fn greet(app: &mut App, now: Instant) -> BubbleId {
    let id = app.append_bubble(Role::Bot, Markup::default());
    start_reveal(app, id, GREETING, now);
    app.scroll.scroll_to_bottom(ScrollBehavior::Smooth);
    id
}
