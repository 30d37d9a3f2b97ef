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

mod composing;
mod conversation;
mod events;
mod input;
mod keys;
mod log;
mod reveal;
mod scroll_lock;
mod state;
mod timer;
mod viewport;

pub use composing::{COMPOSING_INTERVAL, ComposingIndicator};
pub use conversation::{
    FALLBACK_ANSWER, GREETING, Phase, SubmissionId, apply_reveal_step, greet, handle_reply,
    start_reveal, submit_input,
};
pub use events::{handle_app_event, handle_terminal_event, on_resize, poll_timers};
pub use input::Composer;
pub use keys::FOCUS_INPUT_KEY;
pub use log::{Bubble, BubbleId, MessageLog, Role};
pub use reveal::{Generation, REVEAL_STEPS, RevealSession, RevealStep, Typewriter, chunk_size};
pub use scroll_lock::{LockState, ScrollLock};
pub use state::{App, AppEvent, Focus};
pub use timer::Timer;
pub use viewport::{ChatScroll, ScrollBehavior, Viewport, is_near_bottom};

use crate::error::AppError;
use crossterm::event::EventStream;
use futures::{FutureExt as _, StreamExt};
use std::time::{Duration, Instant};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// TUI event loop
// ---------------------------------------------------------------------------

pub async fn run_tui(app: &mut App) -> anyhow::Result<()> {
    let mut terminal = ratatui::try_init().map_err(|e| {
        tracing::error!("terminal init failed: {e}");
        anyhow::Error::new(AppError::Terminal)
    })?;

    // Ignore errors on terminals without paste or mouse support.
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::EnableBracketedPaste,
        crossterm::event::EnableMouseCapture,
    );

    let result = event_loop(app, &mut terminal).await;

    app.shutdown();
    let _ = crossterm::execute!(
        std::io::stdout(),
        crossterm::event::DisableBracketedPaste,
        crossterm::event::DisableMouseCapture,
    );
    ratatui::restore();

    result
}

async fn event_loop(app: &mut App, terminal: &mut ratatui::DefaultTerminal) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    let mut last_render = Instant::now();

    loop {
        // Phase 1: wait for an event, the next frame, or the next due timer
        let frame_due = last_render + FRAME_INTERVAL;
        let wake = timer::earliest([Some(frame_due), app.next_deadline()]).unwrap_or(frame_due);
        tokio::select! {
            Some(Ok(event)) = events.next() => {
                handle_terminal_event(app, event, Instant::now());
            }
            Some(event) = app.event_rx.recv() => {
                handle_app_event(app, event, Instant::now());
            }
            () = tokio::time::sleep_until(tokio::time::Instant::from_std(wake)) => {}
        }

        // Phase 2: drain everything already queued
        loop {
            if let Some(Some(Ok(event))) = events.next().now_or_never() {
                handle_terminal_event(app, event, Instant::now());
                continue;
            }
            match app.event_rx.try_recv() {
                Ok(event) => handle_app_event(app, event, Instant::now()),
                Err(_) => break,
            }
        }

        if app.should_quit {
            tracing::debug!("quit requested");
            return Ok(());
        }

        poll_timers(app, Instant::now());

        // Phase 3: render at most once per frame
        if last_render.elapsed() >= FRAME_INTERVAL {
            terminal.draw(|f| crate::ui::render(f, app)).map_err(|e| {
                tracing::error!("draw failed: {e}");
                anyhow::Error::new(AppError::Terminal)
            })?;
            last_render = Instant::now();
        }
    }
}
