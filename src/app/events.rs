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

use super::conversation::{apply_reveal_step, handle_reply};
use super::keys::handle_key;
use super::state::{App, AppEvent, Focus};
use super::viewport::ScrollBehavior;
use crossterm::event::{Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use std::time::Instant;

/// One wheel notch. Must exceed the default near-bottom threshold so a single
/// notch up from the anchor locks the view.
const MOUSE_SCROLL_LINES: isize = 5;

pub fn handle_terminal_event(app: &mut App, event: Event, now: Instant) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, now),
        Event::Mouse(mouse) => handle_mouse_event(app, mouse, now),
        Event::Paste(text) => {
            app.focus = Focus::Input;
            app.composer.insert_str(&text);
        }
        Event::Resize(..) => on_resize(app),
        _ => {}
    }
}

pub fn handle_app_event(app: &mut App, event: AppEvent, now: Instant) {
    match event {
        AppEvent::Reply { submission, result } => handle_reply(app, submission, result, now),
    }
}

/// Fire every timer that is due: follow debounce, composing glyph, reveal tick.
pub fn poll_timers(app: &mut App, now: Instant) {
    app.lock.poll(now);
    if let Some((placeholder, content)) = app.composing.poll(now) {
        app.log.set_content(placeholder, content);
    }
    if let Some(step) = app.typewriter.poll(now) {
        apply_reveal_step(app, step);
    }
}

/// Keep the anchor in view across a resize, unless the user is reading
/// scrollback.
pub fn on_resize(app: &mut App) {
    app.follow(ScrollBehavior::Instant);
}

fn handle_mouse_event(app: &mut App, mouse: MouseEvent, now: Instant) {
    let at = Position::new(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::ScrollUp => app.user_scroll_by(-MOUSE_SCROLL_LINES, now),
        MouseEventKind::ScrollDown => app.user_scroll_by(MOUSE_SCROLL_LINES, now),
        MouseEventKind::Down(MouseButton::Left) => {
            if app.jump_area.is_some_and(|area| area.contains(at)) {
                app.request_jump();
            } else if app.input_area.contains(at) {
                app.focus = Focus::Input;
            } else if app.chat_area.contains(at) {
                app.focus = Focus::Transcript;
            }
        }
        _ => {}
    }
}
