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

use super::conversation::submit_input;
use super::state::{App, Focus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Focuses the composer from anywhere else.
pub const FOCUS_INPUT_KEY: char = '/';

fn is_ctrl_shortcut(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) && !modifiers.contains(KeyModifiers::ALT)
}

fn is_ctrl_char_shortcut(key: KeyEvent, expected: char) -> bool {
    is_ctrl_shortcut(key.modifiers)
        && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&expected))
}

fn page_rows(app: &App) -> isize {
    let rows = app.scroll.viewport().client_height.saturating_sub(1).max(1);
    isize::try_from(rows).unwrap_or(isize::MAX)
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if is_ctrl_char_shortcut(key, 'c') || is_ctrl_char_shortcut(key, 'q') {
        app.should_quit = true;
        return;
    }
    if is_ctrl_char_shortcut(key, 'g') {
        app.request_jump();
        return;
    }

    // Paging works regardless of focus.
    match key.code {
        KeyCode::PageUp => {
            app.user_scroll_by(-page_rows(app), now);
            return;
        }
        KeyCode::PageDown => {
            app.user_scroll_by(page_rows(app), now);
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Input => handle_input_key(app, key, now),
        Focus::Transcript => handle_transcript_key(app, key, now),
    }
}

fn handle_input_key(app: &mut App, key: KeyEvent, now: Instant) {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => {
            submit_input(app, now);
        }
        (KeyCode::Esc | KeyCode::Tab, _) => app.focus = Focus::Transcript,
        (KeyCode::Up, m) if m.contains(KeyModifiers::CONTROL) => app.user_scroll_by(-1, now),
        (KeyCode::Down, m) if m.contains(KeyModifiers::CONTROL) => app.user_scroll_by(1, now),
        (KeyCode::Left, _) => app.composer.move_left(),
        (KeyCode::Right, _) => app.composer.move_right(),
        (KeyCode::Home, _) => app.composer.move_home(),
        (KeyCode::End, _) => app.composer.move_end(),
        (KeyCode::Backspace, _) => app.composer.delete_char_before(),
        (KeyCode::Delete, _) => app.composer.delete_char_after(),
        (KeyCode::Char(c), m) if !is_ctrl_shortcut(m) => app.composer.insert_char(c),
        _ => {}
    }
}

fn handle_transcript_key(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char(FOCUS_INPUT_KEY) | KeyCode::Tab => app.focus = Focus::Input,
        KeyCode::Up | KeyCode::Char('k') => app.user_scroll_by(-1, now),
        KeyCode::Down | KeyCode::Char('j') => app.user_scroll_by(1, now),
        KeyCode::Home | KeyCode::Char('g') => app.user_scroll_to(0, now),
        KeyCode::End => app.user_scroll_to(usize::MAX, now),
        KeyCode::Char('G') => app.request_jump(),
        _ => {}
    }
}
