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

use crate::app::App;
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

pub const LABEL: &str = " ↓ Xuống cuối ";
const MARGIN_RIGHT: u16 = 2;

/// Bottom-right corner of the transcript pane, or `None` when it does not fit.
pub fn area(chat: Rect) -> Option<Rect> {
    let width = u16::try_from(LABEL.width()).ok()?;
    if chat.height == 0 || chat.width < width + MARGIN_RIGHT {
        return None;
    }
    Some(Rect {
        x: chat.right() - width - MARGIN_RIGHT,
        y: chat.bottom() - 1,
        width,
        height: 1,
    })
}

/// Draw the jump control while the lock is engaged and record where it is for
/// mouse hit-testing.
pub fn render(frame: &mut Frame, chat: Rect, app: &mut App) {
    app.jump_area = if app.lock.jump_visible() { area(chat) } else { None };
    let Some(rect) = app.jump_area else {
        return;
    };
    let line = Line::from(Span::styled(
        LABEL,
        Style::default().fg(theme::JUMP_FG).bg(theme::JUMP_BG).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Clear, rect);
    frame.render_widget(Paragraph::new(line), rect);
}
