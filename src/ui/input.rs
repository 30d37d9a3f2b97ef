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

use crate::app::{App, Focus};
use crate::ui::theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthChar;

/// Horizontal padding to match header/footer inset.
const INPUT_PAD: u16 = 2;

/// Prompt prefix width: "❯ " = 2 columns
const PROMPT_WIDTH: u16 = 2;

pub const PLACEHOLDER: &str = "Nhập câu hỏi...";
pub const PENDING_HINT: &str = "Đang chờ trả lời...";

pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    app.input_area = area;
    let padded = Rect {
        x: area.x + INPUT_PAD,
        y: area.y,
        width: area.width.saturating_sub(INPUT_PAD * 2),
        height: area.height,
    };
    let focused = app.focus == Focus::Input;
    let prompt_color = if focused { theme::RUST_ORANGE } else { theme::DIM };
    let prompt = Span::styled(format!("{} ", theme::PROMPT_CHAR), Style::default().fg(prompt_color));

    if app.composer.is_empty() {
        let hint = if app.conversation.is_idle() { PLACEHOLDER } else { PENDING_HINT };
        let line = Line::from(vec![prompt, Span::styled(hint, Style::default().fg(theme::DIM))]);
        frame.render_widget(Paragraph::new(line), padded);
        if focused {
            frame.set_cursor_position((padded.x + PROMPT_WIDTH, padded.y));
        }
        return;
    }

    let content_width = usize::from(padded.width.saturating_sub(PROMPT_WIDTH));
    let (visible, cursor_col) =
        visible_window(app.composer.text(), app.composer.cursor(), content_width);
    frame.render_widget(Paragraph::new(Line::from(vec![prompt, Span::raw(visible)])), padded);

    if focused && content_width > 0 {
        let x = padded.x + PROMPT_WIDTH + u16::try_from(cursor_col).unwrap_or(u16::MAX);
        if x < padded.right() {
            frame.set_cursor_position((x, padded.y));
        }
    }
}

/// Slice of `text` that fits in `width` columns with the cursor kept in view,
/// plus the cursor's column within that slice. Scrolls horizontally once the
/// cursor passes the right edge.
pub fn visible_window(text: &str, cursor: usize, width: usize) -> (String, usize) {
    if width == 0 {
        return (String::new(), 0);
    }
    let chars: Vec<char> = text.chars().collect();
    let cursor = cursor.min(chars.len());
    let col = |c: &char| c.width().unwrap_or(0);

    // Leave one column for the cursor itself.
    let mut start = 0;
    let mut before: usize = chars[..cursor].iter().map(col).sum();
    while before >= width && start < cursor {
        before -= col(&chars[start]);
        start += 1;
    }

    let mut out = String::new();
    let mut used = 0;
    for c in &chars[start..] {
        let w = col(c);
        if used + w > width {
            break;
        }
        out.push(*c);
        used += w;
    }
    (out, before)
}
