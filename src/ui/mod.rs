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

mod chat;
mod header;
mod input;
mod jump;
mod layout;
pub mod theme;

pub use chat::{BOT_LABEL, USER_LABEL, transcript_lines};
pub use input::{PENDING_HINT, PLACEHOLDER};
pub use jump::LABEL as JUMP_LABEL;

use crate::app::{App, Focus, LockState, Phase};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn render(frame: &mut Frame, app: &mut App) {
    let areas = layout::compute(frame.area());

    if areas.header.height > 0 {
        header::render(frame, areas.header, app);
        render_separator(frame, areas.header_sep);
    }

    chat::render(frame, areas.body, app);

    render_separator(frame, areas.input_sep);
    input::render(frame, areas.input, app);
    render_separator(frame, areas.input_bottom_sep);

    if let Some(footer_area) = areas.footer {
        render_footer(frame, footer_area, app);
    }
}

const FOOTER_PAD: u16 = 2;
const FOOTER_COLUMN_GAP: u16 = 1;

fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
    let padded = Rect {
        x: area.x + FOOTER_PAD,
        y: area.y,
        width: area.width.saturating_sub(FOOTER_PAD * 2),
        height: area.height,
    };
    let (left_area, right_area) = split_footer_columns(padded);
    frame.render_widget(Paragraph::new(footer_hints(app.focus)), left_area);

    if let Some((text, color)) = footer_status(app) {
        render_footer_right_info(frame, right_area, &text, color);
    }
}

fn footer_hints(focus: Focus) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::White));
    let dim = |t: &'static str| Span::styled(t, Style::default().fg(theme::DIM));
    match focus {
        Focus::Input => Line::from(vec![
            key("Enter"),
            dim(" gửi  "),
            key("Esc"),
            dim(" cuộn  "),
            key("Ctrl+C"),
            dim(" thoát"),
        ]),
        Focus::Transcript => Line::from(vec![
            key("↑↓"),
            dim(" cuộn  "),
            key("G"),
            dim(" xuống cuối  "),
            key("/"),
            dim(" nhập"),
        ]),
    }
}

/// Right-hand status: reply progress, then whether auto-follow is paused.
fn footer_status(app: &App) -> Option<(String, Color)> {
    let mut parts = Vec::new();
    match app.conversation {
        Phase::Idle => {}
        Phase::Sent { .. } => parts.push("Đang chờ máy chủ"),
        Phase::Answered { .. } => parts.push("Đang hiển thị trả lời"),
    }
    if app.lock.state() == LockState::Locked {
        parts.push("Tự cuộn tạm dừng");
    }
    if parts.is_empty() {
        return None;
    }
    let color = if app.conversation.is_idle() { theme::DIM } else { theme::STATUS_PENDING };
    Some((parts.join(" | "), color))
}

fn split_footer_columns(area: Rect) -> (Rect, Rect) {
    if area.width == 0 {
        return (area, Rect { width: 0, ..area });
    }

    let gap = if area.width > 2 { FOOTER_COLUMN_GAP } else { 0 };
    let usable_width = area.width.saturating_sub(gap);
    let left_width = usable_width.saturating_add(1) / 2;
    let right_width = usable_width.saturating_sub(left_width);

    let left = Rect { width: left_width, ..area };
    let right = Rect {
        x: area.x.saturating_add(left_width).saturating_add(gap),
        width: right_width,
        ..area
    };
    (left, right)
}

fn fit_footer_right_text(text: &str, max_width: usize) -> Option<String> {
    if max_width == 0 || text.trim().is_empty() {
        return None;
    }
    if UnicodeWidthStr::width(text) <= max_width {
        return Some(text.to_owned());
    }
    if max_width <= 3 {
        return Some(".".repeat(max_width));
    }

    let mut fitted = String::new();
    let mut width: usize = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if width.saturating_add(ch_width).saturating_add(3) > max_width {
            break;
        }
        fitted.push(ch);
        width = width.saturating_add(ch_width);
    }
    fitted.push_str("...");
    Some(fitted)
}

fn render_footer_right_info(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let Some(fitted) = fit_footer_right_text(text, usize::from(area.width)) else {
        return;
    };
    let line = Line::from(Span::styled(fitted, Style::default().fg(color)));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Right), area);
}

fn render_separator(frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let sep_str = theme::SEPARATOR_CHAR.repeat(usize::from(area.width));
    let line = Line::from(Span::styled(sep_str, Style::default().fg(theme::DIM)));
    frame.render_widget(Paragraph::new(line), area);
}
