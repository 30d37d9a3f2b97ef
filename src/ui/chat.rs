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

use crate::app::{App, Bubble, Role};
use crate::ui::{jump, theme};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};

pub const USER_LABEL: &str = "Bạn";
pub const BOT_LABEL: &str = "Bot";

/// Flatten the log into display lines. The trailing blank line is the anchor:
/// following the bottom means keeping it in view.
pub fn transcript_lines(app: &App) -> Vec<Line<'static>> {
    let mut out = Vec::new();
    for bubble in app.log.bubbles() {
        render_bubble(bubble, &mut out);
    }
    out.push(Line::default());
    out
}

fn render_bubble(bubble: &Bubble, out: &mut Vec<Line<'static>>) {
    match bubble.role {
        Role::User => {
            out.push(Line::from(Span::styled(
                USER_LABEL,
                Style::default().fg(theme::ROLE_USER).add_modifier(Modifier::BOLD),
            )));
            let bg = Style::default().bg(theme::USER_MSG_BG);
            out.extend(bubble.content.lines().iter().map(|l| l.clone().patch_style(bg)));
        }
        Role::Bot => {
            out.push(Line::from(Span::styled(
                BOT_LABEL,
                Style::default().fg(theme::ROLE_BOT).add_modifier(Modifier::BOLD),
            )));
            out.extend(bubble.content.lines().iter().cloned());
        }
    }
    out.push(Line::default());
}

#[allow(clippy::cast_possible_truncation)]
pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
    app.chat_area = area;

    let paragraph = Paragraph::new(Text::from(transcript_lines(app))).wrap(Wrap { trim: false });
    // line_count gives the real wrapped height
    let content_height = paragraph.line_count(area.width);
    let viewport_height = usize::from(area.height);
    let offset = app.scroll.layout(content_height, viewport_height);

    if content_height <= viewport_height {
        // Short content sits right above the input.
        let pad = (viewport_height - content_height) as u16;
        let render_area = Rect { y: area.y + pad, height: content_height as u16, ..area };
        frame.render_widget(paragraph, render_area);
    } else {
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        frame.render_widget(paragraph.scroll((offset, 0)), area);
    }

    jump::render(frame, area, app);
}
