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

//! Bubble content: styled terminal lines produced from bot markdown or from
//! literal user/error text.

use crate::ui::theme;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use std::panic::{self, AssertUnwindSafe};

const TAB_WIDTH: usize = 4;
const ERROR_PREFIX: &str = "⚠️ Lỗi: ";

/// Rendered content of one bubble.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    lines: Vec<Line<'static>>,
}

impl Markup {
    #[must_use]
    pub fn from_lines(lines: Vec<Line<'static>>) -> Self {
        Self { lines }
    }

    #[must_use]
    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Unstyled text, one `\n` between lines.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render trusted bot markdown. Never fails: a renderer panic degrades to the
/// escaped raw text.
#[must_use]
pub fn render(text: &str) -> Markup {
    render_with(text, render_with_tui_markdown)
}

fn render_with<F>(text: &str, renderer: F) -> Markup
where
    F: FnOnce(&str) -> Vec<Line<'static>>,
{
    if let Ok(lines) = panic::catch_unwind(AssertUnwindSafe(|| renderer(text))) {
        Markup::from_lines(lines)
    } else {
        tracing::warn!("tui-markdown panic; falling back to plain-text rendering");
        paragraph(text)
    }
}

fn render_with_tui_markdown(text: &str) -> Vec<Line<'static>> {
    let rendered = tui_markdown::from_str(text);
    rendered
        .lines
        .into_iter()
        .map(|line| {
            let owned_spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| Span::styled(span.content.into_owned(), span.style))
                .collect();
            Line::from(owned_spans).style(line.style)
        })
        .collect()
}

/// Neutralize characters the terminal would act on. Control characters become
/// their visible control-picture glyphs and tabs expand to spaces; newlines are
/// kept so the text still splits into lines.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push('\n'),
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            '\u{0}'..='\u{1f}' => {
                out.push(char::from_u32(0x2400 + u32::from(c)).unwrap_or('\u{fffd}'));
            }
            '\u{7f}' => out.push('\u{2421}'),
            '\u{80}'..='\u{9f}' => out.push('\u{fffd}'),
            _ => out.push(c),
        }
    }
    out
}

/// Literal text as a plain paragraph; markdown syntax is shown as typed.
#[must_use]
pub fn paragraph(text: &str) -> Markup {
    paragraph_styled(text, Style::default())
}

fn paragraph_styled(text: &str, style: Style) -> Markup {
    Markup::from_lines(
        escape(text).split('\n').map(|line| Line::from(Span::styled(line.to_owned(), style))).collect(),
    )
}

/// Inline error notice shown in place of a failed reply.
#[must_use]
pub fn error_notice(message: &str) -> Markup {
    let style = Style::default().fg(theme::STATUS_ERROR);
    let mut lines = paragraph_styled(message, style).lines;
    if let Some(first) = lines.first_mut() {
        first.spans.insert(
            0,
            Span::styled(ERROR_PREFIX, style.add_modifier(Modifier::BOLD)),
        );
    }
    Markup::from_lines(lines)
}
