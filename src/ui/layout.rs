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

use ratatui::layout::{Constraint, Layout, Rect};

pub struct AppLayout {
    pub header: Rect,
    pub header_sep: Rect,
    pub body: Rect,
    pub input_sep: Rect,
    pub input: Rect,
    pub input_bottom_sep: Rect,
    pub footer: Option<Rect>,
}

/// Below this height the chrome is dropped so the transcript keeps some rows.
const COMPACT_HEIGHT: u16 = 9;

pub fn compute(area: Rect) -> AppLayout {
    let zero = Rect::new(area.x, area.y, area.width, 0);

    if area.height < COMPACT_HEIGHT {
        let [body, input] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
        AppLayout {
            header: zero,
            header_sep: zero,
            body,
            input_sep: Rect::new(area.x, input.y, area.width, 0),
            input,
            input_bottom_sep: Rect::new(area.x, input.bottom(), area.width, 0),
            footer: None,
        }
    } else {
        let [header, header_sep, body, input_sep, input, input_bottom_sep, footer] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);
        AppLayout {
            header,
            header_sep,
            body,
            input_sep,
            input,
            input_bottom_sep,
            footer: Some(footer),
        }
    }
}
