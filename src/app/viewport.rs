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

/// Scroll geometry of the transcript pane, in rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub scroll_top: usize,
    pub client_height: usize,
    pub scroll_height: usize,
}

impl Viewport {
    #[must_use]
    pub fn max_scroll(self) -> usize {
        self.scroll_height.saturating_sub(self.client_height)
    }
}

/// True iff `scroll_top + client_height >= scroll_height - threshold`.
#[must_use]
pub fn is_near_bottom(viewport: Viewport, threshold: usize) -> bool {
    viewport
        .scroll_top
        .saturating_add(viewport.client_height)
        .saturating_add(threshold)
        >= viewport.scroll_height
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Owns the transcript scroll offset.
///
/// Bottom requests are not resolved to a row when made: the anchor is the end
/// of whatever content exists at the next layout, so content that grows between
/// a request and the frame is still followed.
#[derive(Debug, Default)]
pub struct ChatScroll {
    geometry: Viewport,
    /// Offset requested by the user or by a follow request.
    target: usize,
    /// Fractional position for smooth animation.
    pos: f32,
    follow: Option<ScrollBehavior>,
}

impl ChatScroll {
    /// Geometry as of the last layout.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.geometry
    }

    #[must_use]
    pub fn pending_follow(&self) -> Option<ScrollBehavior> {
        self.follow
    }

    pub fn scroll_to_bottom(&mut self, behavior: ScrollBehavior) {
        // An instant request wins over an in-flight smooth one.
        self.follow = match (self.follow, behavior) {
            (Some(ScrollBehavior::Instant), _) | (_, ScrollBehavior::Instant) => {
                Some(ScrollBehavior::Instant)
            }
            _ => Some(ScrollBehavior::Smooth),
        };
    }

    /// Replace any pending follow with a smooth one, so the last leg of a
    /// reveal eases in even if a per-tick snap has not been laid out yet.
    pub fn ease_to_bottom(&mut self) {
        self.follow = Some(ScrollBehavior::Smooth);
    }

    /// Apply a user scroll of `delta` rows and return the resulting geometry.
    /// Cancels any follow request.
    pub fn scroll_by(&mut self, delta: isize) -> Viewport {
        self.follow = None;
        let max = self.geometry.max_scroll();
        let from = self.geometry.scroll_top;
        self.target = from.saturating_add_signed(delta).min(max);
        self.jump_to_target()
    }

    /// User scroll to an absolute row (Home/End).
    pub fn scroll_to(&mut self, row: usize) -> Viewport {
        self.follow = None;
        self.target = row.min(self.geometry.max_scroll());
        self.jump_to_target()
    }

    fn jump_to_target(&mut self) -> Viewport {
        #[allow(clippy::cast_precision_loss)]
        {
            self.pos = self.target as f32;
        }
        self.geometry.scroll_top = self.target;
        self.geometry
    }

    /// Resolve pending requests against freshly measured content and return the
    /// row offset to draw at.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
    pub fn layout(&mut self, content_height: usize, client_height: usize) -> usize {
        let max = content_height.saturating_sub(client_height);

        match self.follow {
            Some(ScrollBehavior::Instant) => {
                self.target = max;
                self.pos = max as f32;
                self.follow = None;
            }
            Some(ScrollBehavior::Smooth) => self.target = max,
            None => {}
        }
        self.target = self.target.min(max);

        let target = self.target as f32;
        let delta = target - self.pos;
        if delta.abs() < 0.5 {
            self.pos = target;
        } else {
            // Smooth over ~2-3 frames.
            self.pos += delta * 0.5;
        }
        self.pos = self.pos.clamp(0.0, max as f32);

        let offset = (self.pos.round() as usize).min(max);
        if offset == self.target && self.follow == Some(ScrollBehavior::Smooth) {
            self.follow = None;
        }

        self.geometry =
            Viewport { scroll_top: offset, client_height, scroll_height: content_height };
        offset
    }
}
