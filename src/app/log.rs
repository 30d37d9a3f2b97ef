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

use super::scroll_lock::ScrollLock;
use super::viewport::{ChatScroll, ScrollBehavior};
use crate::markup::Markup;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// Handle to a bubble for in-place updates. Stable for the log's lifetime since
/// bubbles are never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BubbleId(usize);

#[derive(Debug)]
pub struct Bubble {
    pub role: Role,
    pub content: Markup,
}

/// Conversation transcript. The anchor is implicit: it is always the position
/// after the last bubble, and "scroll to bottom" means "scroll to the anchor".
#[derive(Debug, Default)]
pub struct MessageLog {
    bubbles: Vec<Bubble>,
}

impl MessageLog {
    /// Insert a bubble before the anchor and follow it if the lock allows.
    pub fn append(
        &mut self,
        role: Role,
        content: Markup,
        lock: &ScrollLock,
        scroll: &mut ChatScroll,
    ) -> BubbleId {
        let id = BubbleId(self.bubbles.len());
        self.bubbles.push(Bubble { role, content });
        if lock.may_auto_scroll(scroll.viewport()) {
            scroll.scroll_to_bottom(ScrollBehavior::Instant);
        }
        id
    }

    /// Replace a bubble's content. Returns `false` for an unknown handle.
    pub fn set_content(&mut self, id: BubbleId, content: Markup) -> bool {
        let Some(bubble) = self.bubbles.get_mut(id.0) else {
            tracing::warn!(?id, "update for unknown bubble");
            return false;
        };
        bubble.content = content;
        true
    }

    #[must_use]
    pub fn get(&self, id: BubbleId) -> Option<&Bubble> {
        self.bubbles.get(id.0)
    }

    #[must_use]
    pub fn bubbles(&self) -> &[Bubble] {
        &self.bubbles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bubbles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_empty()
    }
}
