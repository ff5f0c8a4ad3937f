/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

/// A position within a list of `len` items.
///
/// Invariant: `pos < len`, or `pos == 0` when `len == 0`. Every
/// movement returns whether the position changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Cursor {
    pos: usize,
    len: usize,
}

impl Cursor {
    pub(crate) fn new(len: usize) -> Self {
        Self { pos: 0, len }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn move_up(&mut self) -> bool {
        if self.pos > 0 {
            self.pos -= 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn move_down(&mut self) -> bool {
        if self.pos + 1 < self.len {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn home(&mut self) -> bool {
        let moved = self.pos != 0;
        self.pos = 0;
        moved
    }

    pub(crate) fn end(&mut self) -> bool {
        let last = self.len.saturating_sub(1);
        let moved = self.pos != last;
        self.pos = last;
        moved
    }

    /// Advance by one, wrapping to the start. Used for option cycling.
    pub(crate) fn cycle(&mut self) -> bool {
        if self.len < 2 {
            return false;
        }
        self.pos = (self.pos + 1) % self.len;
        true
    }

    /// Change the list length, clamping the position.
    pub(crate) fn update_len(&mut self, len: usize) {
        self.len = len;
        self.pos = self.pos.min(len.saturating_sub(1));
    }

    pub(crate) fn set_pos(&mut self, pos: usize) {
        self.pos = pos.min(self.len.saturating_sub(1));
    }
}
