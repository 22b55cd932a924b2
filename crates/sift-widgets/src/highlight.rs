//! Highlight cursor and scroll offset over a filtered option list.
//!
//! Unlike a wrapping menu cursor, the highlight clamps at both ends and is
//! always a valid index into a non-empty list (0 when the list is empty).

/// Direction for keyboard highlight movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward index 0.
    Up,
    /// Toward the last option.
    Down,
}

/// Tracks the highlighted row and the first visible row of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    index: usize,
    offset: usize,
    count: usize,
    visible: usize,
}

impl Highlight {
    pub fn new(count: usize, visible: usize) -> Self {
        Self {
            index: 0,
            offset: 0,
            count,
            visible: visible.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
    pub fn offset(&self) -> usize {
        self.offset
    }
    pub fn count(&self) -> usize {
        self.count
    }

    /// Back to the first row, e.g. after the filter changed.
    pub fn reset(&mut self, count: usize) {
        self.count = count;
        self.index = 0;
        self.offset = 0;
    }

    /// Adopt a new list length, pulling the highlight back inside it.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.index = self.index.min(count.saturating_sub(1));
        self.ensure_visible();
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible.max(1);
        self.ensure_visible();
    }

    /// Step one row; stays put at either end and on an empty list.
    pub fn step(&mut self, direction: Direction) {
        if self.count == 0 {
            return;
        }
        self.index = match direction {
            Direction::Up => self.index.saturating_sub(1),
            Direction::Down => (self.index + 1).min(self.count - 1),
        };
        self.ensure_visible();
    }

    /// Jump to `index`. Returns `false`, leaving state alone, when it is out
    /// of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        self.index = index;
        self.ensure_visible();
        true
    }

    fn ensure_visible(&mut self) {
        if self.count == 0 {
            self.offset = 0;
            return;
        }
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + self.visible {
            self.offset = self.index + 1 - self.visible;
        }
        // Never leave blank rows at the bottom when the list shrank.
        self.offset = self.offset.min(self.count.saturating_sub(self.visible));
    }
}
