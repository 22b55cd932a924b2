//! Single-line editing buffer behind the dropdown's search field.
//!
//! Stores characters (not bytes) so the caret can never split a multi-byte
//! character. Edit operations report whether the text changed; caret moves
//! never change it.

/// Character buffer with a caret.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchField {
    chars: Vec<char>,
    cursor: usize,
}

impl SearchField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Replace the text and put the caret at the end.
    pub fn set_value(&mut self, s: &str) {
        self.chars = s.chars().collect();
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Caret position as a char index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn insert_char(&mut self, c: char) -> bool {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        true
    }

    /// Insert pasted text, dropping line breaks the single-line field can't show.
    pub fn insert_str(&mut self, s: &str) -> bool {
        let before = self.chars.len();
        for c in s.chars().filter(|c| !matches!(c, '\n' | '\r')) {
            self.chars.insert(self.cursor, c);
            self.cursor += 1;
        }
        self.chars.len() != before
    }

    /// Backspace.
    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.chars.remove(self.cursor);
        true
    }

    /// Delete key.
    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.chars.len() {
            return false;
        }
        self.chars.remove(self.cursor);
        true
    }

    /// Ctrl+W: trailing spaces, then the word before the caret.
    pub fn delete_word_back(&mut self) -> bool {
        let start = self.cursor;
        let mut from = start;
        while from > 0 && self.chars[from - 1] == ' ' {
            from -= 1;
        }
        while from > 0 && self.chars[from - 1] != ' ' {
            from -= 1;
        }
        if from == start {
            return false;
        }
        self.chars.drain(from..start);
        self.cursor = from;
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }
}
