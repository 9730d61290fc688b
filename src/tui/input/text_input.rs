//! Text input field handling.

use rust_decimal::Decimal;
use unicode_width::UnicodeWidthStr;

use crate::market::format::parse_displayed;

/// Which characters a field accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InputKind {
    /// Any character (search boxes).
    #[default]
    Text,
    /// Digits, one decimal point and thousands separators (sizes, prices).
    Decimal,
}

/// State for a single-line text input field.
#[derive(Clone, Debug, Default)]
pub struct TextInput {
    /// The current text content.
    content: String,
    /// Cursor position (character index).
    cursor: usize,
    kind: InputKind,
}

impl TextInput {
    /// Creates a new empty text input accepting `kind` characters.
    pub fn new(kind: InputKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Inserts a character at the cursor position if the field accepts it.
    ///
    /// Returns `false` when the character was rejected.
    pub fn insert(&mut self, c: char) -> bool {
        if !self.accepts(c) {
            return false;
        }
        let at = self.byte_index();
        self.content.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Deletes the character before the cursor (backspace).
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    /// Deletes the character at the cursor position (delete).
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_index();
            self.content.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Takes the content and resets the input.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.content)
    }

    /// Replaces the content and moves the cursor to the end.
    pub fn set(&mut self, text: &str) {
        self.content = text.chars().filter(|c| self.accepts(*c)).collect();
        self.cursor = self.char_len();
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Terminal column of the cursor, counting wide characters as two.
    pub fn cursor_column(&self) -> u16 {
        let width = self.content[..self.byte_index()].width();
        u16::try_from(width).unwrap_or(u16::MAX)
    }

    /// Parses the content as a non-negative decimal.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::InvalidInput`](crate::DeskError::InvalidInput)
    /// if the content is empty or not a number.
    pub fn decimal(&self) -> crate::Result<Decimal> {
        parse_displayed(&self.content)
    }

    fn accepts(&self, c: char) -> bool {
        match self.kind {
            InputKind::Text => !c.is_control(),
            InputKind::Decimal => {
                c.is_ascii_digit() || c == ',' || (c == '.' && !self.content.contains('.'))
            }
        }
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_index(&self) -> usize {
        self.content
            .char_indices()
            .nth(self.cursor)
            .map_or(self.content.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decimal_field_filters_characters() {
        let mut input = TextInput::new(InputKind::Decimal);
        for c in "1a2.5.0x".chars() {
            input.insert(c);
        }
        assert_eq!(input.as_str(), "12.50");
        assert_eq!(input.decimal().unwrap(), dec!(12.50));
    }

    #[test]
    fn editing_in_the_middle() {
        let mut input = TextInput::new(InputKind::Text);
        input.set("BTC");
        input.move_home();
        input.move_right();
        input.insert('é');
        assert_eq!(input.as_str(), "BéTC");
        input.backspace();
        input.delete();
        assert_eq!(input.as_str(), "BC");
        input.move_end();
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn wide_characters_take_two_columns() {
        let mut input = TextInput::new(InputKind::Text);
        input.set("日本x");
        assert_eq!(input.cursor(), 3);
        assert_eq!(input.cursor_column(), 5);
        input.move_left();
        assert_eq!(input.cursor_column(), 4);
    }

    #[test]
    fn take_clears() {
        let mut input = TextInput::new(InputKind::Decimal);
        input.set("1,000");
        assert_eq!(input.take(), "1,000");
        assert!(input.is_empty());
        assert!(input.decimal().is_err());
    }
}
