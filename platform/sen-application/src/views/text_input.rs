/// Single-line editable text with a character cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    pub value: String,
    /// Cursor position in characters, not bytes.
    pub cursor: usize,
}

impl TextInput {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.chars().count();
        Self { value, cursor }
    }

    pub fn set(&mut self, value: impl Into<String>) {
        *self = Self::new(value);
    }

    pub fn insert_char(&mut self, ch: char) {
        let idx = self.byte_index();
        self.value.insert(idx, ch);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.value.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.value.chars().count() {
            return;
        }
        let idx = self.byte_index();
        self.value.remove(idx);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(idx, _)| idx)
            .unwrap_or(self.value.len())
    }
}

#[cfg(test)]
mod tests {
    use super::TextInput;

    #[test]
    fn edits_at_cursor() {
        let mut input = TextInput::new("15");
        input.move_left();
        input.insert_char('0');
        assert_eq!(input.value, "105");
        input.backspace();
        input.backspace();
        assert_eq!(input.value, "5");
        assert_eq!(input.cursor, 0);
        input.backspace();
        assert_eq!(input.value, "5");
        input.delete();
        assert_eq!(input.value, "");
    }

    #[test]
    fn multibyte_characters_do_not_split() {
        let mut input = TextInput::new("€1");
        input.move_left();
        input.move_left();
        input.delete();
        assert_eq!(input.value, "1");
        input.insert_char('ü');
        assert_eq!(input.value, "ü1");
        assert_eq!(input.cursor, 1);
    }
}
