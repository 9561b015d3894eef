use crossterm::event::KeyCode;

/// Single-line text field edited in place.
#[derive(Debug, Clone, Default)]
pub struct TextInput {
    pub value: String,
    pub editing: bool,
    /// Restrict input to characters of a decimal number.
    numeric: bool,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn numeric() -> Self {
        Self {
            numeric: true,
            ..Self::default()
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    /// Returns true when the key changed the value.
    pub fn handle_input(&mut self, key: KeyCode) -> bool {
        if !self.editing {
            return false;
        }

        match key {
            KeyCode::Char(c) if !self.numeric || c.is_ascii_digit() || c == '.' || c == ',' => {
                self.value.push(c);
                true
            }
            KeyCode::Backspace => self.value.pop().is_some(),
            _ => false,
        }
    }

    pub fn get_display_string(&self) -> String {
        if self.editing {
            format!("{}|", self.value)
        } else {
            self.value.clone()
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_keys_unless_editing() {
        let mut input = TextInput::new();
        assert!(!input.handle_input(KeyCode::Char('a')));

        input.toggle_editing();
        input.handle_input(KeyCode::Char('a'));
        input.handle_input(KeyCode::Char('b'));
        input.handle_input(KeyCode::Backspace);
        assert_eq!(input.value, "a");
        assert_eq!(input.get_display_string(), "a|");
    }

    #[test]
    fn numeric_input_rejects_letters() {
        let mut input = TextInput::numeric();
        input.toggle_editing();
        for c in "1.5x".chars() {
            input.handle_input(KeyCode::Char(c));
        }
        assert_eq!(input.value, "1.5");
    }
}
