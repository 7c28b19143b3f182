use crate::input::Key;

/// Single-line substring query that narrows a page's visible rows.
#[derive(Clone, Debug, Default)]
pub struct FilterBox {
    prefix: String,
    text: String,
    focused: bool,
}

impl FilterBox {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn focused(&self) -> bool {
        self.focused
    }

    /// Non-empty text is narrowing the view, focused or not.
    pub fn applied(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Stops capturing keys; the text stays applied.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn blur_and_clear(&mut self) {
        self.focused = false;
        self.text.clear();
    }

    /// Feeds a key to the box. Returns true when the filter text changed.
    /// Keys are ignored unless the box is focused.
    pub fn handle_key(&mut self, key: Key) -> bool {
        if !self.focused {
            return false;
        }
        match key {
            Key::Char(c) => {
                self.text.push(c);
                true
            }
            Key::Backspace => self.text.pop().is_some(),
            Key::Enter | Key::Tab => {
                self.blur();
                false
            }
            Key::Esc => {
                let changed = self.applied();
                self.blur_and_clear();
                changed
            }
            _ => false,
        }
    }
}
