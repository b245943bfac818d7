//! Keyboard, hidden text input and cursor state forwarded by the host.

use std::fmt;

/// Keys the stage reacts to. Printable text arrives through
/// [`Stage::type_text`](super::Stage::type_text).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Backspace,
    Tab,
    Other,
}

/// Cursor the host should show over the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CursorIcon {
    #[default]
    Default,
    Pointer,
    Move,
    Grab,
    Grabbing,
    Text,
    Crosshair,
}

impl CursorIcon {
    /// CSS cursor keyword.
    pub fn as_css(&self) -> &'static str {
        match self {
            CursorIcon::Default => "default",
            CursorIcon::Pointer => "pointer",
            CursorIcon::Move => "move",
            CursorIcon::Grab => "grab",
            CursorIcon::Grabbing => "grabbing",
            CursorIcon::Text => "text",
            CursorIcon::Crosshair => "crosshair",
        }
    }
}

impl fmt::Display for CursorIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}

/// Off-screen text field used while a text layer is being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    focused: bool,
}

impl TextInput {
    pub fn focus(&mut self, value: &str) {
        self.value = value.to_string();
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn insert(&mut self, text: &str) {
        self.value.push_str(text);
    }

    /// Removes the last character. Returns whether anything was removed.
    pub fn backspace(&mut self) -> bool {
        self.value.pop().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_editing() {
        let mut input = TextInput::default();
        input.focus("ab");
        input.insert("ç");
        assert_eq!(input.value(), "abç");
        assert!(input.backspace());
        assert_eq!(input.value(), "ab");
        input.blur();
        assert!(!input.is_focused());
    }

    #[test]
    fn test_backspace_on_empty() {
        let mut input = TextInput::default();
        assert!(!input.backspace());
    }
}
