//! Single-line text field used by the job forms.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::theme;

/// Which characters the field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFilter {
    #[default]
    Any,
    Digits,
}

/// A text buffer with a char-indexed cursor.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    chars: Vec<char>,
    cursor: usize,
    filter: InputFilter,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn digits() -> Self {
        Self {
            filter: InputFilter::Digits,
            ..Self::default()
        }
    }

    /// Replace the content and park the cursor at the end.
    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn set_text(&mut self, text: &str) {
        self.chars = text.chars().filter(|c| self.accepts(*c)).collect();
        self.cursor = self.chars.len();
    }

    fn accepts(&self, c: char) -> bool {
        match self.filter {
            InputFilter::Any => !c.is_control(),
            InputFilter::Digits => c.is_ascii_digit(),
        }
    }

    /// Insert at the cursor. Returns false for a rejected character.
    pub fn insert_char(&mut self, c: char) -> bool {
        if !self.accepts(c) {
            return false;
        }
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
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

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    /// True when the content is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.chars.iter().all(|c| c.is_whitespace())
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Parse the content as a number; `None` when empty or out of range.
    pub fn parse_u32(&self) -> Option<u32> {
        self.text().parse().ok()
    }

    /// Apply an editing key. Returns true if the key was consumed.
    ///
    /// Only unmodified or shifted keys are consumed so Ctrl chords keep
    /// their global meaning.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        if !matches!(key.modifiers, KeyModifiers::NONE | KeyModifiers::SHIFT) {
            return false;
        }
        match key.code {
            KeyCode::Char(c) => {
                self.insert_char(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.move_left();
                true
            }
            KeyCode::Right => {
                self.move_right();
                true
            }
            KeyCode::Home => {
                self.move_home();
                true
            }
            KeyCode::End => {
                self.move_end();
                true
            }
            _ => false,
        }
    }

    /// Spans for rendering, with a block cursor when focused.
    pub fn spans(&self, focused: bool) -> Vec<Span<'static>> {
        let text_style = Style::default().fg(theme::TEXT);
        if !focused {
            return vec![Span::styled(self.text(), text_style)];
        }

        let before: String = self.chars[..self.cursor].iter().collect();
        let at = self
            .chars
            .get(self.cursor)
            .map(|c| c.to_string())
            .unwrap_or_else(|| " ".to_string());
        let after: String = self
            .chars
            .get(self.cursor + 1..)
            .map(|rest| rest.iter().collect())
            .unwrap_or_default();

        vec![
            Span::styled(before, text_style),
            Span::styled(at, text_style.add_modifier(Modifier::REVERSED)),
            Span::styled(after, text_style),
        ]
    }
}
