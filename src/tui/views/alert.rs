//! Blocking alert dialog, dismissed with Enter or Esc.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::centered_rect;
use crate::tui::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub level: AlertLevel,
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Success,
            title: "Done".to_string(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: AlertLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    /// Whether `key` dismisses the alert. Every other key is swallowed.
    pub fn dismisses(key: &KeyEvent) -> bool {
        matches!(key.code, KeyCode::Enter | KeyCode::Esc)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(50, 30, area);
        let (color, icon) = match self.level {
            AlertLevel::Success => (theme::SUCCESS, "✓"),
            AlertLevel::Error => (theme::ERROR, "✗"),
        };

        let block = theme::block_modal(&self.title, color);
        let lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::styled(format!(" {icon} "), Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(self.message.clone(), Style::default().fg(theme::TEXT)),
            ]),
            Line::raw(""),
            Line::from(vec![
                Span::raw(" Press "),
                Span::styled("Enter", theme::key_hint()),
                Span::raw(" or "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(" to dismiss"),
            ]),
        ];

        frame.render_widget(Clear, modal);
        frame.render_widget(
            Paragraph::new(lines)
                .block(block)
                .wrap(Wrap { trim: false }),
            modal,
        );
    }
}
