//! Password prompt guarding collection deletion.
//!
//! Wraps [`DeletionFlow`] with key handling and a masked input. `Enter`
//! submits once a password is typed, `Esc` cancels. While the request is in
//! flight the prompt stays up and ignores input.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::core::api::ApiError;
use crate::core::collection::title_case;
use crate::core::deletion::{DeletionFlow, DeletionOutcome, DeletionRequest};
use crate::tui::app::centered_rect;
use crate::tui::theme;

pub enum PromptInput {
    Consumed,
    Cancelled,
    Submit(DeletionRequest),
}

#[derive(Debug, Default)]
pub struct PasswordPrompt {
    flow: DeletionFlow,
}

impl PasswordPrompt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.flow.is_open()
    }

    pub fn is_submitting(&self) -> bool {
        self.flow.is_submitting()
    }

    pub fn target(&self) -> Option<&str> {
        self.flow.target()
    }

    pub fn open(&mut self, target: &str) -> bool {
        self.flow.open(target)
    }

    pub fn resolve(&mut self, result: Result<(), ApiError>) -> Option<DeletionOutcome> {
        self.flow.resolve(result)
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> PromptInput {
        if self.flow.is_submitting() {
            return PromptInput::Consumed;
        }
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc) => {
                self.flow.cancel();
                PromptInput::Cancelled
            }
            (_, KeyCode::Enter) => match self.flow.submit() {
                Some(request) => PromptInput::Submit(request),
                None => PromptInput::Consumed,
            },
            (_, KeyCode::Backspace) => {
                self.flow.backspace();
                PromptInput::Consumed
            }
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.flow.push_char(c);
                PromptInput::Consumed
            }
            _ => PromptInput::Consumed,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(target) = self.flow.target() else {
            return;
        };
        let modal = centered_rect(50, 35, area);
        frame.render_widget(Clear, modal);

        let block = theme::block_modal("Delete Collection", theme::ERROR);

        let masked = "•".repeat(self.flow.password_len());
        let input_line = if self.flow.is_submitting() {
            Line::from(Span::styled("  Deleting...", theme::muted()))
        } else {
            Line::from(vec![
                Span::styled("  Password: ", theme::muted()),
                Span::styled(masked, Style::default().fg(theme::TEXT)),
                Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)),
            ])
        };

        let submit_style = if self.flow.can_submit() {
            Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD)
        } else {
            theme::dim()
        };

        let lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::raw("  Delete "),
                Span::styled(
                    title_case(target),
                    Style::default().fg(theme::ACCENT).add_modifier(Modifier::BOLD),
                ),
                Span::raw("?"),
            ]),
            Line::from(Span::styled(
                "  This removes every document in the collection.",
                theme::muted(),
            )),
            Line::raw(""),
            input_line,
            Line::raw(""),
            Line::from(vec![
                Span::raw("  "),
                Span::styled("Enter", submit_style),
                Span::raw(" delete  "),
                Span::styled("Esc", theme::key_hint()),
                Span::raw(" cancel"),
            ]),
        ];

        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            modal,
        );
    }
}
