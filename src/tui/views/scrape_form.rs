//! Scrape Sinta job form.

use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};
use tokio::sync::mpsc;

use crate::core::jobs::{ScrapeSintaRequest, ValidationError, CATEGORIES, SINTA_RANKS};
use crate::core::lifecycle::SubmitState;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

const CATEGORIES_PER_ROW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScrapeField {
    Ranks,
    Categories,
    MaxPages,
    CollectionName,
    Overwrite,
    Submit,
}

impl ScrapeField {
    const ALL: [ScrapeField; 6] = [
        ScrapeField::Ranks,
        ScrapeField::Categories,
        ScrapeField::MaxPages,
        ScrapeField::CollectionName,
        ScrapeField::Overwrite,
        ScrapeField::Submit,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1).min(Self::ALL.len() - 1)]
    }

    fn prev(self) -> Self {
        Self::ALL[self.position().saturating_sub(1)]
    }

    fn is_text(self) -> bool {
        matches!(self, ScrapeField::MaxPages | ScrapeField::CollectionName)
    }
}

/// Result of a key press inside the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormInput {
    Ignored,
    Consumed,
    Submit,
}

pub struct ScrapeFormState {
    /// Ranks, categories and overwrite live here; text fields are separate.
    request: ScrapeSintaRequest,
    max_pages: InputBuffer,
    collection_name: InputBuffer,
    field: ScrapeField,
    rank_cursor: usize,
    category_cursor: usize,
    submit: SubmitState,
    result_tx: mpsc::UnboundedSender<Result<String, String>>,
    result_rx: mpsc::UnboundedReceiver<Result<String, String>>,
}

impl Default for ScrapeFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapeFormState {
    pub fn new() -> Self {
        let request = ScrapeSintaRequest::default();
        let max_pages = InputBuffer::digits().with_text(&request.max_pages.to_string());
        let collection_name = InputBuffer::new().with_text(&request.collection_name);
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            request,
            max_pages,
            collection_name,
            field: ScrapeField::Ranks,
            rank_cursor: 0,
            category_cursor: 0,
            submit: SubmitState::default(),
            result_tx,
            result_rx,
        }
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    /// The request the current fields describe, or the first failing check.
    pub fn validated(&self) -> Result<ScrapeSintaRequest, ValidationError> {
        let mut request = self.request.clone();
        request.max_pages = self.max_pages.parse_u32().unwrap_or(0);
        request.collection_name = self.collection_name.text().trim().to_string();
        request.validate()?;
        Ok(request)
    }

    pub fn can_submit(&self) -> bool {
        !self.submit.is_in_flight() && self.validated().is_ok()
    }

    /// Send the job. Does nothing while invalid or already in flight.
    pub fn submit(&mut self, services: &Services) {
        if self.submit.is_in_flight() {
            return;
        }
        let request = match self.validated() {
            Ok(request) => request,
            Err(e) => {
                log::debug!("Scrape form not submitted: {e}");
                return;
            }
        };
        self.submit.begin();
        log::info!(
            "Submitting Sinta scrape into {} (ranks {:?}, {} pages)",
            request.collection_name,
            request.sinta_ranks,
            request.max_pages
        );

        let api = Arc::clone(&services.api);
        let tx = self.result_tx.clone();
        tokio::spawn(async move {
            let result = api
                .submit_scrape(&request)
                .await
                .map(|reply| reply.message)
                .map_err(|e| {
                    log::warn!("Scrape submission failed: {e}");
                    e.operator_message()
                });
            let _ = tx.send(result);
        });
    }

    pub fn poll(&mut self) {
        while let Ok(result) = self.result_rx.try_recv() {
            self.submit.finish(result);
        }
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        match self.handle_key(key) {
            FormInput::Ignored => false,
            FormInput::Consumed => true,
            FormInput::Submit => {
                self.submit(services);
                true
            }
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> FormInput {
        match key.code {
            KeyCode::Up => {
                self.field = self.field.prev();
                return FormInput::Consumed;
            }
            KeyCode::Down => {
                self.field = self.field.next();
                return FormInput::Consumed;
            }
            KeyCode::Enter if key.modifiers == KeyModifiers::NONE => return FormInput::Submit,
            _ => {}
        }

        if self.field.is_text() {
            let buffer = match self.field {
                ScrapeField::MaxPages => &mut self.max_pages,
                _ => &mut self.collection_name,
            };
            return if buffer.handle_key(key) {
                FormInput::Consumed
            } else {
                FormInput::Ignored
            };
        }

        if key.modifiers != KeyModifiers::NONE {
            return FormInput::Ignored;
        }

        let ranks = SINTA_RANKS.count();
        match (self.field, key.code) {
            (_, KeyCode::Char('k')) => self.field = self.field.prev(),
            (_, KeyCode::Char('j')) => self.field = self.field.next(),
            (ScrapeField::Ranks, KeyCode::Left | KeyCode::Char('h')) => {
                self.rank_cursor = self.rank_cursor.saturating_sub(1);
            }
            (ScrapeField::Ranks, KeyCode::Right | KeyCode::Char('l')) => {
                self.rank_cursor = (self.rank_cursor + 1).min(ranks - 1);
            }
            (ScrapeField::Ranks, KeyCode::Char(' ')) => {
                let rank = *SINTA_RANKS.start() + self.rank_cursor as u8;
                self.request.toggle_rank(rank);
            }
            (ScrapeField::Categories, KeyCode::Left | KeyCode::Char('h')) => {
                self.category_cursor = self.category_cursor.saturating_sub(1);
            }
            (ScrapeField::Categories, KeyCode::Right | KeyCode::Char('l')) => {
                self.category_cursor = (self.category_cursor + 1).min(CATEGORIES.len() - 1);
            }
            (ScrapeField::Categories, KeyCode::Char(' ')) => {
                self.request.toggle_category(CATEGORIES[self.category_cursor].id);
            }
            (ScrapeField::Overwrite, KeyCode::Char(' ')) => {
                self.request.overwrite = !self.request.overwrite;
            }
            (ScrapeField::Submit, KeyCode::Char(' ')) => return FormInput::Submit,
            _ => return FormInput::Ignored,
        }
        FormInput::Consumed
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_focused("Scrape Sinta");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(self.lines()).wrap(Wrap { trim: false }),
            inner,
        );
    }

    fn label(&self, field: ScrapeField, text: &str) -> Line<'static> {
        let focused = self.field == field;
        let marker = if focused { "▸" } else { " " };
        let style = if focused {
            theme::title()
        } else {
            theme::heading()
        };
        Line::from(vec![
            Span::styled(format!(" {marker} "), theme::title()),
            Span::styled(text.to_string(), style),
        ])
    }

    fn checkbox(checked: bool, text: &str, under_cursor: bool) -> Span<'static> {
        let mark = if checked { "[x]" } else { "[ ]" };
        let style = match (under_cursor, checked) {
            (true, _) => theme::highlight(),
            (false, true) => Style::default().fg(theme::SUCCESS),
            (false, false) => theme::muted(),
        };
        Span::styled(format!("{mark} {text}"), style)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                "  Scrape journals from Sinta into a new collection.",
                theme::muted(),
            )),
            Line::raw(""),
        ];

        lines.push(self.label(ScrapeField::Ranks, "Sinta ranks"));
        let mut ranks = vec![Span::raw("     ")];
        for (i, rank) in SINTA_RANKS.enumerate() {
            let cursor = self.field == ScrapeField::Ranks && self.rank_cursor == i;
            ranks.push(Self::checkbox(
                self.request.sinta_ranks.contains(&rank),
                &format!("S{rank}"),
                cursor,
            ));
            ranks.push(Span::raw("  "));
        }
        lines.push(Line::from(ranks));
        lines.push(Line::raw(""));

        lines.push(self.label(ScrapeField::Categories, "Subject areas (optional)"));
        for (row, chunk) in CATEGORIES.chunks(CATEGORIES_PER_ROW).enumerate() {
            let mut spans = vec![Span::raw("     ")];
            for (col, category) in chunk.iter().enumerate() {
                let i = row * CATEGORIES_PER_ROW + col;
                let cursor = self.field == ScrapeField::Categories && self.category_cursor == i;
                spans.push(Self::checkbox(
                    self.request.filter_area_codes.contains(&category.id),
                    &format!("{:<12}", category.name),
                    cursor,
                ));
                spans.push(Span::raw(" "));
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));

        let mut max_pages = vec![Span::styled("     ", theme::muted())];
        max_pages.extend(self.max_pages.spans(self.field == ScrapeField::MaxPages));
        lines.push(self.label(ScrapeField::MaxPages, "Max pages"));
        lines.push(Line::from(max_pages));
        lines.push(Line::raw(""));

        let mut name = vec![Span::styled("     ", theme::muted())];
        name.extend(self.collection_name.spans(self.field == ScrapeField::CollectionName));
        lines.push(self.label(ScrapeField::CollectionName, "Collection name"));
        lines.push(Line::from(name));
        lines.push(Line::raw(""));

        lines.push(Line::from(vec![
            Span::styled(
                format!(" {} ", if self.field == ScrapeField::Overwrite { "▸" } else { " " }),
                theme::title(),
            ),
            Self::checkbox(
                self.request.overwrite,
                "Overwrite existing collection",
                self.field == ScrapeField::Overwrite,
            ),
        ]));
        lines.push(Line::raw(""));

        lines.push(self.submit_line());
        if let Err(e) = self.validated() {
            lines.push(Line::from(Span::styled(
                format!("     {e}"),
                Style::default().fg(theme::WARNING),
            )));
        }
        if let Some((ok, text)) = self.submit.banner() {
            let style = if ok {
                theme::success_banner()
            } else {
                theme::error_banner()
            };
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(format!(" {text} "), style)));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::styled(" ↑/↓", theme::key_hint()),
            Span::raw(":field "),
            Span::styled("←/→", theme::key_hint()),
            Span::raw(":move "),
            Span::styled("Space", theme::key_hint()),
            Span::raw(":toggle "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":submit"),
        ]));
        lines
    }

    fn submit_line(&self) -> Line<'static> {
        let focused = self.field == ScrapeField::Submit;
        let marker = if focused { "▸" } else { " " };
        let (text, style) = if self.submit.is_in_flight() {
            ("[ Submitting... ]", theme::muted())
        } else if self.can_submit() {
            let style = Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD);
            ("[ Start scraping ]", if focused { theme::highlight() } else { style })
        } else {
            ("[ Start scraping ]", theme::dim())
        };
        Line::from(vec![
            Span::styled(format!(" {marker} "), theme::title()),
            Span::styled(text, style),
        ])
    }
}
