//! Search Garuda job form.
//!
//! The source picker offers only journal collections, refreshed whenever the
//! view gains focus. The first one is preselected.

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

use crate::core::collection::{classify, title_case, Variant};
use crate::core::jobs::{SearchGarudaRequest, ValidationError};
use crate::core::lifecycle::SubmitState;
use crate::tui::services::Services;
use crate::tui::theme;
use crate::tui::widgets::input_buffer::InputBuffer;

use super::scrape_form::FormInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchField {
    Query,
    Source,
    Submit,
}

impl SearchField {
    fn next(self) -> Self {
        match self {
            SearchField::Query => SearchField::Source,
            _ => SearchField::Submit,
        }
    }

    fn prev(self) -> Self {
        match self {
            SearchField::Submit => SearchField::Source,
            _ => SearchField::Query,
        }
    }
}

enum SearchEvent {
    Sources(Result<Vec<String>, String>),
    Submitted(Result<String, String>),
}

pub struct SearchFormState {
    query: InputBuffer,
    sources: Vec<String>,
    source_idx: Option<usize>,
    loading_sources: bool,
    sources_error: Option<String>,
    field: SearchField,
    submit: SubmitState,
    event_tx: mpsc::UnboundedSender<SearchEvent>,
    event_rx: mpsc::UnboundedReceiver<SearchEvent>,
}

impl Default for SearchFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchFormState {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            query: InputBuffer::new(),
            sources: Vec::new(),
            source_idx: None,
            loading_sources: false,
            sources_error: None,
            field: SearchField::Query,
            submit: SubmitState::default(),
            event_tx,
            event_rx,
        }
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn selected_source(&self) -> Option<&str> {
        self.source_idx
            .and_then(|i| self.sources.get(i))
            .map(String::as_str)
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    /// Fetch the journal collections offered as sources.
    pub fn load(&mut self, services: &Services) {
        if self.loading_sources {
            return;
        }
        self.loading_sources = true;

        let api = Arc::clone(&services.api);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.list_collections().await.map_err(|e| {
                log::warn!("Failed to load source collections: {e}");
                e.operator_message()
            });
            let _ = tx.send(SearchEvent::Sources(result));
        });
    }

    /// Replace the source choices, keeping the current pick when it survives.
    fn set_sources(&mut self, names: Vec<String>) {
        let previous = self.selected_source().map(str::to_string);
        self.sources = names
            .into_iter()
            .filter(|name| classify(name) == Variant::Journal)
            .collect();
        self.source_idx = previous
            .and_then(|p| self.sources.iter().position(|s| *s == p))
            .or(if self.sources.is_empty() { None } else { Some(0) });
    }

    pub fn validated(&self) -> Result<SearchGarudaRequest, ValidationError> {
        let request = SearchGarudaRequest {
            query: self.query.text().trim().to_string(),
            source_collection: self.selected_source().unwrap_or_default().to_string(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn can_submit(&self) -> bool {
        !self.submit.is_in_flight() && self.validated().is_ok()
    }

    pub fn submit(&mut self, services: &Services) {
        if self.submit.is_in_flight() {
            return;
        }
        let request = match self.validated() {
            Ok(request) => request,
            Err(e) => {
                log::debug!("Search form not submitted: {e}");
                return;
            }
        };
        self.submit.begin();
        log::info!(
            "Submitting Garuda search {:?} from {}",
            request.query,
            request.source_collection
        );

        let api = Arc::clone(&services.api);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api
                .submit_search(&request)
                .await
                .map(|reply| reply.message)
                .map_err(|e| {
                    log::warn!("Search submission failed: {e}");
                    e.operator_message()
                });
            let _ = tx.send(SearchEvent::Submitted(result));
        });
    }

    pub fn poll(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                SearchEvent::Sources(result) => {
                    self.loading_sources = false;
                    match result {
                        Ok(names) => {
                            self.sources_error = None;
                            self.set_sources(names);
                        }
                        Err(cause) => self.sources_error = Some(cause),
                    }
                }
                SearchEvent::Submitted(result) => self.submit.finish(result),
            }
        }
    }

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }
        if self.field == SearchField::Source
            && key.modifiers == KeyModifiers::NONE
            && key.code == KeyCode::Char('r')
        {
            self.load(services);
            return true;
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

    fn cycle_source(&mut self, forward: bool) {
        let len = self.sources.len();
        if len == 0 {
            return;
        }
        let current = self.source_idx.unwrap_or(0);
        self.source_idx = Some(if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        });
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

        if self.field == SearchField::Query {
            return if self.query.handle_key(key) {
                FormInput::Consumed
            } else {
                FormInput::Ignored
            };
        }

        if key.modifiers != KeyModifiers::NONE {
            return FormInput::Ignored;
        }
        match (self.field, key.code) {
            (_, KeyCode::Char('k')) => self.field = self.field.prev(),
            (_, KeyCode::Char('j')) => self.field = self.field.next(),
            (SearchField::Source, KeyCode::Left | KeyCode::Char('h')) => self.cycle_source(false),
            (SearchField::Source, KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ')) => {
                self.cycle_source(true)
            }
            (SearchField::Submit, KeyCode::Char(' ')) => return FormInput::Submit,
            _ => return FormInput::Ignored,
        }
        FormInput::Consumed
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_focused("Search Garuda");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(
            Paragraph::new(self.lines()).wrap(Wrap { trim: false }),
            inner,
        );
    }

    fn marker(&self, field: SearchField) -> Span<'static> {
        let marker = if self.field == field { "▸" } else { " " };
        Span::styled(format!(" {marker} "), theme::title())
    }

    fn label_style(&self, field: SearchField) -> Style {
        if self.field == field {
            theme::title()
        } else {
            theme::heading()
        }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(
                "  Search Garuda for articles from a scraped journal collection.",
                theme::muted(),
            )),
            Line::raw(""),
            Line::from(vec![
                self.marker(SearchField::Query),
                Span::styled("Search query", self.label_style(SearchField::Query)),
            ]),
        ];

        let mut query = vec![Span::raw("     ")];
        query.extend(self.query.spans(self.field == SearchField::Query));
        lines.push(Line::from(query));
        lines.push(Line::raw(""));

        lines.push(Line::from(vec![
            self.marker(SearchField::Source),
            Span::styled("Source collection", self.label_style(SearchField::Source)),
        ]));
        lines.push(self.source_line());
        lines.push(Line::raw(""));

        let focused = self.field == SearchField::Submit;
        let (text, style) = if self.submit.is_in_flight() {
            ("[ Searching... ]", theme::muted())
        } else if self.can_submit() {
            let style = Style::default().fg(theme::PRIMARY_LIGHT).add_modifier(Modifier::BOLD);
            ("[ Start search ]", if focused { theme::highlight() } else { style })
        } else {
            ("[ Start search ]", theme::dim())
        };
        lines.push(Line::from(vec![
            self.marker(SearchField::Submit),
            Span::styled(text, style),
        ]));

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
            Span::raw(":source "),
            Span::styled("r", theme::key_hint()),
            Span::raw(":reload sources "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":submit"),
        ]));
        lines
    }

    fn source_line(&self) -> Line<'static> {
        if self.loading_sources {
            return Line::from(Span::styled("     Loading collections...", theme::muted()));
        }
        if let Some(error) = &self.sources_error {
            return Line::from(Span::styled(format!("     {error}"), theme::error_banner()));
        }
        match self.selected_source() {
            None => Line::from(Span::styled(
                "     No journal collections yet. Run a Sinta scrape first.",
                theme::muted(),
            )),
            Some(name) => {
                let position = self.source_idx.unwrap_or(0) + 1;
                let style = if self.field == SearchField::Source {
                    theme::highlight()
                } else {
                    Style::default().fg(theme::TEXT)
                };
                Line::from(vec![
                    Span::styled("     ◂ ", theme::muted()),
                    Span::styled(title_case(name), style),
                    Span::styled(" ▸", theme::muted()),
                    Span::styled(
                        format!("  ({position}/{})", self.sources.len()),
                        theme::dim(),
                    ),
                ])
            }
        }
    }
}
