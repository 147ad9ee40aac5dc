//! Collection detail modal: one collapsible row per document.
//!
//! `j/k` move between rows, `Enter`/`Space` expand or collapse, `Tab` walks
//! the links inside the selected expanded row and `o` opens the chosen one.
//! `J/K` scroll the nested article list. `Esc` closes.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::collection::{spaced, Variant};
use crate::core::detail::{CollectionDetail, DetailState, FetchTicket, LOAD_FAILED};
use crate::core::records::parse_documents;
use crate::core::rows::{FieldValue, LinkTarget, Row};
use crate::tui::app::centered_rect;
use crate::tui::services::Services;
use crate::tui::theme;

/// Articles visible at once in an expanded group.
pub const ARTICLE_WINDOW: usize = 6;

struct DetailLoaded {
    ticket: FetchTicket,
    result: Result<Vec<Value>, String>,
}

pub struct DetailModal {
    detail: CollectionDetail,
    selected: usize,
    link_cursor: Option<usize>,
    article_offset: usize,
    task: Option<JoinHandle<()>>,
    data_tx: mpsc::UnboundedSender<DetailLoaded>,
    data_rx: mpsc::UnboundedReceiver<DetailLoaded>,
}

impl Default for DetailModal {
    fn default() -> Self {
        Self::new()
    }
}

impl DetailModal {
    pub fn new() -> Self {
        let (data_tx, data_rx) = mpsc::unbounded_channel();
        Self {
            detail: CollectionDetail::new(),
            selected: 0,
            link_cursor: None,
            article_offset: 0,
            task: None,
            data_tx,
            data_rx,
        }
    }

    pub fn is_open(&self) -> bool {
        self.detail.is_open()
    }

    pub fn detail(&self) -> &CollectionDetail {
        &self.detail
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn link_cursor(&self) -> Option<usize> {
        self.link_cursor
    }

    pub fn article_offset(&self) -> usize {
        self.article_offset
    }

    /// Fetch `name` fresh, superseding any earlier open.
    pub fn open(&mut self, name: &str, services: &Services) {
        let Some(ticket) = self.detail.open(name) else {
            return;
        };
        self.abort_task();
        self.reset_cursor();

        let api = Arc::clone(&services.api);
        let tx = self.data_tx.clone();
        let name = name.to_string();
        self.task = Some(tokio::spawn(async move {
            let result = api
                .export_collection(&name)
                .await
                .and_then(|body| parse_documents(&body))
                .map_err(|e| {
                    log::warn!("Failed to load collection {name}: {e}");
                    e.operator_message()
                });
            let _ = tx.send(DetailLoaded { ticket, result });
        }));
    }

    pub fn close(&mut self) {
        self.abort_task();
        self.detail.close();
        self.reset_cursor();
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn reset_cursor(&mut self) {
        self.selected = 0;
        self.link_cursor = None;
        self.article_offset = 0;
    }

    pub fn poll(&mut self) {
        while let Ok(DetailLoaded { ticket, result }) = self.data_rx.try_recv() {
            if self.detail.resolve(ticket, result) {
                self.task = None;
                self.reset_cursor();
            }
        }
    }

    fn selected_row(&self) -> Option<Row> {
        self.detail.rows().into_iter().nth(self.selected)
    }

    fn select(&mut self, index: usize) {
        let count = self.detail.row_count();
        if count == 0 {
            return;
        }
        let index = index.min(count - 1);
        if index != self.selected {
            self.selected = index;
            self.link_cursor = None;
            self.article_offset = 0;
        }
    }

    pub fn toggle_selected(&mut self) {
        self.detail.toggle(self.selected);
        self.link_cursor = None;
        self.article_offset = 0;
    }

    /// Links reachable from the selected row, empty while it is collapsed.
    pub fn selected_links(&self) -> Vec<LinkTarget> {
        if !self.detail.is_expanded(self.selected) {
            return Vec::new();
        }
        self.selected_row().map(|row| row.links()).unwrap_or_default()
    }

    fn cycle_link(&mut self, forward: bool) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let links = self.selected_links();
        if links.is_empty() {
            return;
        }
        let len = links.len();
        let next = match (self.link_cursor, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };
        self.link_cursor = Some(next);

        // keep a selected download inside the article window
        let field_links = row
            .fields
            .iter()
            .filter(|f| matches!(f.value, FieldValue::Link(_)))
            .count();
        if next >= field_links {
            if let Some(position) = row
                .articles
                .iter()
                .enumerate()
                .filter(|(_, a)| a.download_link.is_some())
                .nth(next - field_links)
                .map(|(i, _)| i)
            {
                if position < self.article_offset {
                    self.article_offset = position;
                } else if position >= self.article_offset + ARTICLE_WINDOW {
                    self.article_offset = position + 1 - ARTICLE_WINDOW;
                }
            }
        }
    }

    fn scroll_articles(&mut self, down: bool) {
        if !self.detail.is_expanded(self.selected) {
            return;
        }
        let total = self.selected_row().map_or(0, |r| r.articles.len());
        let max = total.saturating_sub(ARTICLE_WINDOW);
        self.article_offset = if down {
            (self.article_offset + 1).min(max)
        } else {
            self.article_offset.saturating_sub(1)
        };
    }

    /// The link `o` would open: the link cursor, else the row's first link.
    pub fn active_link(&self) -> Option<LinkTarget> {
        let links = self.selected_links();
        let index = self.link_cursor.unwrap_or(0);
        links.into_iter().nth(index)
    }

    /// Handle a key while the modal is open. All keys are consumed.
    pub fn handle_key(&mut self, key: &KeyEvent, services: &Services) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.close(),
            KeyCode::Down | KeyCode::Char('j') => self.select(self.selected + 1),
            KeyCode::Up | KeyCode::Char('k') => self.select(self.selected.saturating_sub(1)),
            KeyCode::Home | KeyCode::Char('g') => self.select(0),
            KeyCode::End | KeyCode::Char('G') => self.select(usize::MAX),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Tab => self.cycle_link(true),
            KeyCode::BackTab => self.cycle_link(false),
            KeyCode::PageDown | KeyCode::Char('J') => self.scroll_articles(true),
            KeyCode::PageUp | KeyCode::Char('K') => self.scroll_articles(false),
            KeyCode::Char('o') => {
                if let Some(link) = self.active_link() {
                    services.open_link(&link.url);
                }
            }
            _ => {}
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let Some(name) = self.detail.name() else {
            return;
        };
        let variant = self.detail.variant().unwrap_or(Variant::Journal);

        let modal = centered_rect(80, 85, area);
        frame.render_widget(Clear, modal);

        let title = spaced(name);
        let block = theme::block_modal(&title, theme::variant_color(variant));
        let inner = block.inner(modal);
        frame.render_widget(block, modal);

        let [header, body, footer] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.render_header(frame, header, variant);

        match self.detail.state() {
            DetailState::Idle => {}
            DetailState::Loading { .. } => {
                frame.render_widget(
                    Paragraph::new(Line::from(Span::styled("  Loading...", theme::muted()))),
                    body,
                );
            }
            DetailState::Failed { error, .. } => {
                let lines = vec![
                    Line::raw(""),
                    Line::from(Span::styled(format!("  ✗ {LOAD_FAILED}"), theme::error_banner())),
                    Line::from(Span::styled(format!("    {error}"), theme::muted())),
                ];
                frame.render_widget(Paragraph::new(lines), body);
            }
            DetailState::Loaded { .. } => self.render_rows(frame, body),
        }

        let hints = Line::from(vec![
            Span::styled(" j/k", theme::key_hint()),
            Span::raw(":move "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":expand "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":link "),
            Span::styled("o", theme::key_hint()),
            Span::raw(":open "),
            Span::styled("J/K", theme::key_hint()),
            Span::raw(":articles "),
            Span::styled("Esc", theme::key_hint()),
            Span::raw(":close"),
        ]);
        frame.render_widget(Paragraph::new(hints), footer);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, variant: Variant) {
        let mut spans = vec![Span::styled(
            format!(" {} {} ", variant.icon(), variant.label()),
            theme::badge(theme::variant_color(variant)),
        )];
        if let Some(count) = self.detail.count_line() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(count, theme::muted()));
        }
        let lines = vec![
            Line::from(spans),
            Line::from(Span::styled(
                "─".repeat(area.width as usize),
                theme::dim(),
            )),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_rows(&self, frame: &mut Frame, area: Rect) {
        let rows = self.detail.rows();
        if rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "  This collection has no documents.",
                    theme::muted(),
                ))),
                area,
            );
            return;
        }

        let mut lines: Vec<Line<'static>> = Vec::new();
        let mut selected_span = (0usize, 0usize);

        for row in &rows {
            let start = lines.len();
            let is_selected = row.index == self.selected;
            let expanded = self.detail.is_expanded(row.index);
            self.push_row(&mut lines, row, is_selected, expanded);
            if is_selected {
                selected_span = (start, lines.len());
            }
        }

        let visible = area.height as usize;
        let (start, end) = selected_span;
        let scroll = if end > visible {
            (end - visible).min(start)
        } else {
            0
        };

        frame.render_widget(
            Paragraph::new(lines).scroll((scroll.min(u16::MAX as usize) as u16, 0)),
            area,
        );
    }

    fn push_row(&self, lines: &mut Vec<Line<'static>>, row: &Row, is_selected: bool, expanded: bool) {
        let cursor = if is_selected { "▸" } else { " " };
        let arrow = if expanded { "▾" } else { "▹" };
        let title_style = if is_selected {
            theme::highlight()
        } else {
            Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD)
        };

        let mut header = vec![
            Span::styled(format!(" {cursor} "), theme::title()),
            Span::styled(format!("{arrow} "), theme::muted()),
            Span::styled(row.title.clone(), title_style),
        ];
        for badge in &row.badges {
            let color = if badge.starts_with("Sinta") {
                theme::PRIMARY
            } else {
                theme::ARTICLES
            };
            header.push(Span::raw(" "));
            header.push(Span::styled(format!(" {badge} "), theme::badge(color)));
        }
        lines.push(Line::from(header));

        if !expanded {
            return;
        }

        let link_cursor = if is_selected { self.link_cursor } else { None };
        let mut link_index = 0usize;

        for field in &row.fields {
            let value = match &field.value {
                FieldValue::Text(text) => Span::styled(text.clone(), Style::default().fg(theme::TEXT)),
                FieldValue::Link(url) => {
                    let style = if link_cursor == Some(link_index) {
                        theme::link_selected()
                    } else {
                        theme::link()
                    };
                    link_index += 1;
                    Span::styled(url.clone(), style)
                }
            };
            lines.push(Line::from(vec![
                Span::styled(format!("      {}: ", field.label), theme::muted()),
                value,
            ]));
        }

        if row.articles.is_empty() {
            return;
        }

        let offset = if is_selected { self.article_offset } else { 0 };
        let total = row.articles.len();
        lines.push(Line::from(Span::styled(
            format!("      Article List ({total})"),
            theme::heading(),
        )));

        for (position, article) in row.articles.iter().enumerate() {
            let download_index = article.download_link.as_ref().map(|_| {
                let i = link_index;
                link_index += 1;
                i
            });
            if position < offset || position >= offset + ARTICLE_WINDOW {
                continue;
            }

            let mut spans = vec![
                Span::styled(format!("        {:>3}. ", article.number), theme::dim()),
                Span::styled(article.title.clone(), Style::default().fg(theme::TEXT)),
            ];
            if let Some(i) = download_index {
                let style = if link_cursor == Some(i) {
                    theme::link_selected()
                } else {
                    theme::link()
                };
                spans.push(Span::raw("  "));
                spans.push(Span::styled("[download]", style));
            }
            lines.push(Line::from(spans));
        }

        if total > ARTICLE_WINDOW {
            let last = (offset + ARTICLE_WINDOW).min(total);
            lines.push(Line::from(Span::styled(
                format!("        showing {}-{} of {total} (J/K to scroll)", offset + 1, last),
                theme::dim(),
            )));
        }
    }
}

impl Drop for DetailModal {
    fn drop(&mut self) {
        self.abort_task();
    }
}
