//! Collections view: the explorer's entry point.
//!
//! Lists backend collections split into journal and article sections, and
//! dispatches export, delete and detail actions for the selected card.

use std::path::PathBuf;
use std::sync::Arc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tokio::sync::mpsc;

use crate::core::api::ApiError;
use crate::core::collection::{title_case, Variant};
use crate::core::deletion::DeletionRequest;
use crate::core::export::{self, EXPORT_FAILED};
use crate::core::listing::CollectionIndex;
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::theme;

use super::alert::Alert;
use super::detail_modal::DetailModal;
use super::password_modal::{PasswordPrompt, PromptInput};

const EMPTY_JOURNALS: &str = "No Sinta journal collections found. Start scraping to generate data.";
const EMPTY_ARTICLES: &str = "No article collections found. Use Garuda Search to find articles.";

enum CollectionsEvent {
    Listed(Result<Vec<String>, String>),
    Exported {
        name: String,
        result: Result<PathBuf, String>,
    },
    Deleted(Result<(), ApiError>),
}

pub struct CollectionsViewState {
    index: CollectionIndex,
    selected: usize,
    detail: DetailModal,
    prompt: PasswordPrompt,
    alert: Option<Alert>,
    /// Collection currently being exported.
    exporting: Option<String>,
    event_tx: mpsc::UnboundedSender<CollectionsEvent>,
    event_rx: mpsc::UnboundedReceiver<CollectionsEvent>,
}

impl Default for CollectionsViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionsViewState {
    pub fn new() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Self {
            index: CollectionIndex::new(),
            selected: 0,
            detail: DetailModal::new(),
            prompt: PasswordPrompt::new(),
            alert: None,
            exporting: None,
            event_tx,
            event_rx,
        }
    }

    pub fn index(&self) -> &CollectionIndex {
        &self.index
    }

    pub fn detail(&self) -> &DetailModal {
        &self.detail
    }

    pub fn prompt(&self) -> &PasswordPrompt {
        &self.prompt
    }

    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    pub fn is_exporting(&self) -> bool {
        self.exporting.is_some()
    }

    /// True while a modal layer owns the keyboard.
    pub fn has_modal(&self) -> bool {
        self.alert.is_some() || self.prompt.is_open() || self.detail.is_open()
    }

    /// Name of the highlighted card, in display order.
    pub fn selected_name(&self) -> Option<String> {
        self.index
            .flattened()
            .nth(self.selected)
            .map(|(name, _)| name.to_string())
    }

    /// Refresh the collection list. Ignored while a refresh is in flight.
    pub fn load(&mut self, services: &Services) {
        if self.index.begin_refresh() {
            self.spawn_list(services);
        }
    }

    /// Refresh after a mutation. Queued behind a refresh already in flight.
    fn reload_after_change(&mut self, services: &Services) {
        if self.index.begin_refresh_after_change() {
            self.spawn_list(services);
        }
    }

    fn spawn_list(&self, services: &Services) {
        let api = Arc::clone(&services.api);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.list_collections().await.map_err(|e| e.to_string());
            let _ = tx.send(CollectionsEvent::Listed(result));
        });
    }

    pub fn export(&mut self, name: &str, services: &Services) {
        if self.exporting.is_some() {
            return;
        }
        self.exporting = Some(name.to_string());

        let api = Arc::clone(&services.api);
        let dir = services.export_dir.clone();
        let tx = self.event_tx.clone();
        let name = name.to_string();
        tokio::spawn(async move {
            let result = export::export_collection(api.as_ref(), &dir, &name)
                .await
                .map_err(|e| {
                    log::warn!("Export of {name} failed: {e}");
                    match e {
                        export::ExportError::Api(api) => api.operator_message(),
                        other => other.to_string(),
                    }
                });
            let _ = tx.send(CollectionsEvent::Exported { name, result });
        });
    }

    fn delete(&mut self, request: DeletionRequest, services: &Services) {
        let api = Arc::clone(&services.api);
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let result = api.delete_collection(request).await;
            let _ = tx.send(CollectionsEvent::Deleted(result));
        });
    }

    pub fn open_detail(&mut self, name: &str, services: &Services) {
        self.detail.open(name, services);
    }

    pub fn open_delete_prompt(&mut self, name: &str) -> bool {
        self.prompt.open(name)
    }

    /// Drain task results. Call from on_tick.
    pub fn poll(&mut self, services: &Services) {
        self.detail.poll();

        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                CollectionsEvent::Listed(result) => {
                    if self.index.apply(result) {
                        self.spawn_list(services);
                        continue;
                    }
                    let count = self.index.names().len();
                    self.selected = self.selected.min(count.saturating_sub(1));
                }
                CollectionsEvent::Exported { name, result } => {
                    self.exporting = None;
                    match result {
                        Ok(path) => services.notify(
                            format!("Exported {name} to {}", path.display()),
                            NotificationLevel::Success,
                        ),
                        Err(cause) => self.alert = Some(Alert::error(EXPORT_FAILED, cause)),
                    }
                }
                CollectionsEvent::Deleted(result) => {
                    let Some(outcome) = self.prompt.resolve(result) else {
                        continue;
                    };
                    log::info!("Delete of {} finished: {}", outcome.target(), outcome.message());
                    let refresh = outcome.should_refresh();
                    self.alert = Some(if refresh {
                        Alert::success(outcome.message())
                    } else {
                        Alert::error("Delete Collection", outcome.message())
                    });
                    if refresh {
                        self.reload_after_change(services);
                    }
                }
            }
        }
    }

    // ── Input ──────────────────────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        let Event::Key(key) = event else {
            return false;
        };
        if key.kind != KeyEventKind::Press {
            return false;
        }

        if self.alert.is_some() {
            if Alert::dismisses(key) {
                self.alert = None;
            }
            return true;
        }

        if self.prompt.is_open() {
            if let PromptInput::Submit(request) = self.prompt.handle_key(key) {
                log::info!("Deleting collection {}", request.collection_name);
                self.delete(request, services);
            }
            return true;
        }

        if self.detail.is_open() {
            self.detail.handle_key(key, services);
            return true;
        }

        self.handle_list_input(key, services)
    }

    fn handle_list_input(&mut self, key: &KeyEvent, services: &Services) -> bool {
        let count = self.index.names().len();
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                if count > 0 {
                    self.selected = (self.selected + 1).min(count - 1);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.selected = self.selected.saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                self.selected = 0;
                true
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) | (KeyModifiers::NONE, KeyCode::End) => {
                self.selected = count.saturating_sub(1);
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('r')) => {
                self.load(services);
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char('v')) => {
                if let Some(name) = self.selected_name() {
                    self.open_detail(&name, services);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('e')) => {
                if let Some(name) = self.selected_name() {
                    self.export(&name, services);
                }
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('d')) => {
                if let Some(name) = self.selected_name() {
                    self.open_delete_prompt(&name);
                }
                true
            }
            _ => false,
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_focused("Collections");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [status, list, hints] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(Paragraph::new(self.status_line()), status);
        self.render_list(frame, list);

        let hints_line = Line::from(vec![
            Span::styled(" j/k", theme::key_hint()),
            Span::raw(":select "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":details "),
            Span::styled("e", theme::key_hint()),
            Span::raw(":export "),
            Span::styled("d", theme::key_hint()),
            Span::raw(":delete "),
            Span::styled("r", theme::key_hint()),
            Span::raw(":refresh"),
        ]);
        frame.render_widget(Paragraph::new(hints_line), hints);

        if self.detail.is_open() {
            self.detail.render(frame, area);
        }
        if self.prompt.is_open() {
            self.prompt.render(frame, area);
        }
        if let Some(alert) = &self.alert {
            alert.render(frame, area);
        }
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(error) = self.index.error() {
            return Line::from(Span::styled(format!(" ✗ {error} "), theme::error_banner()));
        }
        if self.index.is_loading() {
            return Line::from(Span::styled(" ⟳ Refreshing...", theme::muted()));
        }
        if let Some(name) = &self.exporting {
            return Line::from(Span::styled(format!(" ⇣ Exporting {name}..."), theme::muted()));
        }
        Line::from(Span::styled(
            format!(" {} collections", self.index.names().len()),
            theme::dim(),
        ))
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let (lines, selected_line) = self.list_lines();

        let visible = area.height as usize;
        let scroll = match selected_line {
            Some(line) if line >= visible => line + 1 - visible,
            _ => 0,
        };

        frame.render_widget(
            Paragraph::new(lines).scroll((scroll.min(u16::MAX as usize) as u16, 0)),
            area,
        );
    }

    /// Section headers, cards and hints, plus the line of the selected card.
    fn list_lines(&self) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut selected_line = None;
        let mut position = 0usize;

        for (variant, hint) in [
            (Variant::Journal, EMPTY_JOURNALS),
            (Variant::ArticleGroup, EMPTY_ARTICLES),
        ] {
            let names = self.index.partition().of(variant);
            let color = theme::variant_color(variant);

            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::styled(
                    format!(" {} ", variant.icon()),
                    Style::default().fg(color),
                ),
                Span::styled(
                    format!("{} ({})", variant.label(), names.len()),
                    theme::heading(),
                ),
            ]));

            if self.index.shows_empty_hint(variant) {
                lines.push(Line::from(Span::styled(format!("    {hint}"), theme::muted())));
            }

            for name in names {
                let is_selected = position == self.selected;
                if is_selected {
                    selected_line = Some(lines.len());
                }
                let (marker, style) = if is_selected {
                    ("▸", theme::highlight())
                } else {
                    (" ", Style::default().fg(theme::TEXT))
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {marker} "), theme::title()),
                    Span::styled(title_case(name), style.add_modifier(Modifier::BOLD)),
                    Span::styled(format!("  {name}"), theme::dim()),
                ]));
                position += 1;
            }
        }

        (lines, selected_line)
    }
}
