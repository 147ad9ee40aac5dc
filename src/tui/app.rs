use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{
    Action, ApiStatus, AppEvent, AreaFocus, Focus, Notification, NotificationLevel,
};
use super::layout::AppLayout;
use super::services::Services;
use super::sidebar::SidebarState;
use super::theme;
use super::views::collections::CollectionsViewState;
use super::views::scrape_form::ScrapeFormState;
use super::views::search_form::SearchFormState;

/// Notifications shown at once.
const MAX_NOTIFICATIONS: usize = 3;
/// Lifetime of a notification in ticks.
const NOTIFICATION_TTL: u32 = 100;
/// Ticks between backend health probes.
const PING_INTERVAL_TICKS: u64 = 600;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    /// Whether sidebar or main content has input focus.
    pub area_focus: AreaFocus,
    pub sidebar: SidebarState,
    pub collections: CollectionsViewState,
    pub scrape: ScrapeFormState,
    pub search: SearchFormState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    notification_counter: u64,
    pub show_help: bool,
    /// Backend reachability from the last probe.
    pub api_status: ApiStatus,
    ticks: u64,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    services: Services,
}

impl AppState {
    pub fn new(event_rx: mpsc::UnboundedReceiver<AppEvent>, services: Services) -> Self {
        Self {
            running: true,
            focus: Focus::Collections,
            area_focus: AreaFocus::Main,
            sidebar: SidebarState::new(),
            collections: CollectionsViewState::new(),
            scrape: ScrapeFormState::new(),
            search: SearchFormState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            api_status: ApiStatus::Checking,
            ticks: 0,
            event_rx,
            services,
        }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        self.sidebar.sync_to_focus(self.focus);
        self.on_focus_changed();
        self.ping();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    /// Probe the backend in the background; the result arrives as an event.
    fn ping(&self) {
        let api = Arc::clone(&self.services.api);
        let tx = self.services.event_tx.clone();
        tokio::spawn(async move {
            let status = match api.ping().await {
                Ok(()) => ApiStatus::Online,
                Err(e) => {
                    log::debug!("Backend ping failed: {e}");
                    ApiStatus::Offline
                }
            };
            let _ = tx.send(AppEvent::ApiStatus(status));
        });
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Sidebar input (when focused)
                if self.area_focus == AreaFocus::Sidebar
                    && self.handle_sidebar_input(&crossterm_event)
                {
                    return;
                }

                // Priority 3: Focused view
                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                // Priority 4: Global keybindings
                if let Some(action) = self.map_input_to_action(&crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::ApiStatus(status) => {
                if status != self.api_status {
                    log::info!("Backend is {}", status.label());
                }
                self.api_status = status;
            }
            AppEvent::Quit => self.running = false,
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        if self.area_focus == AreaFocus::Sidebar {
            return false;
        }
        match self.focus {
            Focus::Collections => self.collections.handle_input(event, &self.services),
            Focus::ScrapeSinta => self.scrape.handle_input(event, &self.services),
            Focus::SearchGaruda => self.search.handle_input(event, &self.services),
        }
    }

    /// Handle sidebar-specific input. Returns true if consumed.
    fn handle_sidebar_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };

        match (*modifiers, *code) {
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                self.sidebar.select_next();
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                self.sidebar.select_prev();
                true
            }
            (KeyModifiers::NONE, KeyCode::Enter | KeyCode::Char('l')) => {
                let focus = self.sidebar.selected_focus();
                self.handle_action(focus.to_action());
                self.area_focus = AreaFocus::Main;
                true
            }
            (KeyModifiers::NONE, KeyCode::Char('h')) => {
                self.sidebar.user_collapsed = true;
                self.area_focus = AreaFocus::Main;
                true
            }
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.area_focus = AreaFocus::Main;
                true
            }
            _ => false,
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleSidebar),
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char(c) => Focus::from_shortcut(c).map(Focus::to_action),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusCollections => self.set_focus(Focus::Collections),
            Action::FocusScrape => self.set_focus(Focus::ScrapeSinta),
            Action::FocusSearch => self.set_focus(Focus::SearchGaruda),
            Action::TabNext => self.set_focus(self.focus.next()),
            Action::TabPrev => self.set_focus(self.focus.prev()),
            Action::ToggleSidebar => {
                self.sidebar.toggle_collapse();
                if self.sidebar.user_collapsed {
                    self.area_focus = AreaFocus::Main;
                } else {
                    self.area_focus = AreaFocus::Sidebar;
                    self.sidebar.sync_to_focus(self.focus);
                }
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    /// Set focus, sync sidebar selection and reload the view's data.
    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.sidebar.sync_to_focus(focus);
        self.area_focus = AreaFocus::Main;
        self.on_focus_changed();
    }

    fn on_focus_changed(&mut self) {
        match self.focus {
            Focus::Collections => self.collections.load(&self.services),
            Focus::SearchGaruda => self.search.load(&self.services),
            Focus::ScrapeSinta => {}
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }
        self.notification_counter += 1;
        self.notifications.push(Notification {
            id: self.notification_counter,
            message,
            level,
            ttl_ticks: NOTIFICATION_TTL,
        });
        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, poll async data.
    pub fn on_tick(&mut self) {
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);

        self.collections.poll(&self.services);
        self.scrape.poll();
        self.search.poll();

        self.ticks += 1;
        if self.ticks % PING_INTERVAL_TICKS == 0 {
            self.ping();
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let (layout, visibility) = AppLayout::compute(area, self.sidebar.user_collapsed);

        if let Some(sidebar_area) = layout.sidebar {
            self.sidebar
                .render(frame, sidebar_area, visibility, self.focus, self.area_focus);
        }
        if let Some(header) = layout.header {
            self.render_header(frame, header);
        }

        match self.focus {
            Focus::Collections => self.collections.render(frame, layout.main),
            Focus::ScrapeSinta => self.scrape.render(frame, layout.main),
            Focus::SearchGaruda => self.search.render(frame, layout.main),
        }

        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(
                format!(" {} {}", self.focus.icon(), self.focus.label()),
                theme::title(),
            ),
            Span::styled(format!("  {}", self.focus.group().label()), theme::dim()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let api_style = match self.api_status {
            ApiStatus::Online => Style::default().fg(theme::SUCCESS),
            ApiStatus::Offline => Style::default().fg(theme::ERROR),
            ApiStatus::Checking => Style::default().fg(theme::TEXT_MUTED),
        };

        let status = Line::from(vec![
            Span::styled(" SCRAPER ADMIN ", theme::brand_badge()),
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("API:", theme::key_hint()),
            Span::raw(" "),
            Span::styled(self.api_status.label(), api_style),
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":nav "),
            Span::styled("Ctrl+B", theme::key_hint()),
            Span::raw(":sidebar "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 60.min(area.width.saturating_sub(2));
        let height = (self.notifications.len() as u16).min(area.height);
        let x = area.width.saturating_sub(max_width + 1);
        let notification_area = Rect::new(x, area.y.saturating_add(1).min(area.bottom()), max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            notification_area,
        );
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q", "Quit application"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("1-3", "Scrape / Search / Collections"),
            ("Ctrl+B", "Toggle sidebar collapse/expand"),
            ("Ctrl+C", "Force quit"),
            ("", ""),
            ("Sidebar (when focused):", ""),
            ("j/k", "Navigate up/down"),
            ("Enter / l", "Select view"),
            ("h", "Collapse sidebar"),
            ("Esc", "Focus main content"),
            ("", ""),
            ("Collections:", ""),
            ("j/k", "Select collection"),
            ("Enter / v", "View details"),
            ("e", "Export to JSON file"),
            ("d", "Delete (asks for password)"),
            ("r", "Refresh list"),
            ("", ""),
            ("Details:", ""),
            ("Enter / Space", "Expand / collapse row"),
            ("Tab / Shift+Tab", "Next / previous link"),
            ("o", "Open link in browser"),
            ("J/K", "Scroll article list"),
            ("Esc", "Close"),
            ("", ""),
            ("Job forms:", ""),
            ("↑/↓", "Move between fields"),
            ("←/→", "Move within a toggle row"),
            ("Space", "Toggle option"),
            ("Enter", "Submit"),
        ];

        let heading = Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(theme::PRIMARY_LIGHT)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", heading)),
            Line::raw(""),
        ];

        for (key, desc) in keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), heading)));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("{key:<22}"), key_style),
                    Span::raw(desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", key_style),
            Span::raw(" or "),
            Span::styled("Esc", key_style),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [_, middle, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(middle);

    center
}
