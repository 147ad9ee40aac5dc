//! Collapsible left sidebar grouped into Jobs and Data.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::events::{AreaFocus, Focus, SidebarGroup};
use super::layout::SidebarVisibility;
use super::theme;

/// Sidebar navigation state.
#[derive(Debug, Default)]
pub struct SidebarState {
    /// Whether the user has toggled collapse (Ctrl+B).
    pub user_collapsed: bool,
    /// Highlighted item index into `Focus::ALL`.
    pub selected: usize,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_collapse(&mut self) {
        self.user_collapsed = !self.user_collapsed;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Focus::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + Focus::ALL.len() - 1) % Focus::ALL.len();
    }

    pub fn selected_focus(&self) -> Focus {
        Focus::ALL[self.selected % Focus::ALL.len()]
    }

    /// Sync selection to the active focus (e.g., after Tab navigation).
    pub fn sync_to_focus(&mut self, focus: Focus) {
        if let Some(idx) = Focus::ALL.iter().position(|&f| f == focus) {
            self.selected = idx;
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        visibility: SidebarVisibility,
        current_focus: Focus,
        area_focus: AreaFocus,
    ) {
        let lines = match visibility {
            SidebarVisibility::Hidden => return,
            SidebarVisibility::Collapsed => self.collapsed_lines(current_focus),
            SidebarVisibility::Expanded => {
                self.expanded_lines(area.width, current_focus, area_focus)
            }
        };

        let lines: Vec<Line> = lines.into_iter().take(area.height as usize).collect();
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }

    fn collapsed_lines(&self, current_focus: Focus) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for group in SidebarGroup::ALL {
            // blank spacer stands in for the group header
            lines.push(Line::raw(""));
            for &view in group.views() {
                let style = if view == current_focus {
                    theme::title()
                } else {
                    theme::muted()
                };
                lines.push(Line::from(Span::styled(format!(" {}", view.icon()), style)));
            }
        }
        lines
    }

    fn expanded_lines(
        &self,
        width: u16,
        current_focus: Focus,
        area_focus: AreaFocus,
    ) -> Vec<Line<'static>> {
        let sidebar_focused = area_focus == AreaFocus::Sidebar;
        let selected = self.selected_focus();
        let mut lines = Vec::new();

        for group in SidebarGroup::ALL {
            lines.push(Line::from(Span::styled(
                format!(" {}", group.label().to_uppercase()),
                theme::heading(),
            )));

            for &view in group.views() {
                let is_current = view == current_focus;
                let is_selected = sidebar_focused && view == selected;

                let prefix = if is_selected { "▸" } else { " " };
                let style = match (is_selected, is_current) {
                    (_, true) => theme::title(),
                    (true, false) => Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                    (false, false) => theme::muted(),
                };

                let label = format!("{prefix} {} {}", view.icon(), view.label());
                let padded = format!("{:<width$}", label, width = width as usize);
                lines.push(Line::from(vec![Span::styled(padded, style)]));
            }
            lines.push(Line::raw(""));
        }

        lines
    }
}
