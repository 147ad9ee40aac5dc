//! Root layout: sidebar, title header, main content, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Width of the expanded sidebar (group headers + labeled items).
pub const SIDEBAR_EXPANDED_WIDTH: u16 = 22;
/// Width of the collapsed sidebar (single-char icons).
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 3;
/// Auto-collapse sidebar below this terminal width.
pub const AUTO_COLLAPSE_THRESHOLD: u16 = 70;
/// Hide sidebar entirely below this terminal width.
pub const HIDE_SIDEBAR_THRESHOLD: u16 = 30;
/// Drop the header row below this terminal height.
pub const HEADER_MIN_HEIGHT: u16 = 12;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Sidebar area (None if hidden).
    pub sidebar: Option<Rect>,
    /// View title row above the main content (None on short terminals).
    pub header: Option<Rect>,
    /// Main content area.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

/// Sidebar visibility derived from terminal width and user preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarVisibility {
    Expanded,
    Collapsed,
    Hidden,
}

impl SidebarVisibility {
    pub fn for_width(width: u16, user_collapsed: bool) -> Self {
        if width < HIDE_SIDEBAR_THRESHOLD {
            SidebarVisibility::Hidden
        } else if user_collapsed || width < AUTO_COLLAPSE_THRESHOLD {
            SidebarVisibility::Collapsed
        } else {
            SidebarVisibility::Expanded
        }
    }

    fn width(self) -> u16 {
        match self {
            SidebarVisibility::Expanded => SIDEBAR_EXPANDED_WIDTH,
            SidebarVisibility::Collapsed => SIDEBAR_COLLAPSED_WIDTH,
            SidebarVisibility::Hidden => 0,
        }
    }
}

impl AppLayout {
    /// Compute layout regions from the terminal area and sidebar state.
    ///
    /// `user_collapsed`: user has toggled collapse with Ctrl+B.
    pub fn compute(area: Rect, user_collapsed: bool) -> (Self, SidebarVisibility) {
        let visibility = SidebarVisibility::for_width(area.width, user_collapsed);

        let [content_area, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let (sidebar, body) = if visibility == SidebarVisibility::Hidden {
            (None, content_area)
        } else {
            let [side, body] = Layout::horizontal([
                Constraint::Length(visibility.width()),
                Constraint::Min(1),
            ])
            .areas(content_area);
            (Some(side), body)
        };

        let (header, main) = if area.height >= HEADER_MIN_HEIGHT {
            let [header, main] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(body);
            (Some(header), main)
        } else {
            (None, body)
        };

        (
            AppLayout {
                sidebar,
                header,
                main,
                status,
            },
            visibility,
        )
    }
}
