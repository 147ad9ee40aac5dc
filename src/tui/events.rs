/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs and channel draining.
    Tick,
    /// Raw terminal input (keyboard/mouse).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Result of the backend health probe.
    ApiStatus(ApiStatus),
    /// Request to quit the application.
    Quit,
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusCollections,
    FocusScrape,
    FocusSearch,
    TabNext,
    TabPrev,
    ToggleSidebar,

    // Modals
    ShowHelp,
    CloseHelp,

    // Application
    Quit,
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    ScrapeSinta,
    SearchGaruda,
    Collections,
}

/// Whether the sidebar or the main content receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaFocus {
    Sidebar,
    #[default]
    Main,
}

/// Sidebar section a view belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarGroup {
    Jobs,
    Data,
}

impl SidebarGroup {
    pub const ALL: [SidebarGroup; 2] = [SidebarGroup::Jobs, SidebarGroup::Data];

    pub fn label(self) -> &'static str {
        match self {
            SidebarGroup::Jobs => "Jobs",
            SidebarGroup::Data => "Data",
        }
    }

    pub fn views(self) -> &'static [Focus] {
        match self {
            SidebarGroup::Jobs => &[Focus::ScrapeSinta, Focus::SearchGaruda],
            SidebarGroup::Data => &[Focus::Collections],
        }
    }
}

impl Focus {
    pub const ALL: [Focus; 3] = [Focus::ScrapeSinta, Focus::SearchGaruda, Focus::Collections];

    pub fn label(self) -> &'static str {
        match self {
            Focus::ScrapeSinta => "Scrape Sinta",
            Focus::SearchGaruda => "Search Garuda",
            Focus::Collections => "Collections",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Focus::ScrapeSinta => "⚙",
            Focus::SearchGaruda => "⌕",
            Focus::Collections => "▦",
        }
    }

    pub fn group(self) -> SidebarGroup {
        match self {
            Focus::ScrapeSinta | Focus::SearchGaruda => SidebarGroup::Jobs,
            Focus::Collections => SidebarGroup::Data,
        }
    }

    /// Number-key shortcut, 1-based.
    pub fn shortcut(self) -> char {
        match self {
            Focus::ScrapeSinta => '1',
            Focus::SearchGaruda => '2',
            Focus::Collections => '3',
        }
    }

    pub fn from_shortcut(c: char) -> Option<Focus> {
        Focus::ALL.into_iter().find(|f| f.shortcut() == c)
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::ScrapeSinta => Action::FocusScrape,
            Focus::SearchGaruda => Action::FocusSearch,
            Focus::Collections => Action::FocusCollections,
        }
    }
}

/// Reachability of the backend as last seen by the health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiStatus {
    #[default]
    Checking,
    Online,
    Offline,
}

impl ApiStatus {
    pub fn label(self) -> &'static str {
        match self {
            ApiStatus::Checking => "checking",
            ApiStatus::Online => "online",
            ApiStatus::Offline => "offline",
        }
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}
