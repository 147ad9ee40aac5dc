//! Indigo & violet color theme for the Scraper Admin TUI.
//!
//! All color constants are RGB truecolor. Views import from here
//! instead of using inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};

use crate::core::collection::Variant;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Indigo: focused borders, active items.
pub const PRIMARY: Color = Color::Rgb(0x63, 0x66, 0xF1);
/// Light indigo: key hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x81, 0x8C, 0xF8);

/// Violet: titles and calls to action.
pub const ACCENT: Color = Color::Rgb(0xA8, 0x55, 0xF7);

// ── Backgrounds ─────────────────────────────────────────────────────────────

pub const BG_BASE: Color = Color::Rgb(0x0F, 0x11, 0x1A);
pub const BG_SURFACE: Color = Color::Rgb(0x1A, 0x1D, 0x2E);
/// Selected row background.
pub const BG_SELECTED: Color = Color::Rgb(0x2A, 0x2D, 0x4A);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE5, 0xE7, 0xEB);
pub const TEXT_MUTED: Color = Color::Rgb(0x9C, 0xA3, 0xAF);
pub const TEXT_DIM: Color = Color::Rgb(0x4B, 0x55, 0x63);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x44, 0x44);
pub const SUCCESS: Color = Color::Rgb(0x22, 0xC5, 0x5E);
pub const WARNING: Color = Color::Rgb(0xF5, 0x9E, 0x0B);
pub const INFO: Color = Color::Rgb(0x3B, 0x82, 0xF6);

// ── Domain ──────────────────────────────────────────────────────────────────

/// Journal collections: blue.
pub const JOURNAL: Color = Color::Rgb(0x3B, 0x82, 0xF6);
/// Article collections: green.
pub const ARTICLES: Color = Color::Rgb(0x10, 0xB9, 0x81);
/// Clickable URLs.
pub const LINK: Color = Color::Rgb(0x60, 0xA5, 0xFA);

pub fn variant_color(variant: Variant) -> Color {
    match variant {
        Variant::Journal => JOURNAL,
        Variant::ArticleGroup => ARTICLES,
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Accent-colored bold text (titles, active items).
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Section header style.
pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default()
        .fg(TEXT)
        .bg(BG_SELECTED)
        .add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(PRIMARY_LIGHT)
}

pub fn link() -> Style {
    Style::default().fg(LINK).add_modifier(Modifier::UNDERLINED)
}

/// Link under the link cursor.
pub fn link_selected() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(LINK)
        .add_modifier(Modifier::BOLD)
}

/// Small pill such as `Sinta 2`.
pub fn badge(color: Color) -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(color)
        .add_modifier(Modifier::BOLD)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    badge(ACCENT)
}

pub fn error_banner() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

pub fn success_banner() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

// ── Block builders ──────────────────────────────────────────────────────────

/// A bordered block with focused styling.
pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

/// A bordered block with default (unfocused) styling.
pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}

/// Rounded block used by modal dialogs.
pub fn block_modal(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}
