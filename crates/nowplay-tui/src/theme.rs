//! Color palette and style constants for the nowplay card.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_ICON: Color = Color::Rgb(255, 210, 50);
/// Normal progress fill.
pub const C_BAR: Color = Color::Rgb(80, 200, 120);
/// Empty part of the progress track.
pub const C_BAR_TRACK: Color = Color::Rgb(40, 40, 52);
/// Alert colour when playback is paused — wins over every other bar style.
pub const C_PAUSED: Color = Color::Rgb(255, 80, 80);
/// Dimmed paused track behind the paused fill.
pub const C_PAUSED_TRACK: Color = Color::Rgb(96, 32, 32);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_title() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_icon() -> Style {
    Style::default().fg(C_ICON)
}
