use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

static NO_COLOR: OnceLock<bool> = OnceLock::new();

/// Initialize theme settings. Call once at startup, before any rendering.
pub fn init() {
    let _ = NO_COLOR.set(std::env::var_os("NO_COLOR").is_some());
}

/// Apply a fg color unless NO_COLOR is set; modifiers always survive.
fn fg(style: Style, color: Color) -> Style {
    if *NO_COLOR.get_or_init(|| false) {
        style
    } else {
        style.fg(color)
    }
}

/// App name in the header.
pub fn brand() -> Style {
    fg(Style::default().add_modifier(Modifier::BOLD), Color::Cyan)
}

/// Structural accent: group tags, the search cursor.
pub fn accent() -> Style {
    fg(Style::default(), Color::Cyan)
}

/// Keybinding keys in the footer.
pub fn accent_bold() -> Style {
    fg(Style::default().add_modifier(Modifier::BOLD), Color::Cyan)
}

/// The connect key stands out from the secondary keys.
pub fn primary_action() -> Style {
    fg(Style::default().add_modifier(Modifier::BOLD), Color::Yellow)
}

/// Secondary text. DIM rather than a fixed gray so it reads on any theme.
pub fn muted() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Selected row. REVERSED is visible on every terminal theme.
pub fn selected() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn error() -> Style {
    fg(Style::default().add_modifier(Modifier::BOLD), Color::Red)
}

pub fn success() -> Style {
    fg(Style::default().add_modifier(Modifier::BOLD), Color::Green)
}

/// Unfocused border.
pub fn border() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Focused border.
pub fn border_focused() -> Style {
    fg(Style::default().add_modifier(Modifier::BOLD), Color::Cyan)
}

pub fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}
