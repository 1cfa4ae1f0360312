use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use dockside::docker::ContainerState;

use crate::app::ActivityKind;

// ── Colour constants ──────────────────────────────────────────────────
pub const COLOR_OK: Color = Color::Green;
pub const COLOR_FAIL: Color = Color::Red;
pub const COLOR_BUSY: Color = Color::Yellow;
pub const COLOR_MUTED: Color = Color::DarkGray;

// ── Icon constants ────────────────────────────────────────────────────
pub const ICON_OK: &str = "✓";
pub const ICON_FAIL: &str = "✗";
pub const ICON_BUSY: &str = "◉";
pub const ICON_UNKNOWN: &str = "─";

// ── Helpers ───────────────────────────────────────────────────────────

pub fn container_state_color(state: ContainerState) -> Color {
    match state {
        ContainerState::Running => COLOR_OK,
        ContainerState::Stopped => COLOR_FAIL,
        ContainerState::Unknown => COLOR_MUTED,
    }
}

pub fn container_state_icon(state: ContainerState) -> &'static str {
    match state {
        ContainerState::Running => ICON_OK,
        ContainerState::Stopped => ICON_FAIL,
        ContainerState::Unknown => ICON_UNKNOWN,
    }
}

pub fn health_color(health: &str) -> Color {
    match health {
        "healthy" => COLOR_OK,
        "unhealthy" => COLOR_FAIL,
        "starting" => COLOR_BUSY,
        _ => COLOR_MUTED,
    }
}

pub fn activity_color(kind: ActivityKind) -> Color {
    match kind {
        ActivityKind::Info => Color::Cyan,
        ActivityKind::Success => COLOR_OK,
        ActivityKind::Failure => COLOR_FAIL,
    }
}

pub fn make_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(style)
}
