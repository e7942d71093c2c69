//! Shared UI colors.

use ratatui::style::Color;

// Scrollbar
pub const SB_ARROW: Color = Color::Rgb(170, 170, 180);
pub const SB_TRACK: Color = Color::Rgb(110, 110, 120);
pub const SB_THUMB: Color = Color::Rgb(200, 200, 210);

pub const ACCENT: Color = Color::Cyan;
pub const MUTED: Color = Color::DarkGray;
pub const STALE: Color = Color::Red;
pub const INFO: Color = Color::Green;
pub const SELECTED_BG: Color = Color::Rgb(45, 55, 80);
