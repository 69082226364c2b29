// Dasa Sandbox - ui/theme.rs
//
// Colour scheme, log kind colour mapping, and layout constants.
// No dependencies on app state or business logic.

use crate::core::log::LogKind;
use egui::Color32;

/// Foreground colour for a log kind.
pub fn log_kind_colour(kind: LogKind, dark_mode: bool) -> Color32 {
    match (kind, dark_mode) {
        (LogKind::Info, true) => Color32::from_rgb(96, 165, 250),   // Blue 400
        (LogKind::Info, false) => Color32::from_rgb(37, 99, 235),   // Blue 600
        (LogKind::Error, true) => Color32::from_rgb(248, 113, 113), // Red 400
        (LogKind::Error, false) => Color32::from_rgb(220, 38, 38),  // Red 600
        (LogKind::Success, true) => Color32::from_rgb(74, 222, 128), // Green 400
        (LogKind::Success, false) => Color32::from_rgb(22, 163, 74), // Green 600
    }
}

/// Subtle row background for a log kind.
pub fn log_kind_bg_colour(kind: LogKind) -> Color32 {
    match kind {
        LogKind::Info => Color32::from_rgba_premultiplied(37, 99, 235, 18),
        LogKind::Error => Color32::from_rgba_premultiplied(220, 38, 38, 25),
        LogKind::Success => Color32::from_rgba_premultiplied(22, 163, 74, 20),
    }
}

/// Accent used for the selected tab and the selected tool card.
pub const ACCENT: Color32 = Color32::from_rgb(99, 102, 241); // Indigo 500

/// Status pill colours for the screen capture panel.
pub const SHARING: Color32 = Color32::from_rgb(34, 197, 94); // Green 500
pub const IDLE: Color32 = Color32::from_rgb(107, 114, 128); // Gray 500

/// Warning text (ended capture source).
pub const WARNING: Color32 = Color32::from_rgb(217, 119, 6); // Amber 600

/// Layout constants.
pub const TAB_HEIGHT: f32 = 30.0;
pub const TOOL_CARD_WIDTH: f32 = 200.0;
pub const TOOL_CARD_HEIGHT: f32 = 78.0;
pub const INPUT_ROWS: usize = 6;
pub const PREVIEW_MAX_HEIGHT: f32 = 360.0;
pub const THUMBNAIL_MAX_HEIGHT: f32 = 160.0;
