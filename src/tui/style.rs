//! Color constants for the TUI.

use ratatui::style::Color;

use crate::market::Status;

/// Bar color for demand comfortably under the cap.
pub const DEMAND_OK: Color = Color::Cyan;
/// Bar color for demand at 80% of the cap or more.
pub const DEMAND_NEAR_CAP: Color = Color::Yellow;
/// Bar color for demand above the cap.
pub const DEMAND_OVER_CAP: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::DarkGray;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;

/// Returns the bar color for a slot's demand against the cap.
pub fn demand_color(demand: u64, p_max: u64) -> Color {
    if demand > p_max {
        DEMAND_OVER_CAP
    } else if demand * 5 >= p_max * 4 {
        DEMAND_NEAR_CAP
    } else {
        DEMAND_OK
    }
}

/// Returns the color of the run-state label.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Running => Color::Cyan,
        Status::Converged => Color::Green,
        Status::BoundReached => Color::Magenta,
    }
}
