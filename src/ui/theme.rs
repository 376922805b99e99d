//! Shared colors and sizes for the host chrome
//!
//! Dark slate palette with a sky-blue accent.

use macroquad::prelude::Color;

// =============================================================================
// Surfaces
// =============================================================================

/// Page background (#020617)
pub const BG_COLOR: Color = Color::new(0.008, 0.024, 0.090, 1.0);

/// Card background (#0f172a)
pub const CARD_COLOR: Color = Color::new(0.059, 0.090, 0.165, 1.0);

/// Card and viewport border (#1e293b)
pub const BORDER_COLOR: Color = Color::new(0.118, 0.161, 0.231, 1.0);

/// Button outline (#334155)
pub const CONTROL_BORDER: Color = Color::new(0.200, 0.255, 0.333, 1.0);

/// Button fill under the pointer
pub const CONTROL_HOVER: Color = Color::new(0.118, 0.161, 0.231, 1.0);

// =============================================================================
// Text
// =============================================================================

/// Titles (#f1f5f9)
pub const TEXT_COLOR: Color = Color::new(0.945, 0.961, 0.976, 1.0);

/// Secondary text (#94a3b8)
pub const TEXT_MUTED: Color = Color::new(0.580, 0.639, 0.722, 1.0);

/// Hints and disabled controls (#64748b)
pub const TEXT_DIM: Color = Color::new(0.392, 0.455, 0.545, 1.0);

/// Active tab, checked box, selected row (#38bdf8)
pub const ACCENT_COLOR: Color = Color::new(0.220, 0.741, 0.973, 1.0);

/// Failed part rows
pub const ERROR_COLOR: Color = Color::new(0.973, 0.443, 0.443, 1.0);

// =============================================================================
// Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 16.0;
pub const FONT_SIZE_CONTENT: f32 = 14.0;
pub const FONT_SIZE_SMALL: f32 = 12.0;

pub const TAB_BAR_HEIGHT: f32 = 34.0;
pub const ROW_HEIGHT: f32 = 24.0;
pub const SIDEBAR_WIDTH: f32 = 320.0;
pub const PADDING: f32 = 12.0;
