//! Immediate-mode UI for the viewer host
//!
//! The host chrome around the viewport: mode tabs, the part list, toggles
//! and camera buttons. Rebuilt every frame from plain rectangles, drawn
//! with macroquad shapes and the default font.

mod input;
mod rect;
mod theme;
mod widgets;

pub use input::*;
pub use rect::*;
pub use theme::*;
pub use widgets::*;
