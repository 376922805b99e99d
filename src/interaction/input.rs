//! Pointer input
//!
//! The session consumes plain `InputEvent` values in viewport pixels, so it
//! can be driven by tests as easily as by a window. `MacroquadInput` turns
//! the per-frame macroquad input state into those events.

use macroquad::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers { shift: false, ctrl: false, alt: false };
    pub const SHIFT: Modifiers = Modifiers { shift: true, ctrl: false, alt: false };
}

/// Coordinates are viewport-relative pixels, origin top-left, y down
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, button: PointerButton, modifiers: Modifiers },
    PointerMove { x: f32, y: f32, modifiers: Modifiers },
    PointerUp { x: f32, y: f32, button: PointerButton },
    /// Positive scrolls away from the user (zoom in)
    Wheel { delta: f32 },
}

/// Viewport rectangle in window pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl ViewportRect {
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }
}

/// Converts macroquad input into `InputEvent`s for one viewport.
///
/// Presses only count inside the viewport; moves and releases are forwarded
/// everywhere so a drag that leaves the viewport still ends cleanly.
#[derive(Debug, Default)]
pub struct MacroquadInput {
    last: Option<(f32, f32)>,
    held: Vec<PointerButton>,
}

impl MacroquadInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn poll(&mut self, viewport: ViewportRect) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let (mx, my) = mouse_position();
        let (x, y) = (mx - viewport.x, my - viewport.y);
        let modifiers = Modifiers {
            shift: is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift),
            ctrl: is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl),
            alt: is_key_down(KeyCode::LeftAlt) || is_key_down(KeyCode::RightAlt),
        };

        if self.last != Some((mx, my)) {
            events.push(InputEvent::PointerMove { x, y, modifiers });
            self.last = Some((mx, my));
        }

        let buttons = [
            (MouseButton::Left, PointerButton::Primary),
            (MouseButton::Right, PointerButton::Secondary),
            (MouseButton::Middle, PointerButton::Middle),
        ];
        for (mq, button) in buttons {
            if is_mouse_button_pressed(mq) && viewport.contains(mx, my) {
                self.held.push(button);
                events.push(InputEvent::PointerDown { x, y, button, modifiers });
            }
            if is_mouse_button_released(mq) && self.held.contains(&button) {
                self.held.retain(|b| *b != button);
                events.push(InputEvent::PointerUp { x, y, button });
            }
        }

        let (_, wheel_y) = mouse_wheel();
        if wheel_y != 0.0 && viewport.contains(mx, my) {
            events.push(InputEvent::Wheel { delta: wheel_y.signum() });
        }

        events
    }
}
