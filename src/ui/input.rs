//! Mouse state for the host chrome

use macroquad::prelude::*;

use super::Rect;

#[derive(Debug, Clone, Copy, Default)]
pub struct MouseState {
    pub x: f32,
    pub y: f32,
    pub left_down: bool,
    pub left_pressed: bool,  // Just pressed this frame
    pub left_released: bool, // Just released this frame
}

impl MouseState {
    /// Sample macroquad's mouse for this frame
    pub fn poll() -> Self {
        let (x, y) = mouse_position();
        Self {
            x,
            y,
            left_down: is_mouse_button_down(MouseButton::Left),
            left_pressed: is_mouse_button_pressed(MouseButton::Left),
            left_released: is_mouse_button_released(MouseButton::Left),
        }
    }

    pub fn inside(&self, rect: &Rect) -> bool {
        rect.contains(self.x, self.y)
    }

    /// Held down inside the rect
    pub fn clicking(&self, rect: &Rect) -> bool {
        self.left_down && rect.contains(self.x, self.y)
    }

    /// Pressed inside the rect this frame
    pub fn clicked(&self, rect: &Rect) -> bool {
        self.left_pressed && rect.contains(self.x, self.y)
    }
}

/// Per-frame UI state passed to every widget
#[derive(Debug, Default)]
pub struct UiContext {
    pub mouse: MouseState,
    /// Widget under the pointer this frame
    pub hot: Option<u64>,
    /// Set when a widget took this frame's click
    pub consumed_click: bool,
    id_counter: u64,
}

impl UiContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&mut self) -> u64 {
        self.id_counter += 1;
        self.id_counter
    }

    /// Reset at start of frame (call before UI code)
    pub fn begin_frame(&mut self, mouse: MouseState) {
        self.mouse = mouse;
        self.hot = None;
        self.consumed_click = false;
        self.id_counter = 0;
    }

    pub fn set_hot(&mut self, id: u64) {
        self.hot = Some(id);
    }

    pub fn is_hot(&self, id: u64) -> bool {
        self.hot == Some(id)
    }

    /// Report a press inside `rect`, marking the click as taken
    pub fn take_click(&mut self, rect: &Rect) -> bool {
        if !self.consumed_click && self.mouse.clicked(rect) {
            self.consumed_click = true;
            return true;
        }
        false
    }
}
