//! Basic UI widgets

use macroquad::prelude::*;

use super::theme::*;
use super::{Rect, UiContext};

/// Left-to-right button row
pub struct Toolbar {
    rect: Rect,
    cursor_x: f32,
    spacing: f32,
}

impl Toolbar {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            cursor_x: rect.x + 4.0,
            spacing: 6.0,
        }
    }

    /// Start from the right edge instead; buttons are then added right to left
    pub fn right_aligned(rect: Rect) -> Self {
        Self {
            rect,
            cursor_x: rect.right() - 4.0,
            spacing: -6.0,
        }
    }

    pub fn label(&mut self, text: &str) {
        let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
        let x = if self.spacing < 0.0 { self.cursor_x - dims.width } else { self.cursor_x };
        // Round to integer pixels for crisp text
        let text_y = (self.rect.y + (self.rect.h + dims.height) * 0.5).round();
        draw_text(text, x.round(), text_y, FONT_SIZE_CONTENT, TEXT_MUTED);
        self.advance(dims.width);
    }

    pub fn button(&mut self, ctx: &mut UiContext, text: &str, active: bool) -> bool {
        let width = button_width(text);
        let x = if self.spacing < 0.0 { self.cursor_x - width } else { self.cursor_x };
        let rect = Rect::new(x.round(), (self.rect.y + 3.0).round(), width, self.rect.h - 6.0);
        self.advance(width);
        text_button(ctx, rect, text, active)
    }

    fn advance(&mut self, width: f32) {
        if self.spacing < 0.0 {
            self.cursor_x -= width - self.spacing;
        } else {
            self.cursor_x += width + self.spacing;
        }
    }
}

fn button_width(text: &str) -> f32 {
    measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0).width.round() + 20.0
}

/// Outlined text button, returns true if clicked
pub fn text_button(ctx: &mut UiContext, rect: Rect, text: &str, active: bool) -> bool {
    let id = ctx.next_id();
    let hovered = ctx.mouse.inside(&rect);
    if hovered {
        ctx.set_hot(id);
    }
    let clicked = ctx.take_click(&rect);

    let fill = if active {
        ACCENT_COLOR
    } else if ctx.mouse.clicking(&rect) || hovered {
        CONTROL_HOVER
    } else {
        CARD_COLOR
    };
    draw_rounded_rect(rect.x, rect.y, rect.w, rect.h, 6.0, fill);
    if !active {
        draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, CONTROL_BORDER);
    }

    let color = if active { BG_COLOR } else { TEXT_COLOR };
    draw_centered_text(text, &rect, FONT_SIZE_CONTENT, color);
    clicked
}

/// Checkbox with a label. A disabled box ignores clicks and draws dimmed.
pub fn checkbox(ctx: &mut UiContext, rect: Rect, label: &str, checked: &mut bool, enabled: bool) -> bool {
    let id = ctx.next_id();
    let size = 14.0;
    let box_rect = Rect::new(rect.x, (rect.center_y() - size * 0.5).round(), size, size);

    let mut changed = false;
    if enabled {
        if ctx.mouse.inside(&rect) {
            ctx.set_hot(id);
        }
        if ctx.take_click(&rect) {
            *checked = !*checked;
            changed = true;
        }
    }

    let outline = if enabled { CONTROL_BORDER } else { BORDER_COLOR };
    draw_rectangle_lines(box_rect.x, box_rect.y, box_rect.w, box_rect.h, 1.0, outline);
    if *checked {
        let fill = if enabled { ACCENT_COLOR } else { TEXT_DIM };
        let inner = box_rect.pad(3.0);
        draw_rectangle(inner.x, inner.y, inner.w, inner.h, fill);
    }

    let color = if enabled { TEXT_MUTED } else { TEXT_DIM };
    let dims = measure_text(label, None, FONT_SIZE_SMALL as u16, 1.0);
    draw_text(
        label,
        (box_rect.right() + 8.0).round(),
        (rect.y + (rect.h + dims.height) * 0.5).round(),
        FONT_SIZE_SMALL,
        color,
    );
    changed
}

/// Tab strip with an underline under the active tab.
/// Returns the index of the clicked tab, if any.
pub fn tab_strip(ctx: &mut UiContext, rect: Rect, labels: &[&str], active_index: usize) -> Option<usize> {
    draw_rectangle(rect.x, rect.y, rect.w, rect.h, BG_COLOR);
    draw_rectangle(rect.x, rect.bottom() - 1.0, rect.w, 1.0, BORDER_COLOR);

    let mut clicked = None;
    let mut x = rect.x.round();
    for (i, label) in labels.iter().enumerate() {
        let width = measure_text(label, None, FONT_SIZE_CONTENT as u16, 1.0).width.round() + 32.0;
        let tab = Rect::new(x, rect.y, width, rect.h);
        let id = ctx.next_id();
        let hovered = ctx.mouse.inside(&tab);
        if hovered {
            ctx.set_hot(id);
        }
        if ctx.take_click(&tab) && i != active_index {
            clicked = Some(i);
        }

        let active = i == active_index;
        if hovered && !active {
            draw_rectangle(tab.x, tab.y, tab.w, tab.h - 1.0, CARD_COLOR);
        }
        if active {
            draw_rectangle(tab.x, tab.bottom() - 2.0, tab.w, 2.0, ACCENT_COLOR);
        }
        let color = if active { TEXT_COLOR } else { TEXT_MUTED };
        draw_centered_text(label, &tab, FONT_SIZE_CONTENT, color);
        x += width;
    }
    clicked
}

/// Selectable row in a list
pub fn list_item(ctx: &mut UiContext, rect: Rect, text: &str, selected: bool, color: Color) -> bool {
    let id = ctx.next_id();
    let hovered = ctx.mouse.inside(&rect);
    if hovered {
        ctx.set_hot(id);
    }
    let clicked = ctx.take_click(&rect);

    if selected {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, CONTROL_HOVER);
        draw_rectangle(rect.x, rect.y, 3.0, rect.h, ACCENT_COLOR);
    } else if hovered {
        draw_rectangle(rect.x, rect.y, rect.w, rect.h, BORDER_COLOR);
    }
    let dims = measure_text(text, None, FONT_SIZE_CONTENT as u16, 1.0);
    draw_text(
        text,
        (rect.x + 10.0).round(),
        (rect.y + (rect.h + dims.height) * 0.5).round(),
        FONT_SIZE_CONTENT,
        if selected { TEXT_COLOR } else { color },
    );
    clicked
}

/// Card background with an optional title; returns the content area
pub fn draw_card(rect: Rect, title: Option<&str>) -> Rect {
    draw_rounded_rect(rect.x, rect.y, rect.w, rect.h, 10.0, CARD_COLOR);
    draw_rectangle_lines(rect.x, rect.y, rect.w, rect.h, 1.0, BORDER_COLOR);
    let inner = rect.pad(PADDING);
    match title {
        Some(title) => {
            draw_text(title, inner.x, inner.y + FONT_SIZE_HEADER * 0.8, FONT_SIZE_HEADER, TEXT_COLOR);
            inner.remaining_after_top(FONT_SIZE_HEADER + 10.0)
        }
        None => inner,
    }
}

/// One line of text at the top of `rect`
pub fn label(rect: Rect, text: &str, size: f32, color: Color) {
    draw_text(text, rect.x.round(), (rect.y + size * 0.8).round(), size, color);
}

fn draw_centered_text(text: &str, rect: &Rect, size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    let x = (rect.x + (rect.w - dims.width) * 0.5).round();
    let y = (rect.y + (rect.h + dims.height) * 0.5 - 1.0).round();
    draw_text(text, x, y, size, color);
}

/// Draw a rounded rectangle (simple approximation using overlapping rects)
pub fn draw_rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32, color: Color) {
    let r = r.min(w * 0.5).min(h * 0.5);
    // Main body
    draw_rectangle(x + r, y, w - r * 2.0, h, color);
    draw_rectangle(x, y + r, w, h - r * 2.0, color);
    // Corners (circles)
    draw_circle(x + r, y + r, r, color);
    draw_circle(x + w - r, y + r, r, color);
    draw_circle(x + r, y + h - r, r, color);
    draw_circle(x + w - r, y + h - r, r, color);
}
