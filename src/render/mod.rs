//! Software renderer
//!
//! The scene is rasterized on the CPU into a `Framebuffer`, which the host
//! uploads as a texture once per frame. Nothing here needs a GPU context
//! except `present`.
//!
//! - `framebuffer` - RGBA + depth buffers, pixel and line primitives
//! - `raster` - scene traversal, lighting, triangle fill, ground grid

mod framebuffer;
mod raster;

pub use framebuffer::{Framebuffer, Rgb};
pub use raster::{draw_floor_grid, render_scene, Lighting, RenderStats};

use macroquad::prelude::*;

use crate::interaction::ViewportRect;

/// Upload the framebuffer and stretch it over `rect`
pub fn present(fb: &Framebuffer, rect: ViewportRect) {
    if fb.width == 0 || fb.height == 0 {
        return;
    }
    let texture = Texture2D::from_rgba8(fb.width as u16, fb.height as u16, &fb.pixels);
    texture.set_filter(FilterMode::Linear);

    draw_texture_ex(
        &texture,
        rect.x,
        rect.y,
        WHITE,
        DrawTextureParams {
            dest_size: Some(vec2(rect.w, rect.h)),
            ..Default::default()
        },
    );
}
