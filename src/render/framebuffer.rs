//! Software framebuffer: RGBA pixels plus a depth buffer

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// From a 0xRRGGBB value
    pub const fn from_hex(hex: u32) -> Self {
        Self::new(((hex >> 16) & 0xff) as u8, ((hex >> 8) & 0xff) as u8, (hex & 0xff) as u8)
    }

    /// From 0..1 float components, clamped
    pub fn from_f32(c: [f32; 3]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Self::new(q(c[0]), q(c[1]), q(c[2]))
    }
}

pub struct Framebuffer {
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
    pub zbuffer: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0; width * height * 4],
            zbuffer: vec![f32::MAX; width * height],
            width,
            height,
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![0; width * height * 4];
            self.zbuffer = vec![f32::MAX; width * height];
        }
    }

    pub fn clear(&mut self, color: Rgb) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
        self.zbuffer.fill(f32::MAX);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some(Rgb::new(self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]))
    }

    pub fn depth(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.zbuffer[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: Rgb) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            self.pixels[idx..idx + 4].copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    /// Depth-tested opaque write. Returns true if the pixel was written.
    pub fn set_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Rgb) -> bool {
        if x < self.width && y < self.height {
            let idx = y * self.width + x;
            if z < self.zbuffer[idx] {
                self.zbuffer[idx] = z;
                self.set_pixel(x, y, color);
                return true;
            }
        }
        false
    }

    /// Depth-tested alpha blend over the existing pixel. Depth is not written,
    /// so later transparent surfaces still show through.
    pub fn blend_pixel_with_depth(&mut self, x: usize, y: usize, z: f32, color: Rgb, alpha: f32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = y * self.width + x;
        if z >= self.zbuffer[idx] {
            return false;
        }
        let a = alpha.clamp(0.0, 1.0);
        let p = idx * 4;
        let mix = |back: u8, front: u8| (back as f32 + (front as f32 - back as f32) * a + 0.5) as u8;
        self.pixels[p] = mix(self.pixels[p], color.r);
        self.pixels[p + 1] = mix(self.pixels[p + 1], color.g);
        self.pixels[p + 2] = mix(self.pixels[p + 2], color.b);
        true
    }

    /// Depth-tested Bresenham line; z is interpolated along the line
    pub fn draw_line_3d(&mut self, x0: i32, y0: i32, z0: f32, x1: i32, y1: i32, z1: f32, color: Rgb) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (x0, y0);

        let total_steps = dx.max((-dy).max(1)) as f32;
        let mut step = 0.0f32;

        loop {
            if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                let t = step / total_steps;
                let z = z0 + t * (z1 - z0);
                let idx = y as usize * self.width + x as usize;
                if z < self.zbuffer[idx] {
                    self.set_pixel(x as usize, y as usize, color);
                }
            }

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
                step += 1.0;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
                if e2 < dy {
                    step += 1.0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_resets_depth() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel_with_depth(1, 1, 2.0, Rgb::new(255, 0, 0));
        fb.clear(Rgb::from_hex(0x0f172a));
        assert_eq!(fb.pixel(1, 1), Some(Rgb::new(0x0f, 0x17, 0x2a)));
        assert_eq!(fb.depth(1, 1), Some(f32::MAX));
        assert_eq!(fb.pixel(4, 0), None);
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut fb = Framebuffer::new(2, 2);
        assert!(fb.set_pixel_with_depth(0, 0, 5.0, Rgb::new(10, 10, 10)));
        assert!(fb.set_pixel_with_depth(0, 0, 3.0, Rgb::new(20, 20, 20)));
        assert!(!fb.set_pixel_with_depth(0, 0, 4.0, Rgb::new(30, 30, 30)));
        assert_eq!(fb.pixel(0, 0), Some(Rgb::new(20, 20, 20)));
    }

    #[test]
    fn test_blend_leaves_depth_untouched() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(Rgb::new(0, 0, 0));
        assert!(fb.blend_pixel_with_depth(0, 0, 1.0, Rgb::new(200, 100, 0), 0.5));
        assert_eq!(fb.pixel(0, 0), Some(Rgb::new(100, 50, 0)));
        assert_eq!(fb.depth(0, 0), Some(f32::MAX));
    }

    #[test]
    fn test_line_is_clipped_to_bounds() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(Rgb::new(0, 0, 0));
        fb.draw_line_3d(-4, 3, 1.0, 20, 3, 1.0, Rgb::new(255, 255, 255));
        assert!((0..8).all(|x| fb.pixel(x, 3) == Some(Rgb::new(255, 255, 255))));
        assert_eq!(fb.pixel(0, 2), Some(Rgb::new(0, 0, 0)));
    }
}
