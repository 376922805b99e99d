//! Rectangle type for UI layout

/// A rectangle defined by position and size
#[derive(Debug, Clone, Copy, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Create from screen dimensions
    pub fn screen(width: f32, height: f32) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Center Y
    pub fn center_y(&self) -> f32 {
        self.y + self.h * 0.5
    }

    /// Check if point is inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Shrink by padding on all sides
    pub fn pad(&self, padding: f32) -> Self {
        Self::new(
            self.x + padding,
            self.y + padding,
            (self.w - padding * 2.0).max(0.0),
            (self.h - padding * 2.0).max(0.0),
        )
    }

    /// Split horizontally at ratio (0.0 - 1.0), returns (left, right)
    pub fn split_h(&self, ratio: f32) -> (Self, Self) {
        let split_x = self.w * ratio.clamp(0.0, 1.0);
        (
            Self::new(self.x, self.y, split_x, self.h),
            Self::new(self.x + split_x, self.y, self.w - split_x, self.h),
        )
    }

    /// Get a horizontal slice (for toolbars, status bars)
    pub fn slice_top(&self, height: f32) -> Self {
        Self::new(self.x, self.y, self.w, height.min(self.h))
    }

    /// Get remaining area after slicing top
    pub fn remaining_after_top(&self, height: f32) -> Self {
        let h = height.min(self.h);
        Self::new(self.x, self.y + h, self.w, self.h - h)
    }

    /// Cut a fixed-width column off the right, returns (rest, column)
    pub fn split_right_px(&self, pixels: f32) -> (Self, Self) {
        let w = pixels.clamp(0.0, self.w);
        (
            Self::new(self.x, self.y, self.w - w, self.h),
            Self::new(self.right() - w, self.y, w, self.h),
        )
    }

    /// Stack `count` rows of `row_h` from the top with `gap` between them
    pub fn rows(&self, row_h: f32, gap: f32, count: usize) -> Vec<Self> {
        (0..count)
            .map(|i| Self::new(self.x, self.y + i as f32 * (row_h + gap), self.w, row_h))
            .collect()
    }

    /// The viewer input layer's equivalent of this rect
    pub fn to_viewport(&self) -> crate::interaction::ViewportRect {
        crate::interaction::ViewportRect {
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_h() {
        let r = Rect::new(0.0, 0.0, 100.0, 50.0);
        let (left, right) = r.split_h(0.3);
        assert!((left.w - 30.0).abs() < 0.001);
        assert!((right.w - 70.0).abs() < 0.001);
        assert!((right.x - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_right_column_and_rows() {
        let r = Rect::new(0.0, 0.0, 1000.0, 600.0);
        let (view, side) = r.split_right_px(320.0);
        assert_eq!(view.w, 680.0);
        assert_eq!(side.x, 680.0);

        let rows = side.pad(10.0).rows(24.0, 4.0, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].y, 10.0 + 2.0 * 28.0);
        assert_eq!(rows[0].w, 300.0);

        let slice = r.slice_top(32.0);
        assert_eq!(r.remaining_after_top(32.0).y, slice.bottom());
    }

    #[test]
    fn test_contains() {
        let r = Rect::new(10.0, 20.0, 100.0, 50.0);
        assert!(r.contains(50.0, 40.0));
        assert!(!r.contains(5.0, 40.0));
        assert!(!r.contains(50.0, 100.0));
    }
}
