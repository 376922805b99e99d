//! Explode/assemble drag
//!
//! One progress value `t` in [0, 1] is shared by every part. It runs from a
//! rolling "from" endpoint to a "to" endpoint; starting out, from is the
//! assembled pose. Releasing snaps `t` to an end, and reaching the "to" end
//! swaps the pair so the next drag continues from where the parts now sit.

use crate::geometry::{lerp, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    start_y: f32,
    start_t: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExplodeState {
    t: f32,
    /// True while "to" is the exploded pose
    toward_exploded: bool,
    drag: Option<DragAnchor>,
}

impl Default for ExplodeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplodeState {
    /// Fully assembled, heading toward exploded
    pub fn new() -> Self {
        Self {
            t: 0.0,
            toward_exploded: true,
            drag: None,
        }
    }

    /// State sitting at an absolute explode fraction (0 assembled, 1 exploded)
    pub fn from_fraction(fraction: f32) -> Self {
        let f = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };
        if f >= 1.0 {
            Self {
                t: 0.0,
                toward_exploded: false,
                drag: None,
            }
        } else {
            Self {
                t: f,
                toward_exploded: true,
                drag: None,
            }
        }
    }

    /// Progress along the current from→to pair
    pub fn progress(&self) -> f32 {
        self.t
    }

    /// Absolute explode fraction: 0 assembled, 1 exploded
    pub fn fraction(&self) -> f32 {
        if self.toward_exploded {
            self.t
        } else {
            1.0 - self.t
        }
    }

    pub fn toward_exploded(&self) -> bool {
        self.toward_exploded
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn begin_drag(&mut self, y: f32) {
        self.drag = Some(DragAnchor {
            start_y: y,
            start_t: self.t,
        });
    }

    /// Update progress from the pointer's y. Upward motion increases it.
    pub fn drag_to(&mut self, y: f32, sensitivity: f32) -> f32 {
        if let Some(anchor) = self.drag {
            self.set_progress(anchor.start_t + (anchor.start_y - y) * sensitivity);
        }
        self.t
    }

    /// End the drag and return the endpoint to settle on: 1 if progress is at
    /// or above `threshold`, 0 otherwise.
    pub fn release(&mut self, threshold: f32) -> f32 {
        self.drag = None;
        if self.t >= threshold {
            1.0
        } else {
            0.0
        }
    }

    pub fn set_progress(&mut self, t: f32) {
        if t.is_finite() {
            self.t = t.clamp(0.0, 1.0);
        }
    }

    /// Land exactly on an endpoint. Landing on "to" swaps the pair.
    pub fn settle(&mut self, target: f32) {
        if target >= 1.0 {
            self.toward_exploded = !self.toward_exploded;
        }
        self.t = 0.0;
        self.drag = None;
    }

    /// Current (from, to) endpoints for one part
    pub fn endpoints(&self, assembled: Vec3, exploded: Vec3) -> (Vec3, Vec3) {
        if self.toward_exploded {
            (assembled, exploded)
        } else {
            (exploded, assembled)
        }
    }

    /// Interpolated position for one part; endpoints are returned exactly
    pub fn position(&self, assembled: Vec3, exploded: Vec3) -> Vec3 {
        let (from, to) = self.endpoints(assembled, exploded);
        if self.t <= 0.0 {
            from
        } else if self.t >= 1.0 {
            to
        } else {
            lerp(from, to, self.t)
        }
    }
}
