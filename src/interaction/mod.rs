//! Interaction controller pieces
//!
//! Pointer events, picking, the explode drag, the edit-mode gizmo and
//! single-part framing. The session wires them together; only one gesture
//! may be armed at a time.

mod explode;
mod framing;
mod gizmo;
mod input;
mod picking;

pub use explode::ExplodeState;
pub use framing::{apply_appear, center_at_origin};
pub use gizmo::{Gizmo, TranslateDrag};
pub use input::{InputEvent, MacroquadInput, Modifiers, PointerButton, ViewportRect};
pub use picking::{pick_nearest, PickHit};

use crate::geometry::Vec2;

/// The gesture currently owning the pointer
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    /// Button down but not yet moved past the click slop
    Pressed { button: PointerButton, start: Vec2, last: Vec2 },
    Orbit { last: Vec2 },
    Pan { last: Vec2 },
    /// Simulator explode/assemble drag
    Explode,
    /// Edit-mode translate of the gizmo's part. Released within the click
    /// slop of `start`, it counts as a click.
    EditDrag { drag: TranslateDrag, start: Vec2 },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Camera navigation is suspended while a part-moving gesture is armed
    pub fn blocks_orbit(&self) -> bool {
        matches!(self, Gesture::Explode | Gesture::EditDrag { .. })
    }
}
