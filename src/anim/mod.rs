//! Frame-driven animation
//!
//! Every tween in the viewer is a task in one `AnimationScheduler`, advanced
//! by the session's frame tick.

mod easing;
mod scheduler;

pub use easing::{ease_in_out_cubic, ease_out_cubic, Easing};
pub use scheduler::{AnimationScheduler, TaskId, TaskKind, TaskStep};
