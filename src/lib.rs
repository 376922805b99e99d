//! Assembly viewer: interactive 3D exploration of mechanical assemblies
//!
//! A model is a list of parts, each a GLB file with an assembled and an
//! exploded pose. A mounted `ViewerSession` loads the parts, lets the user
//! orbit, pick, explode and reassemble them, and reports what happened
//! through `ViewerEvent`s. Four view modes change what is shown and which
//! gestures are live:
//! - Single: one part at a time, centered and framed
//! - Assembly: everything assembled, click to highlight
//! - Edit: parts start exploded and are moved back by hand or by click
//! - Simulator: vertical drag explodes and reassembles the whole model
//!
//! The session core takes plain input events and a frame tick, so it runs
//! without a window. `render` rasterizes its scene on the CPU; `ui` and
//! `storage` serve the host binary.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod anim;
pub mod asset;
pub mod config;
pub mod geometry;
pub mod handle;
pub mod interaction;
pub mod mode;
pub mod model;
pub mod render;
pub mod scene;
pub mod session;
pub mod storage;
pub mod ui;

pub use config::{ConfigError, ViewerConfig};
pub use handle::{MountOptions, PartPose, ViewerCommands, ViewerEvent};
pub use mode::ViewMode;
pub use model::{ModelDefinition, ModelError, PartSpec};
pub use session::ViewerSession;
