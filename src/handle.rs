//! Host-facing interface
//!
//! Hosts talk to a viewer through `MountOptions` going in, `ViewerEvent`s
//! coming out, and the `ViewerCommands` accessors for camera and pose
//! snapshots. Persisting those snapshots is up to the host.

use serde::{Deserialize, Serialize};

use crate::mode::ViewMode;
use crate::scene::CameraState;

/// Pose of one loaded part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartPose {
    pub id: String,
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation: [f32; 3],
    /// 0 assembled, 1 exploded
    #[serde(default)]
    pub explode: f32,
    /// Step-assembly flag from edit mode
    #[serde(default)]
    pub done: bool,
}

/// Props a viewer is mounted with
#[derive(Debug, Clone)]
pub struct MountOptions {
    pub mode: ViewMode,
    pub ghost: bool,
    /// Part to select once mounted (single mode shows it as soon as it loads)
    pub selected: Option<String>,
    pub initial_camera: Option<CameraState>,
    pub initial_parts: Vec<PartPose>,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            mode: ViewMode::Assembly,
            ghost: false,
            selected: None,
            initial_camera: None,
            initial_parts: Vec::new(),
        }
    }
}

impl MountOptions {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn with_ghost(mut self, ghost: bool) -> Self {
        self.ghost = ghost;
        self
    }

    pub fn with_selected(mut self, part: Option<String>) -> Self {
        self.selected = part;
        self
    }

    pub fn with_camera(mut self, camera: Option<CameraState>) -> Self {
        self.initial_camera = camera;
        self
    }

    pub fn with_parts(mut self, parts: Vec<PartPose>) -> Self {
        self.initial_parts = parts;
        self
    }
}

/// Notifications drained by the host each frame
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    SelectionChanged(Option<String>),
    PartLoaded(String),
    PartFailed { id: String, reason: String },
    /// Edit-mode tween reached the assembled pose
    PartAssembled(String),
}

/// Camera and pose accessors. Every method is a no-op (or returns nothing)
/// while the viewer is not mounted.
pub trait ViewerCommands {
    fn zoom_in(&mut self);
    fn zoom_out(&mut self);
    fn reset_camera(&mut self);
    fn camera_state(&self) -> Option<CameraState>;
    fn set_camera_state(&mut self, state: &CameraState);
    fn parts_state(&self) -> Vec<PartPose>;
}
