//! Host application state
//!
//! Plays the page around the viewer: which model and mode are showing, the
//! ghost and expand toggles, per-part load status for the sidebar, and the
//! periodic snapshot of camera and part poses. Switching mode or model
//! remounts the session with the snapshot stored for the new pair.

use std::collections::HashMap;

use assembly_viewer::asset::AssetSource;
use assembly_viewer::geometry::Vec3;
use assembly_viewer::scene::Surface;
use assembly_viewer::storage::{SnapshotStore, ViewSnapshot};
use assembly_viewer::{
    ModelDefinition, MountOptions, ViewMode, ViewerCommands, ViewerConfig, ViewerEvent,
    ViewerSession,
};
use log::{info, warn};

/// Seconds between snapshot saves
pub const SNAPSHOT_INTERVAL: f32 = 1.0;

/// Everything the chrome can ask for. Collected while drawing, applied after.
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    SwitchMode(ViewMode),
    SwitchModel(usize),
    SelectPart(Option<String>),
    SetGhost(bool),
    ToggleExpanded,
    ZoomIn,
    ZoomOut,
    ResetCamera,
    ResetAssembly,
    RotateSelected(Vec3),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PartStatus {
    Loading,
    Loaded,
    Failed(String),
}

pub struct AppState {
    pub models: Vec<ModelDefinition>,
    pub model_index: usize,
    pub mode: ViewMode,
    pub ghost: bool,
    /// Viewport fills the window, sidebar hidden
    pub expanded: bool,
    pub selected: Option<String>,
    pub part_status: HashMap<String, PartStatus>,
    pub surface: Surface,
    pub session: ViewerSession,
    config: ViewerConfig,
    store: SnapshotStore,
    last_saved: Option<ViewSnapshot>,
    since_save: f32,
}

impl AppState {
    /// Mount the first model in assembly mode. `models` must not be empty.
    pub fn new(
        config: ViewerConfig,
        models: Vec<ModelDefinition>,
        store: SnapshotStore,
        source: &dyn AssetSource,
        width: f32,
        height: f32,
    ) -> Self {
        let surface = Surface::new(width, height);
        let mode = ViewMode::Assembly;
        let model = models.first().cloned().unwrap_or_default();
        let options = mount_options(&store, &model.id, mode, false, None);
        let session = ViewerSession::mount(&surface, model, options, source, config.clone());

        let mut app = Self {
            models,
            model_index: 0,
            mode,
            ghost: false,
            expanded: false,
            selected: None,
            part_status: HashMap::new(),
            surface,
            session,
            config,
            store,
            last_saved: None,
            since_save: 0.0,
        };
        app.reset_part_status();
        app
    }

    pub fn current_model(&self) -> &ModelDefinition {
        self.session.model()
    }

    /// The ghost toggle only means something with a selection in simulator mode
    pub fn ghost_available(&self) -> bool {
        self.mode == ViewMode::Simulator && self.selected.is_some()
    }

    pub fn apply(&mut self, action: AppAction, source: &dyn AssetSource) {
        match action {
            AppAction::SwitchMode(mode) => {
                if mode != self.mode {
                    self.save_snapshot();
                    self.mode = mode;
                    self.remount(source);
                }
            }
            AppAction::SwitchModel(index) => {
                if index != self.model_index && index < self.models.len() {
                    self.save_snapshot();
                    self.model_index = index;
                    self.selected = None;
                    self.remount(source);
                }
            }
            AppAction::SelectPart(part) => {
                self.session.select_part(part.as_deref());
                self.selected = self.session.selected().map(str::to_string);
            }
            AppAction::SetGhost(ghost) => {
                self.ghost = ghost;
                self.session.set_ghost(ghost);
            }
            AppAction::ToggleExpanded => self.expanded = !self.expanded,
            AppAction::ZoomIn => self.session.zoom_in(),
            AppAction::ZoomOut => self.session.zoom_out(),
            AppAction::ResetCamera => self.session.reset_camera(),
            AppAction::ResetAssembly => self.session.reset_assembly(),
            AppAction::RotateSelected(delta) => self.session.rotate_selected(delta),
        }
    }

    /// Drain viewer events into sidebar state
    pub fn handle_viewer_events(&mut self) {
        for event in self.session.drain_events() {
            match event {
                ViewerEvent::SelectionChanged(part) => self.selected = part,
                ViewerEvent::PartLoaded(id) => {
                    self.part_status.insert(id, PartStatus::Loaded);
                }
                ViewerEvent::PartFailed { id, reason } => {
                    self.part_status.insert(id, PartStatus::Failed(reason));
                }
                ViewerEvent::PartAssembled(id) => info!("{} assembled", id),
            }
        }
    }

    /// Count time and save a snapshot every `SNAPSHOT_INTERVAL` seconds
    pub fn tick_autosave(&mut self, dt: f32) {
        self.since_save += dt;
        if self.since_save >= SNAPSHOT_INTERVAL {
            self.since_save = 0.0;
            self.save_snapshot();
        }
    }

    /// Persist camera and poses for the current model and mode.
    /// Unchanged snapshots are not rewritten.
    pub fn save_snapshot(&mut self) {
        let snapshot = ViewSnapshot {
            camera: self.session.camera_state(),
            parts: self.session.parts_state(),
        };
        if snapshot.is_empty() || self.last_saved.as_ref() == Some(&snapshot) {
            return;
        }
        let model_id = self.session.model().id.clone();
        match self.store.save(&model_id, self.mode, &snapshot) {
            Ok(()) => self.last_saved = Some(snapshot),
            Err(e) => warn!("could not save snapshot for {}: {}", model_id, e),
        }
    }

    fn remount(&mut self, source: &dyn AssetSource) {
        let model = self.models[self.model_index].clone();
        if self.mode != ViewMode::Single {
            self.selected = None;
        }
        let options = mount_options(&self.store, &model.id, self.mode, self.ghost, self.selected.clone());
        self.session.remount(model, options, source);
        self.last_saved = None;
        self.since_save = 0.0;
        self.reset_part_status();
    }

    fn reset_part_status(&mut self) {
        self.part_status = self
            .session
            .part_ids()
            .iter()
            .map(|id| (id.clone(), PartStatus::Loading))
            .collect();
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}

fn mount_options(
    store: &SnapshotStore,
    model_id: &str,
    mode: ViewMode,
    ghost: bool,
    selected: Option<String>,
) -> MountOptions {
    let snapshot = store.load_or_default(model_id, mode);
    MountOptions::new(mode)
        .with_ghost(ghost)
        .with_selected(selected)
        .with_camera(snapshot.camera)
        .with_parts(snapshot.parts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assembly_viewer::asset::{AssetError, AsyncOp};
    use assembly_viewer::model::builtin_model;

    /// Every fetch fails at once, so parts settle as failed on the first poll
    struct MissingAssets;

    impl AssetSource for MissingAssets {
        fn fetch(&self, asset_ref: &str) -> AsyncOp<Vec<u8>> {
            AsyncOp::ready(Err(AssetError::Fetch {
                path: asset_ref.to_string(),
                message: "offline".into(),
            }))
        }
    }

    fn app() -> AppState {
        let models = vec![
            builtin_model("RobotArm").unwrap(),
            builtin_model("Suspension").unwrap(),
        ];
        AppState::new(
            ViewerConfig::default(),
            models,
            SnapshotStore::in_memory(),
            &MissingAssets,
            800.0,
            600.0,
        )
    }

    #[test]
    fn test_failed_loads_show_in_part_status() {
        let mut app = app();
        assert!(app.part_status.values().all(|s| *s == PartStatus::Loading));

        app.session.poll_loads();
        app.handle_viewer_events();
        assert!(!app.part_status.is_empty());
        assert!(app
            .part_status
            .values()
            .all(|s| matches!(s, PartStatus::Failed(reason) if reason.contains("offline"))));
    }

    #[test]
    fn test_mode_switch_restores_saved_camera() {
        let mut app = app();
        app.apply(AppAction::ZoomIn, &MissingAssets);
        for _ in 0..200 {
            app.session.frame(1.0 / 60.0);
        }
        let zoomed = app.session.camera_state().unwrap();

        let close = |a: [f32; 3], b: [f32; 3]| Vec3::from_array(a).approx_eq(Vec3::from_array(b), 1e-4);

        app.apply(AppAction::SwitchMode(ViewMode::Simulator), &MissingAssets);
        assert_eq!(app.session.mode(), ViewMode::Simulator);
        assert!(!close(app.session.camera_state().unwrap().position, zoomed.position));

        app.apply(AppAction::SwitchMode(ViewMode::Assembly), &MissingAssets);
        let restored = app.session.camera_state().unwrap();
        assert!(close(restored.position, zoomed.position));
        assert!(close(restored.target, zoomed.target));
    }

    #[test]
    fn test_model_switch_resets_selection_and_status() {
        let mut app = app();
        app.selected = Some("base".into());
        app.apply(AppAction::SwitchModel(1), &MissingAssets);
        assert_eq!(app.current_model().id, "Suspension");
        assert_eq!(app.selected, None);
        assert_eq!(app.part_status.len(), app.session.part_ids().len());

        // Out of range is ignored
        app.apply(AppAction::SwitchModel(7), &MissingAssets);
        assert_eq!(app.model_index, 1);
    }

    #[test]
    fn test_ghost_needs_simulator_and_selection() {
        let mut app = app();
        app.selected = Some("base".into());
        assert!(!app.ghost_available());
        app.mode = ViewMode::Simulator;
        assert!(app.ghost_available());
        app.selected = None;
        assert!(!app.ghost_available());
    }

    #[test]
    fn test_autosave_waits_for_interval() {
        let mut app = app();
        app.tick_autosave(0.5);
        assert!(app.last_saved.is_none());
        app.tick_autosave(0.6);
        assert!(app.last_saved.is_some());
        assert!(app.store.load("RobotArm", ViewMode::Assembly).unwrap().is_some());
    }

    #[test]
    fn test_expand_toggles() {
        let mut app = app();
        app.apply(AppAction::ToggleExpanded, &MissingAssets);
        assert!(app.expanded);
        app.apply(AppAction::ToggleExpanded, &MissingAssets);
        assert!(!app.expanded);
    }
}
