//! Viewer session
//!
//! One `ViewerSession` owns everything a mounted viewer needs: scene graph,
//! part registry, camera, animation tasks, gesture state and pending loads.
//! The host feeds it input events and a frame tick, then draws its scene.
//!
//! Per frame the host should call, in order: `handle_event` for each input
//! event, `frame(dt)`, then draw. That keeps input-driven transforms in the
//! same frame they were produced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};

use crate::anim::{AnimationScheduler, Easing, TaskId, TaskKind, TaskStep};
use crate::asset::{
    decode_gltf, AssetSource, AsyncOp, GeometryAsset, MaterialBaselines, PartInstall,
    PartRegistry,
};
use crate::config::ViewerConfig;
use crate::geometry::{lerp, screen_to_ray, Ray, Vec2, Vec3};
use crate::handle::{MountOptions, PartPose, ViewerCommands, ViewerEvent};
use crate::interaction::{
    apply_appear, center_at_origin, pick_nearest, ExplodeState, Gesture, Gizmo, InputEvent,
    Modifiers, PointerButton, TranslateDrag,
};
use crate::mode::{apply_visuals, EntryPose, ViewMode};
use crate::model::ModelDefinition;
use crate::scene::{CameraState, OrbitCamera, Registration, SceneGraph, Surface, SurfaceUsage};

/// Input listeners a mounted viewer holds on its surface
const LISTENERS: [&str; 4] = ["pointerdown", "pointermove", "pointerup", "wheel"];

/// Positions closer than this count as "at the assembled pose"
const POSE_EPSILON: f32 = 1e-4;

struct PendingPart {
    spec_index: usize,
    id: String,
    op: AsyncOp<Vec<u8>>,
    generation: u64,
    alive: Arc<AtomicBool>,
}

pub struct ViewerSession {
    config: ViewerConfig,
    surface: Surface,
    model: ModelDefinition,
    runtime_ids: Vec<String>,

    mode: ViewMode,
    ghost: bool,
    selected: Option<String>,

    scene: SceneGraph,
    baselines: MaterialBaselines,
    registry: PartRegistry,
    camera: OrbitCamera,
    scheduler: AnimationScheduler,

    explode: ExplodeState,
    snap_task: Option<TaskId>,
    gizmo: Gizmo,
    gesture: Gesture,

    pending: Vec<PendingPart>,
    initial_parts: HashMap<String, PartPose>,
    events: Vec<ViewerEvent>,

    generation: u64,
    alive: Arc<AtomicBool>,
    ready: bool,
    registrations: Vec<Registration>,
}

impl ViewerSession {
    /// Create the scene on `surface` and start loading every part of `model`
    pub fn mount(
        surface: &Surface,
        model: ModelDefinition,
        options: MountOptions,
        source: &dyn AssetSource,
        config: ViewerConfig,
    ) -> Self {
        let (width, height) = surface.size();
        let camera = OrbitCamera::new(&config, width, height);
        let mut session = Self {
            config,
            surface: surface.clone(),
            model: ModelDefinition::default(),
            runtime_ids: Vec::new(),
            mode: options.mode,
            ghost: options.ghost,
            selected: None,
            scene: SceneGraph::new(),
            baselines: MaterialBaselines::new(),
            registry: PartRegistry::new(),
            camera,
            scheduler: AnimationScheduler::new(),
            explode: ExplodeState::new(),
            snap_task: None,
            gizmo: Gizmo::default(),
            gesture: Gesture::Idle,
            pending: Vec::new(),
            initial_parts: HashMap::new(),
            events: Vec::new(),
            generation: 0,
            alive: Arc::new(AtomicBool::new(false)),
            ready: false,
            registrations: Vec::new(),
        };
        session.start(model, options, source);
        session
    }

    fn start(&mut self, model: ModelDefinition, options: MountOptions, source: &dyn AssetSource) {
        self.generation += 1;
        self.alive = Arc::new(AtomicBool::new(true));
        self.ready = true;

        self.registrations = LISTENERS
            .iter()
            .map(|name| self.surface.add_listener(name))
            .collect();
        self.registrations.push(self.surface.start_frame_loop());

        let (width, height) = self.surface.size();
        self.camera = OrbitCamera::new(&self.config, width, height);
        if let Some(state) = &options.initial_camera {
            self.camera.apply_state(state);
        }

        self.mode = options.mode;
        self.ghost = options.ghost;
        self.selected = None;
        self.runtime_ids = model.runtime_ids();
        self.model = model;

        self.explode = ExplodeState::new();
        if self.mode.explode_enabled() {
            let saved = options.initial_parts.iter().map(|p| p.explode).reduce(f32::max);
            if let Some(fraction) = saved {
                self.explode = ExplodeState::from_fraction(fraction);
            }
        }
        self.initial_parts = options
            .initial_parts
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        for (spec_index, spec) in self.model.parts.iter().enumerate() {
            self.pending.push(PendingPart {
                spec_index,
                id: self.runtime_ids[spec_index].clone(),
                op: source.fetch(&spec.path),
                generation: self.generation,
                alive: Arc::clone(&self.alive),
            });
        }

        info!(
            "mounted {} ({} parts) in {} mode",
            self.model.id,
            self.model.parts.len(),
            self.mode
        );

        if let Some(part) = options.selected {
            self.select_part(Some(&part));
        }
    }

    /// Stop the frame loop, drop listeners, GPU buffers and parts.
    /// Loads still in flight are abandoned and ignored when they land.
    pub fn teardown(&mut self) {
        if !self.ready {
            return;
        }
        self.alive.store(false, Ordering::SeqCst);
        self.ready = false;

        self.scheduler.cancel_all();
        self.snap_task = None;
        self.gizmo.detach();
        self.gesture = Gesture::Idle;
        self.selected = None;
        self.explode = ExplodeState::new();

        self.registry.clear();
        self.scene.clear();
        self.baselines.clear();
        self.initial_parts.clear();
        self.events.clear();
        for registration in self.registrations.drain(..) {
            debug!("releasing {:?} '{}'", registration.kind(), registration.label());
        }

        debug!("viewer torn down (generation {})", self.generation);
    }

    /// Full rebuild for a new model or mode identity
    pub fn remount(&mut self, model: ModelDefinition, options: MountOptions, source: &dyn AssetSource) {
        self.teardown();
        self.start(model, options, source);
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Install every load that has completed since the last call. Loads from
    /// a previous mount are dropped without touching the scene.
    pub fn poll_loads(&mut self) {
        let mut finished = Vec::new();
        for mut load in std::mem::take(&mut self.pending) {
            if load.op.is_complete() {
                finished.push(load);
            } else {
                self.pending.push(load);
            }
        }

        for load in finished {
            let live = self.ready
                && load.alive.load(Ordering::SeqCst)
                && load.generation == self.generation;
            let Some(result) = load.op.take() else {
                continue;
            };
            if !live {
                debug!("ignoring stale load of {} (generation {})", load.id, load.generation);
                continue;
            }

            match result.and_then(|bytes| decode_gltf(&bytes)) {
                Ok(asset) => self.install_part(load.spec_index, &load.id, asset),
                Err(e) => {
                    warn!("part {} failed to load: {}", load.id, e);
                    self.events.push(ViewerEvent::PartFailed {
                        id: load.id,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Loads not yet resolved, across all mounts
    pub fn pending_loads(&self) -> usize {
        self.pending.len()
    }

    fn install_part(&mut self, spec_index: usize, id: &str, asset: GeometryAsset) {
        let Some(spec) = self.model.parts.get(spec_index) else {
            return;
        };
        let install = PartInstall {
            id,
            spec_index,
            assembled: spec.assembled,
            exploded: spec.exploded,
            fixed_rotation: spec.rotation.unwrap_or(Vec3::ZERO),
        };
        let vertices = asset.vertex_count();
        if self
            .registry
            .install(install, asset, &mut self.scene, &mut self.baselines, &self.surface)
            .is_none()
        {
            warn!("part {} loaded twice, keeping the first", id);
            return;
        }

        self.place_new_part(id);
        self.refresh_visuals();
        if self.mode == ViewMode::Single && self.selected.as_deref() == Some(id) {
            self.present_single(id);
        }

        info!("loaded part {} ({} vertices)", id, vertices);
        self.events.push(ViewerEvent::PartLoaded(id.to_string()));
    }

    /// Initial transform for a part that just arrived
    fn place_new_part(&mut self, id: &str) {
        let saved = self.initial_parts.get(id).cloned();
        let visible = self.mode != ViewMode::Single || self.selected.as_deref() == Some(id);
        let Some(part) = self.registry.get_mut(id) else {
            return;
        };

        let mut position = match self.mode.entry_pose() {
            EntryPose::Exploded => part.exploded,
            EntryPose::Assembled if self.mode.explode_enabled() => {
                self.explode.position(part.assembled, part.exploded)
            }
            EntryPose::Assembled | EntryPose::Hidden => part.assembled,
        };
        let mut rotation = Vec3::ZERO;
        part.done = false;

        if let Some(pose) = saved {
            let p = Vec3::from_array(pose.position);
            let r = Vec3::from_array(pose.rotation);
            if p.is_finite() && r.is_finite() {
                position = p;
                rotation = r;
                part.done = pose.done;
            }
        }

        if let Some(node) = self.scene.node_mut(part.node) {
            node.position = position;
            node.rotation = rotation;
            node.visible = visible;
        }
    }

    // ------------------------------------------------------------------
    // Props
    // ------------------------------------------------------------------

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switch modes. Always clears selection, gizmo, gestures and running
    /// tweens, then re-poses every loaded part for the new mode.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if !self.ready {
            return;
        }
        let previous = self.mode;
        self.reset_interaction();
        self.mode = mode;
        self.explode = ExplodeState::new();

        let entry = mode.entry_pose();
        for part in self.registry.iter_mut() {
            if let Some(node) = self.scene.node_mut(part.node) {
                node.position = match entry {
                    EntryPose::Exploded => part.exploded,
                    EntryPose::Assembled | EntryPose::Hidden => part.assembled,
                };
                node.rotation = Vec3::ZERO;
                node.scale = 1.0;
                node.visible = entry != EntryPose::Hidden;
            }
            part.done = false;
        }

        if previous == ViewMode::Single && mode != ViewMode::Single {
            self.camera
                .look_from(self.config.camera_position, self.config.camera_target);
        }
        self.refresh_visuals();
        debug!("mode {} -> {}", previous, mode);
    }

    pub fn ghost(&self) -> bool {
        self.ghost
    }

    pub fn set_ghost(&mut self, ghost: bool) {
        self.ghost = ghost;
        if self.ready {
            self.refresh_visuals();
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select from outside the canvas (part list). Unknown ids are ignored.
    pub fn select_part(&mut self, id: Option<&str>) {
        if !self.ready {
            return;
        }
        if let Some(id) = id {
            if !self.runtime_ids.iter().any(|r| r == id) {
                debug!("select_part: no part {}", id);
                return;
            }
        }
        self.set_selection(id.map(str::to_string));

        match self.mode {
            ViewMode::Single => {
                for part in self.registry.iter() {
                    self.scheduler.cancel_for_part(&part.id);
                    if let Some(node) = self.scene.node_mut(part.node) {
                        node.visible = id == Some(part.id.as_str());
                        node.scale = 1.0;
                    }
                }
                self.refresh_visuals();
                if let Some(id) = id {
                    self.present_single(id);
                }
            }
            ViewMode::Edit => {
                match id {
                    Some(id) => self.gizmo.attach(id),
                    None => self.gizmo.detach(),
                }
                self.refresh_visuals();
            }
            _ => self.refresh_visuals(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if self.surface.resize(width, height) {
            let (w, h) = self.surface.size();
            self.camera.set_viewport(w, h);
            debug!("viewer resized to {}x{}", w, h);
        }
    }

    /// Edit mode: send every part back to its exploded pose
    pub fn reset_assembly(&mut self) {
        if !self.ready || self.mode != ViewMode::Edit {
            return;
        }
        if matches!(self.gesture, Gesture::EditDrag { .. }) {
            self.gesture = Gesture::Idle;
        }
        self.gizmo.detach();
        for part in self.registry.iter_mut() {
            self.scheduler.cancel_for_part(&part.id);
            part.done = false;
            if let Some(node) = self.scene.node_mut(part.node) {
                node.position = part.exploded;
                node.rotation = Vec3::ZERO;
            }
        }
        debug!("assembly reset");
    }

    /// Edit mode: add `delta` (radians, XYZ) to the selected part's rotation
    pub fn rotate_selected(&mut self, delta: Vec3) {
        if !self.ready || self.mode != ViewMode::Edit || !delta.is_finite() {
            return;
        }
        let Some(id) = self.selected.clone() else {
            return;
        };
        if self.scheduler.is_assembling(&id) {
            return;
        }
        if let Some(part) = self.registry.get(&id) {
            if let Some(node) = self.scene.node_mut(part.node) {
                node.rotation += delta;
            }
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    pub fn handle_event(&mut self, event: InputEvent) {
        if !self.ready {
            return;
        }
        match event {
            InputEvent::PointerDown { x, y, button, modifiers } => self.pointer_down(x, y, button, modifiers),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(x, y),
            InputEvent::PointerUp { x, y, button } => self.pointer_up(x, y, button),
            InputEvent::Wheel { delta } => {
                if !self.gesture.blocks_orbit() && delta.is_finite() {
                    self.camera.dolly(self.config.wheel_zoom_factor.powf(delta));
                }
            }
        }
    }

    fn pointer_down(&mut self, x: f32, y: f32, button: PointerButton, modifiers: Modifiers) {
        if !self.gesture.is_idle() {
            return;
        }

        if button == PointerButton::Primary && modifiers.shift && self.mode.explode_enabled() {
            if let Some(task) = self.snap_task.take() {
                if let Some(step) = self.scheduler.complete(task) {
                    self.apply_step(step);
                }
            }
            self.camera.stop();
            self.explode.begin_drag(y);
            self.gesture = Gesture::Explode;
            return;
        }

        if button == PointerButton::Primary && self.mode == ViewMode::Edit {
            if let Some(drag) = self.try_begin_edit_drag(x, y) {
                self.camera.stop();
                self.gesture = Gesture::EditDrag {
                    drag,
                    start: Vec2::new(x, y),
                };
                return;
            }
        }

        let p = Vec2::new(x, y);
        self.gesture = Gesture::Pressed {
            button,
            start: p,
            last: p,
        };
    }

    fn try_begin_edit_drag(&self, x: f32, y: f32) -> Option<TranslateDrag> {
        let id = self.gizmo.attached()?;
        if self.scheduler.is_assembling(id) {
            return None;
        }
        let ray = self.ray_at(x, y);
        let hit = pick_nearest(&self.scene, &ray)?.part?;
        if hit != id {
            return None;
        }
        let part = self.registry.get(id)?;
        let node = self.scene.node(part.node)?;
        TranslateDrag::begin(id, node.position, &ray, self.camera.forward())
    }

    fn pointer_move(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        match &mut self.gesture {
            Gesture::Idle => {}
            Gesture::Pressed { button, start, last } => {
                if start.distance(p) > self.config.click_slop {
                    let (button, last) = (*button, *last);
                    self.gesture = match button {
                        PointerButton::Primary => Gesture::Orbit { last },
                        PointerButton::Secondary | PointerButton::Middle => Gesture::Pan { last },
                    };
                    self.pointer_move(x, y);
                } else {
                    *last = p;
                }
            }
            Gesture::Orbit { last } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                *last = p;
                let speed = self.config.rotate_speed;
                self.camera.rotate(-dx * speed, dy * speed);
            }
            Gesture::Pan { last } => {
                let (dx, dy) = (p.x - last.x, p.y - last.y);
                *last = p;
                self.camera.pan(dx, dy, self.config.pan_speed);
            }
            Gesture::Explode => {
                self.explode.drag_to(y, self.config.explode_sensitivity);
                self.apply_explode();
            }
            Gesture::EditDrag { drag, .. } => {
                let ray = screen_to_ray(x, y, &self.camera.viewpoint());
                if let Some(position) = drag.update(&ray) {
                    if let Some(part) = self.registry.get(&drag.part) {
                        if let Some(node) = self.scene.node_mut(part.node) {
                            node.position = position;
                        }
                    }
                }
            }
        }
    }

    fn pointer_up(&mut self, x: f32, y: f32, button: PointerButton) {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Pressed { button: pressed, .. } if pressed == button => {
                if button == PointerButton::Primary {
                    self.click(x, y);
                }
            }
            Gesture::Explode => self.release_explode(),
            Gesture::EditDrag { drag, start } => {
                if start.distance(Vec2::new(x, y)) <= self.config.click_slop {
                    self.cancel_edit_drag(&drag);
                    self.click(x, y);
                } else {
                    self.finish_edit_drag(&drag);
                }
            }
            _ => {}
        }
    }

    fn click(&mut self, x: f32, y: f32) {
        if !self.mode.picking_enabled() {
            return;
        }
        let ray = self.ray_at(x, y);
        let hit = pick_nearest(&self.scene, &ray)
            .and_then(|h| h.part)
            .filter(|id| self.registry.contains(id));

        match (self.mode, hit) {
            (ViewMode::Edit, Some(id)) => {
                self.set_selection(Some(id.clone()));
                self.gizmo.attach(&id);
                self.start_assemble(&id);
            }
            (ViewMode::Edit, None) => {
                self.set_selection(None);
                self.gizmo.detach();
            }
            (_, hit) => self.set_selection(hit),
        }
        self.refresh_visuals();
    }

    fn ray_at(&self, x: f32, y: f32) -> Ray {
        screen_to_ray(x, y, &self.camera.viewpoint())
    }

    fn release_explode(&mut self) {
        let target = self.explode.release(self.config.snap_threshold);
        let from = self.explode.progress();
        let duration = self.config.explode_snap_duration;

        if duration <= 0.0 || (from - target).abs() < f32::EPSILON {
            self.explode.settle(target);
            self.apply_explode();
        } else {
            let task = self.scheduler.start(
                TaskKind::ExplodeSnap { from, to: target },
                duration,
                Easing::EaseOutCubic,
            );
            self.snap_task = Some(task);
        }
    }

    /// Put the part back where the drag picked it up
    fn cancel_edit_drag(&mut self, drag: &TranslateDrag) {
        if let Some(part) = self.registry.get(&drag.part) {
            if let Some(node) = self.scene.node_mut(part.node) {
                node.position = drag.start_position;
            }
        }
    }

    fn finish_edit_drag(&mut self, drag: &TranslateDrag) {
        if let Some(part) = self.registry.get_mut(&drag.part) {
            if let Some(node) = self.scene.node(part.node) {
                part.done = node.position.approx_eq(part.assembled, POSE_EPSILON);
            }
        }
    }

    fn start_assemble(&mut self, id: &str) {
        if self.scheduler.is_assembling(id) {
            return;
        }
        let Some(part) = self.registry.get(id) else {
            return;
        };
        if part.done {
            return;
        }
        let Some(node) = self.scene.node(part.node) else {
            return;
        };
        let kind = TaskKind::AssembleMove {
            part: id.to_string(),
            from: node.position,
            to: part.assembled,
        };
        self.scheduler
            .start(kind, self.config.assemble_duration, Easing::EaseInOutCubic);
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Advance one frame: resolve loads, step tweens, damp the camera
    pub fn frame(&mut self, dt: f32) {
        self.poll_loads();
        if !self.ready {
            return;
        }
        for step in self.scheduler.advance(dt) {
            self.apply_step(step);
        }
        if !self.gesture.blocks_orbit() {
            self.camera.update();
        }
    }

    fn apply_step(&mut self, step: TaskStep) {
        match step.kind {
            TaskKind::AssembleMove { part, from, to } => {
                let Some(state) = self.registry.get_mut(&part) else {
                    return;
                };
                if let Some(node) = self.scene.node_mut(state.node) {
                    node.position = if step.finished { to } else { lerp(from, to, step.progress) };
                }
                if step.finished {
                    state.done = true;
                    self.events.push(ViewerEvent::PartAssembled(part));
                }
            }
            TaskKind::ExplodeSnap { from, to } => {
                if step.finished {
                    self.explode.settle(to);
                    self.snap_task = None;
                } else {
                    self.explode.set_progress(from + (to - from) * step.progress);
                }
                self.apply_explode();
            }
            TaskKind::Appear { part } => {
                let Some(state) = self.registry.get(&part) else {
                    return;
                };
                if let Some((node, materials)) = self.scene.node_and_materials_mut(state.node) {
                    apply_appear(
                        node,
                        materials,
                        &self.baselines,
                        &state.materials,
                        step.progress,
                        self.config.appear_start_scale,
                    );
                }
            }
        }
    }

    fn apply_explode(&mut self) {
        for part in self.registry.iter() {
            if let Some(node) = self.scene.node_mut(part.node) {
                node.position = self.explode.position(part.assembled, part.exploded);
            }
        }
    }

    /// Single mode: center the part, frame it and fade it in
    fn present_single(&mut self, id: &str) {
        let Some(part) = self.registry.get(id) else {
            return;
        };
        let Some((node, materials)) = self.scene.node_and_materials_mut(part.node) else {
            return;
        };
        node.visible = true;
        node.scale = 1.0;
        node.rotation = Vec3::ZERO;
        node.position = part.assembled;
        center_at_origin(node);
        self.camera.frame_bounds(&node.world_bounds(), self.config.frame_margin);

        apply_appear(
            node,
            materials,
            &self.baselines,
            &part.materials,
            0.0,
            self.config.appear_start_scale,
        );
        self.scheduler.cancel_for_part(id);
        self.scheduler.start(
            TaskKind::Appear { part: id.to_string() },
            self.config.appear_duration,
            Easing::EaseOutCubic,
        );
    }

    // ------------------------------------------------------------------
    // State helpers
    // ------------------------------------------------------------------

    fn set_selection(&mut self, id: Option<String>) {
        if self.selected != id {
            self.events.push(ViewerEvent::SelectionChanged(id.clone()));
            self.selected = id;
        }
    }

    fn reset_interaction(&mut self) {
        self.scheduler.cancel_all();
        self.snap_task = None;
        self.gizmo.detach();
        self.gesture = Gesture::Idle;
        self.camera.stop();
        self.set_selection(None);
    }

    fn refresh_visuals(&mut self) {
        apply_visuals(
            &self.registry,
            &mut self.scene,
            &self.baselines,
            self.mode,
            self.ghost,
            self.selected.as_deref(),
            &self.config,
        );
        // Baselines were just restored; put any fade in progress back on top
        for part in self.registry.iter() {
            let Some(progress) = self.scheduler.appear_progress(&part.id) else {
                continue;
            };
            if let Some((node, materials)) = self.scene.node_and_materials_mut(part.node) {
                apply_appear(
                    node,
                    materials,
                    &self.baselines,
                    &part.materials,
                    progress,
                    self.config.appear_start_scale,
                );
            }
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn model(&self) -> &ModelDefinition {
        &self.model
    }

    /// Runtime part ids, index-aligned with the model's parts
    pub fn part_ids(&self) -> &[String] {
        &self.runtime_ids
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    pub fn baselines(&self) -> &MaterialBaselines {
        &self.baselines
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn gizmo(&self) -> &Gizmo {
        &self.gizmo
    }

    /// Absolute explode fraction, 0 assembled and 1 exploded
    pub fn explode_fraction(&self) -> f32 {
        self.explode.fraction()
    }

    pub fn surface_usage(&self) -> SurfaceUsage {
        self.surface.usage()
    }

    /// Current world position of a loaded part
    pub fn part_position(&self, id: &str) -> Option<Vec3> {
        let part = self.registry.get(id)?;
        self.scene.node(part.node).map(|n| n.position)
    }
}

impl ViewerCommands for ViewerSession {
    fn zoom_in(&mut self) {
        if self.ready {
            self.camera.advance(self.config.zoom_step);
        }
    }

    fn zoom_out(&mut self) {
        if self.ready {
            self.camera.advance(-self.config.zoom_step);
        }
    }

    fn reset_camera(&mut self) {
        if self.ready {
            self.camera
                .look_from(self.config.camera_position, self.config.camera_target);
        }
    }

    fn camera_state(&self) -> Option<CameraState> {
        self.ready.then(|| self.camera.state())
    }

    fn set_camera_state(&mut self, state: &CameraState) {
        if self.ready {
            self.camera.apply_state(state);
        }
    }

    fn parts_state(&self) -> Vec<PartPose> {
        if !self.ready {
            return Vec::new();
        }
        let mut parts: Vec<_> = self.registry.iter().collect();
        parts.sort_by_key(|p| p.spec_index);

        parts
            .into_iter()
            .filter_map(|part| {
                let node = self.scene.node(part.node)?;
                let explode = match self.mode {
                    ViewMode::Simulator => self.explode.fraction(),
                    ViewMode::Edit if !part.done => 1.0,
                    _ => 0.0,
                };
                Some(PartPose {
                    id: part.id.clone(),
                    position: node.position.to_array(),
                    rotation: node.rotation.to_array(),
                    explode,
                    done: part.done,
                })
            })
            .collect()
    }
}

impl Drop for ViewerSession {
    fn drop(&mut self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}
