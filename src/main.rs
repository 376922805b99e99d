//! Assembly viewer host
//!
//! Window around one `ViewerSession`: mode tabs and model picker on top,
//! the software-rendered viewport on the left, part list and toggles on the
//! right. Camera and part poses are snapshotted once per second per model
//! and mode, and restored when that pair is shown again.
//!
//! Usage: `assembly-viewer [ASSET_DIR] [MODEL.json ...]`

mod app;

use assembly_viewer::asset::FileAssetSource;
use assembly_viewer::geometry::Vec3;
use assembly_viewer::interaction::MacroquadInput;
use assembly_viewer::model::{builtin_model, builtin_model_ids};
use assembly_viewer::render::{present, render_scene, Framebuffer};
use assembly_viewer::storage::SnapshotStore;
use assembly_viewer::ui::{
    checkbox, draw_card, label, list_item, tab_strip, MouseState, Rect, Toolbar, UiContext,
    BG_COLOR, BORDER_COLOR, ERROR_COLOR, FONT_SIZE_CONTENT, FONT_SIZE_SMALL, ROW_HEIGHT,
    TAB_BAR_HEIGHT, TEXT_COLOR, TEXT_DIM, TEXT_MUTED,
};
use assembly_viewer::{ModelDefinition, ViewMode, ViewerConfig, VERSION};
use log::{info, warn};
use macroquad::prelude::*;

use app::{AppAction, AppState, PartStatus};

/// Framebuffer pixels per viewport pixel
const RENDER_SCALE: f32 = 0.5;

/// Gap around panels when not expanded
const GUTTER: f32 = 16.0;

#[cfg(not(target_arch = "wasm32"))]
const CONFIG_FILE: &str = "viewer.ron";

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Assembly Viewer v{}", VERSION),
        window_width: 1440,
        window_height: 900,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    {
        crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    }

    let mut args = std::env::args().skip(1);
    let asset_dir = args.next().unwrap_or_else(|| "assets".to_string());
    let extra_models: Vec<String> = args.collect();

    let config = load_config();
    let models = load_models(&extra_models);
    let source = FileAssetSource::new(&asset_dir);
    let store = SnapshotStore::default_location();
    match store.location() {
        Some(dir) => info!("snapshots in {}", dir.display()),
        None => info!("snapshots kept in memory"),
    }

    let mut ui = UiContext::new();
    let mut input = MacroquadInput::new();
    let mut fb = Framebuffer::new(1, 1);

    let initial = body_layout(Rect::screen(screen_width(), screen_height()), false).viewport;
    let mut app = AppState::new(config, models, store, &source, initial.w, initial.h);
    info!("assets from {}", source.base_dir().display());

    loop {
        ui.begin_frame(MouseState::poll());
        let screen = Rect::screen(screen_width(), screen_height());
        let layout = body_layout(screen, app.expanded);
        let view = layout.viewport;

        if app.surface.size() != (view.w.max(1.0), view.h.max(1.0)) {
            app.surface.resize(view.w, view.h);
            app.session.resize(view.w, view.h);
        }

        // Input, then the frame tick, then draw
        for event in input.poll(view.to_viewport()) {
            app.session.handle_event(event);
        }
        source.pump().await;
        let dt = get_frame_time();
        app.session.frame(dt);
        app.handle_viewer_events();
        app.tick_autosave(dt);

        clear_background(BG_COLOR);

        let fb_w = ((view.w * RENDER_SCALE) as usize).max(1);
        let fb_h = ((view.h * RENDER_SCALE) as usize).max(1);
        if fb.width != fb_w || fb.height != fb_h {
            fb.resize(fb_w, fb_h);
        }
        let viewpoint = app.session.camera().viewpoint();
        render_scene(&mut fb, app.session.scene(), &viewpoint, app.config());
        present(&fb, view.to_viewport());
        if !app.expanded {
            draw_rectangle_lines(view.x, view.y, view.w, view.h, 1.0, BORDER_COLOR);
        }

        let mut actions = Vec::new();
        draw_top_bar(&mut ui, &app, screen.slice_top(TAB_BAR_HEIGHT), &mut actions);
        draw_view_toolbar(&mut ui, &app, layout.toolbar, &mut actions);
        if let Some(sidebar) = layout.sidebar {
            draw_sidebar(&mut ui, &app, sidebar, &mut actions);
        }
        if app.session.pending_loads() > 0 {
            let text = format!("Loading {} part(s)...", app.session.pending_loads());
            label(Rect::new(view.x + 12.0, view.bottom() - 28.0, view.w, 20.0), &text, FONT_SIZE_SMALL, TEXT_MUTED);
        }

        for action in actions {
            app.apply(action, &source);
        }

        next_frame().await;
    }
}

/// Optional `viewer.ron` in the working directory
#[cfg(not(target_arch = "wasm32"))]
fn load_config() -> ViewerConfig {
    match ViewerConfig::load(std::path::Path::new(CONFIG_FILE)) {
        Ok(config) => config,
        Err(e) => {
            warn!("{}; using defaults", e);
            ViewerConfig::default()
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn load_config() -> ViewerConfig {
    ViewerConfig::default()
}

/// Built-in models followed by any JSON definitions given on the command line
fn load_models(paths: &[String]) -> Vec<ModelDefinition> {
    let mut models: Vec<ModelDefinition> = builtin_model_ids()
        .iter()
        .filter_map(|id| match builtin_model(id) {
            Ok(model) => Some(model),
            Err(e) => {
                warn!("skipping built-in model {}: {}", id, e);
                None
            }
        })
        .collect();

    for path in paths {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|text| ModelDefinition::from_json(&text).map_err(|e| e.to_string()))
            .and_then(|model| model.validate().map(|_| model).map_err(|e| e.to_string()));
        match parsed {
            Ok(model) => {
                info!("loaded model {} from {}", model.id, path);
                models.push(model);
            }
            Err(e) => warn!("skipping model file {}: {}", path, e),
        }
    }
    models
}

struct BodyLayout {
    toolbar: Rect,
    viewport: Rect,
    sidebar: Option<Rect>,
}

/// Viewport and sidebar split 1.8 : 1; expanded gives the viewport everything
fn body_layout(screen: Rect, expanded: bool) -> BodyLayout {
    let body = screen.remaining_after_top(TAB_BAR_HEIGHT);
    let (view_col, sidebar) = if expanded {
        (body, None)
    } else {
        let (left, right) = body.pad(GUTTER).split_h(1.8 / 2.8);
        let gap = GUTTER * 0.5;
        (
            Rect::new(left.x, left.y, left.w - gap, left.h),
            Some(Rect::new(right.x + gap, right.y, right.w - gap, right.h)),
        )
    };
    let toolbar = view_col.slice_top(ROW_HEIGHT + 8.0);
    BodyLayout {
        toolbar,
        viewport: view_col.remaining_after_top(toolbar.h),
        sidebar,
    }
}

fn draw_top_bar(ui: &mut UiContext, app: &AppState, rect: Rect, actions: &mut Vec<AppAction>) {
    let labels: Vec<&str> = ViewMode::ALL.iter().map(|m| m.label()).collect();
    let active = ViewMode::ALL.iter().position(|m| *m == app.mode).unwrap_or(0);
    if let Some(i) = tab_strip(ui, rect, &labels, active) {
        actions.push(AppAction::SwitchMode(ViewMode::ALL[i]));
    }

    let mut bar = Toolbar::right_aligned(rect);
    for (i, model) in app.models.iter().enumerate().rev() {
        let name = if model.name.is_empty() { &model.id } else { &model.name };
        if bar.button(ui, name, i == app.model_index) {
            actions.push(AppAction::SwitchModel(i));
        }
    }
}

fn draw_view_toolbar(ui: &mut UiContext, app: &AppState, rect: Rect, actions: &mut Vec<AppAction>) {
    let mut bar = Toolbar::new(rect);
    if bar.button(ui, "+", false) {
        actions.push(AppAction::ZoomIn);
    }
    if bar.button(ui, "-", false) {
        actions.push(AppAction::ZoomOut);
    }
    if bar.button(ui, "Reset view", false) {
        actions.push(AppAction::ResetCamera);
    }
    if app.mode == ViewMode::Edit && bar.button(ui, "Reset parts", false) {
        actions.push(AppAction::ResetAssembly);
    }
    if app.mode == ViewMode::Simulator {
        bar.label(&format!("Explode {:.0}%", app.session.explode_fraction() * 100.0));
    }

    let mut right = Toolbar::right_aligned(rect);
    let expand = if app.expanded { "Shrink" } else { "Expand" };
    if right.button(ui, expand, false) {
        actions.push(AppAction::ToggleExpanded);
    }
}

fn draw_sidebar(ui: &mut UiContext, app: &AppState, rect: Rect, actions: &mut Vec<AppAction>) {
    let model = app.current_model();
    let info_h = 150.0;
    let options_h = if app.mode == ViewMode::Edit { 96.0 } else { 64.0 };

    // Selection details
    let info = draw_card(rect.slice_top(info_h), Some(&format!("{} study", display_name(model))));
    let selected_spec = app.selected.as_deref().and_then(|id| {
        let index = app.session.part_ids().iter().position(|p| p == id)?;
        model.parts.get(index)
    });
    let lines = info.rows(FONT_SIZE_CONTENT + 4.0, 4.0, 4);
    match selected_spec {
        Some(spec) => {
            label(lines[0], spec.label(), FONT_SIZE_CONTENT, TEXT_COLOR);
            if let Some(material) = &spec.material {
                label(lines[1], &format!("Material: {}", material), FONT_SIZE_SMALL, TEXT_MUTED);
            }
            if let Some(desc) = &spec.desc {
                label(lines[2], desc, FONT_SIZE_SMALL, TEXT_MUTED);
            }
        }
        None => {
            let hint = if app.mode == ViewMode::Single {
                "Pick a part from the list."
            } else {
                "Click a part to select it."
            };
            label(lines[0], hint, FONT_SIZE_CONTENT, TEXT_DIM);
            if let Some(desc) = &model.description {
                label(lines[1], &desc.summary, FONT_SIZE_SMALL, TEXT_MUTED);
            }
        }
    }

    // Toggles
    let options_rect = Rect::new(rect.x, rect.y + info_h + GUTTER, rect.w, options_h);
    let options = draw_card(options_rect, None);
    let mut ghost = app.ghost;
    let enabled = app.ghost_available();
    if checkbox(ui, options.slice_top(ROW_HEIGHT), "Ghost mode", &mut ghost, enabled) {
        actions.push(AppAction::SetGhost(ghost));
    }
    if app.mode == ViewMode::Edit {
        let mut bar = Toolbar::new(options.remaining_after_top(ROW_HEIGHT + 6.0).slice_top(ROW_HEIGHT + 6.0));
        bar.label("Rotate 90:");
        for (text, axis) in [("X", Vec3::new(1.0, 0.0, 0.0)), ("Y", Vec3::UP), ("Z", Vec3::new(0.0, 0.0, 1.0))] {
            if bar.button(ui, text, false) && app.selected.is_some() {
                actions.push(AppAction::RotateSelected(axis * std::f32::consts::FRAC_PI_2));
            }
        }
    }

    // Part list
    let list_top = options_rect.bottom() + GUTTER;
    let list_rect = Rect::new(rect.x, list_top, rect.w, (rect.bottom() - list_top).max(0.0));
    let list = draw_card(list_rect, Some("Parts"));
    let ids = app.session.part_ids();
    let visible = ((list.h + 2.0) / (ROW_HEIGHT + 2.0)).floor().max(0.0) as usize;
    for (row, (index, id)) in list.rows(ROW_HEIGHT, 2.0, visible).into_iter().zip(ids.iter().enumerate()) {
        let name = model.parts.get(index).map(|p| p.label()).unwrap_or(id.as_str());
        let (text, color) = match app.part_status.get(id) {
            Some(PartStatus::Failed(_)) => (format!("{} (failed)", name), ERROR_COLOR),
            Some(PartStatus::Loading) | None => (format!("{} ...", name), TEXT_DIM),
            Some(PartStatus::Loaded) => (name.to_string(), TEXT_MUTED),
        };
        let selected = app.selected.as_deref() == Some(id.as_str());
        if list_item(ui, row, &text, selected, color) {
            let next = if selected { None } else { Some(id.clone()) };
            actions.push(AppAction::SelectPart(next));
        }
    }
}

fn display_name(model: &ModelDefinition) -> &str {
    if model.name.is_empty() {
        &model.id
    } else {
        &model.name
    }
}
