//! View modes and per-mode visual rules

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::asset::{MaterialBaselines, PartRegistry};
use crate::config::{rgb_components, ViewerConfig};
use crate::scene::SceneGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Single,
    Assembly,
    Edit,
    Simulator,
}

/// Where parts sit when a mode is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPose {
    Assembled,
    Exploded,
    /// Hidden until a part is selected
    Hidden,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::Single,
        ViewMode::Assembly,
        ViewMode::Edit,
        ViewMode::Simulator,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ViewMode::Single => "single",
            ViewMode::Assembly => "assembly",
            ViewMode::Edit => "edit",
            ViewMode::Simulator => "simulator",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Single => "Single Part",
            ViewMode::Assembly => "Assembly",
            ViewMode::Edit => "Edit",
            ViewMode::Simulator => "Simulator",
        }
    }

    /// Single mode is driven by the part list instead
    pub fn picking_enabled(self) -> bool {
        self != ViewMode::Single
    }

    pub fn explode_enabled(self) -> bool {
        self == ViewMode::Simulator
    }

    pub fn ghost_enabled(self) -> bool {
        self == ViewMode::Simulator
    }

    pub fn highlights_selection(self) -> bool {
        self != ViewMode::Single
    }

    pub fn entry_pose(self) -> EntryPose {
        match self {
            ViewMode::Single => EntryPose::Hidden,
            ViewMode::Assembly | ViewMode::Simulator => EntryPose::Assembled,
            ViewMode::Edit => EntryPose::Exploded,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewMode::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown view mode: {}", s))
    }
}

/// Rewrite every registered material from its baseline, then layer the ghost
/// and highlight effects for the current mode, flag and selection.
///
/// Always starting from the baseline means repeated calls cannot drift.
pub fn apply_visuals(
    registry: &PartRegistry,
    scene: &mut SceneGraph,
    baselines: &MaterialBaselines,
    mode: ViewMode,
    ghost: bool,
    selected: Option<&str>,
    config: &ViewerConfig,
) {
    let ghost_active = mode.ghost_enabled() && ghost && selected.is_some();
    let highlight = rgb_components(config.highlight_color);

    for part in registry.iter() {
        let is_selected = selected == Some(part.id.as_str());
        for &id in &part.materials {
            let (Some(baseline), Some(live)) = (baselines.get(id), scene.materials.get_mut(id)) else {
                continue;
            };
            baseline.restore(live);
            if ghost_active && !is_selected {
                live.transparent = true;
                live.opacity = config.ghost_opacity;
            }
            if is_selected && mode.highlights_selection() {
                live.emissive = highlight;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_rules_table() {
        assert!(!ViewMode::Single.picking_enabled());
        assert!(ViewMode::Assembly.picking_enabled());
        assert!(ViewMode::Edit.picking_enabled());
        assert!(ViewMode::Simulator.picking_enabled());

        assert!(ViewMode::Simulator.ghost_enabled());
        assert!(!ViewMode::Assembly.ghost_enabled());
        assert!(!ViewMode::Edit.ghost_enabled());

        assert_eq!(ViewMode::Edit.entry_pose(), EntryPose::Exploded);
        assert_eq!(ViewMode::Single.entry_pose(), EntryPose::Hidden);
    }

    #[test]
    fn test_parse_and_serde() {
        assert_eq!("Simulator".parse::<ViewMode>().unwrap(), ViewMode::Simulator);
        assert!("orbit".parse::<ViewMode>().is_err());
        assert_eq!(serde_json::to_string(&ViewMode::Edit).unwrap(), "\"edit\"");
    }
}
