//! Model and part description types
//!
//! These mirror the JSON the backend serves, so they deserialize directly
//! with serde_json. RON works too for locally authored models.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::geometry::Vec3;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("model has no parts")]
    Empty,
    #[error("part {id}: {field} is not finite")]
    NonFinite { id: String, field: &'static str },
    #[error("part {index} has an empty asset path")]
    MissingPath { index: usize },
    #[error("unknown model: {0}")]
    Unknown(String),
}

/// One titled paragraph in a model's description panel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentItem {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Descriptive text shown by the host next to the viewer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDescription {
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub usage: Vec<ContentItem>,
    #[serde(default)]
    pub theory: Vec<ContentItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSpec {
    /// Identifier as authored. May repeat for identical sub-components.
    pub id: String,
    /// Geometry asset locator
    pub path: String,
    pub assembled: Vec3,
    pub exploded: Vec3,
    /// Fixed rotation (radians, XYZ) applied to the loaded geometry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,

    // Metadata for info panels, unused by the runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl PartSpec {
    pub fn new(id: &str, path: &str, assembled: Vec3, exploded: Vec3) -> Self {
        Self {
            id: id.to_string(),
            path: path.to_string(),
            assembled,
            exploded,
            rotation: None,
            name: None,
            material: None,
            desc: None,
            thumbnail: None,
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Display label: name when present, id otherwise
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelDefinition {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<ModelDescription>,
    pub parts: Vec<PartSpec>,
}

impl ModelDefinition {
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let model: ModelDefinition = serde_json::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    pub fn from_ron(text: &str) -> Result<Self, ModelError> {
        let model: ModelDefinition = ron::from_str(text)?;
        model.validate()?;
        Ok(model)
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.parts.is_empty() {
            return Err(ModelError::Empty);
        }
        for (index, part) in self.parts.iter().enumerate() {
            if part.path.trim().is_empty() {
                return Err(ModelError::MissingPath { index });
            }
            let checks = [
                ("assembled", Some(part.assembled)),
                ("exploded", Some(part.exploded)),
                ("rotation", part.rotation),
            ];
            for (field, value) in checks {
                if let Some(v) = value {
                    if !v.is_finite() {
                        return Err(ModelError::NonFinite { id: part.id.clone(), field });
                    }
                }
            }
        }
        Ok(())
    }

    /// Unique runtime id per part, index-aligned with `parts`.
    ///
    /// The first occurrence of an id keeps it unchanged; later occurrences
    /// get `#2`, `#3`, ... appended. A suffixed id that collides with an
    /// authored id keeps counting until it is free.
    pub fn runtime_ids(&self) -> Vec<String> {
        let authored: HashSet<&str> = self.parts.iter().map(|p| p.id.as_str()).collect();
        let mut used: HashSet<String> = HashSet::new();
        let mut next_suffix: HashMap<&str, usize> = HashMap::new();
        let mut out = Vec::with_capacity(self.parts.len());

        for part in &self.parts {
            if used.insert(part.id.clone()) {
                out.push(part.id.clone());
                continue;
            }
            let n = next_suffix.entry(part.id.as_str()).or_insert(2);
            let candidate = loop {
                let candidate = format!("{}#{}", part.id, n);
                *n += 1;
                if !used.contains(&candidate) && !authored.contains(candidate.as_str()) {
                    break candidate;
                }
            };
            used.insert(candidate.clone());
            out.push(candidate);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUSPENSION_JSON: &str = r#"{
        "id": "Suspension",
        "name": "Suspension",
        "parts": [
            { "id": "Base", "name": "Base", "path": "/models/Suspension/BASE.glb",
              "assembled": { "x": 0, "y": 0, "z": 0 }, "exploded": { "x": 0, "y": 0, "z": 0 } },
            { "id": "ROD", "path": "/models/Suspension/ROD.glb",
              "assembled": { "x": 0, "y": 0.1, "z": 0 }, "exploded": { "x": 0, "y": 0.4, "z": 0 },
              "rotation": { "x": 0, "y": 3.14159, "z": 0 } }
        ]
    }"#;

    #[test]
    fn test_parse_backend_json() {
        let model = ModelDefinition::from_json(SUSPENSION_JSON).unwrap();
        assert_eq!(model.parts.len(), 2);
        assert_eq!(model.parts[1].id, "ROD");
        assert!((model.parts[1].exploded.y - 0.4).abs() < 1e-6);
        assert!(model.parts[1].rotation.is_some());
        assert_eq!(model.parts[0].label(), "Base");
        assert_eq!(model.parts[1].label(), "ROD");
    }

    #[test]
    fn test_empty_model_rejected() {
        let err = ModelDefinition::from_json(r#"{ "parts": [] }"#).unwrap_err();
        assert!(matches!(err, ModelError::Empty));
    }

    #[test]
    fn test_missing_path_rejected() {
        let model = ModelDefinition {
            parts: vec![PartSpec::new("a", "  ", Vec3::ZERO, Vec3::ZERO)],
            ..Default::default()
        };
        assert!(matches!(model.validate(), Err(ModelError::MissingPath { index: 0 })));
    }

    #[test]
    fn test_non_finite_rejected() {
        let model = ModelDefinition {
            parts: vec![PartSpec::new("a", "a.glb", Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO)],
            ..Default::default()
        };
        assert!(matches!(model.validate(), Err(ModelError::NonFinite { field: "assembled", .. })));
    }

    #[test]
    fn test_runtime_ids_disambiguate_duplicates() {
        let model = ModelDefinition {
            parts: vec![
                PartSpec::new("Base", "b.glb", Vec3::ZERO, Vec3::ZERO),
                PartSpec::new("Pin", "p.glb", Vec3::ZERO, Vec3::ZERO),
                PartSpec::new("Pin", "p.glb", Vec3::ZERO, Vec3::ZERO),
                PartSpec::new("Pin", "p.glb", Vec3::ZERO, Vec3::ZERO),
            ],
            ..Default::default()
        };
        assert_eq!(model.runtime_ids(), vec!["Base", "Pin", "Pin#2", "Pin#3"]);
    }

    #[test]
    fn test_runtime_ids_avoid_authored_collisions() {
        let model = ModelDefinition {
            parts: vec![
                PartSpec::new("Pin", "p.glb", Vec3::ZERO, Vec3::ZERO),
                PartSpec::new("Pin#2", "q.glb", Vec3::ZERO, Vec3::ZERO),
                PartSpec::new("Pin", "p.glb", Vec3::ZERO, Vec3::ZERO),
            ],
            ..Default::default()
        };
        let ids = model.runtime_ids();
        assert_eq!(ids, vec!["Pin", "Pin#2", "Pin#3"]);
    }

    #[test]
    fn test_ron_roundtrip_of_builder() {
        let model = ModelDefinition {
            id: "m".into(),
            name: "M".into(),
            description: None,
            parts: vec![PartSpec::new("a", "a.glb", Vec3::ZERO, Vec3::UP).with_name("A")],
        };
        let text = ron::to_string(&model).unwrap();
        let back = ModelDefinition::from_ron(&text).unwrap();
        assert_eq!(back.parts[0].label(), "A");
    }
}
