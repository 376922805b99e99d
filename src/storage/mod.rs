//! Host-side snapshot persistence
//!
//! The viewer itself never touches storage. The host periodically asks the
//! session for its camera and part poses and keeps one snapshot per
//! model and mode, so remounting the same pair restores where the user left
//! off. Snapshots are RON files named `<model>__<mode>.ron`.
//!
//! Native builds keep them under the platform data directory. Builds
//! without a data directory (wasm) keep them in memory for the session.

pub mod local;

pub use local::LocalStorage;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::handle::PartPose;
use crate::mode::ViewMode;
use crate::scene::CameraState;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] ron::Error),
    #[error("corrupt snapshot: {0}")]
    Decode(#[from] ron::error::SpannedError),
}

impl StorageError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            StorageError::NotFound(path.display().to_string())
        } else {
            StorageError::Io {
                path: path.display().to_string(),
                source,
            }
        }
    }
}

/// Everything restored on remount for one model and mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    #[serde(default)]
    pub camera: Option<CameraState>,
    #[serde(default)]
    pub parts: Vec<PartPose>,
}

impl ViewSnapshot {
    pub fn is_empty(&self) -> bool {
        self.camera.is_none() && self.parts.is_empty()
    }
}

/// File name for a model/mode pair. Characters outside `[A-Za-z0-9_-]` in
/// the model id are replaced so any id maps to a safe file name.
pub fn snapshot_key(model_id: &str, mode: ViewMode) -> String {
    let model: String = model_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}__{}.ron", model, mode.key())
}

#[derive(Debug)]
enum Backend {
    Disk(LocalStorage),
    Memory(HashMap<String, String>),
}

#[derive(Debug)]
pub struct SnapshotStore {
    backend: Backend,
}

impl SnapshotStore {
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: Backend::Disk(LocalStorage::with_base_dir(dir)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: Backend::Memory(HashMap::new()),
        }
    }

    /// `<data dir>/assembly-viewer` when the platform has one, memory otherwise
    pub fn default_location() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            if let Some(dir) = dirs::data_dir() {
                return Self::at(dir.join("assembly-viewer"));
            }
        }
        Self::in_memory()
    }

    /// Directory snapshots are written to, if backed by disk
    pub fn location(&self) -> Option<&Path> {
        match &self.backend {
            Backend::Disk(local) => Some(local.base_dir()),
            Backend::Memory(_) => None,
        }
    }

    /// Load the snapshot for a pair. A missing snapshot is `Ok(None)`.
    pub fn load(&self, model_id: &str, mode: ViewMode) -> Result<Option<ViewSnapshot>, StorageError> {
        let key = snapshot_key(model_id, mode);
        let text = match &self.backend {
            Backend::Disk(local) => match local.read(&key) {
                Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                Err(StorageError::NotFound(_)) => return Ok(None),
                Err(e) => return Err(e),
            },
            Backend::Memory(map) => match map.get(&key) {
                Some(text) => text.clone(),
                None => return Ok(None),
            },
        };
        Ok(Some(ron::from_str(&text)?))
    }

    /// Like `load`, but a corrupt or unreadable snapshot is logged and
    /// treated as absent
    pub fn load_or_default(&self, model_id: &str, mode: ViewMode) -> ViewSnapshot {
        match self.load(model_id, mode) {
            Ok(snapshot) => snapshot.unwrap_or_default(),
            Err(e) => {
                warn!("ignoring snapshot for {} / {}: {}", model_id, mode, e);
                ViewSnapshot::default()
            }
        }
    }

    pub fn save(&mut self, model_id: &str, mode: ViewMode, snapshot: &ViewSnapshot) -> Result<(), StorageError> {
        let key = snapshot_key(model_id, mode);
        let text = ron::ser::to_string_pretty(snapshot, ron::ser::PrettyConfig::default())?;
        match &mut self.backend {
            Backend::Disk(local) => local.write(&key, text.as_bytes())?,
            Backend::Memory(map) => {
                map.insert(key.clone(), text);
            }
        }
        debug!("saved snapshot {}", key);
        Ok(())
    }

    pub fn remove(&mut self, model_id: &str, mode: ViewMode) -> Result<(), StorageError> {
        let key = snapshot_key(model_id, mode);
        match &mut self.backend {
            Backend::Disk(local) => local.delete(&key),
            Backend::Memory(map) => {
                map.remove(&key);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn snapshot() -> ViewSnapshot {
        ViewSnapshot {
            camera: Some(CameraState {
                position: [2.0, 1.5, 2.2],
                target: [0.0, 0.6, 0.0],
                fov: Some(40.0),
            }),
            parts: vec![PartPose {
                id: "Pin#2".into(),
                position: [0.1, 0.2, 0.3],
                rotation: [0.0, 1.0, 0.0],
                explode: 1.0,
                done: true,
            }],
        }
    }

    #[test]
    fn test_key_is_file_safe() {
        assert_eq!(snapshot_key("RobotArm", ViewMode::Simulator), "RobotArm__simulator.ron");
        assert_eq!(snapshot_key("../etc/x y", ViewMode::Edit), "___etc_x_y__edit.ron");
    }

    #[test]
    fn test_disk_store_keeps_modes_apart() {
        let dir = TempDir::new().unwrap();
        let mut store = SnapshotStore::at(dir.path());
        store.save("RobotArm", ViewMode::Edit, &snapshot()).unwrap();

        assert_eq!(store.load("RobotArm", ViewMode::Edit).unwrap(), Some(snapshot()));
        assert_eq!(store.load("RobotArm", ViewMode::Assembly).unwrap(), None);
        assert!(dir.path().join("RobotArm__edit.ron").exists());

        store.remove("RobotArm", ViewMode::Edit).unwrap();
        assert_eq!(store.load("RobotArm", ViewMode::Edit).unwrap(), None);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("RobotArm__assembly.ron"), "(camera: Some(").unwrap();
        let store = SnapshotStore::at(dir.path());

        assert!(matches!(
            store.load("RobotArm", ViewMode::Assembly),
            Err(StorageError::Decode(_))
        ));
        assert!(store.load_or_default("RobotArm", ViewMode::Assembly).is_empty());
    }

    #[test]
    fn test_older_snapshot_without_new_fields_loads() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Suspension__simulator.ron"),
            r#"(parts: [(id: "ROD", position: (0.0, 0.1, 0.0))])"#,
        )
        .unwrap();
        let store = SnapshotStore::at(dir.path());
        let snap = store.load("Suspension", ViewMode::Simulator).unwrap().unwrap();
        assert_eq!(snap.camera, None);
        assert_eq!(snap.parts[0].explode, 0.0);
        assert!(!snap.parts[0].done);
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = SnapshotStore::in_memory();
        assert!(store.location().is_none());
        store.save("Suspension", ViewMode::Simulator, &snapshot()).unwrap();
        assert_eq!(
            store.load("Suspension", ViewMode::Simulator).unwrap(),
            Some(snapshot())
        );
    }
}
