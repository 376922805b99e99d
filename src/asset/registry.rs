//! Part registry and material baselines
//!
//! Loaded parts are registered here as their assets resolve, in whatever
//! order that happens. Nothing in the registry assumes the model is complete.

use std::collections::HashMap;

use super::GeometryAsset;
use crate::geometry::Vec3;
use crate::scene::{
    Material, MaterialId, MeshInstance, NodeId, Registration, SceneGraph, SceneNode, Surface,
};

/// Material state captured the first time a material is seen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialBaseline {
    pub transparent: bool,
    pub opacity: f32,
    pub emissive: [f32; 3],
}

impl MaterialBaseline {
    pub fn capture(material: &Material) -> Self {
        Self {
            transparent: material.transparent,
            opacity: material.opacity,
            emissive: material.emissive,
        }
    }

    /// Write the baseline back onto a live material
    pub fn restore(&self, material: &mut Material) {
        material.transparent = self.transparent;
        material.opacity = self.opacity;
        material.emissive = self.emissive;
    }
}

/// Write-once side table of baselines
#[derive(Debug, Default)]
pub struct MaterialBaselines {
    entries: HashMap<MaterialId, MaterialBaseline>,
}

impl MaterialBaselines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the baseline unless one already exists. Returns true if stored.
    pub fn snapshot(&mut self, id: MaterialId, material: &Material) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, MaterialBaseline::capture(material));
        true
    }

    pub fn get(&self, id: MaterialId) -> Option<&MaterialBaseline> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Everything the viewer tracks for one loaded part
#[derive(Debug)]
pub struct PartRuntimeState {
    /// Unique runtime id
    pub id: String,
    /// Index of the source `PartSpec` in the model
    pub spec_index: usize,
    pub node: NodeId,
    pub assembled: Vec3,
    pub exploded: Vec3,
    /// Step-assembly flag used in edit mode
    pub done: bool,
    /// Distinct materials used by this part's meshes
    pub materials: Vec<MaterialId>,
    _buffers: Vec<Registration>,
}

/// Inputs for installing one decoded asset into the scene
pub struct PartInstall<'a> {
    pub id: &'a str,
    pub spec_index: usize,
    pub assembled: Vec3,
    pub exploded: Vec3,
    pub fixed_rotation: Vec3,
}

#[derive(Debug, Default)]
pub struct PartRegistry {
    parts: Vec<PartRuntimeState>,
    by_id: HashMap<String, usize>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a decoded asset to the scene as a new part node.
    ///
    /// Every mesh is tagged with the part id, each distinct material gets a
    /// `MaterialId` and a baseline, and one GPU buffer is registered per mesh.
    /// Returns None if a part with this id is already registered.
    pub fn install(
        &mut self,
        part: PartInstall<'_>,
        asset: GeometryAsset,
        scene: &mut SceneGraph,
        baselines: &mut MaterialBaselines,
        surface: &Surface,
    ) -> Option<&mut PartRuntimeState> {
        if self.by_id.contains_key(part.id) {
            return None;
        }

        let material_ids: Vec<MaterialId> = asset
            .materials
            .into_iter()
            .map(|m| scene.materials.insert(m))
            .collect();

        let mut used = Vec::new();
        let mut meshes = Vec::with_capacity(asset.meshes.len());
        let mut buffers = Vec::with_capacity(asset.meshes.len());
        for mesh in asset.meshes {
            let Some(&material) = material_ids.get(mesh.material) else {
                continue;
            };
            if let Some(live) = scene.materials.get(material) {
                baselines.snapshot(material, live);
            }
            if !used.contains(&material) {
                used.push(material);
            }
            buffers.push(surface.upload_buffer("part-mesh"));
            meshes.push(MeshInstance {
                primitive: mesh.primitive,
                material,
                local: mesh.local,
                part: Some(part.id.to_string()),
            });
        }

        let mut node = SceneNode::new(part.id, meshes, part.fixed_rotation);
        node.position = part.assembled;
        let node = scene.add_node(node);

        let index = self.parts.len();
        self.parts.push(PartRuntimeState {
            id: part.id.to_string(),
            spec_index: part.spec_index,
            node,
            assembled: part.assembled,
            exploded: part.exploded,
            done: false,
            materials: used,
            _buffers: buffers,
        });
        self.by_id.insert(part.id.to_string(), index);
        self.parts.last_mut()
    }

    pub fn get(&self, id: &str) -> Option<&PartRuntimeState> {
        self.by_id.get(id).map(|&i| &self.parts[i])
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut PartRuntimeState> {
        match self.by_id.get(id) {
            Some(&i) => self.parts.get_mut(i),
            None => None,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PartRuntimeState> {
        self.parts.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PartRuntimeState> {
        self.parts.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Drop every part, releasing their GPU buffer registrations
    pub fn clear(&mut self) {
        self.parts.clear();
        self.by_id.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::decode_gltf;
    use crate::asset::gltf_decode::tests::glb_cube;

    fn install(registry: &mut PartRegistry, id: &str, scene: &mut SceneGraph, baselines: &mut MaterialBaselines, surface: &Surface) -> bool {
        let asset = decode_gltf(&glb_cube(0.5, [0.0; 3], false)).unwrap();
        registry
            .install(
                PartInstall {
                    id,
                    spec_index: 0,
                    assembled: Vec3::new(0.0, 1.0, 0.0),
                    exploded: Vec3::new(0.0, 3.0, 0.0),
                    fixed_rotation: Vec3::ZERO,
                },
                asset,
                scene,
                baselines,
                surface,
            )
            .is_some()
    }

    #[test]
    fn test_baseline_snapshot_is_write_once() {
        let mut baselines = MaterialBaselines::new();
        let mut mat = Material::default();
        let id = MaterialId(3);
        assert!(baselines.snapshot(id, &mat));

        mat.opacity = 0.15;
        mat.transparent = true;
        mat.emissive = [0.2, 0.7, 0.9];
        for _ in 0..5 {
            assert!(!baselines.snapshot(id, &mat));
        }

        let b = baselines.get(id).unwrap();
        assert_eq!(b.opacity, 1.0);
        assert!(!b.transparent);
        assert_eq!(b.emissive, [0.0; 3]);
    }

    #[test]
    fn test_install_tags_meshes_and_places_at_assembled() {
        let surface = Surface::new(100.0, 100.0);
        let mut scene = SceneGraph::new();
        let mut baselines = MaterialBaselines::new();
        let mut registry = PartRegistry::new();

        assert!(install(&mut registry, "Pin#2", &mut scene, &mut baselines, &surface));
        let part = registry.get("Pin#2").unwrap();
        let node = scene.node(part.node).unwrap();
        assert_eq!(node.position, Vec3::new(0.0, 1.0, 0.0));
        assert!(node.meshes.iter().all(|m| m.part.as_deref() == Some("Pin#2")));
        assert_eq!(part.materials.len(), 1);
        assert_eq!(baselines.len(), 1);
        assert_eq!(surface.usage().gpu_buffers, 1);

        // Same id twice is refused
        assert!(!install(&mut registry, "Pin#2", &mut scene, &mut baselines, &surface));
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert_eq!(surface.usage().gpu_buffers, 0);
    }
}
