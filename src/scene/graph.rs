//! Scene graph
//!
//! Flat list of part nodes. Each node wraps the meshes decoded from one
//! geometry asset and carries the transform the interaction code drives.

use std::sync::Arc;

use crate::geometry::{
    mat4_from_trs, mat4_mul, mat4_rotation, mat4_transform_point, Aabb, Mat4, Vec3,
};

/// Stable material handle assigned when a material is first registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u32);

/// Live material state. Only the fields the viewer mutates or shades with.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Option<String>,
    /// Linear RGBA
    pub base_color: [f32; 4],
    pub transparent: bool,
    pub opacity: f32,
    /// Linear RGB added on top of lit color
    pub emissive: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: None,
            base_color: [0.7, 0.7, 0.72, 1.0],
            transparent: false,
            opacity: 1.0,
            emissive: [0.0; 3],
        }
    }
}

#[derive(Debug, Default)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(material);
        id
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Triangle geometry in the asset's local space
#[derive(Debug, Clone)]
pub struct Primitive {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

impl Primitive {
    /// Build a primitive. Missing normals are computed as area-weighted
    /// vertex normals.
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Aabb::from_points(positions.iter().copied());
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            compute_normals(&positions, &indices)
        };
        Self {
            positions,
            normals,
            indices,
            bounds,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as vertex triples. Indices out of range are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(move |tri| {
            let a = *self.positions.get(tri[0] as usize)?;
            let b = *self.positions.get(tri[1] as usize)?;
            let c = *self.positions.get(tri[2] as usize)?;
            Some([a, b, c])
        })
    }
}

fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }
        let face = (positions[i1] - positions[i0]).cross(positions[i2] - positions[i0]);
        normals[i0] += face;
        normals[i1] += face;
        normals[i2] += face;
    }
    normals.into_iter().map(Vec3::normalize).collect()
}

/// One drawable leaf: shared geometry, its own material, and the owning part
#[derive(Debug, Clone)]
pub struct MeshInstance {
    pub primitive: Arc<Primitive>,
    pub material: MaterialId,
    /// Transform from the asset's node hierarchy, applied before the part node
    pub local: Mat4,
    /// Runtime id of the part this mesh belongs to, used by picking
    pub part: Option<String>,
}

/// Positionable wrapper around one part's meshes
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub part_id: String,
    pub position: Vec3,
    /// Editable rotation (radians, XYZ)
    pub rotation: Vec3,
    pub scale: f32,
    /// Rotation authored on the part, applied inside the wrapper
    pub fixed_rotation: Vec3,
    pub visible: bool,
    pub meshes: Vec<MeshInstance>,
}

impl SceneNode {
    pub fn new(part_id: &str, meshes: Vec<MeshInstance>, fixed_rotation: Vec3) -> Self {
        Self {
            part_id: part_id.to_string(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            fixed_rotation,
            visible: true,
            meshes,
        }
    }

    /// Wrapper transform: T * R * S, then the fixed inner rotation
    pub fn world_matrix(&self) -> Mat4 {
        let outer = mat4_from_trs(self.position, self.rotation, self.scale);
        mat4_mul(&outer, &mat4_rotation(self.fixed_rotation))
    }

    /// Full transform for one of this node's meshes
    pub fn mesh_matrix(&self, mesh: &MeshInstance) -> Mat4 {
        mat4_mul(&self.world_matrix(), &mesh.local)
    }

    /// World-space bounds of the node's geometry, from transformed vertices
    pub fn world_bounds(&self) -> Aabb {
        let mut bounds = Aabb::EMPTY;
        for mesh in &self.meshes {
            let m = self.mesh_matrix(mesh);
            for p in &mesh.primitive.positions {
                bounds.expand(mat4_transform_point(&m, *p));
            }
        }
        bounds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// Owns every node and live material of one viewer session
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    pub materials: MaterialTable,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: SceneNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    /// A node together with the material table, for effects touching both
    pub fn node_and_materials_mut(&mut self, id: NodeId) -> Option<(&mut SceneNode, &mut MaterialTable)> {
        let node = self.nodes.get_mut(id.0)?;
        Some((node, &mut self.materials))
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.materials = MaterialTable::new();
    }
}
