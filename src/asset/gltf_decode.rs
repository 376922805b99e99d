//! glTF 2.0 decoding
//!
//! Turns GLB (or self-contained glTF JSON) bytes into shared primitives and
//! plain materials. Only triangle lists are kept. Node transforms stay on
//! each mesh instance so geometry referenced by several nodes is decoded once.

use std::collections::HashMap;
use std::sync::Arc;

use gltf::material::AlphaMode;
use gltf::mesh::Mode;

use super::AssetError;
use crate::geometry::{mat4_from_cols, mat4_identity, mat4_mul, Mat4, Vec3};
use crate::scene::{Material, Primitive};

/// One drawable piece of a decoded asset
#[derive(Debug, Clone)]
pub struct DecodedMesh {
    pub primitive: Arc<Primitive>,
    /// Index into `GeometryAsset::materials`
    pub material: usize,
    /// Accumulated node transform
    pub local: Mat4,
}

#[derive(Debug, Clone, Default)]
pub struct GeometryAsset {
    pub materials: Vec<Material>,
    pub meshes: Vec<DecodedMesh>,
}

impl GeometryAsset {
    pub fn vertex_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitive.positions.len()).sum()
    }
}

pub fn decode_gltf(bytes: &[u8]) -> Result<GeometryAsset, AssetError> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;

    let mut asset = GeometryAsset::default();

    // Authored materials keep their glTF index; the default material goes last
    asset.materials = document.materials().map(|m| convert_material(&m)).collect();
    let default_material = asset.materials.len();
    let mut default_used = false;

    let mut primitives: HashMap<(usize, usize), Arc<Primitive>> = HashMap::new();

    let roots: Vec<gltf::Node> = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().collect(),
        None => document.nodes().collect(),
    };

    let mut stack: Vec<(gltf::Node, Mat4)> = roots.into_iter().map(|n| (n, mat4_identity())).collect();
    while let Some((node, parent)) = stack.pop() {
        let local = mat4_mul(&parent, &mat4_from_cols(node.transform().matrix()));

        if let Some(mesh) = node.mesh() {
            for prim in mesh.primitives() {
                if prim.mode() != Mode::Triangles {
                    continue;
                }
                let key = (mesh.index(), prim.index());
                let primitive = match primitives.get(&key) {
                    Some(p) => Arc::clone(p),
                    None => {
                        let Some(p) = read_primitive(&prim, &buffers) else {
                            continue;
                        };
                        let p = Arc::new(p);
                        primitives.insert(key, Arc::clone(&p));
                        p
                    }
                };

                let material = match prim.material().index() {
                    Some(i) if i < default_material => i,
                    _ => {
                        default_used = true;
                        default_material
                    }
                };

                asset.meshes.push(DecodedMesh {
                    primitive,
                    material,
                    local,
                });
            }
        }

        for child in node.children() {
            stack.push((child, local));
        }
    }

    if default_used {
        asset.materials.push(Material::default());
    }

    if asset.meshes.is_empty() {
        return Err(AssetError::NoGeometry);
    }
    Ok(asset)
}

fn read_primitive(prim: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Option<Primitive> {
    let reader = prim.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));

    let positions: Vec<Vec3> = reader
        .read_positions()?
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();
    if positions.is_empty() {
        return None;
    }

    let normals: Vec<Vec3> = reader
        .read_normals()
        .map(|iter| iter.map(|n| Vec3::new(n[0], n[1], n[2])).collect())
        .unwrap_or_default();

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        // No indices: vertices are already a triangle list
        None => (0..(positions.len() - positions.len() % 3) as u32).collect(),
    };
    if indices.len() < 3 {
        return None;
    }

    Some(Primitive::new(positions, normals, indices))
}

fn convert_material(m: &gltf::Material) -> Material {
    let base_color = m.pbr_metallic_roughness().base_color_factor();
    Material {
        name: m.name().map(str::to_string),
        base_color,
        transparent: m.alpha_mode() == AlphaMode::Blend,
        opacity: base_color[3],
        emissive: m.emissive_factor(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::geometry::mat4_transform_point;

    /// Minimal GLB holding one cube of half-extent `h`, placed by its node at
    /// `offset`, with a single material
    pub(crate) fn glb_cube(h: f32, offset: [f32; 3], blend: bool) -> Vec<u8> {
        let corners = [
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ];
        let indices: [u32; 36] = [
            0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, 3, 7, 6, 3, 6, 2, 0, 4, 7, 0, 7,
            3, 1, 2, 6, 1, 6, 5,
        ];

        let mut bin = Vec::new();
        for c in &corners {
            for v in c {
                bin.extend_from_slice(&v.to_le_bytes());
            }
        }
        for i in &indices {
            bin.extend_from_slice(&i.to_le_bytes());
        }
        assert_eq!(bin.len(), 240);

        let alpha = if blend { r#","alphaMode":"BLEND""# } else { "" };
        let json = format!(
            r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],
"nodes":[{{"mesh":0,"translation":[{},{},{}]}}],
"meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1,"material":0}}]}}],
"materials":[{{"pbrMetallicRoughness":{{"baseColorFactor":[0.8,0.2,0.2,{}]}},"emissiveFactor":[0.0,0.0,0.0]{}}}],
"buffers":[{{"byteLength":240}}],
"bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":96,"target":34962}},{{"buffer":0,"byteOffset":96,"byteLength":144,"target":34963}}],
"accessors":[{{"bufferView":0,"componentType":5126,"count":8,"type":"VEC3","min":[{},{},{}],"max":[{},{},{}]}},{{"bufferView":1,"componentType":5125,"count":36,"type":"SCALAR"}}]}}"#,
            offset[0],
            offset[1],
            offset[2],
            if blend { 0.5 } else { 1.0 },
            alpha,
            -h,
            -h,
            -h,
            h,
            h,
            h,
        );

        let mut json = json.into_bytes();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(b"glTF");
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&(json.len() as u32).to_le_bytes());
        out.extend_from_slice(b"JSON");
        out.extend_from_slice(&json);
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin);
        out
    }

    #[test]
    fn test_decode_cube() {
        let asset = decode_gltf(&glb_cube(0.5, [0.0, 2.0, 0.0], false)).unwrap();
        assert_eq!(asset.meshes.len(), 1);
        assert_eq!(asset.materials.len(), 1);
        assert_eq!(asset.vertex_count(), 8);

        let mesh = &asset.meshes[0];
        assert_eq!(mesh.primitive.triangle_count(), 12);
        let moved = mat4_transform_point(&mesh.local, Vec3::ZERO);
        assert!(moved.approx_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));

        let mat = &asset.materials[mesh.material];
        assert!(!mat.transparent);
        assert!((mat.opacity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_blend_material_is_transparent() {
        let asset = decode_gltf(&glb_cube(0.5, [0.0; 3], true)).unwrap();
        let mat = &asset.materials[0];
        assert!(mat.transparent);
        assert!((mat.opacity - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode_gltf(b"not a model"), Err(AssetError::Decode(_))));
    }
}
