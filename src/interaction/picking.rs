//! Ray picking against part geometry

use crate::geometry::{mat4_transform_point, ray_aabb_intersect, ray_triangle_intersect, Ray};
use crate::scene::SceneGraph;

#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Part tag of the mesh that was hit, if it had one
    pub part: Option<String>,
    pub distance: f32,
}

/// Find the nearest mesh along `ray` among visible nodes.
///
/// Each mesh is culled by its transformed bounds before testing triangles.
pub fn pick_nearest(scene: &SceneGraph, ray: &Ray) -> Option<PickHit> {
    let mut best: Option<PickHit> = None;

    for (_, node) in scene.nodes() {
        if !node.visible {
            continue;
        }
        for mesh in &node.meshes {
            let m = node.mesh_matrix(mesh);
            let bounds = mesh.primitive.bounds.transformed(&m);
            let Some(entry) = ray_aabb_intersect(ray, &bounds) else {
                continue;
            };
            if best.as_ref().is_some_and(|b| entry > b.distance) {
                continue;
            }

            for [a, b, c] in mesh.primitive.triangles() {
                let (a, b, c) = (
                    mat4_transform_point(&m, a),
                    mat4_transform_point(&m, b),
                    mat4_transform_point(&m, c),
                );
                if let Some(t) = ray_triangle_intersect(ray, a, b, c) {
                    if best.as_ref().map_or(true, |h| t < h.distance) {
                        best = Some(PickHit {
                            part: mesh.part.clone(),
                            distance: t,
                        });
                    }
                }
            }
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{mat4_identity, Vec3};
    use crate::scene::{cube, MaterialId, MeshInstance, SceneNode};
    use std::sync::Arc;

    fn scene_with(parts: &[(&str, Vec3)]) -> SceneGraph {
        let prim = Arc::new(cube(0.5));
        let mut scene = SceneGraph::new();
        for (id, pos) in parts {
            let mesh = MeshInstance {
                primitive: Arc::clone(&prim),
                material: MaterialId(0),
                local: mat4_identity(),
                part: Some(id.to_string()),
            };
            let mut node = SceneNode::new(id, vec![mesh], Vec3::ZERO);
            node.position = *pos;
            scene.add_node(node);
        }
        scene
    }

    fn down_z(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, 10.0), Vec3::new(0.0, 0.0, -1.0))
    }

    #[test]
    fn test_nearest_wins() {
        let scene = scene_with(&[("far", Vec3::new(0.0, 0.0, -3.0)), ("near", Vec3::ZERO)]);
        let hit = pick_nearest(&scene, &down_z(0.1, 0.2)).unwrap();
        assert_eq!(hit.part.as_deref(), Some("near"));
        assert!((hit.distance - 9.5).abs() < 1e-4);
    }

    #[test]
    fn test_hidden_nodes_are_skipped() {
        let mut scene = scene_with(&[("a", Vec3::ZERO)]);
        let id = scene.nodes().next().unwrap().0;
        scene.node_mut(id).unwrap().visible = false;
        assert!(pick_nearest(&scene, &down_z(0.1, 0.2)).is_none());
    }

    #[test]
    fn test_empty_space_misses() {
        let scene = scene_with(&[("a", Vec3::ZERO)]);
        assert!(pick_nearest(&scene, &down_z(3.0, 0.0)).is_none());
    }
}
