//! Single-part presentation: centering and the appear animation

use crate::asset::MaterialBaselines;
use crate::scene::{MaterialId, MaterialTable, SceneNode};

/// Move a node so its world bounds are centered on the origin
pub fn center_at_origin(node: &mut SceneNode) {
    let bounds = node.world_bounds();
    if bounds.is_empty() {
        return;
    }
    node.position = node.position - bounds.center();
}

/// Apply one frame of the appear animation at eased progress `p`.
///
/// Scale grows from `start_scale` to 1 and opacity from 0 to the baseline.
/// At `p >= 1` the baseline is restored exactly.
pub fn apply_appear(
    node: &mut SceneNode,
    materials: &mut MaterialTable,
    baselines: &MaterialBaselines,
    ids: &[MaterialId],
    p: f32,
    start_scale: f32,
) {
    let p = p.clamp(0.0, 1.0);
    let finished = p >= 1.0;
    node.scale = if finished { 1.0 } else { start_scale + (1.0 - start_scale) * p };

    for &id in ids {
        let (Some(baseline), Some(live)) = (baselines.get(id), materials.get_mut(id)) else {
            continue;
        };
        if finished {
            live.transparent = baseline.transparent;
            live.opacity = baseline.opacity;
        } else {
            live.transparent = true;
            live.opacity = baseline.opacity * p;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{mat4_identity, Vec3};
    use crate::scene::{cube, Material, MeshInstance};
    use std::sync::Arc;

    fn setup() -> (SceneNode, MaterialTable, MaterialBaselines, MaterialId) {
        let mut table = MaterialTable::new();
        let id = table.insert(Material {
            opacity: 0.9,
            ..Material::default()
        });
        let mut baselines = MaterialBaselines::new();
        baselines.snapshot(id, table.get(id).unwrap());
        let mesh = MeshInstance {
            primitive: Arc::new(cube(0.5)),
            material: id,
            local: mat4_identity(),
            part: Some("p".into()),
        };
        let mut node = SceneNode::new("p", vec![mesh], Vec3::ZERO);
        node.position = Vec3::new(3.0, 1.0, -2.0);
        (node, table, baselines, id)
    }

    #[test]
    fn test_center_at_origin() {
        let (mut node, ..) = setup();
        center_at_origin(&mut node);
        assert!(node.world_bounds().center().approx_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_appear_fades_then_restores() {
        let (mut node, mut table, baselines, id) = setup();
        apply_appear(&mut node, &mut table, &baselines, &[id], 0.0, 0.85);
        assert!((node.scale - 0.85).abs() < 1e-6);
        assert_eq!(table.get(id).unwrap().opacity, 0.0);
        assert!(table.get(id).unwrap().transparent);

        apply_appear(&mut node, &mut table, &baselines, &[id], 0.5, 0.85);
        assert!((table.get(id).unwrap().opacity - 0.45).abs() < 1e-6);

        apply_appear(&mut node, &mut table, &baselines, &[id], 1.0, 0.85);
        assert_eq!(node.scale, 1.0);
        let live = table.get(id).unwrap();
        assert_eq!(live.opacity, 0.9);
        assert!(!live.transparent);
    }
}
