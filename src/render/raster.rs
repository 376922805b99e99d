//! Scene rasterization
//!
//! Opaque meshes are drawn first with depth writes, then the ground grid,
//! then transparent meshes back to front with depth test but no depth write.
//! Lighting is one ambient term plus one directional light, evaluated per
//! vertex and interpolated across the triangle (Gouraud).

use super::framebuffer::{Framebuffer, Rgb};
use crate::config::ViewerConfig;
use crate::geometry::{
    mat4_transform_point, mat4_transform_vector, view_depth, world_to_screen_with_depth, Vec3,
    Viewpoint,
};
use crate::scene::{Material, MeshInstance, SceneGraph, SceneNode};

const GRID_COLOR: Rgb = Rgb::from_hex(0x888888);
const GRID_CENTER_COLOR: Rgb = Rgb::from_hex(0x444444);

/// Ambient + directional lighting
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub ambient: f32,
    /// Unit vector pointing from the scene toward the light
    pub to_light: Vec3,
    pub intensity: f32,
}

impl Lighting {
    pub fn from_config(config: &ViewerConfig) -> Self {
        Self {
            ambient: config.ambient_intensity,
            to_light: config.light_position.normalize(),
            intensity: config.light_intensity,
        }
    }

    /// Light reaching a surface with world normal `normal`
    pub fn intensity_at(&self, normal: Vec3) -> f32 {
        self.ambient + self.intensity * normal.dot(self.to_light).max(0.0)
    }
}

/// Per-frame counters, shown by the host in its status line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub transparent_meshes: usize,
}

#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    /// View depth, positive in front of the eye
    z: f32,
    color: [f32; 3],
}

/// Draw the whole scene into `fb`. The viewpoint's pixel size is replaced by
/// the framebuffer's, so a low-res framebuffer can back a larger viewport.
pub fn render_scene(fb: &mut Framebuffer, scene: &SceneGraph, view: &Viewpoint, config: &ViewerConfig) -> RenderStats {
    let view = Viewpoint {
        width: fb.width as f32,
        height: fb.height as f32,
        ..*view
    };
    let lighting = Lighting::from_config(config);
    let mut stats = RenderStats::default();

    fb.clear(Rgb::from_hex(config.background_color));

    let mut transparent = Vec::new();
    for (_, node) in scene.nodes() {
        if !node.visible {
            continue;
        }
        for mesh in &node.meshes {
            let Some(material) = scene.materials.get(mesh.material) else {
                continue;
            };
            if material.transparent {
                let center = mat4_transform_point(&node.mesh_matrix(mesh), mesh.primitive.bounds.center());
                transparent.push((view_depth(center, &view), node, mesh, material));
            } else {
                stats.triangles += draw_mesh(fb, node, mesh, material, &view, &lighting, config.near);
            }
        }
    }

    draw_floor_grid(fb, &view, config.grid_size, config.grid_divisions, config.near);

    // Far to near
    transparent.sort_by(|a, b| b.0.total_cmp(&a.0));
    stats.transparent_meshes = transparent.len();
    for (_, node, mesh, material) in transparent {
        stats.triangles += draw_mesh(fb, node, mesh, material, &view, &lighting, config.near);
    }

    stats
}

fn draw_mesh(
    fb: &mut Framebuffer,
    node: &SceneNode,
    mesh: &MeshInstance,
    material: &Material,
    view: &Viewpoint,
    lighting: &Lighting,
    near: f32,
) -> usize {
    let alpha = if material.transparent { material.opacity } else { 1.0 };
    if alpha <= 0.0 {
        return 0;
    }

    let m = node.mesh_matrix(mesh);
    let prim = &mesh.primitive;
    let base = [material.base_color[0], material.base_color[1], material.base_color[2]];

    // Project every vertex once; None marks vertices too close to the eye
    let projected: Vec<Option<ScreenVertex>> = prim
        .positions
        .iter()
        .zip(&prim.normals)
        .map(|(&p, &n)| {
            let world = mat4_transform_point(&m, p);
            let (x, y, z) = world_to_screen_with_depth(world, view)?;
            if z < near {
                return None;
            }
            let normal = mat4_transform_vector(&m, n).normalize();
            let light = lighting.intensity_at(normal);
            let color = [
                base[0] * light + material.emissive[0],
                base[1] * light + material.emissive[1],
                base[2] * light + material.emissive[2],
            ];
            Some(ScreenVertex { x, y, z, color })
        })
        .collect();

    let mut drawn = 0;
    for tri in prim.indices.chunks_exact(3) {
        let fetch = |i: u32| projected.get(i as usize).copied().flatten();
        let (Some(a), Some(b), Some(c)) = (fetch(tri[0]), fetch(tri[1]), fetch(tri[2])) else {
            continue;
        };
        rasterize_triangle(fb, [a, b, c], material.transparent.then_some(alpha));
        drawn += 1;
    }
    drawn
}

/// Fill one triangle. `alpha` of None means opaque with depth write.
fn rasterize_triangle(fb: &mut Framebuffer, v: [ScreenVertex; 3], alpha: Option<f32>) {
    let [v1, v2, v3] = v;

    let min_x = v1.x.min(v2.x).min(v3.x).max(0.0) as usize;
    let max_x = (v1.x.max(v2.x).max(v3.x) + 1.0).min(fb.width as f32) as usize;
    let min_y = v1.y.min(v2.y).min(v3.y).max(0.0) as usize;
    let max_y = (v1.y.max(v2.y).max(v3.y) + 1.0).min(fb.height as f32) as usize;
    if min_x >= max_x || min_y >= max_y {
        return;
    }

    // Edge functions; bc.x weights v1, bc.y weights v2
    let area = (v2.y - v3.y) * (v1.x - v3.x) + (v3.x - v2.x) * (v1.y - v3.y);
    if area.abs() < 0.00001 {
        return;
    }
    let inv_area = 1.0 / area;

    let a0 = v2.y - v3.y;
    let b0 = v3.x - v2.x;
    let a1 = v3.y - v1.y;
    let b1 = v1.x - v3.x;

    // Sample at pixel centers
    let start_x = min_x as f32 + 0.5;
    let start_y = min_y as f32 + 0.5;
    let mut w0_row = a0 * (start_x - v3.x) + b0 * (start_y - v3.y);
    let mut w1_row = a1 * (start_x - v3.x) + b1 * (start_y - v3.y);

    let (inv_z1, inv_z2, inv_z3) = (1.0 / v1.z, 1.0 / v2.z, 1.0 / v3.z);

    for y in min_y..max_y {
        let mut w0 = w0_row;
        let mut w1 = w1_row;

        for x in min_x..max_x {
            let bc_x = w0 * inv_area;
            let bc_y = w1 * inv_area;
            let bc_z = 1.0 - bc_x - bc_y;

            const ERR: f32 = -0.0001;
            if bc_x >= ERR && bc_y >= ERR && bc_z >= ERR {
                // 1/z interpolates linearly in screen space
                let z = 1.0 / (bc_x * inv_z1 + bc_y * inv_z2 + bc_z * inv_z3);
                let color = Rgb::from_f32([
                    bc_x * v1.color[0] + bc_y * v2.color[0] + bc_z * v3.color[0],
                    bc_x * v1.color[1] + bc_y * v2.color[1] + bc_z * v3.color[1],
                    bc_x * v1.color[2] + bc_y * v2.color[2] + bc_z * v3.color[2],
                ]);
                match alpha {
                    None => {
                        fb.set_pixel_with_depth(x, y, z, color);
                    }
                    Some(a) => {
                        fb.blend_pixel_with_depth(x, y, z, color, a);
                    }
                }
            }

            w0 += a0;
            w1 += a1;
        }

        w0_row += b0;
        w1_row += b1;
    }
}

/// Ground grid on the y = 0 plane, `size` units across
pub fn draw_floor_grid(fb: &mut Framebuffer, view: &Viewpoint, size: f32, divisions: u32, near: f32) {
    if divisions == 0 || size <= 0.0 {
        return;
    }
    let half = size * 0.5;
    let step = size / divisions as f32;
    for i in 0..=divisions {
        let offset = -half + step * i as f32;
        let color = if i * 2 == divisions { GRID_CENTER_COLOR } else { GRID_COLOR };
        draw_world_line(fb, view, Vec3::new(offset, 0.0, -half), Vec3::new(offset, 0.0, half), near, color);
        draw_world_line(fb, view, Vec3::new(-half, 0.0, offset), Vec3::new(half, 0.0, offset), near, color);
    }
}

/// Depth-tested world-space line, clipped against the near plane
fn draw_world_line(fb: &mut Framebuffer, view: &Viewpoint, a: Vec3, b: Vec3, near: f32, color: Rgb) {
    let (da, db) = (view_depth(a, view), view_depth(b, view));
    if da < near && db < near {
        return;
    }
    let (a, b) = if da < near {
        (a + (b - a) * ((near - da) / (db - da)), b)
    } else if db < near {
        (a, b + (a - b) * ((near - db) / (da - db)))
    } else {
        (a, b)
    };

    let (Some((x0, y0, z0)), Some((x1, y1, z1))) =
        (world_to_screen_with_depth(a, view), world_to_screen_with_depth(b, view))
    else {
        return;
    };
    // Keep the Bresenham walk bounded for nearly edge-on lines
    let limit = 4.0 * (fb.width + fb.height) as f32;
    if [x0, y0, x1, y1].iter().any(|v| !v.is_finite() || v.abs() > limit) {
        return;
    }
    fb.draw_line_3d(x0 as i32, y0 as i32, z0, x1 as i32, y1 as i32, z1, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::mat4_identity;
    use crate::scene::{cube, MeshInstance, SceneNode};
    use std::sync::Arc;

    fn front_view(width: f32, height: f32) -> Viewpoint {
        Viewpoint {
            eye: Vec3::new(0.0, 0.0, 5.0),
            forward: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_y: 40f32.to_radians(),
            width,
            height,
        }
    }

    fn scene_with_cube(color: [f32; 4], transparent: bool, opacity: f32) -> SceneGraph {
        let mut scene = SceneGraph::new();
        let material = scene.materials.insert(Material {
            base_color: color,
            transparent,
            opacity,
            ..Material::default()
        });
        let mesh = MeshInstance {
            primitive: Arc::new(cube(0.5)),
            material,
            local: mat4_identity(),
            part: Some("a".into()),
        };
        scene.add_node(SceneNode::new("a", vec![mesh], Vec3::ZERO));
        scene
    }

    fn config() -> ViewerConfig {
        ViewerConfig {
            grid_divisions: 0,
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn test_opaque_cube_covers_center() {
        let scene = scene_with_cube([1.0, 0.0, 0.0, 1.0], false, 1.0);
        let mut fb = Framebuffer::new(64, 48);
        let stats = render_scene(&mut fb, &scene, &front_view(800.0, 600.0), &config());

        assert_eq!(stats.triangles, 12);
        let center = fb.pixel(32, 24).unwrap();
        assert!(center.r > 200 && center.g < 10, "{:?}", center);
        // Front face sits 4.5 units from the eye
        assert!((fb.depth(32, 24).unwrap() - 4.5).abs() < 0.05);
        assert_eq!(fb.pixel(0, 0), Some(Rgb::from_hex(config().background_color)));
    }

    #[test]
    fn test_hidden_node_is_skipped() {
        let mut scene = scene_with_cube([1.0, 0.0, 0.0, 1.0], false, 1.0);
        let id = scene.nodes().next().unwrap().0;
        scene.node_mut(id).unwrap().visible = false;
        let mut fb = Framebuffer::new(32, 24);
        let stats = render_scene(&mut fb, &scene, &front_view(32.0, 24.0), &config());
        assert_eq!(stats.triangles, 0);
    }

    #[test]
    fn test_transparent_cube_blends_with_background() {
        let scene = scene_with_cube([1.0, 1.0, 1.0, 1.0], true, 0.15);
        let mut fb = Framebuffer::new(64, 48);
        let stats = render_scene(&mut fb, &scene, &front_view(64.0, 48.0), &config());

        assert_eq!(stats.transparent_meshes, 1);
        let bg = Rgb::from_hex(config().background_color);
        let center = fb.pixel(32, 24).unwrap();
        assert!(center.r > bg.r && center.r < 200, "{:?}", center);
        assert_eq!(fb.depth(32, 24), Some(f32::MAX));
    }

    #[test]
    fn test_emissive_brightens() {
        let mut scene = scene_with_cube([0.2, 0.2, 0.2, 1.0], false, 1.0);
        let mut fb = Framebuffer::new(32, 24);
        render_scene(&mut fb, &scene, &front_view(32.0, 24.0), &config());
        let plain = fb.pixel(16, 12).unwrap();

        let id = scene.nodes().next().unwrap().1.meshes[0].material;
        scene.materials.get_mut(id).unwrap().emissive = [0.0, 0.0, 0.5];
        render_scene(&mut fb, &scene, &front_view(32.0, 24.0), &config());
        let lit = fb.pixel(16, 12).unwrap();
        assert!(lit.b > plain.b + 100);
        assert_eq!(lit.r, plain.r);
    }

    #[test]
    fn test_grid_draws_on_empty_scene() {
        let view = Viewpoint {
            eye: Vec3::new(0.0, 3.0, 6.0),
            forward: Vec3::new(0.0, -3.0, -6.0).normalize(),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 6.0, -3.0).normalize(),
            fov_y: 40f32.to_radians(),
            width: 80.0,
            height: 60.0,
        };
        let mut fb = Framebuffer::new(80, 60);
        render_scene(&mut fb, &SceneGraph::new(), &view, &ViewerConfig::default());
        // The grid center passes through the middle of the frame
        assert_eq!(fb.pixel(40, 30), Some(GRID_CENTER_COLOR));
    }
}
