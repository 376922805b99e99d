//! Ray casting utilities for picking and drag operations
//!
//! Converts pixel coordinates into world-space rays for a perspective
//! camera, and intersects rays with triangles, boxes and planes.

use super::math::{Aabb, Vec2, Vec3};

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3, // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Everything needed to map between pixels and world space.
///
/// `right`, `up` and `forward` must be an orthonormal camera basis.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub eye: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Viewport size in pixels
    pub width: f32,
    pub height: f32,
}

impl Viewpoint {
    pub fn aspect(&self) -> f32 {
        if self.height <= 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }
}

/// Generate a ray from viewport pixel coordinates (origin top-left, y down)
/// through the camera.
pub fn screen_to_ray(px: f32, py: f32, view: &Viewpoint) -> Ray {
    let ndc_x = (px / view.width.max(1.0)) * 2.0 - 1.0;
    let ndc_y = 1.0 - (py / view.height.max(1.0)) * 2.0;

    let half_h = (view.fov_y * 0.5).tan();
    let half_w = half_h * view.aspect();

    let dir = view.forward + view.right * (ndc_x * half_w) + view.up * (ndc_y * half_h);
    Ray::new(view.eye, dir)
}

/// Project a world point to viewport pixels. Returns None behind the camera.
pub fn world_to_screen(p: Vec3, view: &Viewpoint) -> Option<Vec2> {
    world_to_screen_with_depth(p, view).map(|(x, y, _)| Vec2::new(x, y))
}

/// Project a world point to (pixel x, pixel y, view depth).
/// Returns None at or behind the eye plane.
pub fn world_to_screen_with_depth(p: Vec3, view: &Viewpoint) -> Option<(f32, f32, f32)> {
    let rel = p - view.eye;
    let depth = rel.dot(view.forward);
    if depth <= 1e-5 {
        return None;
    }

    let half_h = (view.fov_y * 0.5).tan();
    let half_w = half_h * view.aspect();

    let ndc_x = rel.dot(view.right) / (depth * half_w);
    let ndc_y = rel.dot(view.up) / (depth * half_h);

    Some((
        (ndc_x + 1.0) * 0.5 * view.width,
        (1.0 - ndc_y) * 0.5 * view.height,
        depth,
    ))
}

/// Distance of a world point in front of the eye, along the view direction
pub fn view_depth(p: Vec3, view: &Viewpoint) -> f32 {
    (p - view.eye).dot(view.forward)
}

/// Ray-triangle intersection using Möller–Trumbore algorithm.
/// Returns Some(t) if the ray hits in front of its origin. Double-sided.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
    const EPSILON: f32 = 1e-8;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if t > EPSILON {
        Some(t)
    } else {
        None
    }
}

/// Slab test. Returns the entry distance (0 if the origin is inside).
pub fn ray_aabb_intersect(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    if aabb.is_empty() {
        return None;
    }

    let mut t_min = 0.0f32;
    let mut t_max = f32::INFINITY;

    let o = ray.origin.to_array();
    let d = ray.direction.to_array();
    let lo = aabb.min.to_array();
    let hi = aabb.max.to_array();

    for axis in 0..3 {
        if d[axis].abs() < 1e-12 {
            if o[axis] < lo[axis] || o[axis] > hi[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d[axis];
        let mut t0 = (lo[axis] - o[axis]) * inv;
        let mut t1 = (hi[axis] - o[axis]) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

/// Find the intersection of a ray with a plane.
///
/// Returns the distance along the ray to the intersection point,
/// or None if the ray is parallel to the plane or intersection is behind ray origin.
pub fn ray_plane_intersection(ray: &Ray, plane_point: Vec3, plane_normal: Vec3) -> Option<f32> {
    let denom = ray.direction.dot(plane_normal);
    if denom.abs() < 0.0001 {
        return None; // Ray parallel to plane
    }

    let t = (plane_point - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None; // Intersection behind ray origin
    }

    Some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_neg_z() -> Viewpoint {
        Viewpoint {
            eye: Vec3::new(0.0, 0.0, 10.0),
            forward: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov_y: 40f32.to_radians(),
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn test_ray_plane_intersection() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let t = ray_plane_intersection(&ray, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        assert!((t.unwrap() - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_ray_plane_parallel() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(ray_plane_intersection(&ray, Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_screen_center_ray_is_forward() {
        let view = looking_down_neg_z();
        let ray = screen_to_ray(400.0, 300.0, &view);
        assert!(ray.direction.dot(view.forward) > 0.9999);
    }

    #[test]
    fn test_screen_to_ray_roundtrip() {
        let view = looking_down_neg_z();
        let world_point = Vec3::new(1.5, -0.75, -2.0);
        let px = world_to_screen(world_point, &view).expect("point should be visible");

        let ray = screen_to_ray(px.x, px.y, &view);
        let t = (world_point - ray.origin).dot(ray.direction);
        let distance = (ray.at(t) - world_point).len();
        assert!(distance < 1e-3, "ray misses point by {}", distance);
    }

    #[test]
    fn test_behind_camera_not_projected() {
        let view = looking_down_neg_z();
        assert!(world_to_screen(Vec3::new(0.0, 0.0, 20.0), &view).is_none());
    }

    #[test]
    fn test_triangle_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let (a, b, c) = (Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let t = ray_triangle_intersect(&ray, a, b, c).expect("should hit");
        assert!((t - 5.0).abs() < 1e-4);

        let miss = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_triangle_intersect(&miss, a, b, c).is_none());
    }

    #[test]
    fn test_aabb_slab() {
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let hit = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!((ray_aabb_intersect(&hit, &b).unwrap() - 4.0).abs() < 1e-5);

        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(ray_aabb_intersect(&miss, &b).is_none());
    }
}
