//! Edit-mode translate gizmo
//!
//! The gizmo attaches to the selected part. Dragging it moves the part in the
//! plane through the part that faces the camera, keeping the grab point under
//! the pointer.

use crate::geometry::{ray_plane_intersection, Ray, Vec3};

/// Which part the gizmo is attached to, if any
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Gizmo {
    attached: Option<String>,
}

impl Gizmo {
    pub fn attach(&mut self, part: &str) {
        self.attached = Some(part.to_string());
    }

    pub fn detach(&mut self) {
        self.attached = None;
    }

    pub fn attached(&self) -> Option<&str> {
        self.attached.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.is_some()
    }
}

/// Tracks one translate drag
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateDrag {
    pub part: String,
    pub start_position: Vec3,
    plane_normal: Vec3,
    grab_offset: Vec3,
}

impl TranslateDrag {
    /// Start dragging `part` currently at `position`. Returns None if the
    /// pointer ray does not meet the drag plane.
    pub fn begin(part: &str, position: Vec3, ray: &Ray, view_forward: Vec3) -> Option<Self> {
        let plane_normal = -view_forward.normalize();
        let t = ray_plane_intersection(ray, position, plane_normal)?;
        let hit = ray.at(t);
        Some(Self {
            part: part.to_string(),
            start_position: position,
            plane_normal,
            grab_offset: position - hit,
        })
    }

    /// New part position for the current pointer ray
    pub fn update(&self, ray: &Ray) -> Option<Vec3> {
        let t = ray_plane_intersection(ray, self.start_position, self.plane_normal)?;
        Some(ray.at(t) + self.grab_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_keeps_grab_offset() {
        let forward = Vec3::new(0.0, 0.0, -1.0);
        let start = Ray::new(Vec3::new(0.2, 0.0, 10.0), forward);
        let drag = TranslateDrag::begin("a", Vec3::ZERO, &start, forward).unwrap();

        let moved = Ray::new(Vec3::new(1.2, 0.5, 10.0), forward);
        let p = drag.update(&moved).unwrap();
        assert!(p.approx_eq(Vec3::new(1.0, 0.5, 0.0), 1e-5), "{:?}", p);
    }

    #[test]
    fn test_gizmo_attach_detach() {
        let mut g = Gizmo::default();
        g.attach("Part3");
        assert_eq!(g.attached(), Some("Part3"));
        g.detach();
        assert!(!g.is_attached());
    }
}
