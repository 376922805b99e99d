//! Orbit camera
//!
//! Spherical coordinates around a target point. Rotation and pan input is
//! accumulated as pending deltas and bled off each frame by the damping
//! factor, so motion eases out after the pointer stops.

use serde::{Deserialize, Serialize};

use crate::config::ViewerConfig;
use crate::geometry::{Aabb, Vec3, Viewpoint};

/// Highest orbit elevation, just short of the pole
const MAX_ELEVATION: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
/// Remaining pending delta considered settled
const SETTLE_EPSILON: f32 = 1e-5;

/// Host-facing camera snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: [f32; 3],
    pub target: [f32; 3],
    /// Vertical field of view in degrees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f32>,
}

#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Horizontal angle around +Y, 0 looks from +Z
    pub azimuth: f32,
    /// Vertical angle, positive puts the camera above the target
    pub elevation: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    pub width: f32,
    pub height: f32,

    damping: f32,
    min_distance: f32,
    max_distance: f32,
    pending_azimuth: f32,
    pending_elevation: f32,
    pending_pan: Vec3,
}

impl OrbitCamera {
    pub fn new(config: &ViewerConfig, width: f32, height: f32) -> Self {
        let mut cam = Self {
            target: Vec3::ZERO,
            distance: 1.0,
            azimuth: 0.0,
            elevation: 0.0,
            fov_y: config.fov_rad(),
            near: config.near,
            far: config.far,
            width,
            height,
            damping: config.damping_factor.clamp(0.0, 1.0),
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            pending_azimuth: 0.0,
            pending_elevation: 0.0,
            pending_pan: Vec3::ZERO,
        };
        cam.look_from(config.camera_position, config.camera_target);
        cam
    }

    /// Place the camera at `position` looking at `target`
    pub fn look_from(&mut self, position: Vec3, target: Vec3) {
        let offset = position - target;
        let distance = offset.len();
        self.target = target;
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        if distance > 1e-6 {
            self.elevation = (offset.y / distance).clamp(-1.0, 1.0).asin().clamp(-MAX_ELEVATION, MAX_ELEVATION);
            self.azimuth = offset.x.atan2(offset.z);
        }
        self.stop();
    }

    pub fn position(&self) -> Vec3 {
        let (se, ce) = self.elevation.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(ce * sa, se, ce * ca) * self.distance
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize()
    }

    /// Orthonormal (forward, right, up) basis
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = self.forward();
        let mut right = forward.cross(Vec3::UP);
        if right.len() < 1e-6 {
            right = Vec3::new(self.azimuth.cos(), 0.0, -self.azimuth.sin());
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();
        (forward, right, up)
    }

    pub fn viewpoint(&self) -> Viewpoint {
        let (forward, right, up) = self.basis();
        Viewpoint {
            eye: self.position(),
            forward,
            right,
            up,
            fov_y: self.fov_y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height <= 0.0 {
            1.0
        } else {
            self.width / self.height
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.width = width.max(1.0);
        self.height = height.max(1.0);
    }

    /// Queue a rotation in radians
    pub fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.pending_azimuth += d_azimuth;
        self.pending_elevation += d_elevation;
    }

    /// Queue a pan in screen pixels, scaled by the current distance
    pub fn pan(&mut self, dx: f32, dy: f32, speed: f32) {
        let (_, right, up) = self.basis();
        let k = speed * self.distance;
        self.pending_pan += right * (-dx * k) + up * (dy * k);
    }

    /// Multiply the distance, clamped to the allowed range
    pub fn dolly(&mut self, factor: f32) {
        self.distance = (self.distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Move the eye along the view direction. Positive moves closer.
    pub fn advance(&mut self, amount: f32) {
        self.distance = (self.distance - amount).clamp(self.min_distance, self.max_distance);
    }

    /// Drop any pending motion
    pub fn stop(&mut self) {
        self.pending_azimuth = 0.0;
        self.pending_elevation = 0.0;
        self.pending_pan = Vec3::ZERO;
    }

    pub fn is_settled(&self) -> bool {
        self.pending_azimuth.abs() < SETTLE_EPSILON
            && self.pending_elevation.abs() < SETTLE_EPSILON
            && self.pending_pan.len() < SETTLE_EPSILON
    }

    /// Apply one frame of damped motion
    pub fn update(&mut self) {
        let k = if self.damping > 0.0 { self.damping } else { 1.0 };

        self.azimuth += self.pending_azimuth * k;
        self.elevation = (self.elevation + self.pending_elevation * k).clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self.target += self.pending_pan * k;

        let keep = 1.0 - k;
        self.pending_azimuth *= keep;
        self.pending_elevation *= keep;
        self.pending_pan = self.pending_pan * keep;
        if self.is_settled() {
            self.stop();
        }
    }

    /// Look at the origin from a distance at which `bounds` fits the vertical
    /// field of view, keeping the current viewing angle
    pub fn frame_bounds(&mut self, bounds: &Aabb, margin: f32) {
        if bounds.is_empty() {
            return;
        }
        let max_dim = bounds.size().max_element();
        let half_fov = (self.fov_y * 0.5).max(1e-3);
        let distance = (max_dim * 0.5) / half_fov.tan() * margin;
        self.target = Vec3::ZERO;
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.stop();
    }

    pub fn state(&self) -> CameraState {
        CameraState {
            position: self.position().to_array(),
            target: self.target.to_array(),
            fov: Some(self.fov_y.to_degrees()),
        }
    }

    /// Apply a snapshot. Non-finite values are ignored.
    pub fn apply_state(&mut self, state: &CameraState) {
        let position = Vec3::from_array(state.position);
        let target = Vec3::from_array(state.target);
        if !position.is_finite() || !target.is_finite() {
            return;
        }
        self.look_from(position, target);
        if let Some(fov) = state.fov.filter(|f| f.is_finite() && *f > 1.0 && *f < 179.0) {
            self.fov_y = fov.to_radians();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cam() -> OrbitCamera {
        OrbitCamera::new(&ViewerConfig::default(), 800.0, 600.0)
    }

    #[test]
    fn test_default_pose_roundtrips() {
        let c = cam();
        assert!(c.position().approx_eq(Vec3::new(2.0, 1.5, 2.2), 1e-4));
        assert!(c.target.approx_eq(Vec3::new(0.0, 0.6, 0.0), 1e-6));
    }

    #[test]
    fn test_advance_moves_along_view() {
        let mut c = cam();
        let before = c.distance;
        c.advance(0.25);
        assert!((c.distance - (before - 0.25)).abs() < 1e-5);
        c.advance(-0.25);
        assert!((c.distance - before).abs() < 1e-5);
    }

    #[test]
    fn test_damped_rotation_converges() {
        let mut c = cam();
        let start = c.azimuth;
        c.rotate(0.5, 0.0);
        c.update();
        let after_one = c.azimuth - start;
        assert!(after_one > 0.0 && after_one < 0.5);
        for _ in 0..500 {
            c.update();
        }
        assert!((c.azimuth - start - 0.5).abs() < 1e-3);
        assert!(c.is_settled());
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let (f, r, u) = cam().basis();
        assert!(f.dot(r).abs() < 1e-5);
        assert!(f.dot(u).abs() < 1e-5);
        assert!(r.dot(u).abs() < 1e-5);
        assert!(u.y > 0.0);
    }

    #[test]
    fn test_frame_bounds_distance() {
        let mut c = cam();
        let b = Aabb::new(Vec3::new(-1.0, -0.5, -0.5), Vec3::new(1.0, 0.5, 0.5));
        c.frame_bounds(&b, 1.5);
        let expected = 1.0 / (20f32.to_radians()).tan() * 1.5;
        assert!((c.distance - expected).abs() < 1e-4);
        assert_eq!(c.target, Vec3::ZERO);
    }

    #[test]
    fn test_state_roundtrip() {
        let mut c = cam();
        let s = CameraState { position: [0.0, 2.0, 5.0], target: [0.0, 1.0, 0.0], fov: Some(50.0) };
        c.apply_state(&s);
        let back = c.state();
        for i in 0..3 {
            assert!((back.position[i] - s.position[i]).abs() < 1e-4);
            assert!((back.target[i] - s.target[i]).abs() < 1e-6);
        }
        assert!((back.fov.unwrap() - 50.0).abs() < 1e-3);
    }
}
