//! Vector and matrix math
//!
//! Matrices are row-major `[[f32; 4]; 4]`, translation lives in the last
//! column. Euler rotations are radians applied in XYZ order, the same
//! convention the model definitions are authored in.

use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

/// 3D Vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn from_array(a: [f32; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Vec3 {
        let l = self.len();
        if l == 0.0 {
            return Vec3::ZERO;
        }
        self.scale(1.0 / l)
    }

    pub fn scale(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Largest component
    pub fn max_element(self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).len()
    }

    /// Component-wise approximate equality
    pub fn approx_eq(self, other: Vec3, eps: f32) -> bool {
        (self.x - other.x).abs() <= eps
            && (self.y - other.y).abs() <= eps
            && (self.z - other.z).abs() <= eps
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    fn mul(self, s: f32) -> Vec3 {
        self.scale(s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

/// 2D Vector (screen space)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Linear interpolation between two points. `t` is not clamped.
pub fn lerp(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    Vec3::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
    )
}

// =============================================================================
// Axis-aligned bounding box
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any `expand` call will overwrite
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
        max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut b = Aabb::EMPTY;
        for p in points {
            b.expand(p);
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn expand(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Bounding box of this box after transformation
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        Aabb::from_points(self.corners().iter().map(|&c| mat4_transform_point(m, c)))
    }
}

// =============================================================================
// 4x4 Matrix operations (for transforms)
// =============================================================================

/// 4x4 transformation matrix type
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub fn mat4_identity() -> Mat4 {
    [
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create translation matrix
pub fn mat4_translation(t: Vec3) -> Mat4 {
    [
        [1.0, 0.0, 0.0, t.x],
        [0.0, 1.0, 0.0, t.y],
        [0.0, 0.0, 1.0, t.z],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Uniform scale matrix
pub fn mat4_scale(s: f32) -> Mat4 {
    [
        [s, 0.0, 0.0, 0.0],
        [0.0, s, 0.0, 0.0],
        [0.0, 0.0, s, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Build a rotation matrix from euler angles (radians).
/// Order: X then Y then Z intrinsic, i.e. `Rx * Ry * Rz`.
pub fn mat4_rotation(rot: Vec3) -> Mat4 {
    let (a, b) = (rot.x.cos(), rot.x.sin());
    let (c, d) = (rot.y.cos(), rot.y.sin());
    let (e, f) = (rot.z.cos(), rot.z.sin());

    let ae = a * e;
    let af = a * f;
    let be = b * e;
    let bf = b * f;

    [
        [c * e, -c * f, d, 0.0],
        [af + be * d, ae - bf * d, -b * c, 0.0],
        [bf - ae * d, be + af * d, a * c, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Multiply two 4x4 matrices
pub fn mat4_mul(a: &Mat4, b: &Mat4) -> Mat4 {
    let mut result = [[0.0; 4]; 4];
    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[i][k] * b[k][j];
            }
        }
    }
    result
}

/// Transform a point by a 4x4 matrix
pub fn mat4_transform_point(m: &Mat4, p: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z + m[0][3],
        m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z + m[1][3],
        m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z + m[2][3],
    )
}

/// Transform a direction (ignores translation)
pub fn mat4_transform_vector(m: &Mat4, v: Vec3) -> Vec3 {
    Vec3::new(
        m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
        m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
        m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
    )
}

/// Translation * Rotation * Scale
pub fn mat4_from_trs(position: Vec3, rotation: Vec3, scale: f32) -> Mat4 {
    let tr = mat4_mul(&mat4_translation(position), &mat4_rotation(rotation));
    mat4_mul(&tr, &mat4_scale(scale))
}

/// Convert a column-major glTF matrix into our row-major layout
pub fn mat4_from_cols(cols: [[f32; 4]; 4]) -> Mat4 {
    let mut m = [[0.0; 4]; 4];
    for (c, col) in cols.iter().enumerate() {
        for (r, v) in col.iter().enumerate() {
            m[r][c] = *v;
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_vec3_cross() {
        let c = Vec3::new(1.0, 0.0, 0.0).cross(Vec3::new(0.0, 1.0, 0.0));
        assert!((c.z - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_lerp_midpoint() {
        let p = lerp(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 3.0, 0.0), 0.5);
        assert!(p.approx_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn test_rotation_about_y() {
        // +X rotated a quarter turn around Y points at -Z
        let m = mat4_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let v = mat4_transform_vector(&m, Vec3::new(1.0, 0.0, 0.0));
        assert!(v.approx_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5), "{:?}", v);
    }

    #[test]
    fn test_rotation_about_x() {
        // +Y rotated a quarter turn around X points at +Z
        let m = mat4_rotation(Vec3::new(FRAC_PI_2, 0.0, 0.0));
        let v = mat4_transform_vector(&m, Vec3::new(0.0, 1.0, 0.0));
        assert!(v.approx_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5), "{:?}", v);
    }

    #[test]
    fn test_trs_applies_scale_before_translation() {
        let m = mat4_from_trs(Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO, 2.0);
        let p = mat4_transform_point(&m, Vec3::new(1.0, 1.0, 1.0));
        assert!(p.approx_eq(Vec3::new(12.0, 2.0, 2.0), 1e-5));
    }

    #[test]
    fn test_aabb_transformed() {
        let b = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let moved = b.transformed(&mat4_translation(Vec3::new(0.0, 5.0, 0.0)));
        assert!(moved.center().approx_eq(Vec3::new(0.0, 5.0, 0.0), 1e-5));
        assert!(moved.size().approx_eq(Vec3::new(2.0, 2.0, 2.0), 1e-5));
    }

    #[test]
    fn test_from_cols_moves_translation_to_last_column() {
        let mut cols = [[0.0; 4]; 4];
        cols[0][0] = 1.0;
        cols[1][1] = 1.0;
        cols[2][2] = 1.0;
        cols[3] = [4.0, 5.0, 6.0, 1.0];
        let m = mat4_from_cols(cols);
        let p = mat4_transform_point(&m, Vec3::ZERO);
        assert!(p.approx_eq(Vec3::new(4.0, 5.0, 6.0), 1e-6));
    }
}
